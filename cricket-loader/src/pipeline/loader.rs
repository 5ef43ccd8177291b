use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use cricket_core::common::error::Result;
use cricket_core::storage::Storage;

use crate::ingest::{FileDocumentSource, MatchDocument};
use crate::observability::metrics;
use crate::pipeline::identity::IdentityResolver;
use crate::pipeline::normalize::DocumentNormalizer;

/// One skipped document and why.
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub document_ref: String,
    pub reason: String,
}

/// Aggregate outcome of one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub documents_processed: usize,
    pub players_upserted: usize,
    pub matches_inserted: usize,
    pub innings_inserted: usize,
    pub deliveries_inserted: usize,
    pub failures: Vec<LoadFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl LoadReport {
    fn new() -> Self {
        Self {
            documents_processed: 0,
            players_upserted: 0,
            matches_inserted: 0,
            innings_inserted: 0,
            deliveries_inserted: 0,
            failures: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn documents_failed(&self) -> usize {
        self.failures.len()
    }

    fn record_failure(&mut self, document_ref: &str, reason: String) {
        warn!("Skipping document {}: {}", document_ref, reason);
        metrics::loader::document_failed();
        self.failures.push(LoadFailure {
            document_ref: document_ref.to_string(),
            reason,
        });
    }

    fn finish(&mut self) {
        let finished = Utc::now();
        let elapsed = (finished - self.started_at).num_milliseconds() as f64 / 1000.0;
        metrics::loader::batch_duration_seconds(elapsed);
        self.finished_at = Some(finished);
    }
}

/// Drives normalization across a collection of source documents and commits
/// the produced rows, threading each generated key explicitly into the
/// subordinate inserts.
///
/// One bad document never blocks the rest of the batch, and there is no
/// cross-document transaction: rows committed for earlier documents stay
/// committed when a later document fails.
pub struct BatchLoader {
    storage: Arc<dyn Storage>,
    resolver: Arc<IdentityResolver>,
    normalizer: DocumentNormalizer,
}

impl BatchLoader {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let resolver = Arc::new(IdentityResolver::new());
        let normalizer = DocumentNormalizer::new(resolver.clone());
        Self {
            storage,
            resolver,
            normalizer,
        }
    }

    pub fn resolver(&self) -> &IdentityResolver {
        &self.resolver
    }

    /// Load every document under a source directory. Only an unreadable
    /// directory aborts the batch; unreadable or unparsable files become
    /// per-document failures.
    pub async fn load_dir(&self, source: &FileDocumentSource) -> Result<LoadReport> {
        let paths = source.document_paths()?;
        info!("Loading {} documents", paths.len());

        let mut report = LoadReport::new();
        let mut documents = Vec::new();
        for path in &paths {
            match FileDocumentSource::read_document(path) {
                Ok(document) => documents.push(document),
                Err(e) => report.record_failure(&path.display().to_string(), e.to_string()),
            }
        }
        self.load_into(&mut report, &documents).await;
        report.finish();
        Ok(report)
    }

    /// Load an already-parsed batch of documents.
    pub async fn load(&self, documents: &[MatchDocument]) -> LoadReport {
        let mut report = LoadReport::new();
        self.load_into(&mut report, documents).await;
        report.finish();
        report
    }

    async fn load_into(&self, report: &mut LoadReport, documents: &[MatchDocument]) {
        for document in documents {
            match self.load_document(document, report).await {
                Ok(()) => {
                    report.documents_processed += 1;
                    metrics::loader::document_loaded();
                }
                Err(e) => report.record_failure(&document.document_ref, e.to_string()),
            }
        }
        info!(
            "Batch complete: {} documents loaded, {} failed, {} matches / {} innings / {} deliveries inserted",
            report.documents_processed,
            report.documents_failed(),
            report.matches_inserted,
            report.innings_inserted,
            report.deliveries_inserted,
        );
    }

    /// Persist one document's match→innings→delivery triad. The counts on
    /// the report advance as rows land, so a storage failure partway leaves
    /// the already-committed rows counted (there is no rollback).
    async fn load_document(&self, document: &MatchDocument, report: &mut LoadReport) -> Result<()> {
        let normalized = self.normalizer.normalize(&document.value)?;

        for player in &normalized.players {
            self.storage.upsert_player(&player.name, &player.id).await?;
        }
        report.players_upserted += normalized.players.len();
        metrics::loader::players_upserted(normalized.players.len());

        let match_id = self.storage.insert_match(&normalized.match_record).await?;
        report.matches_inserted += 1;
        metrics::loader::matches_inserted(1);

        for innings in &normalized.innings {
            let innings_id = self.storage.insert_innings(&innings.record, match_id).await?;
            report.innings_inserted += 1;
            metrics::loader::innings_inserted(1);

            self.storage
                .insert_deliveries(&innings.deliveries, innings_id, match_id)
                .await?;
            report.deliveries_inserted += innings.deliveries.len();
            metrics::loader::deliveries_inserted(innings.deliveries.len());
        }

        Ok(())
    }
}
