//! Metrics catalog for the loader pipeline, using standard Prometheus
//! naming conventions. Helpers are namespaced per pipeline stage so call
//! sites stay free of magic strings.

pub mod normalize {
    /// A document made it through normalization
    pub fn document_normalized() {
        ::metrics::counter!("cricket_normalize_documents_total").increment(1);
    }

    /// A document's top-level shape was unusable
    pub fn malformed_document() {
        ::metrics::counter!("cricket_normalize_malformed_documents_total").increment(1);
    }

    /// A name had no registry entry; the identifier was recorded as absent
    pub fn unresolved_name(role: &str) {
        ::metrics::counter!("cricket_normalize_unresolved_names_total", "role" => role.to_string())
            .increment(1);
    }
}

pub mod loader {
    /// A document was fully persisted
    pub fn document_loaded() {
        ::metrics::counter!("cricket_loader_documents_loaded_total").increment(1);
    }

    /// A document was skipped (normalization or storage failure)
    pub fn document_failed() {
        ::metrics::counter!("cricket_loader_documents_failed_total").increment(1);
    }

    pub fn players_upserted(count: usize) {
        ::metrics::counter!("cricket_loader_players_upserted_total").increment(count as u64);
    }

    pub fn matches_inserted(count: usize) {
        ::metrics::counter!("cricket_loader_matches_inserted_total").increment(count as u64);
    }

    pub fn innings_inserted(count: usize) {
        ::metrics::counter!("cricket_loader_innings_inserted_total").increment(count as u64);
    }

    pub fn deliveries_inserted(count: usize) {
        ::metrics::counter!("cricket_loader_deliveries_inserted_total").increment(count as u64);
    }

    pub fn batch_duration_seconds(seconds: f64) {
        ::metrics::histogram!("cricket_loader_batch_duration_seconds").record(seconds);
    }
}
