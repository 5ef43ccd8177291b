use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use cricket_core::common::error::Result;

use super::MatchDocument;

/// Enumerates and parses match documents from a directory of extracted
/// `.json` files. Archive retrieval and extraction happen upstream; this is
/// the thin boundary between the filesystem and the pipeline.
pub struct FileDocumentSource {
    root: PathBuf,
}

impl FileDocumentSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// All `.json` files directly under the root, in sorted order so runs
    /// are deterministic.
    pub fn document_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();
        debug!("Found {} documents under {}", paths.len(), self.root.display());
        Ok(paths)
    }

    /// Read and parse one document. An unreadable or unparsable file fails
    /// only that document.
    pub fn read_document(path: &Path) -> Result<MatchDocument> {
        let contents = fs::read_to_string(path)?;
        let value = serde_json::from_str(&contents)?;
        Ok(MatchDocument {
            document_ref: document_ref(path),
            value,
        })
    }
}

fn document_ref(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
