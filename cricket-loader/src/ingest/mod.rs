pub mod files;

use serde_json::Value;

/// One source match document, tagged with a reference (its file name) used
/// in load reports and failure reasons.
#[derive(Debug, Clone)]
pub struct MatchDocument {
    pub document_ref: String,
    pub value: Value,
}

pub use files::FileDocumentSource;
