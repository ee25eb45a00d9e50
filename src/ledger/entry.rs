use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One crawled meal page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    id: String,
    date: String,
    endpoint: String,
    #[serde(rename = "pdfs")]
    documents: Vec<String>,
}

impl LedgerEntry {
    pub fn new(
        date: impl Into<String>,
        endpoint: impl Into<String>,
        documents: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date: date.into(),
            endpoint: endpoint.into(),
            documents: documents.into_iter().collect(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }
}
