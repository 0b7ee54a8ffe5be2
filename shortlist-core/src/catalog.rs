use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Denormalized metadata stored next to a vector in the index.
pub type Metadata = Map<String, Value>;

/// One assessment product as produced by the catalog ingester.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub url: String,
    /// Test-type code(s), e.g. `"K"` or `"A, B"`.
    pub test_type: String,
    pub remote_testing: bool,
    pub adaptive_irt: bool,
    /// Completion time in minutes.
    pub duration: Option<u32>,
}

impl CatalogItem {
    /// Text embedded in document mode for this item.
    pub fn document_text(&self) -> String {
        format!(
            "Id:{}.\nName:{}.\nURL:{}.\nRemote:{}.\nIRT:{}.\nType:{}.",
            self.id,
            self.name,
            self.url,
            yes_no(self.remote_testing),
            yes_no(self.adaptive_irt),
            self.test_type,
        )
    }

    pub fn snapshot(&self) -> Metadata {
        let mut metadata = Map::new();
        metadata.insert("name".to_string(), Value::String(self.name.clone()));
        metadata.insert("url".to_string(), Value::String(self.url.clone()));
        metadata.insert("type".to_string(), Value::String(self.test_type.clone()));
        metadata.insert("remote".to_string(), Value::Bool(self.remote_testing));
        metadata.insert("irt".to_string(), Value::Bool(self.adaptive_irt));
        if let Some(duration) = self.duration {
            metadata.insert("duration".to_string(), Value::from(duration));
        }
        metadata
    }

    pub fn into_entry(self, vector: Vec<f32>) -> IndexEntry {
        let metadata = self.snapshot();
        IndexEntry {
            id: self.id,
            vector,
            metadata,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// What the vector index stores per catalog item.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub id: String,
    pub vector: Vec<f32>,
    pub metadata: Metadata,
}
