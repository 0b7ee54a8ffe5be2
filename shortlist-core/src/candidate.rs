use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Metadata;

pub const DEFAULT_NAME: &str = "Unnamed";
pub const DEFAULT_URL: &str = "#";

/// A raw match returned by the vector index for one query.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub score: f32,
    pub metadata: Metadata,
}

impl Candidate {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// The shape returned to users.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub name: String,
    pub url: String,
    #[serde(rename = "type")]
    pub test_type: String,
    pub remote: bool,
    pub irt: bool,
    pub score: f32,
    pub duration: u32,
}

impl Recommendation {
    /// Missing or undecodable metadata fields fall back to defaults instead of
    /// dropping the candidate.
    pub fn from_candidate(candidate: &Candidate) -> Self {
        let metadata = &candidate.metadata;
        Self {
            name: text_field(metadata, "name").unwrap_or_else(|| DEFAULT_NAME.to_string()),
            url: text_field(metadata, "url").unwrap_or_else(|| DEFAULT_URL.to_string()),
            test_type: text_field(metadata, "type").unwrap_or_default(),
            remote: flag_field(metadata, "remote").unwrap_or(false),
            irt: flag_field(metadata, "irt").unwrap_or(false),
            score: candidate.score,
            duration: minutes_field(metadata, "duration").unwrap_or(0),
        }
    }
}

fn text_field(metadata: &Metadata, key: &str) -> Option<String> {
    match metadata.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            Some(parts.join(", "))
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn flag_field(metadata: &Metadata, key: &str) -> Option<bool> {
    match metadata.get(key)? {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(text) => parse_flag(text),
        _ => None,
    }
}

fn minutes_field(metadata: &Metadata, key: &str) -> Option<u32> {
    let value = match metadata.get(key)? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if value.is_finite() && value >= 0.0 && value <= u32::MAX as f64 {
        Some(value.round() as u32)
    } else {
        None
    }
}

/// Accepts the spellings the catalog export uses for booleans.
pub fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "t" | "1" => Some(true),
        "no" | "n" | "false" | "f" | "0" => Some(false),
        _ => None,
    }
}
