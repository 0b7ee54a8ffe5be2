use serde_json::Value;
use shortlist_core::{Candidate, IndexEntry, Metadata};

use crate::error::PineconeIndexError;
use crate::types::{PineconeVector, QueryMatch};

pub fn entry_to_vector(entry: IndexEntry) -> PineconeVector {
    let metadata = if entry.metadata.is_empty() {
        None
    } else {
        Some(Value::Object(entry.metadata))
    };
    PineconeVector {
        id: entry.id,
        values: entry.vector,
        metadata,
    }
}

/// Matches without metadata become candidates with an empty snapshot; the ranker fills
/// in defaults later.
pub fn match_to_candidate(m: QueryMatch) -> Result<Candidate, PineconeIndexError> {
    let metadata = match m.metadata {
        None | Some(Value::Null) => Metadata::new(),
        Some(Value::Object(object)) => object,
        Some(_) => {
            return Err(PineconeIndexError::Malformed(format!(
                "metadata for match '{}' must be an object",
                m.id
            )))
        }
    };
    let score = m.score.unwrap_or(f32::NAN);
    Ok(Candidate::new(m.id, score).with_metadata(metadata))
}
