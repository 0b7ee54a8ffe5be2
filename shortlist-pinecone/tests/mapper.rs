use serde_json::json;
use shortlist_core::IndexEntry;
use shortlist_pinecone::mapper::{entry_to_vector, match_to_candidate};
use shortlist_pinecone::types::QueryMatch;

#[test]
fn entry_to_vector_keeps_snapshot_as_metadata() {
    let serde_json::Value::Object(metadata) = json!({"name": "Java 8", "remote": true}) else {
        unreachable!()
    };
    let vector = entry_to_vector(IndexEntry {
        id: "java-8".to_string(),
        vector: vec![0.1, 0.2],
        metadata,
    });
    assert_eq!(vector.id, "java-8");
    assert_eq!(vector.metadata, Some(json!({"name": "Java 8", "remote": true})));
}

#[test]
fn empty_snapshot_is_omitted() {
    let vector = entry_to_vector(IndexEntry {
        id: "x".to_string(),
        vector: vec![0.1],
        metadata: Default::default(),
    });
    assert!(vector.metadata.is_none());
}

#[test]
fn match_to_candidate_reads_score_and_metadata() {
    let candidate = match_to_candidate(QueryMatch {
        id: "id-1".to_string(),
        score: Some(0.82),
        metadata: Some(json!({"name": "Sales 7.1"})),
    })
    .unwrap();
    assert_eq!(candidate.id, "id-1");
    assert_eq!(candidate.score, 0.82);
    assert_eq!(candidate.metadata.get("name"), Some(&json!("Sales 7.1")));
}

#[test]
fn match_without_metadata_has_empty_snapshot() {
    let candidate = match_to_candidate(QueryMatch {
        id: "id-2".to_string(),
        score: Some(0.5),
        metadata: None,
    })
    .unwrap();
    assert!(candidate.metadata.is_empty());
}

#[test]
fn non_object_metadata_is_malformed() {
    let err = match_to_candidate(QueryMatch {
        id: "id-3".to_string(),
        score: Some(0.5),
        metadata: Some(json!(["not", "an", "object"])),
    })
    .unwrap_err();
    assert!(err.to_string().contains("id-3"));
}
