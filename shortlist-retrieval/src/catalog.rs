//! Reads the tabular catalog artifact into [`CatalogItem`]s.
//!
//! Expected header: `id, assessment_name, url, remote_testing, adaptive_irt_support,
//! test_type`, plus an optional `duration` column (minutes).

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use shortlist_core::{parse_flag, CatalogItem};

use crate::{RetrievalError, RetrievalResult};

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    assessment_name: String,
    url: String,
    #[serde(default)]
    remote_testing: String,
    #[serde(default)]
    adaptive_irt_support: String,
    #[serde(default)]
    test_type: String,
    #[serde(default)]
    duration: Option<String>,
}

pub fn load_catalog(path: impl AsRef<Path>) -> RetrievalResult<Vec<CatalogItem>> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let items = read_rows(reader)?;
    tracing::info!(path = %path.display(), items = items.len(), "loaded catalog");
    Ok(items)
}

pub fn parse_catalog<R: Read>(source: R) -> RetrievalResult<Vec<CatalogItem>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);
    read_rows(reader)
}

fn read_rows<R: Read>(mut reader: csv::Reader<R>) -> RetrievalResult<Vec<CatalogItem>> {
    let mut items = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    for (index, row) in reader.deserialize::<CatalogRow>().enumerate() {
        // Line 1 is the header.
        let line = index + 2;
        let item = into_item(row?, line)?;
        if let Some(first) = seen.insert(item.id.clone(), line) {
            return Err(RetrievalError::Catalog {
                row: line,
                message: format!("duplicate id {:?}, first seen on line {first}", item.id),
            });
        }
        items.push(item);
    }
    Ok(items)
}

fn into_item(row: CatalogRow, line: usize) -> RetrievalResult<CatalogItem> {
    if row.id.trim().is_empty() {
        return Err(RetrievalError::Catalog {
            row: line,
            message: "id is empty".to_string(),
        });
    }

    Ok(CatalogItem {
        remote_testing: flag(&row.remote_testing, "remote_testing", line)?,
        adaptive_irt: flag(&row.adaptive_irt_support, "adaptive_irt_support", line)?,
        duration: row.duration.as_deref().and_then(minutes),
        id: row.id,
        name: row.assessment_name,
        url: row.url,
        test_type: row.test_type,
    })
}

fn flag(value: &str, column: &str, line: usize) -> RetrievalResult<bool> {
    if value.trim().is_empty() {
        return Ok(false);
    }
    parse_flag(value).ok_or_else(|| RetrievalError::Catalog {
        row: line,
        message: format!("{column} must be yes/no or true/false, got {value:?}"),
    })
}

/// First integer in the cell, so `"30"` and `"Approx. 30 minutes"` both read as 30.
fn minutes(value: &str) -> Option<u32> {
    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::minutes;

    #[test]
    fn minutes_reads_first_number() {
        assert_eq!(minutes("30"), Some(30));
        assert_eq!(minutes("Approximate Completion Time in minutes = 45"), Some(45));
        assert_eq!(minutes("variable"), None);
        assert_eq!(minutes(""), None);
    }
}
