//! Offline relevance metrics over labelled queries.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{FailurePolicy, Recommender};

/// One labelled query: the assessment names a good answer contains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalCase {
    pub query: String,
    pub assessments: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalSummary {
    pub k: usize,
    pub mean_recall: f64,
    pub mean_map: f64,
    pub success_rate: f64,
    pub failed_queries: usize,
    pub total_queries: usize,
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn normalized_set(names: &[String]) -> HashSet<String> {
    names.iter().map(|name| normalize_name(name)).collect()
}

/// Share of the relevant names found in the first `k` retrieved ones.
pub fn recall_at_k(relevant: &[String], retrieved: &[String], k: usize) -> f64 {
    let relevant = normalized_set(relevant);
    if relevant.is_empty() || k == 0 {
        return 0.0;
    }
    let top: HashSet<String> = retrieved.iter().take(k).map(|name| normalize_name(name)).collect();
    let hits = relevant.intersection(&top).count();
    hits as f64 / relevant.len().min(k) as f64
}

pub fn average_precision_at_k(relevant: &[String], retrieved: &[String], k: usize) -> f64 {
    let relevant = normalized_set(relevant);
    if relevant.is_empty() || k == 0 {
        return 0.0;
    }
    let mut hits = 0usize;
    let mut precision_sum = 0.0;
    for (position, name) in retrieved.iter().take(k).enumerate() {
        if relevant.contains(&normalize_name(name)) {
            hits += 1;
            precision_sum += hits as f64 / (position + 1) as f64;
        }
    }
    precision_sum / relevant.len().min(k) as f64
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Runs every case in strict mode; an error or an empty answer is a failed query
/// and is left out of the means.
pub async fn evaluate<R>(recommender: &R, cases: &[EvalCase], k: usize) -> EvalSummary
where
    R: Recommender + ?Sized,
{
    let mut recalls = Vec::with_capacity(cases.len());
    let mut maps = Vec::with_capacity(cases.len());
    let mut failed_queries = 0;

    for case in cases {
        let results = match recommender
            .recommend_with_policy(&case.query, k, FailurePolicy::Strict)
            .await
        {
            Ok(results) if !results.is_empty() => results,
            Ok(_) => {
                tracing::warn!(query = %case.query, "no results for evaluation query");
                failed_queries += 1;
                continue;
            }
            Err(error) => {
                tracing::warn!(query = %case.query, error = %error, "evaluation query failed");
                failed_queries += 1;
                continue;
            }
        };

        let retrieved: Vec<String> = results.into_iter().map(|r| r.name).collect();
        let recall = recall_at_k(&case.assessments, &retrieved, k);
        let average_precision = average_precision_at_k(&case.assessments, &retrieved, k);
        tracing::info!(query = %case.query, recall, average_precision, "evaluated query");
        recalls.push(recall);
        maps.push(average_precision);
    }

    let success_rate = if cases.is_empty() {
        0.0
    } else {
        1.0 - failed_queries as f64 / cases.len() as f64
    };

    EvalSummary {
        k,
        mean_recall: mean(&recalls),
        mean_map: mean(&maps),
        success_rate,
        failed_queries,
        total_queries: cases.len(),
    }
}
