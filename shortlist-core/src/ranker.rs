//! Adaptive score-threshold ranking.
//!
//! The cutoff for one query is `max(absolute_floor, best_score - relative_margin)`:
//! the floor discards candidate sets that are uniformly weak, the margin keeps only a
//! tight band below a strong best hit.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{Candidate, Recommendation};

pub const ABSOLUTE_FLOOR: f32 = 0.5;
pub const RELATIVE_MARGIN: f32 = 0.2;

/// Secondary ordering among candidates with equal scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Keep the order the index returned them in.
    #[default]
    IndexOrder,
    /// Ascending identifier, independent of backend ordering.
    Identifier,
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "index-order" | "index_order" => Ok(TieBreak::IndexOrder),
            "identifier" | "id" => Ok(TieBreak::Identifier),
            other => Err(format!(
                "unknown tie break '{other}', expected 'index-order' or 'identifier'"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub absolute_floor: f32,
    pub relative_margin: f32,
    pub tie_break: TieBreak,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            absolute_floor: ABSOLUTE_FLOOR,
            relative_margin: RELATIVE_MARGIN,
            tie_break: TieBreak::default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AdaptiveRanker {
    config: RankingConfig,
}

impl AdaptiveRanker {
    pub fn new(config: RankingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Cutoff for this candidate set, or `None` when no candidate has a finite score.
    pub fn threshold(&self, candidates: &[Candidate]) -> Option<f32> {
        let max_score = candidates
            .iter()
            .map(|candidate| candidate.score)
            .filter(|score| score.is_finite())
            .reduce(f32::max)?;
        Some(
            self.config
                .absolute_floor
                .max(max_score - self.config.relative_margin),
        )
    }

    /// Filters, orders and truncates raw candidates into at most `top_k` recommendations.
    pub fn rank(&self, candidates: Vec<Candidate>, top_k: usize) -> Vec<Recommendation> {
        if top_k == 0 {
            return Vec::new();
        }
        let Some(threshold) = self.threshold(&candidates) else {
            return Vec::new();
        };

        let raw_count = candidates.len();
        let mut kept: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| candidate.score.is_finite() && candidate.score >= threshold)
            .collect();

        // `sort_by` is stable, so equal scores keep index order unless told otherwise.
        let tie_break = self.config.tie_break;
        kept.sort_by(|a, b| {
            let by_score = b.score.total_cmp(&a.score);
            match tie_break {
                TieBreak::IndexOrder => by_score,
                TieBreak::Identifier => by_score.then_with(|| a.id.cmp(&b.id)),
            }
        });
        kept.truncate(top_k);

        tracing::debug!(
            raw_count,
            kept = kept.len(),
            threshold,
            top_k,
            "ranked candidates"
        );

        kept.iter().map(Recommendation::from_candidate).collect()
    }
}

/// Descending score comparison treating NaN as the lowest score.
pub fn by_score_desc(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}
