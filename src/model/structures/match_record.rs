use serde::{Deserialize, Serialize};

/// Competitor identity
pub type Competitor = String;

/// Observation period key (e.g. a year). Periods are processed in ascending order.
pub type Period = i32;

/// Identifies a single match within the store: (row index, competitor A, competitor B)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchKey {
    pub index: usize,
    pub competitor_a: Competitor,
    pub competitor_b: Competitor
}

impl MatchKey {
    pub fn new(index: usize, competitor_a: &str, competitor_b: &str) -> MatchKey {
        MatchKey {
            index,
            competitor_a: competitor_a.to_string(),
            competitor_b: competitor_b.to_string()
        }
    }
}

/// A fully resolved head-to-head result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub period: Period,
    pub index: usize,
    pub competitor_a: Competitor,
    pub competitor_b: Competitor,
    pub score_a: f64,
    pub score_b: f64
}
