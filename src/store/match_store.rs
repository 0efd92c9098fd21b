use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use thiserror::Error;

use crate::model::structures::match_record::{Competitor, Match, MatchKey, Period};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read match data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse match data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: could not convert {field} '{value}' to a number")]
    InvalidScore { row: usize, field: &'static str, value: String },

    #[error("Row {row}: {field} must not be negative, found {value}")]
    NegativeScore { row: usize, field: &'static str, value: f64 },

    #[error("Row {row}: missing competitor name")]
    MissingCompetitor { row: usize },

    #[error("Match #{index} is listed in period {period} but has no scores")]
    MissingScores { period: Period, index: usize }
}

/// Matches grouped by period, plus per-competitor lookups.
///
/// - `period_data`: period -> match keys in input order
/// - `match_data`: match key -> (score A, score B)
/// - `athlete_data`: competitor -> period -> match keys the competitor played
/// - `country_data`: competitor -> country (the latest row wins)
#[derive(Debug, Clone, Default)]
pub struct MatchStore {
    pub period_data: BTreeMap<Period, Vec<MatchKey>>,
    pub match_data: HashMap<MatchKey, (f64, f64)>,
    pub athlete_data: IndexMap<Competitor, BTreeMap<Period, Vec<MatchKey>>>,
    pub country_data: HashMap<Competitor, String>
}

impl MatchStore {
    pub fn new() -> MatchStore {
        MatchStore::default()
    }

    /// Adds a match. The index is the position of the match in the input.
    pub fn insert(
        &mut self,
        period: Period,
        index: usize,
        competitor_a: &str,
        competitor_b: &str,
        score_a: f64,
        score_b: f64
    ) -> MatchKey {
        let key = MatchKey::new(index, competitor_a, competitor_b);

        self.period_data.entry(period).or_default().push(key.clone());
        self.match_data.insert(key.clone(), (score_a, score_b));

        for competitor in [competitor_a, competitor_b] {
            self.athlete_data
                .entry(competitor.to_string())
                .or_default()
                .entry(period)
                .or_default()
                .push(key.clone());
        }

        key
    }

    pub fn set_country(&mut self, competitor: &str, country: &str) {
        self.country_data.insert(competitor.to_string(), country.to_string());
    }

    pub fn country(&self, competitor: &str) -> Option<&str> {
        self.country_data.get(competitor).map(String::as_str)
    }

    /// Periods in ascending order
    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.period_data.keys().copied()
    }

    /// Periods in which the competitor played at least one match
    pub fn periods_played(&self, competitor: &str) -> Vec<Period> {
        self.athlete_data
            .get(competitor)
            .map(|periods| periods.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn competitors(&self) -> impl Iterator<Item = &Competitor> {
        self.athlete_data.keys()
    }

    pub fn match_count(&self) -> usize {
        self.match_data.len()
    }

    /// Resolves the period's match keys into full match records, in input order
    pub fn matches(&self, period: Period) -> Result<Vec<Match>, StoreError> {
        let keys = match self.period_data.get(&period) {
            Some(keys) => keys,
            None => return Ok(Vec::new())
        };

        keys.iter()
            .map(|key| -> Result<Match, StoreError> {
                let (score_a, score_b) = self
                    .match_data
                    .get(key)
                    .ok_or(StoreError::MissingScores {
                        period,
                        index: key.index
                    })?;

                Ok(Match {
                    period,
                    index: key.index,
                    competitor_a: key.competitor_a.clone(),
                    competitor_b: key.competitor_b.clone(),
                    score_a: *score_a,
                    score_b: *score_b
                })
            })
            .collect()
    }

    /// Every period's resolved matches, keyed in ascending period order
    pub fn resolved_periods(&self) -> Result<BTreeMap<Period, Vec<Match>>, StoreError> {
        self.periods()
            .map(|period| -> Result<(Period, Vec<Match>), StoreError> {
                Ok((period, self.matches(period)?))
            })
            .collect()
    }
}
