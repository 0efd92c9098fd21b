use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::RatingConfig;

use self::{
    aggregator::{standings, Standings},
    error::RatingError,
    rating_model::RatingModel,
    rating_tracker::RatingTable,
    structures::match_record::{Match, Period}
};

pub mod aggregator;
pub mod conjugate;
pub mod constants;
pub mod decay;
pub mod error;
pub mod family;
pub mod performance;
pub mod rating_model;
pub mod rating_tracker;
pub mod structures;
pub mod superiority;

/// Everything a run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingOutcome {
    pub config: RatingConfig,
    pub ratings: RatingTable,
    pub standings: Standings
}

/// Rates every period in ascending order and ranks the competitors
pub fn rate(periods: &BTreeMap<Period, Vec<Match>>, config: &RatingConfig) -> Result<RatingOutcome, RatingError> {
    let mut model = RatingModel::new(config.clone())?;
    model.process(periods)?;

    let ratings = model.rating_tracker.into_table();
    let standings = standings(&ratings);

    Ok(RatingOutcome {
        config: config.clone(),
        ratings,
        standings
    })
}
