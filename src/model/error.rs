use thiserror::Error;

use crate::model::structures::{
    family::Family,
    match_record::{Competitor, Period}
};

#[derive(Debug, Error, PartialEq)]
pub enum RatingError {
    #[error("Degenerate match #{index} in period {period}: {competitor_a} vs {competitor_b} has a combined score of 0")]
    DegenerateMatch {
        period: Period,
        index: usize,
        competitor_a: Competitor,
        competitor_b: Competitor
    },

    #[error("Competitor {competitor} has no prior record for period {period}")]
    MissingPrior { competitor: Competitor, period: Period },

    #[error("Competitor {competitor} reached the conjugate update for period {period} without indicators")]
    EmptyIndicators { competitor: Competitor, period: Period },

    #[error("Record of {competitor} for period {period} is already final")]
    AlreadyFinalized { competitor: Competitor, period: Period },

    #[error("Period {period} must come after period {last}")]
    PeriodOutOfOrder { period: Period, last: Period },

    #[error("No period is open")]
    NoOpenPeriod,

    #[error("Expected a {expected} distribution, found {found}")]
    FamilyMismatch { expected: Family, found: Family },

    #[error("Invalid {family} distribution ({first}, {second})")]
    InvalidDistribution { family: Family, first: f64, second: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String)
}
