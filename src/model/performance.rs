use indexmap::IndexMap;

use crate::model::{
    error::RatingError,
    structures::match_record::{Competitor, Match}
};

/// Indicators accrued per competitor during one period, in match order.
/// Only competitors with at least one match have an entry.
pub type IndicatorTable = IndexMap<Competitor, Vec<f64>>;

/// `1.0` for a win by A, `0.0` for a loss, `0.5` for a draw
pub fn win_indicator(score_a: f64, score_b: f64) -> f64 {
    if score_a == score_b {
        return 0.5;
    }

    if score_a > score_b {
        1.0
    } else {
        0.0
    }
}

/// Share of the points won by A. Undefined for a 0-0 match.
pub fn score_ratio(score_a: f64, score_b: f64) -> Option<f64> {
    let total = score_a + score_b;
    if !(total > 0.0) {
        return None;
    }

    Some(score_a / total)
}

/// Calculates the pair of performance indicators for a match.
///
/// `credit_a` is the opponent term credited to A (how strong B is), and `credit_b`
/// the term credited to B, in the order `RatingFamily::opponent_terms` returns them.
/// A win against a strong opponent is worth more than one against a weak opponent,
/// and the margin of victory is added on top.
pub fn performance_indicators(
    match_: &Match,
    credit_a: f64,
    credit_b: f64
) -> Result<(f64, f64), RatingError> {
    let r = score_ratio(match_.score_a, match_.score_b).ok_or_else(|| RatingError::DegenerateMatch {
        period: match_.period,
        index: match_.index,
        competitor_a: match_.competitor_a.clone(),
        competitor_b: match_.competitor_b.clone()
    })?;
    let w = win_indicator(match_.score_a, match_.score_b);

    let pi_a = w * credit_a + r;
    let pi_b = (1.0 - w) * credit_b + (1.0 - r);

    Ok((pi_a, pi_b))
}
