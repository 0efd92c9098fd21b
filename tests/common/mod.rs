use std::{collections::BTreeMap, sync::Once};

use period_rating::model::{
    rating_tracker::{RatingRecord, RatingTable},
    structures::match_record::{Match, Period}
};
use period_rating::utils::test_utils::generate_match;

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Builds a period map from `(period, a, b, score_a, score_b)` tuples, numbering
/// matches in the order given
pub fn periods_from(rows: &[(Period, &str, &str, f64, f64)]) -> BTreeMap<Period, Vec<Match>> {
    let mut periods: BTreeMap<Period, Vec<Match>> = BTreeMap::new();
    for (index, (period, a, b, score_a, score_b)) in rows.iter().enumerate() {
        periods
            .entry(*period)
            .or_default()
            .push(generate_match(*period, index, a, b, *score_a, *score_b));
    }

    periods
}

/// Every record of `competitor`, in period order
pub fn history<'a>(table: &'a RatingTable, competitor: &str) -> Vec<(Period, &'a RatingRecord)> {
    table
        .iter()
        .filter_map(|(period, records)| records.get(competitor).map(|r| (*period, r)))
        .collect()
}
