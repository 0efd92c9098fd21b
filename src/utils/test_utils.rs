use crate::{
    config::RatingConfig,
    model::structures::match_record::{Match, Period},
    store::MatchStore
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

pub const FIRST_PERIOD: Period = 2000;

pub fn generate_match(
    period: Period,
    index: usize,
    competitor_a: &str,
    competitor_b: &str,
    score_a: f64,
    score_b: f64
) -> Match {
    Match {
        period,
        index,
        competitor_a: competitor_a.to_string(),
        competitor_b: competitor_b.to_string(),
        score_a,
        score_b
    }
}

/// Default configuration without jitter, for exact comparisons
pub fn noise_free_config() -> RatingConfig {
    RatingConfig {
        noise_stddev: 0.0,
        ..RatingConfig::default()
    }
}

pub fn competitor_name(i: usize) -> String {
    format!("competitor_{i}")
}

/// Generates `n_matches` random matches per period for `n_periods` consecutive periods,
/// drawn from a pool of `n_competitors`. The winner always reaches 15; scores are
/// never 0-0.
pub fn generate_periods(
    n_periods: usize,
    n_competitors: usize,
    n_matches: usize,
    seed: u64
) -> BTreeMap<Period, Vec<Match>> {
    if n_competitors < 2 {
        panic!("At least 2 competitors are required");
    }

    // Initialize seeded RNG for reproducible results
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut periods = BTreeMap::new();
    let mut index = 0;

    for p in 0..n_periods {
        let period = FIRST_PERIOD + p as Period;
        let mut matches = Vec::with_capacity(n_matches);

        for _ in 0..n_matches {
            let a = rng.random_range(0..n_competitors);
            let mut b = rng.random_range(0..n_competitors - 1);
            if b >= a {
                b += 1;
            }

            let loser_score = rng.random_range(0..15) as f64;
            let (score_a, score_b) = if rng.random_bool(0.5) {
                (15.0, loser_score)
            } else {
                (loser_score, 15.0)
            };

            matches.push(generate_match(
                period,
                index,
                &competitor_name(a),
                &competitor_name(b),
                score_a,
                score_b
            ));
            index += 1;
        }

        periods.insert(period, matches);
    }

    periods
}

/// Builds a match store holding the given periods
pub fn generate_match_store(periods: &BTreeMap<Period, Vec<Match>>) -> MatchStore {
    let mut store = MatchStore::new();
    for matches in periods.values() {
        for m in matches {
            store.insert(m.period, m.index, &m.competitor_a, &m.competitor_b, m.score_a, m.score_b);
        }
    }

    store
}
