use std::collections::BTreeMap;

use indexmap::IndexSet;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::{
    config::RatingConfig,
    model::{
        error::RatingError,
        family::{family_for, RatingFamily},
        performance::{performance_indicators, IndicatorTable},
        rating_tracker::{RatingTable, RatingTracker},
        structures::{
            distribution::RatingDistribution,
            match_record::{Competitor, Match, Period},
            update_kind::UpdateKind
        }
    },
    utils::progress_utils::progress_bar
};

/// RNG stream domains, so matches and competitors never share a stream
const MATCH_STREAM: u64 = 0;
const COMPETITOR_STREAM: u64 = 1;

pub struct RatingModel {
    pub config: RatingConfig,
    pub rating_tracker: RatingTracker,
    family: Box<dyn RatingFamily>,
    periods_processed: u64
}

impl RatingModel {
    pub fn new(config: RatingConfig) -> Result<RatingModel, RatingError> {
        config.validate()?;
        let family = family_for(&config);

        Ok(Self::with_family(config, family))
    }

    /// Creates a model with a custom family strategy, e.g. a Gamma family
    /// using a different probability-of-superiority estimator.
    pub fn with_family(config: RatingConfig, family: Box<dyn RatingFamily>) -> RatingModel {
        RatingModel {
            config,
            rating_tracker: RatingTracker::new(),
            family,
            periods_processed: 0
        }
    }

    /// Processes every period in ascending order
    pub fn process(&mut self, periods: &BTreeMap<Period, Vec<Match>>) -> Result<(), RatingError> {
        info!(
            "Processing {} periods with the {} family",
            periods.len(),
            self.family.family()
        );

        let progress_bar = progress_bar(periods.len() as u64, "Processing periods".to_string());
        for (period, matches) in periods {
            self.process_period(*period, matches)?;

            if let Some(bar) = &progress_bar {
                bar.inc(1);
            }
        }

        if let Some(bar) = progress_bar {
            bar.finish_and_clear();
        }

        info!(
            "Rated {} competitors across {} periods",
            self.rating_tracker.known().len(),
            periods.len()
        );

        Ok(())
    }

    /// # Period processing
    ///
    /// Steps:
    /// 1. Collect the competitors active in this period and open the period: every
    ///     known competitor gets a record, carried from the previous period or seeded
    ///     with the global prior.
    /// 2. Compute performance indicators for every match, using the previous period's
    ///     records as input.
    /// 3. Finalize active competitors with the conjugate update.
    /// 4. Finalize the remaining known competitors with decay. Skipped for the first
    ///     period, as nobody has history yet.
    pub fn process_period(&mut self, period: Period, matches: &[Match]) -> Result<(), RatingError> {
        let active = active_competitors(matches);
        self.rating_tracker
            .open_period(period, &active, self.config.prior)?;

        let indicators = self.performance_indicators(period, matches)?;
        self.apply_observations(period, &indicators)?;

        let is_first = self.rating_tracker.previous_period().is_none();
        let inactive: Vec<Competitor> = self
            .rating_tracker
            .known()
            .iter()
            .filter(|c| !indicators.contains_key(*c))
            .cloned()
            .collect();

        let mut decayed = 0;
        if !is_first {
            self.apply_decay(period, &inactive)?;
            decayed = inactive.len();
        }

        debug!(
            period,
            matches = matches.len(),
            observed = indicators.len(),
            decayed,
            "Period closed"
        );

        self.periods_processed += 1;
        Ok(())
    }

    /// Builds the period's indicator table. Matches are rated in parallel and merged
    /// back in input order.
    fn performance_indicators(&mut self, period: Period, matches: &[Match]) -> Result<IndicatorTable, RatingError> {
        let tracker = &self.rating_tracker;
        let family = self.family.as_ref();
        let prior = self.config.prior;
        let seed = self.config.seed;
        let period_index = self.periods_processed;

        let results: Vec<(f64, f64)> = matches
            .par_iter()
            .enumerate()
            .map(|(i, m)| {
                let rating_a = Self::input_rating(tracker, &m.competitor_a, prior);
                let rating_b = Self::input_rating(tracker, &m.competitor_b, prior);

                let mut rng = stream_rng(seed, period_index, MATCH_STREAM, i as u64);
                let (credit_a, credit_b) = family.opponent_terms(&rating_a, &rating_b, &mut rng)?;

                performance_indicators(m, credit_a, credit_b)
            })
            .collect::<Result<Vec<_>, RatingError>>()?;

        let mut table = IndicatorTable::new();
        for (m, (pi_a, pi_b)) in matches.iter().zip(results) {
            trace!(period, index = m.index, pi_a, pi_b, "{} vs {}", m.competitor_a, m.competitor_b);

            table.entry(m.competitor_a.clone()).or_default().push(pi_a);
            table.entry(m.competitor_b.clone()).or_default().push(pi_b);

            self.rating_tracker.record_observation(&m.competitor_a);
            self.rating_tracker.record_observation(&m.competitor_b);
        }

        Ok(table)
    }

    /// Previous period's record, falling back to the global prior for newcomers
    fn input_rating(tracker: &RatingTracker, competitor: &str, prior: RatingDistribution) -> RatingDistribution {
        tracker
            .prior_rating(competitor)
            .map(|r| r.distribution)
            .unwrap_or(prior)
    }

    fn apply_observations(&mut self, period: Period, indicators: &IndicatorTable) -> Result<(), RatingError> {
        let tracker = &self.rating_tracker;
        let family = self.family.as_ref();
        let seed = self.config.seed;
        let period_index = self.periods_processed;

        let posteriors: Vec<(Competitor, RatingDistribution)> = indicators
            .par_iter()
            .map(|(competitor, pis)| {
                if pis.is_empty() {
                    return Err(RatingError::EmptyIndicators {
                        competitor: competitor.clone(),
                        period
                    });
                }

                let prior = tracker
                    .get_rating(period, competitor)
                    .ok_or_else(|| RatingError::MissingPrior {
                        competitor: competitor.clone(),
                        period
                    })?
                    .distribution;

                let slot = competitor_slot(tracker.known(), competitor, period)?;
                let mut rng = stream_rng(seed, period_index, COMPETITOR_STREAM, slot);
                let posterior = family.conjugate_update(&prior, pis, &mut rng)?;

                Ok((competitor.clone(), posterior))
            })
            .collect::<Result<Vec<_>, RatingError>>()?;

        for (competitor, posterior) in posteriors {
            trace!(period, %competitor, mean = posterior.mean(), variance = posterior.variance(), "Observed");
            self.rating_tracker
                .finalize(&competitor, posterior, UpdateKind::Observed)?;
        }

        Ok(())
    }

    /// Decays every known competitor without a match this period
    fn apply_decay(&mut self, period: Period, inactive: &[Competitor]) -> Result<(), RatingError> {
        let tracker = &self.rating_tracker;
        let family = self.family.as_ref();
        let previous = tracker.previous_period().ok_or(RatingError::NoOpenPeriod)?;

        let decayed: Vec<(Competitor, RatingDistribution)> = inactive
            .par_iter()
            .map(|competitor| {
                let prior = tracker
                    .get_rating(previous, competitor)
                    .ok_or_else(|| RatingError::MissingPrior {
                        competitor: competitor.clone(),
                        period: previous
                    })?
                    .distribution;

                let decayed = family.decay(&prior, tracker.observations(competitor))?;
                Ok((competitor.clone(), decayed))
            })
            .collect::<Result<Vec<_>, RatingError>>()?;

        for (competitor, rating) in decayed {
            trace!(period, %competitor, mean = rating.mean(), variance = rating.variance(), "Decayed");
            self.rating_tracker.finalize(&competitor, rating, UpdateKind::Decayed)?;
        }

        Ok(())
    }

    pub fn ratings(&self) -> &RatingTable {
        self.rating_tracker.table()
    }
}

/// Union of both sides of every match, in order of appearance
pub fn active_competitors(matches: &[Match]) -> IndexSet<Competitor> {
    let mut active = IndexSet::new();
    for m in matches {
        active.insert(m.competitor_a.clone());
        active.insert(m.competitor_b.clone());
    }

    active
}

/// Position of the competitor in the known-set, used as its RNG stream slot
fn competitor_slot(known: &IndexSet<Competitor>, competitor: &str, period: Period) -> Result<u64, RatingError> {
    known
        .get_index_of(competitor)
        .map(|i| i as u64)
        .ok_or_else(|| RatingError::MissingPrior {
            competitor: competitor.to_string(),
            period
        })
}

/// Independent, reproducible RNG for one (period, domain, slot)
fn stream_rng(seed: u64, period_index: u64, domain: u64, slot: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed ^ period_index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    rng.set_stream((domain << 63) | slot);

    rng
}
