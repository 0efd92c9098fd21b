use std::collections::{BTreeMap, HashMap};

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::model::{
    error::RatingError,
    structures::{
        distribution::RatingDistribution,
        match_record::{Competitor, Period},
        update_kind::UpdateKind
    }
};

/// A competitor's rating for one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub distribution: RatingDistribution,
    pub kind: UpdateKind
}

/// Period -> (Competitor -> record). Competitors keep their first-seen order.
pub type RatingTable = BTreeMap<Period, IndexMap<Competitor, RatingRecord>>;

/// Holds every period's ratings plus the cross-period counters.
///
/// A record for `(period, competitor)` is written once when the period is opened
/// (seeded or carried forward) and once when it is finalized. Finalized records
/// are never written again.
pub struct RatingTracker {
    table: RatingTable,
    // Every competitor seen so far, in order of first appearance
    known: IndexSet<Competitor>,
    // Matches played to date, across all periods
    observations: HashMap<Competitor, u32>,
    current: Option<Period>,
    previous: Option<Period>
}

impl Default for RatingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingTracker {
    pub fn new() -> RatingTracker {
        RatingTracker {
            table: BTreeMap::new(),
            known: IndexSet::new(),
            observations: HashMap::new(),
            current: None,
            previous: None
        }
    }

    /// Opens `period`: registers newly active competitors and writes an initial record
    /// for every known competitor, carried from the previous period when present.
    pub fn open_period<'a>(
        &mut self,
        period: Period,
        active: impl IntoIterator<Item = &'a Competitor>,
        prior: RatingDistribution
    ) -> Result<(), RatingError> {
        if let Some(last) = self.current {
            if period <= last {
                return Err(RatingError::PeriodOutOfOrder { period, last });
            }
        }

        for competitor in active {
            if !self.known.contains(competitor) {
                self.known.insert(competitor.clone());
            }
        }

        let previous = self.current.and_then(|p| self.table.get(&p));
        let mut records = IndexMap::with_capacity(self.known.len());
        for competitor in &self.known {
            let record = match previous.and_then(|records| records.get(competitor)) {
                Some(carried) => RatingRecord {
                    distribution: carried.distribution,
                    kind: UpdateKind::Carried
                },
                None => RatingRecord {
                    distribution: prior,
                    kind: UpdateKind::Initial
                }
            };

            records.insert(competitor.clone(), record);
        }

        self.table.insert(period, records);
        self.previous = self.current;
        self.current = Some(period);

        Ok(())
    }

    /// Writes the final record of `competitor` for the current period
    pub fn finalize(
        &mut self,
        competitor: &str,
        distribution: RatingDistribution,
        kind: UpdateKind
    ) -> Result<(), RatingError> {
        let period = self.current.ok_or(RatingError::NoOpenPeriod)?;
        let record = self
            .table
            .get_mut(&period)
            .and_then(|records| records.get_mut(competitor))
            .ok_or_else(|| RatingError::MissingPrior {
                competitor: competitor.to_string(),
                period
            })?;

        if record.kind.is_final() {
            return Err(RatingError::AlreadyFinalized {
                competitor: competitor.to_string(),
                period
            });
        }

        *record = RatingRecord { distribution, kind };
        Ok(())
    }

    pub fn record_observation(&mut self, competitor: &str) {
        *self.observations.entry(competitor.to_string()).or_insert(0) += 1;
    }

    pub fn observations(&self, competitor: &str) -> u32 {
        self.observations.get(competitor).copied().unwrap_or(0)
    }

    /// Returns the competitor's record for the given period
    pub fn get_rating(&self, period: Period, competitor: &str) -> Option<&RatingRecord> {
        self.table.get(&period).and_then(|records| records.get(competitor))
    }

    /// Rating used as input while the current period is processed: the previous
    /// period's finalized record, if any.
    pub fn prior_rating(&self, competitor: &str) -> Option<&RatingRecord> {
        self.previous.and_then(|p| self.get_rating(p, competitor))
    }

    pub fn previous_period(&self) -> Option<Period> {
        self.previous
    }

    pub fn known(&self) -> &IndexSet<Competitor> {
        &self.known
    }

    pub fn table(&self) -> &RatingTable {
        &self.table
    }

    pub fn into_table(self) -> RatingTable {
        self.table
    }
}
