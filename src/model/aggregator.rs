use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::{rating_tracker::RatingTable, structures::match_record::Competitor};

/// Per-period means and overall scores derived from a finished rating table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    /// Competitor -> posterior mean of every period holding a record, in period order
    pub averages: IndexMap<Competitor, Vec<f64>>,
    /// Competitor -> arithmetic mean of `averages`, in ranking order
    pub total_averages: IndexMap<Competitor, f64>
}

impl Standings {
    /// 1-based rank of a competitor
    pub fn rank(&self, competitor: &str) -> Option<usize> {
        self.total_averages.get_index_of(competitor).map(|i| i + 1)
    }
}

/// Collects each competitor's posterior means, in period order. Competitors
/// keep their order of first appearance.
pub fn period_averages(table: &RatingTable) -> IndexMap<Competitor, Vec<f64>> {
    let mut averages: IndexMap<Competitor, Vec<f64>> = IndexMap::new();

    for records in table.values() {
        for (competitor, record) in records {
            averages
                .entry(competitor.clone())
                .or_default()
                .push(record.distribution.mean());
        }
    }

    averages
}

/// Sorts competitors by overall score, descending. Equal scores are ordered by
/// competitor name so the ranking does not depend on input order.
pub fn rank(averages: &IndexMap<Competitor, Vec<f64>>) -> IndexMap<Competitor, f64> {
    averages
        .iter()
        .filter(|(_, means)| !means.is_empty())
        .map(|(competitor, means)| (competitor.clone(), means.iter().sum::<f64>() / means.len() as f64))
        .sorted_by(|(name_a, score_a), (name_b, score_b)| {
            score_b.total_cmp(score_a).then_with(|| name_a.cmp(name_b))
        })
        .collect()
}

pub fn standings(table: &RatingTable) -> Standings {
    let averages = period_averages(table);
    let total_averages = rank(&averages);

    Standings {
        averages,
        total_averages
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        aggregator::{period_averages, rank, standings},
        rating_tracker::{RatingRecord, RatingTable},
        structures::{distribution::RatingDistribution, update_kind::UpdateKind}
    };
    use approx::assert_abs_diff_eq;
    use indexmap::IndexMap;

    fn record(mean: f64) -> RatingRecord {
        RatingRecord {
            distribution: RatingDistribution::Gaussian { mean, variance: 1.0 },
            kind: UpdateKind::Observed
        }
    }

    fn table() -> RatingTable {
        let mut table = RatingTable::new();
        table.insert(2000, IndexMap::from([("a".to_string(), record(1.0)), ("b".to_string(), record(0.5))]));
        table.insert(
            2001,
            IndexMap::from([
                ("a".to_string(), record(2.0)),
                ("b".to_string(), record(0.7)),
                ("c".to_string(), record(1.2)),
            ])
        );
        table
    }

    #[test]
    fn test_period_averages_follow_records() {
        let averages = period_averages(&table());

        assert_eq!(averages["a"], vec![1.0, 2.0]);
        assert_eq!(averages["b"], vec![0.5, 0.7]);
        // c has no record in 2000, so only one value
        assert_eq!(averages["c"], vec![1.2]);
    }

    #[test]
    fn test_rank_descending() {
        let result = standings(&table());
        let order: Vec<_> = result.total_averages.keys().cloned().collect();

        assert_eq!(order, vec!["a", "c", "b"]);
        assert_abs_diff_eq!(result.total_averages["a"], 1.5);
        assert_abs_diff_eq!(result.total_averages["b"], 0.6);
        assert_eq!(result.rank("c"), Some(2));
        assert_eq!(result.rank("z"), None);
    }

    #[test]
    fn test_rank_ties_break_by_name() {
        let averages = IndexMap::from([
            ("zed".to_string(), vec![1.0]),
            ("amy".to_string(), vec![0.5, 1.5]),
            ("bob".to_string(), vec![2.0]),
        ]);

        let order: Vec<_> = rank(&averages).keys().cloned().collect();

        assert_eq!(order, vec!["bob", "amy", "zed"]);
    }
}
