use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf}
};

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{model::RatingOutcome, store::MatchStore};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize ratings: {0}")]
    Serialization(#[from] serde_json::Error)
}

/// Files written for one run
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub id: String,
    pub rankings: PathBuf,
    pub performance_values: PathBuf,
    pub ratings: PathBuf
}

impl ReportPaths {
    pub fn new(destination: &Path, id: &str) -> ReportPaths {
        ReportPaths {
            id: id.to_string(),
            rankings: destination.join(format!("rankings_{id}.txt")),
            performance_values: destination.join(format!("performance_values_{id}.txt")),
            ratings: destination.join(format!("ratings_{id}.json"))
        }
    }
}

/// `rank name: score`, one line per competitor in ranking order
pub fn rankings_text(outcome: &RatingOutcome) -> String {
    let mut text = String::new();
    for (i, (competitor, score)) in outcome.standings.total_averages.iter().enumerate() {
        let _ = writeln!(text, "{} {}: {}", i + 1, competitor, score);
    }

    text
}

/// Per competitor: `name (country)` followed by `period: mean` for every period with a record
pub fn performance_text(outcome: &RatingOutcome, store: &MatchStore) -> String {
    let mut text = String::new();
    for competitor in outcome.standings.averages.keys() {
        let country = store.country(competitor).unwrap_or("");
        let _ = writeln!(text, "{} ({})", competitor, country);

        for (period, records) in &outcome.ratings {
            if let Some(record) = records.get(competitor) {
                let _ = writeln!(text, "{}: {}", period, record.distribution.mean());
            }
        }

        text.push('\n');
    }

    text
}

/// Writes the ranking, per-period values and full rating table under a fresh run id
pub fn write_reports(outcome: &RatingOutcome, store: &MatchStore, destination: &Path) -> Result<ReportPaths, ReportError> {
    fs::create_dir_all(destination)?;

    let id = Uuid::new_v4().simple().to_string();
    let paths = ReportPaths::new(destination, &id[..8]);
    info!("Task {}", paths.id);

    fs::write(&paths.rankings, rankings_text(outcome))?;
    info!("Saved rankings to {}", paths.rankings.display());

    fs::write(&paths.performance_values, performance_text(outcome, store))?;
    info!("Saved performance values to {}", paths.performance_values.display());

    fs::write(&paths.ratings, serde_json::to_string_pretty(outcome)?)?;
    info!("Saved ratings to {}", paths.ratings.display());

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use crate::{
        model::{rate, RatingOutcome},
        report::{performance_text, rankings_text, write_reports},
        store::read_csv_from,
        utils::test_utils::noise_free_config
    };
    use std::fs;

    const DATA: &str = "\
Year,Player1,Player2,Score1,Score2,Country1,Country2
2019,Alice,Bob,15,10,NZ,AU
2020,Alice,Cara,15,11,NZ,NZ
";

    fn outcome() -> (RatingOutcome, crate::store::MatchStore) {
        let store = read_csv_from(DATA.as_bytes(), false).unwrap();
        let outcome = rate(&store.resolved_periods().unwrap(), &noise_free_config()).unwrap();
        (outcome, store)
    }

    #[test]
    fn test_rankings_text() {
        let (outcome, _) = outcome();
        let text = rankings_text(&outcome);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("1 Alice: "));
    }

    #[test]
    fn test_performance_text_lists_periods_with_records() {
        let (outcome, store) = outcome();
        let text = performance_text(&outcome, &store);

        assert!(text.contains("Bob (AU)\n2019: "));
        // Bob was decayed in 2020 and still has a record
        assert_eq!(text.matches("2020: ").count(), 3);
        // Cara only exists from 2020 on
        assert!(text.contains("Cara (NZ)\n2020: "));
    }

    #[test]
    fn test_write_reports() {
        let (outcome, store) = outcome();
        let dir = tempfile::tempdir().unwrap();

        let paths = write_reports(&outcome, &store, dir.path()).unwrap();

        assert!(paths.rankings.exists());
        assert!(paths.performance_values.exists());

        let json = fs::read_to_string(&paths.ratings).unwrap();
        let parsed: RatingOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.standings.total_averages.len(), 3);
    }
}
