use std::{io, path::Path};

use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    model::{constants::MAX_SCORE, structures::match_record::Period},
    store::match_store::{MatchStore, StoreError}
};

#[derive(Debug, Deserialize)]
struct MatchRow {
    #[serde(rename = "Year")]
    year: Period,
    #[serde(rename = "Player1")]
    player_1: String,
    #[serde(rename = "Player2")]
    player_2: String,
    #[serde(rename = "Score1")]
    score_1: String,
    #[serde(rename = "Score2")]
    score_2: String,
    #[serde(rename = "Country1", default)]
    country_1: Option<String>,
    #[serde(rename = "Country2", default)]
    country_2: Option<String>
}

/// Raises both scores so the higher one reaches `MAX_SCORE`, for matches
/// that ended before either side got there. A 0-0 becomes a 15-15 draw.
pub fn pad_scores(score_a: f64, score_b: f64) -> (f64, f64) {
    if score_a < MAX_SCORE && score_b < MAX_SCORE {
        let diff = MAX_SCORE - score_a.max(score_b);
        return (score_a + diff, score_b + diff);
    }

    (score_a, score_b)
}

pub fn read_csv(path: &Path, pad: bool) -> Result<MatchStore, StoreError> {
    info!("Reading matches from {}", path.display());
    let file = std::fs::File::open(path)?;

    read_csv_from(file, pad)
}

/// Reads `Year, Player1, Player2, Score1, Score2[, Country1, Country2]` rows
pub fn read_csv_from<R: io::Read>(reader: R, pad: bool) -> Result<MatchStore, StoreError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut store = MatchStore::new();

    for (index, row) in reader.deserialize::<MatchRow>().enumerate() {
        let row = row?;
        // 1-based, after the header line
        let line = index + 2;

        if row.player_1.is_empty() || row.player_2.is_empty() {
            return Err(StoreError::MissingCompetitor { row: line });
        }

        let score_1 = parse_score(&row.score_1, "Score1", line)?;
        let score_2 = parse_score(&row.score_2, "Score2", line)?;
        let (score_1, score_2) = if pad {
            pad_scores(score_1, score_2)
        } else {
            (score_1, score_2)
        };

        if let Some(country) = row.country_1.as_deref().filter(|c| !c.is_empty()) {
            store.set_country(&row.player_1, country);
        }
        if let Some(country) = row.country_2.as_deref().filter(|c| !c.is_empty()) {
            store.set_country(&row.player_2, country);
        }

        store.insert(row.year, index, &row.player_1, &row.player_2, score_1, score_2);
    }

    info!(
        "Read {} matches across {} periods",
        store.match_count(),
        store.period_data.len()
    );
    debug!(competitors = store.athlete_data.len(), "Match store built");

    Ok(store)
}

fn parse_score(value: &str, field: &'static str, row: usize) -> Result<f64, StoreError> {
    let invalid = || StoreError::InvalidScore {
        row,
        field,
        value: value.to_string()
    };

    let score: f64 = value.parse().map_err(|_| invalid())?;
    if !score.is_finite() {
        return Err(invalid());
    }
    if score < 0.0 {
        return Err(StoreError::NegativeScore { row, field, value: score });
    }

    Ok(score)
}

#[cfg(test)]
mod tests {
    use crate::store::{
        csv_reader::{pad_scores, read_csv_from},
        match_store::StoreError
    };

    const DATA: &str = "\
Year,Player1,Player2,Score1,Score2,Country1,Country2
2019,Alice,Bob,15,10,NZ,AU
2019,Bob,Cara,12,15,AU,NZ
2020,Alice,Cara,8,11,NZ,NZ
";

    #[test]
    fn test_pad_scores() {
        assert_eq!(pad_scores(8.0, 11.0), (12.0, 15.0));
        assert_eq!(pad_scores(15.0, 10.0), (15.0, 10.0));
        assert_eq!(pad_scores(0.0, 0.0), (15.0, 15.0));
    }

    #[test]
    fn test_read_rows() {
        let store = read_csv_from(DATA.as_bytes(), false).unwrap();

        assert_eq!(store.match_count(), 3);
        assert_eq!(store.periods().collect::<Vec<_>>(), vec![2019, 2020]);
        assert_eq!(store.country("Alice"), Some("NZ"));
        assert_eq!(store.periods_played("Cara"), vec![2019, 2020]);

        let matches = store.matches(2020).unwrap();
        assert_eq!(matches[0].index, 2);
        assert_eq!((matches[0].score_a, matches[0].score_b), (8.0, 11.0));
    }

    #[test]
    fn test_read_rows_padded() {
        let store = read_csv_from(DATA.as_bytes(), true).unwrap();

        let matches = store.matches(2020).unwrap();
        assert_eq!((matches[0].score_a, matches[0].score_b), (12.0, 15.0));
    }

    #[test]
    fn test_countries_optional() {
        let data = "Year,Player1,Player2,Score1,Score2\n2019,Alice,Bob,15,10\n";
        let store = read_csv_from(data.as_bytes(), false).unwrap();

        assert_eq!(store.country("Alice"), None);
        assert_eq!(store.match_count(), 1);
    }

    #[test]
    fn test_non_numeric_score() {
        let data = "Year,Player1,Player2,Score1,Score2\n2019,Alice,Bob,15,10\n2019,Alice,Bob,fifteen,10\n";

        let result = read_csv_from(data.as_bytes(), false);

        assert!(matches!(
            result,
            Err(StoreError::InvalidScore { row: 3, field: "Score1", .. })
        ));
    }

    #[test]
    fn test_negative_score() {
        let data = "Year,Player1,Player2,Score1,Score2\n2019,Alice,Bob,15,-1\n";

        assert!(matches!(
            read_csv_from(data.as_bytes(), false),
            Err(StoreError::NegativeScore { row: 2, .. })
        ));
    }

    #[test]
    fn test_non_finite_score() {
        for value in ["NaN", "inf"] {
            let data = format!("Year,Player1,Player2,Score1,Score2\n2019,Alice,Bob,15,{value}\n");

            let result = read_csv_from(data.as_bytes(), false);

            assert!(matches!(
                result,
                Err(StoreError::InvalidScore { row: 2, field: "Score2", .. })
            ));
        }
    }

    #[test]
    fn test_missing_column() {
        let data = "Year,Player1,Score1,Score2\n2019,Alice,15,10\n";

        assert!(matches!(read_csv_from(data.as_bytes(), false), Err(StoreError::Csv(_))));
    }
}
