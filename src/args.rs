use std::path::PathBuf;

use clap::Parser;

use crate::{
    config::{default_prior, ConfigError, RatingConfig},
    model::structures::{distribution::RatingDistribution, family::Family}
};

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "Period Rating",
    long_about = "Rates competitors period by period from head-to-head match results"
)]
pub struct Args {
    /// CSV file with the columns Year, Player1, Player2, Score1, Score2
    /// and optionally Country1, Country2
    #[arg(short, long, env = "RATING_FILE", help = "Path to the match data file")]
    pub file: PathBuf,

    #[arg(short, long, env = "RATING_DESTINATION", help = "Directory for the generated reports")]
    pub destination: PathBuf,

    /// JSON file with any subset of the rating configuration.
    /// When absent, the configuration is read from RATING_* environment variables.
    #[arg(short, long, help = "Path to a rating configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Distribution family (gaussian, gamma)")]
    pub family: Option<Family>,

    #[arg(long, help = "Mean of the Gaussian prior")]
    pub prior_mean: Option<f64>,

    #[arg(long, help = "Variance of the Gaussian prior")]
    pub prior_variance: Option<f64>,

    #[arg(long, help = "Shape of the Gamma prior")]
    pub prior_shape: Option<f64>,

    #[arg(long, help = "Rate of the Gamma prior")]
    pub prior_rate: Option<f64>,

    #[arg(long, help = "Seed for the jitter and Monte Carlo draws")]
    pub seed: Option<u64>,

    /// Raises both scores of an unfinished match so the leader reaches 15
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub pad_scores: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}

impl Args {
    /// Base configuration (file or environment) with the command line overrides applied
    pub fn rating_config(&self) -> Result<RatingConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RatingConfig::from_json_file(path)?,
            None => RatingConfig::from_env()?
        };

        if let Some(family) = self.family {
            if family != config.family {
                config.family = family;
                config.prior = default_prior(family);
            }
        }

        let (first, second) = config.prior.params();
        config.prior = match config.family {
            Family::Gaussian => RatingDistribution::gaussian(
                self.prior_mean.unwrap_or(first),
                self.prior_variance.unwrap_or(second)
            )?,
            Family::Gamma => RatingDistribution::gamma(
                self.prior_shape.unwrap_or(first),
                self.prior_rate.unwrap_or(second)
            )?
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        args::Args,
        config::RatingConfig,
        model::structures::{distribution::RatingDistribution, family::Family}
    };
    use clap::Parser;
    use serial_test::serial;
    use std::fs;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["period-rating", "--file", "data.csv", "--destination", "out"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_minimal() {
        let args = parse(&[]);

        assert_eq!(args.file.to_str(), Some("data.csv"));
        assert!(!args.pad_scores);
        assert!(args.family.is_none());
    }

    #[test]
    fn test_rejects_unknown_family() {
        let result = Args::try_parse_from([
            "period-rating",
            "--file",
            "data.csv",
            "--destination",
            "out",
            "--family",
            "poisson"
        ]);

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_overrides_applied() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{}").unwrap();
        let path = path.to_str().unwrap().to_string();

        let args = parse(&["--config", &path, "--prior-mean", "1.5", "--seed", "3", "--pad-scores"]);
        let config = args.rating_config().unwrap();

        assert!(args.pad_scores);
        assert_eq!(config.prior, RatingDistribution::Gaussian { mean: 1.5, variance: 10.0 });
        assert_eq!(config.seed, 3);
    }

    #[test]
    #[serial]
    fn test_family_switch_resets_prior() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{}").unwrap();
        let path = path.to_str().unwrap().to_string();

        let args = parse(&["--config", &path, "--family", "gamma", "--prior-rate", "2"]);
        let config = args.rating_config().unwrap();

        assert_eq!(config.family, Family::Gamma);
        assert_eq!(config.prior, RatingDistribution::Gamma { shape: 1.0, rate: 2.0 });
        assert_ne!(config, RatingConfig::default());
    }
}
