use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path, str::FromStr};
use thiserror::Error;
use tracing::warn;

use crate::model::{
    constants,
    error::RatingError,
    structures::{distribution::RatingDistribution, family::Family}
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Environment variable {name} has an invalid value '{value}'")]
    InvalidVariable { name: String, value: String },

    #[error(transparent)]
    Invalid(#[from] RatingError)
}

/// Tunable constants of the non-observation update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// κ, scale of the mean shift
    pub mean_scale: f64,
    /// c₁, offset damping the mean shift for small histories
    pub mean_offset: f64,
    /// κ', scale of the variance inflation
    pub variance_scale: f64,
    /// c₂, offset damping the variance inflation for small histories
    pub variance_offset: f64,
    /// h, exponential confidence decay per period
    pub rate: f64,
    /// d, step size of the mean shift
    pub step: f64
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            mean_scale: constants::MEAN_DECAY_SCALE,
            mean_offset: constants::MEAN_DECAY_OFFSET,
            variance_scale: constants::VARIANCE_DECAY_SCALE,
            variance_offset: constants::VARIANCE_DECAY_OFFSET,
            rate: constants::DECAY_RATE,
            step: constants::DECAY_STEP
        }
    }
}

/// Everything the engine needs for a run. Passed explicitly to every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub family: Family,
    /// Rating given to a competitor the first time they are seen
    pub prior: RatingDistribution,
    /// Ceiling `C` of observable performance indicators
    pub max_observation: f64,
    pub decay: DecayConfig,
    /// Standard deviation of the jitter added to indicators before fusion. Zero disables it.
    pub noise_stddev: f64,
    /// Sample variance used when a competitor has a single indicator in a period
    pub single_observation_variance: f64,
    /// Lower bound on posterior variance
    pub variance_floor: f64,
    /// Draws per side for the probability-of-superiority estimate
    pub monte_carlo_samples: usize,
    pub seed: u64
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self::for_family(Family::Gaussian)
    }
}

impl RatingConfig {
    /// Default configuration for the given family
    pub fn for_family(family: Family) -> Self {
        Self {
            family,
            prior: default_prior(family),
            max_observation: constants::MAX_OBSERVATION,
            decay: DecayConfig::default(),
            noise_stddev: constants::NOISE_STDDEV,
            single_observation_variance: constants::SINGLE_OBSERVATION_VARIANCE,
            variance_floor: constants::VARIANCE_FLOOR,
            monte_carlo_samples: constants::MONTE_CARLO_SAMPLES,
            seed: constants::DEFAULT_SEED
        }
    }

    /// Loads a configuration from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: RatingConfig = serde_json::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    /// Creates a configuration from the defaults, overridden by `RATING_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let family = parse_var("RATING_FAMILY")?.unwrap_or_default();
        let mut config = Self::for_family(family);

        let (default_first, default_second) = config.prior.params();
        let first = parse_var("RATING_PRIOR_FIRST")?.unwrap_or(default_first);
        let second = parse_var("RATING_PRIOR_SECOND")?.unwrap_or(default_second);
        config.prior = match family {
            Family::Gaussian => RatingDistribution::gaussian(first, second)?,
            Family::Gamma => RatingDistribution::gamma(first, second)?
        };

        if let Some(v) = parse_var("RATING_MAX_OBSERVATION")? {
            config.max_observation = v;
        }
        if let Some(v) = parse_var("RATING_NOISE_STDDEV")? {
            config.noise_stddev = v;
        }
        if let Some(v) = parse_var("RATING_MONTE_CARLO_SAMPLES")? {
            config.monte_carlo_samples = v;
        }
        if let Some(v) = parse_var("RATING_SEED")? {
            config.seed = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RatingError> {
        self.prior.expect_family(self.family)?;
        // Re-run the family's own parameter checks
        let (first, second) = self.prior.params();
        match self.family {
            Family::Gaussian => RatingDistribution::gaussian(first, second)?,
            Family::Gamma => RatingDistribution::gamma(first, second)?
        };

        if !(self.noise_stddev >= 0.0 && self.noise_stddev.is_finite()) {
            return Err(RatingError::InvalidConfig(format!(
                "noise_stddev must be a non-negative number, found {}",
                self.noise_stddev
            )));
        }
        if !(self.single_observation_variance > 0.0) {
            return Err(RatingError::InvalidConfig(
                "single_observation_variance must be positive".to_string()
            ));
        }
        if !(self.variance_floor > 0.0) {
            return Err(RatingError::InvalidConfig("variance_floor must be positive".to_string()));
        }
        if self.monte_carlo_samples == 0 {
            return Err(RatingError::InvalidConfig(
                "monte_carlo_samples must be at least 1".to_string()
            ));
        }
        if self.below_recommended_samples() {
            warn!(
                samples = self.monte_carlo_samples,
                recommended = constants::MONTE_CARLO_SAMPLES,
                "Monte Carlo sample count is below the recommended minimum"
            );
        }
        if !self.max_observation.is_finite() {
            return Err(RatingError::InvalidConfig("max_observation must be finite".to_string()));
        }
        if self.decay.mean_offset == 0.0 || self.decay.variance_offset == 0.0 {
            // Both offsets keep the decay finite for competitors with no matches
            return Err(RatingError::InvalidConfig("decay offsets must be non-zero".to_string()));
        }

        Ok(())
    }

    /// Gamma runs estimate superiority by sampling and need at least `MONTE_CARLO_SAMPLES` draws
    pub fn below_recommended_samples(&self) -> bool {
        self.family == Family::Gamma && self.monte_carlo_samples < constants::MONTE_CARLO_SAMPLES
    }
}

pub fn default_prior(family: Family) -> RatingDistribution {
    match family {
        Family::Gaussian => RatingDistribution::Gaussian {
            mean: constants::PRIOR_MEAN,
            variance: constants::PRIOR_VARIANCE
        },
        Family::Gamma => RatingDistribution::Gamma {
            shape: constants::PRIOR_SHAPE,
            rate: constants::PRIOR_RATE
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVariable {
                name: name.to_string(),
                value
            }),
        Err(_) => Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn cleanup_env_vars() {
        for name in [
            "RATING_FAMILY",
            "RATING_PRIOR_FIRST",
            "RATING_PRIOR_SECOND",
            "RATING_MAX_OBSERVATION",
            "RATING_NOISE_STDDEV",
            "RATING_MONTE_CARLO_SAMPLES",
            "RATING_SEED"
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_default_is_valid() {
        let config = RatingConfig::default();

        assert_eq!(config.family, Family::Gaussian);
        assert_eq!(config.prior, RatingDistribution::Gaussian { mean: 1.0, variance: 10.0 });
        assert!(config.validate().is_ok());
        assert!(RatingConfig::for_family(Family::Gamma).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_prior() {
        let config = RatingConfig {
            prior: default_prior(Family::Gamma),
            ..RatingConfig::default()
        };

        assert!(matches!(config.validate(), Err(RatingError::FamilyMismatch { .. })));
    }

    #[test]
    fn test_validate_rejects_negative_noise() {
        let config = RatingConfig {
            noise_stddev: -0.1,
            ..RatingConfig::default()
        };

        assert!(matches!(config.validate(), Err(RatingError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_zero_samples() {
        let config = RatingConfig {
            monte_carlo_samples: 0,
            ..RatingConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_low_sample_count_flagged_for_gamma() {
        let low = RatingConfig {
            monte_carlo_samples: 500,
            ..RatingConfig::for_family(Family::Gamma)
        };

        assert!(low.below_recommended_samples());
        assert!(low.validate().is_ok());
        assert!(!RatingConfig::for_family(Family::Gamma).below_recommended_samples());
        // Gaussian runs never sample
        assert!(!RatingConfig {
            monte_carlo_samples: 500,
            ..RatingConfig::default()
        }
        .below_recommended_samples());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        cleanup_env_vars();

        let config = RatingConfig::from_env().unwrap();
        assert_eq!(config, RatingConfig::default());
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        cleanup_env_vars();

        env::set_var("RATING_FAMILY", "gamma");
        env::set_var("RATING_PRIOR_FIRST", "2.0");
        env::set_var("RATING_PRIOR_SECOND", "4.0");
        env::set_var("RATING_SEED", "7");

        let config = RatingConfig::from_env().unwrap();
        cleanup_env_vars();

        assert_eq!(config.family, Family::Gamma);
        assert_eq!(config.prior, RatingDistribution::Gamma { shape: 2.0, rate: 4.0 });
        assert_eq!(config.seed, 7);
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_value() {
        cleanup_env_vars();

        env::set_var("RATING_SEED", "not-a-number");
        let result = RatingConfig::from_env();
        cleanup_env_vars();

        assert!(matches!(result, Err(ConfigError::InvalidVariable { .. })));
    }

    #[test]
    fn test_from_json_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "seed": 9, "noise_stddev": 0.0 }"#).unwrap();

        let config = RatingConfig::from_json_file(&path).unwrap();

        assert_eq!(config.seed, 9);
        assert_eq!(config.noise_stddev, 0.0);
        assert_eq!(config.prior, RatingConfig::default().prior);
    }
}
