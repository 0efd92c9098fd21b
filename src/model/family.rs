use rand::RngCore;

use crate::{
    config::{DecayConfig, RatingConfig},
    model::{
        conjugate::{gamma_update, gaussian_update, FusionParams},
        decay::decay,
        error::RatingError,
        structures::{distribution::RatingDistribution, family::Family},
        superiority::{MonteCarloSuperiority, SuperiorityEstimator}
    }
};

/// The three family-specific steps of a period. The scheduling around them
/// is shared by every family.
pub trait RatingFamily: Send + Sync {
    fn family(&self) -> Family;

    /// Returns `(strength credited to A, strength credited to B)`: the opponent
    /// term each side multiplies its win indicator with.
    fn opponent_terms(
        &self,
        a: &RatingDistribution,
        b: &RatingDistribution,
        rng: &mut dyn RngCore
    ) -> Result<(f64, f64), RatingError>;

    /// Posterior for a competitor observed in the period. `indicators` is never empty.
    fn conjugate_update(
        &self,
        prior: &RatingDistribution,
        indicators: &[f64],
        rng: &mut dyn RngCore
    ) -> Result<RatingDistribution, RatingError>;

    /// Record for a known competitor without matches in the period
    fn decay(&self, prior: &RatingDistribution, observations: u32) -> Result<RatingDistribution, RatingError>;
}

/// Builds the strategy selected by the configuration
pub fn family_for(config: &RatingConfig) -> Box<dyn RatingFamily> {
    match config.family {
        Family::Gaussian => Box::new(GaussianFamily::new(config)),
        Family::Gamma => Box::new(GammaFamily::new(
            config,
            Box::new(MonteCarloSuperiority::new(config.monte_carlo_samples))
        ))
    }
}

pub struct GaussianFamily {
    fusion: FusionParams,
    max_observation: f64,
    decay: DecayConfig
}

impl GaussianFamily {
    pub fn new(config: &RatingConfig) -> GaussianFamily {
        GaussianFamily {
            fusion: FusionParams {
                noise_stddev: config.noise_stddev,
                single_observation_variance: config.single_observation_variance,
                variance_floor: config.variance_floor
            },
            max_observation: config.max_observation,
            decay: config.decay
        }
    }
}

impl RatingFamily for GaussianFamily {
    fn family(&self) -> Family {
        Family::Gaussian
    }

    /// The mean is a location parameter, so each side is credited with the opponent's raw mean.
    fn opponent_terms(
        &self,
        a: &RatingDistribution,
        b: &RatingDistribution,
        _rng: &mut dyn RngCore
    ) -> Result<(f64, f64), RatingError> {
        a.expect_family(Family::Gaussian)?;
        b.expect_family(Family::Gaussian)?;

        Ok((b.mean(), a.mean()))
    }

    fn conjugate_update(
        &self,
        prior: &RatingDistribution,
        indicators: &[f64],
        rng: &mut dyn RngCore
    ) -> Result<RatingDistribution, RatingError> {
        prior.expect_family(Family::Gaussian)?;
        let (prior_mean, prior_variance) = prior.params();
        let (mean, variance) = gaussian_update(prior_mean, prior_variance, indicators, &self.fusion, rng);

        RatingDistribution::gaussian(mean, variance)
    }

    fn decay(&self, prior: &RatingDistribution, observations: u32) -> Result<RatingDistribution, RatingError> {
        prior.expect_family(Family::Gaussian)?;

        decay(prior, observations, self.max_observation, &self.decay)
    }
}

pub struct GammaFamily {
    estimator: Box<dyn SuperiorityEstimator>,
    max_observation: f64,
    decay: DecayConfig
}

impl GammaFamily {
    pub fn new(config: &RatingConfig, estimator: Box<dyn SuperiorityEstimator>) -> GammaFamily {
        GammaFamily {
            estimator,
            max_observation: config.max_observation,
            decay: config.decay
        }
    }
}

impl RatingFamily for GammaFamily {
    fn family(&self) -> Family {
        Family::Gamma
    }

    /// With `p = P(A > B)`, A is credited with `1 - p` (the chance B is the stronger side)
    /// and B with `p`.
    fn opponent_terms(
        &self,
        a: &RatingDistribution,
        b: &RatingDistribution,
        rng: &mut dyn RngCore
    ) -> Result<(f64, f64), RatingError> {
        a.expect_family(Family::Gamma)?;
        b.expect_family(Family::Gamma)?;

        let p = self.estimator.probability_of_superiority(a, b, rng)?;

        Ok((1.0 - p, p))
    }

    fn conjugate_update(
        &self,
        prior: &RatingDistribution,
        indicators: &[f64],
        _rng: &mut dyn RngCore
    ) -> Result<RatingDistribution, RatingError> {
        prior.expect_family(Family::Gamma)?;
        let (prior_shape, prior_rate) = prior.params();
        let (shape, rate) = gamma_update(prior_shape, prior_rate, indicators);

        RatingDistribution::gamma(shape, rate)
    }

    fn decay(&self, prior: &RatingDistribution, observations: u32) -> Result<RatingDistribution, RatingError> {
        prior.expect_family(Family::Gamma)?;

        decay(prior, observations, self.max_observation, &self.decay)
    }
}
