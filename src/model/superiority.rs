use rand::Rng;
use rand_distr::{Distribution, Gamma, Normal};
use statrs::distribution::{ContinuousCDF, Normal as NormalCdf};

use crate::model::{
    error::RatingError,
    structures::{distribution::RatingDistribution, family::Family}
};

/// Estimates P(X > Y) for X drawn from `a` and Y drawn from `b`.
pub trait SuperiorityEstimator: Send + Sync {
    fn probability_of_superiority(
        &self,
        a: &RatingDistribution,
        b: &RatingDistribution,
        rng: &mut dyn rand::RngCore
    ) -> Result<f64, RatingError>;
}

/// Draws `samples` values from each side and compares them pairwise
pub struct MonteCarloSuperiority {
    pub samples: usize
}

impl MonteCarloSuperiority {
    pub fn new(samples: usize) -> MonteCarloSuperiority {
        MonteCarloSuperiority { samples }
    }
}

impl SuperiorityEstimator for MonteCarloSuperiority {
    fn probability_of_superiority(
        &self,
        a: &RatingDistribution,
        b: &RatingDistribution,
        rng: &mut dyn rand::RngCore
    ) -> Result<f64, RatingError> {
        let sampler_a = Sampler::new(a)?;
        let sampler_b = Sampler::new(b)?;

        let mut wins = 0usize;
        for _ in 0..self.samples {
            let x = sampler_a.sample(rng);
            let y = sampler_b.sample(rng);
            if x > y {
                wins += 1;
            }
        }

        Ok(wins as f64 / self.samples as f64)
    }
}

/// Exact P(X > Y) for two Gaussian ratings: Φ((μa − μb) / √(σa² + σb²))
pub struct NormalSuperiority;

impl SuperiorityEstimator for NormalSuperiority {
    fn probability_of_superiority(
        &self,
        a: &RatingDistribution,
        b: &RatingDistribution,
        _rng: &mut dyn rand::RngCore
    ) -> Result<f64, RatingError> {
        a.expect_family(Family::Gaussian)?;
        b.expect_family(Family::Gaussian)?;

        let spread = (a.variance() + b.variance()).sqrt();
        let standard = NormalCdf::new(0.0, 1.0).map_err(|_| RatingError::InvalidDistribution {
            family: Family::Gaussian,
            first: 0.0,
            second: 1.0
        })?;

        Ok(standard.cdf((a.mean() - b.mean()) / spread))
    }
}

enum Sampler {
    Normal(Normal<f64>),
    Gamma(Gamma<f64>)
}

impl Sampler {
    fn new(distribution: &RatingDistribution) -> Result<Sampler, RatingError> {
        let invalid = || {
            let (first, second) = distribution.params();
            RatingError::InvalidDistribution {
                family: distribution.family(),
                first,
                second
            }
        };

        match *distribution {
            RatingDistribution::Gaussian { mean, variance } => {
                Normal::new(mean, variance.sqrt()).map(Sampler::Normal).map_err(|_| invalid())
            }
            RatingDistribution::Gamma { shape, rate } => {
                Gamma::new(shape, 1.0 / rate).map(Sampler::Gamma).map_err(|_| invalid())
            }
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Sampler::Normal(d) => d.sample(rng),
            Sampler::Gamma(d) => d.sample(rng)
        }
    }
}
