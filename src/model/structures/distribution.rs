use serde::{Deserialize, Serialize};

use crate::model::{error::RatingError, structures::family::Family};

/// A competitor's skill belief, stored as the two sufficient statistics of its family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "lowercase")]
pub enum RatingDistribution {
    Gaussian { mean: f64, variance: f64 },
    Gamma { shape: f64, rate: f64 }
}

impl RatingDistribution {
    pub fn gaussian(mean: f64, variance: f64) -> Result<RatingDistribution, RatingError> {
        RatingDistribution::Gaussian { mean, variance }.validated()
    }

    pub fn gamma(shape: f64, rate: f64) -> Result<RatingDistribution, RatingError> {
        RatingDistribution::Gamma { shape, rate }.validated()
    }

    /// Builds a distribution of the given family with the given first two moments.
    /// For the Gamma family this inverts `mean = shape / rate`, `variance = shape / rate²`.
    pub fn from_moments(family: Family, mean: f64, variance: f64) -> Result<RatingDistribution, RatingError> {
        match family {
            Family::Gaussian => RatingDistribution::gaussian(mean, variance),
            Family::Gamma => RatingDistribution::gamma(mean * mean / variance, mean / variance)
        }
    }

    pub fn family(&self) -> Family {
        match self {
            RatingDistribution::Gaussian { .. } => Family::Gaussian,
            RatingDistribution::Gamma { .. } => Family::Gamma
        }
    }

    pub fn mean(&self) -> f64 {
        match *self {
            RatingDistribution::Gaussian { mean, .. } => mean,
            RatingDistribution::Gamma { shape, rate } => shape / rate
        }
    }

    pub fn variance(&self) -> f64 {
        match *self {
            RatingDistribution::Gaussian { variance, .. } => variance,
            RatingDistribution::Gamma { shape, rate } => shape / (rate * rate)
        }
    }

    /// The raw parameter pair: (mean, variance) or (shape, rate)
    pub fn params(&self) -> (f64, f64) {
        match *self {
            RatingDistribution::Gaussian { mean, variance } => (mean, variance),
            RatingDistribution::Gamma { shape, rate } => (shape, rate)
        }
    }

    pub fn expect_family(&self, expected: Family) -> Result<(), RatingError> {
        if self.family() != expected {
            return Err(RatingError::FamilyMismatch {
                expected,
                found: self.family()
            });
        }

        Ok(())
    }

    fn validated(self) -> Result<RatingDistribution, RatingError> {
        let (first, second) = self.params();
        let valid = match self {
            RatingDistribution::Gaussian { mean, variance } => mean.is_finite() && variance.is_finite() && variance > 0.0,
            RatingDistribution::Gamma { shape, rate } => {
                shape.is_finite() && rate.is_finite() && shape > 0.0 && rate > 0.0
            }
        };

        if !valid {
            return Err(RatingError::InvalidDistribution {
                family: self.family(),
                first,
                second
            });
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{
        error::RatingError,
        structures::{distribution::RatingDistribution, family::Family}
    };
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_gaussian_moments() {
        let d = RatingDistribution::gaussian(1.5, 4.0).unwrap();

        assert_eq!(d.family(), Family::Gaussian);
        assert_eq!(d.mean(), 1.5);
        assert_eq!(d.variance(), 4.0);
    }

    #[test]
    fn test_gamma_moments() {
        let d = RatingDistribution::gamma(6.0, 3.0).unwrap();

        assert_eq!(d.family(), Family::Gamma);
        assert_abs_diff_eq!(d.mean(), 2.0);
        assert_abs_diff_eq!(d.variance(), 6.0 / 9.0);
    }

    #[test]
    fn test_gamma_from_moments_inverts() {
        let d = RatingDistribution::from_moments(Family::Gamma, 2.0, 0.5).unwrap();

        assert_abs_diff_eq!(d.mean(), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(d.variance(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_variance() {
        assert!(matches!(
            RatingDistribution::gaussian(1.0, 0.0),
            Err(RatingError::InvalidDistribution { .. })
        ));
        assert!(RatingDistribution::gamma(-1.0, 1.0).is_err());
        assert!(RatingDistribution::gamma(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_expect_family() {
        let d = RatingDistribution::gaussian(1.0, 1.0).unwrap();

        assert!(d.expect_family(Family::Gaussian).is_ok());
        assert_eq!(
            d.expect_family(Family::Gamma),
            Err(RatingError::FamilyMismatch {
                expected: Family::Gamma,
                found: Family::Gaussian
            })
        );
    }
}
