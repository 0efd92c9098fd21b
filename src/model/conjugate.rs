use rand::RngCore;
use rand_distr::{Distribution, Normal};
use statrs::statistics::Statistics;

/// Parameters of the precision-weighted Gaussian fusion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionParams {
    pub noise_stddev: f64,
    pub single_observation_variance: f64,
    pub variance_floor: f64
}

/// Adds zero-mean Gaussian jitter to every indicator so that identical
/// observations never produce a zero sample variance.
pub fn add_noise(indicators: &[f64], noise_stddev: f64, rng: &mut dyn RngCore) -> Vec<f64> {
    // Normal::new only fails for a negative or non-finite deviation
    match Normal::new(0.0, noise_stddev) {
        Ok(noise) if noise_stddev > 0.0 => indicators.iter().map(|pi| pi + noise.sample(rng)).collect(),
        _ => indicators.to_vec()
    }
}

/// Returns (sample mean, sample variance, n).
/// A single observation has no sample variance, so the placeholder is used instead.
pub fn sample_summary(indicators: &[f64], single_observation_variance: f64) -> (f64, f64, usize) {
    let n = indicators.len();
    if n == 1 {
        return (indicators[0], single_observation_variance, n);
    }

    (indicators.mean(), indicators.variance(), n)
}

/// Normal-Normal conjugate update of `(mean, variance)` with the period's indicators.
///
/// Indicators must be non-empty.
pub fn gaussian_update(
    prior_mean: f64,
    prior_variance: f64,
    indicators: &[f64],
    params: &FusionParams,
    rng: &mut dyn RngCore
) -> (f64, f64) {
    let observations = add_noise(indicators, params.noise_stddev, rng);
    let (sample_mean, sample_variance, n) = sample_summary(&observations, params.single_observation_variance);

    // Identical indicators without jitter carry infinite precision
    if !(sample_variance > 0.0) {
        return (sample_mean, params.variance_floor);
    }

    let tau_prior = 1.0 / prior_variance;
    let tau_data = 1.0 / sample_variance;
    let weight = n as f64 * tau_data;

    let mean = (tau_prior * prior_mean + weight * sample_mean) / (tau_prior + weight);
    let variance = (1.0 / (tau_prior + weight)).max(params.variance_floor);

    (mean, variance)
}

/// Gamma conjugate update: every indicator adds one to the shape and its value to the rate
pub fn gamma_update(prior_shape: f64, prior_rate: f64, indicators: &[f64]) -> (f64, f64) {
    let shape = prior_shape + indicators.len() as f64;
    let rate = prior_rate + indicators.iter().sum::<f64>();

    (shape, rate)
}
