use crate::{
    config::DecayConfig,
    model::{
        constants::GAMMA_MEAN_FLOOR,
        error::RatingError,
        structures::{distribution::RatingDistribution, family::Family}
    }
};

/// # How this works
/// - This gets called by the period scheduler for every known competitor
///     who has no match in the current period, from the second period onward.
/// - The competitor has played `n` matches in total so far (all periods).
/// - The mean is shifted relative to the ceiling `C` by
///     `(C - mean) * κ / sqrt(n² + c₁²) * e^h * d`
/// - The variance is inflated by a factor of `(1 + κ' / sqrt(n² + c₂²)) * e^h`
///
/// # Rules
/// - Both effects shrink as `n` grows: a long history is more trustworthy.
/// - Variance never shrinks here. This is the only place where uncertainty grows.
///
/// params:
/// - prior: the competitor's finalized record from the previous period
/// - observations: total number of matches played to date
/// - max_observation: the ceiling `C`
pub fn decay(
    prior: &RatingDistribution,
    observations: u32,
    max_observation: f64,
    constants: &DecayConfig
) -> Result<RatingDistribution, RatingError> {
    let mean = decay_mean(prior.mean(), observations, max_observation, constants);
    let variance = decay_variance(prior.variance(), observations, constants);

    match prior.family() {
        Family::Gaussian => RatingDistribution::gaussian(mean, variance),
        // Shape and rate are rebuilt from the decayed moments
        Family::Gamma => RatingDistribution::from_moments(Family::Gamma, mean.max(GAMMA_MEAN_FLOOR), variance)
    }
}

pub fn decay_mean(mean: f64, observations: u32, max_observation: f64, constants: &DecayConfig) -> f64 {
    let uncertainty = constants.mean_scale / history_weight(observations, constants.mean_offset);

    mean - (max_observation - mean) * uncertainty * constants.rate.exp() * constants.step
}

pub fn decay_variance(variance: f64, observations: u32, constants: &DecayConfig) -> f64 {
    let uncertainty = 1.0 + constants.variance_scale / history_weight(observations, constants.variance_offset);

    variance * uncertainty * constants.rate.exp()
}

/// `sqrt(n² + c²)`
fn history_weight(observations: u32, offset: f64) -> f64 {
    let n = observations as f64;

    (n * n + offset * offset).sqrt()
}
