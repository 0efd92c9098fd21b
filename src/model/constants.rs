// Model constants
pub const PRIOR_MEAN: f64 = 1.0;
pub const PRIOR_VARIANCE: f64 = 10.0;
pub const PRIOR_SHAPE: f64 = 1.0;
pub const PRIOR_RATE: f64 = 1.0;

/// Highest performance indicator a competitor can realistically post.
/// Decay pulls means relative to this value.
pub const MAX_OBSERVATION: f64 = 2.0;

// Decay
pub const MEAN_DECAY_SCALE: f64 = 2.0;
pub const MEAN_DECAY_OFFSET: f64 = 2.0;
pub const VARIANCE_DECAY_SCALE: f64 = 2.0;
pub const VARIANCE_DECAY_OFFSET: f64 = 1.0;
pub const DECAY_RATE: f64 = 0.05;
pub const DECAY_STEP: f64 = 0.1;

// Conjugate update
pub const NOISE_STDDEV: f64 = 0.01;
pub const SINGLE_OBSERVATION_VARIANCE: f64 = 100.0;
pub const VARIANCE_FLOOR: f64 = 1.0;

/// Smallest mean a Gamma-family rating may decay to
pub const GAMMA_MEAN_FLOOR: f64 = 1e-6;

pub const MONTE_CARLO_SAMPLES: usize = 10_000;
pub const DEFAULT_SEED: u64 = 42;

// Score padding applied by the match store
pub const MAX_SCORE: f64 = 15.0;
