//! Runtime knobs for the transform and the multiplication driver.

use serde::{Deserialize, Serialize};

/// Default number of coefficient words above which a transform runs its
/// column and row passes on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 16;

/// Default operand size (in bits) above which `mul`/`sqr` use the transform.
pub const DEFAULT_FFT_THRESHOLD: usize = 10_000;

/// Transform configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Signal size in words from which the passes are parallelized.
    pub parallel_threshold: usize,
    /// Operand size in bits from which the driver uses the transform.
    pub fft_threshold: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            fft_threshold: DEFAULT_FFT_THRESHOLD,
        }
    }
}

impl TransformConfig {
    /// Replace zero thresholds with the defaults.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.parallel_threshold == 0 {
            self.parallel_threshold = DEFAULT_PARALLEL_THRESHOLD;
        }
        if self.fft_threshold == 0 {
            self.fft_threshold = DEFAULT_FFT_THRESHOLD;
        }
        self
    }

    /// Configuration that never parallelizes.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    /// Whether a signal of `words` words should use the parallel passes.
    #[must_use]
    pub fn parallel_for(&self, words: usize) -> bool {
        words >= self.parallel_threshold
    }
}
