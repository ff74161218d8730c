//! Errors reported by parameter validation and the transform entry points.

/// Error type for transform setup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// A length parameter is not a power of two.
    #[error("{name} = {value} is not a power of two")]
    NotPowerOfTwo {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: usize,
    },

    /// The half-length is below the smallest supported transform.
    #[error("transform length n = {0} is too small, need at least 2")]
    TooShort(usize),

    /// The bit weight is zero.
    #[error("bit weight must be positive")]
    ZeroWeight,

    /// The grid split does not fit the transform.
    #[error("grid split n1 = {n1} must lie in [2, {n}]")]
    InvalidSplit {
        /// Requested column count.
        n1: usize,
        /// Transform half-length.
        n: usize,
    },

    /// The truncation is out of range or misaligned with the grid.
    #[error("truncation {trunc} must lie in ({low}, {high}] with trunc - {low} a multiple of {step}")]
    InvalidTruncation {
        /// Requested truncation.
        trunc: usize,
        /// Exclusive lower bound (2n).
        low: usize,
        /// Inclusive upper bound (4n).
        high: usize,
        /// Required granularity (2·n1).
        step: usize,
    },

    /// Odd weights need sqrt2, which needs a ring width divisible by 4.
    #[error("odd bit weight {w} needs a ring width divisible by 4, got {bits}")]
    MisalignedOddWeight {
        /// Bit weight.
        w: usize,
        /// Ring width n·w.
        bits: usize,
    },

    /// The signal handed to a transform does not match its parameters.
    #[error("signal mismatch: {0}")]
    SignalMismatch(String),

    /// The operands are too large for any supported transform size.
    #[error("operands of {0} bits exceed the largest supported transform")]
    TooLarge(usize),
}
