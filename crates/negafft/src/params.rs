//! Validated parameters of the matrix-Fourier transform.

use crate::error::TransformError;
use crate::fermat::Ring;
use crate::fft_core::revbin;

/// Parameters of a length-4n matrix-Fourier transform.
///
/// Each half of the signal is an `n2 × n1` grid, slot = row·n1 + column.
/// The right half only computes `trunc2 = (trunc - 2n) / n1` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MfaParams {
    n: usize,
    w: usize,
    n1: usize,
    n2: usize,
    trunc: usize,
    trunc2: usize,
}

impl MfaParams {
    /// Validate a parameter set.
    ///
    /// * `n`: half of the half-length, a power of two ≥ 2; the ring width is
    ///   `n·w` and the signal holds `4n` slots.
    /// * `w`: bit weight, ≥ 1. For odd `w`, `n·w` must be divisible by 4.
    /// * `n1`: grid columns, a power of two in `[2, n]`.
    /// * `trunc`: outputs to compute, `2n < trunc ≤ 4n` with `trunc - 2n` a
    ///   multiple of `2·n1`.
    pub fn new(n: usize, w: usize, n1: usize, trunc: usize) -> Result<Self, TransformError> {
        if !n.is_power_of_two() {
            return Err(TransformError::NotPowerOfTwo { name: "n", value: n });
        }
        if n < 2 {
            return Err(TransformError::TooShort(n));
        }
        if w == 0 {
            return Err(TransformError::ZeroWeight);
        }
        if !n1.is_power_of_two() {
            return Err(TransformError::NotPowerOfTwo { name: "n1", value: n1 });
        }
        if !(2..=n).contains(&n1) {
            return Err(TransformError::InvalidSplit { n1, n });
        }
        let step = 2 * n1;
        if trunc <= 2 * n || trunc > 4 * n || (trunc - 2 * n) % step != 0 {
            return Err(TransformError::InvalidTruncation {
                trunc,
                low: 2 * n,
                high: 4 * n,
                step,
            });
        }
        if w % 2 == 1 && (n * w) % 4 != 0 {
            return Err(TransformError::MisalignedOddWeight { w, bits: n * w });
        }
        Ok(Self {
            n,
            w,
            n1,
            n2: 2 * n / n1,
            trunc,
            trunc2: (trunc - 2 * n) / n1,
        })
    }

    /// Validate with [`default_split`] for `n1`.
    pub fn with_default_split(n: usize, w: usize, trunc: usize) -> Result<Self, TransformError> {
        Self::new(n, w, default_split(n), trunc)
    }

    #[must_use]
    pub fn n(&self) -> usize {
        self.n
    }

    #[must_use]
    pub fn w(&self) -> usize {
        self.w
    }

    #[must_use]
    pub fn n1(&self) -> usize {
        self.n1
    }

    #[must_use]
    pub fn n2(&self) -> usize {
        self.n2
    }

    #[must_use]
    pub fn trunc(&self) -> usize {
        self.trunc
    }

    /// Right-half rows that are computed.
    #[must_use]
    pub fn trunc2(&self) -> usize {
        self.trunc2
    }

    /// Slots in the signal (`4n`).
    #[must_use]
    pub fn len(&self) -> usize {
        4 * self.n
    }

    /// Always false: a valid transform has at least 8 slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The coefficient ring, width `n·w`.
    #[must_use]
    pub fn ring(&self) -> Ring {
        Ring::new(self.n * self.w)
    }

    /// `log2(n2)`: bits of a row index.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.n2.trailing_zeros()
    }

    /// `log2(n1)`: bits of a column index.
    #[must_use]
    pub fn depth2(&self) -> u32 {
        self.n1.trailing_zeros()
    }

    /// Whether the sqrt2 layer needs half-bit twiddles.
    #[must_use]
    pub fn odd_weight(&self) -> bool {
        self.w % 2 == 1
    }

    /// Whether right-half row `row` is computed.
    #[must_use]
    pub fn right_row_computed(&self, row: usize) -> bool {
        revbin(row, self.depth()) < self.trunc2
    }

    /// Whether `slot` holds a transform output after a forward transform.
    #[must_use]
    pub fn is_output_slot(&self, slot: usize) -> bool {
        self.frequency_of(slot).is_some()
    }

    /// The exponent e such that `slot` holds Σ_m a_m·ω^(m·e) after a forward
    /// transform, with ω = sqrt2^w a primitive 4n-th root of unity.
    ///
    /// `None` for slots past the signal and for right-half rows that are
    /// not computed.
    #[must_use]
    pub fn frequency_of(&self, slot: usize) -> Option<usize> {
        let half = 2 * self.n;
        if slot >= 2 * half {
            return None;
        }
        let (local, odd) = if slot < half { (slot, 0) } else { (slot - half, 1) };
        let (row, col) = (local / self.n1, local % self.n1);
        if odd == 1 && !self.right_row_computed(row) {
            return None;
        }
        Some(2 * (row + self.n2 * col) + odd)
    }
}

/// Column count near `sqrt(2n)`: `2^ceil(log2(n)/2)`, clamped to `[2, n]`.
#[must_use]
pub fn default_split(n: usize) -> usize {
    let log_n = n.max(1).trailing_zeros();
    (1usize << log_n.div_ceil(2)).clamp(2, n.max(2))
}

/// Smallest valid truncation that covers `len` outputs.
///
/// The result is at least `2n + 2·n1` and at most `4n`.
#[must_use]
pub fn round_trunc(len: usize, n: usize, n1: usize) -> usize {
    let step = 2 * n1;
    let extra = len.saturating_sub(2 * n).max(1).div_ceil(step) * step;
    (2 * n + extra).min(4 * n)
}
