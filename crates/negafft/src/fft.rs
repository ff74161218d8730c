//! Public multiplication API.
//!
//! Routes large operands through the matrix-Fourier transform and falls
//! back to `num-bigint` multiplication for small ones.

use num_bigint::BigUint;
use num_traits::Zero;
use tracing::{debug, warn};

use crate::config::TransformConfig;
use crate::error::TransformError;
use crate::fft_mfa::MfaTransform;
use crate::fft_poly::{reassemble, Poly};
use crate::params::{default_split, round_trunc, MfaParams};
use crate::parallel::Schedule;

/// Largest `log2(n)` tried by [`select_params`].
const MAX_DEPTH: u32 = 40;

/// How a product is laid out over a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FftPlan {
    /// Bits per input piece.
    pub piece_bits: usize,
    /// Coefficients of the product.
    pub product_len: usize,
    /// Transform parameters.
    pub params: MfaParams,
}

/// Choose the smallest transform whose coefficients hold every product
/// coefficient exactly.
///
/// With ring width `n·w` and transform length `4n`, pieces of
/// `(n·w - log2(4n)) / 2` bits give product coefficients below 2^(n·w).
/// Weights 1 and 2 are tried for each `n`.
#[allow(clippy::cast_possible_truncation)]
pub fn select_params(a_bits: usize, b_bits: usize) -> Result<FftPlan, TransformError> {
    for depth in 1..=MAX_DEPTH {
        let n = 1usize << depth;
        for w in 1..=2 {
            let bits = n * w;
            let guard = depth as usize + 2;
            if bits <= guard + 1 {
                continue;
            }
            let piece_bits = (bits - guard) / 2;
            let product_len = a_bits.div_ceil(piece_bits) + b_bits.div_ceil(piece_bits) - 1;
            if product_len > 4 * n {
                continue;
            }
            let n1 = default_split(n);
            let Ok(params) = MfaParams::new(n, w, n1, round_trunc(product_len, n, n1)) else {
                continue;
            };
            return Ok(FftPlan {
                piece_bits,
                product_len,
                params,
            });
        }
    }
    Err(TransformError::TooLarge(a_bits.max(b_bits)))
}

/// Multiply two `BigUint`s, using the transform for large operands.
#[must_use]
pub fn mul(a: &BigUint, b: &BigUint) -> BigUint {
    mul_with(a, b, &TransformConfig::default())
}

/// Square a `BigUint`, using the transform for large operands.
#[must_use]
pub fn sqr(a: &BigUint) -> BigUint {
    sqr_with(a, &TransformConfig::default())
}

/// [`mul`] with an explicit configuration.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn mul_with(a: &BigUint, b: &BigUint, config: &TransformConfig) -> BigUint {
    let config = config.normalize();
    let max_bits = a.bits().max(b.bits()) as usize;
    if max_bits < config.fft_threshold {
        return a * b;
    }
    fft_mul(a, b, &config).unwrap_or_else(|err| {
        warn!(%err, "transform multiplication unavailable, using schoolbook");
        a * b
    })
}

/// [`sqr`] with an explicit configuration.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn sqr_with(a: &BigUint, config: &TransformConfig) -> BigUint {
    let config = config.normalize();
    if (a.bits() as usize) < config.fft_threshold {
        return a * a;
    }
    fft_sqr(a, &config).unwrap_or_else(|err| {
        warn!(%err, "transform squaring unavailable, using schoolbook");
        a * a
    })
}

/// Multiply through the transform regardless of operand size.
#[allow(clippy::cast_possible_truncation)]
pub fn fft_mul(a: &BigUint, b: &BigUint, config: &TransformConfig) -> Result<BigUint, TransformError> {
    if a.is_zero() || b.is_zero() {
        return Ok(BigUint::zero());
    }
    let plan = select_params(a.bits() as usize, b.bits() as usize)?;
    let p = plan.params;
    debug!(piece_bits = plan.piece_bits, n = p.n(), w = p.w(), trunc = p.trunc(), "fft multiply");
    let transform = MfaTransform::new(p, *config);
    let ring = p.ring();

    let mut fa = Poly::from_biguint(a, ring, plan.piece_bits, p.len()).signal;
    let mut fb = Poly::from_biguint(b, ring, plan.piece_bits, p.len()).signal;
    transform.forward(&mut fa)?;
    transform.forward(&mut fb)?;
    Schedule::for_words(transform.config(), fa.word_count()).pointwise_mul(
        ring,
        fa.slots_mut(),
        fb.slots(),
        |k| p.is_output_slot(k),
    );
    transform.inverse(&mut fa)?;

    Ok(reassemble(&fa, plan.product_len, plan.piece_bits, scale_shift(&p)))
}

/// Square through the transform regardless of operand size, with a single
/// forward transform.
#[allow(clippy::cast_possible_truncation)]
pub fn fft_sqr(a: &BigUint, config: &TransformConfig) -> Result<BigUint, TransformError> {
    if a.is_zero() {
        return Ok(BigUint::zero());
    }
    let bits = a.bits() as usize;
    let plan = select_params(bits, bits)?;
    let p = plan.params;
    debug!(piece_bits = plan.piece_bits, n = p.n(), w = p.w(), trunc = p.trunc(), "fft square");
    let transform = MfaTransform::new(p, *config);
    let ring = p.ring();

    let mut fa = Poly::from_biguint(a, ring, plan.piece_bits, p.len()).signal;
    transform.forward(&mut fa)?;
    Schedule::for_words(transform.config(), fa.word_count()).pointwise_sqr(ring, fa.slots_mut(), |k| {
        p.is_output_slot(k)
    });
    transform.inverse(&mut fa)?;

    Ok(reassemble(&fa, plan.product_len, plan.piece_bits, scale_shift(&p)))
}

/// `log2(4n)`: the inverse leaves 4n times the product.
fn scale_shift(p: &MfaParams) -> usize {
    (4 * p.n()).trailing_zeros() as usize
}
