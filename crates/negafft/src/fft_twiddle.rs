//! Twiddled radix-2 transforms, full and truncated.
//!
//! These transform one column of a matrix-Fourier grid. The layers are
//! ordinary untwiddled butterflies; the twiddle that ties the column to its
//! position in the grid is folded into the leaf butterflies only, where
//! each output needs a single combined rotation.
//!
//! With ω = 2^w and `d = log2(2n)`, the forward transforms leave
//! `2^(ws·c·(r + rs·revbin(k, d))) · Σ_m a_m ω^(m·revbin(k, d))` in
//! position k.

use std::mem;

use crate::butterfly::{
    adjust, butterfly, butterfly_inv, butterfly_twiddle, butterfly_twiddle_inv,
};
use crate::fermat::Ring;
use crate::fft_core::{check_width, revbin};
use crate::signal::{Scratch, Strided};

/// Twiddle bookkeeping for one column: element k of the column gets the
/// exponent `(r + k·rs)·c`, in units of `ws` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Twiddle {
    /// Bits per unit of exponent.
    pub ws: usize,
    /// Row of the first element.
    pub r: usize,
    /// Column index.
    pub c: usize,
    /// Row stride between consecutive elements.
    pub rs: usize,
}

impl Twiddle {
    /// Twiddle of the lower half of a layer.
    #[must_use]
    pub fn lower(self) -> Self {
        Self { rs: 2 * self.rs, ..self }
    }

    /// Twiddle of the upper half of a layer.
    #[must_use]
    pub fn upper(self) -> Self {
        Self {
            r: self.r + self.rs,
            rs: 2 * self.rs,
            ..self
        }
    }

    /// Rotation in bits, reduced modulo `2 * bits`, of the two leaf outputs.
    fn leaf_shifts(self, ring: Ring) -> (usize, usize) {
        let period = 2 * ring.bits();
        let tw1 = self.r * self.c;
        let tw2 = tw1 + self.rs * self.c;
        ((tw1 * self.ws) % period, (tw2 * self.ws) % period)
    }

    /// Rotation in bits applied to output position `k` of a transform of
    /// `2^depth` elements.
    #[must_use]
    pub fn shift_at(self, ring: Ring, k: usize, depth: u32) -> usize {
        (self.ws * self.c * (self.r + self.rs * revbin(k, depth))) % (2 * ring.bits())
    }
}

/// Forward twiddled transform of `2n` elements.
///
/// # Panics
///
/// Panics if `n` is not a power of two or `n·w` is not the ring width.
pub fn fft_radix2_twiddle(
    ring: Ring,
    ii: &mut Strided<'_>,
    n: usize,
    w: usize,
    tw: Twiddle,
    scratch: &mut Scratch,
) {
    check_width(ring, n, w);
    if n == 1 {
        let (b1, b2) = tw.leaf_shifts(ring);
        let (a, b) = ii.pair_mut(0, 1);
        butterfly_twiddle(ring, &mut scratch.t1, &mut scratch.t2, a, b, b1, b2, &mut scratch.temp);
        mem::swap(a, &mut scratch.t1);
        mem::swap(b, &mut scratch.t2);
        return;
    }
    butterfly_layer(ring, ii, n, w, scratch);
    fft_radix2_twiddle(ring, &mut ii.offset(0), n / 2, 2 * w, tw.lower(), scratch);
    fft_radix2_twiddle(ring, &mut ii.offset(n), n / 2, 2 * w, tw.upper(), scratch);
}

/// Inverse of [`fft_radix2_twiddle`], scaled by `2n`.
///
/// # Panics
///
/// Panics if `n` is not a power of two or `n·w` is not the ring width.
pub fn ifft_radix2_twiddle(
    ring: Ring,
    ii: &mut Strided<'_>,
    n: usize,
    w: usize,
    tw: Twiddle,
    scratch: &mut Scratch,
) {
    check_width(ring, n, w);
    if n == 1 {
        let (b1, b2) = tw.leaf_shifts(ring);
        let (a, b) = ii.pair_mut(0, 1);
        butterfly_twiddle_inv(ring, &mut scratch.t1, &mut scratch.t2, a, b, b1, b2, &mut scratch.temp);
        mem::swap(a, &mut scratch.t1);
        mem::swap(b, &mut scratch.t2);
        return;
    }
    ifft_radix2_twiddle(ring, &mut ii.offset(0), n / 2, 2 * w, tw.lower(), scratch);
    ifft_radix2_twiddle(ring, &mut ii.offset(n), n / 2, 2 * w, tw.upper(), scratch);
    inverse_butterfly_layer(ring, ii, 0..n, n, w, scratch);
}

/// Forward twiddled transform of `2n` elements computing only the first
/// `trunc` outputs.
///
/// # Panics
///
/// Panics if `trunc` is odd or outside `[2, 2n]`, if `n` is not a power
/// of two, or if `n·w` is not the ring width.
pub fn fft_truncate1_twiddle(
    ring: Ring,
    ii: &mut Strided<'_>,
    n: usize,
    w: usize,
    tw: Twiddle,
    trunc: usize,
    scratch: &mut Scratch,
) {
    check_trunc(ring, n, w, trunc);
    if trunc == 2 * n {
        fft_radix2_twiddle(ring, ii, n, w, tw, scratch);
    } else if trunc <= n {
        for i in 0..n {
            let (a, b) = ii.pair_mut(i, n + i);
            ring.add_assign(a, b);
        }
        fft_truncate1_twiddle(ring, ii, n / 2, 2 * w, tw.lower(), trunc, scratch);
    } else {
        butterfly_layer(ring, ii, n, w, scratch);
        fft_radix2_twiddle(ring, &mut ii.offset(0), n / 2, 2 * w, tw.lower(), scratch);
        fft_truncate1_twiddle(ring, &mut ii.offset(n), n / 2, 2 * w, tw.upper(), trunc - n, scratch);
    }
}

/// Inverse of [`fft_truncate1_twiddle`].
///
/// On entry positions `[0, trunc)` hold transform outputs and positions
/// `[trunc, 2n)` hold `2n` times the input values already known there
/// (zero for zero-padded input). On exit positions `[0, trunc)` hold `2n`
/// times the input; the rest are clobbered.
///
/// # Panics
///
/// Panics if `trunc` is odd or outside `[2, 2n]`, if `n` is not a power
/// of two, or if `n·w` is not the ring width.
pub fn ifft_truncate1_twiddle(
    ring: Ring,
    ii: &mut Strided<'_>,
    n: usize,
    w: usize,
    tw: Twiddle,
    trunc: usize,
    scratch: &mut Scratch,
) {
    check_trunc(ring, n, w, trunc);
    if trunc == 2 * n {
        ifft_radix2_twiddle(ring, ii, n, w, tw, scratch);
    } else if trunc <= n {
        for i in trunc..n {
            let (a, b) = ii.pair_mut(i, n + i);
            ring.add(&mut scratch.t1, a, b);
            ring.div_2exp(a, &scratch.t1, 1);
        }
        ifft_truncate1_twiddle(ring, ii, n / 2, 2 * w, tw.lower(), trunc, scratch);
        for i in 0..trunc {
            let (a, b) = ii.pair_mut(i, n + i);
            ring.add(&mut scratch.t1, a, a);
            ring.sub(a, &scratch.t1, b);
        }
    } else {
        ifft_radix2_twiddle(ring, &mut ii.offset(0), n / 2, 2 * w, tw.lower(), scratch);
        for i in trunc - n..n {
            let (a, b) = ii.pair_mut(i, n + i);
            ring.rsub_assign(b, a);
            adjust(ring, &mut scratch.t1, b, i, w);
            ring.add_assign(a, b);
            mem::swap(b, &mut scratch.t1);
        }
        ifft_truncate1_twiddle(ring, &mut ii.offset(n), n / 2, 2 * w, tw.upper(), trunc - n, scratch);
        inverse_butterfly_layer(ring, ii, 0..trunc - n, n, w, scratch);
    }
}

fn check_trunc(ring: Ring, n: usize, w: usize, trunc: usize) {
    check_width(ring, n, w);
    assert!(
        trunc % 2 == 0 && (2..=2 * n).contains(&trunc),
        "truncation {trunc} must be even and in [2, {}]",
        2 * n
    );
}

/// One untwiddled layer over the pairs `(i, n + i)`.
fn butterfly_layer(ring: Ring, ii: &mut Strided<'_>, n: usize, w: usize, scratch: &mut Scratch) {
    for i in 0..n {
        let (a, b) = ii.pair_mut(i, n + i);
        butterfly(ring, &mut scratch.t1, &mut scratch.t2, a, b, i, w);
        mem::swap(a, &mut scratch.t1);
        mem::swap(b, &mut scratch.t2);
    }
}

fn inverse_butterfly_layer(
    ring: Ring,
    ii: &mut Strided<'_>,
    range: std::ops::Range<usize>,
    n: usize,
    w: usize,
    scratch: &mut Scratch,
) {
    for i in range {
        let (a, b) = ii.pair_mut(i, n + i);
        butterfly_inv(ring, &mut scratch.t1, &mut scratch.t2, a, b, i, w);
        mem::swap(a, &mut scratch.t1);
        mem::swap(b, &mut scratch.t2);
    }
}
