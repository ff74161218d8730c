//! Plain radix-2 transform over Z/(2^bits + 1) and bit reversal.
//!
//! `n` is the number of butterflies per layer, so a call transforms `2n`
//! elements. With root of unity ω = 2^w (which needs `n·w == bits`), the
//! forward transform leaves Σ_m a_m ω^(m·revbin(k)) in position k. The
//! inverse takes bit-reversed input back to natural order, scaled by 2n.

use std::mem;

use crate::butterfly::{butterfly, butterfly_inv};
use crate::fermat::Ring;
use crate::signal::{Scratch, Strided};

/// Reverse the low `depth` bits of `x`.
#[must_use]
pub fn revbin(x: usize, depth: u32) -> usize {
    if depth == 0 {
        return 0;
    }
    debug_assert!(depth == usize::BITS || x >> depth == 0, "{x} has more than {depth} bits");
    x.reverse_bits() >> (usize::BITS - depth)
}

/// Permute the first `count` elements of `ii` by `revbin(·, depth)`.
///
/// Only swaps buffers; an involution.
pub fn revbin_permute(ii: &mut Strided<'_>, count: usize, depth: u32) {
    for k in 0..count {
        let j = revbin(k, depth);
        if k < j {
            ii.swap(k, j);
        }
    }
}

/// Assert that `n` is a power of two and that `n·w` is the ring width, so
/// ω = 2^w is a primitive `2n`-th root of unity.
pub(crate) fn check_width(ring: Ring, n: usize, w: usize) {
    assert!(n.is_power_of_two(), "transform half-length {n} is not a power of two");
    assert_eq!(
        n * w,
        ring.bits(),
        "n·w = {n}·{w} does not match the ring width {}",
        ring.bits()
    );
}

/// Forward radix-2 transform of `2n` elements, output in bit-reversed order.
///
/// # Panics
///
/// Panics if `n` is not a power of two or `n·w` is not the ring width.
pub fn fft_radix2(ring: Ring, ii: &mut Strided<'_>, n: usize, w: usize, scratch: &mut Scratch) {
    check_width(ring, n, w);
    for i in 0..n {
        let (a, b) = ii.pair_mut(i, n + i);
        butterfly(ring, &mut scratch.t1, &mut scratch.t2, a, b, i, w);
        mem::swap(a, &mut scratch.t1);
        mem::swap(b, &mut scratch.t2);
    }
    if n == 1 {
        return;
    }
    fft_radix2(ring, &mut ii.offset(0), n / 2, 2 * w, scratch);
    fft_radix2(ring, &mut ii.offset(n), n / 2, 2 * w, scratch);
}

/// Inverse of [`fft_radix2`]: bit-reversed input, natural output times `2n`.
///
/// # Panics
///
/// Panics if `n` is not a power of two or `n·w` is not the ring width.
pub fn ifft_radix2(ring: Ring, ii: &mut Strided<'_>, n: usize, w: usize, scratch: &mut Scratch) {
    check_width(ring, n, w);
    if n > 1 {
        ifft_radix2(ring, &mut ii.offset(0), n / 2, 2 * w, scratch);
        ifft_radix2(ring, &mut ii.offset(n), n / 2, 2 * w, scratch);
    }
    for i in 0..n {
        let (a, b) = ii.pair_mut(i, n + i);
        butterfly_inv(ring, &mut scratch.t1, &mut scratch.t2, a, b, i, w);
        mem::swap(a, &mut scratch.t1);
        mem::swap(b, &mut scratch.t2);
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;
    use crate::reference::{evaluate, random_values, scaled, signal_of};
    use crate::signal::Signal;

    #[test]
    fn revbin_small() {
        assert_eq!(revbin(0, 0), 0);
        assert_eq!(revbin(1, 1), 1);
        assert_eq!(revbin(1, 3), 4);
        assert_eq!(revbin(6, 3), 3);
        assert_eq!(revbin(0b0001, 4), 0b1000);
        assert_eq!(revbin(0b1011, 4), 0b1101);
        for d in 1..8 {
            for x in 0..(1usize << d) {
                assert_eq!(revbin(revbin(x, d), d), x);
            }
        }
    }

    #[test]
    fn permute_is_an_involution() {
        let ring = Ring::new(8);
        let mut signal = Signal::from_u64s(ring, &[0, 1, 2, 3, 4, 5, 6, 7], 8);
        let ids = signal.buffer_ids();
        revbin_permute(&mut Strided::new(signal.slots_mut(), 1), 8, 3);
        let values: Vec<BigUint> = signal.to_biguints();
        let expected: Vec<BigUint> = [0u32, 4, 2, 6, 1, 5, 3, 7].map(BigUint::from).to_vec();
        assert_eq!(values, expected);
        revbin_permute(&mut Strided::new(signal.slots_mut(), 1), 8, 3);
        assert_eq!(signal.buffer_ids(), ids);
    }

    fn check_forward(bits: usize, n: usize, seed: u64) {
        let ring = Ring::new(bits);
        let w = bits / n;
        let depth = (2 * n).trailing_zeros();
        let input = random_values(ring, 2 * n, seed);
        let mut signal = signal_of(ring, &input);
        let mut scratch = Scratch::new(ring);
        fft_radix2(ring, &mut Strided::new(signal.slots_mut(), 1), n, w, &mut scratch);

        let out = signal.to_biguints();
        for (k, got) in out.iter().enumerate() {
            let expected = evaluate(ring, &input, 2 * w, revbin(k, depth));
            assert_eq!(got, &expected, "bits={bits} n={n} k={k}");
        }

        ifft_radix2(ring, &mut Strided::new(signal.slots_mut(), 1), n, w, &mut scratch);
        let back = signal.to_biguints();
        for (got, a) in back.iter().zip(&input) {
            assert_eq!(got, &scaled(ring, a, depth as usize));
        }
    }

    #[test]
    fn forward_matches_direct_evaluation() {
        check_forward(8, 4, 1);
        check_forward(8, 8, 2);
        check_forward(64, 16, 3);
        check_forward(128, 8, 4);
        check_forward(128, 1, 5);
    }

    #[test]
    #[should_panic(expected = "ring width")]
    fn weight_must_match_ring_width() {
        let ring = Ring::new(64);
        let mut signal = signal_of(ring, &random_values(ring, 8, 4));
        let mut scratch = Scratch::new(ring);
        fft_radix2(ring, &mut Strided::new(signal.slots_mut(), 1), 4, 8, &mut scratch);
    }

    #[test]
    #[should_panic(expected = "ring width")]
    fn inverse_weight_must_match_ring_width() {
        let ring = Ring::new(16);
        let mut signal = signal_of(ring, &random_values(ring, 4, 5));
        let mut scratch = Scratch::new(ring);
        ifft_radix2(ring, &mut Strided::new(signal.slots_mut(), 1), 2, 4, &mut scratch);
    }

    #[test]
    fn strided_transform_leaves_other_slots_alone() {
        let ring = Ring::new(16);
        let input = random_values(ring, 16, 9);
        let mut signal = signal_of(ring, &input);
        let mut scratch = Scratch::new(ring);
        let mut column = Strided::new(&mut signal.slots_mut()[1..], 2);
        fft_radix2(ring, &mut column, 4, 4, &mut scratch);
        ifft_radix2(ring, &mut column, 4, 4, &mut scratch);

        let out = signal.to_biguints();
        for (k, (got, a)) in out.iter().zip(&input).enumerate() {
            if k % 2 == 0 {
                assert_eq!(got, a, "untouched slot {k}");
            } else {
                assert_eq!(got, &scaled(ring, a, 3), "column slot {k}");
            }
        }
    }
}
