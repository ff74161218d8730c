//! Butterflies and one-sided adjusts over Z/(2^bits + 1).
//!
//! Every butterfly writes into two output buffers that are distinct from its
//! inputs; the caller then exchanges the outputs into the signal slots. The
//! borrow checker rules out the aliasing the algorithms forbid.
//!
//! Twiddles are powers of two, except in the sqrt2 layer of a transform with
//! odd bit weight, where half-bit twiddles need the square root of two:
//! `sqrt2 = 2^(3·bits/4) - 2^(bits/4)`. The sqrt2 variants take an exponent
//! `e` in half-bits and multiply by `sqrt2^e`.

use crate::fermat::{Coeff, Ring};

/// `u = 2^b1 (s + t)`, `v = 2^b2 (s - t)`.
///
/// This is the leaf of the twiddled transform: an ordinary butterfly whose
/// two outputs carry independent twiddles. A shift of at least `bits` is
/// realized as a shift by `b - bits` and a negation.
///
/// # Panics
///
/// Panics if either shift is `2 * bits` or more.
#[allow(clippy::too_many_arguments, clippy::many_single_char_names)]
pub fn butterfly_twiddle(
    ring: Ring,
    u: &mut Coeff,
    v: &mut Coeff,
    s: &Coeff,
    t: &Coeff,
    b1: usize,
    b2: usize,
    temp: &mut Coeff,
) {
    let limit = 2 * ring.bits();
    assert!(b1 < limit && b2 < limit, "twiddle shifts ({b1}, {b2}) out of range for {limit}");
    ring.add(temp, s, t);
    ring.mul_2exp(u, temp, b1);
    ring.sub(temp, s, t);
    ring.mul_2exp(v, temp, b2);
}

/// Inverse of [`butterfly_twiddle`] up to a factor of two:
/// `u = s/2^b1 + t/2^b2`, `v = s/2^b1 - t/2^b2`.
///
/// # Panics
///
/// Panics if either shift is `2 * bits` or more.
#[allow(clippy::too_many_arguments, clippy::many_single_char_names)]
pub fn butterfly_twiddle_inv(
    ring: Ring,
    u: &mut Coeff,
    v: &mut Coeff,
    s: &Coeff,
    t: &Coeff,
    b1: usize,
    b2: usize,
    temp: &mut Coeff,
) {
    let limit = 2 * ring.bits();
    assert!(b1 < limit && b2 < limit, "twiddle shifts ({b1}, {b2}) out of range for {limit}");
    ring.div_2exp(temp, s, b1);
    ring.div_2exp(v, t, b2);
    ring.add(u, temp, v);
    ring.rsub_assign(v, temp);
}

/// `s = i1 + i2`, `t = (i1 - i2) 2^(i·w)`.
pub fn butterfly(ring: Ring, s: &mut Coeff, t: &mut Coeff, i1: &Coeff, i2: &Coeff, i: usize, w: usize) {
    ring.sub(s, i1, i2);
    ring.mul_2exp(t, s, i * w);
    ring.add(s, i1, i2);
}

/// `s = i1 + i2 / 2^(i·w)`, `t = i1 - i2 / 2^(i·w)`.
pub fn butterfly_inv(ring: Ring, s: &mut Coeff, t: &mut Coeff, i1: &Coeff, i2: &Coeff, i: usize, w: usize) {
    ring.div_2exp(s, i2, i * w);
    ring.sub(t, i1, s);
    ring.add_assign(s, i1);
}

/// `r = i1 2^(i·w)`: the butterfly's difference output when `i2` is zero.
pub fn adjust(ring: Ring, r: &mut Coeff, i1: &Coeff, i: usize, w: usize) {
    ring.mul_2exp(r, i1, i * w);
}

/// `s = i1 + i2`, `t = (i1 - i2) sqrt2^e` for odd `e`.
///
/// # Panics
///
/// Panics if `e` is even or the ring width is not a multiple of 4.
#[allow(clippy::too_many_arguments)]
pub fn butterfly_sqrt2(
    ring: Ring,
    s: &mut Coeff,
    t: &mut Coeff,
    i1: &Coeff,
    i2: &Coeff,
    e: usize,
    temp: &mut Coeff,
) {
    ring.sub(s, i1, i2);
    mul_sqrt2_pow(ring, t, s, e, temp);
    ring.add(s, i1, i2);
}

/// `s = i1 + i2 sqrt2^-e`, `t = i1 - i2 sqrt2^-e` for odd `e`.
///
/// # Panics
///
/// Panics if `e` is even or the ring width is not a multiple of 4.
#[allow(clippy::too_many_arguments)]
pub fn butterfly_sqrt2_inv(
    ring: Ring,
    s: &mut Coeff,
    t: &mut Coeff,
    i1: &Coeff,
    i2: &Coeff,
    e: usize,
    temp: &mut Coeff,
) {
    let period = 4 * ring.bits();
    mul_sqrt2_pow(ring, s, i2, period - e % period, temp);
    ring.sub(t, i1, s);
    ring.add_assign(s, i1);
}

/// `r = i1 sqrt2^e` for odd `e`.
///
/// # Panics
///
/// Panics if `e` is even or the ring width is not a multiple of 4.
pub fn adjust_sqrt2(ring: Ring, r: &mut Coeff, i1: &Coeff, e: usize, temp: &mut Coeff) {
    mul_sqrt2_pow(ring, r, i1, e, temp);
}

/// `r = a sqrt2^e` for odd `e`, using
/// `sqrt2^e = 2^((e-1)/2) (2^(3·bits/4) - 2^(bits/4))`.
fn mul_sqrt2_pow(ring: Ring, r: &mut Coeff, a: &Coeff, e: usize, temp: &mut Coeff) {
    let bits = ring.bits();
    assert!(bits % 4 == 0, "sqrt2 twiddles need a ring width divisible by 4, got {bits}");
    assert!(e % 2 == 1, "sqrt2 twiddle exponent must be odd, got {e}");
    let k = (e - 1) / 2;
    ring.mul_2exp(r, a, k + 3 * bits / 4);
    ring.mul_2exp(temp, a, k + bits / 4);
    ring.sub_assign(r, temp);
}
