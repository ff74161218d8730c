//! Word-level arithmetic on little-endian `u64` limb slices.
//!
//! These are the carry/borrow building blocks the ring arithmetic in
//! [`crate::fermat`] is written against, plus bit-window helpers used for
//! shifts and for packing integers into coefficients.

use num_bigint::BigUint;

/// Bits per limb.
pub const LIMB_BITS: usize = 64;

/// Add with carry: a + b + carry -> (sum, `new_carry`)
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn add_with_carry(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let sum = u128::from(a) + u128::from(b) + u128::from(carry);
    (sum as u64, (sum >> 64) as u64)
}

/// Subtract with borrow: a - b - borrow -> (diff, `new_borrow`)
#[inline]
#[must_use]
pub fn sub_with_borrow(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let (d1, b1) = a.overflowing_sub(b);
    let (d2, b2) = d1.overflowing_sub(borrow);
    (d2, u64::from(b1 | b2))
}

/// Multiply: a * b -> (low, high)
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn mul_wide(a: u64, b: u64) -> (u64, u64) {
    let prod = u128::from(a) * u128::from(b);
    (prod as u64, (prod >> 64) as u64)
}

/// Add a scalar into a limb slice, returning the carry out of the top limb.
pub fn add_scalar(data: &mut [u64], scalar: u64) -> u64 {
    let mut carry = scalar;
    for limb in data.iter_mut() {
        if carry == 0 {
            break;
        }
        let (sum, c) = add_with_carry(*limb, carry, 0);
        *limb = sum;
        carry = c;
    }
    carry
}

/// Subtract a scalar from a limb slice, returning the borrow out of the top limb.
pub fn sub_scalar(data: &mut [u64], scalar: u64) -> u64 {
    let mut borrow = scalar;
    for limb in data.iter_mut() {
        if borrow == 0 {
            break;
        }
        let (diff, b) = sub_with_borrow(*limb, borrow, 0);
        *limb = diff;
        borrow = b;
    }
    borrow
}

/// `r = a + b`, all three of equal length. Returns the carry.
pub fn add_n(r: &mut [u64], a: &[u64], b: &[u64]) -> u64 {
    debug_assert!(r.len() == a.len() && a.len() == b.len());
    let mut carry = 0;
    for ((ri, &ai), &bi) in r.iter_mut().zip(a).zip(b) {
        (*ri, carry) = add_with_carry(ai, bi, carry);
    }
    carry
}

/// `a += b`. Returns the carry.
pub fn add_n_assign(a: &mut [u64], b: &[u64]) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    let mut carry = 0;
    for (ai, &bi) in a.iter_mut().zip(b) {
        (*ai, carry) = add_with_carry(*ai, bi, carry);
    }
    carry
}

/// `r = a - b`. Returns the borrow.
pub fn sub_n(r: &mut [u64], a: &[u64], b: &[u64]) -> u64 {
    debug_assert!(r.len() == a.len() && a.len() == b.len());
    let mut borrow = 0;
    for ((ri, &ai), &bi) in r.iter_mut().zip(a).zip(b) {
        (*ri, borrow) = sub_with_borrow(ai, bi, borrow);
    }
    borrow
}

/// `a -= b`. Returns the borrow.
pub fn sub_n_assign(a: &mut [u64], b: &[u64]) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    let mut borrow = 0;
    for (ai, &bi) in a.iter_mut().zip(b) {
        (*ai, borrow) = sub_with_borrow(*ai, bi, borrow);
    }
    borrow
}

/// `a = b - a`. Returns the borrow.
pub fn rsub_n_assign(a: &mut [u64], b: &[u64]) -> u64 {
    debug_assert_eq!(a.len(), b.len());
    let mut borrow = 0;
    for (ai, &bi) in a.iter_mut().zip(b) {
        (*ai, borrow) = sub_with_borrow(bi, *ai, borrow);
    }
    borrow
}

/// Two's complement negation in place. Returns 1 unless the input was zero.
pub fn neg_n(a: &mut [u64]) -> u64 {
    let mut borrow = 0;
    for limb in a.iter_mut() {
        (*limb, borrow) = sub_with_borrow(0, *limb, borrow);
    }
    borrow
}

/// The 64 bits of `words` starting at bit `start`.
///
/// Bits below zero or past the end of the slice read as zero, so callers can
/// slide the window freely across either edge.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn window(words: &[u64], start: isize) -> u64 {
    let word = |i: isize| -> u64 {
        if i < 0 {
            0
        } else {
            words.get(i as usize).copied().unwrap_or(0)
        }
    };
    let q = start.div_euclid(LIMB_BITS as isize);
    let r = start.rem_euclid(LIMB_BITS as isize) as u32;
    if r == 0 {
        word(q)
    } else {
        (word(q) >> r) | (word(q + 1) << (64 - r))
    }
}

/// Copy bits `[start, start + len)` of `src` into `dst`, zero-filling the rest.
#[allow(clippy::cast_possible_wrap)]
pub fn extract_bits(src: &[u64], start: usize, len: usize, dst: &mut [u64]) {
    for (k, limb) in dst.iter_mut().enumerate() {
        let offset = k * LIMB_BITS;
        *limb = if offset >= len {
            0
        } else {
            let bits = window(src, (start + offset) as isize);
            let remaining = len - offset;
            if remaining < LIMB_BITS {
                bits & ((1u64 << remaining) - 1)
            } else {
                bits
            }
        };
    }
}

/// `acc += src << shift`. Returns the carry out of `acc`.
///
/// Bits of the shifted source that land past the end of `acc` must be zero.
#[allow(clippy::cast_possible_wrap)]
pub fn add_shifted(acc: &mut [u64], src: &[u64], shift: usize) -> u64 {
    let q = shift / LIMB_BITS;
    let r = (shift % LIMB_BITS) as isize;
    let span = if r == 0 { src.len() } else { src.len() + 1 };
    let mut carry = 0;
    for k in 0..span {
        let word = window(src, (k * LIMB_BITS) as isize - r);
        let Some(slot) = acc.get_mut(q + k) else {
            debug_assert!(word == 0 && carry == 0, "shifted addend overflows accumulator");
            return carry;
        };
        (*slot, carry) = add_with_carry(*slot, word, carry);
    }
    match acc.get_mut(q + span..) {
        Some(rest) => add_scalar(rest, carry),
        None => carry,
    }
}

/// Build a `BigUint` from little-endian limbs.
#[must_use]
pub fn to_biguint(words: &[u64]) -> BigUint {
    let bytes: Vec<u8> = words.iter().flat_map(|&limb| limb.to_le_bytes()).collect();
    BigUint::from_bytes_le(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carry_and_borrow_chains() {
        assert_eq!(add_with_carry(u64::MAX, 1, 0), (0, 1));
        assert_eq!(add_with_carry(u64::MAX, u64::MAX, 1), (u64::MAX, 1));
        assert_eq!(sub_with_borrow(0, 1, 0), (u64::MAX, 1));
        assert_eq!(sub_with_borrow(100, 100, 1), (u64::MAX, 1));
        assert_eq!(sub_with_borrow(500, 200, 0), (300, 0));
    }

    #[test]
    fn multiply_wide() {
        assert_eq!(mul_wide(u64::MAX, 2), (u64::MAX - 1, 1));
        assert_eq!(mul_wide(u64::MAX, u64::MAX), (1, u64::MAX - 1));
        assert_eq!(mul_wide(1u64 << 32, 1u64 << 32), (0, 1));
    }

    #[test]
    fn scalar_ops_propagate() {
        let mut data = vec![u64::MAX, u64::MAX, 0];
        assert_eq!(add_scalar(&mut data, 1), 0);
        assert_eq!(data, vec![0, 0, 1]);
        assert_eq!(sub_scalar(&mut data, 1), 0);
        assert_eq!(data, vec![u64::MAX, u64::MAX, 0]);

        let mut zeros = vec![0, 0];
        assert_eq!(sub_scalar(&mut zeros, 1), 1);
        assert_eq!(zeros, vec![u64::MAX, u64::MAX]);
    }

    #[test]
    fn vector_add_sub() {
        let a = [u64::MAX, 1, 0];
        let b = [1, u64::MAX, 0];
        let mut r = [0; 3];
        assert_eq!(add_n(&mut r, &a, &b), 0);
        assert_eq!(r, [0, 1, 1]);

        // b > a: no borrow, and adding a back does not carry.
        assert_eq!(sub_n(&mut r, &b, &a), 0);
        let mut back = r;
        assert_eq!(add_n_assign(&mut back, &a), 0);
        assert_eq!(back, b);

        // a < b: the difference wraps, and adding b back carries out.
        assert_eq!(sub_n(&mut r, &a, &b), 1);
        let mut back = r;
        assert_eq!(add_n_assign(&mut back, &b), 1);
        assert_eq!(back, a);

        let mut x = a;
        assert_eq!(sub_n_assign(&mut x, &a), 0);
        assert_eq!(x, [0, 0, 0]);

        let mut y = [5, 0, 0];
        assert_eq!(rsub_n_assign(&mut y, &[7, 0, 0]), 0);
        assert_eq!(y, [2, 0, 0]);
    }

    #[test]
    fn negation() {
        let mut zero = [0u64; 2];
        assert_eq!(neg_n(&mut zero), 0);
        assert_eq!(zero, [0, 0]);

        let mut one = [1u64, 0];
        assert_eq!(neg_n(&mut one), 1);
        assert_eq!(one, [u64::MAX, u64::MAX]);
    }

    #[test]
    fn window_crosses_edges() {
        let words = [0x0123_4567_89ab_cdef_u64, 0xfedc_ba98_7654_3210];
        assert_eq!(window(&words, 0), words[0]);
        assert_eq!(window(&words, 64), words[1]);
        assert_eq!(window(&words, 128), 0);
        assert_eq!(window(&words, 4), (words[0] >> 4) | (words[1] << 60));
        assert_eq!(window(&words, -8), words[0] << 8);
        assert_eq!(window(&words, -64), 0);
        assert_eq!(window(&words, 120), words[1] >> 56);
    }

    #[test]
    fn extract_and_reassemble() {
        let src = [0xdead_beef_cafe_babe_u64, 0x1234_5678_9abc_def0];
        let mut piece = [0u64; 2];
        extract_bits(&src, 60, 72, &mut piece);
        assert_eq!(piece[0], window(&src, 60));
        assert_eq!(piece[1], (src[1] >> 60) & 0xff);

        let mut acc = [0u64; 3];
        let mut low = [0u64; 1];
        extract_bits(&src, 0, 60, &mut low);
        assert_eq!(add_shifted(&mut acc, &low, 0), 0);
        assert_eq!(add_shifted(&mut acc, &piece, 60), 0);
        let mut high = [0u64; 1];
        extract_bits(&src, 132, 64, &mut high);
        assert_eq!(high, [0]);
        assert_eq!(&acc[..2], &src);
    }

    #[test]
    fn add_shifted_carries_into_upper_limbs() {
        let mut acc = [u64::MAX, u64::MAX, 0];
        assert_eq!(add_shifted(&mut acc, &[1], 0), 0);
        assert_eq!(acc, [0, 0, 1]);
    }

    #[test]
    fn biguint_conversion() {
        let value = to_biguint(&[5, 1]);
        assert_eq!(value, (BigUint::from(1u32) << 64u32) + BigUint::from(5u32));
    }
}
