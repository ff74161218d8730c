//! Packing big integers into coefficient signals and back.

use num_bigint::BigUint;

use crate::fermat::Ring;
use crate::limbs::{self, add_shifted, extract_bits, LIMB_BITS};
use crate::signal::Signal;

/// An integer split into `piece_bits`-bit pieces, one per signal slot.
#[derive(Debug, Clone)]
pub struct Poly {
    /// The pieces, zero-padded to the transform length.
    pub signal: Signal,
    /// Number of bits per piece.
    pub piece_bits: usize,
    /// Number of meaningful pieces.
    pub pieces: usize,
}

impl Poly {
    /// Split `value` into pieces of `piece_bits` bits over `ring`, in a
    /// signal of `len` slots.
    ///
    /// # Panics
    ///
    /// Panics if a piece does not fit below 2^bits or the pieces do not fit
    /// in `len` slots.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_biguint(value: &BigUint, ring: Ring, piece_bits: usize, len: usize) -> Self {
        assert!(
            piece_bits > 0 && piece_bits < ring.bits(),
            "piece of {piece_bits} bits does not fit in ring width {}",
            ring.bits()
        );
        let pieces = (value.bits() as usize).div_ceil(piece_bits);
        assert!(pieces <= len, "{pieces} pieces do not fit in {len} slots");

        let words = value.to_u64_digits();
        let mut signal = Signal::zeroed(ring, len);
        for (k, slot) in signal.slots_mut().iter_mut().take(pieces).enumerate() {
            extract_bits(&words, k * piece_bits, piece_bits, slot.words_mut());
        }
        Self {
            signal,
            piece_bits,
            pieces,
        }
    }

    /// Number of meaningful pieces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces
    }

    /// Whether the value was zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces == 0
    }

    /// Evaluate the pieces back at 2^`piece_bits`.
    #[must_use]
    pub fn to_biguint(&self) -> BigUint {
        reassemble(&self.signal, self.pieces, self.piece_bits, 0)
    }
}

/// Σ_k (c_k / 2^`scale_shift`) · 2^(k·`piece_bits`) over the first `count`
/// slots.
///
/// Each scaled coefficient must be the exact (non-negative, below 2^bits)
/// value of a product coefficient; carries between pieces are propagated.
#[must_use]
pub fn reassemble(signal: &Signal, count: usize, piece_bits: usize, scale_shift: usize) -> BigUint {
    let ring = signal.ring();
    let top = count.saturating_sub(1) * piece_bits + ring.bits();
    let mut acc = vec![0u64; top.div_ceil(LIMB_BITS) + 1];
    let mut scaled = ring.zero();
    for (k, coeff) in signal.slots().iter().take(count).enumerate() {
        let words = if scale_shift == 0 {
            coeff.words()
        } else {
            ring.div_2exp(&mut scaled, coeff, scale_shift);
            scaled.words()
        };
        let carry = add_shifted(&mut acc, words, k * piece_bits);
        debug_assert_eq!(carry, 0, "accumulator overflow at piece {k}");
    }
    limbs::to_biguint(&acc)
}

#[cfg(test)]
mod tests {
    use num_traits::One;

    use super::*;

    #[test]
    fn poly_roundtrip_small() {
        let ring = Ring::new(64);
        let value = BigUint::from(12345u64);
        let poly = Poly::from_biguint(&value, ring, 16, 4);
        assert_eq!(poly.len(), 1);
        assert_eq!(poly.signal.len(), 4);
        assert_eq!(poly.to_biguint(), value);
    }

    #[test]
    fn poly_roundtrip_large() {
        let ring = Ring::new(128);
        let value = (BigUint::one() << 200u32) + BigUint::from(999u64);
        let poly = Poly::from_biguint(&value, ring, 61, 8);
        assert_eq!(poly.len(), 4);
        assert_eq!(poly.to_biguint(), value);
    }

    #[test]
    fn poly_zero() {
        let ring = Ring::new(64);
        let poly = Poly::from_biguint(&BigUint::default(), ring, 30, 4);
        assert!(poly.is_empty());
        assert_eq!(poly.to_biguint(), BigUint::default());
    }

    #[test]
    fn reassemble_propagates_carries_and_scales() {
        let ring = Ring::new(64);
        // Coefficients wider than a piece overlap their neighbours.
        let signal = Signal::from_u64s(ring, &[0xff << 3, 0xff << 3, 1 << 3], 4);
        let got = reassemble(&signal, 3, 4, 3);
        let expected = BigUint::from(0xffu32) + (BigUint::from(0xffu32) << 4u32) + (BigUint::one() << 8u32);
        assert_eq!(got, expected);
    }

    #[test]
    #[should_panic(expected = "do not fit")]
    fn too_many_pieces() {
        let ring = Ring::new(64);
        let _ = Poly::from_biguint(&(BigUint::one() << 100u32), ring, 10, 4);
    }
}
