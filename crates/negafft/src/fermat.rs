//! Arithmetic in the ring Z/(2^bits + 1).
//!
//! Every coefficient of a transform lives in this ring. Because
//! 2^bits ≡ -1, multiplying by a power of two is a shift whose overflow
//! wraps around with a sign flip, so the whole transform needs nothing but
//! shifts, adds and negations.
//!
//! Coefficients are stored in `limbs + 1` words with
//! `limbs = ceil(bits / 64)` and are kept normalized: the value is always in
//! `[0, 2^bits]`. Every operation here takes normalized inputs and leaves a
//! normalized result in a caller-owned buffer. Only the pointwise [`Ring::mul`]
//! allocates, for its double-width product; the shifts, adds and negations
//! used by the transforms work in place.

use num_bigint::BigUint;
use num_traits::One;

use crate::limbs::{
    self, add_n, add_n_assign, add_scalar, add_with_carry, mul_wide, neg_n, rsub_n_assign,
    sub_n, sub_n_assign, sub_scalar, sub_with_borrow, window, LIMB_BITS,
};

/// One coefficient: a fixed-size limb buffer owned by a signal slot or a
/// scratch variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Coeff {
    data: Vec<u64>,
}

impl Coeff {
    /// The little-endian limbs.
    #[must_use]
    pub fn words(&self) -> &[u64] {
        &self.data
    }

    pub(crate) fn words_mut(&mut self) -> &mut [u64] {
        &mut self.data
    }

    /// Address of the backing buffer. Identifies the buffer across slot swaps.
    #[must_use]
    pub fn buffer_id(&self) -> usize {
        self.data.as_ptr() as usize
    }

    /// Check if this is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == 0)
    }
}

/// The ring Z/(2^bits + 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ring {
    bits: usize,
    limbs: usize,
}

impl Ring {
    /// Ring with modulus 2^bits + 1.
    ///
    /// # Panics
    ///
    /// Panics if `bits` is zero.
    #[must_use]
    pub fn new(bits: usize) -> Self {
        assert!(bits > 0, "ring width must be positive");
        Self {
            bits,
            limbs: bits.div_ceil(LIMB_BITS),
        }
    }

    /// Width N of the modulus 2^N + 1.
    #[must_use]
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Number of full limbs covering `bits`.
    #[must_use]
    pub fn limbs(&self) -> usize {
        self.limbs
    }

    /// Words per coefficient buffer (`limbs + 1`).
    #[must_use]
    pub fn words(&self) -> usize {
        self.limbs + 1
    }

    /// The modulus 2^bits + 1.
    #[must_use]
    pub fn modulus(&self) -> BigUint {
        (BigUint::one() << self.bits) + BigUint::one()
    }

    /// A fresh zero coefficient.
    #[must_use]
    pub fn zero(&self) -> Coeff {
        Coeff {
            data: vec![0; self.words()],
        }
    }

    /// Coefficient holding `value mod (2^bits + 1)`.
    #[must_use]
    pub fn from_u64(&self, value: u64) -> Coeff {
        self.from_biguint(&BigUint::from(value))
    }

    /// Coefficient holding `value mod (2^bits + 1)`.
    #[must_use]
    pub fn from_biguint(&self, value: &BigUint) -> Coeff {
        let reduced = value % self.modulus();
        let mut c = self.zero();
        for (slot, digit) in c.data.iter_mut().zip(reduced.to_u64_digits()) {
            *slot = digit;
        }
        c
    }

    /// The value of `c` as an integer in `[0, 2^bits]`.
    #[must_use]
    pub fn to_biguint(&self, c: &Coeff) -> BigUint {
        limbs::to_biguint(&c.data)
    }

    /// Whether `c` has the right size and lies in `[0, 2^bits]`.
    #[must_use]
    pub fn is_normalized(&self, c: &Coeff) -> bool {
        c.data.len() == self.words() && !self.exceeds_modulus(&c.data)
    }

    /// Whether `c` is 2^bits, i.e. -1.
    #[must_use]
    pub fn is_minus_one(&self, c: &Coeff) -> bool {
        let (top_word, top_bit) = self.top();
        c.data.iter().enumerate().all(|(k, &limb)| {
            if k == top_word {
                limb == 1u64 << top_bit
            } else {
                limb == 0
            }
        })
    }

    /// `r = a + b`.
    pub fn add(&self, r: &mut Coeff, a: &Coeff, b: &Coeff) {
        add_n(&mut r.data, &a.data, &b.data);
        self.reduce_once(&mut r.data);
    }

    /// `a += b`.
    pub fn add_assign(&self, a: &mut Coeff, b: &Coeff) {
        add_n_assign(&mut a.data, &b.data);
        self.reduce_once(&mut a.data);
    }

    /// `r = a - b`.
    pub fn sub(&self, r: &mut Coeff, a: &Coeff, b: &Coeff) {
        let borrow = sub_n(&mut r.data, &a.data, &b.data);
        self.lift_negative(&mut r.data, borrow);
    }

    /// `a -= b`.
    pub fn sub_assign(&self, a: &mut Coeff, b: &Coeff) {
        let borrow = sub_n_assign(&mut a.data, &b.data);
        self.lift_negative(&mut a.data, borrow);
    }

    /// `a = b - a`.
    pub fn rsub_assign(&self, a: &mut Coeff, b: &Coeff) {
        let borrow = rsub_n_assign(&mut a.data, &b.data);
        self.lift_negative(&mut a.data, borrow);
    }

    /// `a = -a`.
    pub fn neg_assign(&self, a: &mut Coeff) {
        if neg_n(&mut a.data) != 0 {
            self.add_modulus(&mut a.data);
        }
    }

    /// `r = a * 2^shift`.
    ///
    /// `shift` is taken modulo `2 * bits` (2^(2·bits) ≡ 1). A shift of at
    /// least `bits` is a shift by `shift - bits` followed by a negation.
    #[allow(clippy::cast_possible_wrap)]
    pub fn mul_2exp(&self, r: &mut Coeff, a: &Coeff, shift: usize) {
        let shift = shift % (2 * self.bits);
        let (shift, negate) = if shift >= self.bits {
            (shift - self.bits, true)
        } else {
            (shift, false)
        };

        // a * 2^s = (a mod 2^(bits-s)) << s  +  (a >> (bits-s)) * 2^bits
        //        ≡ low - high
        let low_offset = shift as isize;
        let high_offset = (self.bits - shift) as isize;
        let mut borrow = 0;
        for (k, limb) in r.data.iter_mut().enumerate() {
            let base = (k * LIMB_BITS) as isize;
            let low = window(&a.data, base - low_offset) & self.low_mask(k);
            let high = window(&a.data, base + high_offset);
            (*limb, borrow) = sub_with_borrow(low, high, borrow);
        }
        self.lift_negative(&mut r.data, borrow);
        if negate {
            self.neg_assign(r);
        }
    }

    /// `r = a / 2^shift`.
    pub fn div_2exp(&self, r: &mut Coeff, a: &Coeff, shift: usize) {
        let period = 2 * self.bits;
        self.mul_2exp(r, a, (period - shift % period) % period);
    }

    /// `r = a * b`, the pointwise product of the convolution step.
    ///
    /// Allocates a `2 * limbs` word buffer for the full product.
    pub fn mul(&self, r: &mut Coeff, a: &Coeff, b: &Coeff) {
        if self.is_minus_one(a) {
            r.data.copy_from_slice(&b.data);
            self.neg_assign(r);
            return;
        }
        if self.is_minus_one(b) {
            r.data.copy_from_slice(&a.data);
            self.neg_assign(r);
            return;
        }

        // Both operands are below 2^bits, so they fit in `limbs` words and
        // their product fits in `2 * limbs`.
        let n = self.limbs;
        let mut prod = vec![0u64; 2 * n];
        for (i, &ai) in a.data[..n].iter().enumerate() {
            let mut carry = 0;
            for (j, &bj) in b.data[..n].iter().enumerate() {
                let (lo, hi) = mul_wide(ai, bj);
                let (s1, c1) = add_with_carry(prod[i + j], lo, 0);
                let (s2, c2) = add_with_carry(s1, carry, 0);
                prod[i + j] = s2;
                carry = hi + c1 + c2;
            }
            prod[i + n] = carry;
        }

        self.fold_product(r, &prod);
    }

    /// `r = prod mod (2^bits + 1)` for `prod < 2^(2·bits)`.
    #[allow(clippy::cast_possible_wrap)]
    fn fold_product(&self, r: &mut Coeff, prod: &[u64]) {
        let mut borrow = 0;
        for (k, limb) in r.data.iter_mut().enumerate() {
            let base = (k * LIMB_BITS) as isize;
            let low = window(prod, base) & self.low_mask(k);
            let high = window(prod, base + self.bits as isize);
            (*limb, borrow) = sub_with_borrow(low, high, borrow);
        }
        self.lift_negative(&mut r.data, borrow);
    }

    /// Word index and bit index of bit `bits`.
    fn top(&self) -> (usize, usize) {
        (self.bits / LIMB_BITS, self.bits % LIMB_BITS)
    }

    /// Mask of the bits of word `k` that lie below bit `bits`.
    fn low_mask(&self, k: usize) -> u64 {
        let start = k * LIMB_BITS;
        if start + LIMB_BITS <= self.bits {
            u64::MAX
        } else if start >= self.bits {
            0
        } else {
            (1u64 << (self.bits - start)) - 1
        }
    }

    /// Whether the raw words hold a value of at least 2^bits + 1.
    fn exceeds_modulus(&self, words: &[u64]) -> bool {
        let (top_word, top_bit) = self.top();
        let head = words[top_word] >> top_bit;
        let above = words[top_word + 1..].iter().any(|&x| x != 0);
        if head == 0 && !above {
            return false;
        }
        if head > 1 || above {
            return true;
        }
        // Exactly 2^bits in the high part: anything below makes it too big.
        let below_mask = (1u64 << top_bit) - 1;
        words[..top_word].iter().any(|&x| x != 0) || words[top_word] & below_mask != 0
    }

    /// After an addition of two normalized values: subtract the modulus once
    /// if the sum reached it.
    fn reduce_once(&self, words: &mut [u64]) {
        if self.exceeds_modulus(words) {
            let (top_word, top_bit) = self.top();
            sub_scalar(words, 1);
            sub_scalar(&mut words[top_word..], 1u64 << top_bit);
        }
    }

    /// After a subtraction: a borrow out of the top word means the result is
    /// negative, so add the modulus back.
    fn lift_negative(&self, words: &mut [u64], borrow: u64) {
        if borrow != 0 {
            self.add_modulus(words);
        }
    }

    /// Add 2^bits + 1, wrapping modulo the word size.
    fn add_modulus(&self, words: &mut [u64]) {
        let (top_word, top_bit) = self.top();
        add_scalar(words, 1);
        add_scalar(&mut words[top_word..], 1u64 << top_bit);
    }
}
