//! Coefficient slots, strided views over them, and scratch buffers.
//!
//! A transform never copies limbs from one slot to another. Results are
//! written into a scratch buffer and then *exchanged* with the slot, which
//! moves the buffer handle in O(1). Ownership is tracked by the type system:
//! every buffer belongs to exactly one slot or one scratch field.

use std::mem;

use num_bigint::BigUint;

use crate::fermat::{Coeff, Ring};

/// The three scratch buffers a transform worker needs.
///
/// `t1`/`t2` receive butterfly outputs before they are exchanged into the
/// signal; `temp` is used by the twiddled and sqrt2 butterflies. Each
/// concurrent worker must own its own triple.
#[derive(Debug)]
pub struct Scratch {
    pub(crate) t1: Coeff,
    pub(crate) t2: Coeff,
    pub(crate) temp: Coeff,
}

impl Scratch {
    /// Allocate a scratch triple for `ring`.
    #[must_use]
    pub fn new(ring: Ring) -> Self {
        Self {
            t1: ring.zero(),
            t2: ring.zero(),
            temp: ring.zero(),
        }
    }

    /// Buffer ids of the three scratch buffers.
    #[must_use]
    pub fn buffer_ids(&self) -> [usize; 3] {
        [self.t1.buffer_id(), self.t2.buffer_id(), self.temp.buffer_id()]
    }
}

/// An ordered sequence of coefficient slots over one ring.
#[derive(Debug, Clone)]
pub struct Signal {
    ring: Ring,
    slots: Vec<Coeff>,
}

impl Signal {
    /// A signal of `len` zero coefficients.
    #[must_use]
    pub fn zeroed(ring: Ring, len: usize) -> Self {
        Self {
            ring,
            slots: (0..len).map(|_| ring.zero()).collect(),
        }
    }

    /// Wrap existing coefficients.
    ///
    /// # Panics
    ///
    /// Panics if a coefficient is not a normalized element of `ring`.
    #[must_use]
    pub fn from_coeffs(ring: Ring, slots: Vec<Coeff>) -> Self {
        for (i, c) in slots.iter().enumerate() {
            assert!(ring.is_normalized(c), "slot {i} is not a normalized element of {ring:?}");
        }
        Self { ring, slots }
    }

    /// Signal of `len` slots starting with `values` (reduced), zero-padded.
    ///
    /// # Panics
    ///
    /// Panics if `values` is longer than `len`.
    #[must_use]
    pub fn from_u64s(ring: Ring, values: &[u64], len: usize) -> Self {
        assert!(values.len() <= len, "{} values do not fit in {len} slots", values.len());
        let mut signal = Self::zeroed(ring, len);
        for (slot, &v) in signal.slots.iter_mut().zip(values) {
            *slot = ring.from_u64(v);
        }
        signal
    }

    /// The ring every slot lives in.
    #[must_use]
    pub fn ring(&self) -> Ring {
        self.ring
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the signal has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total number of words held by the slots.
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.slots.len() * self.ring.words()
    }

    /// The coefficient in slot `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> &Coeff {
        &self.slots[i]
    }

    /// All slots.
    #[must_use]
    pub fn slots(&self) -> &[Coeff] {
        &self.slots
    }

    /// All slots, mutably. Only buffer exchanges and ring operations should
    /// go through this; replacing a slot's buffer breaks the no-copy contract.
    pub fn slots_mut(&mut self) -> &mut [Coeff] {
        &mut self.slots
    }

    /// Exchange the buffers owned by slots `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
    }

    /// Exchange the buffer in slot `i` with `buf`.
    pub fn exchange(&mut self, i: usize, buf: &mut Coeff) {
        mem::swap(&mut self.slots[i], buf);
    }

    /// Slot values as integers.
    #[must_use]
    pub fn to_biguints(&self) -> Vec<BigUint> {
        self.slots.iter().map(|c| self.ring.to_biguint(c)).collect()
    }

    /// Buffer ids of every slot, in slot order.
    #[must_use]
    pub fn buffer_ids(&self) -> Vec<usize> {
        self.slots.iter().map(Coeff::buffer_id).collect()
    }

    /// Give the coefficients back.
    #[must_use]
    pub fn into_coeffs(self) -> Vec<Coeff> {
        self.slots
    }
}

/// A mutable view of every `stride`-th slot of a slice.
///
/// Element `k` of the view is slot `k * stride`. This is how a column of a
/// row-major grid is transformed in place without moving it.
#[derive(Debug)]
pub struct Strided<'a> {
    slots: &'a mut [Coeff],
    stride: usize,
}

impl<'a> Strided<'a> {
    /// View `slots` with the given stride.
    ///
    /// # Panics
    ///
    /// Panics if `stride` is zero.
    pub fn new(slots: &'a mut [Coeff], stride: usize) -> Self {
        assert!(stride > 0, "stride must be positive");
        Self { slots, stride }
    }

    /// Distance in slots between consecutive elements.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of elements reachable through the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len().div_ceil(self.stride)
    }

    /// Whether the view reaches no element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Element `k`.
    #[must_use]
    pub fn get(&self, k: usize) -> &Coeff {
        &self.slots[k * self.stride]
    }

    /// Element `k`, mutably.
    pub fn get_mut(&mut self, k: usize) -> &mut Coeff {
        &mut self.slots[k * self.stride]
    }

    /// Elements `a` and `b` (`a < b`), both mutably.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Coeff, &mut Coeff) {
        assert!(a < b, "pair_mut expects ascending indices, got {a} and {b}");
        let (lo, hi) = self.slots.split_at_mut(b * self.stride);
        (&mut lo[a * self.stride], &mut hi[0])
    }

    /// Exchange the buffer of element `k` with `buf`.
    pub fn exchange(&mut self, k: usize, buf: &mut Coeff) {
        mem::swap(&mut self.slots[k * self.stride], buf);
    }

    /// Exchange the buffers of elements `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a * self.stride, b * self.stride);
    }

    /// Reborrow the view starting at element `k`, same stride.
    pub fn offset(&mut self, k: usize) -> Strided<'_> {
        Strided {
            slots: &mut self.slots[k * self.stride..],
            stride: self.stride,
        }
    }
}
