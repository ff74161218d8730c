//! Matrix-Fourier truncated sqrt2 transform.
//!
//! A length-4n transform is split into a left half (slots `[0, 2n)`) and a
//! right half (`[2n, 4n)`) by one sqrt2 layer: the left half then holds
//! the even frequencies and the right half the odd ones. Each half is
//! transformed as an `n2 × n1` grid: a twiddled transform down every
//! column, a bit reversal of the rows, then a plain transform along every
//! row and a bit reversal of the columns. The right half is truncated to
//! the `trunc2` rows that hold the first `trunc` outputs.
//!
//! Inputs at index `≥ trunc` are treated as zero and ignored. After a
//! forward transform, [`MfaParams::frequency_of`] says which output each
//! slot holds.

use std::mem;

use tracing::{debug, trace};

use crate::butterfly::{
    adjust, adjust_sqrt2, butterfly, butterfly_inv, butterfly_sqrt2, butterfly_sqrt2_inv,
};
use crate::config::TransformConfig;
use crate::error::TransformError;
use crate::fermat::{Coeff, Ring};
use crate::fft_core::{fft_radix2, ifft_radix2, revbin, revbin_permute};
use crate::fft_twiddle::{
    fft_radix2_twiddle, fft_truncate1_twiddle, ifft_radix2_twiddle, ifft_truncate1_twiddle, Twiddle,
};
use crate::params::MfaParams;
use crate::parallel::Schedule;
use crate::signal::{Scratch, Signal, Strided};

/// Forward transform of `signal` (4n slots), sequentially.
///
/// # Panics
///
/// Panics if the signal's ring or length does not match `p`.
pub fn fft_mfa_truncate_sqrt2(signal: &mut Signal, p: &MfaParams, scratch: &mut Scratch) {
    column_pass(Schedule::Sequential, signal, p, scratch);
    row_pass(Schedule::Sequential, signal, p, scratch);
}

/// Column passes of both halves only: the sqrt2 layer, the column
/// transforms and the row reordering. [`fft_mfa_row_pass`] completes it.
///
/// # Panics
///
/// Panics if the signal's ring or length does not match `p`.
pub fn fft_mfa_truncate_sqrt2_outer(signal: &mut Signal, p: &MfaParams, scratch: &mut Scratch) {
    column_pass(Schedule::Sequential, signal, p, scratch);
}

/// Row passes of both halves, after [`fft_mfa_truncate_sqrt2_outer`].
///
/// # Panics
///
/// Panics if the signal's ring or length does not match `p`.
pub fn fft_mfa_row_pass(signal: &mut Signal, p: &MfaParams, scratch: &mut Scratch) {
    row_pass(Schedule::Sequential, signal, p, scratch);
}

/// Inverse of [`fft_mfa_truncate_sqrt2`]: slots `[0, trunc)` end up holding
/// `4n` times the input.
///
/// # Panics
///
/// Panics if the signal's ring or length does not match `p`.
pub fn ifft_mfa_truncate_sqrt2(signal: &mut Signal, p: &MfaParams, scratch: &mut Scratch) {
    inverse(Schedule::Sequential, signal, p, scratch);
}

/// A configured matrix-Fourier transform.
///
/// Checks signals against its parameters and runs the passes sequentially
/// or on the rayon pool depending on the signal size.
#[derive(Debug, Clone)]
pub struct MfaTransform {
    params: MfaParams,
    config: TransformConfig,
}

impl MfaTransform {
    /// Create a transform.
    #[must_use]
    pub fn new(params: MfaParams, config: TransformConfig) -> Self {
        Self {
            params,
            config: config.normalize(),
        }
    }

    /// The transform parameters.
    #[must_use]
    pub fn params(&self) -> &MfaParams {
        &self.params
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// A zero signal of the right ring and length.
    #[must_use]
    pub fn signal(&self) -> Signal {
        Signal::zeroed(self.params.ring(), self.params.len())
    }

    /// Forward transform.
    pub fn forward(&self, signal: &mut Signal) -> Result<(), TransformError> {
        let (schedule, mut scratch) = self.prepare(signal, "forward")?;
        column_pass(schedule, signal, &self.params, &mut scratch);
        row_pass(schedule, signal, &self.params, &mut scratch);
        Ok(())
    }

    /// Column passes only; [`MfaTransform::row_pass`] completes the forward
    /// transform.
    pub fn forward_outer(&self, signal: &mut Signal) -> Result<(), TransformError> {
        let (schedule, mut scratch) = self.prepare(signal, "forward_outer")?;
        column_pass(schedule, signal, &self.params, &mut scratch);
        Ok(())
    }

    /// Row passes following [`MfaTransform::forward_outer`].
    pub fn row_pass(&self, signal: &mut Signal) -> Result<(), TransformError> {
        let (schedule, mut scratch) = self.prepare(signal, "row_pass")?;
        row_pass(schedule, signal, &self.params, &mut scratch);
        Ok(())
    }

    /// Inverse transform; slots `[0, trunc)` end up holding `4n` times the
    /// input.
    pub fn inverse(&self, signal: &mut Signal) -> Result<(), TransformError> {
        let (schedule, mut scratch) = self.prepare(signal, "inverse")?;
        inverse(schedule, signal, &self.params, &mut scratch);
        Ok(())
    }

    fn prepare(&self, signal: &Signal, op: &str) -> Result<(Schedule, Scratch), TransformError> {
        let p = &self.params;
        if signal.ring() != p.ring() {
            return Err(TransformError::SignalMismatch(format!(
                "ring width {} but the transform uses {}",
                signal.ring().bits(),
                p.ring().bits()
            )));
        }
        if signal.len() != p.len() {
            return Err(TransformError::SignalMismatch(format!(
                "{} slots but the transform needs {}",
                signal.len(),
                p.len()
            )));
        }
        let schedule = Schedule::for_words(&self.config, signal.word_count());
        debug!(op, n = p.n(), w = p.w(), n1 = p.n1(), trunc = p.trunc(), ?schedule, "mfa transform");
        Ok((schedule, Scratch::new(p.ring())))
    }
}

/// The sqrt2-layer twiddle ω^j for input index `j`.
#[derive(Debug, Clone, Copy)]
enum Rotation {
    /// `2^(i·w)`.
    Bits { i: usize, w: usize },
    /// `sqrt2^e`, `e` odd.
    Sqrt2(usize),
}

impl Rotation {
    fn of(p: &MfaParams, j: usize) -> Self {
        let w = p.w();
        if !p.odd_weight() {
            Self::Bits { i: j, w: w / 2 }
        } else if j % 2 == 1 {
            Self::Sqrt2(j * w)
        } else {
            Self::Bits { i: j / 2, w }
        }
    }

    /// `a, b ← a + b, (a - b)·ω^j`.
    fn butterfly(self, ring: Ring, a: &mut Coeff, b: &mut Coeff, scratch: &mut Scratch) {
        let Scratch { t1, t2, temp } = scratch;
        match self {
            Self::Bits { i, w } => butterfly(ring, t1, t2, a, b, i, w),
            Self::Sqrt2(e) => butterfly_sqrt2(ring, t1, t2, a, b, e, temp),
        }
        mem::swap(a, t1);
        mem::swap(b, t2);
    }

    /// `a, b ← a + b·ω^-j, a - b·ω^-j`.
    fn butterfly_inv(self, ring: Ring, a: &mut Coeff, b: &mut Coeff, scratch: &mut Scratch) {
        let Scratch { t1, t2, temp } = scratch;
        match self {
            Self::Bits { i, w } => butterfly_inv(ring, t1, t2, a, b, i, w),
            Self::Sqrt2(e) => butterfly_sqrt2_inv(ring, t1, t2, a, b, e, temp),
        }
        mem::swap(a, t1);
        mem::swap(b, t2);
    }

    /// `b ← a·ω^j`.
    fn adjust(self, ring: Ring, a: &Coeff, b: &mut Coeff, scratch: &mut Scratch) {
        let Scratch { t1, temp, .. } = scratch;
        match self {
            Self::Bits { i, w } => adjust(ring, t1, a, i, w),
            Self::Sqrt2(e) => adjust_sqrt2(ring, t1, a, e, temp),
        }
        mem::swap(b, t1);
    }
}

fn check_signal(signal: &Signal, p: &MfaParams) -> Ring {
    let ring = p.ring();
    assert_eq!(signal.ring(), ring, "signal ring does not match the transform");
    assert_eq!(signal.len(), p.len(), "signal length does not match the transform");
    ring
}

fn column_twiddle(p: &MfaParams, i: usize) -> Twiddle {
    Twiddle {
        ws: p.w(),
        r: 0,
        c: i,
        rs: 1,
    }
}

pub(crate) fn column_pass(schedule: Schedule, signal: &mut Signal, p: &MfaParams, scratch: &mut Scratch) {
    let ring = check_signal(signal, p);
    trace!(n1 = p.n1(), n2 = p.n2(), "column pass");
    let (left, right) = signal.slots_mut().split_at_mut(2 * p.n());
    schedule.columns(ring, left, right, p.n1(), scratch, |i, l, r, s| {
        forward_column(ring, p, i, l, r, s);
    });
}

pub(crate) fn row_pass(schedule: Schedule, signal: &mut Signal, p: &MfaParams, scratch: &mut Scratch) {
    let ring = check_signal(signal, p);
    trace!(n2 = p.n2(), trunc2 = p.trunc2(), "row pass");
    let (left, right) = signal.slots_mut().split_at_mut(2 * p.n());
    schedule.rows(ring, left, p.n1(), |_| true, scratch, |row, s| forward_row(ring, p, row, s));
    schedule.rows(
        ring,
        right,
        p.n1(),
        |q| p.right_row_computed(q),
        scratch,
        |row, s| forward_row(ring, p, row, s),
    );
}

pub(crate) fn inverse(schedule: Schedule, signal: &mut Signal, p: &MfaParams, scratch: &mut Scratch) {
    let ring = check_signal(signal, p);
    trace!(n1 = p.n1(), n2 = p.n2(), trunc2 = p.trunc2(), "inverse");
    let (left, right) = signal.slots_mut().split_at_mut(2 * p.n());
    schedule.rows(ring, left, p.n1(), |_| true, scratch, |row, s| inverse_row(ring, p, row, s));
    schedule.rows(
        ring,
        right,
        p.n1(),
        |q| p.right_row_computed(q),
        scratch,
        |row, s| inverse_row(ring, p, row, s),
    );
    schedule.columns(ring, left, right, p.n1(), scratch, |i, l, r, s| {
        inverse_column(ring, p, i, l, r, s);
    });
}

/// Column `i` of both halves: sqrt2 layer, then the left column transform
/// and the truncated right column transform, each followed by a row
/// reordering.
fn forward_column(
    ring: Ring,
    p: &MfaParams,
    i: usize,
    left: &mut Strided<'_>,
    right: &mut Strided<'_>,
    scratch: &mut Scratch,
) {
    let (n1, n2) = (p.n1(), p.n2());
    for k in 0..n2 {
        let rot = Rotation::of(p, i + k * n1);
        if k < p.trunc2() {
            rot.butterfly(ring, left.get_mut(k), right.get_mut(k), scratch);
        } else {
            rot.adjust(ring, left.get(k), right.get_mut(k), scratch);
        }
    }

    let tw = column_twiddle(p, i);
    fft_radix2_twiddle(ring, left, n2 / 2, p.w() * n1, tw, scratch);
    revbin_permute(left, n2, p.depth());

    fft_truncate1_twiddle(ring, right, n2 / 2, p.w() * n1, tw, p.trunc2(), scratch);
    revbin_permute(right, n2, p.depth());
}

fn forward_row(ring: Ring, p: &MfaParams, row: &mut Strided<'_>, scratch: &mut Scratch) {
    fft_radix2(ring, row, p.n1() / 2, p.w() * p.n2(), scratch);
    revbin_permute(row, p.n1(), p.depth2());
}

fn inverse_row(ring: Ring, p: &MfaParams, row: &mut Strided<'_>, scratch: &mut Scratch) {
    revbin_permute(row, p.n1(), p.depth2());
    ifft_radix2(ring, row, p.n1() / 2, p.w() * p.n2(), scratch);
}

/// Inverse of [`forward_column`] after the rows have been inverted.
fn inverse_column(
    ring: Ring,
    p: &MfaParams,
    i: usize,
    left: &mut Strided<'_>,
    right: &mut Strided<'_>,
    scratch: &mut Scratch,
) {
    let (n1, n2, trunc2) = (p.n1(), p.n2(), p.trunc2());
    let tw = column_twiddle(p, i);

    revbin_permute(left, n2, p.depth());
    ifft_radix2_twiddle(ring, left, n2 / 2, p.w() * n1, tw, scratch);

    // Only the first trunc2 transformed rows are meaningful; bring them
    // back to bit-reversed order.
    for k in 0..trunc2 {
        let s = revbin(k, p.depth());
        if k < s {
            right.swap(k, s);
        }
    }
    // The missing right inputs are zero, so rows past trunc2 are the
    // left values twiddled, already scaled by 2n.
    for k in trunc2..n2 {
        Rotation::of(p, i + k * n1).adjust(ring, left.get(k), right.get_mut(k), scratch);
    }
    ifft_truncate1_twiddle(ring, right, n2 / 2, p.w() * n1, tw, trunc2, scratch);

    for k in 0..n2 {
        let a = left.get_mut(k);
        if k < trunc2 {
            Rotation::of(p, i + k * n1).butterfly_inv(ring, a, right.get_mut(k), scratch);
        } else {
            ring.add(&mut scratch.t1, a, a);
            mem::swap(a, &mut scratch.t1);
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;
    use num_traits::Zero;

    use super::*;
    use crate::reference::{evaluate, random_values, scaled, signal_of};

    /// Random input with zeros from `trunc` on.
    fn input(p: &MfaParams, seed: u64) -> Vec<BigUint> {
        let mut values = random_values(p.ring(), p.len(), seed);
        for v in &mut values[p.trunc()..] {
            *v = BigUint::zero();
        }
        values
    }

    fn check_against_direct_evaluation(p: &MfaParams, seed: u64) {
        let ring = p.ring();
        let values = input(p, seed);
        let mut signal = signal_of(ring, &values);
        let mut scratch = Scratch::new(ring);
        fft_mfa_truncate_sqrt2(&mut signal, p, &mut scratch);

        let out = signal.to_biguints();
        for (slot, got) in out.iter().enumerate() {
            if let Some(e) = p.frequency_of(slot) {
                let expected = evaluate(ring, &values, p.w(), e);
                assert_eq!(got, &expected, "{p:?} slot={slot} e={e}");
            }
        }
    }

    #[test]
    fn even_weight_matches_direct_evaluation() {
        check_against_direct_evaluation(&MfaParams::new(4, 2, 2, 16).unwrap(), 1);
        check_against_direct_evaluation(&MfaParams::new(4, 2, 2, 12).unwrap(), 2);
        check_against_direct_evaluation(&MfaParams::new(8, 8, 4, 24).unwrap(), 3);
        check_against_direct_evaluation(&MfaParams::new(16, 4, 4, 40).unwrap(), 4);
        check_against_direct_evaluation(&MfaParams::new(16, 4, 8, 64).unwrap(), 5);
    }

    #[test]
    fn odd_weight_matches_direct_evaluation() {
        check_against_direct_evaluation(&MfaParams::new(4, 1, 2, 16).unwrap(), 6);
        check_against_direct_evaluation(&MfaParams::new(8, 1, 2, 20).unwrap(), 7);
        check_against_direct_evaluation(&MfaParams::new(8, 3, 4, 24).unwrap(), 8);
        check_against_direct_evaluation(&MfaParams::new(16, 5, 4, 48).unwrap(), 9);
    }

    fn check_roundtrip(p: &MfaParams, seed: u64) {
        let ring = p.ring();
        let values = input(p, seed);
        let mut signal = signal_of(ring, &values);
        let mut scratch = Scratch::new(ring);
        fft_mfa_truncate_sqrt2(&mut signal, p, &mut scratch);
        ifft_mfa_truncate_sqrt2(&mut signal, p, &mut scratch);

        let shift = (4 * p.n()).trailing_zeros() as usize;
        let out = signal.to_biguints();
        for k in 0..p.trunc() {
            assert_eq!(out[k], scaled(ring, &values[k], shift), "{p:?} k={k}");
        }
    }

    #[test]
    fn roundtrip_scales_by_4n() {
        check_roundtrip(&MfaParams::new(4, 2, 2, 12).unwrap(), 11);
        check_roundtrip(&MfaParams::new(4, 1, 2, 16).unwrap(), 12);
        check_roundtrip(&MfaParams::new(8, 3, 4, 24).unwrap(), 13);
        check_roundtrip(&MfaParams::new(16, 4, 4, 40).unwrap(), 14);
        check_roundtrip(&MfaParams::new(32, 8, 8, 80).unwrap(), 15);
        check_roundtrip(&MfaParams::new(32, 2, 4, 128).unwrap(), 16);
    }

    #[test]
    fn outer_then_row_pass_equals_forward() {
        let p = MfaParams::new(16, 4, 4, 40).unwrap();
        let ring = p.ring();
        let values = input(&p, 21);
        let mut scratch = Scratch::new(ring);

        let mut full = signal_of(ring, &values);
        fft_mfa_truncate_sqrt2(&mut full, &p, &mut scratch);

        let mut split = signal_of(ring, &values);
        fft_mfa_truncate_sqrt2_outer(&mut split, &p, &mut scratch);
        fft_mfa_row_pass(&mut split, &p, &mut scratch);

        let (full, split) = (full.to_biguints(), split.to_biguints());
        for slot in (0..p.len()).filter(|&s| p.is_output_slot(s)) {
            assert_eq!(full[slot], split[slot], "slot={slot}");
        }
    }

    #[test]
    fn parallel_matches_sequential() {
        let p = MfaParams::new(16, 2, 4, 56).unwrap();
        let ring = p.ring();
        let values = input(&p, 31);
        let sequential = MfaTransform::new(p, TransformConfig::sequential());
        let parallel = MfaTransform::new(
            p,
            TransformConfig {
                parallel_threshold: 1,
                ..TransformConfig::default()
            },
        );

        let mut a = signal_of(ring, &values);
        let mut b = signal_of(ring, &values);
        sequential.forward(&mut a).unwrap();
        parallel.forward(&mut b).unwrap();
        for slot in (0..p.len()).filter(|&s| p.is_output_slot(s)) {
            assert_eq!(a.get(slot), b.get(slot), "forward slot={slot}");
        }

        sequential.inverse(&mut a).unwrap();
        parallel.inverse(&mut b).unwrap();
        for k in 0..p.trunc() {
            assert_eq!(a.get(k), b.get(k), "inverse k={k}");
        }
    }

    #[test]
    fn transform_only_relocates_buffers() {
        let p = MfaParams::new(8, 4, 2, 20).unwrap();
        let ring = p.ring();
        let mut signal = signal_of(ring, &input(&p, 41));
        let mut scratch = Scratch::new(ring);
        let ids = |signal: &Signal, scratch: &Scratch| {
            let mut all = signal.buffer_ids();
            all.extend(scratch.buffer_ids());
            all.sort_unstable();
            all
        };
        let before = ids(&signal, &scratch);
        fft_mfa_truncate_sqrt2(&mut signal, &p, &mut scratch);
        ifft_mfa_truncate_sqrt2(&mut signal, &p, &mut scratch);
        let mut after = ids(&signal, &scratch);
        assert_eq!(before, after);
        after.dedup();
        assert_eq!(after.len(), before.len());
    }

    #[test]
    fn transform_rejects_mismatched_signals() {
        let p = MfaParams::new(4, 2, 2, 16).unwrap();
        let transform = MfaTransform::new(p, TransformConfig::default());
        let mut short = Signal::zeroed(p.ring(), 8);
        assert!(matches!(transform.forward(&mut short), Err(TransformError::SignalMismatch(_))));
        let mut wrong_ring = Signal::zeroed(Ring::new(16), 16);
        assert!(matches!(transform.inverse(&mut wrong_ring), Err(TransformError::SignalMismatch(_))));
        assert_eq!(transform.signal().len(), 16);
    }

    #[test]
    #[should_panic(expected = "signal length does not match")]
    fn free_functions_assert_the_signal_shape() {
        let p = MfaParams::new(4, 2, 2, 16).unwrap();
        let mut signal = Signal::zeroed(p.ring(), 12);
        let mut scratch = Scratch::new(p.ring());
        fft_mfa_truncate_sqrt2(&mut signal, &p, &mut scratch);
    }
}
