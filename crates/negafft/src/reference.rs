//! Direct evaluation of the transforms, for tests.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::fermat::Ring;
use crate::signal::Signal;

/// `sqrt2^h`, i.e. 2^(h/2) for even `h`.
pub(crate) fn half_bit_pow(ring: Ring, h: usize) -> BigUint {
    let m = ring.modulus();
    if h % 2 == 0 {
        return BigUint::from(2u32).modpow(&BigUint::from(h / 2), &m);
    }
    let bits = ring.bits();
    assert!(bits % 4 == 0);
    let root = ((BigUint::one() << (3 * bits / 4)) + &m - (BigUint::one() << (bits / 4))) % &m;
    root.modpow(&BigUint::from(h), &m)
}

/// `Σ_m a_m · sqrt2^(h·m·e)`.
pub(crate) fn evaluate(ring: Ring, input: &[BigUint], h: usize, e: usize) -> BigUint {
    let m = ring.modulus();
    let period = 4 * ring.bits();
    input.iter().enumerate().fold(BigUint::zero(), |acc, (k, a)| {
        let exp = (h * ((k * e) % period)) % period;
        (acc + a * half_bit_pow(ring, exp)) % &m
    })
}

/// `value · 2^shift` reduced.
pub(crate) fn scaled(ring: Ring, value: &BigUint, shift: usize) -> BigUint {
    (value << shift) % ring.modulus()
}

/// Random reduced values.
pub(crate) fn random_values(ring: Ring, len: usize, seed: u64) -> Vec<BigUint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let m = ring.modulus();
    (0..len)
        .map(|_| {
            let words: Vec<u32> = (0..ring.words() * 2).map(|_| rng.random()).collect();
            BigUint::from_slice(&words) % &m
        })
        .collect()
}

pub(crate) fn signal_of(ring: Ring, values: &[BigUint]) -> Signal {
    Signal::from_coeffs(ring, values.iter().map(|v| ring.from_biguint(v)).collect())
}
