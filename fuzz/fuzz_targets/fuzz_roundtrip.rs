#![no_main]

use libfuzzer_sys::fuzz_target;

use negafft::{MfaParams, MfaTransform, Signal, TransformConfig};

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    // n in [2, 64], w in [1, 4], truncation step from the third byte
    let n = 2usize << (data[0] % 6);
    let w = 1 + usize::from(data[1] % 4);
    let Ok(probe) = MfaParams::with_default_split(n, w, 4 * n) else {
        return;
    };
    let step = 2 * probe.n1();
    let trunc = 2 * n + step * (1 + usize::from(data[2]) % (2 * n / step));
    let Ok(params) = MfaParams::with_default_split(n, w, trunc) else {
        return;
    };

    let values: Vec<u64> = data[3..].iter().map(|&b| u64::from(b)).take(trunc).collect();
    let ring = params.ring();
    let original = Signal::from_u64s(ring, &values, params.len());
    let mut signal = original.clone();
    let transform = MfaTransform::new(params, TransformConfig::sequential());
    transform.forward(&mut signal).expect("signal matches");
    transform.inverse(&mut signal).expect("signal matches");

    let shift = (4 * n).trailing_zeros() as usize;
    let mut expected = ring.zero();
    for k in 0..trunc {
        ring.mul_2exp(&mut expected, original.get(k), shift);
        assert_eq!(signal.get(k), &expected, "slot {k}");
    }
});
