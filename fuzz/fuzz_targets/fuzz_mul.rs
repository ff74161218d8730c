#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;

use negafft::{fft_mul, TransformConfig};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte picks the split point between the operands
    let split = 1 + usize::from(data[0]) % (data.len() - 1);
    let a = BigUint::from_bytes_le(&data[1..split]);
    let b = BigUint::from_bytes_le(&data[split..]);

    let product = fft_mul(&a, &b, &TransformConfig::sequential()).expect("operands fit");
    assert_eq!(product, &a * &b);
});
