//! Application entry point and dispatch.

use std::time::{Duration, Instant};

use anyhow::Result;
use num_bigint::BigUint;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::info;

use negafft::{
    fft_mul, fft_sqr, select_params, MfaParams, MfaTransform, Signal, TransformConfig,
    TransformError,
};

use crate::config::{AppConfig, Mode};
use crate::errors::AppError;

/// Largest `log2(n)` accepted for roundtrip mode.
const MAX_ROUNDTRIP_DEPTH: u32 = 24;

/// Outcome of one run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Operation that ran.
    pub mode: &'static str,
    /// Operand size in bits (0 for roundtrip).
    pub bits: u64,
    /// Transform half-length parameter.
    pub n: usize,
    /// Bit weight.
    pub w: usize,
    /// Grid columns.
    pub n1: usize,
    /// Outputs computed.
    pub trunc: usize,
    /// Wall time in milliseconds.
    pub elapsed_ms: f64,
}

/// Run the application and print the report.
pub fn run(config: &AppConfig) -> Result<()> {
    let report = execute(config)?;
    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !config.quiet {
        println!(
            "{} ok: bits={} n={} w={} n1={} trunc={} in {:.3} ms",
            report.mode, report.bits, report.n, report.w, report.n1, report.trunc, report.elapsed_ms
        );
    }
    Ok(())
}

/// Run the configured operation and verify it.
pub fn execute(config: &AppConfig) -> Result<Report, AppError> {
    let transform_config = config.transform_config();
    match config.mode {
        Mode::Mul | Mode::Square => run_multiply(config, &transform_config),
        Mode::Roundtrip => run_roundtrip(config, &transform_config),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn run_multiply(config: &AppConfig, transform_config: &TransformConfig) -> Result<Report, AppError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let a = random_operand(&mut rng, config.bits);
    let square = config.mode == Mode::Square;
    let b = if square { a.clone() } else { random_operand(&mut rng, config.bits) };
    let plan = select_params(a.bits() as usize, b.bits() as usize)?;
    info!(bits = config.bits, ?plan, "multiplying");

    let start = Instant::now();
    let product = if square {
        fft_sqr(&a, transform_config)?
    } else {
        fft_mul(&a, &b, transform_config)?
    };
    let elapsed = start.elapsed();

    if product != &a * &b {
        return Err(AppError::Mismatch(format!(
            "{} of {}-bit operands differs from num-bigint",
            config.mode.name(),
            config.bits
        )));
    }
    Ok(report(config.mode, config.bits, &plan.params, elapsed))
}

fn run_roundtrip(config: &AppConfig, transform_config: &TransformConfig) -> Result<Report, AppError> {
    if config.depth > MAX_ROUNDTRIP_DEPTH {
        return Err(TransformError::TooLarge(config.weight << config.depth.min(63)).into());
    }
    let n = 1usize << config.depth;
    let params = MfaParams::with_default_split(n, config.weight, 4 * n)?;
    let transform = MfaTransform::new(params, *transform_config);
    let ring = params.ring();

    let mut rng = StdRng::seed_from_u64(config.seed);
    let values: Vec<u64> = (0..params.len()).map(|_| rng.random()).collect();
    let original = Signal::from_u64s(ring, &values, params.len());
    let mut signal = original.clone();

    let start = Instant::now();
    transform.forward(&mut signal)?;
    transform.inverse(&mut signal)?;
    let elapsed = start.elapsed();

    let shift = (4 * n).trailing_zeros() as usize;
    let mut expected = ring.zero();
    for k in 0..params.trunc() {
        ring.mul_2exp(&mut expected, original.get(k), shift);
        if signal.get(k) != &expected {
            return Err(AppError::Mismatch(format!("roundtrip differs at slot {k}")));
        }
    }
    Ok(report(config.mode, 0, &params, elapsed))
}

fn report(mode: Mode, bits: u64, p: &MfaParams, elapsed: Duration) -> Report {
    Report {
        mode: mode.name(),
        bits,
        n: p.n(),
        w: p.w(),
        n1: p.n1(),
        trunc: p.trunc(),
        elapsed_ms: elapsed.as_secs_f64() * 1000.0,
    }
}

/// A random operand of exactly `bits` bits.
#[allow(clippy::cast_possible_truncation)]
fn random_operand(rng: &mut StdRng, bits: u64) -> BigUint {
    if bits == 0 {
        return BigUint::default();
    }
    let digits: Vec<u32> = (0..bits.div_ceil(32)).map(|_| rng.random()).collect();
    let mut value = BigUint::from_slice(&digits) >> (digits.len() as u64 * 32 - bits);
    value.set_bit(bits - 1, true);
    value
}
