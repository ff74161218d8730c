//! Application configuration from CLI flags and environment.

use clap::{Parser, ValueEnum};
use negafft::TransformConfig;

/// What the binary exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Multiply two random operands and check against num-bigint.
    Mul,
    /// Square a random operand and check against num-bigint.
    Square,
    /// Forward and inverse transform of a random signal.
    Roundtrip,
}

impl Mode {
    /// Lower-case name, as accepted on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Mul => "mul",
            Self::Square => "square",
            Self::Roundtrip => "roundtrip",
        }
    }
}

/// negafft — exact truncated FFT multiplication over Z/(2^N+1).
#[derive(Parser, Debug)]
#[command(name = "negafft", version, about)]
pub struct AppConfig {
    /// Operation to run.
    #[arg(long, value_enum, default_value = "mul", env = "NEGAFFT_MODE")]
    pub mode: Mode,

    /// Operand size in bits (mul, square).
    #[arg(short, long, default_value = "100000", env = "NEGAFFT_BITS")]
    pub bits: u64,

    /// Seed for the random operands.
    #[arg(long, default_value = "1", env = "NEGAFFT_SEED")]
    pub seed: u64,

    /// log2(n) of the transform (roundtrip); the signal has 4n slots.
    #[arg(long, default_value = "8", env = "NEGAFFT_DEPTH")]
    pub depth: u32,

    /// Bit weight w of the transform (roundtrip); the ring is 2^(n·w)+1.
    #[arg(short, long, default_value = "2", env = "NEGAFFT_WEIGHT")]
    pub weight: usize,

    /// Signal size in words from which passes run in parallel (0 = default).
    #[arg(long, default_value = "0", env = "NEGAFFT_PARALLEL_THRESHOLD")]
    pub parallel_threshold: usize,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Quiet mode (no report on success).
    #[arg(short, long)]
    pub quiet: bool,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Transform configuration for this run.
    ///
    /// The transform is always used for `mul`/`square`, whatever the
    /// operand size.
    #[must_use]
    pub fn transform_config(&self) -> TransformConfig {
        TransformConfig {
            parallel_threshold: self.parallel_threshold,
            fft_threshold: 1,
        }
        .normalize()
    }
}
