//! # negafft
//!
//! Exact FFT over Z/(2^N + 1) for big-integer multiplication.
//!
//! The transform is built from word shifts, additions and sign flips only.
//! The core is the truncated matrix-Fourier transform in [`fft_mfa`], which
//! splits a length-4n transform into a sqrt2 layer and two `n2 × n1` grids
//! of short twiddled column transforms and plain row transforms.

pub mod butterfly;
pub mod config;
pub mod error;
pub mod fermat;
pub mod fft;
pub mod fft_core;
pub mod fft_mfa;
pub mod fft_poly;
pub mod fft_twiddle;
pub mod limbs;
pub mod parallel;
pub mod params;
pub mod signal;

#[cfg(test)]
mod reference;

// Re-exports
pub use config::TransformConfig;
pub use error::TransformError;
pub use fermat::{Coeff, Ring};
pub use fft::{fft_mul, fft_sqr, mul, mul_with, select_params, sqr, sqr_with, FftPlan};
pub use fft_mfa::{
    fft_mfa_row_pass, fft_mfa_truncate_sqrt2, fft_mfa_truncate_sqrt2_outer, ifft_mfa_truncate_sqrt2,
    MfaTransform,
};
pub use fft_twiddle::Twiddle;
pub use params::MfaParams;
pub use signal::{Scratch, Signal, Strided};
