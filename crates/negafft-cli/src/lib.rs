//! negafft-cli library — application logic for the `negafft` binary.

pub mod app;
pub mod config;
pub mod errors;
