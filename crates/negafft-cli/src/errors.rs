//! Error handling and exit codes.

use negafft::TransformError;

/// Exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// The transform result disagreed with the reference.
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}

/// Application errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The requested transform parameters are invalid.
    #[error("configuration error: {0}")]
    Config(#[from] TransformError),

    /// The transform result disagreed with the reference.
    #[error("result mismatch: {0}")]
    Mismatch(String),
}

/// Map an application error to its exit code.
pub fn handle_error(err: &AppError) -> i32 {
    match err {
        AppError::Config(_) => exit_codes::ERROR_CONFIG,
        AppError::Mismatch(_) => exit_codes::ERROR_MISMATCH,
    }
}

/// Exit code for any error reaching `main`.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<AppError>()
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
