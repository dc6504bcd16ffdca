//! Build errors for match parameters and game machines.

use thiserror::Error;

/// Errors that can occur when building match parameters and machines.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Environment not specified. Call .environment(env) before .build()")]
    MissingEnvironment,

    #[error("Score limit must be at least 1, got {0}")]
    InvalidScoreLimit(u32),
}
