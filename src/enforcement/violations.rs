//! Errors raised when an operation is refused.

use crate::builder::BuildError;
use crate::core::HistoryError;
use std::fmt;
use thiserror::Error;

/// Optional parts of a match, toggled in the match parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Cube,
    Dice,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Feature::Cube => "doubling cube",
            Feature::Dice => "dice",
        };
        f.write_str(label)
    }
}

/// Why an operation did nothing.
///
/// Every variant is recoverable: the game state is exactly what it was
/// before the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("{operation} is not allowed: {reason}")]
    InvalidTransition {
        operation: &'static str,
        reason: String,
    },

    #[error("{operation} requires the {feature} to be enabled")]
    FeatureDisabled {
        operation: &'static str,
        feature: Feature,
    },

    #[error(transparent)]
    EmptyHistory(#[from] HistoryError),

    #[error("invalid match parameters: {0}")]
    InvalidParameters(#[from] BuildError),
}

impl GameError {
    pub(crate) fn invalid(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            operation,
            reason: reason.into(),
        }
    }
}
