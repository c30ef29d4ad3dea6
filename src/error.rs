//! Error types for chat-onboard.
//!
//! Validation failures are not errors: they are answered with a corrective
//! transcript entry and the flow stays where it is. The types here cover
//! operations called in the wrong mode and failures of the capabilities the
//! flow depends on.

use crate::onboarding::field::FieldKey;
use crate::onboarding::state::FlowMode;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Profile store error: {0}")]
    Store(#[from] StoreError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },
}

/// An onboarding operation that is not valid in the current state.
///
/// None of these change the flow's state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("Cannot {operation} while {mode}")]
    InvalidOperation {
        operation: &'static str,
        mode: FlowMode,
    },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {got} is not awaiting input (expected {expected})")]
    FieldNotAwaited { expected: String, got: FieldKey },
}

/// File-selection capability errors.
///
/// The manager reports these to hosts as a failed upload; they never reach
/// the top-level `Error`.
#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// "Save Information" capability errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Profile is incomplete: missing {0}")]
    Incomplete(FieldKey),

    #[error("Save failed: {0}")]
    Failed(String),
}

/// Hosting channel errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(port: u16) -> std::result::Result<(), ChannelError> {
        Err(ChannelError::StartupFailed {
            name: "http".into(),
            reason: format!("cannot bind 0.0.0.0:{port}"),
        })
    }

    fn start(port: u16) -> Result<()> {
        bind(port)?;
        Ok(())
    }

    #[test]
    fn channel_startup_failure_reaches_top_level() {
        let err = start(8080).unwrap_err();
        assert!(matches!(err, Error::Channel(ChannelError::StartupFailed { .. })));
        assert_eq!(
            err.to_string(),
            "Channel error: Channel http failed to start: cannot bind 0.0.0.0:8080"
        );
    }

    #[test]
    fn store_refusal_names_missing_field() {
        let err: Error = StoreError::Incomplete(FieldKey::Phone).into();
        assert!(err.to_string().contains("missing"));
    }
}
