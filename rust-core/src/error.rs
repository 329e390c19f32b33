//! Error types for the spectrum engine and its collaborators

use thiserror::Error;

/// Rejected capture configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Frame size {0} is not a power of two >= 2")]
    InvalidFrameSize(usize),

    #[error("Invalid {name}: {value} (must be finite and > 0)")]
    InvalidRate { name: &'static str, value: f64 },
}

/// Failure inside a transform backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Transform buffer length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Transform backend failed: {0}")]
    Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to allocate buffer of {len} elements")]
    Allocation { len: usize },

    #[error("Engine has been disposed")]
    Disposed,

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Failure delivering an event to a sink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Sink receiver disconnected")]
    Disconnected,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Capture session is not running")]
    NotRunning,

    #[error("Capture session is already running")]
    AlreadyRunning,
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        SessionError::Engine(EngineError::Config(err))
    }
}

/// Allocate a zero-filled buffer, reporting exhaustion instead of aborting
pub(crate) fn try_zeroed<T: Clone + Default>(len: usize) -> Result<Vec<T>, EngineError> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| EngineError::Allocation { len })?;
    buffer.resize(len, T::default());
    Ok(buffer)
}
