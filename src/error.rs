//! Error types for the telemetry pipeline

use thiserror::Error;

/// Failure to decode a single frame. The frame is dropped; nothing else is
/// affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("notification carried no payload")]
    Empty,
    #[error("expected {expected} bytes, received {actual}")]
    BadLength { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    /// Not enough samples on one or both streams to fill the estimation window
    #[error("orientation needs {required} paired samples, have {accel} accel and {gyro} gyro")]
    InsufficientSamples {
        required: usize,
        accel: usize,
        gyro: usize,
    },
    /// The attitude filter produced a non-finite quaternion
    #[error("attitude filter diverged at sample {index}")]
    NumericalDivergence { index: usize },
    #[error("stream selector must be \"accel\" or \"gyro\", got {0:?}")]
    InvalidAxisSelector(String),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
