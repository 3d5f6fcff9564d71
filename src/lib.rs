//! Ring Telemetry - IMU telemetry ingestion and orientation fusion
//!
//! Turns the accelerometer and gyroscope notifications streamed by a
//! wearable ring into a bounded sample history, Kalman-smoothed axis series
//! and a heading/pitch/roll sequence from a Madgwick attitude filter.
//!
//! # Pipeline
//!
//! - [`codec`]: 8-byte little-endian frames to physically scaled [`Sample`]s
//! - [`SampleStore`]: fixed-capacity ring buffer per stream
//! - [`Smoother`]: independent scalar Kalman filter per axis, run over a
//!   whole series
//! - [`Estimator`]: Madgwick (or Mahony) filter over a fixed window of
//!   accelerometer/gyroscope pairs
//! - [`TelemetrySession`]: the transport-facing glue tying the above together
//!
//! All operations are synchronous. The transport (scanning, pairing,
//! subscriptions) lives outside this crate and only hands frames in.
//!
//! # Quick Start
//!
//! ```rust
//! use ring_telemetry::{SampleStore, StreamKind, codec, estimate, smooth};
//!
//! let mut accel = SampleStore::new(1000);
//! let mut gyro = SampleStore::new(1000);
//!
//! // One frame per notification: [delta, x, y, z] as little-endian u16
//! let level = [40, 0, 0, 0, 0, 0, 0xAA, 0x03]; // z = 938 counts = 1 g
//! let still = [40, 0, 0x75, 0x01, 0x5E, 0x00, 0x89, 0xFE];
//!
//! for _ in 0..1000 {
//!     accel.write(codec::decode(&level, StreamKind::Accel).unwrap());
//!     gyro.write(codec::decode(&still, StreamKind::Gyro).unwrap());
//! }
//!
//! let smoothed = smooth(StreamKind::Accel, &accel.chronological());
//! assert_eq!(smoothed.len(), 1000);
//!
//! let orientation = estimate(&accel.chronological(), &gyro.chronological(), None).unwrap();
//! assert_eq!(orientation.len(), 800);
//! ```

pub mod attitude;
pub mod codec;
mod config;
mod error;
pub mod madgwick;
pub mod mahony;
mod math;
pub mod orientation;
pub mod session;
pub mod smoother;
mod store;
pub mod timeline;
mod types;

// Re-export all public types and functions
pub use attitude::{AttitudeFilter, AttitudeFilterState};
pub use codec::{Codec, FRAME_LEN, decode};
pub use config::PipelineConfig;
pub use error::{DecodeError, Error, Result};
pub use math::{DEG_TO_RAD, QuaternionExt, RAD_TO_DEG, Vector3Ext};
pub use orientation::{Estimator, estimate};
pub use session::{ControlCommand, StreamStats, TelemetrySession};
pub use smoother::{KalmanState, Smoother, smooth};
pub use store::{DEFAULT_CAPACITY, SampleStore};
pub use types::*;
