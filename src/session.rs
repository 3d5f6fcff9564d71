//! Telemetry session: the boundary between the wireless transport and the
//! processing pipeline
//!
//! The transport owns scanning, pairing and subscriptions. Once subscribed it
//! forwards every characteristic notification to
//! [`TelemetrySession::on_notification`], which decodes the frame and writes
//! it to that stream's store. Notifications for one stream must arrive in
//! order; the two streams may interleave freely.
//!
//! # Example
//! ```
//! use ring_telemetry::{StreamKind, TelemetrySession};
//!
//! let mut session = TelemetrySession::new();
//! session.connect();
//!
//! let frame = [40, 0, 0, 0, 0, 0, 0xAA, 0x03];
//! session.on_notification(StreamKind::Accel, Some(&frame)).unwrap();
//! assert!(session.on_notification(StreamKind::Gyro, Some(&frame[..7])).is_err());
//!
//! assert_eq!(session.stats(StreamKind::Accel).accepted, 1);
//! assert_eq!(session.stats(StreamKind::Gyro).dropped, 1);
//! ```

use crate::codec::Codec;
use crate::config::PipelineConfig;
use crate::error::{DecodeError, Result};
use crate::orientation::Estimator;
use crate::smoother::Smoother;
use crate::store::SampleStore;
use crate::types::{OrientationSample, Sample, StreamKind};

/// GATT identifiers of the ring's services and characteristics
pub mod uuids {
    /// Service carrying both sensor characteristics
    pub const SENSOR_SERVICE: &str = "87654321-4321-6789-4321-fedcba987654";
    pub const ACCELEROMETER_CHARACTERISTIC: &str = "abcdef01-2345-6789-abcd-ef0123456789";
    pub const GYROSCOPE_CHARACTERISTIC: &str = "811958ba-dd5b-468e-b773-119f007fe62c";

    /// Service carrying the recording controls
    pub const CONTROL_SERVICE: &str = "fd96b93d-5821-42b7-8f69-a6b09117aa04";
    pub const START_RECORDING_CHARACTERISTIC: &str = "1d651730-eaf2-4647-8d61-fe95357a2dba";
    pub const REQUEST_DATA_CHARACTERISTIC: &str = "e5e6bcee-d52d-44a7-b47e-4a94af177daa";

    /// Advertised name fragment identifying a ring during scanning
    pub const DEVICE_NAME: &str = "Jav Ring";
}

impl StreamKind {
    /// Characteristic the stream is notified on
    pub fn characteristic(&self) -> &'static str {
        match self {
            StreamKind::Accel => uuids::ACCELEROMETER_CHARACTERISTIC,
            StreamKind::Gyro => uuids::GYROSCOPE_CHARACTERISTIC,
        }
    }
}

/// Commands the transport writes to the ring's control service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Begin on-device recording
    StartRecording,
    /// Ask the ring to stream its recorded data
    RequestData,
}

impl ControlCommand {
    /// Characteristic the command is written to
    pub fn characteristic(&self) -> &'static str {
        match self {
            ControlCommand::StartRecording => uuids::START_RECORDING_CHARACTERISTIC,
            ControlCommand::RequestData => uuids::REQUEST_DATA_CHARACTERISTIC,
        }
    }

    /// Bytes to write
    pub fn payload(&self) -> [u8; 1] {
        [1]
    }
}

/// Per-stream frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Frames decoded and stored
    pub accepted: u64,
    /// Frames rejected by the decoder
    pub dropped: u64,
    /// Valid frames that arrived while disconnected
    pub ignored: u64,
}

#[derive(Debug, Clone)]
struct StreamChannel {
    store: SampleStore,
    stats: StreamStats,
}

impl StreamChannel {
    fn new(capacity: usize) -> Self {
        Self {
            store: SampleStore::new(capacity),
            stats: StreamStats::default(),
        }
    }
}

/// Stores and pipeline stages for one connected ring
#[derive(Debug, Clone)]
pub struct TelemetrySession {
    codec: Codec,
    smoother: Smoother,
    estimator: Estimator,
    accel: StreamChannel,
    gyro: StreamChannel,
    connected: bool,
}

impl TelemetrySession {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            codec: Codec::with_settings(config.codec),
            smoother: Smoother::with_settings(config.kalman),
            estimator: Estimator::with_settings(config.attitude),
            accel: StreamChannel::new(config.capacity),
            gyro: StreamChannel::new(config.capacity),
            connected: false,
        }
    }

    /// Mark the transport as subscribed; notifications are stored from now on
    pub fn connect(&mut self) {
        self.connected = true;
        tracing::info!("Telemetry session connected");
    }

    /// Mark the transport as gone; later notifications are not stored
    pub fn disconnect(&mut self) {
        self.connected = false;
        tracing::info!(
            accel = self.accel.stats.accepted,
            gyro = self.gyro.stats.accepted,
            "Telemetry session disconnected"
        );
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Handle one characteristic notification
    ///
    /// A bad or missing payload is counted, logged and returned as an error;
    /// the store is left untouched. Valid frames received while disconnected
    /// are counted as ignored and not stored.
    pub fn on_notification(
        &mut self,
        stream: StreamKind,
        payload: Option<&[u8]>,
    ) -> core::result::Result<(), DecodeError> {
        let codec = self.codec;
        let connected = self.connected;
        let channel = self.channel_mut(stream);

        let sample = match codec.decode_optional(payload, stream) {
            Ok(sample) => sample,
            Err(err) => {
                channel.stats.dropped += 1;
                tracing::warn!(%stream, error = %err, "Dropped telemetry frame");
                return Err(err);
            }
        };

        if !connected {
            channel.stats.ignored += 1;
            tracing::debug!(%stream, "Frame received while disconnected");
            return Ok(());
        }

        channel.store.write(sample);
        channel.stats.accepted += 1;
        Ok(())
    }

    pub fn stats(&self, stream: StreamKind) -> StreamStats {
        self.channel(stream).stats
    }

    pub fn store(&self, stream: StreamKind) -> &SampleStore {
        &self.channel(stream).store
    }

    /// Oldest-first copy of a stream's history
    pub fn history(&self, stream: StreamKind) -> Vec<Sample> {
        self.store(stream).chronological()
    }

    /// Smooth a stream's history
    pub fn smooth(&self, stream: StreamKind) -> Vec<Sample> {
        self.smoother.smooth(stream, &self.history(stream))
    }

    /// Estimate orientation from both histories, paired by index
    ///
    /// # Errors
    /// [`Error::InsufficientSamples`](crate::Error::InsufficientSamples)
    /// until both streams hold a full window; retrying later is safe.
    pub fn estimate_orientation(&self) -> Result<Vec<OrientationSample>> {
        self.estimator.estimate(
            &self.history(StreamKind::Accel),
            &self.history(StreamKind::Gyro),
            None,
        )
    }

    /// Estimate orientation from smoothed histories
    pub fn estimate_smoothed_orientation(&self) -> Result<Vec<OrientationSample>> {
        self.estimator.estimate(
            &self.smooth(StreamKind::Accel),
            &self.smooth(StreamKind::Gyro),
            None,
        )
    }

    /// Forget all stored samples and counters
    pub fn clear(&mut self) {
        for stream in StreamKind::ALL {
            let channel = self.channel_mut(stream);
            channel.store.clear();
            channel.stats = StreamStats::default();
        }
    }

    fn channel(&self, stream: StreamKind) -> &StreamChannel {
        match stream {
            StreamKind::Accel => &self.accel,
            StreamKind::Gyro => &self.gyro,
        }
    }

    fn channel_mut(&mut self, stream: StreamKind) -> &mut StreamChannel {
        match stream {
            StreamKind::Accel => &mut self.accel,
            StreamKind::Gyro => &mut self.gyro,
        }
    }
}

impl Default for TelemetrySession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const FRAME: [u8; 8] = [0x28, 0x00, 0x00, 0x00, 0x00, 0x00, 0xAA, 0x03];

    fn feed(session: &mut TelemetrySession, stream: StreamKind) {
        session.on_notification(stream, Some(&FRAME)).unwrap();
    }

    fn connected() -> TelemetrySession {
        let mut session = TelemetrySession::new();
        session.connect();
        session
    }

    #[test]
    fn test_bad_frame_does_not_advance_cursor() {
        let mut session = connected();
        let err = session
            .on_notification(StreamKind::Accel, Some(&FRAME[..7]))
            .unwrap_err();

        assert!(matches!(err, DecodeError::BadLength { actual: 7, .. }));
        assert_eq!(session.store(StreamKind::Accel).cursor(), 0);
        assert_eq!(session.stats(StreamKind::Accel).dropped, 1);
    }

    #[test]
    fn test_missing_payload_is_dropped() {
        let mut session = connected();
        assert_eq!(
            session.on_notification(StreamKind::Gyro, None),
            Err(DecodeError::Empty)
        );
        assert!(session.store(StreamKind::Gyro).is_empty());
    }

    #[test]
    fn test_streams_are_independent() {
        let mut session = connected();
        feed(&mut session, StreamKind::Accel);
        feed(&mut session, StreamKind::Accel);

        assert_eq!(session.store(StreamKind::Accel).cursor(), 2);
        assert_eq!(session.store(StreamKind::Gyro).cursor(), 0);
        assert_eq!(session.history(StreamKind::Accel).len(), 2);
    }

    #[test]
    fn test_disconnect_stops_writes() {
        let mut session = connected();
        feed(&mut session, StreamKind::Accel);
        session.disconnect();
        feed(&mut session, StreamKind::Accel);

        assert!(!session.is_connected());
        assert_eq!(session.store(StreamKind::Accel).written(), 1);
        assert_eq!(session.stats(StreamKind::Accel).ignored, 1);
    }

    #[test]
    fn test_estimate_needs_full_window() {
        let mut session = connected();
        for _ in 0..799 {
            feed(&mut session, StreamKind::Accel);
            feed(&mut session, StreamKind::Gyro);
        }
        assert!(matches!(
            session.estimate_orientation(),
            Err(Error::InsufficientSamples {
                accel: 799,
                gyro: 799,
                ..
            })
        ));

        feed(&mut session, StreamKind::Accel);
        feed(&mut session, StreamKind::Gyro);
        assert_eq!(session.estimate_orientation().unwrap().len(), 800);
    }

    #[test]
    fn test_smooth_history() {
        let mut session = connected();
        for _ in 0..20 {
            feed(&mut session, StreamKind::Gyro);
        }
        let smoothed = session.smooth(StreamKind::Gyro);
        assert_eq!(smoothed.len(), 20);
        assert!(session.smooth(StreamKind::Accel).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut session = connected();
        feed(&mut session, StreamKind::Accel);
        session.clear();
        assert!(session.store(StreamKind::Accel).is_empty());
        assert_eq!(session.stats(StreamKind::Accel), StreamStats::default());
    }

    #[test]
    fn test_control_commands() {
        assert_eq!(ControlCommand::StartRecording.payload(), [1]);
        assert_eq!(
            ControlCommand::RequestData.characteristic(),
            uuids::REQUEST_DATA_CHARACTERISTIC
        );
        assert_eq!(
            StreamKind::Gyro.characteristic(),
            uuids::GYROSCOPE_CHARACTERISTIC
        );
    }
}
