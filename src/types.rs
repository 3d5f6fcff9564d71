//! Core types and settings for the telemetry pipeline

use core::fmt;
use core::str::FromStr;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Sensor channel a frame or sample belongs to
///
/// Each stream is backed by its own [`SampleStore`](crate::SampleStore) and
/// decoded with its own calibration.
///
/// # Example
/// ```
/// use ring_telemetry::StreamKind;
///
/// let stream: StreamKind = "gyro".parse().unwrap();
/// assert_eq!(stream, StreamKind::Gyro);
/// assert!("magnetometer".parse::<StreamKind>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    /// Accelerometer, values in g
    Accel,
    /// Gyroscope, values in degrees per second
    Gyro,
}

impl StreamKind {
    /// Both streams, accelerometer first
    pub const ALL: [StreamKind; 2] = [StreamKind::Accel, StreamKind::Gyro];

    /// Selector name used in logs and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Accel => "accel",
            StreamKind::Gyro => "gyro",
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accel" => Ok(StreamKind::Accel),
            "gyro" => Ok(StreamKind::Gyro),
            _ => Err(Error::InvalidAxisSelector(s.to_string())),
        }
    }
}

/// One timestamped three-axis reading
///
/// `delta` is the device-reported time in milliseconds since the previous
/// sample on the same stream. It is a raw 16-bit counter and wraps at 65536.
/// Axis values are in physical units: g for the accelerometer, degrees per
/// second for the gyroscope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub delta: u16,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Sample {
    /// Placeholder held by store slots that have never been written.
    ///
    /// `0xFFFF` is the 16-bit image of a `-1` delta.
    pub const SENTINEL: Sample = Sample {
        delta: u16::MAX,
        x: -1.0,
        y: -1.0,
        z: -1.0,
    };

    pub fn new(delta: u16, x: f64, y: f64, z: f64) -> Self {
        Self { delta, x, y, z }
    }

    /// Build a sample from an axis vector
    pub fn from_vector(delta: u16, axes: Vector3<f64>) -> Self {
        Self::new(delta, axes.x, axes.y, axes.z)
    }

    /// Axis values as a vector
    pub fn axes(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Whether this is the unwritten-slot placeholder
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

/// Orientation estimate paired with the accelerometer delta it was computed at
///
/// `x` is heading, `y` pitch and `z` roll, all in degrees. The field names
/// match [`Sample`] so presentation code can treat both as `{delta, x, y, z}`
/// records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientationSample {
    pub delta: u16,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl OrientationSample {
    pub fn heading(&self) -> f64 {
        self.x
    }

    pub fn pitch(&self) -> f64 {
        self.y
    }

    pub fn roll(&self) -> f64 {
        self.z
    }
}

/// Binary frame decoding settings
///
/// # Example
/// ```
/// use ring_telemetry::CodecSettings;
///
/// let settings = CodecSettings::default();
/// assert_eq!(settings.scale, 938.0);
/// assert_eq!(settings.gyro_bias, [-0.4, -0.1, 0.4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// Counts per physical unit, shared by both streams
    pub scale: f64,
    /// Additive correction applied to gyroscope samples after scaling
    pub gyro_bias: [f64; 3],
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            scale: 938.0,
            gyro_bias: [-0.4, -0.1, 0.4],
        }
    }
}

impl CodecSettings {
    /// Additive correction for the given stream (zero for the accelerometer)
    pub fn bias(&self, stream: StreamKind) -> Vector3<f64> {
        match stream {
            StreamKind::Accel => Vector3::zeros(),
            StreamKind::Gyro => Vector3::from(self.gyro_bias),
        }
    }
}

/// How the axis smoother runs its Kalman filter over a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Single forward pass; each output is the filtered mean at that index
    #[default]
    Filter,
    /// Forward pass followed by a Rauch-Tung-Striebel backward pass
    RauchTungStriebel,
}

/// Scalar Kalman filter settings used for every axis
///
/// The model is a constant-position random walk observed directly.
///
/// # Example
/// ```
/// use ring_telemetry::{KalmanSettings, SmoothingMode};
///
/// let settings = KalmanSettings {
///     measurement_noise: 4.0,
///     mode: SmoothingMode::RauchTungStriebel,
///     ..Default::default()
/// };
/// assert_eq!(settings.process_noise, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KalmanSettings {
    /// Variance added to the state on every predict step
    pub process_noise: f64,
    /// Variance of each observation
    pub measurement_noise: f64,
    /// State mean before the first observation
    pub initial_mean: f64,
    /// State variance before the first observation
    pub initial_covariance: f64,
    pub mode: SmoothingMode,
}

impl Default for KalmanSettings {
    fn default() -> Self {
        Self {
            process_noise: 1.0,
            measurement_noise: 1.0,
            initial_mean: 0.0,
            initial_covariance: 1e6,
            mode: SmoothingMode::Filter,
        }
    }
}

/// Attitude filter algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Gradient-descent filter with gain `beta`
    #[default]
    Madgwick,
    /// Proportional-integral complementary filter with gains `kp` and `ki`
    Mahony,
}

/// Orientation estimator settings
///
/// # Example
/// ```
/// use ring_telemetry::{Algorithm, AttitudeSettings};
///
/// let settings = AttitudeSettings::default();
/// assert_eq!(settings.algorithm, Algorithm::Madgwick);
/// assert_eq!(settings.sample_interval_ms, 40.0);
/// assert_eq!(settings.beta, 0.4);
/// assert_eq!(settings.window, 800);
/// assert!(!settings.initialise);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttitudeSettings {
    pub algorithm: Algorithm,
    /// Base sample interval in milliseconds, used when a sample reports no
    /// elapsed time
    pub sample_interval_ms: f64,
    /// Madgwick gradient-descent gain
    pub beta: f64,
    /// Mahony proportional gain
    pub kp: f64,
    /// Mahony integral gain
    pub ki: f64,
    /// Level the initial orientation from the first accelerometer reading
    /// instead of starting from identity
    pub initialise: bool,
    /// Number of index-aligned pairs consumed per estimate
    pub window: usize,
}

impl Default for AttitudeSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Madgwick,
            sample_interval_ms: 40.0,
            beta: 0.4,
            kp: 0.5,
            ki: 0.0,
            initialise: false,
            window: 800,
        }
    }
}

impl AttitudeSettings {
    /// Base sample interval in seconds
    pub fn sample_interval(&self) -> f64 {
        self.sample_interval_ms / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_kind_parsing() {
        assert_eq!("accel".parse::<StreamKind>().unwrap(), StreamKind::Accel);
        assert_eq!(" GYRO ".parse::<StreamKind>().unwrap(), StreamKind::Gyro);

        let err = "mag".parse::<StreamKind>().unwrap_err();
        assert!(matches!(err, Error::InvalidAxisSelector(ref s) if s == "mag"));
    }

    #[test]
    fn test_stream_kind_display_round_trip() {
        for stream in StreamKind::ALL {
            assert_eq!(stream.to_string().parse::<StreamKind>().unwrap(), stream);
        }
    }

    #[test]
    fn test_sentinel() {
        assert!(Sample::SENTINEL.is_sentinel());
        assert!(!Sample::new(0, -1.0, -1.0, -1.0).is_sentinel());
    }

    #[test]
    fn test_codec_bias() {
        let settings = CodecSettings::default();
        assert_eq!(settings.bias(StreamKind::Accel), Vector3::zeros());
        assert_eq!(
            settings.bias(StreamKind::Gyro),
            Vector3::new(-0.4, -0.1, 0.4)
        );
    }
}
