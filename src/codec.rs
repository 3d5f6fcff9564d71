//! Binary frame codec
//!
//! Every notification from the ring carries one 8-byte frame: four
//! little-endian 16-bit words `[delta, x, y, z]`. `delta` is kept unsigned;
//! the axis words are two's-complement counts divided by the scale constant.
//! Gyroscope samples then receive the fixed bias correction.
//!
//! # Example
//! ```
//! use ring_telemetry::{StreamKind, codec};
//!
//! let frame = [0x01, 0x00, 0x10, 0x00, 0x20, 0x00, 0xFF, 0x7F];
//! let sample = codec::decode(&frame, StreamKind::Accel).unwrap();
//!
//! assert_eq!(sample.delta, 1);
//! assert_eq!(sample.x, 16.0 / 938.0);
//! assert_eq!(sample.z, 32767.0 / 938.0);
//! ```

use nalgebra::Vector3;

use crate::error::DecodeError;
use crate::types::{CodecSettings, Sample, StreamKind};

/// Size in bytes of one telemetry frame
pub const FRAME_LEN: usize = 8;

/// Decode a frame with the default scale and bias
pub fn decode(frame: &[u8], stream: StreamKind) -> Result<Sample, DecodeError> {
    Codec::default().decode(frame, stream)
}

/// Frame decoder/encoder parameterised by [`CodecSettings`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    settings: CodecSettings,
}

impl Codec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CodecSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> CodecSettings {
        self.settings
    }

    /// Decode one frame into a physically scaled sample
    ///
    /// Pure function of the bytes and the stream kind.
    pub fn decode(&self, frame: &[u8], stream: StreamKind) -> Result<Sample, DecodeError> {
        if frame.is_empty() {
            return Err(DecodeError::Empty);
        }
        let words: &[u8; FRAME_LEN] = frame.try_into().map_err(|_| DecodeError::BadLength {
            expected: FRAME_LEN,
            actual: frame.len(),
        })?;

        let word = |offset: usize| u16::from_le_bytes([words[offset], words[offset + 1]]);

        let delta = word(0);
        let counts = Vector3::new(
            word(2) as i16 as f64,
            word(4) as i16 as f64,
            word(6) as i16 as f64,
        );

        let axes = counts / self.settings.scale + self.settings.bias(stream);
        Ok(Sample::from_vector(delta, axes))
    }

    /// Decode a notification payload that may be absent
    pub fn decode_optional(
        &self,
        payload: Option<&[u8]>,
        stream: StreamKind,
    ) -> Result<Sample, DecodeError> {
        match payload {
            Some(frame) => self.decode(frame, stream),
            None => Err(DecodeError::Empty),
        }
    }

    /// Build the frame that decodes back to (approximately) `sample`
    ///
    /// Axis values are rounded to the nearest count and saturated to the
    /// signed 16-bit range.
    pub fn encode(&self, sample: &Sample, stream: StreamKind) -> [u8; FRAME_LEN] {
        let counts = (sample.axes() - self.settings.bias(stream)) * self.settings.scale;
        let to_word = |value: f64| -> [u8; 2] {
            let clamped = value.round().clamp(i16::MIN as f64, i16::MAX as f64) as i16;
            clamped.to_le_bytes()
        };

        let mut frame = [0u8; FRAME_LEN];
        frame[0..2].copy_from_slice(&sample.delta.to_le_bytes());
        frame[2..4].copy_from_slice(&to_word(counts.x));
        frame[4..6].copy_from_slice(&to_word(counts.y));
        frame[6..8].copy_from_slice(&to_word(counts.z));
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: [u8; FRAME_LEN] = [0x01, 0x00, 0x10, 0x00, 0x20, 0x00, 0xFF, 0x7F];

    #[test]
    fn test_decode_accelerometer() {
        let sample = decode(&FRAME, StreamKind::Accel).unwrap();
        assert_eq!(sample.delta, 1);
        assert_eq!(sample.x, 16.0 / 938.0);
        assert_eq!(sample.y, 32.0 / 938.0);
        assert_eq!(sample.z, 32767.0 / 938.0);
    }

    #[test]
    fn test_decode_gyroscope_applies_bias() {
        let sample = decode(&FRAME, StreamKind::Gyro).unwrap();
        assert_eq!(sample.delta, 1);
        assert!((sample.x - (16.0 / 938.0 - 0.4)).abs() < 1e-12);
        assert!((sample.y - (32.0 / 938.0 - 0.1)).abs() < 1e-12);
        assert!((sample.z - (32767.0 / 938.0 + 0.4)).abs() < 1e-12);
    }

    #[test]
    fn test_decode_negative_axes() {
        // 0x8000 is the signed minimum, 0xFFFF is -1
        let frame = [0xFF, 0xFF, 0x00, 0x80, 0xFF, 0xFF, 0x00, 0x00];
        let sample = decode(&frame, StreamKind::Accel).unwrap();
        assert_eq!(sample.delta, 65535);
        assert_eq!(sample.x, -32768.0 / 938.0);
        assert_eq!(sample.y, -1.0 / 938.0);
        assert_eq!(sample.z, 0.0);
    }

    #[test]
    fn test_decode_bad_length() {
        assert_eq!(
            decode(&FRAME[..FRAME_LEN - 1], StreamKind::Accel),
            Err(DecodeError::BadLength {
                expected: FRAME_LEN,
                actual: 7
            })
        );
        let long = [0u8; FRAME_LEN + 1];
        assert!(matches!(
            decode(&long, StreamKind::Gyro),
            Err(DecodeError::BadLength { actual: 9, .. })
        ));
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(&[], StreamKind::Accel), Err(DecodeError::Empty));
        assert_eq!(
            Codec::new().decode_optional(None, StreamKind::Gyro),
            Err(DecodeError::Empty)
        );
    }

    #[test]
    fn test_decode_is_idempotent() {
        let first = decode(&FRAME, StreamKind::Gyro).unwrap();
        let second = decode(&FRAME, StreamKind::Gyro).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encode_inverts_decode() {
        let codec = Codec::new();
        for stream in StreamKind::ALL {
            let sample = codec.decode(&FRAME, stream).unwrap();
            assert_eq!(codec.encode(&sample, stream), FRAME);
        }
    }

    #[test]
    fn test_encode_saturates() {
        let codec = Codec::new();
        let sample = Sample::new(7, 1000.0, -1000.0, 0.0);
        let frame = codec.encode(&sample, StreamKind::Accel);
        let decoded = codec.decode(&frame, StreamKind::Accel).unwrap();
        assert_eq!(decoded.x, 32767.0 / 938.0);
        assert_eq!(decoded.y, -32768.0 / 938.0);
    }

    #[test]
    fn test_custom_scale() {
        let codec = Codec::with_settings(CodecSettings {
            scale: 16.0,
            gyro_bias: [0.0; 3],
        });
        let sample = codec.decode(&FRAME, StreamKind::Gyro).unwrap();
        assert_eq!(sample.x, 1.0);
        assert_eq!(sample.y, 2.0);
    }
}
