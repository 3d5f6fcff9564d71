//! Orientation estimation over a fixed window of paired samples
//!
//! `accel[i]` and `gyro[i]` are treated as simultaneous. Nothing upstream
//! guarantees that: the two streams are written independently. Callers that
//! need time-based pairing should run the inputs through
//! [`timeline::align_by_timestamp`](crate::timeline::align_by_timestamp)
//! first.

use nalgebra::Vector3;

use crate::attitude::{AttitudeFilter, AttitudeFilterState, level_from_accelerometer};
use crate::error::{Error, Result};
use crate::math::{QuaternionExt, Vector3Ext};
use crate::types::{AttitudeSettings, OrientationSample, Sample};

/// Estimate orientation with the default settings
///
/// See [`Estimator::estimate`].
pub fn estimate(
    accel: &[Sample],
    gyro: &[Sample],
    magnetometer: Option<&[Sample]>,
) -> Result<Vec<OrientationSample>> {
    Estimator::default().estimate(accel, gyro, magnetometer)
}

/// Runs a fresh attitude filter over the first `window` sample pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct Estimator {
    settings: AttitudeSettings,
}

impl Estimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: AttitudeSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> AttitudeSettings {
        self.settings
    }

    /// Produce one orientation per pair in the window
    ///
    /// Gyroscope values are converted from degrees to radians per second;
    /// accelerometer values are passed in g. The elapsed time for sample `i`
    /// is `accel[i].delta - accel[i - 1].delta` milliseconds, and
    /// `accel[0].delta` for the first sample. A zero elapsed time falls back
    /// to the configured sample interval.
    ///
    /// `magnetometer` is accepted but not fused.
    ///
    /// # Errors
    /// * [`Error::InsufficientSamples`] if either stream is shorter than the
    ///   window. Checked before any filter state exists.
    /// * [`Error::NumericalDivergence`] if the filter state stops being
    ///   finite. No partial output is returned.
    pub fn estimate(
        &self,
        accel: &[Sample],
        gyro: &[Sample],
        magnetometer: Option<&[Sample]>,
    ) -> Result<Vec<OrientationSample>> {
        let window = self.settings.window;
        if accel.len() < window || gyro.len() < window {
            return Err(Error::InsufficientSamples {
                required: window,
                accel: accel.len(),
                gyro: gyro.len(),
            });
        }
        if magnetometer.is_some() {
            tracing::debug!("Magnetometer samples supplied but not fused");
        }

        let mut filter = AttitudeFilterState::new(&self.settings);
        if let (true, Some(first)) = (self.settings.initialise, accel.first()) {
            filter.set_quaternion(level_from_accelerometer(first.axes()));
        }

        let mut orientation = Vec::with_capacity(window);
        for i in 0..window {
            let elapsed_ms = if i == 0 {
                i32::from(accel[0].delta)
            } else {
                i32::from(accel[i].delta) - i32::from(accel[i - 1].delta)
            };

            let gyroscope: Vector3<f64> = gyro[i].axes().deg_to_rad();
            filter.update(gyroscope, accel[i].axes(), self.delta_time(elapsed_ms));

            let quaternion = filter.quaternion();
            if !quaternion.is_finite() {
                tracing::warn!(index = i, "Attitude filter diverged");
                return Err(Error::NumericalDivergence { index: i });
            }

            let hpr = quaternion.heading_pitch_roll_degrees();
            orientation.push(OrientationSample {
                delta: accel[i].delta,
                x: hpr.x,
                y: hpr.y,
                z: hpr.z,
            });
        }

        tracing::debug!(
            samples = orientation.len(),
            algorithm = ?self.settings.algorithm,
            "Orientation estimated"
        );
        Ok(orientation)
    }

    /// Elapsed time in seconds for a millisecond difference
    fn delta_time(&self, elapsed_ms: i32) -> f64 {
        if elapsed_ms == 0 {
            self.settings.sample_interval()
        } else {
            f64::from(elapsed_ms) / 1000.0
        }
    }
}
