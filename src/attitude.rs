//! Attitude filter interface and per-call filter state

use nalgebra::{UnitQuaternion, Vector3};

use crate::madgwick::Madgwick;
use crate::mahony::Mahony;
use crate::math::Vector3Ext;
use crate::types::{Algorithm, AttitudeSettings};

/// Common interface of the gyroscope/accelerometer fusion filters
pub trait AttitudeFilter {
    /// Advance the filter by one sample
    ///
    /// # Arguments
    /// * `gyroscope` - Angular rate in radians per second
    /// * `accelerometer` - Acceleration in g (any non-zero magnitude)
    /// * `delta_time` - Elapsed time in seconds
    fn update(&mut self, gyroscope: Vector3<f64>, accelerometer: Vector3<f64>, delta_time: f64);

    /// Current orientation
    fn quaternion(&self) -> UnitQuaternion<f64>;

    /// Overwrite the current orientation
    fn set_quaternion(&mut self, quaternion: UnitQuaternion<f64>);
}

/// Filter instance selected by [`AttitudeSettings::algorithm`]
///
/// Created fresh for each estimation run and dropped at its end.
#[derive(Debug, Clone, Copy)]
pub enum AttitudeFilterState {
    Madgwick(Madgwick),
    Mahony(Mahony),
}

impl AttitudeFilterState {
    pub fn new(settings: &AttitudeSettings) -> Self {
        match settings.algorithm {
            Algorithm::Madgwick => Self::Madgwick(Madgwick::new(settings.beta)),
            Algorithm::Mahony => Self::Mahony(Mahony::new(settings.kp, settings.ki)),
        }
    }
}

impl AttitudeFilter for AttitudeFilterState {
    fn update(&mut self, gyroscope: Vector3<f64>, accelerometer: Vector3<f64>, delta_time: f64) {
        match self {
            Self::Madgwick(filter) => filter.update(gyroscope, accelerometer, delta_time),
            Self::Mahony(filter) => filter.update(gyroscope, accelerometer, delta_time),
        }
    }

    fn quaternion(&self) -> UnitQuaternion<f64> {
        match self {
            Self::Madgwick(filter) => filter.quaternion(),
            Self::Mahony(filter) => filter.quaternion(),
        }
    }

    fn set_quaternion(&mut self, quaternion: UnitQuaternion<f64>) {
        match self {
            Self::Madgwick(filter) => filter.set_quaternion(quaternion),
            Self::Mahony(filter) => filter.set_quaternion(quaternion),
        }
    }
}

/// Orientation whose gravity direction matches `accelerometer`, heading zero
///
/// Returns identity for a zero reading.
pub fn level_from_accelerometer(accelerometer: Vector3<f64>) -> UnitQuaternion<f64> {
    let a = accelerometer.safe_normalize();
    if a.norm() == 0.0 {
        return UnitQuaternion::identity();
    }

    let roll = a.y.atan2(a.z);
    let pitch = (-a.x).atan2((a.y * a.y + a.z * a.z).sqrt());
    UnitQuaternion::from_euler_angles(roll, pitch, 0.0)
}
