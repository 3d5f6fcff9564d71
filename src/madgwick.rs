//! Madgwick gradient-descent attitude filter (gyroscope + accelerometer)

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::attitude::AttitudeFilter;
use crate::math::Vector3Ext;

/// Madgwick filter state
///
/// Each update integrates the gyroscope rate and steps the orientation down
/// the normalised gradient of the gravity-alignment error, scaled by `beta`.
#[derive(Debug, Clone, Copy)]
pub struct Madgwick {
    beta: f64,
    quaternion: UnitQuaternion<f64>,
}

impl Madgwick {
    pub fn new(beta: f64) -> Self {
        Self {
            beta,
            quaternion: UnitQuaternion::identity(),
        }
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Gradient of the gravity-alignment objective, normalised
    ///
    /// `accelerometer` must already be unit length.
    fn gradient(&self, accelerometer: Vector3<f64>) -> Quaternion<f64> {
        let q = self.quaternion.as_ref();
        let (q0, q1, q2, q3) = (q.w, q.i, q.j, q.k);
        let (ax, ay, az) = (accelerometer.x, accelerometer.y, accelerometer.z);

        let (q0q0, q1q1, q2q2, q3q3) = (q0 * q0, q1 * q1, q2 * q2, q3 * q3);

        let s0 = 4.0 * q0 * q2q2 + 2.0 * q2 * ax + 4.0 * q0 * q1q1 - 2.0 * q1 * ay;
        let s1 = 4.0 * q1 * q3q3 - 2.0 * q3 * ax + 4.0 * q0q0 * q1 - 2.0 * q0 * ay - 4.0 * q1
            + 8.0 * q1 * q1q1
            + 8.0 * q1 * q2q2
            + 4.0 * q1 * az;
        let s2 = 4.0 * q0q0 * q2 + 2.0 * q0 * ax + 4.0 * q2 * q3q3 - 2.0 * q3 * ay - 4.0 * q2
            + 8.0 * q2 * q1q1
            + 8.0 * q2 * q2q2
            + 4.0 * q2 * az;
        let s3 = 4.0 * q1q1 * q3 - 2.0 * q1 * ax + 4.0 * q2q2 * q3 - 2.0 * q2 * ay;

        let step = Quaternion::new(s0, s1, s2, s3);
        let norm = step.norm();
        if norm > 0.0 { step / norm } else { step }
    }
}

impl AttitudeFilter for Madgwick {
    fn update(&mut self, gyroscope: Vector3<f64>, accelerometer: Vector3<f64>, delta_time: f64) {
        let q = *self.quaternion.as_ref();

        // Rate of change from the gyroscope: 0.5 * q * ω
        let mut derivative = q * Quaternion::from_parts(0.0, gyroscope) * 0.5;

        // A zero accelerometer reading carries no gravity direction
        let accelerometer = accelerometer.safe_normalize();
        if accelerometer.norm() > 0.0 {
            derivative -= self.gradient(accelerometer) * self.beta;
        }

        self.quaternion = UnitQuaternion::new_normalize(q + derivative * delta_time);
    }

    fn quaternion(&self) -> UnitQuaternion<f64> {
        self.quaternion
    }

    fn set_quaternion(&mut self, quaternion: UnitQuaternion<f64>) {
        self.quaternion = quaternion;
    }
}
