//! Mahony complementary attitude filter (gyroscope + accelerometer)

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::attitude::AttitudeFilter;
use crate::math::Vector3Ext;

/// Mahony filter state
///
/// Corrects the gyroscope rate with a proportional-integral term built from
/// the cross product between the measured and the predicted gravity
/// direction.
#[derive(Debug, Clone, Copy)]
pub struct Mahony {
    kp: f64,
    ki: f64,
    quaternion: UnitQuaternion<f64>,
    /// Accumulated integral feedback (rad/s)
    integral_feedback: Vector3<f64>,
}

impl Mahony {
    pub fn new(kp: f64, ki: f64) -> Self {
        Self {
            kp,
            ki,
            quaternion: UnitQuaternion::identity(),
            integral_feedback: Vector3::zeros(),
        }
    }

    pub fn integral_feedback(&self) -> Vector3<f64> {
        self.integral_feedback
    }

    /// Half gravity vector in sensor frame based on current quaternion
    fn half_gravity(&self) -> Vector3<f64> {
        let q = self.quaternion.as_ref();
        let (qw, qx, qy, qz) = (q.w, q.i, q.j, q.k);

        Vector3::new(
            qx * qz - qw * qy,
            qy * qz + qw * qx,
            qw * qw - 0.5 + qz * qz,
        )
    }
}

impl AttitudeFilter for Mahony {
    fn update(&mut self, gyroscope: Vector3<f64>, accelerometer: Vector3<f64>, delta_time: f64) {
        let mut rate = gyroscope;

        let accelerometer = accelerometer.safe_normalize();
        if accelerometer.norm() > 0.0 {
            let half_error = accelerometer.cross(&self.half_gravity());

            if self.ki > 0.0 {
                self.integral_feedback += half_error * (2.0 * self.ki * delta_time);
                rate += self.integral_feedback;
            } else {
                self.integral_feedback = Vector3::zeros();
            }

            rate += half_error * (2.0 * self.kp);
        }

        let q = *self.quaternion.as_ref();
        let derivative = q * Quaternion::from_parts(0.0, rate) * 0.5;
        self.quaternion = UnitQuaternion::new_normalize(q + derivative * delta_time);
    }

    fn quaternion(&self) -> UnitQuaternion<f64> {
        self.quaternion
    }

    fn set_quaternion(&mut self, quaternion: UnitQuaternion<f64>) {
        self.quaternion = quaternion;
    }
}
