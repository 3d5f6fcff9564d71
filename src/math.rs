//! Mathematical utilities and nalgebra extensions

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

/// Mathematical constants
pub const DEG_TO_RAD: f64 = core::f64::consts::PI / 180.0;
pub const RAD_TO_DEG: f64 = 180.0 / core::f64::consts::PI;

/// Extension trait for Vector3 operations
pub trait Vector3Ext {
    /// Normalize the vector, returning zero vector if magnitude is zero
    fn safe_normalize(&self) -> Vector3<f64>;

    /// Convert degrees to radians
    fn deg_to_rad(&self) -> Vector3<f64>;

    /// Convert radians to degrees
    fn rad_to_deg(&self) -> Vector3<f64>;
}

impl Vector3Ext for Vector3<f64> {
    fn safe_normalize(&self) -> Vector3<f64> {
        let mag = self.norm();
        if mag > 0.0 {
            *self / mag
        } else {
            Vector3::zeros()
        }
    }

    fn deg_to_rad(&self) -> Vector3<f64> {
        *self * DEG_TO_RAD
    }

    fn rad_to_deg(&self) -> Vector3<f64> {
        *self * RAD_TO_DEG
    }
}

/// Extension trait for quaternion readout
pub trait QuaternionExt {
    /// Heading, pitch and roll in radians
    ///
    /// heading = atan2(2(xy + wz), w² + x² − y² − z²)
    /// pitch   = −asin(2(xz − wy))
    /// roll    = atan2(2(yz + wx), w² − x² − y² + z²)
    fn heading_pitch_roll(&self) -> Vector3<f64>;

    /// Heading, pitch and roll in degrees
    fn heading_pitch_roll_degrees(&self) -> Vector3<f64> {
        self.heading_pitch_roll().rad_to_deg()
    }

    /// Whether every component is finite
    fn is_finite(&self) -> bool;
}

impl QuaternionExt for Quaternion<f64> {
    fn heading_pitch_roll(&self) -> Vector3<f64> {
        let (w, x, y, z) = (self.w, self.i, self.j, self.k);
        let (ww, xx, yy, zz) = (w * w, x * x, y * y, z * z);

        let heading = (2.0 * (x * y + z * w)).atan2(xx - yy - zz + ww);
        // Clamp so rounding at ±90° pitch cannot produce NaN
        let pitch = -(2.0 * (x * z - y * w)).clamp(-1.0, 1.0).asin();
        let roll = (2.0 * (y * z + x * w)).atan2(-xx - yy + zz + ww);

        Vector3::new(heading, pitch, roll)
    }

    fn is_finite(&self) -> bool {
        self.coords.iter().all(|c| c.is_finite())
    }
}

impl QuaternionExt for UnitQuaternion<f64> {
    fn heading_pitch_roll(&self) -> Vector3<f64> {
        self.as_ref().heading_pitch_roll()
    }

    fn is_finite(&self) -> bool {
        self.as_ref().is_finite()
    }
}
