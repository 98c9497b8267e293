use std::ops::{Neg, Sub};

use crate::doppler::DopplerError;

/// Cartesian vector in an Earth-centered frame (km or km/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build a vector from exactly three finite components.
    pub fn from_slice(components: &[f64]) -> Result<Self, DopplerError> {
        let [x, y, z] = components else {
            return Err(DopplerError::InvalidInput(format!(
                "expected 3 vector components, got {}",
                components.len()
            )));
        };

        let v = Self::new(*x, *y, *z);
        if !v.is_finite() {
            return Err(DopplerError::InvalidInput(format!(
                "vector components must be finite: {:?}",
                components
            )));
        }
        Ok(v)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}
