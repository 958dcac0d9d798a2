//! Fixed-dimension 3-D vector primitives.
//!
//! Coordinates follow the world convention of the upstream headset: `+Y` is
//! up, and the horizontal plane is XZ.
//!
//! # Example
//!
//! ```rust
//! use vantage_geometry::vector::{Vec3, EPSILON};
//!
//! let v = Vec3::new(3.0, 4.0, 0.0);
//! assert!((v.norm() - 5.0).abs() < 1e-12);
//!
//! // Degenerate input collapses to zero instead of dividing by ~0.
//! assert_eq!(Vec3::new(1e-12, 0.0, 0.0).normalize(EPSILON), Vec3::zero());
//!
//! // Horizontal projection drops the vertical component.
//! assert_eq!(Vec3::new(1.0, 2.0, 3.0).project_horizontal(), Vec3::new(1.0, 0.0, 3.0));
//! ```

use serde::{Deserialize, Serialize};

/// Length below which a vector is treated as zero.
pub const EPSILON: f64 = 1e-8;

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

/// A 3-D vector. Serialized as `[x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    pub fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    pub fn scale(self, k: f64) -> Self {
        Self::new(self.x * k, self.y * k, self.z * k)
    }

    pub fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Right-handed cross product `self × rhs`.
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or the zero vector when
    /// `norm < eps`.
    pub fn normalize(self, eps: f64) -> Self {
        let n = self.norm();
        if n < eps {
            return Self::zero();
        }
        Self::new(self.x / n, self.y / n, self.z / n)
    }

    /// Drop the vertical (`y`) component.
    pub fn project_horizontal(self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }

    /// Remove the component along `normal` (expected unit length or zero).
    ///
    /// With `normal == WORLD_UP` this is exactly [`Vec3::project_horizontal`].
    pub fn reject(self, normal: Self) -> Self {
        self.sub(normal.scale(self.dot(normal)))
    }

    pub fn is_zero(self) -> bool {
        self == Self::zero()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}
