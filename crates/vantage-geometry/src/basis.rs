//! Frame basis construction.
//!
//! A reference frame is anchored at an agent's origin and spanned by a
//! right/up/forward basis. Only the forward direction is observed; right and
//! up are derived. The forward axis is flattened onto the horizontal plane
//! first, so an observer looking down at a table still gets left/right and
//! near/far judgements that match the table plane.
//!
//! # Example
//!
//! ```rust
//! use vantage_geometry::basis::build_basis;
//! use vantage_geometry::vector::{Vec3, WORLD_UP};
//!
//! // Looking down and ahead along +Z.
//! let b = build_basis(Vec3::new(0.0, -0.7, 1.0), WORLD_UP);
//! assert!((b.forward.z - 1.0).abs() < 1e-12);
//! assert!((b.right.x - 1.0).abs() < 1e-12);
//! assert!((b.up.y - 1.0).abs() < 1e-12);
//! ```

use crate::vector::{EPSILON, Vec3, WORLD_UP};

/// Orthonormal right/up/forward axes of a frame.
///
/// An axis is exactly the zero vector when the input could not define it;
/// projections onto such an axis are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl FrameBasis {
    /// True when at least one axis collapsed to zero.
    pub fn is_degenerate(&self) -> bool {
        self.right.is_zero() || self.up.is_zero() || self.forward.is_zero()
    }
}

/// Derive a basis from a (possibly tilted, unnormalized) forward vector.
///
/// 1. Forward is projected onto the plane orthogonal to `up` and normalized.
/// 2. If that collapses (forward near-vertical), the raw forward is
///    normalized instead.
/// 3. `right = normalize(up × forward)`.
/// 4. `up = normalize(forward × right)`, re-derived rather than copied from
///    the input.
pub fn build_basis(forward: Vec3, up: Vec3) -> FrameBasis {
    let vertical = up.normalize(EPSILON);

    let mut forward_hat = forward.reject(vertical).normalize(EPSILON);
    if forward_hat.is_zero() {
        forward_hat = forward.normalize(EPSILON);
    }

    let right_hat = up.cross(forward_hat).normalize(EPSILON);
    let up_hat = forward_hat.cross(right_hat).normalize(EPSILON);

    FrameBasis {
        right: right_hat,
        up: up_hat,
        forward: forward_hat,
    }
}

/// An agent pose in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub origin: Vec3,
    /// Need not be normalized.
    pub forward: Vec3,
    /// Reference up; [`WORLD_UP`] when `None`.
    pub up: Option<Vec3>,
}

impl Pose {
    pub fn new(origin: Vec3, forward: Vec3) -> Self {
        Self {
            origin,
            forward,
            up: None,
        }
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = Some(up);
        self
    }

    pub fn up(&self) -> Vec3 {
        self.up.unwrap_or(WORLD_UP)
    }
}

/// A pose resolved into origin, basis and the horizontal plane used for
/// every projection made relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub origin: Vec3,
    /// Normalized reference up. Defines the horizontal plane.
    pub vertical: Vec3,
    pub basis: FrameBasis,
}

impl Frame {
    pub fn from_pose(pose: &Pose) -> Self {
        let up = pose.up();
        Self {
            origin: pose.origin,
            vertical: up.normalize(EPSILON),
            basis: build_basis(pose.forward, up),
        }
    }

    /// Offset from the origin to `point`, flattened onto the horizontal plane.
    pub fn horizontal_delta(&self, point: Vec3) -> Vec3 {
        point.sub(self.origin).reject(self.vertical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    fn assert_orthonormal(b: &FrameBasis) {
        assert!(b.right.dot(b.up).abs() < TOL, "right·up = {}", b.right.dot(b.up));
        assert!(b.right.dot(b.forward).abs() < TOL);
        assert!(b.up.dot(b.forward).abs() < TOL);
        for axis in [b.right, b.up, b.forward] {
            assert!((axis.norm() - 1.0).abs() < TOL, "axis {axis:?} is not unit");
        }
    }

    #[test]
    fn axis_aligned_forward() {
        let b = build_basis(Vec3::new(0.0, 0.0, 1.0), WORLD_UP);
        assert_eq!(b.forward, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(b.right, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(b.up, Vec3::new(0.0, 1.0, 0.0));
        assert!(!b.is_degenerate());
    }

    #[test]
    fn tilt_does_not_change_horizontal_axes() {
        let level = build_basis(Vec3::new(1.0, 0.0, 1.0), WORLD_UP);
        let tilted = build_basis(Vec3::new(2.0, -1.5, 2.0), WORLD_UP);
        assert!(level.forward.sub(tilted.forward).norm() < TOL);
        assert!(level.right.sub(tilted.right).norm() < TOL);
        assert!(tilted.forward.y.abs() < TOL);
    }

    #[test]
    fn arbitrary_forwards_are_orthonormal() {
        let forwards = [
            Vec3::new(0.3, 0.2, -0.9),
            Vec3::new(-5.0, 1.0, 0.1),
            Vec3::new(1e-3, -0.99, 1e-3),
            Vec3::new(0.0, 0.0, -1.0),
        ];
        for f in forwards {
            assert_orthonormal(&build_basis(f, WORLD_UP));
        }
    }

    #[test]
    fn custom_up_is_respected() {
        // Z-up world, looking along +X.
        let b = build_basis(Vec3::new(1.0, 0.0, 0.3), Vec3::new(0.0, 0.0, 1.0));
        assert_orthonormal(&b);
        assert!((b.forward.x - 1.0).abs() < TOL);
        assert!((b.up.z - 1.0).abs() < TOL);
    }

    #[test]
    fn vertical_forward_falls_back_to_raw_forward() {
        let b = build_basis(Vec3::new(0.0, -2.0, 0.0), WORLD_UP);
        assert_eq!(b.forward, Vec3::new(0.0, -1.0, 0.0));
        // up × forward is zero, so right (and hence up) collapse.
        assert!(b.right.is_zero());
        assert!(b.up.is_zero());
        assert!(b.is_degenerate());
    }

    #[test]
    fn zero_forward_is_fully_degenerate() {
        let b = build_basis(Vec3::zero(), WORLD_UP);
        assert!(b.forward.is_zero());
        assert!(b.right.is_zero());
        assert!(b.up.is_zero());
    }

    #[test]
    fn frame_flattens_deltas() {
        let pose = Pose::new(Vec3::new(0.0, 1.6, 0.0), Vec3::new(0.0, -0.4, 1.0));
        let frame = Frame::from_pose(&pose);
        assert_eq!(frame.vertical, WORLD_UP);
        let d = frame.horizontal_delta(Vec3::new(0.5, 0.0, 2.0));
        assert_eq!(d, Vec3::new(0.5, 0.0, 2.0));
    }

    #[test]
    fn pose_up_override() {
        let pose = Pose::new(Vec3::zero(), Vec3::new(1.0, 0.0, 0.0)).with_up(Vec3::new(0.0, 0.0, 2.0));
        let frame = Frame::from_pose(&pose);
        assert_eq!(frame.vertical, Vec3::new(0.0, 0.0, 1.0));
        let d = frame.horizontal_delta(Vec3::new(1.0, 2.0, 3.0));
        assert!(d.sub(Vec3::new(1.0, 2.0, 0.0)).norm() < TOL);
    }
}
