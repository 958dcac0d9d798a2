//! Per-object feature computation.
//!
//! For one [`Frame`] and a set of object positions, derives the scalar
//! projections of every object onto the frame's horizontal axes and turns
//! them into stable ranks plus a few categorical flags.
//!
//! | Feature | Source scalar | Order |
//! |---------|---------------|-------|
//! | `depth_rank` | `p` = signed forward distance | ascending (nearest first) |
//! | `right_rank` | `l` = signed lateral offset | descending (rightmost first) |
//! | `front_rank` | `c` = cosine to forward | descending (most aligned first) |
//! | `in_fov` | `c >= cos(fov / 2)` | only with a FOV |
//! | `side` | dominant of `p` / `l` | only when requested |
//! | `reachable` | caller default | only with a default |
//!
//! Equal scalars are ranked by object id, so results never depend on input
//! order. The FOV cone is clamped to `[0°, 360°]`, which keeps `in_fov`
//! monotonic in the angle.
//!
//! # Example
//!
//! ```rust
//! use vantage_geometry::basis::{Frame, Pose};
//! use vantage_geometry::features::{compute_features, FeatureOptions, ObjectSet};
//! use vantage_geometry::vector::Vec3;
//!
//! let frame = Frame::from_pose(&Pose::new(Vec3::zero(), Vec3::new(0.0, 0.0, 1.0)));
//! let objects: ObjectSet = [
//!     ("near".to_string(), Vec3::new(0.0, 0.0, 1.0)),
//!     ("far".to_string(), Vec3::new(0.0, 0.0, 2.0)),
//! ].into_iter().collect();
//!
//! let features = compute_features(&frame, &objects, &FeatureOptions::default());
//! assert_eq!(features["near"].depth_rank, Some(1));
//! assert_eq!(features["far"].depth_rank, Some(2));
//! assert_eq!(features["far"].in_fov, None);
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use vantage_types::{FrameFeature, Side, SortDirection};

use crate::basis::Frame;
use crate::vector::{EPSILON, Vec3};

/// Object id → world position.
pub type ObjectSet = BTreeMap<String, Vec3>;

/// Which optional features to compute for a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureOptions {
    /// Full cone angle in degrees; `in_fov` is absent when `None`. Values
    /// outside `[0, 360]` are clamped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fov_degrees: Option<f64>,
    pub compute_side: bool,
    /// Passed through verbatim as `reachable`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reachable_default: Option<bool>,
}

/// Cosine between `delta` and unit `forward`.
///
/// A (near-)zero `delta` counts as straight ahead and yields `1.0`.
pub fn front_score(delta: Vec3, forward: Vec3) -> f64 {
    let n = delta.norm();
    if n < EPSILON {
        return 1.0;
    }
    delta.dot(forward) / n
}

/// Quadrant of a point with forward projection `p` and lateral projection
/// `l`. Ties between the two magnitudes go to front/back.
pub fn classify_side(l: f64, p: f64) -> Side {
    if p.abs() >= l.abs() {
        if p >= 0.0 { Side::Front } else { Side::Back }
    } else if l >= 0.0 {
        Side::Right
    } else {
        Side::Left
    }
}

/// Assign 1-indexed ranks by value, ties broken by ascending id.
///
/// `-0.0` and `0.0` compare equal.
pub fn stable_rank<'a, I>(values: I, direction: SortDirection) -> HashMap<&'a str, u32>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut items: Vec<(&'a str, f64)> = values.into_iter().collect();
    items.sort_by(|(id_a, a), (id_b, b)| {
        let by_value = match direction {
            SortDirection::Asc => cmp_scalar(*a, *b),
            SortDirection::Desc => cmp_scalar(*b, *a),
        };
        by_value.then_with(|| id_a.cmp(id_b))
    });
    items
        .into_iter()
        .enumerate()
        .map(|(i, (id, _))| (id, i as u32 + 1))
        .collect()
}

fn cmp_scalar(a: f64, b: f64) -> Ordering {
    if a == b { Ordering::Equal } else { a.total_cmp(&b) }
}

struct Projection<'a> {
    id: &'a str,
    /// Forward.
    p: f64,
    /// Lateral.
    l: f64,
    /// Frontality.
    c: f64,
}

/// Compute a [`FrameFeature`] for every object, relative to `frame`.
///
/// Vertical displacement never influences the result: every offset is
/// flattened onto the frame's horizontal plane first. An empty object set
/// yields an empty map.
pub fn compute_features(
    frame: &Frame,
    objects: &ObjectSet,
    options: &FeatureOptions,
) -> BTreeMap<String, FrameFeature> {
    let cos_threshold = options
        .fov_degrees
        .map(|fov| (fov.clamp(0.0, 360.0).to_radians() * 0.5).cos());

    let projections: Vec<Projection<'_>> = objects
        .iter()
        .map(|(id, position)| {
            let delta = frame.horizontal_delta(*position);
            Projection {
                id: id.as_str(),
                p: delta.dot(frame.basis.forward),
                l: delta.dot(frame.basis.right),
                c: front_score(delta, frame.basis.forward),
            }
        })
        .collect();

    let depth = stable_rank(projections.iter().map(|x| (x.id, x.p)), SortDirection::Asc);
    let right = stable_rank(projections.iter().map(|x| (x.id, x.l)), SortDirection::Desc);
    let front = stable_rank(projections.iter().map(|x| (x.id, x.c)), SortDirection::Desc);

    projections
        .iter()
        .map(|x| {
            let feature = FrameFeature {
                depth_rank: Some(depth[&x.id]),
                right_rank: Some(right[&x.id]),
                front_rank: Some(front[&x.id]),
                in_fov: cos_threshold.map(|threshold| x.c >= threshold),
                reachable: options.reachable_default,
                side: options.compute_side.then(|| classify_side(x.l, x.p)),
            };
            (x.id.to_string(), feature)
        })
        .collect()
}
