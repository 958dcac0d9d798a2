//! Local-coordinate views.
//!
//! Instead of pre-ranked features, the reasoning collaborator can be handed
//! raw positions expressed in a frame's own axes: `x` = right, `y` = up,
//! `z` = forward. The same [`build_basis`][crate::basis::build_basis]
//! machinery is used, but the full 3-D offset is projected (height is kept).
//! "Forward" is the frame's horizontal forward, so a pitched gaze does not
//! tilt the local axes.
//!
//! [`local_view`] rounds its output to a fixed precision: 2 decimals for
//! positions and distance, 1 decimal for the angle. Exact halves round to
//! even. [`dual_view`] is unrounded.

use serde::{Deserialize, Serialize};

use crate::basis::Frame;
use crate::features::{ObjectSet, front_score};
use crate::vector::Vec3;

/// Rounded frame-local description of one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalObjectView {
    pub id: String,
    /// `[right, up, forward]` in metres, 2 decimals.
    pub pos_local: [f64; 3],
    /// 2 decimals.
    pub distance: f64,
    /// Angle between the offset and the forward axis, degrees, 1 decimal.
    pub angle_from_forward_deg: f64,
}

/// Unrounded positions of one object in world space and in every available
/// frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualObjectView {
    pub id: String,
    pub pos_world: Vec3,
    pub pos_primary: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos_secondary: Option<Vec3>,
}

/// Express `point` in `frame`'s local axes.
pub fn world_to_local(point: Vec3, frame: &Frame) -> Vec3 {
    let d = point.sub(frame.origin);
    let b = &frame.basis;
    Vec3::new(d.dot(b.right), d.dot(b.up), d.dot(b.forward))
}

/// Round to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let k = 10f64.powi(decimals);
    (value * k).round_ties_even() / k
}

/// Rounded local view of every object, in id order.
pub fn local_view(frame: &Frame, objects: &ObjectSet) -> Vec<LocalObjectView> {
    objects
        .iter()
        .map(|(id, position)| {
            let local = world_to_local(*position, frame);
            let cos = front_score(position.sub(frame.origin), frame.basis.forward).clamp(-1.0, 1.0);
            LocalObjectView {
                id: id.clone(),
                pos_local: [
                    round_to(local.x, 2),
                    round_to(local.y, 2),
                    round_to(local.z, 2),
                ],
                distance: round_to(local.norm(), 2),
                angle_from_forward_deg: round_to(cos.acos().to_degrees(), 1),
            }
        })
        .collect()
}

/// World, primary-local and (when present) secondary-local positions of
/// every object, in id order.
pub fn dual_view(
    primary: &Frame,
    secondary: Option<&Frame>,
    objects: &ObjectSet,
) -> Vec<DualObjectView> {
    objects
        .iter()
        .map(|(id, position)| DualObjectView {
            id: id.clone(),
            pos_world: *position,
            pos_primary: world_to_local(*position, primary),
            pos_secondary: secondary.map(|f| world_to_local(*position, f)),
        })
        .collect()
}
