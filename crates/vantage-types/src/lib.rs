//! `vantage-types` – shared data model for the Vantage workspace.
//!
//! Everything that crosses a crate boundary lives here: the per-object
//! [`FrameFeature`] record, the [`SelectionSpec`][selection::SelectionSpec]
//! rule language, the wire-level [`SelectionRequest`][request::SelectionRequest]
//! and the error taxonomy.
//!
//! # Modules
//!
//! - [`selection`] – closed rule model consumed by `vantage-selector`.
//! - [`request`] – snapshot request shapes as received from the transport
//!   layer.
//! - [`error`] – [`SelectError`][error::SelectError] and
//!   [`VantageError`][error::VantageError].

pub mod error;
pub mod request;
pub mod selection;

use std::collections::BTreeMap;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use error::{SelectError, VantageError};
pub use request::{ObjectInput, PoseInput, SelectionRequest};
pub use selection::{FilterClause, OrderBy, RankFeature, SelectionSpec, SortDirection};

/// Which agent a feature set or rule is expressed relative to.
///
/// The primary frame is the observer (always present); the secondary frame
/// is the optional second agent, e.g. the robot arm.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceFrame {
    #[serde(alias = "user")]
    Primary,
    #[serde(alias = "robot")]
    Secondary,
}

impl ReferenceFrame {
    /// Wire name of the frame.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceFrame::Primary => "primary",
            ReferenceFrame::Secondary => "secondary",
        }
    }
}

impl fmt::Display for ReferenceFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse quadrant of an object relative to a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Side::Front => "front",
            Side::Back => "back",
            Side::Left => "left",
            Side::Right => "right",
        };
        f.write_str(s)
    }
}

/// Geometric features of one object seen from one frame.
///
/// Every field is optional: `None` means "not computed for this frame",
/// which is distinct from a computed `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FrameFeature {
    /// 1-indexed rank by signed forward distance, nearest first.
    pub depth_rank: Option<u32>,
    /// 1-indexed rank by lateral offset, rightmost first.
    pub right_rank: Option<u32>,
    /// 1-indexed rank by alignment with the forward axis, most aligned first.
    pub front_rank: Option<u32>,
    pub in_fov: Option<bool>,
    pub reachable: Option<bool>,
    #[serde(alias = "robot_side")]
    pub side: Option<Side>,
}

impl FrameFeature {
    /// Look up one of the three rank fields.
    pub fn rank(&self, feature: RankFeature) -> Option<u32> {
        match feature {
            RankFeature::DepthRank => self.depth_rank,
            RankFeature::RightRank => self.right_rank,
            RankFeature::FrontRank => self.front_rank,
        }
    }
}

/// Per-object, per-frame features: `table[object_id][frame]`.
///
/// Only frames that were actually computed appear in the inner map.
pub type FeatureTable = BTreeMap<String, BTreeMap<ReferenceFrame, FrameFeature>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_frame_accepts_legacy_names() {
        let f: ReferenceFrame = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(f, ReferenceFrame::Primary);
        let f: ReferenceFrame = serde_json::from_str("\"robot\"").unwrap();
        assert_eq!(f, ReferenceFrame::Secondary);
        assert_eq!(
            serde_json::to_string(&ReferenceFrame::Secondary).unwrap(),
            "\"secondary\""
        );
    }

    #[test]
    fn absent_features_serialize_as_null() {
        let ff = FrameFeature {
            depth_rank: Some(1),
            ..Default::default()
        };
        let v = serde_json::to_value(&ff).unwrap();
        assert_eq!(v["depth_rank"], 1);
        assert!(v["in_fov"].is_null());
        assert!(v["side"].is_null());
    }

    #[test]
    fn frame_feature_reads_robot_side_alias() {
        let ff: FrameFeature = serde_json::from_str(
            r#"{"depth_rank":2,"right_rank":1,"front_rank":3,"in_fov":null,"reachable":true,"robot_side":"left"}"#,
        )
        .unwrap();
        assert_eq!(ff.side, Some(Side::Left));
        assert_eq!(ff.reachable, Some(true));
        assert_eq!(ff.rank(RankFeature::FrontRank), Some(3));
    }

    #[test]
    fn side_display_matches_wire_name() {
        assert_eq!(Side::Back.to_string(), "back");
        assert_eq!(
            serde_json::to_string(&Side::Right).unwrap(),
            format!("\"{}\"", Side::Right)
        );
    }
}
