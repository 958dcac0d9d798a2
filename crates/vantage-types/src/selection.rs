//! The selection rule language.
//!
//! A [`SelectionSpec`] is a tiny fixed program: filter → order → select →
//! tie-break. It is produced by an external reasoning collaborator, usually
//! as JSON, and interpreted by `vantage-selector`.
//!
//! ```
//! use vantage_types::{FilterClause, RankFeature, ReferenceFrame, SelectionSpec, SortDirection};
//!
//! let spec = SelectionSpec::from_json(r#"{
//!     "reference_frame": "user",
//!     "filters": [{ "type": "in_fov", "value": true }],
//!     "order_by": { "feature": "depth_rank", "direction": "asc" },
//!     "select_rank": 1
//! }"#).unwrap();
//!
//! assert_eq!(spec.reference_frame, ReferenceFrame::Primary);
//! assert_eq!(spec.filters, vec![FilterClause::InFov { value: true }]);
//! assert_eq!(spec.order_by.feature, RankFeature::DepthRank);
//! assert_eq!(spec.order_by.direction, SortDirection::Asc);
//! ```

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VantageError;
use crate::{ReferenceFrame, Side};

/// One of the rank fields of a [`FrameFeature`][crate::FrameFeature] that a
/// rule may sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RankFeature {
    DepthRank,
    RightRank,
    FrontRank,
}

impl fmt::Display for RankFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RankFeature::DepthRank => "depth_rank",
            RankFeature::RightRank => "right_rank",
            RankFeature::FrontRank => "front_rank",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A sort key: which rank to sort on and in which direction.
///
/// Used both for the primary ordering and for the optional tie-breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OrderBy {
    pub feature: RankFeature,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(feature: RankFeature, direction: SortDirection) -> Self {
        Self { feature, direction }
    }
}

/// A candidate filter. Clauses run in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterClause {
    /// Keep candidates whose `in_fov` equals `value`.
    InFov { value: bool },
    /// Keep candidates whose `reachable` equals `value`.
    Reachable { value: bool },
    /// Keep candidates whose quadrant equals `value`.
    #[serde(alias = "robot_side")]
    Side { value: Side },
    /// Keep the `k` candidates with the best `front_rank`.
    FrontTopK { k: usize },
}

impl FilterClause {
    /// Every `type` tag the decoder understands.
    pub const TAGS: [&'static str; 5] = ["in_fov", "reachable", "side", "robot_side", "front_top_k"];
}

/// A complete selection rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SelectionSpec {
    pub reference_frame: ReferenceFrame,
    #[serde(default)]
    pub filters: Vec<FilterClause>,
    pub order_by: OrderBy,
    /// 1-indexed position to pick after ordering. Checked against the live
    /// candidate count only when the rule runs.
    pub select_rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_breaker: Option<OrderBy>,
}

impl SelectionSpec {
    /// Decode a rule from JSON text.
    ///
    /// # Errors
    ///
    /// - [`VantageError::UnknownFilterType`] – a filter carries a `type` tag
    ///   outside [`FilterClause::TAGS`].
    /// - [`VantageError::MalformedRule`] – any other schema violation.
    pub fn from_json(raw: &str) -> Result<Self, VantageError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| VantageError::MalformedRule(e.to_string()))?;
        Self::from_value(value)
    }

    /// Decode a rule from an already-parsed JSON value.
    ///
    /// Filter tags are checked before typed decoding so that an unknown tag
    /// is reported as such rather than as a generic decode failure.
    pub fn from_value(value: serde_json::Value) -> Result<Self, VantageError> {
        if let Some(filters) = value.get("filters").and_then(|f| f.as_array()) {
            for clause in filters {
                match clause.get("type").and_then(|t| t.as_str()) {
                    Some(tag) if FilterClause::TAGS.contains(&tag) => {}
                    Some(tag) => return Err(VantageError::UnknownFilterType(tag.to_string())),
                    None => {
                        return Err(VantageError::MalformedRule(
                            "filter clause without a string `type` tag".to_string(),
                        ));
                    }
                }
            }
        }
        serde_json::from_value(value).map_err(|e| VantageError::MalformedRule(e.to_string()))
    }
}
