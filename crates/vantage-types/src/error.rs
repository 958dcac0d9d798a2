//! Error taxonomy.
//!
//! [`SelectError`] covers failures of the rule interpreter alone;
//! [`VantageError`] is the workspace-wide error that also covers input
//! assembly, rule decoding and collaborator failures. Every variant is
//! returned to the caller; nothing here is retried or recovered locally.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ReferenceFrame;
use crate::selection::RankFeature;

/// Failures raised while interpreting a [`SelectionSpec`][crate::SelectionSpec].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectError {
    /// The filter at `clause_index` (0-based) removed every candidate.
    #[error("no candidates left after filter clause #{clause_index}")]
    NoCandidatesAfterFilter { clause_index: usize },

    #[error("select_rank {requested} is out of range ({available} candidate(s))")]
    RankOutOfRange { requested: u32, available: usize },

    /// No object carries features for the requested frame.
    #[error("no features were computed for the {0} frame")]
    FrameUnavailable(ReferenceFrame),

    /// A candidate lacks the rank needed as a sort key.
    #[error("object {id} has no {feature}")]
    MissingFeature { id: String, feature: RankFeature },
}

/// Workspace-wide error type.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VantageError {
    /// Ids that have neither an explicit position nor a fallback-grid entry.
    #[error("missing object positions (not in request nor fallback grid): {0:?}")]
    MissingObjectPosition(Vec<String>),

    #[error("non-finite coordinate in {0}")]
    NonFiniteCoordinate(String),

    #[error("unknown filter type: {0}")]
    UnknownFilterType(String),

    #[error("malformed selection rule: {0}")]
    MalformedRule(String),

    /// A collaborator picked an id that is not in the object set.
    #[error("target {0} is not in the object set")]
    UnknownTarget(String),

    /// The reasoning or actuation collaborator failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    #[error(transparent)]
    Selection(#[from] SelectError),
}

impl VantageError {
    /// Stable snake_case name of the failure, for response envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            VantageError::MissingObjectPosition(_) => "missing_object_position",
            VantageError::NonFiniteCoordinate(_) => "non_finite_coordinate",
            VantageError::UnknownFilterType(_) => "unknown_filter_type",
            VantageError::MalformedRule(_) => "malformed_rule",
            VantageError::UnknownTarget(_) => "unknown_target",
            VantageError::Collaborator(_) => "collaborator",
            VantageError::Selection(SelectError::NoCandidatesAfterFilter { .. }) => {
                "no_candidates_after_filter"
            }
            VantageError::Selection(SelectError::RankOutOfRange { .. }) => "rank_out_of_range",
            VantageError::Selection(SelectError::FrameUnavailable(_)) => "frame_unavailable",
            VantageError::Selection(SelectError::MissingFeature { .. }) => "missing_feature",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_error_display() {
        let err = SelectError::RankOutOfRange {
            requested: 4,
            available: 2,
        };
        assert!(err.to_string().contains("select_rank 4"));

        let err = SelectError::MissingFeature {
            id: "obj_00".to_string(),
            feature: RankFeature::FrontRank,
        };
        assert_eq!(err.to_string(), "object obj_00 has no front_rank");
    }

    #[test]
    fn selection_error_is_transparent() {
        let err: VantageError = SelectError::NoCandidatesAfterFilter { clause_index: 1 }.into();
        assert_eq!(err.to_string(), "no candidates left after filter clause #1");
    }

    #[test]
    fn kind_names_the_inner_selection_failure() {
        let err: VantageError = SelectError::RankOutOfRange {
            requested: 3,
            available: 1,
        }
        .into();
        assert_eq!(err.kind(), "rank_out_of_range");
        assert_eq!(VantageError::UnknownTarget("x".into()).kind(), "unknown_target");
    }

    #[test]
    fn vantage_error_roundtrips_through_json() {
        let err = VantageError::MissingObjectPosition(vec!["a".into(), "b".into()]);
        let json = serde_json::to_string(&err).unwrap();
        let back: VantageError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
