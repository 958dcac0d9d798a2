//! Selection rule executor.
//!
//! A [`SelectionSpec`] is interpreted in four fixed steps:
//!
//! 1. **Project**: take every object's features for the rule's reference
//!    frame.
//! 2. **Filter**: apply each [`FilterClause`] in list order. The first clause
//!    that leaves no candidate fails with
//!    [`SelectError::NoCandidatesAfterFilter`].
//! 3. **Order & select**: stable-sort on `order_by`, then pick the 1-indexed
//!    `select_rank` ([`SelectError::RankOutOfRange`] if there are too few).
//! 4. **Tie-break**: only when other candidates share the selected
//!    candidate's exact ordering key, re-sort that subset by the tie-breaker
//!    and take its first element.
//!
//! Candidates enter in ascending id order, so equal sort keys always resolve
//! the same way.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use vantage_selector::resolve;
//! use vantage_types::{
//!     FeatureTable, FilterClause, FrameFeature, OrderBy, RankFeature, ReferenceFrame,
//!     SelectionSpec, SortDirection,
//! };
//!
//! let feature = |depth, in_fov| FrameFeature {
//!     depth_rank: Some(depth),
//!     in_fov: Some(in_fov),
//!     ..Default::default()
//! };
//! let mut table = FeatureTable::new();
//! table.insert("near".into(), BTreeMap::from([(ReferenceFrame::Primary, feature(1, false))]));
//! table.insert("far".into(), BTreeMap::from([(ReferenceFrame::Primary, feature(2, true))]));
//!
//! let spec = SelectionSpec {
//!     reference_frame: ReferenceFrame::Primary,
//!     filters: vec![FilterClause::InFov { value: true }],
//!     order_by: OrderBy::new(RankFeature::DepthRank, SortDirection::Asc),
//!     select_rank: 1,
//!     tie_breaker: None,
//! };
//! assert_eq!(resolve(&spec, &table).unwrap(), "far");
//! ```

use serde::Serialize;
use vantage_types::{
    FeatureTable, FilterClause, FrameFeature, OrderBy, RankFeature, ReferenceFrame, SelectError,
    SelectionSpec, SortDirection,
};

type Candidate<'a> = (&'a str, &'a FrameFeature);

/// Outcome of a successful evaluation, with enough detail to explain it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub target_id: String,
    pub reference_frame: ReferenceFrame,
    /// Candidate count after each filter clause, in clause order.
    pub remaining_after_filters: Vec<usize>,
    /// Surviving candidates in `order_by` order.
    pub ordered: Vec<String>,
    /// True when the tie-breaker changed or confirmed the pick among
    /// several equal keys.
    pub tie_broken: bool,
}

/// Resolve `spec` to a single object id.
pub fn resolve(spec: &SelectionSpec, table: &FeatureTable) -> Result<String, SelectError> {
    evaluate(spec, table).map(|r| r.target_id)
}

/// Resolve `spec` and report the intermediate candidate sets.
///
/// # Errors
///
/// - [`SelectError::FrameUnavailable`] – objects exist but none carries
///   features for the requested frame.
/// - [`SelectError::NoCandidatesAfterFilter`] – a filter emptied the set.
/// - [`SelectError::RankOutOfRange`] – `select_rank` is 0 or exceeds the
///   surviving candidate count.
/// - [`SelectError::MissingFeature`] – a candidate lacks a rank used as a
///   sort key.
pub fn evaluate(spec: &SelectionSpec, table: &FeatureTable) -> Result<Resolution, SelectError> {
    let frame = spec.reference_frame;

    let mut candidates: Vec<Candidate<'_>> = table
        .iter()
        .filter_map(|(id, frames)| frames.get(&frame).map(|f| (id.as_str(), f)))
        .collect();
    if candidates.is_empty() && !table.is_empty() {
        return Err(SelectError::FrameUnavailable(frame));
    }

    let mut remaining_after_filters = Vec::with_capacity(spec.filters.len());
    for (clause_index, clause) in spec.filters.iter().enumerate() {
        apply_filter(clause, &mut candidates)?;
        if candidates.is_empty() {
            return Err(SelectError::NoCandidatesAfterFilter { clause_index });
        }
        remaining_after_filters.push(candidates.len());
    }

    order_candidates(&mut candidates, spec.order_by)?;

    let available = candidates.len();
    let index = (spec.select_rank as usize)
        .checked_sub(1)
        .filter(|i| *i < available)
        .ok_or(SelectError::RankOutOfRange {
            requested: spec.select_rank,
            available,
        })?;
    let mut selected = candidates[index];

    let mut tie_broken = false;
    if let Some(tie_breaker) = spec.tie_breaker {
        let key = selected.1.rank(spec.order_by.feature);
        let mut tied: Vec<Candidate<'_>> = candidates
            .iter()
            .copied()
            .filter(|(_, f)| f.rank(spec.order_by.feature) == key)
            .collect();
        if tied.len() > 1 {
            order_candidates(&mut tied, tie_breaker)?;
            selected = tied[0];
            tie_broken = true;
        }
    }

    Ok(Resolution {
        target_id: selected.0.to_string(),
        reference_frame: frame,
        remaining_after_filters,
        ordered: candidates.iter().map(|(id, _)| id.to_string()).collect(),
        tie_broken,
    })
}

fn apply_filter(clause: &FilterClause, candidates: &mut Vec<Candidate<'_>>) -> Result<(), SelectError> {
    match clause {
        FilterClause::InFov { value } => candidates.retain(|(_, f)| f.in_fov == Some(*value)),
        FilterClause::Reachable { value } => {
            candidates.retain(|(_, f)| f.reachable == Some(*value))
        }
        FilterClause::Side { value } => candidates.retain(|(_, f)| f.side == Some(*value)),
        FilterClause::FrontTopK { k } => {
            order_candidates(
                candidates,
                OrderBy::new(RankFeature::FrontRank, SortDirection::Asc),
            )?;
            candidates.truncate(*k);
        }
    }
    Ok(())
}

/// Stable sort on one rank field. Every candidate must carry that rank.
fn order_candidates(candidates: &mut [Candidate<'_>], key: OrderBy) -> Result<(), SelectError> {
    if let Some((id, _)) = candidates
        .iter()
        .find(|(_, f)| f.rank(key.feature).is_none())
    {
        return Err(SelectError::MissingFeature {
            id: id.to_string(),
            feature: key.feature,
        });
    }
    candidates.sort_by(|(_, a), (_, b)| {
        let (a, b) = (a.rank(key.feature), b.rank(key.feature));
        match key.direction {
            SortDirection::Asc => a.cmp(&b),
            SortDirection::Desc => b.cmp(&a),
        }
    });
    Ok(())
}
