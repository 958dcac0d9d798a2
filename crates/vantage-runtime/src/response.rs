//! Response envelope for a finished (or failed) pipeline run.
//!
//! Callers that answer a transport request need one shape for success and
//! failure alike. A failure carries the error's [`kind`][VantageError::kind]
//! as `reason` plus the full error value.

use serde::Serialize;
use vantage_types::VantageError;

use crate::collaborator::ObjectFeatures;
use crate::pipeline::{CoordinateOutcome, SelectionOutcome};
use crate::scene::ObjectsSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Bookkeeping echoed back to the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResponseDebug {
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects_source: Option<ObjectsSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_objects: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    /// The rule (feature flow) or the frame and pick (coordinate flow).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<serde_json::Value>,
    /// Exactly what the reasoning collaborator was shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoner_input: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed_features: Option<Vec<ObjectFeatures>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<VantageError>,
    pub debug: ResponseDebug,
}

impl SelectionResponse {
    pub fn from_error(error: &VantageError, session_id: Option<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            target_id: None,
            decision: None,
            reasoner_input: None,
            computed_features: None,
            reason: Some(error.kind()),
            error: Some(error.clone()),
            debug: ResponseDebug {
                session_id,
                ..ResponseDebug::default()
            },
        }
    }
}

impl From<&SelectionOutcome> for SelectionResponse {
    fn from(outcome: &SelectionOutcome) -> Self {
        Self {
            status: ResponseStatus::Ok,
            target_id: Some(outcome.target_id.clone()),
            decision: serde_json::to_value(&outcome.spec).ok(),
            reasoner_input: serde_json::to_value(&outcome.feature_input).ok(),
            computed_features: Some(outcome.feature_input.objects.clone()),
            reason: None,
            error: None,
            debug: ResponseDebug {
                session_id: outcome.session_id.clone(),
                objects_source: Some(outcome.objects_source),
                num_objects: Some(outcome.num_objects),
            },
        }
    }
}

impl From<&CoordinateOutcome> for SelectionResponse {
    fn from(outcome: &CoordinateOutcome) -> Self {
        let decision = serde_json::json!({
            "reference_frame": outcome.coordinate_input.input_frame,
            "target_id": outcome.target_id,
        });
        Self {
            status: ResponseStatus::Ok,
            target_id: Some(outcome.target_id.clone()),
            decision: Some(decision),
            reasoner_input: serde_json::to_value(&outcome.coordinate_input).ok(),
            computed_features: None,
            reason: None,
            error: None,
            debug: ResponseDebug {
                session_id: outcome.session_id.clone(),
                objects_source: Some(outcome.objects_source),
                num_objects: Some(outcome.num_objects),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::StaticReasoner;
    use crate::pipeline::SelectionPipeline;
    use crate::scene::SceneConfig;
    use vantage_types::{ReferenceFrame, SelectError, SelectionRequest, SelectionSpec};

    fn request() -> SelectionRequest {
        serde_json::from_str(
            r#"{"session_id": "s-7", "primary": {"position": [0, 0, -1], "forward": [0, 0, 1]}}"#,
        )
        .unwrap()
    }

    #[test]
    fn error_envelope_names_the_failure() {
        let err = VantageError::Selection(SelectError::FrameUnavailable(ReferenceFrame::Secondary));
        let json = serde_json::to_value(SelectionResponse::from_error(&err, Some("s-1".into()))).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["reason"], "frame_unavailable");
        assert_eq!(json["debug"]["session_id"], "s-1");
        assert!(json.get("target_id").is_none());
        assert!(json["debug"].get("num_objects").is_none());
    }

    #[test]
    fn feature_flow_envelope() {
        let spec = SelectionSpec::from_json(
            r#"{"reference_frame":"primary","order_by":{"feature":"front_rank","direction":"asc"},"select_rank":1}"#,
        )
        .unwrap();
        let pipeline = SelectionPipeline::new(SceneConfig::default(), StaticReasoner::new().with_rule(spec));
        let outcome = pipeline.run_features(&request()).unwrap();

        let json = serde_json::to_value(SelectionResponse::from(&outcome)).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["target_id"], outcome.target_id.as_str());
        assert_eq!(json["decision"]["order_by"]["feature"], "front_rank");
        assert_eq!(json["computed_features"].as_array().unwrap().len(), 16);
        assert_eq!(json["debug"]["objects_source"], "fixed_grid");
        assert_eq!(json["debug"]["num_objects"], 16);
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn coordinate_flow_envelope() {
        let pipeline = SelectionPipeline::new(SceneConfig::default(), StaticReasoner::new().with_target("obj_11"));
        let outcome = pipeline.run_coordinates(&request()).unwrap();

        let json = serde_json::to_value(SelectionResponse::from(&outcome)).unwrap();
        assert_eq!(json["decision"]["reference_frame"], "primary");
        assert_eq!(json["decision"]["target_id"], "obj_11");
        assert_eq!(json["reasoner_input"]["input_frame"], "primary");
        assert!(json.get("computed_features").is_none());
        assert_eq!(json["debug"]["session_id"], "s-7");
    }
}
