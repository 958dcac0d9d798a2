//! Snapshot request shapes, as handed over by the transport layer.
//!
//! Coordinates arrive as plain `[f64; 3]` arrays in one shared world frame.
//! `vantage-geometry` converts them into its own vector type.

use serde::{Deserialize, Serialize};

/// An agent's pose on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseInput {
    pub position: [f64; 3],
    /// Need not be normalized.
    pub forward: [f64; 3],
    /// Overrides world-up `(0, 1, 0)` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<[f64; 3]>,
    /// Field-of-view cone in degrees. Only honoured for the primary frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov_deg: Option<f64>,
}

/// An object id with an optional explicit position.
///
/// When `position` is absent the id is looked up in the configured fallback
/// grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInput {
    pub id: String,
    #[serde(default)]
    pub position: Option<[f64; 3]>,
}

/// One selection snapshot: poses, objects and the utterance that drives the
/// reasoning collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp_ms: Option<u64>,
    #[serde(default)]
    pub utterance: String,
    #[serde(alias = "user")]
    pub primary: PoseInput,
    #[serde(default, alias = "robot")]
    pub secondary: Option<PoseInput>,
    /// `None` or empty means "use the whole fallback grid".
    #[serde(default)]
    pub objects: Option<Vec<ObjectInput>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_legacy_request_shape() {
        let req: SelectionRequest = serde_json::from_str(
            r#"{
                "session_id": "s-1",
                "timestamp_ms": 1700000000000,
                "utterance": "pick the nearest box",
                "user": {"position": [0, 1.6, -0.5], "forward": [0, -0.3, 1], "fov_deg": 60},
                "robot": {"position": [0, 0, 0.5], "forward": [0, 0, -1]},
                "objects": [{"id": "obj_00"}, {"id": "cup", "position": [0.1, 0, 0.2]}]
            }"#,
        )
        .unwrap();

        assert_eq!(req.primary.fov_deg, Some(60.0));
        assert!(req.primary.up.is_none());
        assert_eq!(req.secondary.as_ref().unwrap().forward, [0.0, 0.0, -1.0]);
        let objects = req.objects.unwrap();
        assert_eq!(objects[0].position, None);
        assert_eq!(objects[1].position, Some([0.1, 0.0, 0.2]));
    }

    #[test]
    fn minimal_request_defaults() {
        let req: SelectionRequest =
            serde_json::from_str(r#"{"primary": {"position": [0,0,0], "forward": [0,0,1]}}"#)
                .unwrap();
        assert!(req.utterance.is_empty());
        assert!(req.secondary.is_none());
        assert!(req.objects.is_none());
    }
}
