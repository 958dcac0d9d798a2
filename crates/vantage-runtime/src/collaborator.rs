//! Payloads exchanged with the reasoning collaborator, and the traits that
//! stand in for it and for the downstream actuator.
//!
//! Payloads are built mechanically from scene data. No judgement is made
//! here: which frame an utterance refers to and which rule or object it
//! means are decided by the [`Reasoner`].

use std::collections::BTreeMap;

use schemars::schema_for;
use serde::{Deserialize, Serialize};
use vantage_geometry::{DualObjectView, LocalObjectView};
use vantage_types::{FeatureTable, FrameFeature, ReferenceFrame, SelectionSpec, VantageError};

use crate::scene::Scene;

/// Features of one object, keyed by frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectFeatures {
    pub id: String,
    pub features: BTreeMap<ReferenceFrame, FrameFeature>,
}

/// Rule-decision input: every object with its per-frame features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureInput {
    pub utterance: String,
    pub available_reference_frames: Vec<ReferenceFrame>,
    pub objects: Vec<ObjectFeatures>,
}

impl FeatureInput {
    /// Lay out `table` in id order. The primary frame is always listed as
    /// available; other frames only when some object carries them.
    pub fn build(utterance: &str, table: &FeatureTable) -> Self {
        let mut frames = vec![ReferenceFrame::Primary];
        for reference in table.values().flat_map(|per_frame| per_frame.keys()) {
            if !frames.contains(reference) {
                frames.push(*reference);
            }
        }
        frames.sort();

        let objects = table
            .iter()
            .map(|(id, per_frame)| ObjectFeatures {
                id: id.clone(),
                features: per_frame.clone(),
            })
            .collect();

        Self {
            utterance: utterance.to_string(),
            available_reference_frames: frames,
            objects,
        }
    }
}

/// Target-picking input: rounded positions in a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateInput {
    pub utterance: String,
    /// Frame the positions are expressed in.
    pub input_frame: ReferenceFrame,
    pub objects: Vec<LocalObjectView>,
}

impl CoordinateInput {
    /// Express every object of `scene` in `frame`.
    pub fn from_scene(
        utterance: &str,
        scene: &Scene,
        frame: ReferenceFrame,
    ) -> Result<Self, VantageError> {
        Ok(Self {
            utterance: utterance.to_string(),
            input_frame: frame,
            objects: scene.local_view(frame)?,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.iter().any(|o| o.id == id)
    }
}

/// Target-picking input carrying positions in every available frame, for a
/// collaborator that chooses the frame itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualCoordinateInput {
    pub utterance: String,
    pub available_frames: Vec<ReferenceFrame>,
    pub objects: Vec<DualObjectView>,
}

impl DualCoordinateInput {
    pub fn from_scene(utterance: &str, scene: &Scene) -> Self {
        Self {
            utterance: utterance.to_string(),
            available_frames: scene.available_frames(),
            objects: scene.dual_view(),
        }
    }
}

/// The reasoning collaborator.
///
/// Implementations typically wrap a language model; failures are reported as
/// [`VantageError::Collaborator`].
pub trait Reasoner: Send + Sync {
    /// Which frame the utterance is phrased in.
    fn classify_frame(&self, utterance: &str) -> Result<ReferenceFrame, VantageError> {
        let _ = utterance;
        Ok(ReferenceFrame::Primary)
    }

    fn decide_rule(&self, input: &FeatureInput) -> Result<SelectionSpec, VantageError>;

    /// Pick a target id directly from coordinates.
    fn pick_target(&self, input: &CoordinateInput) -> Result<String, VantageError>;
}

/// Downstream consumer of a resolved target, e.g. a motion planner.
pub trait TargetExecutor: Send + Sync {
    fn execute(&self, target_id: &str) -> Result<(), VantageError>;
}

/// A [`Reasoner`] that replays fixed answers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticReasoner {
    frame: Option<ReferenceFrame>,
    rule: Option<SelectionSpec>,
    target: Option<String>,
}

impl StaticReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `decide_rule` with `rule`, and `classify_frame` with its frame
    /// unless one was set explicitly.
    pub fn with_rule(mut self, rule: SelectionSpec) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn with_frame(mut self, frame: ReferenceFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

impl Reasoner for StaticReasoner {
    fn classify_frame(&self, _utterance: &str) -> Result<ReferenceFrame, VantageError> {
        Ok(self
            .frame
            .or(self.rule.as_ref().map(|r| r.reference_frame))
            .unwrap_or(ReferenceFrame::Primary))
    }

    fn decide_rule(&self, _input: &FeatureInput) -> Result<SelectionSpec, VantageError> {
        self.rule
            .clone()
            .ok_or_else(|| VantageError::Collaborator("no selection rule configured".to_string()))
    }

    fn pick_target(&self, _input: &CoordinateInput) -> Result<String, VantageError> {
        self.target
            .clone()
            .ok_or_else(|| VantageError::Collaborator("no target configured".to_string()))
    }
}

/// JSON Schema of [`SelectionSpec`], for structured-output prompting.
pub fn selection_schema() -> serde_json::Value {
    serde_json::to_value(schema_for!(SelectionSpec)).unwrap_or(serde_json::Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_types::{OrderBy, RankFeature, SortDirection};

    fn feature(depth: u32) -> FrameFeature {
        FrameFeature {
            depth_rank: Some(depth),
            ..FrameFeature::default()
        }
    }

    fn rule(frame: ReferenceFrame) -> SelectionSpec {
        SelectionSpec {
            reference_frame: frame,
            filters: vec![],
            order_by: OrderBy::new(RankFeature::DepthRank, SortDirection::Asc),
            select_rank: 1,
            tie_breaker: None,
        }
    }

    #[test]
    fn feature_input_lists_objects_in_id_order() {
        let mut table = FeatureTable::new();
        table.insert("b".into(), BTreeMap::from([(ReferenceFrame::Primary, feature(2))]));
        table.insert("a".into(), BTreeMap::from([(ReferenceFrame::Primary, feature(1))]));

        let input = FeatureInput::build("the near one", &table);
        assert_eq!(input.utterance, "the near one");
        assert_eq!(input.available_reference_frames, vec![ReferenceFrame::Primary]);
        let ids: Vec<&str> = input.objects.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn feature_input_reports_secondary_when_present() {
        let mut table = FeatureTable::new();
        table.insert(
            "a".into(),
            BTreeMap::from([
                (ReferenceFrame::Secondary, feature(1)),
                (ReferenceFrame::Primary, feature(1)),
            ]),
        );
        let input = FeatureInput::build("", &table);
        assert_eq!(
            input.available_reference_frames,
            vec![ReferenceFrame::Primary, ReferenceFrame::Secondary]
        );

        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["available_reference_frames"], serde_json::json!(["primary", "secondary"]));
        assert_eq!(json["objects"][0]["features"]["secondary"]["depth_rank"], 1);
        assert!(json["objects"][0]["features"]["primary"]["in_fov"].is_null());
    }

    #[test]
    fn empty_table_still_offers_primary() {
        let input = FeatureInput::build("", &FeatureTable::new());
        assert_eq!(input.available_reference_frames, vec![ReferenceFrame::Primary]);
        assert!(input.objects.is_empty());
    }

    #[test]
    fn static_reasoner_replays_answers() {
        let reasoner = StaticReasoner::new()
            .with_rule(rule(ReferenceFrame::Secondary))
            .with_target("obj_12");

        assert_eq!(reasoner.classify_frame("anything").unwrap(), ReferenceFrame::Secondary);
        let input = FeatureInput::build("", &FeatureTable::new());
        assert_eq!(reasoner.decide_rule(&input).unwrap(), rule(ReferenceFrame::Secondary));

        let coords = CoordinateInput {
            utterance: String::new(),
            input_frame: ReferenceFrame::Primary,
            objects: vec![],
        };
        assert_eq!(reasoner.pick_target(&coords).unwrap(), "obj_12");

        let reasoner = reasoner.with_frame(ReferenceFrame::Primary);
        assert_eq!(reasoner.classify_frame("").unwrap(), ReferenceFrame::Primary);
    }

    #[test]
    fn unconfigured_static_reasoner_fails_as_collaborator() {
        let reasoner = StaticReasoner::new();
        assert_eq!(reasoner.classify_frame("").unwrap(), ReferenceFrame::Primary);
        let err = reasoner
            .decide_rule(&FeatureInput::build("", &FeatureTable::new()))
            .unwrap_err();
        assert!(matches!(err, VantageError::Collaborator(_)));
    }

    #[test]
    fn coordinate_inputs_from_scene() {
        use crate::scene::SceneConfig;

        let request: vantage_types::SelectionRequest = serde_json::from_str(
            r#"{
                "utterance": "the cup",
                "primary": {"position": [0, 0, 0], "forward": [0, 0, 1]},
                "secondary": {"position": [0, 0, 2], "forward": [0, 0, -1]},
                "objects": [{"id": "cup", "position": [0.25, 0.1, 1.0]}]
            }"#,
        )
        .unwrap();
        let scene = Scene::from_request(&request, &SceneConfig::default()).unwrap();

        let single = CoordinateInput::from_scene("the cup", &scene, ReferenceFrame::Secondary).unwrap();
        assert_eq!(single.input_frame, ReferenceFrame::Secondary);
        assert!(single.contains("cup"));
        assert!(!single.contains("mug"));
        // Secondary faces -Z from z = 2: right is -X.
        assert_eq!(single.objects[0].pos_local, [-0.25, 0.1, 1.0]);

        let dual = DualCoordinateInput::from_scene("the cup", &scene);
        assert_eq!(
            dual.available_frames,
            vec![ReferenceFrame::Primary, ReferenceFrame::Secondary]
        );
        let json = serde_json::to_value(&dual).unwrap();
        assert_eq!(json["objects"][0]["pos_world"], serde_json::json!([0.25, 0.1, 1.0]));
        assert!(json["objects"][0].get("pos_secondary").is_some());
    }

    #[test]
    fn schema_names_the_rule_vocabulary() {
        let schema = selection_schema();
        assert!(!schema.is_null());
        let text = schema.to_string();
        for needle in ["reference_frame", "order_by", "select_rank", "front_top_k", "depth_rank"] {
            assert!(text.contains(needle), "schema should mention {needle}");
        }
    }
}
