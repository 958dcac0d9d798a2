//! [`SelectionPipeline`]: one request in, one target id out.
//!
//! Two flows are offered, mirroring the two ways the reasoning collaborator
//! can be consulted:
//!
//! - **Features** ([`SelectionPipeline::run_features`]): compute per-frame
//!   ranks, let the [`Reasoner`] write a [`SelectionSpec`], then resolve the
//!   rule locally. The collaborator never sees raw coordinates.
//! - **Coordinates** ([`SelectionPipeline::run_coordinates`]): express the
//!   objects in the frame the utterance refers to and let the [`Reasoner`]
//!   name the target directly.
//!
//! Either way the chosen id is handed to the optional [`TargetExecutor`].
//! Every failure is returned as a [`VantageError`]; nothing is retried.
//!
//! # Example
//!
//! ```rust
//! use vantage_runtime::collaborator::StaticReasoner;
//! use vantage_runtime::pipeline::SelectionPipeline;
//! use vantage_runtime::scene::SceneConfig;
//! use vantage_types::{SelectionRequest, SelectionSpec};
//!
//! let rule = SelectionSpec::from_json(r#"{
//!     "reference_frame": "primary",
//!     "order_by": {"feature": "depth_rank", "direction": "asc"},
//!     "select_rank": 1
//! }"#).unwrap();
//! let pipeline = SelectionPipeline::new(SceneConfig::default(), StaticReasoner::new().with_rule(rule));
//!
//! let request: SelectionRequest = serde_json::from_str(r#"{
//!     "primary": {"position": [0, 0, -1], "forward": [0, 0, 1]},
//!     "objects": [{"id": "obj_00"}, {"id": "obj_30"}]
//! }"#).unwrap();
//! let outcome = pipeline.run_features(&request).unwrap();
//! assert_eq!(outcome.target_id, "obj_30");
//! ```

use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use vantage_selector::{Resolution, evaluate};
use vantage_types::{FeatureTable, ReferenceFrame, SelectionRequest, SelectionSpec, VantageError};

use crate::collaborator::{CoordinateInput, FeatureInput, Reasoner, TargetExecutor};
use crate::scene::{ObjectsSource, Scene, SceneConfig};

/// Result of [`SelectionPipeline::run_features`].
#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutcome {
    pub session_id: Option<String>,
    pub target_id: String,
    pub spec: SelectionSpec,
    pub resolution: Resolution,
    pub feature_input: FeatureInput,
    pub table: FeatureTable,
    pub objects_source: ObjectsSource,
    pub num_objects: usize,
}

/// Result of [`SelectionPipeline::run_coordinates`].
#[derive(Debug, Clone, Serialize)]
pub struct CoordinateOutcome {
    pub session_id: Option<String>,
    pub target_id: String,
    pub coordinate_input: CoordinateInput,
    pub objects_source: ObjectsSource,
    pub num_objects: usize,
}

/// Drives scene assembly, the reasoning collaborator, rule resolution and
/// dispatch for a single request.
pub struct SelectionPipeline {
    config: SceneConfig,
    reasoner: Box<dyn Reasoner>,
    executor: Option<Box<dyn TargetExecutor>>,
}

impl SelectionPipeline {
    pub fn new(config: SceneConfig, reasoner: impl Reasoner + 'static) -> Self {
        Self {
            config,
            reasoner: Box::new(reasoner),
            executor: None,
        }
    }

    /// Dispatch every resolved target to `executor`.
    pub fn with_executor(mut self, executor: impl TargetExecutor + 'static) -> Self {
        self.executor = Some(Box::new(executor));
        self
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Feature flow: rank, ask for a rule, resolve it locally, dispatch.
    #[instrument(skip_all, fields(session_id = request.session_id.as_deref().unwrap_or("-")))]
    pub fn run_features(&self, request: &SelectionRequest) -> Result<SelectionOutcome, VantageError> {
        let scene = self.assemble(request)?;
        let table = scene.feature_table();
        let feature_input = FeatureInput::build(&request.utterance, &table);
        debug!(
            frames = ?feature_input.available_reference_frames,
            "feature input built"
        );

        let spec = self
            .reasoner
            .decide_rule(&feature_input)
            .inspect_err(|e| warn!(error = %e, "reasoner failed to decide a rule"))?;
        debug!(rule = ?spec, "reasoner decided rule");

        let resolution = evaluate(&spec, &table)
            .inspect_err(|e| warn!(error = %e, "selection rule could not be resolved"))?;
        info!(
            target_id = %resolution.target_id,
            frame = %resolution.reference_frame,
            tie_broken = resolution.tie_broken,
            "target resolved"
        );

        self.dispatch(&resolution.target_id)?;

        Ok(SelectionOutcome {
            session_id: request.session_id.clone(),
            target_id: resolution.target_id.clone(),
            spec,
            resolution,
            feature_input,
            table,
            objects_source: scene.objects_source,
            num_objects: scene.objects.len(),
        })
    }

    /// Coordinate flow: classify the frame, express positions in it, let the
    /// reasoner pick, dispatch.
    ///
    /// # Errors
    ///
    /// Besides scene and collaborator failures:
    /// - [`SelectError::FrameUnavailable`][vantage_types::SelectError::FrameUnavailable]
    ///   when the utterance refers to a secondary frame the request lacks.
    /// - [`VantageError::UnknownTarget`] when the picked id is not in the
    ///   object set.
    #[instrument(skip_all, fields(session_id = request.session_id.as_deref().unwrap_or("-")))]
    pub fn run_coordinates(&self, request: &SelectionRequest) -> Result<CoordinateOutcome, VantageError> {
        let scene = self.assemble(request)?;

        let frame: ReferenceFrame = self
            .reasoner
            .classify_frame(&request.utterance)
            .inspect_err(|e| warn!(error = %e, "reasoner failed to classify the frame"))?;
        debug!(%frame, "utterance classified");

        let coordinate_input = CoordinateInput::from_scene(&request.utterance, &scene, frame)?;
        let target_id = self
            .reasoner
            .pick_target(&coordinate_input)
            .inspect_err(|e| warn!(error = %e, "reasoner failed to pick a target"))?;

        if !coordinate_input.contains(&target_id) {
            warn!(target_id = %target_id, "reasoner picked an id outside the object set");
            return Err(VantageError::UnknownTarget(target_id));
        }
        info!(target_id = %target_id, %frame, "target picked");

        self.dispatch(&target_id)?;

        Ok(CoordinateOutcome {
            session_id: request.session_id.clone(),
            target_id,
            coordinate_input,
            objects_source: scene.objects_source,
            num_objects: scene.objects.len(),
        })
    }

    fn assemble(&self, request: &SelectionRequest) -> Result<Scene, VantageError> {
        let scene = Scene::from_request(request, &self.config)
            .inspect_err(|e| warn!(error = %e, "request rejected"))?;
        info!(
            objects = scene.objects.len(),
            source = ?scene.objects_source,
            secondary = scene.secondary.is_some(),
            "scene assembled"
        );
        Ok(scene)
    }

    fn dispatch(&self, target_id: &str) -> Result<(), VantageError> {
        let Some(executor) = &self.executor else {
            return Ok(());
        };
        info!(target_id = %target_id, "dispatching target");
        executor
            .execute(target_id)
            .inspect_err(|e| warn!(error = %e, "executor rejected target"))
    }
}
