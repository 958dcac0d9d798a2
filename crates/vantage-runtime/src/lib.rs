//! `vantage-runtime` – request handling around the geometry core.
//!
//! Takes a wire-level snapshot, assembles a validated scene, consults the
//! reasoning collaborator and resolves a single target id.
//!
//! # Modules
//!
//! - [`scene`] – [`Scene`][scene::Scene] and [`SceneConfig`][scene::SceneConfig]:
//!   object resolution against the fallback grid, frame construction and the
//!   per-frame feature table.
//! - [`collaborator`] – the payloads shown to the reasoning collaborator,
//!   the [`Reasoner`][collaborator::Reasoner] and
//!   [`TargetExecutor`][collaborator::TargetExecutor] seams, and the JSON
//!   Schema of the rule language.
//! - [`pipeline`] – [`SelectionPipeline`][pipeline::SelectionPipeline]: the
//!   feature and coordinate flows. This is the only layer that logs.
//! - [`response`] – one envelope for successful and failed runs.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]: console
//!   logging plus an optional OTLP span exporter.

pub mod collaborator;
pub mod pipeline;
pub mod response;
pub mod scene;
pub mod telemetry;

pub use collaborator::{
    CoordinateInput, DualCoordinateInput, FeatureInput, ObjectFeatures, Reasoner, StaticReasoner,
    TargetExecutor, selection_schema,
};
pub use pipeline::{CoordinateOutcome, SelectionOutcome, SelectionPipeline};
pub use response::{ResponseStatus, SelectionResponse};
pub use scene::{ObjectsSource, Scene, SceneConfig, default_grid, resolve_objects};
pub use telemetry::{LogFormat, TelemetrySettings, TracerProviderGuard, init_tracing};
