//! `vantage-geometry` – frames, projections and per-object features.
//!
//! Turns raw world-space poses and object positions into the relative,
//! frame-local description that rule evaluation and the reasoning
//! collaborator work with. Every function is a pure transform of its inputs.
//!
//! # Modules
//!
//! - [`vector`] – [`Vec3`][vector::Vec3] and the handful of primitives the
//!   rest of the crate needs (dot, cross, epsilon-guarded normalize,
//!   horizontal projection).
//! - [`basis`] – [`build_basis`][basis::build_basis]: derives an orthonormal
//!   right/up/forward basis from a forward vector, ignoring observer tilt.
//! - [`features`] – [`compute_features`][features::compute_features]: depth,
//!   lateral and frontal ranks, field-of-view membership and quadrant per
//!   object.
//! - [`projection`] – object positions expressed in a frame's local axes,
//!   rounded for presentation.

pub mod basis;
pub mod features;
pub mod projection;
pub mod vector;

pub use basis::{Frame, FrameBasis, Pose, build_basis};
pub use features::{FeatureOptions, ObjectSet, classify_side, compute_features, stable_rank};
pub use projection::{DualObjectView, LocalObjectView, dual_view, local_view, world_to_local};
pub use vector::{EPSILON, Vec3, WORLD_UP};
