//! `vantage-selector` – rule interpretation.
//!
//! Resolves a [`SelectionSpec`][vantage_types::SelectionSpec] against a
//! [`FeatureTable`][vantage_types::FeatureTable] to exactly one object id, or
//! a typed [`SelectError`][vantage_types::SelectError].
//!
//! # Modules
//!
//! - [`executor`] – [`resolve`][executor::resolve] and
//!   [`evaluate`][executor::evaluate]: the fixed filter → order → select →
//!   tie-break interpreter.

pub mod executor;

pub use executor::{Resolution, evaluate, resolve};
