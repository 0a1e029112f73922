#![warn(missing_docs)]
//! Typed description of a short-horizon generation scheduling problem.
//!
//! This crate owns the data a unit-commitment formulation is built from: the
//! thermal fleet, the planning horizon, and the load and renewable forecasts.
//! Everything here is validated on construction; downstream consumers (the
//! model builder in `ucp-solver`) treat a [`models::Scenario`] as a bag of
//! upheld preconditions and never re-check it.

/// Core domain models: generating units, scenarios, and their validation.
pub mod models;

// We use a non-std map for its insertion-ordering semantics: units arrive
// keyed by name and must keep a deterministic order across loads.
#[cfg(feature = "serde")]
pub(crate) type Map<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
