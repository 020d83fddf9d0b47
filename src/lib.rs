//! Feature Builder - merge context for modular feature descriptors
//!
//! A feature is a descriptor listing artifacts, variables, framework
//! properties and named extension blocks. Features are combined into larger
//! ones by a merge engine that follows includes and prototypes. This crate
//! provides the configuration that engine runs on: what it resolves features
//! and artifacts through, which overwrites it applies, how it settles
//! artifact version conflicts and which pluggable handlers process
//! extensions.
//!
//! # Architecture Overview
//!
//! - A [`BuilderContext`](builder::BuilderContext) is assembled once with
//!   [`BuilderContextBuilder`](builder::BuilderContextBuilder) and is
//!   immutable afterwards
//! - The engine reads it through [`MergeSource`](builder::MergeSource) and
//!   forks it for nested includes
//! - Every handler call receives its own
//!   [`HandlerContext`](builder::HandlerContext) with the handler's
//!   configuration block and the current merge phase
//!
//! # Core Modules
//!
//! - [`builder`] - context, handlers, providers, merge algorithm and handler dispatch
//! - [`config`] - declarative settings loaded from TOML
//! - [`core`] - error types and user-facing error formatting
//! - [`models`] - artifact ids, features, extensions and ordered key/value maps
//!
//! # Example
//!
//! ```rust
//! use feature_builder::builder::{ArtifactMergeAlgorithm, BuilderContext, MergeSource};
//! use feature_builder::models::{ArtifactId, Feature, KeyValueMap};
//!
//! # fn example() -> anyhow::Result<()> {
//! let ctx = BuilderContext::builder()
//!     .feature_provider(|id: &ArtifactId| Some(Feature::new(id.clone())))
//!     .add_variables_overwrites(&KeyValueMap::from([("java.version", "17")]))
//!     .handler_configuration("launchpad", KeyValueMap::from([("mode", "strict")]))
//!     .merge_algorithm(ArtifactMergeAlgorithm::Latest)
//!     .build()?;
//!
//! assert_eq!(ctx.variables_overwrites().get("java.version"), Some("17"));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod models;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
