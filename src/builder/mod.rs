//! Merge context and extension handler configuration.
//!
//! The merge engine that folds features into one result is driven entirely
//! by what this module collects up front:
//!
//! - [`BuilderContext`] / [`BuilderContextBuilder`] - the configuration value
//!   and its fluent assembly
//! - [`MergeSource`] - the engine's read-only view of a context
//! - [`FeatureProvider`] / [`ArtifactProvider`] - resolution collaborators
//! - [`MergeHandler`] / [`PostProcessHandler`] - pluggable extension handlers
//! - [`HandlerContext`] / [`MergePhase`] - what one handler invocation sees
//! - [`ArtifactMergeAlgorithm`] - artifact version-conflict policy
//! - [`invoke`] - dispatching extensions to the registered handlers
//!
//! # Lifecycle
//!
//! 1. The caller assembles a context with [`BuilderContext::builder`].
//! 2. The engine reads it through [`MergeSource`] and, for each extension,
//!    calls [`invoke::merge_extension`] or [`invoke::post_process`], which
//!    build a fresh [`HandlerContext`] per handler invocation.
//! 3. Nested includes are resolved against [`BuilderContext::fork`].

pub mod algorithm;
pub mod context;
pub mod handler;
pub mod invoke;
pub mod provider;

pub use algorithm::{ArtifactMergeAlgorithm, compare_versions};
pub use context::{BuilderContext, BuilderContextBuilder, ConfigurationPropagation, MergeSource};
pub use handler::{
    Handler, HandlerContext, HandlerRegistry, MergeHandler, MergePhase, PostProcessHandler,
};
pub use provider::{ArtifactProvider, FeatureProvider};
