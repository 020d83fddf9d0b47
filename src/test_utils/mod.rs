//! Test utilities for the feature builder
//!
//! In-memory collaborators and instrumented handlers for exercising a
//! [`BuilderContext`](crate::builder::BuilderContext) without any repository
//! or launcher behind it:
//! - [`InMemoryFeatureProvider`] / [`RepositoryArtifactProvider`]
//! - [`RecordingMergeHandler`] / [`RecordingPostProcessor`], which capture the
//!   [`HandlerContext`](crate::builder::HandlerContext) of every invocation
//! - [`FailingHandler`] for error propagation
//! - fixtures for features and settings documents
//!
//! # Example
//!
//! ```rust,no_run
//! use feature_builder::builder::BuilderContext;
//! use feature_builder::test_utils::{InMemoryFeatureProvider, fixtures};
//!
//! let provider = InMemoryFeatureProvider::new()
//!     .with_feature(fixtures::feature("org.example:base:1.0.0"));
//! let ctx = BuilderContext::builder().feature_provider(provider).build().unwrap();
//! ```

pub mod fixtures;
mod handlers;
mod providers;

pub use fixtures::SettingsFixture;
pub use handlers::{
    FailingHandler, Invocation, InvocationLog, RecordingMergeHandler, RecordingPostProcessor,
};
pub use providers::{InMemoryFeatureProvider, RepositoryArtifactProvider};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. An explicit `level` wins; otherwise
/// `RUST_LOG` is honored; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=feature_builder=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
