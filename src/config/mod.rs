//! Configuration for the feature builder
//!
//! Collaborators and handlers are wired in code, but the plain data a
//! context carries (overwrites, handler configuration blocks and the two
//! policies) can come from a TOML document:
//!
//! ```rust
//! use feature_builder::builder::{BuilderContext, MergeSource};
//! use feature_builder::config::BuilderSettings;
//! use feature_builder::models::{ArtifactId, Feature};
//!
//! # fn example() -> anyhow::Result<()> {
//! let settings = BuilderSettings::from_toml_str(r#"
//!     merge-algorithm = "latest"
//!
//!     [handlers.launchpad]
//!     mode = "lenient"
//! "#)?;
//!
//! let ctx = settings
//!     .apply(
//!         BuilderContext::builder()
//!             .feature_provider(|id: &ArtifactId| Some(Feature::new(id.clone()))),
//!     )
//!     .build()?;
//! assert_eq!(ctx.handler_configuration("launchpad").unwrap().get("mode"), Some("lenient"));
//! # Ok(())
//! # }
//! ```
//!
//! Reading the document from disk is left to the caller.

mod settings;

pub use settings::BuilderSettings;
