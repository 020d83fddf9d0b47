//! Shared data models for feature merging
//!
//! - [`KeyValueMap`] - ordered string map used for every overwrite layer
//! - [`ArtifactId`] - artifact coordinates
//! - [`Feature`] / [`Extension`] - the descriptor content handed to handlers

pub mod artifact;
pub mod feature;
pub mod key_value_map;

pub use artifact::ArtifactId;
pub use feature::{Extension, ExtensionState, ExtensionType, Feature};
pub use key_value_map::KeyValueMap;
