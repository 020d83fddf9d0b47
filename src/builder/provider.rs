//! Collaborators the builder resolves features and artifacts through.
//!
//! Both traits are implemented for plain closures, so simple callers and tests
//! can pass `|id| ...` instead of writing a type.

use crate::models::{ArtifactId, Feature};

/// Resolves a feature identifier to its descriptor.
///
/// This is the one collaborator every [`BuilderContext`](super::BuilderContext)
/// must have: merging follows includes and prototypes, and each of those is
/// looked up here. `None` means the feature is unknown to this provider.
pub trait FeatureProvider: Send + Sync {
    fn provide(&self, id: &ArtifactId) -> Option<Feature>;
}

impl<F> FeatureProvider for F
where
    F: Fn(&ArtifactId) -> Option<Feature> + Send + Sync,
{
    fn provide(&self, id: &ArtifactId) -> Option<Feature> {
        self(id)
    }
}

/// Resolves an artifact identifier to a retrievable location (usually a URL).
///
/// Optional. Consumers treat both a missing provider and a `None` answer as
/// "artifact resolution unavailable" rather than as an error.
pub trait ArtifactProvider: Send + Sync {
    fn provide(&self, id: &ArtifactId) -> Option<String>;
}

impl<F> ArtifactProvider for F
where
    F: Fn(&ArtifactId) -> Option<String> + Send + Sync,
{
    fn provide(&self, id: &ArtifactId) -> Option<String> {
        self(id)
    }
}
