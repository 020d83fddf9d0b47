//! In-memory resolution collaborators.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::builder::{ArtifactProvider, FeatureProvider};
use crate::models::{ArtifactId, Feature};

/// Feature provider backed by a map, recording every lookup.
#[derive(Debug, Default)]
pub struct InMemoryFeatureProvider {
    features: HashMap<ArtifactId, Feature>,
    requests: Mutex<Vec<ArtifactId>>,
}

impl InMemoryFeatureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `feature` under its own id.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.insert(feature.id.clone(), feature);
        self
    }

    /// Ids requested so far, in order.
    pub fn requests(&self) -> Vec<ArtifactId> {
        self.requests.lock().unwrap().clone()
    }
}

impl FeatureProvider for InMemoryFeatureProvider {
    fn provide(&self, id: &ArtifactId) -> Option<Feature> {
        self.requests.lock().unwrap().push(id.clone());
        self.features.get(id).cloned()
    }
}

/// Artifact provider resolving ids to locations under a repository root.
///
/// Only ids in the known set resolve; everything else yields `None`.
#[derive(Debug, Clone)]
pub struct RepositoryArtifactProvider {
    root: String,
    known: Vec<ArtifactId>,
}

impl RepositoryArtifactProvider {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into().trim_end_matches('/').to_string(),
            known: Vec::new(),
        }
    }

    pub fn with_artifact(mut self, id: ArtifactId) -> Self {
        self.known.push(id);
        self
    }
}

impl ArtifactProvider for RepositoryArtifactProvider {
    fn provide(&self, id: &ArtifactId) -> Option<String> {
        self.known
            .contains(id)
            .then(|| format!("{}/{}", self.root, id.to_mvn_path()))
    }
}
