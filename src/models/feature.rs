//! In-memory feature descriptor model.
//!
//! These types are what providers return and what handlers receive. Reading
//! and writing their on-disk representation belongs to the surrounding tool;
//! serde derives are provided so callers can plug in whatever format they use.

use serde::{Deserialize, Serialize};

use super::{ArtifactId, KeyValueMap};

/// A modular descriptor: artifacts, variables, framework properties and
/// named extension blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Feature {
    pub id: ArtifactId,
    /// Structural base folded into this feature before it is merged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prototype: Option<ArtifactId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ArtifactId>,
    #[serde(default, skip_serializing_if = "KeyValueMap::is_empty")]
    pub variables: KeyValueMap,
    #[serde(default, skip_serializing_if = "KeyValueMap::is_empty")]
    pub framework_properties: KeyValueMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,
}

impl Feature {
    /// Create an empty feature with the given id.
    #[must_use]
    pub fn new(id: ArtifactId) -> Self {
        Self {
            id,
            prototype: None,
            artifacts: Vec::new(),
            variables: KeyValueMap::new(),
            framework_properties: KeyValueMap::new(),
            extensions: Vec::new(),
        }
    }

    #[must_use]
    pub fn extension(&self, name: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.name == name)
    }

    pub fn extension_mut(&mut self, name: &str) -> Option<&mut Extension> {
        self.extensions.iter_mut().find(|e| e.name == name)
    }
}

/// Payload type of an extension block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionType {
    Text,
    Json,
    Artifacts,
}

/// How a consumer must treat an extension it does not understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionState {
    /// The feature is unusable without support for this extension
    Required,
    /// May be ignored
    #[default]
    Optional,
    /// Only meaningful while building; dropped from the final result
    Transient,
}

/// A named, handler-specific block of content within a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Extension {
    pub name: String,
    #[serde(rename = "type")]
    pub extension_type: ExtensionType,
    #[serde(default)]
    pub state: ExtensionState,
    /// Content for [`ExtensionType::Text`] and [`ExtensionType::Json`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Content for [`ExtensionType::Artifacts`]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<ArtifactId>,
}

impl Extension {
    pub fn new(name: impl Into<String>, extension_type: ExtensionType) -> Self {
        Self {
            name: name.into(),
            extension_type,
            state: ExtensionState::default(),
            text: None,
            artifacts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_state(mut self, state: ExtensionState) -> Self {
        self.state = state;
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn with_artifacts(mut self, artifacts: Vec<ArtifactId>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Parse the text payload of a JSON extension.
    ///
    /// Returns `Ok(None)` when the extension carries no text.
    pub fn json(&self) -> serde_json::Result<Option<serde_json::Value>> {
        self.text.as_deref().map(serde_json::from_str::<serde_json::Value>).transpose()
    }
}
