//! Declarative builder settings.
//!
//! [`BuilderSettings`] is the serializable subset of a
//! [`BuilderContext`](crate::builder::BuilderContext): everything except the
//! collaborators and handler instances, which only exist in code.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::builder::{ArtifactMergeAlgorithm, BuilderContextBuilder, ConfigurationPropagation};
use crate::core::BuilderError;
use crate::models::KeyValueMap;

/// Overwrites, handler configuration and policies loaded from TOML.
///
/// ```toml
/// merge-algorithm = "latest"
/// configuration-propagation = "carry"
///
/// [variables]
/// "java.version" = "17"
///
/// [framework-properties]
/// "org.osgi.framework.bootdelegation" = "sun.*"
///
/// [handlers.launchpad]
/// mode = "strict"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuilderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_algorithm: Option<ArtifactMergeAlgorithm>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_propagation: Option<ConfigurationPropagation>,

    #[serde(default, skip_serializing_if = "KeyValueMap::is_empty")]
    pub variables: KeyValueMap,

    #[serde(default, skip_serializing_if = "KeyValueMap::is_empty")]
    pub framework_properties: KeyValueMap,

    /// Configuration blocks keyed by handler name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub handlers: BTreeMap<String, KeyValueMap>,
}

impl BuilderSettings {
    /// Parse settings from a TOML document.
    ///
    /// # Errors
    ///
    /// [`BuilderError::ConfigParse`] for invalid TOML, unknown keys, unknown
    /// policy names or non-string overwrite values.
    pub fn from_toml_str(content: &str) -> Result<Self, BuilderError> {
        toml::from_str(content).map_err(|e| BuilderError::ConfigParse {
            reason: e.to_string(),
        })
    }

    /// Render the settings as a TOML document.
    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Layer these settings onto `builder`.
    ///
    /// Overwrites are merged into what the builder already holds; handler
    /// blocks replace any block of the same name; policies replace the
    /// builder's only when set here.
    #[must_use]
    pub fn apply(&self, mut builder: BuilderContextBuilder) -> BuilderContextBuilder {
        debug!(
            variables = self.variables.len(),
            framework_properties = self.framework_properties.len(),
            handlers = self.handlers.len(),
            "Applying builder settings"
        );

        builder = builder
            .add_variables_overwrites(&self.variables)
            .add_framework_properties_overwrites(&self.framework_properties);
        for (name, config) in &self.handlers {
            builder = builder.handler_configuration(name.clone(), config.clone());
        }
        if let Some(algorithm) = self.merge_algorithm {
            builder = builder.merge_algorithm(algorithm);
        }
        if let Some(policy) = self.configuration_propagation {
            builder = builder.configuration_propagation(policy);
        }
        builder
    }
}
