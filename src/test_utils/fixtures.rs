//! Test fixtures for creating sample features and settings documents

use crate::models::{ArtifactId, Extension, ExtensionType, Feature};

/// Parse `id` as an artifact id, panicking on malformed fixtures.
pub fn artifact(id: &str) -> ArtifactId {
    id.parse()
        .unwrap_or_else(|e| panic!("invalid fixture artifact id '{id}': {e}"))
}

/// Empty feature with the given id.
pub fn feature(id: &str) -> Feature {
    Feature::new(artifact(id))
}

/// Feature carrying a single text extension.
pub fn feature_with_text(id: &str, extension: &str, text: &str) -> Feature {
    let mut feature = feature(id);
    feature
        .extensions
        .push(Extension::new(extension, ExtensionType::Text).with_text(text));
    feature
}

/// Feature carrying a single artifacts extension.
pub fn feature_with_artifacts(id: &str, extension: &str, artifacts: &[&str]) -> Feature {
    let mut feature = feature(id);
    feature.extensions.push(
        Extension::new(extension, ExtensionType::Artifacts)
            .with_artifacts(artifacts.iter().map(|a| artifact(a)).collect()),
    );
    feature
}

/// Sample builder settings documents
#[derive(Clone, Debug)]
pub struct SettingsFixture {
    pub name: String,
    pub content: String,
}

impl SettingsFixture {
    /// Every supported key set
    pub fn complete() -> Self {
        Self {
            name: "complete".to_string(),
            content: r#"
merge-algorithm = "latest"
configuration-propagation = "carry"

[variables]
"java.version" = "17"
"sling.home" = "/opt/sling"

[framework-properties]
"org.osgi.framework.bootdelegation" = "sun.*"

[handlers.launchpad]
mode = "strict"

[handlers.repoinit]
separator = "\n\n"
"#
            .trim()
            .to_string(),
        }
    }

    /// Only handler configuration, policies left at their defaults
    pub fn handlers_only() -> Self {
        Self {
            name: "handlers_only".to_string(),
            content: r#"
[handlers.launchpad]
mode = "lenient"
"#
            .trim()
            .to_string(),
        }
    }

    /// Misspelled top-level key
    pub fn unknown_key() -> Self {
        Self {
            name: "unknown_key".to_string(),
            content: r#"
merge-strategy = "latest"
"#
            .trim()
            .to_string(),
        }
    }

    /// Broken TOML
    pub fn invalid_syntax() -> Self {
        Self {
            name: "invalid_syntax".to_string(),
            content: r#"
[handlers.launchpad
mode = "strict"
"#
            .trim()
            .to_string(),
        }
    }
}
