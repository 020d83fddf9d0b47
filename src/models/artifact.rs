//! Artifact coordinates.
//!
//! An [`ArtifactId`] names an artifact in a Maven-style repository. Two textual
//! forms are accepted:
//!
//! - mvn id: `group:artifact[:type[:classifier]]:version`
//! - mvn url: `mvn:group/artifact/version[/type[/classifier]]`
//!
//! The packaging type defaults to `jar` when omitted.
//!
//! ```rust
//! use feature_builder::models::ArtifactId;
//!
//! let id: ArtifactId = "org.apache.sling:launchpad:slingosgifeature:base:12".parse().unwrap();
//! assert_eq!(id.group_id(), "org.apache.sling");
//! assert_eq!(id.classifier(), Some("base"));
//! assert_eq!(
//!     id.to_mvn_path(),
//!     "org/apache/sling/launchpad/12/launchpad-12-base.slingosgifeature"
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::BuilderError;

const DEFAULT_TYPE: &str = "jar";
const MVN_URL_PREFIX: &str = "mvn:";

/// Coordinates of a single artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId {
    group_id: String,
    artifact_id: String,
    version: String,
    artifact_type: String,
    classifier: Option<String>,
}

impl ArtifactId {
    /// Create coordinates, validating that no mandatory part is empty.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        classifier: Option<&str>,
        artifact_type: Option<&str>,
    ) -> Result<Self, BuilderError> {
        let id = Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            artifact_type: artifact_type
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_TYPE)
                .to_string(),
            classifier: classifier.filter(|c| !c.is_empty()).map(str::to_string),
        };
        id.validate()?;
        Ok(id)
    }

    fn validate(&self) -> Result<(), BuilderError> {
        let missing = if self.group_id.is_empty() {
            Some("group id is empty")
        } else if self.artifact_id.is_empty() {
            Some("artifact id is empty")
        } else if self.version.is_empty() {
            Some("version is empty")
        } else {
            None
        };
        match missing {
            Some(reason) => Err(BuilderError::InvalidArtifactId {
                input: self.to_mvn_id(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Parse the `group:artifact[:type[:classifier]]:version` form.
    pub fn from_mvn_id(input: &str) -> Result<Self, BuilderError> {
        let parts: Vec<&str> = input.split(':').collect();
        let invalid = |reason: &str| BuilderError::InvalidArtifactId {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        match parts.as_slice() {
            [group, artifact, version] => Self::new(*group, *artifact, *version, None, None),
            [group, artifact, kind, version] => {
                Self::new(*group, *artifact, *version, None, Some(*kind))
            }
            [group, artifact, kind, classifier, version] => {
                Self::new(*group, *artifact, *version, Some(*classifier), Some(*kind))
            }
            _ => Err(invalid("expected 3 to 5 colon separated parts")),
        }
        .map_err(|e| match e {
            BuilderError::InvalidArtifactId { reason, .. } => invalid(&reason),
            other => other,
        })
    }

    /// Parse the `mvn:group/artifact/version[/type[/classifier]]` form.
    pub fn from_mvn_url(input: &str) -> Result<Self, BuilderError> {
        let invalid = |reason: &str| BuilderError::InvalidArtifactId {
            input: input.to_string(),
            reason: reason.to_string(),
        };
        let body = input
            .strip_prefix(MVN_URL_PREFIX)
            .ok_or_else(|| invalid("missing 'mvn:' prefix"))?;
        let parts: Vec<&str> = body.split('/').collect();

        match parts.as_slice() {
            [group, artifact, version] => Self::new(*group, *artifact, *version, None, None),
            [group, artifact, version, kind] => {
                Self::new(*group, *artifact, *version, None, Some(*kind))
            }
            [group, artifact, version, kind, classifier] => {
                Self::new(*group, *artifact, *version, Some(*classifier), Some(*kind))
            }
            _ => Err(invalid("expected 3 to 5 slash separated parts")),
        }
        .map_err(|e| match e {
            BuilderError::InvalidArtifactId { reason, .. } => invalid(&reason),
            other => other,
        })
    }

    #[must_use]
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    #[must_use]
    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    #[must_use]
    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// Same coordinates with a different version.
    #[must_use]
    pub fn change_version(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..self.clone()
        }
    }

    /// Whether `other` names the same artifact, ignoring the version.
    ///
    /// This is the identity used when two features contribute a version of the
    /// same artifact and a merge algorithm has to pick one.
    #[must_use]
    pub fn is_same(&self, other: &ArtifactId) -> bool {
        self.group_id == other.group_id
            && self.artifact_id == other.artifact_id
            && self.artifact_type == other.artifact_type
            && self.classifier == other.classifier
    }

    /// Render as `group:artifact[:type[:classifier]]:version`.
    #[must_use]
    pub fn to_mvn_id(&self) -> String {
        let mut id = format!("{}:{}", self.group_id, self.artifact_id);
        if self.classifier.is_some() || self.artifact_type != DEFAULT_TYPE {
            id.push(':');
            id.push_str(&self.artifact_type);
            if let Some(classifier) = &self.classifier {
                id.push(':');
                id.push_str(classifier);
            }
        }
        id.push(':');
        id.push_str(&self.version);
        id
    }

    /// Render as `mvn:group/artifact/version[/type[/classifier]]`.
    #[must_use]
    pub fn to_mvn_url(&self) -> String {
        let mut url = format!(
            "{MVN_URL_PREFIX}{}/{}/{}",
            self.group_id, self.artifact_id, self.version
        );
        if self.classifier.is_some() || self.artifact_type != DEFAULT_TYPE {
            url.push('/');
            url.push_str(&self.artifact_type);
            if let Some(classifier) = &self.classifier {
                url.push('/');
                url.push_str(classifier);
            }
        }
        url
    }

    /// Repository-relative path of the artifact file.
    #[must_use]
    pub fn to_mvn_path(&self) -> String {
        let file_name = match &self.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, classifier, self.artifact_type
            ),
            None => format!("{}-{}.{}", self.artifact_id, self.version, self.artifact_type),
        };
        format!(
            "{}/{}/{}/{}",
            self.group_id.replace('.', "/"),
            self.artifact_id,
            self.version,
            file_name
        )
    }
}

impl FromStr for ArtifactId {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(MVN_URL_PREFIX) {
            Self::from_mvn_url(s)
        } else {
            Self::from_mvn_id(s)
        }
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = BuilderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_mvn_id()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_mvn_id())
    }
}
