//! Error handling for the feature builder
//!
//! The builder validates very little on its own: constructing a context without
//! a feature provider is the only eager check. Everything else either parses
//! caller-supplied text (artifact coordinates, merge algorithm names, settings
//! documents) or is owned by an external collaborator whose failures propagate
//! untouched as [`anyhow::Error`].
//!
//! # Architecture
//!
//! - [`BuilderError`] - Enumerated failures raised by this crate
//! - [`ErrorContext`] - Wrapper that adds user-friendly details and suggestions
//! - [`user_friendly_error`] - Converts any [`anyhow::Error`] into an [`ErrorContext`]
//!
//! # Examples
//!
//! ```rust,no_run
//! use feature_builder::core::{BuilderError, user_friendly_error};
//!
//! let err = anyhow::Error::from(BuilderError::MissingFeatureProvider);
//! let ctx = user_friendly_error(err);
//! ctx.display(); // Shows colored error with suggestion
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Failures raised by the feature builder itself.
///
/// Handler and provider failures are not represented here: they are returned
/// by the collaborators as [`anyhow::Error`] and reach the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// A context was requested without the mandatory feature provider.
    ///
    /// Every merge needs to resolve included features, so the feature provider
    /// is the one collaborator a context cannot exist without.
    #[error("Feature provider must not be missing")]
    MissingFeatureProvider,

    /// Artifact coordinates could not be parsed.
    #[error("Invalid artifact id '{input}': {reason}")]
    InvalidArtifactId {
        /// The text that failed to parse
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// An unknown artifact merge algorithm name.
    #[error("Unknown artifact merge algorithm '{value}'")]
    InvalidMergeAlgorithm {
        /// The rejected name
        value: String,
    },

    /// An unknown handler configuration propagation policy name.
    #[error("Unknown configuration propagation policy '{value}'")]
    InvalidPropagationPolicy {
        /// The rejected name
        value: String,
    },

    /// A builder settings document could not be parsed.
    #[error("Failed to parse builder settings: {reason}")]
    ConfigParse {
        /// Parser diagnostic
        reason: String,
    },
}

/// A [`BuilderError`] paired with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying builder error, if the failure originated here
    pub error: Option<BuilderError>,
    /// Rendered message of the original error
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`BuilderError`].
    #[must_use]
    pub fn new(error: BuilderError) -> Self {
        let message = error.to_string();
        Self {
            error: Some(error),
            message,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with actionable suggestions.
///
/// Errors that downcast to [`BuilderError`] receive tailored guidance.
/// Anything else (for example a failing handler) is passed through with its
/// full cause chain as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(builder_error) = error.downcast_ref::<BuilderError>() {
        return create_error_context(builder_error.clone());
    }

    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    let mut ctx = ErrorContext {
        error: None,
        message: error.to_string(),
        suggestion: None,
        details: None,
    };
    if !chain.is_empty() {
        ctx = ctx.with_details(format!("Caused by: {}", chain.join(": ")));
    }
    ctx
}

fn create_error_context(error: BuilderError) -> ErrorContext {
    let (suggestion, details) = match &error {
        BuilderError::MissingFeatureProvider => (
            "Pass a feature provider to the builder before calling build()",
            Some("Included features cannot be resolved without a feature provider"),
        ),
        BuilderError::InvalidArtifactId { .. } => (
            "Use 'group:artifact[:type[:classifier]]:version' or 'mvn:group/artifact/version[/type[/classifier]]'",
            None,
        ),
        BuilderError::InvalidMergeAlgorithm { .. } => {
            ("Valid merge algorithms are 'highest' and 'latest'", None)
        }
        BuilderError::InvalidPropagationPolicy { .. } => {
            ("Valid propagation policies are 'reset' and 'carry'", None)
        }
        BuilderError::ConfigParse { .. } => (
            "Check the TOML syntax of the builder settings, then look for unknown keys or non-string values",
            Some(
                "Known keys: merge-algorithm, configuration-propagation, [variables], [framework-properties], [handlers.<name>]",
            ),
        ),
    };

    let ctx = ErrorContext::new(error).with_suggestion(suggestion);
    match details {
        Some(details) => ctx.with_details(details),
        None => ctx,
    }
}
