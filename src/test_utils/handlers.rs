//! Instrumented handlers.

use anyhow::{Result, bail};
use std::sync::{Arc, Mutex};

use crate::builder::{Handler, HandlerContext, MergeHandler, PostProcessHandler};
use crate::models::{ArtifactId, Extension, ExtensionType, Feature, KeyValueMap};

/// One handler call as the handler saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub handler: String,
    pub extension: String,
    /// The source feature for merges, the processed feature for post-processing
    pub feature: ArtifactId,
    pub prototype: bool,
    pub initial: bool,
    pub configuration: KeyValueMap,
    pub has_artifact_provider: bool,
}

/// Log shared between handlers so cross-handler order can be asserted.
pub type InvocationLog = Arc<Mutex<Vec<Invocation>>>;

fn record(
    log: &InvocationLog,
    handler: &str,
    context: &HandlerContext<'_>,
    feature: &Feature,
    extension: &Extension,
) {
    log.lock().unwrap().push(Invocation {
        handler: handler.to_string(),
        extension: extension.name.clone(),
        feature: feature.id.clone(),
        prototype: context.is_prototype_merge(),
        initial: context.is_initial_merge(),
        configuration: context.configuration().clone(),
        has_artifact_provider: context.artifact_provider().is_some(),
    });
}

/// Merge handler that claims extensions by name and records each call.
///
/// Text payloads are joined with the configured `separator` (newline by
/// default), artifact lists are concatenated without duplicates, and JSON
/// payloads are replaced by the latest contribution.
#[derive(Debug)]
pub struct RecordingMergeHandler {
    name: String,
    extensions: Vec<String>,
    log: InvocationLog,
}

impl RecordingMergeHandler {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| (*e).to_string()).collect(),
            log: InvocationLog::default(),
        }
    }

    /// Record into `log` instead of a private one.
    pub fn with_log(mut self, log: InvocationLog) -> Self {
        self.log = log;
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.log.lock().unwrap().clone()
    }
}

impl Handler for RecordingMergeHandler {
    fn name(&self) -> &str {
        &self.name
    }
}

impl MergeHandler for RecordingMergeHandler {
    fn can_merge(&self, extension: &Extension) -> bool {
        self.extensions.contains(&extension.name)
    }

    fn merge(
        &self,
        context: &HandlerContext<'_>,
        target: &mut Feature,
        source: &Feature,
        extension: &Extension,
    ) -> Result<()> {
        record(&self.log, &self.name, context, source, extension);

        let existing = if context.is_initial_merge() {
            None
        } else {
            target.extension_mut(&extension.name)
        };
        let Some(existing) = existing else {
            target.extensions.retain(|e| e.name != extension.name);
            target.extensions.push(extension.clone());
            return Ok(());
        };

        match extension.extension_type {
            ExtensionType::Text => {
                let separator = context.configuration().get("separator").unwrap_or("\n");
                let text = existing.text.get_or_insert_with(String::new);
                if !text.is_empty() {
                    text.push_str(separator);
                }
                text.push_str(extension.text.as_deref().unwrap_or_default());
            }
            ExtensionType::Json => existing.text = extension.text.clone(),
            ExtensionType::Artifacts => {
                for artifact in &extension.artifacts {
                    if !existing.artifacts.contains(artifact) {
                        existing.artifacts.push(artifact.clone());
                    }
                }
            }
        }
        Ok(())
    }
}

/// Post-process handler that only records what it was shown.
#[derive(Debug)]
pub struct RecordingPostProcessor {
    name: String,
    log: InvocationLog,
}

impl RecordingPostProcessor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: InvocationLog::default(),
        }
    }

    pub fn with_log(mut self, log: InvocationLog) -> Self {
        self.log = log;
        self
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.log.lock().unwrap().clone()
    }
}

impl Handler for RecordingPostProcessor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl PostProcessHandler for RecordingPostProcessor {
    fn post_process(
        &self,
        context: &HandlerContext<'_>,
        feature: &mut Feature,
        extension: &Extension,
    ) -> Result<()> {
        record(&self.log, &self.name, context, feature, extension);
        Ok(())
    }
}

/// Handler that claims everything and fails every call.
#[derive(Debug)]
pub struct FailingHandler {
    name: String,
}

impl FailingHandler {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Handler for FailingHandler {
    fn name(&self) -> &str {
        &self.name
    }
}

impl MergeHandler for FailingHandler {
    fn can_merge(&self, _extension: &Extension) -> bool {
        true
    }

    fn merge(
        &self,
        _context: &HandlerContext<'_>,
        _target: &mut Feature,
        source: &Feature,
        extension: &Extension,
    ) -> Result<()> {
        bail!("{} rejected extension '{}' of {}", self.name, extension.name, source.id)
    }
}

impl PostProcessHandler for FailingHandler {
    fn post_process(
        &self,
        _context: &HandlerContext<'_>,
        feature: &mut Feature,
        extension: &Extension,
    ) -> Result<()> {
        bail!("{} rejected extension '{}' of {}", self.name, extension.name, feature.id)
    }
}
