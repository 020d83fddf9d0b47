//! The merge context and its builder.
//!
//! A [`BuilderContext`] collects everything the merge engine needs before a
//! merge starts: the feature provider (mandatory), the artifact provider
//! (optional), variable and framework-property overwrites, the ordered
//! handler registries, per-handler configuration blocks and the artifact
//! version-conflict policy.
//!
//! The value has two faces:
//!
//! - [`BuilderContextBuilder`] is the assembly-time surface used by the caller.
//! - [`MergeSource`] is the read-only surface the merge engine consumes.
//!
//! Once built, a context is never mutated. Recursive inclusion resolves nested
//! features through a different feature provider; [`BuilderContext::fork`]
//! produces that derived context, carrying overwrites, handlers and the merge
//! algorithm forward.
//!
//! # Examples
//!
//! ```rust
//! use feature_builder::builder::{ArtifactMergeAlgorithm, BuilderContext, MergePhase, MergeSource};
//! use feature_builder::models::{ArtifactId, Feature, KeyValueMap};
//!
//! # fn example() -> Result<(), feature_builder::core::BuilderError> {
//! let ctx = BuilderContext::builder()
//!     .feature_provider(|id: &ArtifactId| Some(Feature::new(id.clone())))
//!     .add_variables_overwrites(&KeyValueMap::from([("port", "8080")]))
//!     .handler_configuration("launchpad", KeyValueMap::from([("mode", "strict")]))
//!     .merge_algorithm(ArtifactMergeAlgorithm::Latest)
//!     .build()?;
//!
//! let handler_ctx = ctx.handler_context("launchpad", MergePhase::initial());
//! assert_eq!(handler_ctx.configuration().get("mode"), Some("strict"));
//! assert!(handler_ctx.is_initial_merge());
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use super::algorithm::ArtifactMergeAlgorithm;
use super::handler::{
    HandlerContext, HandlerRegistry, MergeHandler, MergePhase, PostProcessHandler,
};
use super::provider::{ArtifactProvider, FeatureProvider};
use crate::core::BuilderError;
use crate::models::KeyValueMap;

/// Whether [`BuilderContext::fork`] carries handler configuration blocks.
///
/// Configuration is scoped to the handler and the invocation, not to context
/// propagation, so the default [`Reset`](Self::Reset) leaves a fork without
/// any blocks. Callers that want nested merges to see the same
/// configuration either re-apply it or opt into [`Carry`](Self::Carry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConfigurationPropagation {
    /// Forks start with no handler configuration
    #[default]
    Reset,
    /// Forks copy every handler configuration block
    Carry,
}

impl ConfigurationPropagation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::Carry => "carry",
        }
    }
}

impl FromStr for ConfigurationPropagation {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reset" => Ok(Self::Reset),
            "carry" => Ok(Self::Carry),
            _ => Err(BuilderError::InvalidPropagationPolicy {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ConfigurationPropagation {
    type Error = BuilderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConfigurationPropagation> for String {
    fn from(policy: ConfigurationPropagation) -> Self {
        policy.as_str().to_string()
    }
}

impl fmt::Display for ConfigurationPropagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only access to a merge context, as consumed by the merge engine.
///
/// The provided methods build on the required accessors, so any type that
/// exposes the collaborators gets the handler invocation contract for free.
pub trait MergeSource {
    fn feature_provider(&self) -> &Arc<dyn FeatureProvider>;

    fn artifact_provider(&self) -> Option<&Arc<dyn ArtifactProvider>>;

    /// Configuration blocks keyed by handler name.
    fn handler_configurations(&self) -> &HashMap<String, KeyValueMap>;

    fn variables_overwrites(&self) -> &KeyValueMap;

    fn framework_properties_overwrites(&self) -> &KeyValueMap;

    fn merge_handlers(&self) -> &HandlerRegistry<dyn MergeHandler>;

    fn post_process_handlers(&self) -> &HandlerRegistry<dyn PostProcessHandler>;

    fn merge_algorithm(&self) -> ArtifactMergeAlgorithm;

    fn handler_configuration(&self, name: &str) -> Option<&KeyValueMap> {
        self.handler_configurations().get(name)
    }

    /// Build the context for one invocation of the handler named `name`.
    ///
    /// The configuration block is looked up once, here. A handler without a
    /// registered block sees an empty map.
    fn handler_context(&self, name: &str, phase: MergePhase) -> HandlerContext<'_> {
        HandlerContext::new(
            self.artifact_provider().map(|p| &**p),
            self.handler_configuration(name),
            phase,
        )
    }
}

/// Everything the merge engine needs, fixed for the duration of a merge.
///
/// Not meant for concurrent mutation: it is assembled on one thread by
/// [`BuilderContextBuilder`] and only read (or forked) afterwards.
#[derive(Clone)]
pub struct BuilderContext {
    feature_provider: Arc<dyn FeatureProvider>,
    artifact_provider: Option<Arc<dyn ArtifactProvider>>,
    handler_configurations: HashMap<String, KeyValueMap>,
    merge_handlers: HandlerRegistry<dyn MergeHandler>,
    post_process_handlers: HandlerRegistry<dyn PostProcessHandler>,
    variables_overwrites: KeyValueMap,
    framework_properties_overwrites: KeyValueMap,
    merge_algorithm: ArtifactMergeAlgorithm,
    configuration_propagation: ConfigurationPropagation,
}

impl BuilderContext {
    /// Create a context with empty registries and maps.
    ///
    /// # Errors
    ///
    /// [`BuilderError::MissingFeatureProvider`] when `provider` is `None`.
    pub fn new(provider: Option<Arc<dyn FeatureProvider>>) -> Result<Self, BuilderError> {
        let mut builder = BuilderContextBuilder::new();
        builder.feature_provider = provider;
        builder.build()
    }

    /// Start assembling a context.
    #[must_use]
    pub fn builder() -> BuilderContextBuilder {
        BuilderContextBuilder::new()
    }

    #[must_use]
    pub fn configuration_propagation(&self) -> ConfigurationPropagation {
        self.configuration_propagation
    }

    /// Derive a context for nested features resolved by `feature_provider`.
    ///
    /// Carried over: the artifact provider (same instance), copies of both
    /// overwrite maps, the handler registries (same handler instances, same
    /// order), the merge algorithm and the propagation policy. Handler
    /// configuration blocks are carried only under
    /// [`ConfigurationPropagation::Carry`].
    ///
    /// The fork is independent of `self` from then on.
    #[must_use]
    pub fn fork(&self, feature_provider: Arc<dyn FeatureProvider>) -> BuilderContext {
        self.derive().assemble(feature_provider)
    }

    /// Like [`fork`](Self::fork), but returns a builder seeded with the
    /// carried state so further overwrites or handlers can be layered on
    /// before the derived context is built.
    #[must_use]
    pub fn derive(&self) -> BuilderContextBuilder {
        let handler_configurations = match self.configuration_propagation {
            ConfigurationPropagation::Reset => HashMap::new(),
            ConfigurationPropagation::Carry => self.handler_configurations.clone(),
        };

        debug!(
            merge_handlers = self.merge_handlers.len(),
            post_process_handlers = self.post_process_handlers.len(),
            variables = self.variables_overwrites.len(),
            framework_properties = self.framework_properties_overwrites.len(),
            carried_configurations = handler_configurations.len(),
            algorithm = %self.merge_algorithm,
            "Deriving builder context"
        );

        BuilderContextBuilder {
            feature_provider: None,
            artifact_provider: self.artifact_provider.clone(),
            handler_configurations,
            merge_handlers: self.merge_handlers.clone(),
            post_process_handlers: self.post_process_handlers.clone(),
            variables_overwrites: self.variables_overwrites.clone(),
            framework_properties_overwrites: self.framework_properties_overwrites.clone(),
            merge_algorithm: self.merge_algorithm,
            configuration_propagation: self.configuration_propagation,
        }
    }
}

impl MergeSource for BuilderContext {
    fn feature_provider(&self) -> &Arc<dyn FeatureProvider> {
        &self.feature_provider
    }

    fn artifact_provider(&self) -> Option<&Arc<dyn ArtifactProvider>> {
        self.artifact_provider.as_ref()
    }

    fn handler_configurations(&self) -> &HashMap<String, KeyValueMap> {
        &self.handler_configurations
    }

    fn variables_overwrites(&self) -> &KeyValueMap {
        &self.variables_overwrites
    }

    fn framework_properties_overwrites(&self) -> &KeyValueMap {
        &self.framework_properties_overwrites
    }

    fn merge_handlers(&self) -> &HandlerRegistry<dyn MergeHandler> {
        &self.merge_handlers
    }

    fn post_process_handlers(&self) -> &HandlerRegistry<dyn PostProcessHandler> {
        &self.post_process_handlers
    }

    fn merge_algorithm(&self) -> ArtifactMergeAlgorithm {
        self.merge_algorithm
    }
}

impl fmt::Debug for BuilderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderContext")
            .field("artifact_provider", &self.artifact_provider.is_some())
            .field("handler_configurations", &self.handler_configurations)
            .field("merge_handlers", &self.merge_handlers)
            .field("post_process_handlers", &self.post_process_handlers)
            .field("variables_overwrites", &self.variables_overwrites)
            .field("framework_properties_overwrites", &self.framework_properties_overwrites)
            .field("merge_algorithm", &self.merge_algorithm)
            .field("configuration_propagation", &self.configuration_propagation)
            .finish_non_exhaustive()
    }
}

/// Fluent assembly of a [`BuilderContext`].
///
/// Every setter consumes and returns the builder. Only the feature provider
/// is required; [`build`](Self::build) fails without it.
pub struct BuilderContextBuilder {
    feature_provider: Option<Arc<dyn FeatureProvider>>,
    artifact_provider: Option<Arc<dyn ArtifactProvider>>,
    handler_configurations: HashMap<String, KeyValueMap>,
    merge_handlers: HandlerRegistry<dyn MergeHandler>,
    post_process_handlers: HandlerRegistry<dyn PostProcessHandler>,
    variables_overwrites: KeyValueMap,
    framework_properties_overwrites: KeyValueMap,
    merge_algorithm: ArtifactMergeAlgorithm,
    configuration_propagation: ConfigurationPropagation,
}

impl BuilderContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            feature_provider: None,
            artifact_provider: None,
            handler_configurations: HashMap::new(),
            merge_handlers: HandlerRegistry::new(),
            post_process_handlers: HandlerRegistry::new(),
            variables_overwrites: KeyValueMap::new(),
            framework_properties_overwrites: KeyValueMap::new(),
            merge_algorithm: ArtifactMergeAlgorithm::default(),
            configuration_propagation: ConfigurationPropagation::default(),
        }
    }

    /// Set the provider included features are resolved through.
    #[must_use]
    pub fn feature_provider(mut self, provider: impl FeatureProvider + 'static) -> Self {
        self.feature_provider = Some(Arc::new(provider));
        self
    }

    /// Set an already shared feature provider.
    #[must_use]
    pub fn shared_feature_provider(mut self, provider: Arc<dyn FeatureProvider>) -> Self {
        self.feature_provider = Some(provider);
        self
    }

    /// Set the provider artifact ids are resolved to locations through.
    #[must_use]
    pub fn artifact_provider(mut self, provider: impl ArtifactProvider + 'static) -> Self {
        self.artifact_provider = Some(Arc::new(provider));
        self
    }

    /// Set or clear a shared artifact provider.
    #[must_use]
    pub fn shared_artifact_provider(mut self, provider: Option<Arc<dyn ArtifactProvider>>) -> Self {
        self.artifact_provider = provider;
        self
    }

    /// Layer variable overwrites on top of the ones already added.
    #[must_use]
    pub fn add_variables_overwrites(mut self, vars: &KeyValueMap) -> Self {
        self.variables_overwrites.put_all(vars);
        self
    }

    /// Layer framework property overwrites on top of the ones already added.
    #[must_use]
    pub fn add_framework_properties_overwrites(mut self, props: &KeyValueMap) -> Self {
        self.framework_properties_overwrites.put_all(props);
        self
    }

    /// Append merge handlers; they are invoked in the order added.
    #[must_use]
    pub fn add_merge_handlers<I>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn MergeHandler>>,
    {
        for handler in handlers {
            debug!(handler = handler.name(), "Registering merge handler");
            self.merge_handlers.push(handler);
        }
        self
    }

    /// Append post-process handlers; they are invoked in the order added.
    #[must_use]
    pub fn add_post_process_handlers<I>(mut self, handlers: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn PostProcessHandler>>,
    {
        for handler in handlers {
            debug!(handler = handler.name(), "Registering post-process handler");
            self.post_process_handlers.push(handler);
        }
        self
    }

    #[must_use]
    pub fn merge_algorithm(mut self, algorithm: ArtifactMergeAlgorithm) -> Self {
        self.merge_algorithm = algorithm;
        self
    }

    /// Set the configuration block for the handler called `name`.
    ///
    /// Replaces any block previously set for that name; the two are not merged.
    #[must_use]
    pub fn handler_configuration(mut self, name: impl Into<String>, config: KeyValueMap) -> Self {
        self.handler_configurations.insert(name.into(), config);
        self
    }

    #[must_use]
    pub fn configuration_propagation(mut self, policy: ConfigurationPropagation) -> Self {
        self.configuration_propagation = policy;
        self
    }

    /// Finish assembly.
    ///
    /// # Errors
    ///
    /// [`BuilderError::MissingFeatureProvider`] if no feature provider was set.
    pub fn build(mut self) -> Result<BuilderContext, BuilderError> {
        let provider = self
            .feature_provider
            .take()
            .ok_or(BuilderError::MissingFeatureProvider)?;
        Ok(self.assemble(provider))
    }

    fn assemble(self, feature_provider: Arc<dyn FeatureProvider>) -> BuilderContext {
        BuilderContext {
            feature_provider,
            artifact_provider: self.artifact_provider,
            handler_configurations: self.handler_configurations,
            merge_handlers: self.merge_handlers,
            post_process_handlers: self.post_process_handlers,
            variables_overwrites: self.variables_overwrites,
            framework_properties_overwrites: self.framework_properties_overwrites,
            merge_algorithm: self.merge_algorithm,
            configuration_propagation: self.configuration_propagation,
        }
    }
}

impl Default for BuilderContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
