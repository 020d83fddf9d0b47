//! Extension handlers and the per-invocation context they receive.
//!
//! Extensions are named blocks of content the builder itself does not
//! understand. Callers register [`MergeHandler`]s, which combine an
//! extension from the feature being merged with what the result already
//! holds, and [`PostProcessHandler`]s, which run after a feature's
//! contribution is in place. Registration order is invocation order.
//!
//! Every invocation gets a fresh [`HandlerContext`]: the artifact provider,
//! the configuration block registered under the handler's name, and the
//! [`MergePhase`] flags of the current merge step. The context borrows from
//! the builder context and is dropped when the invocation returns.

use std::fmt;
use std::sync::Arc;

use super::provider::ArtifactProvider;
use crate::models::{Extension, Feature, KeyValueMap};

static EMPTY_CONFIGURATION: KeyValueMap = KeyValueMap::new();

/// Where in the merge a handler is being invoked.
///
/// `prototype` is set only while a prototype's content is folded into the
/// feature that names it as its prototype. `initial` is set only for the
/// first feature contributing to an empty result, which lets handlers tell
/// "create" from "merge into existing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergePhase {
    prototype: bool,
    initial: bool,
}

impl MergePhase {
    /// First feature merged into an empty result.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            prototype: false,
            initial: true,
        }
    }

    /// A feature merged into an already populated result.
    #[must_use]
    pub const fn subsequent() -> Self {
        Self {
            prototype: false,
            initial: false,
        }
    }

    /// Folding a prototype into the feature that references it.
    #[must_use]
    pub const fn prototype(initial: bool) -> Self {
        Self {
            prototype: true,
            initial,
        }
    }

    #[must_use]
    pub const fn is_prototype(&self) -> bool {
        self.prototype
    }

    #[must_use]
    pub const fn is_initial(&self) -> bool {
        self.initial
    }
}

/// Read-only view handed to a single handler invocation.
#[derive(Clone, Copy)]
pub struct HandlerContext<'a> {
    artifact_provider: Option<&'a dyn ArtifactProvider>,
    configuration: &'a KeyValueMap,
    phase: MergePhase,
}

impl<'a> HandlerContext<'a> {
    /// Assemble a context. A missing configuration block becomes an empty map.
    #[must_use]
    pub fn new(
        artifact_provider: Option<&'a dyn ArtifactProvider>,
        configuration: Option<&'a KeyValueMap>,
        phase: MergePhase,
    ) -> Self {
        Self {
            artifact_provider,
            configuration: configuration.unwrap_or(&EMPTY_CONFIGURATION),
            phase,
        }
    }

    /// The artifact provider, if artifact resolution is available.
    #[must_use]
    pub fn artifact_provider(&self) -> Option<&'a dyn ArtifactProvider> {
        self.artifact_provider
    }

    /// Configuration registered for this handler; empty when none was set.
    #[must_use]
    pub fn configuration(&self) -> &'a KeyValueMap {
        self.configuration
    }

    #[must_use]
    pub fn is_prototype_merge(&self) -> bool {
        self.phase.is_prototype()
    }

    #[must_use]
    pub fn is_initial_merge(&self) -> bool {
        self.phase.is_initial()
    }

    #[must_use]
    pub fn phase(&self) -> MergePhase {
        self.phase
    }
}

impl fmt::Debug for HandlerContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerContext")
            .field("artifact_provider", &self.artifact_provider.is_some())
            .field("configuration", &self.configuration)
            .field("phase", &self.phase)
            .finish()
    }
}

/// Common identity of every handler.
pub trait Handler: Send + Sync {
    /// Name the handler's configuration block is registered under.
    fn name(&self) -> &str;
}

/// Merges one kind of extension from a source feature into the target.
pub trait MergeHandler: Handler {
    /// Whether this handler takes responsibility for `extension`.
    fn can_merge(&self, extension: &Extension) -> bool;

    /// Merge `extension` (taken from `source`) into `target`.
    ///
    /// The handler owns the target's extension of the same name: it creates it
    /// on an initial merge and combines into it otherwise.
    fn merge(
        &self,
        context: &HandlerContext<'_>,
        target: &mut Feature,
        source: &Feature,
        extension: &Extension,
    ) -> anyhow::Result<()>;
}

/// Validates or derives content after a feature's contribution is merged.
pub trait PostProcessHandler: Handler {
    fn post_process(
        &self,
        context: &HandlerContext<'_>,
        feature: &mut Feature,
        extension: &Extension,
    ) -> anyhow::Result<()>;
}

/// Ordered list of `(name, handler)` registrations.
///
/// Duplicates are allowed and kept in insertion order. Cloning the registry
/// shares the handler instances.
pub struct HandlerRegistry<H: ?Sized> {
    entries: Vec<(String, Arc<H>)>,
}

impl<H: ?Sized + Handler> HandlerRegistry<H> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a handler under its own name.
    pub fn push(&mut self, handler: Arc<H>) {
        let name = handler.name().to_string();
        self.entries.push((name, handler));
    }

    /// Append a handler under an explicit name.
    pub fn register(&mut self, name: impl Into<String>, handler: Arc<H>) {
        self.entries.push((name.into(), handler));
    }

    /// First handler registered under `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Arc<H>> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, h)| h)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<H>)> {
        self.entries.iter().map(|(n, h)| (n.as_str(), h))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: ?Sized + Handler> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ?Sized> Clone for HandlerRegistry<H> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<H: ?Sized> fmt::Debug for HandlerRegistry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(n, _)| n))
            .finish()
    }
}
