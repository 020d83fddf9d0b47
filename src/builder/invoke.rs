//! Handler invocation.
//!
//! The merge engine calls these for every extension it processes. Each call
//! builds a fresh [`HandlerContext`](super::HandlerContext) from the current
//! [`MergeSource`] plus the phase flags and hands it to exactly one handler
//! invocation. Handler failures are returned to the caller unchanged; there
//! is no retry at this layer.

use anyhow::Result;
use tracing::{debug, trace};

use super::context::MergeSource;
use super::handler::MergePhase;
use crate::models::{Extension, Feature};

/// Merge `extension` from `source` into `target` with the first registered
/// merge handler that claims it.
///
/// Returns `Ok(true)` when a handler merged the extension and `Ok(false)`
/// when no registered handler can merge it, in which case the engine applies
/// its default extension merge.
///
/// # Errors
///
/// Whatever the claiming handler returns.
pub fn merge_extension<S>(
    context: &S,
    phase: MergePhase,
    target: &mut Feature,
    source: &Feature,
    extension: &Extension,
) -> Result<bool>
where
    S: MergeSource + ?Sized,
{
    let Some((name, handler)) = context
        .merge_handlers()
        .iter()
        .find(|(_, handler)| handler.can_merge(extension))
    else {
        trace!(extension = %extension.name, "No merge handler claimed extension");
        return Ok(false);
    };

    debug!(
        handler = name,
        extension = %extension.name,
        source = %source.id,
        target = %target.id,
        prototype = phase.is_prototype(),
        initial = phase.is_initial(),
        "Invoking merge handler"
    );

    let handler_context = context.handler_context(name, phase);
    handler.merge(&handler_context, target, source, extension)?;
    Ok(true)
}

/// Run every registered post-process handler, in registration order, over
/// each extension of `feature`.
///
/// The extensions are snapshotted before the first handler runs, so handlers
/// may add or rewrite extensions without affecting which ones are visited.
///
/// # Errors
///
/// The first handler error aborts the pass and is returned unchanged.
pub fn post_process<S>(context: &S, phase: MergePhase, feature: &mut Feature) -> Result<()>
where
    S: MergeSource + ?Sized,
{
    let handlers = context.post_process_handlers();
    if handlers.is_empty() {
        return Ok(());
    }

    let extensions = feature.extensions.clone();
    for extension in &extensions {
        for (name, handler) in handlers.iter() {
            debug!(
                handler = name,
                extension = %extension.name,
                feature = %feature.id,
                prototype = phase.is_prototype(),
                initial = phase.is_initial(),
                "Invoking post-process handler"
            );
            let handler_context = context.handler_context(name, phase);
            handler.post_process(&handler_context, feature, extension)?;
        }
    }
    Ok(())
}
