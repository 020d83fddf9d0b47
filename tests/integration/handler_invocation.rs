use std::sync::Arc;

use feature_builder::builder::invoke::{merge_extension, post_process};
use feature_builder::builder::{BuilderContext, MergeHandler, MergePhase, PostProcessHandler};
use feature_builder::models::{Extension, ExtensionType, KeyValueMap};
use feature_builder::test_utils::{
    FailingHandler, InMemoryFeatureProvider, InvocationLog, RecordingMergeHandler,
    RecordingPostProcessor, RepositoryArtifactProvider, fixtures, init_test_logging,
};

/// Merging two features through one handler: the first call is initial,
/// the second is not, and both see the handler's configuration
#[test]
fn test_merge_sequence_phases() {
    init_test_logging(None);

    let repoinit = Arc::new(RecordingMergeHandler::new("repoinit", &["repoinit"]));
    let ctx = BuilderContext::builder()
        .feature_provider(InMemoryFeatureProvider::new())
        .add_merge_handlers([repoinit.clone() as Arc<dyn MergeHandler>])
        .handler_configuration("repoinit", KeyValueMap::from([("separator", "\n\n")]))
        .build()
        .unwrap();

    let first = fixtures::feature_with_text("org.example:a:1", "repoinit", "create path /a");
    let second = fixtures::feature_with_text("org.example:b:1", "repoinit", "create path /b");
    let mut result = fixtures::feature("org.example:result:1");

    let ext = first.extension("repoinit").unwrap();
    assert!(merge_extension(&ctx, MergePhase::initial(), &mut result, &first, ext).unwrap());
    let ext = second.extension("repoinit").unwrap();
    assert!(merge_extension(&ctx, MergePhase::subsequent(), &mut result, &second, ext).unwrap());

    assert_eq!(
        result.extension("repoinit").unwrap().text.as_deref(),
        Some("create path /a\n\ncreate path /b")
    );

    let calls = repoinit.invocations();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].initial && !calls[0].prototype);
    assert!(!calls[1].initial && !calls[1].prototype);
    assert_eq!(calls[0].feature, first.id);
    assert_eq!(calls[1].feature, second.id);
    for call in &calls {
        assert_eq!(call.configuration, KeyValueMap::from([("separator", "\n\n")]));
        assert!(!call.has_artifact_provider);
    }
}

/// Prototype folding is flagged on the handler context
#[test]
fn test_prototype_merge_flag() {
    let handler = Arc::new(RecordingMergeHandler::new("content", &["content-packages"]));
    let ctx = BuilderContext::builder()
        .feature_provider(InMemoryFeatureProvider::new())
        .artifact_provider(RepositoryArtifactProvider::new("https://repo.example.org"))
        .add_merge_handlers([handler.clone() as Arc<dyn MergeHandler>])
        .build()
        .unwrap();

    let prototype = fixtures::feature_with_artifacts(
        "org.example:proto:1",
        "content-packages",
        &["org.example:pkg-a:zip:1.0"],
    );
    let mut feature = fixtures::feature_with_artifacts(
        "org.example:child:1",
        "content-packages",
        &["org.example:pkg-b:zip:1.0"],
    );

    let ext = prototype.extension("content-packages").unwrap();
    merge_extension(&ctx, MergePhase::prototype(false), &mut feature, &prototype, ext).unwrap();

    let call = &handler.invocations()[0];
    assert!(call.prototype);
    assert!(!call.initial);
    assert!(call.has_artifact_provider);
    assert!(call.configuration.is_empty());
    assert_eq!(feature.extension("content-packages").unwrap().artifacts.len(), 2);
}

/// The first handler claiming an extension wins; others are not called
#[test]
fn test_first_claiming_handler_wins() {
    let log = InvocationLog::default();
    let first =
        Arc::new(RecordingMergeHandler::new("first", &["repoinit"]).with_log(log.clone()));
    let second =
        Arc::new(RecordingMergeHandler::new("second", &["repoinit"]).with_log(log.clone()));
    let ctx = BuilderContext::builder()
        .feature_provider(InMemoryFeatureProvider::new())
        .add_merge_handlers([first as Arc<dyn MergeHandler>, second as Arc<dyn MergeHandler>])
        .build()
        .unwrap();

    let source = fixtures::feature_with_text("org.example:a:1", "repoinit", "x");
    let mut target = fixtures::feature("org.example:result:1");
    let ext = source.extension("repoinit").unwrap();
    merge_extension(&ctx, MergePhase::initial(), &mut target, &source, ext).unwrap();

    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].handler, "first");
}

/// A handler failure surfaces unchanged to the caller
#[test]
fn test_merge_failure_propagates() {
    let ctx = BuilderContext::builder()
        .feature_provider(InMemoryFeatureProvider::new())
        .add_merge_handlers([
            Arc::new(FailingHandler::new("strict-check")) as Arc<dyn MergeHandler>
        ])
        .build()
        .unwrap();

    let source = fixtures::feature_with_text("org.example:a:1", "repoinit", "x");
    let mut target = fixtures::feature("org.example:result:1");
    let ext = source.extension("repoinit").unwrap();

    let err = merge_extension(&ctx, MergePhase::initial(), &mut target, &source, ext).unwrap_err();
    assert_eq!(
        err.to_string(),
        "strict-check rejected extension 'repoinit' of org.example:a:1"
    );
    assert!(target.extensions.is_empty());
}

/// Post-processors run in registration order for every extension, each with
/// its own configuration
#[test]
fn test_post_process_order_and_configuration() {
    let log = InvocationLog::default();
    let validate = Arc::new(RecordingPostProcessor::new("validate").with_log(log.clone()));
    let index = Arc::new(RecordingPostProcessor::new("index").with_log(log.clone()));
    let ctx = BuilderContext::builder()
        .feature_provider(InMemoryFeatureProvider::new())
        .add_post_process_handlers([
            validate as Arc<dyn PostProcessHandler>,
            index as Arc<dyn PostProcessHandler>,
        ])
        .handler_configuration("validate", KeyValueMap::from([("level", "error")]))
        .build()
        .unwrap();

    let mut feature = fixtures::feature_with_text("org.example:a:1", "repoinit", "x");
    feature
        .extensions
        .push(Extension::new("api-regions", ExtensionType::Json).with_text("[]"));

    post_process(&ctx, MergePhase::subsequent(), &mut feature).unwrap();

    let calls = log.lock().unwrap();
    let order: Vec<_> = calls
        .iter()
        .map(|c| (c.handler.as_str(), c.extension.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("validate", "repoinit"),
            ("index", "repoinit"),
            ("validate", "api-regions"),
            ("index", "api-regions"),
        ]
    );
    assert!(
        calls
            .iter()
            .filter(|c| c.handler == "validate")
            .all(|c| c.configuration.get("level") == Some("error"))
    );
    assert!(
        calls
            .iter()
            .filter(|c| c.handler == "index")
            .all(|c| c.configuration.is_empty())
    );
}

/// The first post-process failure aborts the pass
#[test]
fn test_post_process_failure_aborts() {
    let after = Arc::new(RecordingPostProcessor::new("after"));
    let ctx = BuilderContext::builder()
        .feature_provider(InMemoryFeatureProvider::new())
        .add_post_process_handlers([
            Arc::new(FailingHandler::new("gate")) as Arc<dyn PostProcessHandler>,
            after.clone() as Arc<dyn PostProcessHandler>,
        ])
        .build()
        .unwrap();

    let mut feature = fixtures::feature_with_text("org.example:a:1", "repoinit", "x");
    let err = post_process(&ctx, MergePhase::initial(), &mut feature).unwrap_err();

    assert!(err.to_string().contains("gate rejected extension 'repoinit'"));
    assert!(after.invocations().is_empty());
}

/// A feature without extensions never reaches a handler
#[test]
fn test_post_process_without_extensions() {
    let processor = Arc::new(RecordingPostProcessor::new("validate"));
    let ctx = BuilderContext::builder()
        .feature_provider(InMemoryFeatureProvider::new())
        .add_post_process_handlers([processor.clone() as Arc<dyn PostProcessHandler>])
        .build()
        .unwrap();

    let mut feature = fixtures::feature("org.example:empty:1");
    post_process(&ctx, MergePhase::initial(), &mut feature).unwrap();

    assert!(processor.invocations().is_empty());
}
