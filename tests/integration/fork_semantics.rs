use std::sync::Arc;

use feature_builder::builder::{
    ArtifactMergeAlgorithm, ArtifactProvider, BuilderContext, ConfigurationPropagation,
    FeatureProvider, MergeHandler, MergePhase, MergeSource, PostProcessHandler,
};
use feature_builder::models::KeyValueMap;
use feature_builder::test_utils::{
    InMemoryFeatureProvider, RecordingMergeHandler, RecordingPostProcessor,
    RepositoryArtifactProvider, fixtures, init_test_logging,
};

fn populated_context(policy: ConfigurationPropagation) -> BuilderContext {
    BuilderContext::builder()
        .feature_provider(
            InMemoryFeatureProvider::new().with_feature(fixtures::feature("org.example:outer:1")),
        )
        .artifact_provider(RepositoryArtifactProvider::new("https://repo.example.org"))
        .add_variables_overwrites(&KeyValueMap::from([("env", "prod")]))
        .add_framework_properties_overwrites(&KeyValueMap::from([(
            "org.osgi.service.http.port",
            "8080",
        )]))
        .add_merge_handlers([
            Arc::new(RecordingMergeHandler::new("repoinit", &["repoinit"]))
                as Arc<dyn MergeHandler>,
            Arc::new(RecordingMergeHandler::new("content", &["content-packages"]))
                as Arc<dyn MergeHandler>,
        ])
        .add_post_process_handlers([
            Arc::new(RecordingPostProcessor::new("check")) as Arc<dyn PostProcessHandler>
        ])
        .handler_configuration("launchpad", KeyValueMap::from([("mode", "strict")]))
        .merge_algorithm(ArtifactMergeAlgorithm::Latest)
        .configuration_propagation(policy)
        .build()
        .unwrap()
}

/// A fork resolves through the new provider and carries everything else
#[test]
fn test_fork_carries_state() {
    init_test_logging(None);

    let original = populated_context(ConfigurationPropagation::Reset);
    let inner = Arc::new(
        InMemoryFeatureProvider::new().with_feature(fixtures::feature("org.example:inner:1")),
    );
    let fork = original.fork(inner.clone());

    let inner_id = fixtures::artifact("org.example:inner:1");
    let outer_id = fixtures::artifact("org.example:outer:1");
    assert!(fork.feature_provider().provide(&inner_id).is_some());
    assert!(fork.feature_provider().provide(&outer_id).is_none());
    assert!(original.feature_provider().provide(&outer_id).is_some());
    assert_eq!(inner.requests(), vec![inner_id, outer_id]);

    assert!(Arc::ptr_eq(
        fork.artifact_provider().unwrap(),
        original.artifact_provider().unwrap()
    ));
    assert_eq!(fork.variables_overwrites(), original.variables_overwrites());
    assert_eq!(
        fork.framework_properties_overwrites(),
        original.framework_properties_overwrites()
    );
    assert_eq!(fork.merge_algorithm(), ArtifactMergeAlgorithm::Latest);
    assert_eq!(fork.configuration_propagation(), ConfigurationPropagation::Reset);
}

/// A fork shares the handler instances in the same order
#[test]
fn test_fork_shares_handlers() {
    let original = populated_context(ConfigurationPropagation::Reset);
    let fork = original.fork(Arc::new(InMemoryFeatureProvider::new()));

    assert_eq!(
        fork.merge_handlers().names().collect::<Vec<_>>(),
        vec!["repoinit", "content"]
    );
    for name in ["repoinit", "content"] {
        assert!(Arc::ptr_eq(
            fork.merge_handlers().find(name).unwrap(),
            original.merge_handlers().find(name).unwrap()
        ));
    }
    assert!(Arc::ptr_eq(
        fork.post_process_handlers().find("check").unwrap(),
        original.post_process_handlers().find("check").unwrap()
    ));
}

/// Under the default policy a fork starts without handler configuration
#[test]
fn test_fork_resets_handler_configuration() {
    let original = populated_context(ConfigurationPropagation::Reset);
    let fork = original.fork(Arc::new(InMemoryFeatureProvider::new()));

    assert!(fork.handler_configurations().is_empty());
    assert!(
        fork.handler_context("launchpad", MergePhase::initial())
            .configuration()
            .is_empty()
    );
    assert_eq!(
        original.handler_configuration("launchpad").unwrap().get("mode"),
        Some("strict")
    );
}

/// Opting into carry copies every configuration block, including into
/// forks of forks
#[test]
fn test_fork_carries_handler_configuration_on_request() {
    let original = populated_context(ConfigurationPropagation::Carry);
    let fork = original.fork(Arc::new(InMemoryFeatureProvider::new()));
    let nested = fork.fork(Arc::new(InMemoryFeatureProvider::new()));

    assert_eq!(fork.handler_configurations(), original.handler_configurations());
    assert_eq!(
        nested
            .handler_context("launchpad", MergePhase::subsequent())
            .configuration()
            .get("mode"),
        Some("strict")
    );
}

/// Layering onto a derived builder leaves the original untouched
#[test]
fn test_derive_is_independent() {
    let original = populated_context(ConfigurationPropagation::Reset);
    let derived = original
        .derive()
        .feature_provider(InMemoryFeatureProvider::new())
        .add_variables_overwrites(&KeyValueMap::from([("env", "stage"), ("region", "eu")]))
        .add_merge_handlers([
            Arc::new(RecordingMergeHandler::new("extra", &["extra"])) as Arc<dyn MergeHandler>
        ])
        .handler_configuration("repoinit", KeyValueMap::from([("separator", ";")]))
        .merge_algorithm(ArtifactMergeAlgorithm::Highest)
        .build()
        .unwrap();

    assert_eq!(
        derived.variables_overwrites(),
        &KeyValueMap::from([("env", "stage"), ("region", "eu")])
    );
    assert_eq!(derived.merge_handlers().len(), 3);
    assert_eq!(derived.merge_algorithm(), ArtifactMergeAlgorithm::Highest);

    assert_eq!(original.variables_overwrites(), &KeyValueMap::from([("env", "prod")]));
    assert_eq!(original.merge_handlers().len(), 2);
    assert!(original.handler_configuration("repoinit").is_none());
    assert_eq!(original.merge_algorithm(), ArtifactMergeAlgorithm::Latest);
}

/// A fork made without an artifact provider stays without one
#[test]
fn test_fork_without_artifact_provider() {
    let original = BuilderContext::builder()
        .feature_provider(InMemoryFeatureProvider::new())
        .build()
        .unwrap();
    let fork = original.fork(Arc::new(InMemoryFeatureProvider::new()));

    assert!(fork.artifact_provider().is_none());
    assert!(
        fork.handler_context("any", MergePhase::initial())
            .artifact_provider()
            .is_none()
    );
}

/// The carried artifact provider still resolves inside the fork
#[test]
fn test_fork_artifact_provider_resolves() {
    let bundle = fixtures::artifact("org.example:bundle:1.0");
    let original = BuilderContext::builder()
        .feature_provider(InMemoryFeatureProvider::new())
        .artifact_provider(
            RepositoryArtifactProvider::new("file:///repo").with_artifact(bundle.clone()),
        )
        .build()
        .unwrap();

    let fork = original.fork(Arc::new(InMemoryFeatureProvider::new()));
    assert_eq!(
        fork.artifact_provider().unwrap().provide(&bundle).as_deref(),
        Some("file:///repo/org/example/bundle/1.0/bundle-1.0.jar")
    );
}
