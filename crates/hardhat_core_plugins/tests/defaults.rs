//! Environments built from the default plugin groups.

use std::collections::HashMap;

use hardhat_core_plugins::{DefaultPlugins, MinimalPlugins, TracingPlugin};
use hardhat_hooks::HookError;
use hardhat_runtime::{PluginGroup, RuntimeEnvironment, RuntimeError};
use hardhat_tasks::{TaskArguments, TaskDefinition, TaskId};
use serde_json::json;

fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
        .collect()
}

#[tokio::test]
async fn default_plugins_declare_builtin_globals() {
    let hre = RuntimeEnvironment::builder()
        .add_plugins(DefaultPlugins.build())
        .env(raw(&[("HARDHAT_BUILD_PROFILE", "production")]))
        .user_arguments(raw(&[("logFormat", "compact")]))
        .build()
        .await
        .unwrap();

    let arguments = hre.global_arguments();
    assert_eq!(arguments.get_str("network"), Some("default"));
    assert_eq!(arguments.get_str("buildProfile"), Some("production"));
    assert_eq!(arguments.get_bool("verbose"), Some(false));
    assert_eq!(arguments.get_str("logFormat"), Some("compact"));
    assert_eq!(hre.plugin_ids(), ["hardhat:builtin-globals", TracingPlugin::ID]);
}

#[tokio::test]
async fn unknown_log_format_fails_the_build() {
    let err = RuntimeEnvironment::builder()
        .add_plugins(DefaultPlugins.build())
        .env(raw(&[("HARDHAT_LOG_FORMAT", "xml")]))
        .build()
        .await
        .unwrap_err();

    let source = match err {
        RuntimeError::Hook(HookError::Handler(source)) => source,
        other => panic!("expected a handler error, got {other:?}"),
    };
    assert!(source.to_string().contains("xml"));
}

#[tokio::test]
async fn environments_can_be_built_repeatedly() {
    for verbose in ["true", "false"] {
        let hre = RuntimeEnvironment::builder()
            .add_plugins(DefaultPlugins.build())
            .user_arguments(raw(&[("verbose", verbose)]))
            .build()
            .await
            .unwrap();
        assert_eq!(
            hre.global_arguments().get_bool("verbose"),
            Some(verbose == "true")
        );
    }
}

#[tokio::test]
async fn tasks_read_builtin_globals() {
    let hre = RuntimeEnvironment::builder()
        .add_plugins(MinimalPlugins.build())
        .user_arguments(raw(&[("network", "sepolia")]))
        .user_tasks([TaskDefinition::task(TaskId::parse("whereami").unwrap()).action(
            |_, context| async move {
                Ok(json!(context.global_arguments().get_str("network")))
            },
        )])
        .build()
        .await
        .unwrap();

    let network = hre
        .run_task(&TaskId::parse("whereami").unwrap(), TaskArguments::new())
        .await
        .unwrap();
    assert_eq!(network, json!("sepolia"));
}
