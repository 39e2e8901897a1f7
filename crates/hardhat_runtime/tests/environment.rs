//! End-to-end tests of runtime environment construction.

use std::collections::HashMap;
use std::sync::Arc;

use hardhat_config::{ConfigValidationError, UserConfig};
use hardhat_hooks::{HookRegistrar, HookResult, RequestInput};
use hardhat_params::{GlobalParameterSpec, ParameterError, ParameterType};
use hardhat_runtime::{
    Created, ExtendUserConfig, Plugin, PluginGroup, PluginGroupBuilder, RuntimeEnvironment,
    RuntimeError, ValidateUserConfig,
};
use hardhat_tasks::{TaskArguments, TaskDefinition, TaskError, TaskId};
use parking_lot::Mutex;
use serde_json::json;

fn id(path: &str) -> TaskId {
    TaskId::parse(path).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test plugins
// ─────────────────────────────────────────────────────────────────────────────

struct Network;

impl Plugin for Network {
    fn id(&self) -> &str {
        "network"
    }

    fn global_parameters(&self) -> Vec<GlobalParameterSpec> {
        vec![
            GlobalParameterSpec::new("network", "Network to connect to", "default"),
            GlobalParameterSpec::new("gasMultiplier", "Gas price multiplier", 1.0)
                .with_type(ParameterType::Float),
        ]
    }

    fn tasks(&self) -> Vec<TaskDefinition> {
        vec![
            TaskDefinition::task(id("network-name"))
                .description("Prints the selected network")
                .action(|_, context| async move {
                    Ok(json!(context.global_arguments().get_str("network")))
                }),
        ]
    }
}

/// Records the order in which `Created` handlers run.
struct Recorder {
    id: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl Plugin for Recorder {
    fn id(&self) -> &str {
        self.id
    }

    fn register_hooks(&self, hooks: &HookRegistrar<'_>) -> HookResult<()> {
        let log = Arc::clone(&self.log);
        let name = self.id;
        hooks.register::<Created, _>(move |context, hre| {
            let log = Arc::clone(&log);
            async move {
                assert!(context.same_as(hre.context()));
                log.lock().push(name.to_owned());
                Ok(())
            }
        })?;
        Ok(())
    }
}

/// Requires a `solidity` key and defaults `paths` when absent.
struct Compiler;

impl Plugin for Compiler {
    fn id(&self) -> &str {
        "compiler"
    }

    fn dependencies(&self) -> Vec<&str> {
        vec!["network"]
    }

    fn register_hooks(&self, hooks: &HookRegistrar<'_>) -> HookResult<()> {
        hooks
            .register_config_chain::<ExtendUserConfig, _>(|mut config, next| async move {
                if !config.contains("paths") {
                    config
                        .set("paths", json!({ "sources": "contracts" }))
                        .map_err(hardhat_hooks::HookError::handler)?;
                }
                next.run(config).await
            })?
            .register_config::<ValidateUserConfig, _>(|config| async move {
                Ok(match config.get_raw("solidity") {
                    Some(version) if version.is_string() => Vec::new(),
                    Some(_) => vec![ConfigValidationError::new(["solidity"], "must be a string")],
                    None => vec![ConfigValidationError::new(["solidity"], "is required")],
                })
            })?;
        Ok(())
    }

    fn tasks(&self) -> Vec<TaskDefinition> {
        vec![
            TaskDefinition::task(id("compile"))
                .flag("force", "Recompile everything")
                .action(|args, context| async move {
                    let version: Option<String> = context
                        .config()
                        .get("solidity")
                        .map_err(TaskError::action)?;
                    Ok(json!({
                        "version": version,
                        "force": args.get_bool("force"),
                    }))
                }),
        ]
    }
}

struct Toolbox;

impl PluginGroup for Toolbox {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::new().add(Compiler).add(Network)
    }
}

fn solidity_config() -> UserConfig {
    UserConfig::from_value(json!({ "solidity": "0.8.28" })).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Building
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn plugins_are_ordered_by_dependencies() {
    let hre = RuntimeEnvironment::builder()
        .add_plugins(Toolbox.build())
        .user_config(solidity_config())
        .env(HashMap::<String, String>::new())
        .build()
        .await
        .unwrap();

    assert_eq!(hre.plugin_ids(), ["network", "compiler"]);
    assert_eq!(hre.global_parameters().names(), vec!["network", "gasMultiplier"]);
    assert_eq!(
        hre.global_parameters()
            .get("gasMultiplier")
            .unwrap()
            .definition()
            .parameter_type(),
        ParameterType::Float
    );
}

#[tokio::test]
async fn global_arguments_prefer_user_then_env_then_default() {
    let env = HashMap::from([
        ("HARDHAT_NETWORK".to_owned(), "sepolia".to_owned()),
        ("HARDHAT_GAS_MULTIPLIER".to_owned(), "1.5".to_owned()),
    ]);

    let hre = RuntimeEnvironment::builder()
        .add_plugin(Network)
        .env(env.clone())
        .build()
        .await
        .unwrap();
    assert_eq!(hre.global_arguments().get_str("network"), Some("sepolia"));
    assert_eq!(hre.global_arguments().get_float("gasMultiplier"), Some(1.5));

    let hre = RuntimeEnvironment::builder()
        .add_plugin(Network)
        .env(env)
        .user_arguments(HashMap::from([("network".to_owned(), "mainnet".to_owned())]))
        .build()
        .await
        .unwrap();
    assert_eq!(hre.global_arguments().get_str("network"), Some("mainnet"));

    let hre = RuntimeEnvironment::builder()
        .add_plugin(Network)
        .env(HashMap::<String, String>::new())
        .build()
        .await
        .unwrap();
    assert_eq!(hre.global_arguments().get_str("network"), Some("default"));
    assert_eq!(hre.global_arguments().get_float("gasMultiplier"), Some(1.0));
}

#[tokio::test]
async fn unparsable_global_argument_aborts_the_build() {
    let err = RuntimeEnvironment::builder()
        .add_plugin(Network)
        .env(HashMap::from([("HARDHAT_GAS_MULTIPLIER".to_owned(), "lots".to_owned())]))
        .build()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Parameter(ParameterError::InvalidValueForType { ref name, .. })
            if name == "gasMultiplier"
    ));
}

#[tokio::test]
async fn plugin_errors_abort_the_build() {
    struct AlsoNetwork;
    impl Plugin for AlsoNetwork {
        fn id(&self) -> &str {
            "also-network"
        }

        fn global_parameters(&self) -> Vec<GlobalParameterSpec> {
            vec![GlobalParameterSpec::new("network", "", "other")]
        }
    }

    let err = RuntimeEnvironment::builder()
        .add_plugin(Network)
        .add_plugin(AlsoNetwork)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Parameter(ParameterError::GlobalParameterAlreadyDefined {
            ref defined_by,
            ..
        }) if defined_by == "network"
    ));

    let err = RuntimeEnvironment::builder()
        .add_plugin(Network)
        .add_plugin(Network)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::DuplicatePluginId { ref id } if id == "network"));

    let err = RuntimeEnvironment::builder()
        .add_plugin(Compiler)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::MissingPluginDependency { .. }));
}

#[tokio::test]
async fn config_pipeline_runs_plugin_hooks() {
    let hre = RuntimeEnvironment::builder()
        .add_plugins(Toolbox.build())
        .user_config(solidity_config())
        .build()
        .await
        .unwrap();
    assert_eq!(
        hre.config().get_raw("paths"),
        Some(&json!({ "sources": "contracts" }))
    );

    let err = RuntimeEnvironment::builder()
        .add_plugins(Toolbox.build())
        .user_config(UserConfig::from_value(json!({ "solidity": 28 })).unwrap())
        .build()
        .await
        .unwrap_err();
    let errors = match err {
        RuntimeError::InvalidConfig { errors } => errors,
        other => panic!("expected InvalidConfig, got {other:?}"),
    };
    assert_eq!(errors, vec![ConfigValidationError::new(["solidity"], "must be a string")]);
}

#[tokio::test]
async fn created_handlers_run_sequentially_most_recent_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let hre = RuntimeEnvironment::builder()
        .add_plugin(Recorder { id: "first", log: Arc::clone(&log) })
        .add_plugin(Recorder { id: "second", log: Arc::clone(&log) })
        .build()
        .await
        .unwrap();

    assert_eq!(*log.lock(), vec!["second", "first"]);
    let context = hre.hooks().context().unwrap();
    assert!(context.same_as(hre.context()));
}

#[tokio::test]
async fn disabled_plugins_contribute_nothing() {
    let hre = RuntimeEnvironment::builder()
        .add_plugins(Toolbox.build().disable("compiler"))
        .build()
        .await
        .unwrap();
    assert_eq!(hre.plugin_ids(), ["network"]);
    assert!(hre.tasks().get_task(&id("compile")).is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn run_task_uses_the_environment_context() {
    let hre = RuntimeEnvironment::builder()
        .add_plugins(Toolbox.build())
        .user_config(solidity_config())
        .user_arguments(HashMap::from([("network".to_owned(), "hardhat".to_owned())]))
        .build()
        .await
        .unwrap();

    let name = hre
        .run_task(&id("network-name"), TaskArguments::new())
        .await
        .unwrap();
    assert_eq!(name, json!("hardhat"));

    let compiled = hre
        .run_task(&id("compile"), TaskArguments::new().with("force", true))
        .await
        .unwrap();
    assert_eq!(compiled, json!({ "version": "0.8.28", "force": true }));

    let err = hre
        .run_task(&id("deploy"), TaskArguments::new())
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::TaskNotFound { .. }));
}

#[tokio::test]
async fn user_tasks_override_plugin_tasks() {
    let hre = RuntimeEnvironment::builder()
        .add_plugins(Toolbox.build())
        .user_config(solidity_config())
        .user_tasks([TaskDefinition::override_task(id("compile"))
            .option("label", "Build label", "dev")
            .action(|args, _, run_super| async move {
                let label = args.get_str("label").unwrap_or_default().to_owned();
                let mut output = run_super.run(args).await?;
                output["label"] = json!(label);
                Ok(output)
            })])
        .build()
        .await
        .unwrap();

    let output = hre
        .run_task(&id("compile"), TaskArguments::new())
        .await
        .unwrap();
    assert_eq!(
        output,
        json!({ "version": "0.8.28", "force": false, "label": "dev" })
    );
}

#[tokio::test]
async fn task_parameters_may_not_shadow_globals() {
    let err = RuntimeEnvironment::builder()
        .add_plugin(Network)
        .user_tasks([TaskDefinition::task(id("deploy"))
            .option("network", "", "local")
            .action(|_, _| async { Ok(json!(null)) })])
        .build()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Task(TaskError::ClashesWithGlobalParameter { .. })
    ));
}

#[tokio::test]
async fn tasks_reach_user_interruptions_through_the_context() {
    struct Prompt;
    impl Plugin for Prompt {
        fn id(&self) -> &str {
            "prompt"
        }

        fn register_hooks(&self, hooks: &HookRegistrar<'_>) -> HookResult<()> {
            hooks.register_chain::<RequestInput, _>(
                |_, (interruptor, description), _next| async move {
                    Ok(format!("{interruptor}:{description}"))
                },
            )?;
            Ok(())
        }

        fn tasks(&self) -> Vec<TaskDefinition> {
            vec![TaskDefinition::task(id("ask")).action(|_, context| async move {
                let answer = context
                    .interruptions()
                    .request_input("ask", "account")
                    .await
                    .map_err(TaskError::action)?;
                Ok(json!(answer))
            })]
        }
    }

    let hre = RuntimeEnvironment::builder()
        .add_plugin(Prompt)
        .build()
        .await
        .unwrap();
    let answer = hre.run_task(&id("ask"), TaskArguments::new()).await.unwrap();
    assert_eq!(answer, json!("ask:account"));
}
