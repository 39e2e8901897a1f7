//! Config loading: extend, validate, resolve.
//!
//! All three steps are `config` hooks, so they run before any hook context
//! exists.

use hardhat_config::{ConfigValidationError, ResolvedConfig, UserConfig};
use hardhat_hooks::{ConfigHooks, Hook, HookManager};

use crate::error::RuntimeError;

/// Chain hook that lets plugins add to the user config before validation.
///
/// The default returns the config unchanged.
pub struct ExtendUserConfig;

impl Hook for ExtendUserConfig {
    type Category = ConfigHooks;
    const NAME: &'static str = "extendUserConfig";
    type Args = UserConfig;
    type Output = UserConfig;
}

/// Parallel hook; each handler reports the problems it finds.
pub struct ValidateUserConfig;

impl Hook for ValidateUserConfig {
    type Category = ConfigHooks;
    const NAME: &'static str = "validateUserConfig";
    type Args = UserConfig;
    type Output = Vec<ConfigValidationError>;
}

/// Chain hook that turns the validated user config into the resolved one.
///
/// The default copies every key.
pub struct ResolveUserConfig;

impl Hook for ResolveUserConfig {
    type Category = ConfigHooks;
    const NAME: &'static str = "resolveUserConfig";
    type Args = UserConfig;
    type Output = ResolvedConfig;
}

/// Runs the config pipeline on `config`.
///
/// # Errors
///
/// [`RuntimeError::InvalidConfig`] with every validation problem, or a
/// [`RuntimeError::Hook`] if a handler fails.
pub async fn resolve_user_config(
    hooks: &HookManager,
    config: UserConfig,
) -> Result<ResolvedConfig, RuntimeError> {
    let config = hooks
        .run_config_handler_chain::<ExtendUserConfig, _>(config, |config| async move { Ok(config) })
        .await?;

    let errors: Vec<ConfigValidationError> = hooks
        .run_parallel_handlers::<ValidateUserConfig>(config.clone())
        .await?
        .into_iter()
        .flatten()
        .collect();
    if !errors.is_empty() {
        tracing::debug!(problems = errors.len(), "user config failed validation");
        return Err(RuntimeError::InvalidConfig { errors });
    }

    let resolved = hooks
        .run_config_handler_chain::<ResolveUserConfig, _>(config, |config| async move {
            Ok(ResolvedConfig::from(config))
        })
        .await?;
    tracing::debug!(keys = resolved.keys().count(), "resolved config");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_config(value: serde_json::Value) -> UserConfig {
        UserConfig::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn defaults_copy_the_user_config() {
        let hooks = HookManager::new();
        let resolved = resolve_user_config(&hooks, user_config(json!({ "solidity": "0.8.28" })))
            .await
            .unwrap();
        assert_eq!(resolved.get::<String>("solidity").unwrap().as_deref(), Some("0.8.28"));
    }

    #[tokio::test]
    async fn extensions_and_resolvers_wrap_the_defaults() {
        let hooks = HookManager::new();
        hooks
            .register_handlers("paths", |hooks| {
                hooks
                    .register_config_chain::<ExtendUserConfig, _>(|mut config, next| async move {
                        config
                            .set("sources", "contracts")
                            .map_err(hardhat_hooks::HookError::handler)?;
                        next.run(config).await
                    })?
                    .register_config_chain::<ResolveUserConfig, _>(|config, next| async move {
                        let mut resolved = next.run(config).await?;
                        resolved
                            .set("resolvedBy", "paths")
                            .map_err(hardhat_hooks::HookError::handler)?;
                        Ok(resolved)
                    })?;
                Ok(())
            })
            .unwrap();

        let resolved = resolve_user_config(&hooks, UserConfig::new()).await.unwrap();
        assert_eq!(resolved.get::<String>("sources").unwrap().as_deref(), Some("contracts"));
        assert_eq!(resolved.get::<String>("resolvedBy").unwrap().as_deref(), Some("paths"));
    }

    #[tokio::test]
    async fn validation_errors_are_collected_from_every_handler() {
        let hooks = HookManager::new();
        for (owner, key) in [("first", "a"), ("second", "b")] {
            hooks
                .register_handlers(owner, move |hooks| {
                    hooks.register_config::<ValidateUserConfig, _>(move |config| async move {
                        Ok(if config.contains(key) {
                            Vec::new()
                        } else {
                            vec![ConfigValidationError::new([key], "is required")]
                        })
                    })?;
                    Ok(())
                })
                .unwrap();
        }

        let err = resolve_user_config(&hooks, UserConfig::new()).await.unwrap_err();
        let errors = match err {
            RuntimeError::InvalidConfig { errors } => errors,
            other => panic!("expected InvalidConfig, got {other:?}"),
        };
        let paths: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].contains('b'), "most recent handler first: {paths:?}");
        assert!(paths[1].contains('a'));

        assert!(
            resolve_user_config(&hooks, user_config(json!({ "a": 1, "b": 2 })))
                .await
                .is_ok()
        );
    }
}
