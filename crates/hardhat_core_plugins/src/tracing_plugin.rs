//! Tracing and logging plugin.
//!
//! Provides [`TracingPlugin`], which installs the `tracing` subscriber once
//! the runtime environment exists.
//!
//! # Lifecycle
//!
//! - The plugin declares the `verbose` and `logFormat` global parameters, so
//!   they resolve like any other (CLI, then `HARDHAT_VERBOSE` /
//!   `HARDHAT_LOG_FORMAT`, then the default).
//! - Its `hre.created` handler reads the resolved values and initializes the
//!   subscriber. Deferring to that point lets user arguments influence the
//!   output before anything is installed.
//!
//! # Example
//!
//! ```
//! use hardhat_core_plugins::{TracingFormat, TracingPlugin};
//! use hardhat_runtime::RuntimeEnvironment;
//! use tracing::Level;
//!
//! # futures::executor::block_on(async {
//! let hre = RuntimeEnvironment::builder()
//!     .add_plugin(
//!         TracingPlugin::default()
//!             .with_level(Level::WARN)
//!             .with_format(TracingFormat::Compact),
//!     )
//!     .build()
//!     .await
//!     .unwrap();
//! assert_eq!(hre.global_arguments().get_bool("verbose"), Some(false));
//! # });
//! ```

use core::fmt;
use core::str::FromStr;

use hardhat_hooks::{HookError, HookRegistrar, HookResult};
use hardhat_params::{GlobalArguments, GlobalParameterSpec, ParameterType};
use hardhat_runtime::{Created, Plugin};
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Global parameter switching the log level to `DEBUG`.
pub const VERBOSE_PARAMETER: &str = "verbose";

/// Global parameter selecting the [`TracingFormat`].
pub const LOG_FORMAT_PARAMETER: &str = "logFormat";

// ─────────────────────────────────────────────────────────────────────────────
// TracingFormat
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

impl TracingFormat {
    /// The name accepted by the `logFormat` parameter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Compact => "compact",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for TracingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `logFormat` was not one of `pretty`, `compact` or `json`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown log format '{0}', expected one of: pretty, compact, json")]
pub struct UnknownTracingFormat(
    /// The rejected name.
    pub String,
);

impl FromStr for TracingFormat {
    type Err = UnknownTracingFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(UnknownTracingFormat(s.to_owned())),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingConfig
// ─────────────────────────────────────────────────────────────────────────────

/// The effective tracing settings of one environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingConfig {
    /// The configured log level.
    pub level: Level,
    /// The configured output format.
    pub format: TracingFormat,
}

// ─────────────────────────────────────────────────────────────────────────────
// TracingPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Tracing and logging plugin.
///
/// # Global Parameters
///
/// | Name | Type | Default | Effect |
/// |------|------|---------|--------|
/// | `verbose` | Boolean | `false` | raises the level to `DEBUG` |
/// | `logFormat` | String | the plugin's format | `pretty`, `compact` or `json` |
///
/// # Configuration Options
///
/// ```
/// use hardhat_core_plugins::{TracingFormat, TracingPlugin};
/// use tracing::Level;
///
/// // Development: pretty output with span enter/exit events
/// let dev_plugin = TracingPlugin::default()
///     .with_level(Level::DEBUG)
///     .with_span_events(true);
///
/// // CI: JSON output, quiet dependencies
/// let ci_plugin = TracingPlugin::default()
///     .with_format(TracingFormat::Json)
///     .with_env_filter("hardhat_runtime=info,hardhat_hooks=warn");
/// ```
#[derive(Debug, Clone)]
pub struct TracingPlugin {
    level: Level,
    format: TracingFormat,
    /// Target filter such as `"hardhat_tasks=debug,hardhat_hooks=warn"`.
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TracingPlugin {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TracingFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TracingPlugin {
    /// Plugin id.
    pub const ID: &'static str = "hardhat:tracing";

    /// Creates a new `TracingPlugin` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level used when `verbose` is off.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the default output format.
    #[must_use]
    pub fn with_format(mut self, format: TracingFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a custom environment filter string.
    ///
    /// Format: `target=level,target=level,...`. An unparsable filter falls
    /// back to the plain level.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Computes the effective settings from resolved global arguments.
    ///
    /// Missing arguments fall back to the plugin's own settings.
    ///
    /// # Errors
    ///
    /// [`UnknownTracingFormat`] if `logFormat` names no format.
    pub fn config_for(
        &self,
        arguments: &GlobalArguments,
    ) -> Result<TracingConfig, UnknownTracingFormat> {
        let level = if arguments.get_bool(VERBOSE_PARAMETER) == Some(true) {
            Level::DEBUG
        } else {
            self.level
        };
        let format = match arguments.get_str(LOG_FORMAT_PARAMETER) {
            Some(name) => name.parse()?,
            None => self.format,
        };
        Ok(TracingConfig { level, format })
    }

    fn install(&self, config: TracingConfig) {
        let env_filter = match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
            }
            None => EnvFilter::new(config.level.as_str()),
        };

        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        // try_init fails once a global subscriber exists; later environments keep the first.
        match config.format {
            TracingFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TracingFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
        }

        tracing::info!(
            level = %config.level,
            format = %config.format,
            "TracingPlugin initialized"
        );
    }
}

impl Plugin for TracingPlugin {
    fn id(&self) -> &str {
        Self::ID
    }

    fn global_parameters(&self) -> Vec<GlobalParameterSpec> {
        vec![
            GlobalParameterSpec::new(VERBOSE_PARAMETER, "Enables debug logging", false)
                .with_type(ParameterType::Boolean),
            GlobalParameterSpec::new(
                LOG_FORMAT_PARAMETER,
                "Log output format: pretty, compact or json",
                self.format.as_str(),
            ),
        ]
    }

    fn register_hooks(&self, hooks: &HookRegistrar<'_>) -> HookResult<()> {
        let plugin = self.clone();
        hooks.register::<Created, _>(move |context, _hre| {
            let result = plugin
                .config_for(context.global_arguments())
                .map(|config| plugin.install(config))
                .map_err(HookError::handler);
            async move { result }
        })?;
        Ok(())
    }
}
