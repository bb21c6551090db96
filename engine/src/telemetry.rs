//! Logging setup for the `cocomo` binary
//!
//! Stdout carries the single JSON response, so every log line goes to
//! stderr: human-readable in debug builds, JSON in release builds.
//!
//! The subscriber is installed before the configuration is read, which keeps
//! the messages from loading or creating `config.toml`. Once the config is
//! known, [`Telemetry::apply_config_level`] swaps in `core.log_level` through
//! a reload handle. `RUST_LOG` and `--log` both outrank the config file.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Level in effect until the configuration has been read
const STARTUP_LEVEL: &str = "info";

/// What decided the active log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelSource {
    /// `RUST_LOG` directives
    Env,
    /// `--log` on the command line
    Cli,
    /// [`STARTUP_LEVEL`], waiting for the config file
    Startup,
}

/// Handle to the installed subscriber's filter
pub struct Telemetry {
    filter: Option<reload::Handle<EnvFilter, Registry>>,
    source: LevelSource,
}

impl Telemetry {
    /// Switch to the config file's level if nothing outranks it
    ///
    /// Returns whether the filter changed.
    pub fn apply_config_level(&self, level: &str) -> bool {
        if self.source != LevelSource::Startup {
            return false;
        }
        let Some(handle) = &self.filter else {
            return false;
        };
        match handle.reload(level_filter(level)) {
            Ok(()) => {
                tracing::debug!("Log level set to '{}' from config", level);
                true
            }
            Err(e) => {
                tracing::warn!("Could not apply log level '{}': {}", level, e);
                false
            }
        }
    }
}

/// Install the stderr subscriber
///
/// If a global subscriber already exists the returned handle is inert.
pub fn init_telemetry(cli_level: Option<&str>) -> Telemetry {
    let (filter, source) = initial_filter(EnvFilter::try_from_default_env().ok(), cli_level);
    let (filter, handle) = reload::Layer::new(filter);
    let registry = tracing_subscriber::registry().with(filter);

    #[cfg(debug_assertions)]
    let installed = registry
        .with(
            fmt::layer()
                .pretty()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();

    #[cfg(not(debug_assertions))]
    let installed = registry
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr),
        )
        .try_init();

    Telemetry {
        filter: installed.is_ok().then_some(handle),
        source,
    }
}

fn initial_filter(env: Option<EnvFilter>, cli_level: Option<&str>) -> (EnvFilter, LevelSource) {
    match (env, cli_level) {
        (Some(filter), _) => (filter, LevelSource::Env),
        (None, Some(level)) => (level_filter(level), LevelSource::Cli),
        (None, None) => (level_filter(STARTUP_LEVEL), LevelSource::Startup),
    }
}

/// Dependencies stay at `warn`; the engine follows `level`
fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::new(format!("warn,cocomo_engine={}", level))
}
