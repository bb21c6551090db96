// COCOMO II Estimation Engine
// Main entry point for the cocomo binary

use clap::Parser;
use cocomo_engine::cli::{Cli, Command, ConfigAction};
use cocomo_engine::config::Config;
use cocomo_engine::handlers::{
    handle_advanced, handle_basic, handle_config_show, handle_drivers, handle_monte_carlo,
    OutputFormat,
};
use cocomo_engine::telemetry::init_telemetry;
use sdk::api::ErrorResponse;
use sdk::errors::{EngineError, EstimationErrorExt};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(engine_error) = e.downcast_ref::<EngineError>() {
                tracing::debug!(
                    kind = engine_error.kind(),
                    recoverable = engine_error.is_recoverable(),
                    "Command failed. {}",
                    engine_error.user_hint()
                );
            }
            let payload = ErrorResponse::new(format!("{:#}", e));
            match serde_json::to_string(&payload) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", serde_json::json!({ "error": payload.error })),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = if cli.pretty {
        OutputFormat::Pretty
    } else {
        OutputFormat::Compact
    };

    // Logging starts before the config so its load messages are kept
    let telemetry = init_telemetry(cli.log.as_deref());
    tracing::debug!("cocomo v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };
    telemetry.apply_config_level(&config.core.log_level);

    match cli.command {
        Command::Basic { request } => handle_basic(request, &config, format),

        Command::Advanced { request, formula } => {
            handle_advanced(request, formula, &config, format)
        }

        Command::MonteCarlo {
            request,
            seed,
            sequential,
        } => handle_monte_carlo(request, seed, sequential, &config, format),

        Command::Drivers => handle_drivers(format),

        Command::Config { action } => match action {
            ConfigAction::Show => handle_config_show(&config),
        },
    }
}
