//! smart-textfile-collector
//!
//! SMART disk metrics collector for the Prometheus node exporter textfile
//! collector. This is the main entry point that runs collection cycles and
//! handles subcommands.

mod attributes;
mod cli;
mod collector;
mod commands;
mod config;
mod device;
mod exposition;
mod smartctl;
mod startup_checks;
mod textfile;

use clap::Parser;
use std::time::Duration;
use tokio::signal;
use tokio::time::MissedTickBehavior;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};

use cli::{Args, Commands, LogLevel};
use commands::{
    command_check, command_config, command_install, command_scan, command_test, command_uninstall,
};
use config::{resolve_config, show_config, validate_effective_config, Config};

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(config: &Config, args: &Args) {
    let level = match &args.log_level {
        Some(level) => level.clone(),
        None => match config.log_level.as_deref() {
            Some("off") => LogLevel::Off,
            Some("error") => LogLevel::Error,
            Some("warn") => LogLevel::Warn,
            Some("debug") => LogLevel::Debug,
            Some("trace") => LogLevel::Trace,
            _ => LogLevel::Info,
        },
    };

    let filter = match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {:?}", level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        // Install, Uninstall, and Config don't need the effective config
        match command {
            Commands::Install {
                no_timer,
                force,
                timer_interval,
            } => {
                return command_install(*no_timer, *force, *timer_interval);
            }
            Commands::Uninstall { yes, purge } => {
                return command_uninstall(*yes, *purge);
            }
            Commands::Config {
                output,
                format,
                commented,
            } => {
                return command_config(output.clone(), format.clone(), *commented);
            }
            _ => {
                // Other commands need config validation
            }
        }

        let config = load_validated_config(&args)?;
        setup_logging(&config, &args);

        return match command {
            Commands::Scan { verbose } => command_scan(*verbose, &config).await,

            Commands::Test {
                iterations,
                verbose,
            } => command_test(*iterations, *verbose, &config).await,

            Commands::Check { probe, all } => command_check(*probe, *all, &config).await,

            Commands::Install { .. } => unreachable!("Install handled above"),
            Commands::Uninstall { .. } => unreachable!("Uninstall handled above"),
            Commands::Config { .. } => unreachable!("Config handled above"),
        };
    }

    // Load configuration for collector mode
    let config = resolve_config(&args)?;

    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }

    setup_logging(&config, &args);

    info!("Starting smart-textfile-collector {}", cli::LONG_VERSION);

    // A collector without a usable smartctl can never produce output, so
    // fail here and let systemd surface the unit failure.
    if let Err(e) = startup_checks::validate_requirements(&config).await {
        error!("❌ Startup validation failed: {}", e);
        std::process::exit(1);
    }

    match config.interval_secs {
        None => {
            // Single cycle: this is what the systemd timer triggers.
            if let Err(e) = collector::run_cycle(&config).await {
                error!("Collection cycle failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(interval_secs) => {
            run_periodic(&config, interval_secs).await;
        }
    }

    Ok(())
}

/// Runs collection cycles on an interval until SIGINT or SIGTERM.
async fn run_periodic(config: &Config, interval_secs: u64) {
    // Setup graceful shutdown signal handlers
    let shutdown_signal = async {
        let ctrl_c = async {
            signal::ctrl_c()
                .await
                .expect("Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("Failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
            }
            _ = terminate => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
        }
    };
    tokio::pin!(shutdown_signal);

    info!("Collecting every {} seconds", interval_secs);
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // A failed cycle keeps the previous .prom file in place; the
                // next tick gets another chance.
                if let Err(e) = collector::run_cycle(config).await {
                    error!("Collection cycle failed: {}", e);
                }
            }
            _ = &mut shutdown_signal => {
                break;
            }
        }
    }

    info!("smart-textfile-collector stopped gracefully");
}
