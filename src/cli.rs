//! CLI arguments and subcommands for smart-textfile-collector.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Version string with git and build details for --version.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", built ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    ")"
);

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "smart-textfile-collector",
    about = "Writes SMART disk attributes to a .prom file for the Prometheus node exporter",
    long_about = "Writes SMART disk attributes to a .prom file for the Prometheus node exporter.\n\n\
                  Scans for SMART-capable devices with smartctl, probes each one for its \
                  attribute table or NVMe health log, and atomically replaces the configured \
                  .prom file with the rendered metrics. By default one collection cycle runs \
                  and the process exits, which is how the installed systemd timer drives it; \
                  pass --interval to keep running and collect continuously.",
    author = "James Geboski <jgeboski@gmail.com>",
    version,
    long_version = LONG_VERSION,
    propagate_version = true,
    after_help = "Project: https://github.com/jgeboski/prometheus-smart-collector"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write metrics to this .prom file
    #[arg(short = 'f', long)]
    pub prom_file: Option<PathBuf>,

    /// Log level (overrides config file)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Path of the smartctl binary
    #[arg(long)]
    pub smartctl_path: Option<String>,

    /// Timeout in seconds for each smartctl invocation
    #[arg(long)]
    pub smartctl_timeout: Option<u64>,

    /// Collect every N seconds instead of exiting after one cycle
    #[arg(short = 'i', long, value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// Only probe this device, full path or basename (repeatable)
    #[arg(short = 'd', long = "device", value_name = "DEVICE")]
    pub devices: Vec<String>,

    /// Never probe this device, wins over --device (repeatable)
    #[arg(long = "exclude-device", value_name = "DEVICE")]
    pub exclude_devices: Vec<String>,

    /// Disable internal smart_collector_* metrics
    #[arg(long)]
    pub disable_telemetry: bool,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List SMART-capable devices found by smartctl
    Scan {
        /// Probe each device for model and health details
        #[arg(long)]
        verbose: bool,
    },

    /// Test metrics collection without writing the .prom file
    Test {
        /// Number of test iterations
        #[arg(short = 'n', long, default_value_t = 1)]
        iterations: usize,

        /// Print the rendered metrics after the last iteration
        #[arg(long)]
        verbose: bool,
    },

    /// Validate configuration and system requirements
    Check {
        /// Also probe every discovered device
        #[arg(long)]
        probe: bool,

        /// Run all checks
        #[arg(long)]
        all: bool,
    },

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Install system-wide with systemd service and timer
    Install {
        /// Skip systemd timer enable/start
        #[arg(long)]
        no_timer: bool,

        /// Force reinstall (overwrite existing)
        #[arg(long)]
        force: bool,

        /// Minutes between timer-driven collection cycles
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
        timer_interval: u64,
    },

    /// Uninstall system-wide installation
    Uninstall {
        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,

        /// Also remove the written .prom file
        #[arg(long)]
        purge: bool,
    },
}
