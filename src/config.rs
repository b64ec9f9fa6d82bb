//! Configuration management for smart-textfile-collector.
//!
//! This module handles loading, merging, and validating configuration from
//! files and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

// Default configuration constants
pub const DEFAULT_PROM_FILE: &str = "/var/lib/prometheus/node-exporter/smart.prom";
pub const DEFAULT_SMARTCTL_PATH: &str = "smartctl";
pub const DEFAULT_SMARTCTL_TIMEOUT_SECS: u64 = 30;

/// Collector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Output
    /// Path of the .prom file read by the node exporter textfile collector
    #[serde(alias = "prom-file")]
    pub prom_file: Option<PathBuf>,

    // smartctl invocation
    #[serde(alias = "smartctl-path")]
    pub smartctl_path: Option<String>,
    #[serde(alias = "smartctl-timeout-secs")]
    pub smartctl_timeout_secs: Option<u64>,

    // Scheduling
    /// Seconds between collection cycles; unset means collect once and exit
    /// (the installed systemd timer drives the schedule)
    #[serde(alias = "interval-secs")]
    pub interval_secs: Option<u64>,

    // Device selection
    /// Only probe these devices (full path or basename)
    #[serde(alias = "include-devices")]
    pub include_devices: Option<Vec<String>>,
    /// Never probe these devices; wins over include_devices
    #[serde(alias = "exclude-devices")]
    pub exclude_devices: Option<Vec<String>>,

    // Feature flags
    /// Emit smart_collector_* gauges about the collector itself
    #[serde(alias = "enable-telemetry")]
    pub enable_telemetry: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prom_file: Some(PathBuf::from(DEFAULT_PROM_FILE)),
            smartctl_path: Some(DEFAULT_SMARTCTL_PATH.to_string()),
            smartctl_timeout_secs: Some(DEFAULT_SMARTCTL_TIMEOUT_SECS),
            interval_secs: None,
            include_devices: None,
            exclude_devices: None,
            enable_telemetry: Some(true),
            log_level: Some("info".into()),
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Output path: the node exporter only picks up *.prom files
    let prom_file = cfg
        .prom_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROM_FILE));
    if prom_file.as_os_str().is_empty() {
        return Err("prom_file must not be empty".into());
    }
    if prom_file.extension().and_then(|ext| ext.to_str()) != Some("prom") {
        return Err(format!(
            "prom_file must end in .prom for the node exporter textfile collector: {}",
            prom_file.display()
        )
        .into());
    }

    if cfg.smartctl_path.as_deref().is_some_and(|path| path.is_empty()) {
        return Err("smartctl_path must not be empty".into());
    }

    if cfg.smartctl_timeout_secs == Some(0) {
        return Err("smartctl_timeout_secs must be at least 1".into());
    }

    if cfg.interval_secs == Some(0) {
        return Err("interval_secs must be at least 1".into());
    }

    // A device listed in both filters would be silently dropped; reject the
    // ambiguity instead.
    if let (Some(include), Some(exclude)) = (&cfg.include_devices, &cfg.exclude_devices) {
        if let Some(device) = include.iter().find(|device| exclude.contains(device)) {
            return Err(format!(
                "Device '{}' is listed in both include_devices and exclude_devices",
                device
            )
            .into());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref().and_then(|p| p.to_str()))?
    };

    // Override with CLI args
    if let Some(prom_file) = &args.prom_file {
        config.prom_file = Some(prom_file.clone());
    }

    if let Some(smartctl_path) = &args.smartctl_path {
        config.smartctl_path = Some(smartctl_path.clone());
    }

    if let Some(timeout) = args.smartctl_timeout {
        config.smartctl_timeout_secs = Some(timeout);
    }

    if let Some(interval) = args.interval {
        config.interval_secs = Some(interval);
    }

    // Device filters: CLI wins if provided
    if !args.devices.is_empty() {
        config.include_devices = Some(args.devices.clone());
    }
    if !args.exclude_devices.is_empty() {
        config.exclude_devices = Some(args.exclude_devices.clone());
    }

    // Feature flags
    if args.disable_telemetry {
        config.enable_telemetry = Some(false);
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        // Try default locations
        let defaults = [
            "/etc/smart-textfile-collector/config.yaml",
            "/etc/smart-textfile-collector/config.yml",
            "/etc/smart-textfile-collector/config.json",
            "/etc/smart-textfile-collector/config.toml",
            "./smart-textfile-collector.yaml",
            "./smart-textfile-collector.yml",
            "./smart-textfile-collector.json",
            "./smart-textfile-collector.toml",
        ];

        defaults
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(""))
    };

    if !path.exists() || path.to_string_lossy().is_empty() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;

    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(&content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(&content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(&content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Shows the effective configuration in the requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };

    println!("{output}");
    Ok(())
}
