//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::Config;

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from("smart-textfile-collector.yaml"),
    };

    let content = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
        ConfigFormat::Toml => toml::to_string_pretty(&config)?,
        ConfigFormat::Yaml => {
            let mut content = serde_yaml::to_string(&config)?;
            if commented {
                content = add_config_comments(content);
            }
            content
        }
    };

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# SMART Textfile Collector Configuration
# ======================================
#
# Output
# ------
# prom_file: "/var/lib/prometheus/node-exporter/smart.prom"
#                                # Must end in .prom; the node exporter
#                                # textfile collector only reads *.prom files
#
# smartctl Invocation
# -------------------
# smartctl_path: "smartctl"      # Binary path, resolved via $PATH when bare
# smartctl_timeout_secs: 30      # Timeout per smartctl invocation
#
# Scheduling
# ----------
# interval_secs: null            # null = collect once and exit (systemd timer
#                                # drives the schedule); set to keep running
#
# Device Selection
# ----------------
# include_devices: null          # Only probe these (full path or basename)
# exclude_devices: null          # Never probe these; wins over include
#
# Feature Flags
# -------------
# enable_telemetry: true         # Emit smart_collector_* gauges
#
# Logging
# -------
# log_level: "info"              # off, error, warn, info, debug, trace
"#;

    format!("{comments}\n{yaml}")
}
