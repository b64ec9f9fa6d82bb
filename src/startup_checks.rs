//! Startup requirement validation for smart-textfile-collector.
//!
//! This module validates that the collector has a usable smartctl and enough
//! privileges before the first collection cycle runs.

use nix::unistd::geteuid;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{Config, DEFAULT_PROM_FILE};
use crate::smartctl::Smartctl;

/// Minimum smartmontools major version with `--json` support.
const MIN_SMARTCTL_MAJOR: u32 = 7;

/// Validate all runtime requirements
pub async fn validate_requirements(config: &Config) -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_user_privileges();
    check_smartctl(config).await?;
    check_output_dir(config);

    info!("✅ All runtime requirements validated");
    Ok(())
}

/// Check if running with sufficient privileges
fn check_user_privileges() {
    if !geteuid().is_root() {
        warn!("⚠️  Not running as root - smartctl may not be able to open devices");
        warn!("   Recommendation: Run via the installed systemd service or sudo");
        // Not an error - continue but warn
    } else {
        info!("✅ Running as root (uid=0)");
    }
}

/// Check that smartctl exists and is new enough for --json
async fn check_smartctl(config: &Config) -> Result<(), ValidationError> {
    let smartctl = Smartctl::from_config(config);
    let version = smartctl
        .version()
        .await
        .map_err(|e| ValidationError::SmartctlUnavailable(e.to_string()))?;

    match version
        .split('.')
        .next()
        .and_then(|major| major.parse::<u32>().ok())
    {
        Some(major) if major < MIN_SMARTCTL_MAJOR => Err(ValidationError::SmartctlTooOld(version)),
        Some(_) => {
            info!("✅ smartctl {} available", version);
            Ok(())
        }
        None => {
            warn!("⚠️  Could not parse smartctl version '{}', continuing", version);
            Ok(())
        }
    }
}

/// Warn when the output directory is missing or read-only; a missing one
/// gets created on first write
fn check_output_dir(config: &Config) {
    let path = config
        .prom_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROM_FILE));

    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => {}
        Some(parent) if parent.exists() => {
            if dir_is_writable(parent) {
                info!("✅ Output directory {} is writable", parent.display());
            } else {
                warn!(
                    "⚠️  Output directory {} is not writable, metric writes may fail",
                    parent.display()
                );
            }
        }
        Some(parent) => {
            warn!(
                "⚠️  Output directory {} does not exist, it will be created on first write",
                parent.display()
            );
        }
        None => {}
    }
}

/// Check if the directory is writable by its owner (the service runs as root)
fn dir_is_writable(dir: &Path) -> bool {
    match fs::metadata(dir) {
        Ok(metadata) => metadata.permissions().mode() & 0o200 != 0,
        Err(_) => false,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("smartctl is not available or does not support --json: {0}")]
    SmartctlUnavailable(String),

    #[error("smartctl {0} is too old, JSON output requires smartmontools 7.0+")]
    SmartctlTooOld(String),
}
