//! Subprocess layer around the smartctl binary.
//!
//! Every invocation runs in `--json` mode with a per-invocation timeout.
//! Exit codes follow the smartctl bitmask: only the low three bits mark a
//! failed invocation, the higher bits flag SMART health state and still come
//! with a usable report.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::{Config, DEFAULT_SMARTCTL_PATH, DEFAULT_SMARTCTL_TIMEOUT_SECS};
use crate::device::{self, Device};

/// Exit bit set when smartctl could not parse its command line.
const EXIT_CMDLINE_ERROR: i32 = 1 << 0;
/// Exit bit set when the device could not be opened.
const EXIT_OPEN_FAILED: i32 = 1 << 1;
/// Exit bit set when a SMART or ATA command to the device failed.
const EXIT_COMMAND_FAILED: i32 = 1 << 2;

const FATAL_EXIT_BITS: i32 = EXIT_CMDLINE_ERROR | EXIT_OPEN_FAILED | EXIT_COMMAND_FAILED;

/// Errors from a single smartctl invocation.
#[derive(Debug, Error)]
pub enum SmartctlError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },

    #[error("{command} exited with status {code}: {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("{command} was terminated by a signal")]
    Signaled { command: String },

    #[error("invalid JSON from {command}: {source}")]
    InvalidJson {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Splits an exit status into the bits that mark a failed invocation.
fn fatal_exit_bits(code: i32) -> i32 {
    code & FATAL_EXIT_BITS
}

/// Handle for invoking the configured smartctl binary.
#[derive(Debug, Clone)]
pub struct Smartctl {
    binary: String,
    timeout: Duration,
}

impl Smartctl {
    /// Builds a handle from the effective configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            binary: config
                .smartctl_path
                .clone()
                .unwrap_or_else(|| DEFAULT_SMARTCTL_PATH.to_string()),
            timeout: Duration::from_secs(
                config
                    .smartctl_timeout_secs
                    .unwrap_or(DEFAULT_SMARTCTL_TIMEOUT_SECS),
            ),
        }
    }

    /// Runs `smartctl --json` with the given arguments and parses the report.
    pub async fn run(&self, args: &[&str]) -> Result<Value, SmartctlError> {
        let command = self.command_line(args);
        debug!("Running {}", command);

        let invocation = Command::new(&self.binary)
            .arg("--json")
            .args(args)
            .kill_on_drop(true)
            .output();

        let output = match timeout(self.timeout, invocation).await {
            Ok(result) => result.map_err(|source| SmartctlError::Spawn {
                command: command.clone(),
                source,
            })?,
            Err(_) => {
                return Err(SmartctlError::Timeout {
                    command,
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        };

        match output.status.code() {
            Some(code) if fatal_exit_bits(code) != 0 => {
                return Err(SmartctlError::Failed {
                    command,
                    code,
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            Some(code) if code != 0 => {
                debug!("{} exited with SMART health bits set (status {})", command, code);
            }
            Some(_) => {}
            None => return Err(SmartctlError::Signaled { command }),
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|source| SmartctlError::InvalidJson { command, source })
    }

    /// Enumerates SMART-capable devices via `--scan`.
    pub async fn scan(&self) -> Result<Vec<Device>, SmartctlError> {
        let report = self.run(&["--scan"]).await?;
        Ok(device::parse_scan_report(&report))
    }

    /// Fetches the full SMART report for one device via `--all`.
    pub async fn probe(&self, device: &Device) -> Result<Value, SmartctlError> {
        self.run(&["--all", &device.name]).await
    }

    /// Reports the smartctl version as `major.minor`.
    pub async fn version(&self) -> Result<String, SmartctlError> {
        let report = self.run(&["--version"]).await?;
        let fields = report
            .pointer("/smartctl/version")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_i64)
                    .map(|field| field.to_string())
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        if fields.is_empty() {
            warn!("smartctl did not report a parsable version");
            return Ok("unknown".to_string());
        }

        Ok(fields.join("."))
    }

    fn command_line(&self, args: &[&str]) -> String {
        let mut command = format!("{} --json", self.binary);
        for arg in args {
            command.push(' ');
            command.push_str(arg);
        }
        command
    }
}
