//! One collection cycle: scan, probe, extract, render, write.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::attributes::{self, AttributeSet};
use crate::config::{Config, DEFAULT_PROM_FILE};
use crate::device::{self, Device};
use crate::exposition;
use crate::smartctl::{Smartctl, SmartctlError};
use crate::textfile;

/// Samples extracted for one probed device.
#[derive(Debug)]
pub struct DeviceReport {
    pub device: Device,
    pub attributes: AttributeSet,
}

/// Result of one scan-probe-extract pass.
#[derive(Debug)]
pub struct CollectOutcome {
    pub reports: Vec<DeviceReport>,
    pub devices_probed: usize,
    pub devices_failed: usize,
    pub duration: Duration,
}

impl CollectOutcome {
    /// Total number of attribute samples across all devices.
    pub fn sample_count(&self) -> usize {
        self.reports.iter().map(|report| report.attributes.len()).sum()
    }
}

/// Errors that abort a collection cycle.
///
/// Per-device probe failures do not abort the cycle, they only reduce the
/// report; everything here means no usable output could be produced.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("device scan failed: {0}")]
    Scan(#[from] SmartctlError),

    #[error("failed to render metrics: {0}")]
    Render(#[from] prometheus::Error),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Scans for devices and probes all of them concurrently.
pub async fn collect(config: &Config) -> Result<CollectOutcome, CollectError> {
    let started = Instant::now();
    let smartctl = Smartctl::from_config(config);

    let devices = device::filter_devices(smartctl.scan().await?, config);
    let devices_probed = devices.len();
    debug!("Probing {} devices", devices_probed);

    let mut probes = Vec::with_capacity(devices.len());
    for device in devices {
        let smartctl = smartctl.clone();
        probes.push(tokio::spawn(async move {
            let report = smartctl.probe(&device).await;
            (device, report)
        }));
    }

    let mut reports = Vec::with_capacity(probes.len());
    let mut devices_failed = 0;
    for probe in probes {
        let (device, report) = match probe.await {
            Ok(result) => result,
            Err(join_error) => {
                error!("Probe task failed: {}", join_error);
                devices_failed += 1;
                continue;
            }
        };

        match report {
            Ok(report) => {
                let attributes = attributes::extract_attributes(&report, &device);
                if attributes.is_empty() {
                    warn!("Skipping {} without attributes", device);
                } else {
                    debug!("Extracted {} attributes from {}", attributes.len(), device);
                    reports.push(DeviceReport { device, attributes });
                }
            }
            Err(probe_error) => {
                error!("Failed to probe {}: {}", device, probe_error);
                devices_failed += 1;
            }
        }
    }

    Ok(CollectOutcome {
        reports,
        devices_probed,
        devices_failed,
        duration: started.elapsed(),
    })
}

/// Runs a full cycle and atomically replaces the configured .prom file.
pub async fn run_cycle(config: &Config) -> Result<CollectOutcome, CollectError> {
    let outcome = collect(config).await?;
    let body = exposition::render(&outcome, config)?;

    let path = config
        .prom_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROM_FILE));
    textfile::write_atomic(&path, &body)
        .await
        .map_err(|source| CollectError::Write {
            path: path.clone(),
            source,
        })?;

    info!(
        "Wrote {} metrics for {} devices to {}",
        outcome.sample_count(),
        outcome.reports.len(),
        path.display()
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;

    fn report(device_name: &str, samples: usize) -> DeviceReport {
        DeviceReport {
            device: Device {
                name: device_name.to_string(),
                device_type: "sat".to_string(),
                protocol: "ATA".to_string(),
            },
            attributes: (0..samples)
                .map(|n| {
                    (
                        Attribute {
                            name: format!("attr_{}", n),
                            id: Some(n as u64 + 1),
                        },
                        n as i64,
                    )
                })
                .collect(),
        }
    }

    #[test]
    fn test_sample_count_sums_all_reports() {
        let outcome = CollectOutcome {
            reports: vec![report("/dev/sda", 3), report("/dev/sdb", 5)],
            devices_probed: 2,
            devices_failed: 0,
            duration: Duration::from_secs(1),
        };
        assert_eq!(outcome.sample_count(), 8);
    }

    #[test]
    fn test_sample_count_empty_outcome() {
        let outcome = CollectOutcome {
            reports: Vec::new(),
            devices_probed: 0,
            devices_failed: 0,
            duration: Duration::from_secs(0),
        };
        assert_eq!(outcome.sample_count(), 0);
    }
}
