//! Storage device representation and scan-report parsing.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::config::Config;

/// One storage device reported by `smartctl --scan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Device node path, e.g. `/dev/sda`.
    pub name: String,
    /// smartctl device type, e.g. `sat` or `nvme`.
    pub device_type: String,
    /// Transport protocol, e.g. `ATA` or `NVMe`.
    pub protocol: String,
}

/// Raw scan entry as emitted by smartctl. All fields are optional so a
/// partially filled entry can be reported instead of failing the whole scan.
#[derive(Debug, Deserialize)]
struct RawScanDevice {
    name: Option<String>,
    #[serde(rename = "type")]
    device_type: Option<String>,
    protocol: Option<String>,
}

impl Device {
    /// Last path component of the device node, used as the `device` label.
    pub fn basename(&self) -> &str {
        Path::new(&self.name)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.name)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Parses a `smartctl --json --scan` report into devices.
///
/// Entries missing any of name, type or protocol are dropped with an error
/// log; a device without all three can neither be probed nor labeled.
pub fn parse_scan_report(report: &Value) -> Vec<Device> {
    let mut devices = Vec::new();
    let entries = match report.get("devices").and_then(Value::as_array) {
        Some(entries) => entries,
        None => return devices,
    };

    for entry in entries {
        let raw: RawScanDevice = match serde_json::from_value(entry.clone()) {
            Ok(raw) => raw,
            Err(_) => {
                error!("Ignoring malformed scan entry: {}", entry);
                continue;
            }
        };

        match (raw.name, raw.device_type, raw.protocol) {
            (Some(name), Some(device_type), Some(protocol)) => {
                let device = Device {
                    name,
                    device_type,
                    protocol,
                };
                debug!("Found {} device {}", device.device_type, device.name);
                devices.push(device);
            }
            _ => error!("Ignoring device with missing fields: {}", entry),
        }
    }

    devices
}

/// Applies the configured include/exclude device filters.
///
/// Filter entries match either the full device path or its basename, and the
/// exclude list wins over the include list.
pub fn filter_devices(devices: Vec<Device>, config: &Config) -> Vec<Device> {
    let include = config.include_devices.as_deref().unwrap_or(&[]);
    let exclude = config.exclude_devices.as_deref().unwrap_or(&[]);

    devices
        .into_iter()
        .filter(|device| {
            let matches =
                |needle: &String| needle.as_str() == device.name || needle.as_str() == device.basename();
            if exclude.iter().any(matches) {
                debug!("Skipping {}: listed in exclude_devices", device);
                return false;
            }
            if !include.is_empty() && !include.iter().any(matches) {
                debug!("Skipping {}: not listed in include_devices", device);
                return false;
            }
            true
        })
        .collect()
}
