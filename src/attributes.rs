//! SMART attribute extraction from smartctl JSON reports.
//!
//! This module flattens the `--all` report of a single device into integer
//! samples, covering both the ATA attribute table and the NVMe health
//! information log.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::device::Device;

/// ATA raw values of Temperature_Celsius pack min/max readings into the high
/// bytes; only the low 32 bits hold the current temperature.
const TEMPERATURE_MASK: i64 = 0xFFFF_FFFF;

/// Attribute whose raw value needs the temperature mask.
const TEMPERATURE_ATTR: &str = "Temperature_Celsius";

/// NVMe health-log key holding a list instead of a plain integer.
const NVME_SENSOR_LIST: &str = "temperature_sensors";

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("static regex must compile"));

/// A single SMART attribute identity: sanitized name plus the ATA attribute
/// id when the source table carries one (NVMe attributes have none).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: String,
    pub id: Option<u64>,
}

/// Ordered samples extracted from one device report.
pub type AttributeSet = Vec<(Attribute, i64)>;

/// Normalizes an attribute name for use as a Prometheus label value.
///
/// Runs of non-alphanumeric characters collapse to a single underscore and
/// leading/trailing underscores are stripped. Returns `None` when nothing
/// printable remains.
pub fn sanitize_attr_name(name: &str) -> Option<String> {
    let collapsed = NON_ALNUM.replace_all(name.trim(), "_");
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Extracts every recognized SMART attribute from a `smartctl --all` report.
pub fn extract_attributes(report: &Value, device: &Device) -> AttributeSet {
    let mut samples = AttributeSet::new();
    extract_ata_table(report, device, &mut samples);
    extract_nvme_health_log(report, device, &mut samples);
    samples
}

/// Reads the ATA attribute table (`ata_smart_attributes.table`).
///
/// Entries without an id or name are silently dropped; entries whose raw
/// value is not an integer are dropped with a warning.
fn extract_ata_table(report: &Value, device: &Device, samples: &mut AttributeSet) {
    let entries = match report
        .pointer("/ata_smart_attributes/table")
        .and_then(Value::as_array)
    {
        Some(entries) => entries,
        None => return,
    };

    for entry in entries {
        let id = entry.get("id").and_then(Value::as_u64).unwrap_or(0);
        let name = entry.get("name").and_then(Value::as_str).unwrap_or("");
        if id == 0 || name.is_empty() {
            continue;
        }

        let mut value = match entry.pointer("/raw/value").and_then(Value::as_i64) {
            Some(value) => value,
            None => {
                warn!(
                    "Non-integer value for {} on {}: {:?}",
                    name,
                    device,
                    entry.pointer("/raw/value")
                );
                continue;
            }
        };

        if name == TEMPERATURE_ATTR {
            value &= TEMPERATURE_MASK;
        }

        match sanitize_attr_name(name) {
            Some(attr_name) => samples.push((
                Attribute {
                    name: attr_name,
                    id: Some(id),
                },
                value,
            )),
            None => warn!("Empty attribute name after sanitizing on {}: {:?}", device, name),
        }
    }
}

/// Reads the NVMe health information log (`nvme_smart_health_information_log`).
fn extract_nvme_health_log(report: &Value, device: &Device, samples: &mut AttributeSet) {
    let log = match report
        .get("nvme_smart_health_information_log")
        .and_then(Value::as_object)
    {
        Some(log) => log,
        None => return,
    };

    for (name, value) in log {
        if name == NVME_SENSOR_LIST {
            continue;
        }

        let value = match value.as_i64() {
            Some(value) => value,
            None => {
                warn!("Non-integer value for {} on {}: {}", name, device, value);
                continue;
            }
        };

        match sanitize_attr_name(name) {
            Some(attr_name) => samples.push((
                Attribute {
                    name: attr_name,
                    id: None,
                },
                value,
            )),
            None => warn!("Empty attribute name after sanitizing on {}: {:?}", device, name),
        }
    }
}
