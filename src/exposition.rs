//! Prometheus text rendering for collected SMART samples.
//!
//! Every cycle builds a fresh registry so devices that disappear between
//! cycles drop out of the output instead of lingering with stale values.

use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

use crate::collector::CollectOutcome;
use crate::config::Config;

/// Label names on `smart_attr`, kept in alphabetical order to match the
/// encoded output.
const ATTR_LABELS: &[&str] = &["device", "device_protocol", "device_type", "id", "name"];

/// Pre-allocated capacity for the encode buffer.
const BUFFER_CAP: usize = 64 * 1024;

/// Renders a collection outcome as Prometheus text exposition format.
pub fn render(outcome: &CollectOutcome, config: &Config) -> Result<String, prometheus::Error> {
    let registry = Registry::new();

    let smart_attr = GaugeVec::new(
        Opts::new("smart_attr", "SMART attribute value as reported by smartctl"),
        ATTR_LABELS,
    )?;
    registry.register(Box::new(smart_attr.clone()))?;

    for report in &outcome.reports {
        let device = &report.device;
        let device_name = device.basename();
        for (attr, value) in &report.attributes {
            // NVMe attributes carry no id; an empty label value is equivalent
            // to the label being absent.
            let id = attr.id.map(|id| id.to_string()).unwrap_or_default();
            smart_attr
                .with_label_values(&[
                    device_name,
                    &device.protocol,
                    &device.device_type,
                    &id,
                    &attr.name,
                ])
                .set(*value as f64);
        }
    }

    if config.enable_telemetry.unwrap_or(true) {
        register_telemetry(&registry, outcome)?;
    }

    encode(&registry)
}

/// Registers the collector's own telemetry gauges.
fn register_telemetry(registry: &Registry, outcome: &CollectOutcome) -> Result<(), prometheus::Error> {
    let duration = Gauge::new(
        "smart_collector_collect_duration_seconds",
        "Time spent scanning and probing devices during the last collection cycle",
    )?;
    duration.set(outcome.duration.as_secs_f64());
    registry.register(Box::new(duration))?;

    let probed = Gauge::new(
        "smart_collector_devices_probed",
        "Number of devices probed by the last collection cycle",
    )?;
    probed.set(outcome.devices_probed as f64);
    registry.register(Box::new(probed))?;

    let failed = Gauge::new(
        "smart_collector_devices_failed",
        "Number of devices whose probe failed during the last collection cycle",
    )?;
    failed.set(outcome.devices_failed as f64);
    registry.register(Box::new(failed))?;

    let timestamp = Gauge::new(
        "smart_collector_last_collect_timestamp_seconds",
        "Unix timestamp of the last completed collection cycle",
    )?;
    timestamp.set(chrono::Utc::now().timestamp() as f64);
    registry.register(Box::new(timestamp))?;

    Ok(())
}

/// Encodes every family of the registry into the text exposition format.
fn encode(registry: &Registry) -> Result<String, prometheus::Error> {
    let mut buffer = Vec::with_capacity(BUFFER_CAP);
    let encoder = TextEncoder::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|error| prometheus::Error::Msg(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;
    use crate::collector::DeviceReport;
    use crate::device::Device;
    use std::time::Duration;

    fn outcome_with(reports: Vec<DeviceReport>) -> CollectOutcome {
        let devices_probed = reports.len();
        CollectOutcome {
            reports,
            devices_probed,
            devices_failed: 0,
            duration: Duration::from_millis(1500),
        }
    }

    fn sat_report() -> DeviceReport {
        DeviceReport {
            device: Device {
                name: "/dev/sda".to_string(),
                device_type: "sat".to_string(),
                protocol: "ATA".to_string(),
            },
            attributes: vec![(
                Attribute {
                    name: "Reallocated_Sector_Ct".to_string(),
                    id: Some(5),
                },
                3,
            )],
        }
    }

    fn nvme_report() -> DeviceReport {
        DeviceReport {
            device: Device {
                name: "/dev/nvme0".to_string(),
                device_type: "nvme".to_string(),
                protocol: "NVMe".to_string(),
            },
            attributes: vec![(
                Attribute {
                    name: "temperature".to_string(),
                    id: None,
                },
                38,
            )],
        }
    }

    #[test]
    fn test_render_emits_type_and_help() {
        let rendered = render(&outcome_with(vec![sat_report()]), &Config::default()).unwrap();
        assert!(rendered.contains("# HELP smart_attr SMART attribute value as reported by smartctl"));
        assert!(rendered.contains("# TYPE smart_attr gauge"));
    }

    #[test]
    fn test_render_ata_sample_with_id_label() {
        let rendered = render(&outcome_with(vec![sat_report()]), &Config::default()).unwrap();
        assert!(rendered.contains(
            "smart_attr{device=\"sda\",device_protocol=\"ATA\",device_type=\"sat\",\
             id=\"5\",name=\"Reallocated_Sector_Ct\"} 3"
        ));
    }

    #[test]
    fn test_render_nvme_sample_with_empty_id() {
        let rendered = render(&outcome_with(vec![nvme_report()]), &Config::default()).unwrap();
        assert!(rendered.contains(
            "smart_attr{device=\"nvme0\",device_protocol=\"NVMe\",device_type=\"nvme\",\
             id=\"\",name=\"temperature\"} 38"
        ));
    }

    #[test]
    fn test_render_keeps_unusual_device_type_label() {
        let mut report = sat_report();
        report.device.device_type = "megaraid,24".to_string();
        let rendered = render(&outcome_with(vec![report]), &Config::default()).unwrap();
        assert!(rendered.contains("device_type=\"megaraid,24\""));
    }

    #[test]
    fn test_render_includes_telemetry_by_default() {
        let rendered = render(&outcome_with(vec![sat_report()]), &Config::default()).unwrap();
        assert!(rendered.contains("smart_collector_collect_duration_seconds 1.5"));
        assert!(rendered.contains("smart_collector_devices_probed 1"));
        assert!(rendered.contains("smart_collector_devices_failed 0"));
        assert!(rendered.contains("smart_collector_last_collect_timestamp_seconds"));
    }

    #[test]
    fn test_render_telemetry_can_be_disabled() {
        let config = Config {
            enable_telemetry: Some(false),
            ..Config::default()
        };
        let rendered = render(&outcome_with(vec![sat_report()]), &config).unwrap();
        assert!(!rendered.contains("smart_collector_"));
        assert!(rendered.contains("smart_attr{"));
    }

    #[test]
    fn test_render_empty_outcome_has_no_samples() {
        let config = Config {
            enable_telemetry: Some(false),
            ..Config::default()
        };
        let rendered = render(&outcome_with(vec![]), &config).unwrap();
        assert!(!rendered.contains("smart_attr{"));
    }

    #[test]
    fn test_render_counts_failures() {
        let mut outcome = outcome_with(vec![sat_report()]);
        outcome.devices_probed = 3;
        outcome.devices_failed = 2;
        let rendered = render(&outcome, &Config::default()).unwrap();
        assert!(rendered.contains("smart_collector_devices_probed 3"));
        assert!(rendered.contains("smart_collector_devices_failed 2"));
    }
}
