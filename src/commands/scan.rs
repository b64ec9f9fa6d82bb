//! Scan command implementation.
//!
//! Lists SMART-capable devices found by smartctl.

use serde_json::Value;

use crate::config::Config;
use crate::device::filter_devices;
use crate::smartctl::Smartctl;

/// Lists discovered devices, optionally with model and health details.
pub async fn command_scan(verbose: bool, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("💽 SMART Textfile Collector - Device Scan");
    println!("=========================================");

    let smartctl = Smartctl::from_config(config);
    let devices = filter_devices(smartctl.scan().await?, config);

    if devices.is_empty() {
        println!("\nNo SMART-capable devices found.");
        println!("(Check filters and whether smartctl can open devices as this user.)");
        return Ok(());
    }

    for device in &devices {
        println!("\n🏷️  {} ({}, {})", device.name, device.device_type, device.protocol);

        if verbose {
            match smartctl.probe(device).await {
                Ok(report) => {
                    if let Some(model) = report.get("model_name").and_then(Value::as_str) {
                        println!("   ├─ Model: {}", model);
                    }
                    if let Some(serial) = report.get("serial_number").and_then(Value::as_str) {
                        println!("   ├─ Serial: {}", serial);
                    }
                    match report.pointer("/smart_status/passed").and_then(Value::as_bool) {
                        Some(true) => println!("   └─ SMART status: passed"),
                        Some(false) => println!("   └─ SMART status: FAILED"),
                        None => println!("   └─ SMART status: unknown"),
                    }
                }
                Err(e) => {
                    println!("   └─ ❌ Probe failed: {}", e);
                }
            }
        }
    }

    println!("\n📋 Total: {} devices", devices.len());

    Ok(())
}
