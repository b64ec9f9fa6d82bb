//! Check command implementation.
//!
//! Validates system requirements and configuration.

use std::path::PathBuf;

use crate::config::{validate_effective_config, Config, DEFAULT_PROM_FILE};
use crate::device::filter_devices;
use crate::smartctl::Smartctl;

/// Validates system requirements and configuration.
pub async fn command_check(
    probe: bool,
    all: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 SMART Textfile Collector - System Check");
    println!("==========================================");

    let mut all_ok = true;
    let smartctl = Smartctl::from_config(config);

    // Check smartctl availability
    println!("\n🔧 Checking smartctl...");
    match smartctl.version().await {
        Ok(version) => {
            println!("   ✅ smartctl {} available", version);
        }
        Err(e) => {
            println!("   ❌ smartctl not usable: {}", e);
            all_ok = false;
        }
    }

    // Check device scan
    println!("\n💽 Scanning for SMART-capable devices...");
    let devices = match smartctl.scan().await {
        Ok(devices) => {
            let devices = filter_devices(devices, config);
            if devices.is_empty() {
                println!("   ⚠️  No devices found (empty scan or everything filtered out)");
            } else {
                println!("   ✅ {} devices found", devices.len());
                for device in &devices {
                    println!("      • {} ({}, {})", device.name, device.device_type, device.protocol);
                }
            }
            devices
        }
        Err(e) => {
            println!("   ❌ Device scan failed: {}", e);
            all_ok = false;
            Vec::new()
        }
    };

    // Probe each device
    if probe || all {
        println!("\n🩺 Probing devices...");
        if devices.is_empty() {
            println!("   ℹ️  Nothing to probe");
        }
        for device in &devices {
            match smartctl.probe(device).await {
                Ok(report) => {
                    let attributes = crate::attributes::extract_attributes(&report, device);
                    if attributes.is_empty() {
                        println!("   ⚠️  {} probed but no attributes extracted", device);
                    } else {
                        println!("   ✅ {} reports {} attributes", device, attributes.len());
                    }
                }
                Err(e) => {
                    println!("   ❌ Failed to probe {}: {}", device, e);
                    all_ok = false;
                }
            }
        }
    }

    // Check output path
    println!("\n📁 Checking output path...");
    let prom_file = config
        .prom_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROM_FILE));
    match prom_file.parent() {
        Some(parent) if parent.exists() => {
            println!("   ✅ Output directory {} exists", parent.display());
        }
        Some(parent) if !parent.as_os_str().is_empty() => {
            println!(
                "   ⚠️  Output directory {} missing, it will be created on first write",
                parent.display()
            );
        }
        _ => {}
    }

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - collector is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
