//! System-wide uninstallation command for smart-textfile-collector.
//!
//! This module implements the `uninstall` subcommand which removes:
//! - systemd timer and service (stop, disable, remove unit files)
//! - Installed binary from /usr/local/sbin
//! - Configuration from /etc/smart-textfile-collector
//! - Optionally (--purge) the written .prom file

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use crate::commands::install::{CONFIG_DIR, INSTALL_PATH, SERVICE_PATH, TIMER_PATH};
use crate::config::DEFAULT_PROM_FILE;

/// Main uninstallation command handler
pub fn command_uninstall(skip_confirm: bool, purge: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("🗑️  SMART Textfile Collector - System Uninstallation");
    println!("====================================================\n");

    // 1. Root-Check
    if !is_root() {
        eprintln!("❌ Uninstallation requires root privileges");
        eprintln!("   Run with: sudo smart-textfile-collector uninstall");
        std::process::exit(1);
    }

    // 2. Check if actually installed
    if !Path::new(INSTALL_PATH).exists() {
        eprintln!("⚠️  smart-textfile-collector does not appear to be installed.");
        eprintln!("   Binary not found at: {}", INSTALL_PATH);
        std::process::exit(1);
    }

    // 3. Confirmation prompt (unless --yes)
    if !skip_confirm {
        println!("⚠️  This will remove:");
        println!("   • systemd timer and service (stopped and disabled)");
        println!("   • Binary: {}", INSTALL_PATH);
        println!("   • Configuration: {}/", CONFIG_DIR);
        if purge {
            println!("   • Metrics file: {}", DEFAULT_PROM_FILE);
        } else {
            println!("\n   Note: the written .prom file is kept (pass --purge to remove it)");
        }
        println!("\nAre you sure you want to continue? (yes/no): ");

        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim().to_lowercase();

        if input != "yes" && input != "y" {
            println!("❌ Uninstallation cancelled.");
            std::process::exit(0);
        }
    }

    println!("\n🚀 Starting uninstallation...\n");

    // 4. Stop and disable the timer, then the service
    if Path::new(TIMER_PATH).exists() {
        println!("🛑 Stopping systemd timer...");
        systemctl_quiet("stop", "smart-textfile-collector.timer", "Timer stopped");

        println!("❌ Disabling systemd timer...");
        systemctl_quiet("disable", "smart-textfile-collector.timer", "Timer disabled");
    } else {
        println!("ℹ️  systemd timer not found, skipping timer removal");
    }

    if Path::new(SERVICE_PATH).exists() {
        println!("🛑 Stopping systemd service...");
        systemctl_quiet("stop", "smart-textfile-collector.service", "Service stopped");
    }

    println!("🗑️  Removing systemd unit files...");
    remove_unit_files()?;

    println!("🔄 Reloading systemd...");
    systemd_daemon_reload()?;

    // 5. Remove binary
    println!("🗑️  Removing binary...");
    remove_binary()?;

    // 6. Remove configuration
    println!("🗑️  Removing configuration...");
    remove_config()?;

    // 7. Remove the metrics file when purging
    if purge {
        println!("🗑️  Removing metrics file...");
        remove_prom_file()?;
    }

    println!("\n✅ Uninstallation complete!");
    println!("   System has been returned to pre-installation state.");

    Ok(())
}

/// Check if the current process is running as root
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Run a systemctl verb on a unit, tolerating failure
fn systemctl_quiet(verb: &str, unit: &str, success_msg: &str) {
    let result = Command::new("systemctl").args([verb, unit]).status();

    match result {
        Ok(status) if status.success() => {
            println!("   ✅ {}", success_msg);
        }
        _ => {
            println!("   ⚠️  Failed to {} {} (may not be active)", verb, unit);
        }
    }
}

/// Remove the systemd service and timer unit files
fn remove_unit_files() -> Result<(), Box<dyn std::error::Error>> {
    for unit_path in [TIMER_PATH, SERVICE_PATH] {
        if Path::new(unit_path).exists() {
            fs::remove_file(unit_path)?;
            println!("   ✅ Removed: {}", unit_path);
        } else {
            println!("   ℹ️  Unit file not found: {} (skipping)", unit_path);
        }
    }

    Ok(())
}

/// Reload systemd daemon
fn systemd_daemon_reload() -> Result<(), Box<dyn std::error::Error>> {
    Command::new("systemctl").arg("daemon-reload").status()?;
    println!("   ✅ systemd reloaded");
    Ok(())
}

/// Remove the binary from /usr/local/sbin
fn remove_binary() -> Result<(), Box<dyn std::error::Error>> {
    if Path::new(INSTALL_PATH).exists() {
        fs::remove_file(INSTALL_PATH)?;
        println!("   ✅ Binary removed: {}", INSTALL_PATH);
    } else {
        println!("   ⚠️  Binary not found, skipping");
    }

    Ok(())
}

/// Remove configuration directory and files
fn remove_config() -> Result<(), Box<dyn std::error::Error>> {
    if Path::new(CONFIG_DIR).exists() {
        fs::remove_dir_all(CONFIG_DIR)?;
        println!("   ✅ Configuration removed: {}", CONFIG_DIR);
    } else {
        println!("   ℹ️  Configuration directory not found, skipping");
    }

    Ok(())
}

/// Remove the default .prom file written by the collector
fn remove_prom_file() -> Result<(), Box<dyn std::error::Error>> {
    if Path::new(DEFAULT_PROM_FILE).exists() {
        fs::remove_file(DEFAULT_PROM_FILE)?;
        println!("   ✅ Metrics file removed: {}", DEFAULT_PROM_FILE);
    } else {
        println!("   ℹ️  Metrics file not found, skipping");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_root() {
        // Just testing that the function is callable
        // Result depends on whether test is run as root
        let _ = is_root();
    }
}
