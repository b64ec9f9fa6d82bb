//! System-wide installation command for smart-textfile-collector.
//!
//! This module implements the `install` subcommand which sets up:
//! - Directory structure for config and textfile output
//! - Binary installation to /usr/local/sbin
//! - Default configuration file
//! - systemd service and timer units
//! - Automatic timer enablement and start

use crate::config::Config;
use serde_yaml;
use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;

pub const INSTALL_PATH: &str = "/usr/local/sbin/smart-textfile-collector";
pub const CONFIG_DIR: &str = "/etc/smart-textfile-collector";
pub const CONFIG_PATH: &str = "/etc/smart-textfile-collector/config.yaml";
pub const SERVICE_PATH: &str = "/etc/systemd/system/smart-textfile-collector.service";
pub const TIMER_PATH: &str = "/etc/systemd/system/smart-textfile-collector.timer";
const OUTPUT_DIR: &str = "/var/lib/prometheus/node-exporter";

/// systemd service unit for smart-textfile-collector
///
/// The service is a oneshot: each activation runs a single collection cycle
/// and exits. No [Install] section: the timer is the only thing that starts
/// it. Runs as root (smartctl needs raw device access) at idle priority.
const SERVICE_UNIT: &str = r#"[Unit]
Description=SMART textfile collector for the Prometheus node exporter
Documentation=https://github.com/jgeboski/prometheus-smart-collector
After=local-fs.target

[Service]
Type=oneshot
User=root
Group=root
ExecStart=/usr/local/sbin/smart-textfile-collector
Nice=19
IOSchedulingClass=idle
"#;

/// Renders the systemd timer unit driving the periodic collection.
fn timer_unit(interval_minutes: u64) -> String {
    format!(
        "[Unit]\n\
         Description=Periodic SMART textfile collection\n\
         \n\
         [Timer]\n\
         OnBootSec=2min\n\
         OnUnitActiveSec={}min\n\
         AccuracySec=1min\n\
         \n\
         [Install]\n\
         WantedBy=timers.target\n",
        interval_minutes
    )
}

/// Main installation command handler
pub fn command_install(
    no_timer: bool,
    force: bool,
    timer_interval: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 SMART Textfile Collector - System Installation");
    println!("=================================================\n");

    // 1. Root-Check
    if !is_root() {
        eprintln!("❌ Installation requires root privileges");
        eprintln!("   Run with: sudo smart-textfile-collector install");
        std::process::exit(1);
    }

    // 2. Check if already installed (when not --force)
    if !force && Path::new(INSTALL_PATH).exists() {
        eprintln!("⚠️  smart-textfile-collector already installed. Use --force to reinstall.");
        std::process::exit(1);
    }

    // 3. Create directory structure
    println!("📁 Creating directory structure...");
    create_directories()?;

    // 4. Copy binary
    println!("📦 Installing binary...");
    install_binary()?;

    // 5. Generate default config
    println!("⚙️  Generating default configuration...");
    generate_default_config()?;

    // 6. Install systemd units
    println!("🔧 Installing systemd units...");
    install_systemd_units(timer_interval)?;

    if !no_timer {
        println!("🔄 Reloading systemd...");
        systemd_daemon_reload()?;

        println!("✅ Enabling timer...");
        systemd_enable_timer()?;

        println!("🚀 Starting timer...");
        systemd_start_timer()?;
    }

    println!("\n✅ Installation complete!");
    println!("\nNext steps:");
    println!("  • Check the timer:  systemctl list-timers smart-textfile-collector.timer");
    println!("  • View logs:        journalctl -u smart-textfile-collector.service");
    println!("  • Inspect metrics:  cat /var/lib/prometheus/node-exporter/smart.prom");

    Ok(())
}

/// Check if the current process is running as root
fn is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Create the config and textfile output directories
fn create_directories() -> Result<(), Box<dyn std::error::Error>> {
    for dir in [CONFIG_DIR, OUTPUT_DIR] {
        fs::create_dir_all(dir)?;
        set_permissions(dir, 0o755)?;
    }

    println!("   ✅ Directory structure created");
    Ok(())
}

/// Install the binary to /usr/local/sbin
fn install_binary() -> Result<(), Box<dyn std::error::Error>> {
    let current_exe = env::current_exe()?;

    fs::copy(&current_exe, INSTALL_PATH)?;
    set_permissions(INSTALL_PATH, 0o755)?;

    println!("   ✅ Binary installed to {}", INSTALL_PATH);
    Ok(())
}

/// Generate default configuration file, keeping an existing one in place
fn generate_default_config() -> Result<(), Box<dyn std::error::Error>> {
    if Path::new(CONFIG_PATH).exists() {
        println!("   ℹ️  Config already exists at {}, leaving it in place", CONFIG_PATH);
        return Ok(());
    }

    let config = Config::default();
    let yaml = serde_yaml::to_string(&config)?;

    fs::write(CONFIG_PATH, yaml)?;
    set_permissions(CONFIG_PATH, 0o644)?;

    println!("   ✅ Config written to {}", CONFIG_PATH);
    Ok(())
}

/// Install systemd service and timer unit files
fn install_systemd_units(timer_interval: u64) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(SERVICE_PATH, SERVICE_UNIT)?;
    fs::write(TIMER_PATH, timer_unit(timer_interval))?;
    println!("   ✅ systemd units installed (every {} minutes)", timer_interval);
    Ok(())
}

/// Reload systemd daemon to pick up new unit files
fn systemd_daemon_reload() -> Result<(), Box<dyn std::error::Error>> {
    Command::new("systemctl").arg("daemon-reload").status()?;
    Ok(())
}

/// Enable the smart-textfile-collector timer
fn systemd_enable_timer() -> Result<(), Box<dyn std::error::Error>> {
    Command::new("systemctl")
        .args(["enable", "smart-textfile-collector.timer"])
        .status()?;
    Ok(())
}

/// Start the smart-textfile-collector timer
fn systemd_start_timer() -> Result<(), Box<dyn std::error::Error>> {
    Command::new("systemctl")
        .args(["start", "smart-textfile-collector.timer"])
        .status()?;
    Ok(())
}

/// Set file permissions using Unix mode
fn set_permissions(path: &str, mode: u32) -> Result<(), Box<dyn std::error::Error>> {
    let metadata = fs::metadata(path)?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(mode);
    fs::set_permissions(path, permissions)?;
    Ok(())
}
