//! Integration tests for configuration loading, merging and validation.
//!
//! Precedence under test: CLI arguments win over config file values, which
//! win over built-in defaults.

use std::path::PathBuf;

use clap::Parser;
use smart_textfile_collector::cli::{Args, Commands};
use smart_textfile_collector::config::{
    load_config, resolve_config, validate_effective_config, Config, DEFAULT_PROM_FILE,
    DEFAULT_SMARTCTL_TIMEOUT_SECS,
};

fn args_from(argv: &[&str]) -> Args {
    let mut full = vec!["smart-textfile-collector"];
    full.extend_from_slice(argv);
    Args::try_parse_from(full).unwrap()
}

#[test]
fn test_default_config_values() {
    let config = Config::default();
    assert_eq!(config.prom_file, Some(PathBuf::from(DEFAULT_PROM_FILE)));
    assert_eq!(config.smartctl_path.as_deref(), Some("smartctl"));
    assert_eq!(
        config.smartctl_timeout_secs,
        Some(DEFAULT_SMARTCTL_TIMEOUT_SECS)
    );
    assert_eq!(config.interval_secs, None);
    assert_eq!(config.enable_telemetry, Some(true));
    assert!(validate_effective_config(&config).is_ok());
}

#[test]
fn test_cli_overrides_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        "prom-file: /srv/metrics/file-value.prom\nsmartctl-timeout-secs: 5\n",
    )
    .unwrap();

    let args = args_from(&[
        "-c",
        config_path.to_str().unwrap(),
        "-f",
        "/srv/metrics/cli-value.prom",
    ]);
    let config = resolve_config(&args).unwrap();

    // CLI wins for prom_file, the file value survives for the timeout.
    assert_eq!(
        config.prom_file,
        Some(PathBuf::from("/srv/metrics/cli-value.prom"))
    );
    assert_eq!(config.smartctl_timeout_secs, Some(5));
}

#[test]
fn test_kebab_and_snake_case_keys_both_parse() {
    let dir = tempfile::tempdir().unwrap();

    let kebab = dir.path().join("kebab.yaml");
    std::fs::write(&kebab, "smartctl-timeout-secs: 11\nenable-telemetry: false\n").unwrap();
    let config = load_config(kebab.to_str()).unwrap();
    assert_eq!(config.smartctl_timeout_secs, Some(11));
    assert_eq!(config.enable_telemetry, Some(false));

    let snake = dir.path().join("snake.yaml");
    std::fs::write(&snake, "smartctl_timeout_secs: 12\nenable_telemetry: true\n").unwrap();
    let config = load_config(snake.to_str()).unwrap();
    assert_eq!(config.smartctl_timeout_secs, Some(12));
    assert_eq!(config.enable_telemetry, Some(true));
}

#[test]
fn test_load_json_and_toml_formats() {
    let dir = tempfile::tempdir().unwrap();

    let json = dir.path().join("config.json");
    std::fs::write(
        &json,
        r#"{"prom_file": "/tmp/json.prom", "include_devices": ["/dev/sda"]}"#,
    )
    .unwrap();
    let config = load_config(json.to_str()).unwrap();
    assert_eq!(config.prom_file, Some(PathBuf::from("/tmp/json.prom")));
    assert_eq!(
        config.include_devices,
        Some(vec!["/dev/sda".to_string()])
    );

    let toml = dir.path().join("config.toml");
    std::fs::write(&toml, "prom_file = \"/tmp/toml.prom\"\ninterval_secs = 120\n").unwrap();
    let config = load_config(toml.to_str()).unwrap();
    assert_eq!(config.prom_file, Some(PathBuf::from("/tmp/toml.prom")));
    assert_eq!(config.interval_secs, Some(120));
}

#[test]
fn test_no_config_flag_ignores_file() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "smartctl-timeout-secs: 2\n").unwrap();

    let args = args_from(&["-c", config_path.to_str().unwrap(), "--no-config"]);
    let config = resolve_config(&args).unwrap();
    assert_eq!(
        config.smartctl_timeout_secs,
        Some(DEFAULT_SMARTCTL_TIMEOUT_SECS)
    );
}

#[test]
fn test_device_flags_are_repeatable() {
    let args = args_from(&["-d", "/dev/sda", "-d", "sdb", "--exclude-device", "sdc"]);
    let config = resolve_config(&args).unwrap();

    assert_eq!(
        config.include_devices,
        Some(vec!["/dev/sda".to_string(), "sdb".to_string()])
    );
    assert_eq!(config.exclude_devices, Some(vec!["sdc".to_string()]));
}

#[test]
fn test_disable_telemetry_flag() {
    let args = args_from(&["--disable-telemetry"]);
    let config = resolve_config(&args).unwrap();
    assert_eq!(config.enable_telemetry, Some(false));
}

#[test]
fn test_install_rejects_zero_timer_interval() {
    // A zero interval would make systemd re-trigger the oneshot continuously.
    let result = Args::try_parse_from([
        "smart-textfile-collector",
        "install",
        "--timer-interval",
        "0",
    ]);
    assert!(result.is_err());

    let args = args_from(&["install", "--timer-interval", "15"]);
    match args.command {
        Some(Commands::Install { timer_interval, .. }) => assert_eq!(timer_interval, 15),
        other => panic!("expected install, got {:?}", other),
    }
}

#[test]
fn test_validate_rejects_non_prom_extension() {
    let config = Config {
        prom_file: Some(PathBuf::from("/var/lib/prometheus/node-exporter/smart.txt")),
        ..Config::default()
    };
    let err = validate_effective_config(&config).unwrap_err();
    assert!(err.to_string().contains(".prom"));
}

#[test]
fn test_validate_rejects_empty_prom_file() {
    let config = Config {
        prom_file: Some(PathBuf::new()),
        ..Config::default()
    };
    let err = validate_effective_config(&config).unwrap_err();
    assert!(err.to_string().contains("empty"));
}

#[test]
fn test_validate_rejects_zero_timeout_and_interval() {
    let config = Config {
        smartctl_timeout_secs: Some(0),
        ..Config::default()
    };
    assert!(validate_effective_config(&config).is_err());

    let config = Config {
        interval_secs: Some(0),
        ..Config::default()
    };
    assert!(validate_effective_config(&config).is_err());
}

#[test]
fn test_validate_rejects_overlapping_device_filters() {
    let config = Config {
        include_devices: Some(vec!["/dev/sda".to_string(), "/dev/sdb".to_string()]),
        exclude_devices: Some(vec!["/dev/sdb".to_string()]),
        ..Config::default()
    };
    let err = validate_effective_config(&config).unwrap_err();
    assert!(err.to_string().contains("/dev/sdb"));
}

#[test]
fn test_missing_config_file_falls_back_to_defaults() {
    let config = load_config(Some("/nonexistent/path/config.yaml")).unwrap();
    assert_eq!(config.prom_file, Some(PathBuf::from(DEFAULT_PROM_FILE)));
}
