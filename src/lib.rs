//! SMART Textfile Collector Library
//!
//! This library provides the collection pipeline behind the
//! smart-textfile-collector binary: invoking smartctl, extracting SMART
//! attributes from its JSON reports, rendering Prometheus text exposition
//! format, and atomically replacing a .prom file for the node exporter
//! textfile collector.
//!
//! # Features
//!
//! - **Device Discovery**: Enumerate SMART-capable devices via `smartctl --scan`
//! - **Attribute Extraction**: ATA attribute tables and NVMe health logs
//! - **Textfile Output**: Atomic tmp-and-rename replacement of the .prom file
//! - **Concurrent Probing**: All devices probed in parallel with per-invocation timeouts
//!
//! # Usage
//!
//! ```rust
//! use smart_textfile_collector::attributes::sanitize_attr_name;
//!
//! // Attribute names become Prometheus label values
//! let name = sanitize_attr_name("Airflow Temperature (Cel)").unwrap();
//! assert_eq!(name, "Airflow_Temperature_Cel");
//!
//! assert_eq!(sanitize_attr_name("???"), None);
//! ```

pub mod attributes;
pub mod cli;
pub mod collector;
pub mod config;
pub mod device;
pub mod exposition;
pub mod smartctl;
pub mod textfile;

// Re-export main types for convenience
pub use attributes::{Attribute, AttributeSet};
pub use collector::{CollectOutcome, DeviceReport};
pub use config::Config;
pub use device::Device;
pub use smartctl::{Smartctl, SmartctlError};
