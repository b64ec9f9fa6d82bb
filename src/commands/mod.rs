//! CLI command implementations for smart-textfile-collector.
//!
//! This module provides implementations for all CLI subcommands:
//! - `scan`: Device discovery listing
//! - `test`: Collection testing without writing the .prom file
//! - `check`: System validation
//! - `config`: Configuration file generation
//! - `install`: System-wide installation
//! - `uninstall`: System-wide uninstallation

pub mod check;
pub mod config;
pub mod install;
pub mod scan;
pub mod test;
pub mod uninstall;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use install::command_install;
pub use scan::command_scan;
pub use test::command_test;
pub use uninstall::command_uninstall;
