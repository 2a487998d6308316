//! Configuration management for the Airship tooling

pub mod config;
pub mod logging;

pub use config::{AppConfig, CommandConfig, LogFormat, LoggingConfig, OutputConfig};
