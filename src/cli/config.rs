use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::api::modbus::{
    SimulatorBuilder, DEFAULT_BAUD_RATE, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};

/// Root configuration structure of a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorFileConfig {
    /// Port name
    #[serde(default)]
    pub port_name: Option<String>,
    /// Port communication configuration (baud rate)
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Bounded read timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Pause between loop iterations in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Irradiance reported before the first tick
    #[serde(default)]
    pub initial_value: u16,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for SimulatorFileConfig {
    fn default() -> Self {
        Self {
            port_name: None,
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            initial_value: 0,
        }
    }
}

impl SimulatorFileConfig {
    /// Parse configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Read configuration from a file; `.toml` files are parsed as TOML, anything else as JSON
    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let path = file_path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

        if is_toml {
            Self::from_toml(&content)
                .map_err(|err| anyhow!("Invalid TOML config {}: {err}", path.display()))
        } else {
            Self::from_json(&content)
                .map_err(|err| anyhow!("Invalid JSON config {}: {err}", path.display()))
        }
    }

    /// Convert to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Seed a builder with these settings
    pub fn into_builder(self) -> SimulatorBuilder {
        let builder = SimulatorBuilder::new()
            .with_baud_rate(self.baud_rate)
            .with_timeout(self.timeout_ms)
            .with_poll_interval(self.poll_interval_ms)
            .with_initial_value(self.initial_value);
        match self.port_name {
            Some(port) => builder.with_port(&port),
            None => builder,
        }
    }
}
