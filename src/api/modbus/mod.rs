pub mod core;
pub mod record;
pub mod slave;
pub mod traits;
pub mod transport;

use anyhow::{anyhow, Result};
use std::{sync::Arc, time::Duration};

use crate::protocol::device::MAX_MEASUREMENT;

pub use self::core::{run_simulation_loop, simulation_step, LoopTiming};
pub use record::ExchangeRecord;
pub use slave::ModbusSimulator;
pub use traits::{LoggingHook, NoOpHook, SimulatorHook, Transport};
pub use transport::SerialTransport;

pub use crate::cli::modbus::handlers::{FlumeExchangeHook, SimulatorControl};

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_TIMEOUT_MS: u64 = 100;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Validated settings of one simulated device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    pub port_name: String,
    pub baud_rate: u32,
    /// Bounded read timeout (milliseconds) for each poll of the port.
    pub timeout_ms: u64,
    /// Pause (milliseconds) between two loop iterations.
    pub poll_interval_ms: u64,
    /// Reading reported before the first one-second tick.
    pub initial_value: u16,
}

impl SimulatorConfig {
    pub fn timing(&self) -> LoopTiming {
        LoopTiming {
            read_timeout: Duration::from_millis(self.timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
        }
    }
}

/// Builder for simulator configurations.
///
/// # Example
///
/// ```no_run
/// use pyrsim::api::modbus::{LoggingHook, SimulatorBuilder};
/// use std::sync::Arc;
///
/// let simulator = SimulatorBuilder::new()
///     .with_port("/dev/ttyUSB0")
///     .with_baud_rate(9600)
///     .add_hook(Arc::new(LoggingHook))
///     .build_simulator()?;
/// simulator.join()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct SimulatorBuilder {
    port_name: Option<String>,
    baud_rate: u32,
    timeout_ms: u64,
    poll_interval_ms: u64,
    initial_value: u16,
    hooks: Vec<Arc<dyn SimulatorHook>>,
}

impl Default for SimulatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorBuilder {
    pub fn new() -> Self {
        Self {
            port_name: None,
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            initial_value: 0,
            hooks: Vec::new(),
        }
    }

    /// Set the serial port name.
    pub fn with_port(mut self, port_name: &str) -> Self {
        self.port_name = Some(port_name.to_string());
        self
    }

    /// Set the baud rate.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the read timeout in milliseconds.
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the pause between loop iterations in milliseconds.
    pub fn with_poll_interval(mut self, interval_ms: u64) -> Self {
        self.poll_interval_ms = interval_ms;
        self
    }

    /// Set the starting irradiance (0..=2000).
    pub fn with_initial_value(mut self, value: u16) -> Self {
        self.initial_value = value;
        self
    }

    /// Add a hook (can be called multiple times, hooks run in insertion order)
    pub fn add_hook(mut self, hook: Arc<dyn SimulatorHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.baud_rate == 0 {
            return Err(anyhow!("Baud rate must be greater than zero"));
        }
        if self.timeout_ms == 0 {
            return Err(anyhow!("Read timeout must be greater than zero"));
        }
        if self.initial_value > MAX_MEASUREMENT {
            return Err(anyhow!(
                "Initial value {} is out of range (0..={MAX_MEASUREMENT})",
                self.initial_value
            ));
        }
        Ok(())
    }

    fn into_parts(self) -> Result<(SimulatorConfig, Vec<Arc<dyn SimulatorHook>>)> {
        self.validate()?;
        let port_name = self
            .port_name
            .ok_or_else(|| anyhow!("Port name is required. Use with_port()"))?;

        let config = SimulatorConfig {
            port_name,
            baud_rate: self.baud_rate,
            timeout_ms: self.timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
            initial_value: self.initial_value,
        };
        Ok((config, self.hooks))
    }

    /// Build the configuration only.
    pub fn build(self) -> Result<SimulatorConfig> {
        Ok(self.into_parts()?.0)
    }

    /// Open the serial port and start the simulator thread.
    pub fn build_simulator(self) -> Result<ModbusSimulator> {
        let (config, hooks) = self.into_parts()?;
        ModbusSimulator::start(config, hooks)
    }

    /// Start the simulator thread over a caller-provided transport.
    ///
    /// The port name is optional here and defaults to the transport's name.
    pub fn build_with_transport<T>(mut self, transport: T) -> Result<ModbusSimulator>
    where
        T: Transport + Send + 'static,
    {
        if self.port_name.is_none() {
            self.port_name = Some(transport.name().to_string());
        }
        let (config, hooks) = self.into_parts()?;
        ModbusSimulator::start_with_transport(transport, config, hooks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SimulatorBuilder::new().with_port("COM13").build().unwrap();
        assert_eq!(
            config,
            SimulatorConfig {
                port_name: "COM13".to_string(),
                baud_rate: 9600,
                timeout_ms: 100,
                poll_interval_ms: 10,
                initial_value: 0,
            }
        );
        assert_eq!(config.timing(), LoopTiming::default());
    }

    #[test]
    fn test_builder_requires_port() {
        let err = SimulatorBuilder::new().build().unwrap_err();
        assert!(err.to_string().contains("Port name is required"));
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        assert!(SimulatorBuilder::new()
            .with_port("COM1")
            .with_initial_value(2001)
            .build()
            .is_err());
        assert!(SimulatorBuilder::new()
            .with_port("COM1")
            .with_baud_rate(0)
            .build()
            .is_err());
        assert!(SimulatorBuilder::new()
            .with_port("COM1")
            .with_timeout(0)
            .build()
            .is_err());
    }

    #[test]
    fn test_builder_overrides() {
        let config = SimulatorBuilder::new()
            .with_port("/dev/ttyUSB1")
            .with_baud_rate(19200)
            .with_timeout(250)
            .with_poll_interval(5)
            .with_initial_value(2000)
            .build()
            .unwrap();
        assert_eq!(config.baud_rate, 19200);
        assert_eq!(
            config.timing(),
            LoopTiming {
                read_timeout: Duration::from_millis(250),
                poll_interval: Duration::from_millis(5),
            }
        );
        assert_eq!(config.initial_value, 2000);
    }
}
