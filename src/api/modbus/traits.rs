/// Core simulator traits - the seams between the protocol engine and the outside world
///
/// `Transport` is the duplex byte channel the loop polls. `SimulatorHook` lets
/// callers observe what the device answers and decide when the loop stops.
/// Neither depends on a concrete serial port or channel implementation.
use anyhow::Result;
use std::time::Duration;

use super::record::ExchangeRecord;
use crate::{protocol::modbus::RejectReason, utils::format_hex};

/// A duplex byte channel carrying Modbus RTU frames.
pub trait Transport {
    /// Read up to `max_bytes`, waiting at most `timeout` in total.
    ///
    /// Returning fewer bytes (including none) is a timeout, not an error.
    /// `Err` means the channel is gone and the simulator should stop.
    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>>;

    /// Write a whole frame.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Identifier used in logs and exchange records.
    fn name(&self) -> &str;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>> {
        (**self).read(max_bytes, timeout)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Observer of the simulation loop
///
/// Every method has a no-op default so implementations only override what
/// they care about.
pub trait SimulatorHook: Send + Sync {
    /// Called after a response has been written for an accepted request.
    ///
    /// Errors are logged by the loop and never stop it.
    fn on_exchange(&self, _record: &ExchangeRecord) -> Result<()> {
        Ok(())
    }

    /// Called for a complete frame the device chose not to answer.
    fn on_rejected(&self, _port: &str, _raw: &[u8], _reason: RejectReason) {}

    /// Called once with the transport failure that ends the loop.
    fn on_error(&self, _port: &str, _error: &anyhow::Error) {}

    /// Checked at the top of every iteration. Return false to stop the loop gracefully.
    fn should_continue(&self) -> bool {
        true
    }
}

/// No-op hook (useful for testing)
pub struct NoOpHook;

impl SimulatorHook for NoOpHook {}

/// Logging hook that prints every exchange to the log
pub struct LoggingHook;

impl SimulatorHook for LoggingHook {
    fn on_exchange(&self, record: &ExchangeRecord) -> Result<()> {
        log::info!(
            "Req: {} | Irr: {}",
            format_hex(&record.request),
            record.measurement
        );
        log::info!("Resp: {}", format_hex(&record.response));
        Ok(())
    }

    fn on_rejected(&self, port: &str, raw: &[u8], reason: RejectReason) {
        log::debug!("Ignored frame on {port}: {} ({reason})", format_hex(raw));
    }

    fn on_error(&self, port: &str, error: &anyhow::Error) {
        log::error!("Transport failure on {port}: {error}");
    }
}
