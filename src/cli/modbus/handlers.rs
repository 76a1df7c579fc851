/// Flume-backed simulator hooks used by the CLI
///
/// `FlumeExchangeHook` forwards every answered exchange through a channel and
/// doubles as the stop switch of the loop it is attached to.
use anyhow::Result;
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::api::modbus::{record::ExchangeRecord, traits::SimulatorHook};

/// Hook that sends exchange records through a flume channel
pub struct FlumeExchangeHook {
    sender: flume::Sender<ExchangeRecord>,
    running: Arc<AtomicBool>,
}

impl FlumeExchangeHook {
    /// Create a new hook with an unbounded channel
    pub fn new() -> (Self, flume::Receiver<ExchangeRecord>) {
        let (sender, receiver) = flume::unbounded();
        (Self::from_sender(sender), receiver)
    }

    /// Create a new hook with a bounded channel
    pub fn with_capacity(cap: usize) -> (Self, flume::Receiver<ExchangeRecord>) {
        let (sender, receiver) = flume::bounded(cap);
        (Self::from_sender(sender), receiver)
    }

    fn from_sender(sender: flume::Sender<ExchangeRecord>) -> Self {
        Self {
            sender,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Stop the loop (causes should_continue to return false)
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Get a handle to control this hook
    pub fn get_control_handle(&self) -> SimulatorControl {
        SimulatorControl {
            running: Arc::clone(&self.running),
        }
    }
}

impl SimulatorHook for FlumeExchangeHook {
    fn on_exchange(&self, record: &ExchangeRecord) -> Result<()> {
        if self.sender.is_full() {
            log::warn!("Exchange channel full, dropping record");
            return Ok(());
        }
        self.sender
            .send(record.clone())
            .map_err(|_| anyhow::anyhow!("Failed to send exchange: receiver dropped"))
    }

    fn should_continue(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Control handle for a running simulator
///
/// Allows external code (signal handlers, tests) to stop the loop gracefully
#[derive(Clone)]
pub struct SimulatorControl {
    running: Arc<AtomicBool>,
}

impl SimulatorControl {
    /// Request the loop to stop
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the loop is still meant to run
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Serialize a record as a single JSONL line
pub fn to_json_line<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}
