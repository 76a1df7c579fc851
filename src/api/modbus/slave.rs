use anyhow::{anyhow, Result};
use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use super::{
    core::run_simulation_loop,
    record::ExchangeRecord,
    traits::{SimulatorHook, Transport},
    transport::SerialTransport,
    SimulatorConfig,
};
use crate::{
    cli::modbus::handlers::{FlumeExchangeHook, SimulatorControl},
    protocol::device::DeviceState,
};

/// Handle to a simulator running on its own thread
///
/// The thread owns the transport and the device state; this handle only
/// sees copies of the answered exchanges.
pub struct ModbusSimulator {
    receiver: flume::Receiver<ExchangeRecord>,
    control: SimulatorControl,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl ModbusSimulator {
    /// Open the configured serial port and start answering requests
    pub fn start(config: SimulatorConfig, hooks: Vec<Arc<dyn SimulatorHook>>) -> Result<Self> {
        let transport = SerialTransport::open(
            &config.port_name,
            config.baud_rate,
            Duration::from_millis(config.timeout_ms),
        )?;
        Self::start_with_transport(transport, config, hooks)
    }

    /// Start the simulator over any transport (pty, in-memory, ...)
    pub fn start_with_transport<T>(
        transport: T,
        config: SimulatorConfig,
        mut hooks: Vec<Arc<dyn SimulatorHook>>,
    ) -> Result<Self>
    where
        T: Transport + Send + 'static,
    {
        let mut state = DeviceState::with_value(config.initial_value, Instant::now())?;
        let timing = config.timing();

        let (flume_hook, receiver) = FlumeExchangeHook::new();
        let control = flume_hook.get_control_handle();
        hooks.push(Arc::new(flume_hook));

        let handle = thread::Builder::new()
            .name(format!("pyrsim-{}", config.port_name))
            .spawn(move || {
                let mut transport = transport;
                run_simulation_loop(&mut transport, &mut state, &hooks, timing)
            })
            .map_err(|err| anyhow!("Failed to spawn simulation thread: {err}"))?;

        Ok(Self {
            receiver,
            control,
            handle: Some(handle),
        })
    }

    /// Try to receive an exchange without blocking
    pub fn try_recv(&self) -> Option<ExchangeRecord> {
        self.receiver.try_recv().ok()
    }

    /// Receive an exchange with timeout
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ExchangeRecord> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Get the underlying receiver for advanced usage
    ///
    /// Iteration ends once the simulation thread has exited.
    pub fn receiver(&self) -> &flume::Receiver<ExchangeRecord> {
        &self.receiver
    }

    /// A cloneable handle that can stop the loop from another thread (e.g. a Ctrl-C handler)
    pub fn control(&self) -> SimulatorControl {
        self.control.clone()
    }

    /// Ask the loop to exit at its next iteration boundary
    pub fn stop(&self) {
        self.control.stop();
    }

    /// Whether the simulation thread has exited
    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .is_none_or(|handle| handle.is_finished())
    }

    /// Wait for the simulation thread and return how the loop ended
    pub fn join(mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| anyhow!("Simulation thread panicked"))?,
            None => Ok(()),
        }
    }
}

impl Drop for ModbusSimulator {
    fn drop(&mut self) {
        self.control.stop();
    }
}
