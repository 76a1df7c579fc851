/// Core simulation loop - pure protocol driving without channel dependencies
///
/// One iteration advances the simulated reading, polls the transport for a
/// request frame and answers it when it is addressed to the emulated
/// pyranometer. The loop owns the `DeviceState` for its whole lifetime.
use anyhow::Result;
use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use super::{
    record::ExchangeRecord,
    traits::{SimulatorHook, Transport},
};
use crate::protocol::{
    device::DeviceState,
    modbus::{build_response, classify, Classification, REQUEST_FRAME_LEN},
};

/// Timing knobs of the polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    /// Upper bound on a single transport read.
    pub read_timeout: Duration,
    /// Pause between iterations.
    pub poll_interval: Duration,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_millis(100),
            poll_interval: Duration::from_millis(10),
        }
    }
}

/// Run a single loop iteration at time `now`.
///
/// Returns the exchange when a response was written, `Ok(None)` when nothing
/// was answered (timeout, partial frame or a frame for someone else), and
/// `Err` only when the transport itself failed.
pub fn simulation_step<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    hooks: &[Arc<dyn SimulatorHook>],
    read_timeout: Duration,
    now: Instant,
) -> Result<Option<ExchangeRecord>> {
    if state.advance(now) {
        log::trace!("Irradiance advanced to {}", state.current());
    }

    let raw = transport.read(REQUEST_FRAME_LEN, read_timeout)?;
    if raw.len() < REQUEST_FRAME_LEN {
        if !raw.is_empty() {
            log::debug!(
                "Dropped partial frame on {} ({} bytes)",
                transport.name(),
                raw.len()
            );
        }
        return Ok(None);
    }

    let request = match classify(&raw) {
        Classification::Accepted(request) => request,
        Classification::Rejected(reason) => {
            for hook in hooks {
                hook.on_rejected(transport.name(), &raw, reason);
            }
            return Ok(None);
        }
    };

    let measurement = state.current();
    let response = build_response(measurement);
    transport.write(response.as_bytes())?;

    let record = ExchangeRecord {
        port: transport.name().to_string(),
        request: request.raw.to_vec(),
        measurement,
        response: response.into(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    for hook in hooks {
        if let Err(err) = hook.on_exchange(&record) {
            log::warn!("Hook on_exchange failed: {err}");
        }
    }

    Ok(Some(record))
}

/// Drive the simulator until a hook asks to stop or the transport fails.
pub fn run_simulation_loop<T: Transport + ?Sized>(
    transport: &mut T,
    state: &mut DeviceState,
    hooks: &[Arc<dyn SimulatorHook>],
    timing: LoopTiming,
) -> Result<()> {
    log::info!(
        "Starting simulation loop on {} (timeout={:?}, poll={:?}, irradiance={})",
        transport.name(),
        timing.read_timeout,
        timing.poll_interval,
        state.current()
    );

    loop {
        if hooks.iter().any(|hook| !hook.should_continue()) {
            log::info!("Stop requested, exiting simulation loop on {}", transport.name());
            return Ok(());
        }

        if let Err(err) = simulation_step(
            transport,
            state,
            hooks,
            timing.read_timeout,
            Instant::now(),
        ) {
            for hook in hooks {
                hook.on_error(transport.name(), &err);
            }
            return Err(err);
        }

        thread::sleep(timing.poll_interval);
    }
}
