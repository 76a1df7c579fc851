//! pyrsim: a Modbus RTU slave that pretends to be a pyranometer
//!
//! The simulated device answers "read input registers" (0x04) requests for
//! register 0 on station 1 with an irradiance value that climbs by one every
//! second and wraps at 2000. It exists to exercise Modbus masters and
//! pollers without real hardware.
//!
//! `protocol` holds the pure frame logic (CRC16, request classification,
//! response encoding, device state). `api` drives it over a transport and
//! exposes the builder and the threaded simulator handle. `cli` and `boot`
//! back the `pyrsim` binary.

pub mod api;
#[doc(hidden)]
pub mod boot;
#[doc(hidden)]
pub mod cli;
pub mod protocol;
#[doc(hidden)]
pub mod utils;

pub use api::modbus::{
    ExchangeRecord, LoggingHook, ModbusSimulator, NoOpHook, SimulatorBuilder, SimulatorConfig,
    SimulatorControl, SimulatorHook, Transport,
};
