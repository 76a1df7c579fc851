mod crc;
mod request;
mod response;

pub use crc::{crc16, crc16_bytes};
pub use request::{classify, Classification, ReadRequest, RejectReason};
pub use response::{build_response, ResponseFrame};

/// Station id answered by the simulated pyranometer.
pub const SLAVE_ADDRESS: u8 = 0x01;
/// Read input registers.
pub const FUNC_READ_INPUTS: u8 = 0x04;
/// The only register exposed by the device.
pub const IRRADIANCE_REGISTER: u16 = 0x0000;

pub const REQUEST_FRAME_LEN: usize = 8;
pub const RESPONSE_FRAME_LEN: usize = 7;
