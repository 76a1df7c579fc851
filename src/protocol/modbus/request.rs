use derive_more::Display;

use super::{FUNC_READ_INPUTS, IRRADIANCE_REGISTER, REQUEST_FRAME_LEN, SLAVE_ADDRESS};

/// A read-input-registers request addressed to this device.
///
/// The quantity and CRC fields are carried for logging only. The device
/// answers with a single register whatever the master asked for, and a
/// request with a wrong CRC is answered the same way as a correct one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadRequest {
    pub raw: [u8; REQUEST_FRAME_LEN],
    pub quantity: u16,
    pub crc: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RejectReason {
    #[display("frame length {_0} (expected 8)")]
    Length(usize),
    #[display("slave address 0x{_0:02X} is not ours")]
    SlaveAddress(u8),
    #[display("unsupported function code 0x{_0:02X}")]
    FunctionCode(u8),
    #[display("start address 0x{_0:04X} is not the irradiance register")]
    StartAddress(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Accepted(ReadRequest),
    Rejected(RejectReason),
}

impl Classification {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Classification::Accepted(_))
    }
}

/// Decide whether `raw` is a read request this device answers.
pub fn classify(raw: &[u8]) -> Classification {
    let Ok(frame) = <[u8; REQUEST_FRAME_LEN]>::try_from(raw) else {
        return Classification::Rejected(RejectReason::Length(raw.len()));
    };

    if frame[0] != SLAVE_ADDRESS {
        return Classification::Rejected(RejectReason::SlaveAddress(frame[0]));
    }
    if frame[1] != FUNC_READ_INPUTS {
        return Classification::Rejected(RejectReason::FunctionCode(frame[1]));
    }
    let start = u16::from_be_bytes([frame[2], frame[3]]);
    if start != IRRADIANCE_REGISTER {
        return Classification::Rejected(RejectReason::StartAddress(start));
    }

    Classification::Accepted(ReadRequest {
        raw: frame,
        quantity: u16::from_be_bytes([frame[4], frame[5]]),
        crc: u16::from_le_bytes([frame[6], frame[7]]),
    })
}
