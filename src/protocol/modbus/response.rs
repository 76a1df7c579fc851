use super::{crc16_bytes, FUNC_READ_INPUTS, RESPONSE_FRAME_LEN, SLAVE_ADDRESS};

/// Byte count of a single 16-bit register payload.
const BYTE_COUNT: u8 = 2;

/// A complete read-input-registers reply carrying one register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseFrame([u8; RESPONSE_FRAME_LEN]);

impl ResponseFrame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The register value as encoded in the frame.
    pub fn measurement(&self) -> u16 {
        u16::from_be_bytes([self.0[3], self.0[4]])
    }

    /// The trailing CRC field, decoded from its little-endian wire form.
    pub fn checksum(&self) -> u16 {
        u16::from_le_bytes([self.0[5], self.0[6]])
    }
}

impl AsRef<[u8]> for ResponseFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<ResponseFrame> for Vec<u8> {
    fn from(frame: ResponseFrame) -> Self {
        frame.0.to_vec()
    }
}

/// Build the reply reporting `measurement`.
pub fn build_response(measurement: u16) -> ResponseFrame {
    let [hi, lo] = measurement.to_be_bytes();
    let mut frame = [SLAVE_ADDRESS, FUNC_READ_INPUTS, BYTE_COUNT, hi, lo, 0, 0];
    let [crc_lo, crc_hi] = crc16_bytes(&frame[..5]);
    frame[5] = crc_lo;
    frame[6] = crc_hi;
    ResponseFrame(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{device::MAX_MEASUREMENT, modbus::crc16};

    #[test]
    fn test_build_known_frame() {
        let frame = build_response(5);
        assert_eq!(
            frame.as_bytes(),
            &[0x01, 0x04, 0x02, 0x00, 0x05, 0x79, 0x33]
        );
        assert_eq!(frame.measurement(), 5);
        assert_eq!(frame.checksum(), 0x3379);
    }

    #[test]
    fn test_every_measurement_is_well_formed() {
        for value in 0..=MAX_MEASUREMENT {
            let frame = build_response(value);
            let bytes = frame.as_bytes();
            assert_eq!(bytes.len(), RESPONSE_FRAME_LEN);
            assert_eq!(&bytes[..3], &[0x01, 0x04, 0x02]);
            assert_eq!(&bytes[3..5], &value.to_be_bytes());
            assert_eq!(&bytes[5..], &crc16(&bytes[..5]).to_le_bytes());
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(build_response(1234), build_response(1234));
        assert_eq!(build_response(0).as_bytes(), build_response(0).as_bytes());
        assert_ne!(build_response(1), build_response(2));
    }

    #[test]
    fn test_upper_bound_frame() {
        let frame: Vec<u8> = build_response(2000).into();
        assert_eq!(frame, vec![0x01, 0x04, 0x02, 0x07, 0xD0, 0xBA, 0x9C]);
    }
}
