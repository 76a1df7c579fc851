use serde::{Serialize, Serializer};

use crate::utils::format_hex;

/// One answered request, as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRecord {
    pub port: String,
    #[serde(serialize_with = "serialize_hex")]
    pub request: Vec<u8>,
    pub measurement: u16,
    #[serde(serialize_with = "serialize_hex")]
    pub response: Vec<u8>,
    pub timestamp: String,
}

fn serialize_hex<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: AsRef<[u8]>,
    S: Serializer,
{
    serializer.serialize_str(&format_hex(bytes.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_frames_as_hex() {
        let record = ExchangeRecord {
            port: "/dev/ttyUSB0".to_string(),
            request: vec![0x01, 0x04, 0x00, 0x00, 0x00, 0x01, 0x31, 0xCA],
            measurement: 5,
            response: vec![0x01, 0x04, 0x02, 0x00, 0x05, 0x79, 0x33],
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        };

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["request"], "01 04 00 00 00 01 31 CA");
        assert_eq!(json["response"], "01 04 02 00 05 79 33");
        assert_eq!(json["measurement"], 5);
        assert_eq!(json["port"], "/dev/ttyUSB0");
    }
}
