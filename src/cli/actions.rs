use anyhow::Result;
use serde::Serialize;

use clap::ArgMatches;

#[derive(Debug, Serialize)]
struct PortInfo {
    port_name: String,
    port_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    vid: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pid: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product: Option<String>,
}

impl From<serialport::SerialPortInfo> for PortInfo {
    fn from(info: serialport::SerialPortInfo) -> Self {
        let mut out = PortInfo {
            port_name: info.port_name,
            port_type: "Unknown",
            vid: None,
            pid: None,
            serial: None,
            manufacturer: None,
            product: None,
        };
        match info.port_type {
            serialport::SerialPortType::UsbPort(usb) => {
                out.port_type = "Usb";
                out.vid = Some(usb.vid);
                out.pid = Some(usb.pid);
                out.serial = usb.serial_number;
                out.manufacturer = usb.manufacturer;
                out.product = usb.product;
            }
            serialport::SerialPortType::PciPort => out.port_type = "Pci",
            serialport::SerialPortType::BluetoothPort => out.port_type = "Bluetooth",
            serialport::SerialPortType::Unknown => {}
        }
        out
    }
}

fn enumerate_ports() -> Vec<PortInfo> {
    let mut ports = serialport::available_ports().unwrap_or_else(|err| {
        log::warn!("Failed to enumerate serial ports: {err}");
        Vec::new()
    });
    ports.sort_by(|a, b| a.port_name.cmp(&b.port_name));
    ports.into_iter().map(PortInfo::from).collect()
}

/// Handle commands that print something and exit. Returns true if one ran.
pub fn run_one_shot_actions(matches: &ArgMatches) -> Result<bool> {
    if matches.get_flag("list-ports") {
        let ports = enumerate_ports();

        if matches.get_flag("json") {
            println!("{}", serde_json::to_string_pretty(&ports)?);
        } else {
            for port in &ports {
                println!("{}", port.port_name);
            }
        }
        return Ok(true);
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usb_port_info_is_flattened() {
        let info = serialport::SerialPortInfo {
            port_name: "/dev/ttyUSB0".to_string(),
            port_type: serialport::SerialPortType::UsbPort(serialport::UsbPortInfo {
                vid: 0x1a86,
                pid: 0x7523,
                serial_number: None,
                manufacturer: Some("QinHeng".to_string()),
                product: Some("USB Serial".to_string()),
            }),
        };

        let json = serde_json::to_value(PortInfo::from(info)).unwrap();
        assert_eq!(json["port_name"], "/dev/ttyUSB0");
        assert_eq!(json["port_type"], "Usb");
        assert_eq!(json["vid"], 0x1a86);
        assert!(json.get("serial").is_none());
    }

    #[test]
    fn test_plain_port_info() {
        let info = serialport::SerialPortInfo {
            port_name: "COM1".to_string(),
            port_type: serialport::SerialPortType::PciPort,
        };
        let port = PortInfo::from(info);
        assert_eq!(port.port_type, "Pci");
        assert!(port.vid.is_none());
    }
}
