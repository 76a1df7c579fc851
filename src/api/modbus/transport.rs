use anyhow::{anyhow, Result};
use std::{
    io::{ErrorKind, Read, Write},
    time::{Duration, Instant},
};

use super::traits::Transport;
use crate::api::utils::open_serial_port;

/// [`Transport`] over a physical (or pty-backed) serial port.
pub struct SerialTransport {
    port_name: String,
    port: Box<dyn serialport::SerialPort>,
    timeout: Duration,
}

impl SerialTransport {
    pub fn open(port_name: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = open_serial_port(port_name, baud_rate, timeout)?;
        log::info!("Opened {port_name} @ {baud_rate} bps (8N1)");
        Ok(Self::from_port(port_name, port, timeout))
    }

    /// Wrap an already opened port.
    pub fn from_port(
        port_name: &str,
        port: Box<dyn serialport::SerialPort>,
        timeout: Duration,
    ) -> Self {
        Self {
            port_name: port_name.to_string(),
            port,
            timeout,
        }
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        if self.timeout != timeout {
            self.port
                .set_timeout(timeout)
                .map_err(|err| anyhow!("Failed to set timeout on {}: {err}", self.port_name))?;
            self.timeout = timeout;
        }
        Ok(())
    }
}

impl Transport for SerialTransport {
    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        let mut buffer = vec![0u8; max_bytes];
        let mut filled = 0;

        while filled < max_bytes {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            self.set_timeout(remaining)?;

            match self.port.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::TimedOut => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    return Err(anyhow!("Failed to read from {}: {err}", self.port_name));
                }
            }
        }

        buffer.truncate(filled);
        Ok(buffer)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.port
            .write_all(bytes)
            .and_then(|_| self.port.flush())
            .map_err(|err| anyhow!("Failed to write to {}: {err}", self.port_name))
    }

    fn name(&self) -> &str {
        &self.port_name
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use serialport::{SerialPort, TTYPort};
    use std::thread;

    const REQUEST: [u8; 8] = [0x01, 0x04, 0x00, 0x00, 0x00, 0x01, 0x31, 0xCA];

    /// Simulator side wrapped as a transport, plus the master end of the pty.
    fn pty_link() -> (SerialTransport, TTYPort) {
        let (mut master, slave) = TTYPort::pair().expect("Unable to create pty pair");
        master.set_timeout(Duration::from_secs(2)).unwrap();
        let transport =
            SerialTransport::from_port("pty", Box::new(slave), Duration::from_millis(100));
        (transport, master)
    }

    #[test]
    fn test_read_reassembles_chunked_frame() {
        let (mut transport, mut master) = pty_link();

        let writer = thread::spawn(move || {
            master.write_all(&REQUEST[..4]).unwrap();
            master.flush().unwrap();
            thread::sleep(Duration::from_millis(30));
            master.write_all(&REQUEST[4..]).unwrap();
            master.flush().unwrap();
            master
        });

        let frame = transport.read(8, Duration::from_millis(500)).unwrap();
        let _master = writer.join().unwrap();
        assert_eq!(frame, REQUEST);
    }

    #[test]
    fn test_idle_read_times_out_empty() {
        let (mut transport, _master) = pty_link();

        let started = Instant::now();
        let bytes = transport.read(8, Duration::from_millis(60)).unwrap();
        let elapsed = started.elapsed();

        assert!(bytes.is_empty());
        assert!(elapsed >= Duration::from_millis(50), "returned after {elapsed:?}");
        assert!(elapsed < Duration::from_secs(2), "returned after {elapsed:?}");
    }

    #[test]
    fn test_partial_frame_returned_at_deadline() {
        let (mut transport, mut master) = pty_link();

        master.write_all(&REQUEST[..3]).unwrap();
        master.flush().unwrap();

        let bytes = transport.read(8, Duration::from_millis(80)).unwrap();
        assert_eq!(bytes, REQUEST[..3]);
    }

    #[test]
    fn test_written_response_arrives_intact() {
        let (mut transport, mut master) = pty_link();
        let response = [0x01, 0x04, 0x02, 0x00, 0x05, 0x79, 0x33];

        transport.write(&response).unwrap();

        let mut received = [0u8; 7];
        master.read_exact(&mut received).unwrap();
        assert_eq!(received, response);
        assert_eq!(transport.name(), "pty");
    }
}
