//! Serial port transport for RS-232/RS-485 adapters using the serialport crate

use crate::transport::RfidTransport;
use std::io::ErrorKind;
use std::time::Duration;

/// Factory baud rate of the reader
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    /// Open `port_name` at 8N1. A read that waits longer than `timeout`
    /// reports zero bytes.
    pub fn new(port_name: &str, baud_rate: u32, timeout: Duration) -> Result<Self, serialport::Error> {
        let port = serialport::new(port_name, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .timeout(timeout)
            .open()?;
        port.clear(serialport::ClearBuffer::Input)?;

        Ok(Self { port })
    }
}

impl RfidTransport for SerialTransport {
    type Error = std::io::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        std::io::Write::write_all(&mut self.port, data)?;
        std::io::Write::flush(&mut self.port)?;
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match std::io::Read::read(&mut self.port, buf) {
            Err(e) if e.kind() == ErrorKind::TimedOut => Ok(0),
            other => other,
        }
    }

    fn clear_input(&mut self) -> Result<(), Self::Error> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(std::io::Error::other)
    }
}
