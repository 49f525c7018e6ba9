use log::{debug, error, warn};

use crate::command::{
    Command, GetReaderInfo, GetWorkMode, SetFrequencyRange, SetPower, SetScanTime,
};
use crate::frame::{self, BROADCAST_ADDRESS, Response};
use crate::transport::RfidTransport;
use crate::types::{ReaderInfo, UhfError, WorkMode, bytes_to_hex};

/// UHFReader18 driver: one request frame, one reply frame per call.
pub struct UhfReader18<T: RfidTransport> {
    transport: T,
}

impl<T: RfidTransport> UhfReader18<T> {
    /// Create a new reader instance with the given transport
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Give back the transport
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Get frequency range, power and scan time
    pub fn get_reader_info(&mut self) -> Result<ReaderInfo, UhfError> {
        self.execute(BROADCAST_ADDRESS, &GetReaderInfo)
    }

    /// Set the frequency range as step indices, see [`crate::khz_to_step`].
    ///
    /// Returns the address of the reader that acknowledged.
    pub fn set_frequency_range(&mut self, low_step: u8, high_step: u8) -> Result<u8, UhfError> {
        self.execute(
            BROADCAST_ADDRESS,
            &SetFrequencyRange {
                low_step,
                high_step,
            },
        )
    }

    /// Set scan time in 100 ms units
    pub fn set_scan_time(&mut self, scan_time: u8) -> Result<u8, UhfError> {
        self.execute(BROADCAST_ADDRESS, &SetScanTime(scan_time))
    }

    /// Set transmit power in dBm
    pub fn set_power(&mut self, power_dbm: u8) -> Result<u8, UhfError> {
        self.execute(BROADCAST_ADDRESS, &SetPower(power_dbm))
    }

    /// Get work mode of the reader at `address` ([`BROADCAST_ADDRESS`] for any)
    pub fn get_work_mode(&mut self, address: u8) -> Result<WorkMode, UhfError> {
        self.execute(address, &GetWorkMode)
    }

    /// Send `command` to `address` and decode the reply.
    pub fn execute<C: Command>(&mut self, address: u8, command: &C) -> Result<C::Output, UhfError> {
        let response = self.exec(&command.encode(address))?;

        let expected: u8 = C::OPCODE.into();
        if response.command() != expected {
            warn!(
                "Reply echoes command 0x{:02X}, sent 0x{:02X}",
                response.command(),
                expected
            );
            return Err(UhfError::UnexpectedCommand {
                expected,
                actual: response.command(),
            });
        }

        C::decode(&response)
    }

    fn exec(&mut self, request: &[u8]) -> Result<Response, UhfError> {
        self.transport.clear_input().map_err(Self::transport_error)?;
        debug!("Sending frame: {}", bytes_to_hex(request));
        let written = self.transport.write(request).map_err(Self::transport_error)?;
        if written != request.len() {
            error!("Short write: {} of {} bytes", written, request.len());
            return Err(UhfError::Transport(format!(
                "short write: {} of {} bytes",
                written,
                request.len()
            )));
        }

        let mut length = [0u8; 1];
        if self.read_exact(&mut length)? == 0 {
            return Err(UhfError::TruncatedFrame {
                expected: 1,
                actual: 0,
                frame: Vec::new(),
            });
        }

        let mut body = vec![0u8; length[0] as usize];
        let read = self.read_exact(&mut body)?;
        body.truncate(read);
        debug!("Received frame: {:02x}{}", length[0], bytes_to_hex(&body));

        frame::decode(length[0], &body).inspect_err(|e| {
            if matches!(e, UhfError::ChecksumMismatch { .. }) {
                warn!("{}", e);
            }
        })
    }

    /// Fill `buf`, stopping early if the transport runs dry.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<usize, UhfError> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.transport.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) => return Err(Self::transport_error(e)),
            }
        }
        Ok(filled)
    }

    fn transport_error(e: T::Error) -> UhfError {
        error!("Transport error: {:?}", e);
        UhfError::Transport(format!("{:?}", e))
    }
}
