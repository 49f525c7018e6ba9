//! Reader commands: opcode, request payload and reply decoder for each

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::decode;
use crate::frame::{self, Response};
use crate::types::{ReaderInfo, UhfError, WorkMode};

/// Command codes understood by the reader firmware
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum Opcode {
    GetReaderInfo = 0x21,
    SetFrequency = 0x22,
    SetScanTime = 0x25,
    SetPower = 0x2F,
    GetWorkMode = 0x36,
}

/// A request the reader answers with exactly one frame.
pub trait Command {
    const OPCODE: Opcode;

    /// Decoded reply
    type Output;

    /// Request bytes following address and command
    fn payload(&self) -> Vec<u8>;

    fn decode(response: &Response) -> Result<Self::Output, UhfError>;

    /// Full frame addressed to `address`
    fn encode(&self, address: u8) -> Vec<u8> {
        frame::encode(address, Self::OPCODE.into(), &self.payload())
    }
}

/// Query frequency range, power and scan time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetReaderInfo;

impl Command for GetReaderInfo {
    const OPCODE: Opcode = Opcode::GetReaderInfo;
    type Output = ReaderInfo;

    fn payload(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode(response: &Response) -> Result<ReaderInfo, UhfError> {
        decode::reader_info(response)
    }
}

/// Set the frequency range as channel step indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetFrequencyRange {
    pub low_step: u8,
    pub high_step: u8,
}

impl Command for SetFrequencyRange {
    const OPCODE: Opcode = Opcode::SetFrequency;
    type Output = u8;

    fn payload(&self) -> Vec<u8> {
        vec![self.high_step, self.low_step]
    }

    fn decode(response: &Response) -> Result<u8, UhfError> {
        Ok(response.address())
    }
}

/// Set the scan time in 100 ms units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetScanTime(pub u8);

impl Command for SetScanTime {
    const OPCODE: Opcode = Opcode::SetScanTime;
    type Output = u8;

    fn payload(&self) -> Vec<u8> {
        vec![self.0]
    }

    fn decode(response: &Response) -> Result<u8, UhfError> {
        Ok(response.address())
    }
}

/// Set the transmit power in dBm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetPower(pub u8);

impl Command for SetPower {
    const OPCODE: Opcode = Opcode::SetPower;
    type Output = u8;

    fn payload(&self) -> Vec<u8> {
        vec![self.0]
    }

    fn decode(response: &Response) -> Result<u8, UhfError> {
        Ok(response.address())
    }
}

/// Query the work mode configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetWorkMode;

impl Command for GetWorkMode {
    const OPCODE: Opcode = Opcode::GetWorkMode;
    type Output = WorkMode;

    fn payload(&self) -> Vec<u8> {
        Vec::new()
    }

    fn decode(response: &Response) -> Result<WorkMode, UhfError> {
        decode::work_mode(response)
    }
}
