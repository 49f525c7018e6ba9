//! Decoders turning verified replies into typed values
//!
//! Offsets index the reply body: 0 address, 1 echoed command, 2 status.

use num_enum::TryFromPrimitive;

use crate::frame::Response;
use crate::types::{
    AddressingWidth, BusInterface, Buzzer, OperatingMode, Protocol, ReaderInfo, StorageBank,
    UhfError, WiegandByteOrder, WiegandFormat, WorkMode, step_to_khz,
};

mod info_offset {
    pub const HIGH_STEP: usize = 7;
    pub const LOW_STEP: usize = 8;
    pub const POWER: usize = 9;
    pub const SCAN_TIME: usize = 10;
}

mod mode_offset {
    pub const WIEGAND: usize = 3;
    pub const OUTPUT_INTERVAL: usize = 4;
    pub const PULSE_WIDTH: usize = 5;
    pub const PULSE_PERIOD: usize = 6;
    pub const MODE: usize = 7;
    pub const MODE_STATE: usize = 8;
    pub const STORAGE: usize = 9;
    pub const OFFSET: usize = 10;
    pub const LENGTH: usize = 11;
    pub const FILTER_TIME: usize = 12;
    pub const EAS_ACCURACY: usize = 13;
    pub const OFFSET_TIME: usize = 14;
}

fn bit(byte: u8, n: u8) -> u8 {
    (byte >> n) & 0x01
}

fn lookup<E>(field: &'static str, offset: usize, index: u8) -> Result<E, UhfError>
where
    E: TryFromPrimitive<Primitive = u8>,
{
    E::try_from_primitive(index).map_err(|_| UhfError::DecodeRange {
        field,
        offset,
        index,
    })
}

/// Decode a get-reader-info reply.
pub fn reader_info(response: &Response) -> Result<ReaderInfo, UhfError> {
    use info_offset::*;

    Ok(ReaderInfo {
        address: response.address(),
        low_freq_khz: step_to_khz(response.byte(LOW_STEP)?),
        high_freq_khz: step_to_khz(response.byte(HIGH_STEP)?),
        power_dbm: response.byte(POWER)?,
        scan_time: response.byte(SCAN_TIME)?,
    })
}

/// Decode a get-work-mode reply.
///
/// The mode state byte packs protocol (bit 0), buzzer (bit 2), addressing
/// width (bit 3) and the output interface (bit 1 + bit 4).
pub fn work_mode(response: &Response) -> Result<WorkMode, UhfError> {
    use mode_offset::*;

    // one check up front so a short reply is not reported per field
    response.byte(OFFSET_TIME)?;

    let wiegand = response.byte(WIEGAND)?;
    let state = response.byte(MODE_STATE)?;

    Ok(WorkMode {
        address: response.address(),
        mode: lookup("mode", MODE, response.byte(MODE)?)?,
        protocol: lookup("protocol", MODE_STATE, bit(state, 0))?,
        buzzer: lookup("buzzer", MODE_STATE, bit(state, 2))?,
        addressing: lookup("addressing", MODE_STATE, bit(state, 3))?,
        interface: lookup("interface", MODE_STATE, bit(state, 4) + bit(state, 1))?,
        storage: lookup("storage", STORAGE, response.byte(STORAGE)?)?,
        offset: response.byte(OFFSET)?,
        length: response.byte(LENGTH)?,
        filter_time: response.byte(FILTER_TIME)?,
        eas_accuracy: response.byte(EAS_ACCURACY)?,
        offset_time: response.byte(OFFSET_TIME)?,
        wiegand_byte_order: lookup("wiegand byte order", WIEGAND, bit(wiegand, 1))?,
        wiegand_format: lookup("wiegand format", WIEGAND, bit(wiegand, 0))?,
        wiegand_output_interval: response.byte(OUTPUT_INTERVAL)?,
        wiegand_pulse_width: response.byte(PULSE_WIDTH)?,
        wiegand_pulse_period: response.byte(PULSE_PERIOD)?,
    })
}
