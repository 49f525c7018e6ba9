//! Types for reader operations

use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt;

/// Lowest frequency of the reader's channel grid
pub const FREQ_MIN_KHZ: u32 = 902_600;
/// Highest frequency of the reader's channel grid
pub const FREQ_MAX_KHZ: u32 = 927_400;
/// Channel spacing
pub const FREQ_STEP_KHZ: u32 = 400;
/// Step index of [`FREQ_MAX_KHZ`]
pub const FREQ_MAX_STEP: u8 = ((FREQ_MAX_KHZ - FREQ_MIN_KHZ) / FREQ_STEP_KHZ) as u8;

/// Transmit power accepted by the reader, in dBm
pub const POWER_MAX_DBM: u8 = 30;
/// Scan time bounds accepted by the reader, in 100 ms units
pub const SCAN_TIME_MIN: u8 = 2;
pub const SCAN_TIME_MAX: u8 = 255;

/// Convert a channel step index to kHz.
///
/// Steps are not range checked; the reader reports whatever it has stored.
pub fn step_to_khz(step: u8) -> u32 {
    FREQ_MIN_KHZ + step as u32 * FREQ_STEP_KHZ
}

/// Convert a frequency in kHz to its channel step index.
///
/// Returns `None` for frequencies outside the grid or not aligned to it.
pub fn khz_to_step(khz: u32) -> Option<u8> {
    if !(FREQ_MIN_KHZ..=FREQ_MAX_KHZ).contains(&khz) {
        return None;
    }
    let offset = khz - FREQ_MIN_KHZ;
    if offset % FREQ_STEP_KHZ != 0 {
        return None;
    }
    u8::try_from(offset / FREQ_STEP_KHZ).ok()
}

/// Reader settings returned by get-reader-info
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderInfo {
    pub address: u8,
    pub low_freq_khz: u32,
    pub high_freq_khz: u32,
    pub power_dbm: u8,
    /// Wire units of 100 ms
    pub scan_time: u8,
}

impl ReaderInfo {
    pub fn scan_time_ms(&self) -> u32 {
        self.scan_time as u32 * 100
    }
}

macro_rules! display_names {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

/// How the reader starts an inventory
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum OperatingMode {
    Answer = 0,
    Active = 1,
    TriggerLow = 2,
    TriggerHigh = 3,
}

display_names!(OperatingMode {
    Answer => "answer",
    Active => "active",
    TriggerLow => "trigger low",
    TriggerHigh => "trigger high",
});

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum Protocol {
    Iso18000_6C = 0,
    Iso18000_6B = 1,
}

display_names!(Protocol {
    Iso18000_6C => "ISO18000-6C",
    Iso18000_6B => "ISO18000-6B",
});

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum Buzzer {
    On = 0,
    Off = 1,
}

display_names!(Buzzer {
    On => "on",
    Off => "off",
});

/// Unit of the offset/length fields in active mode
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum AddressingWidth {
    Word = 0,
    Byte = 1,
}

display_names!(AddressingWidth {
    Word => "word",
    Byte => "byte",
});

/// Output interface used in active mode
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum BusInterface {
    Wiegand = 0,
    Serial = 1,
    Syris485 = 2,
}

display_names!(BusInterface {
    Wiegand => "wiegand",
    Serial => "RS232/RS485",
    Syris485 => "SYRIS485",
});

/// Tag memory region or query kind read in active mode
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum StorageBank {
    Password = 0,
    Epc = 1,
    Tid = 2,
    User = 3,
    MultiQuery = 4,
    OneQuery = 5,
    Eas = 6,
}

display_names!(StorageBank {
    Password => "password",
    Epc => "epc",
    Tid => "tid",
    User => "user",
    MultiQuery => "multi query",
    OneQuery => "one query",
    Eas => "eas",
});

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum WiegandByteOrder {
    Msb = 0,
    Lsb = 1,
}

display_names!(WiegandByteOrder {
    Msb => "msb",
    Lsb => "lsb",
});

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
pub enum WiegandFormat {
    Wiegand26 = 0,
    Wiegand34 = 1,
}

display_names!(WiegandFormat {
    Wiegand26 => "wiegand26",
    Wiegand34 => "wiegand34",
});

/// Work mode configuration returned by get-work-mode.
///
/// Numeric fields hold the raw wire values; the `*_ms`/`*_us` helpers apply
/// the unit multipliers for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkMode {
    pub address: u8,
    pub mode: OperatingMode,
    pub protocol: Protocol,
    pub buzzer: Buzzer,
    pub addressing: AddressingWidth,
    pub interface: BusInterface,
    pub storage: StorageBank,
    pub offset: u8,
    pub length: u8,
    /// Seconds
    pub filter_time: u8,
    pub eas_accuracy: u8,
    /// Milliseconds
    pub offset_time: u8,
    pub wiegand_byte_order: WiegandByteOrder,
    pub wiegand_format: WiegandFormat,
    /// Units of 10 ms
    pub wiegand_output_interval: u8,
    /// Units of 10 us
    pub wiegand_pulse_width: u8,
    /// Units of 100 us
    pub wiegand_pulse_period: u8,
}

impl WorkMode {
    pub fn wiegand_output_interval_ms(&self) -> u32 {
        self.wiegand_output_interval as u32 * 10
    }

    pub fn wiegand_pulse_width_us(&self) -> u32 {
        self.wiegand_pulse_width as u32 * 10
    }

    pub fn wiegand_pulse_period_us(&self) -> u32 {
        self.wiegand_pulse_period as u32 * 100
    }
}

/// Errors that can occur during reader operations
#[derive(Debug, thiserror::Error)]
pub enum UhfError {
    /// Transport layer error (serial port, mock, ...)
    #[error("transport error: {0}")]
    Transport(String),

    /// Received CRC does not match the one computed over the frame
    #[error(
        "CRC failed: expected 0x{expected:04X}, received 0x{received:04X}: {}",
        bytes_to_hex(.frame)
    )]
    ChecksumMismatch {
        expected: u16,
        received: u16,
        frame: Vec<u8>,
    },

    /// Fewer (or more) bytes than the length byte declared
    #[error(
        "truncated frame: expected {expected} bytes, got {actual}: {}",
        bytes_to_hex(.frame)
    )]
    TruncatedFrame {
        expected: usize,
        actual: usize,
        frame: Vec<u8>,
    },

    /// Declared length cannot hold address, command and CRC
    #[error("invalid frame length byte: {length}")]
    InvalidLength { length: u8 },

    /// A lookup index decoded from the response has no table entry
    #[error("{field} index {index} out of range (response byte {offset})")]
    DecodeRange {
        field: &'static str,
        offset: usize,
        index: u8,
    },

    /// Verified response is too short for the requested field
    #[error("response too short: needed byte {needed}, got {actual} bytes")]
    ShortResponse { needed: usize, actual: usize },

    /// Reply echoes a different command than the one sent
    #[error("unexpected reply command: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedCommand { expected: u8, actual: u8 },
}

/// Convert bytes to lowercase hex string
pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_grid_bounds() {
        assert_eq!(FREQ_MAX_STEP, 62);
        assert_eq!(step_to_khz(0), FREQ_MIN_KHZ);
        assert_eq!(step_to_khz(FREQ_MAX_STEP), FREQ_MAX_KHZ);
    }

    #[test]
    fn test_khz_to_step_rejects_off_grid() {
        assert_eq!(khz_to_step(902_600), Some(0));
        assert_eq!(khz_to_step(927_400), Some(62));
        assert_eq!(khz_to_step(902_800), None);
        assert_eq!(khz_to_step(902_200), None);
        assert_eq!(khz_to_step(927_800), None);
    }

    #[test]
    fn test_enum_lookup_out_of_range() {
        assert_eq!(OperatingMode::try_from(3).unwrap(), OperatingMode::TriggerHigh);
        assert!(OperatingMode::try_from(4).is_err());
        assert_eq!(StorageBank::try_from(6).unwrap(), StorageBank::Eas);
        assert!(StorageBank::try_from(7).is_err());
        assert!(BusInterface::try_from(3).is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Protocol::Iso18000_6C.to_string(), "ISO18000-6C");
        assert_eq!(BusInterface::Serial.to_string(), "RS232/RS485");
        assert_eq!(StorageBank::MultiQuery.to_string(), "multi query");
        assert_eq!(OperatingMode::TriggerLow.to_string(), "trigger low");
    }

    #[test]
    fn test_checksum_error_shows_frame_hex() {
        let err = UhfError::ChecksumMismatch {
            expected: 0xF389,
            received: 0x0000,
            frame: vec![0x05, 0x00, 0x2F, 0x00, 0x00, 0x00],
        };
        assert_eq!(
            err.to_string(),
            "CRC failed: expected 0xF389, received 0x0000: 05002f000000"
        );
    }

    #[test]
    fn test_bytes_to_hex() {
        assert_eq!(bytes_to_hex(&[]), "");
        assert_eq!(bytes_to_hex(&[0x0A, 0xFF]), "0aff");
    }

    proptest! {
        #[test]
        fn prop_step_round_trip(step in 0u8..=FREQ_MAX_STEP) {
            prop_assert_eq!(khz_to_step(step_to_khz(step)), Some(step));
        }
    }
}
