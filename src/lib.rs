//! Protocol driver for UHFReader18 UHF RFID readers on an RS-232/RS-485 bus.
//!
//! Every call writes one length-prefixed, CRC-16 terminated frame and blocks
//! until the matching reply frame has been read and verified.
//!
//! # Features
//!
//! - `serial` - Serial port transport using the serialport crate
//! - `cli` - The `uhf` configuration shell
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use uhf_reader18::{SerialTransport, UhfReader18};
//!
//! let transport = SerialTransport::new("/dev/ttyUSB0", 57600, Duration::from_secs(1))?;
//! let mut reader = UhfReader18::new(transport);
//!
//! let info = reader.get_reader_info()?;
//! println!("{} - {} kHz", info.low_freq_khz, info.high_freq_khz);
//! ```

pub mod checksum;
pub mod command;
pub mod decode;
pub mod frame;
mod reader;
mod transport;
mod types;

#[cfg(feature = "serial")]
mod serial;

// Re-exports
pub use command::{
    Command, GetReaderInfo, GetWorkMode, Opcode, SetFrequencyRange, SetPower, SetScanTime,
};
pub use frame::{BROADCAST_ADDRESS, Response};
pub use reader::UhfReader18;
pub use transport::RfidTransport;
pub use types::{
    AddressingWidth, BusInterface, Buzzer, FREQ_MAX_KHZ, FREQ_MAX_STEP, FREQ_MIN_KHZ,
    FREQ_STEP_KHZ, OperatingMode, POWER_MAX_DBM, Protocol, ReaderInfo, SCAN_TIME_MAX,
    SCAN_TIME_MIN, StorageBank, UhfError, WiegandByteOrder, WiegandFormat, WorkMode, khz_to_step,
    step_to_khz,
};

#[cfg(feature = "serial")]
pub use serial::{DEFAULT_BAUD_RATE, SerialTransport};
