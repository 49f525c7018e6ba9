//! CRC-16 used by the reader on every frame

use crc::{CRC_16_MCRF4XX, Crc};

/// Poly 0x1021, init 0xFFFF, reflected in and out, no final XOR.
const READER_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_MCRF4XX);

/// Checksum over `data` as a natural u16 value.
///
/// On the wire the value travels low byte first, see [`to_wire`].
pub fn calculate(data: &[u8]) -> u16 {
    READER_CRC.checksum(data)
}

/// Byte order the reader expects the checksum in.
pub fn to_wire(crc: u16) -> [u8; 2] {
    crc.to_le_bytes()
}

/// Inverse of [`to_wire`].
pub fn from_wire(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(calculate(b"123456789"), 0x6F91);
    }

    #[test]
    fn test_empty_input_is_init_value() {
        assert_eq!(calculate(&[]), 0xFFFF);
    }

    #[test]
    fn test_set_power_frame_vector() {
        assert_eq!(calculate(&[0x05, 0xFF, 0x2F, 0x0F]), 0xF389);
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(calculate(&[0x04, 0xFF, 0x21]), calculate(&[0x04, 0x21, 0xFF]));
    }

    #[test]
    fn test_wire_order_is_low_byte_first() {
        assert_eq!(to_wire(0xF389), [0x89, 0xF3]);
        assert_eq!(from_wire([0x89, 0xF3]), 0xF389);
    }
}
