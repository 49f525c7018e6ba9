//! Frame encoding and verification
//!
//! ```text
//! [length][address][command][payload...][crc_lo][crc_hi]
//! ```
//!
//! `length` counts every byte after itself. The CRC covers `length` through
//! the last payload byte.

use crate::checksum;
use crate::types::UhfError;

/// Address reaching every reader on the bus
pub const BROADCAST_ADDRESS: u8 = 0xFF;

/// Address + command + CRC
pub(crate) const MIN_LENGTH: u8 = 4;

const CRC_LEN: usize = 2;

/// Build an outbound frame.
///
/// The payload must fit the single length byte, i.e. at most 251 bytes.
pub fn encode(address: u8, command: u8, payload: &[u8]) -> Vec<u8> {
    let length = (payload.len() + MIN_LENGTH as usize) as u8;

    let mut frame = Vec::with_capacity(length as usize + 1);
    frame.push(length);
    frame.push(address);
    frame.push(command);
    frame.extend_from_slice(payload);

    let crc = checksum::calculate(&frame);
    frame.extend_from_slice(&checksum::to_wire(crc));
    frame
}

/// Verify an inbound frame.
///
/// `length` is the already consumed leading byte, `body` the bytes read after
/// it. The body must be exactly `length` bytes long.
pub fn decode(length: u8, body: &[u8]) -> Result<Response, UhfError> {
    let raw = || {
        let mut frame = Vec::with_capacity(body.len() + 1);
        frame.push(length);
        frame.extend_from_slice(body);
        frame
    };

    if body.len() != length as usize {
        return Err(UhfError::TruncatedFrame {
            expected: length as usize,
            actual: body.len(),
            frame: raw(),
        });
    }
    if length < MIN_LENGTH {
        return Err(UhfError::InvalidLength { length });
    }

    let (content, crc_bytes) = body.split_at(body.len() - CRC_LEN);
    let received = checksum::from_wire([crc_bytes[0], crc_bytes[1]]);

    let mut covered = Vec::with_capacity(content.len() + 1);
    covered.push(length);
    covered.extend_from_slice(content);
    let expected = checksum::calculate(&covered);

    if expected != received {
        return Err(UhfError::ChecksumMismatch {
            expected,
            received,
            frame: raw(),
        });
    }

    Ok(Response {
        body: content.to_vec(),
    })
}

/// A verified reply, CRC stripped.
///
/// Byte offsets used by the decoders index [`Response::body`]: offset 0 is
/// the address, offset 1 the echoed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    body: Vec<u8>,
}

impl Response {
    pub fn address(&self) -> u8 {
        self.body[0]
    }

    pub fn command(&self) -> u8 {
        self.body[1]
    }

    /// Everything after address and command
    pub fn payload(&self) -> &[u8] {
        &self.body[2..]
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Byte at `offset`, or [`UhfError::ShortResponse`].
    pub fn byte(&self, offset: usize) -> Result<u8, UhfError> {
        self.body.get(offset).copied().ok_or(UhfError::ShortResponse {
            needed: offset,
            actual: self.body.len(),
        })
    }
}

#[cfg(test)]
pub(crate) fn response_frame(body: &[u8]) -> Vec<u8> {
    encode(body[0], body[1], &body[2..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn split(frame: &[u8]) -> (u8, &[u8]) {
        (frame[0], &frame[1..])
    }

    #[test]
    fn test_encode_set_power() {
        assert_eq!(
            encode(BROADCAST_ADDRESS, 0x2F, &[0x0F]),
            [0x05, 0xFF, 0x2F, 0x0F, 0x89, 0xF3]
        );
    }

    #[test]
    fn test_encode_no_payload() {
        assert_eq!(encode(BROADCAST_ADDRESS, 0x21, &[]), [0x04, 0xFF, 0x21, 0x19, 0x95]);
    }

    #[test]
    fn test_encode_set_frequency() {
        assert_eq!(
            encode(BROADCAST_ADDRESS, 0x22, &[0x3E, 0x00]),
            [0x06, 0xFF, 0x22, 0x3E, 0x00, 0xF3, 0x54]
        );
    }

    #[test]
    fn test_decode_ack() {
        let frame = [0x05, 0x00, 0x2F, 0x00, 0x8D, 0xCD];
        let (length, body) = split(&frame);
        let response = decode(length, body).unwrap();

        assert_eq!(response.address(), 0x00);
        assert_eq!(response.command(), 0x2F);
        assert_eq!(response.payload(), [0x00]);
    }

    #[test]
    fn test_decode_empty_payload() {
        let frame = encode(0x01, 0x25, &[]);
        let (length, body) = split(&frame);
        let response = decode(length, body).unwrap();

        assert_eq!(response.address(), 0x01);
        assert!(response.payload().is_empty());
    }

    #[test]
    fn test_decode_bad_crc() {
        let frame = [0x05, 0x00, 0x2F, 0x00, 0xCD, 0x8D];
        let (length, body) = split(&frame);

        match decode(length, body) {
            Err(UhfError::ChecksumMismatch { expected, received, frame: raw }) => {
                assert_eq!(expected, 0xCD8D);
                assert_eq!(received, 0x8DCD);
                assert_eq!(raw, frame);
            }
            other => panic!("expected checksum mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_short_body() {
        let frame = [0x05, 0x00, 0x2F, 0x00, 0x8D];
        let (length, body) = split(&frame);

        assert!(matches!(
            decode(length, body),
            Err(UhfError::TruncatedFrame { expected: 5, actual: 4, .. })
        ));
    }

    #[test]
    fn test_decode_long_body() {
        let frame = [0x05, 0x00, 0x2F, 0x00, 0x8D, 0xCD, 0x00];
        let (length, body) = split(&frame);

        assert!(matches!(
            decode(length, body),
            Err(UhfError::TruncatedFrame { expected: 5, actual: 6, .. })
        ));
    }

    #[test]
    fn test_decode_length_too_small() {
        assert!(matches!(
            decode(3, &[0x00, 0x12, 0x34]),
            Err(UhfError::InvalidLength { length: 3 })
        ));
    }

    #[test]
    fn test_response_byte_out_of_range() {
        let frame = response_frame(&[0x00, 0x21, 0x00]);
        let (length, body) = split(&frame);
        let response = decode(length, body).unwrap();

        assert_eq!(response.byte(2).unwrap(), 0x00);
        assert!(matches!(
            response.byte(10),
            Err(UhfError::ShortResponse { needed: 10, actual: 3 })
        ));
    }

    proptest! {
        #[test]
        fn prop_round_trip(
            address in any::<u8>(),
            command in any::<u8>(),
            payload in proptest::collection::vec(any::<u8>(), 0..=64),
        ) {
            let frame = encode(address, command, &payload);
            prop_assert_eq!(frame[0] as usize, frame.len() - 1);

            let response = decode(frame[0], &frame[1..]).unwrap();
            prop_assert_eq!(response.address(), address);
            prop_assert_eq!(response.command(), command);
            prop_assert_eq!(response.payload(), &payload[..]);
        }

        #[test]
        fn prop_single_bit_flip_detected(
            payload in proptest::collection::vec(any::<u8>(), 0..=32),
            position in any::<proptest::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut frame = encode(0xFF, 0x36, &payload);
            // skip the length byte, a flip there is a length mismatch instead
            let index = 1 + position.index(frame.len() - 1);
            frame[index] ^= 1 << bit;

            let is_checksum_mismatch = matches!(
                decode(frame[0], &frame[1..]),
                Err(UhfError::ChecksumMismatch { .. })
            );
            prop_assert!(is_checksum_mismatch);
        }
    }
}
