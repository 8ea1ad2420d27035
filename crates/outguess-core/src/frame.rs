//! Payload frame construction and parsing.
//!
//! ```text
//! [4 bytes] payload length (big-endian u32)
//! [4 bytes] CRC-32 of the payload (big-endian u32)
//! [N bytes] payload, already passed through the keyed stream if a password is set
//! ```

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::crc32;
use crate::error::{OutguessError, Result};

/// Fixed overhead: length(4) + crc(4).
pub const HEADER_LEN: usize = 8;

/// Largest payload length a header may declare before it is treated as garbage.
pub const MAX_DECLARED_LENGTH: usize = 10_000_000;

/// Parsed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub length: u32,
    pub checksum: u32,
}

impl FrameHeader {
    /// Parse the first [`HEADER_LEN`] bytes of an extracted frame.
    ///
    /// Rejects headers that declare more than [`MAX_DECLARED_LENGTH`] bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(OutguessError::ShortRead {
                expected: HEADER_LEN,
                available: bytes.len(),
            });
        }

        let mut reader = &bytes[..HEADER_LEN];
        let length = reader.read_u32::<BigEndian>()?;
        let checksum = reader.read_u32::<BigEndian>()?;

        if length as usize > MAX_DECLARED_LENGTH {
            return Err(OutguessError::DeclaredLengthTooLarge {
                length: length as usize,
                max: MAX_DECLARED_LENGTH,
            });
        }

        Ok(FrameHeader { length, checksum })
    }

    /// Total frame size this header announces.
    pub fn frame_len(&self) -> usize {
        HEADER_LEN + self.length as usize
    }
}

/// Wrap a (possibly transformed) payload as `length || crc || payload`.
pub fn build_frame(payload: &[u8]) -> Result<Vec<u8>> {
    let length = u32::try_from(payload.len()).map_err(|_| {
        OutguessError::invalid_input(format!(
            "payload of {} bytes does not fit a 32-bit length field",
            payload.len()
        ))
    })?;

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.write_u32::<BigEndian>(length)?;
    frame.write_u32::<BigEndian>(crc32::checksum(payload))?;
    frame.extend_from_slice(payload);

    Ok(frame)
}

/// Verify a complete frame and return its payload slice.
pub fn open_frame(frame: &[u8]) -> Result<&[u8]> {
    let header = FrameHeader::parse(frame)?;
    let end = header.frame_len();
    if frame.len() < end {
        return Err(OutguessError::ShortRead {
            expected: end,
            available: frame.len(),
        });
    }

    let payload = &frame[HEADER_LEN..end];
    let computed = crc32::checksum(payload);
    if computed != header.checksum {
        return Err(OutguessError::ChecksumMismatch {
            stored: header.checksum,
            computed,
        });
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let frame = build_frame(b"HELLO").unwrap();

        assert_eq!(frame.len(), HEADER_LEN + 5);
        assert_eq!(&frame[0..4], &[0, 0, 0, 5]);
        assert_eq!(&frame[4..8], &crc32::checksum(b"HELLO").to_be_bytes());
        assert_eq!(&frame[8..], b"HELLO");
    }

    #[test]
    fn test_open_frame_returns_payload() {
        let frame = build_frame(b"payload bytes").unwrap();
        assert_eq!(open_frame(&frame).unwrap(), b"payload bytes");
    }

    #[test]
    fn test_open_frame_ignores_trailing_bytes() {
        let mut frame = build_frame(b"abc").unwrap();
        frame.extend_from_slice(&[0xAA; 16]);
        assert_eq!(open_frame(&frame).unwrap(), b"abc");
    }

    #[test]
    fn test_empty_payload() {
        let frame = build_frame(b"").unwrap();
        assert_eq!(frame, vec![0u8; 8]);
        assert_eq!(open_frame(&frame).unwrap(), b"");
    }

    #[test]
    fn test_checksum_mismatch() {
        let mut frame = build_frame(b"HELLO").unwrap();
        frame[9] ^= 0x01;

        let err = open_frame(&frame).unwrap_err();
        assert!(matches!(err, OutguessError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_oversized_length_rejected() {
        let mut header = Vec::new();
        header.extend_from_slice(&10_000_001u32.to_be_bytes());
        header.extend_from_slice(&0u32.to_be_bytes());

        let err = FrameHeader::parse(&header).unwrap_err();
        assert!(matches!(
            err,
            OutguessError::DeclaredLengthTooLarge {
                length: 10_000_001,
                ..
            }
        ));
    }

    #[test]
    fn test_max_length_accepted() {
        let mut header = Vec::new();
        header.extend_from_slice(&10_000_000u32.to_be_bytes());
        header.extend_from_slice(&7u32.to_be_bytes());

        let parsed = FrameHeader::parse(&header).unwrap();
        assert_eq!(parsed.length, 10_000_000);
        assert_eq!(parsed.checksum, 7);
    }

    #[test]
    fn test_truncated_frame() {
        let frame = build_frame(b"HELLO").unwrap();
        let err = open_frame(&frame[..10]).unwrap_err();
        assert!(matches!(
            err,
            OutguessError::ShortRead {
                expected: 13,
                available: 10
            }
        ));
        assert!(matches!(
            FrameHeader::parse(&frame[..4]).unwrap_err(),
            OutguessError::ShortRead { .. }
        ));
    }
}
