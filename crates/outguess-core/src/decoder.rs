//! Extraction engine - reads payload bits back out of coefficient LSBs.
//!
//! Every read is a fresh walk from the start of the sequence. Reading the
//! header and reading the full frame are two independent walks; nothing is
//! resumed between them.

use crate::coefficients::lsb;
use crate::error::{OutguessError, Result};
use crate::frame::{self, FrameHeader, HEADER_LEN};
use crate::sequence::EmbeddingSequence;

/// Reads framed payloads along an [`EmbeddingSequence`].
///
/// # Note
///
/// The extractor does NOT undo the keyed stream. Payloads returned from
/// [`Extractor::extract_frame`] are exactly what was framed at embed time.
#[derive(Debug, Default)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Extractor
    }

    /// Read `expected_size` bytes, MSB first, from the eligible coefficients in sequence order.
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` with exactly `expected_size` bytes
    /// * `Err(OutguessError::InvalidInput)` if `sequence` was built for another buffer length
    /// * `Err(OutguessError::ShortRead)` if the sequence runs out first
    pub fn read_bytes(
        &self,
        coefficients: &[i16],
        sequence: &EmbeddingSequence,
        expected_size: usize,
    ) -> Result<Vec<u8>> {
        sequence.check_buffer(coefficients)?;

        let mut bytes = Vec::with_capacity(expected_size);
        if expected_size == 0 {
            return Ok(bytes);
        }

        let mut current = 0u8;
        let mut bit_index = 0;

        for idx in sequence.eligible(coefficients) {
            current = (current << 1) | lsb(coefficients[idx]) as u8;
            bit_index += 1;

            if bit_index == 8 {
                bytes.push(current);
                if bytes.len() == expected_size {
                    return Ok(bytes);
                }
                current = 0;
                bit_index = 0;
            }
        }

        Err(OutguessError::ShortRead {
            expected: expected_size,
            available: bytes.len(),
        })
    }

    /// Read and parse only the frame header.
    pub fn read_header(
        &self,
        coefficients: &[i16],
        sequence: &EmbeddingSequence,
    ) -> Result<FrameHeader> {
        let header = self.read_bytes(coefficients, sequence, HEADER_LEN)?;
        FrameHeader::parse(&header)
    }

    /// Extract a complete frame and return its checksum-verified payload.
    pub fn extract_frame(
        &self,
        coefficients: &[i16],
        sequence: &EmbeddingSequence,
    ) -> Result<Vec<u8>> {
        let header = self.read_header(coefficients, sequence)?;
        log::trace!(
            "frame header declares {} bytes, crc {:#010x}",
            header.length,
            header.checksum
        );

        let framed = self.read_bytes(coefficients, sequence, header.frame_len())?;
        let payload = frame::open_frame(&framed)?;

        Ok(payload.to_vec())
    }
}
