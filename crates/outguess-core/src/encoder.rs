//! Embedding engine - writes framed payload bits into coefficient LSBs.
//!
//! The engine walks the [`EmbeddingSequence`], skips coefficients that are not
//! eligible at the moment they are visited, and writes one bit per eligible
//! coefficient, MSB first within each byte. Every write leaves the coefficient
//! eligible, so the extractor visits exactly the same coefficients.

use crate::coefficients::{is_eligible, MIN_MAGNITUDE};
use crate::decoder::Extractor;
use crate::error::{OutguessError, Result};
use crate::sequence::EmbeddingSequence;

/// Resistance levels at or above this use [`ResistanceStrategy::High`].
pub const HIGH_RESISTANCE_LEVEL: i32 = 7;

/// How a coefficient is rewritten to carry a bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResistanceStrategy {
    /// Set or clear the LSB in place.
    Direct,
    /// Push the magnitude away from zero by one, then fix the LSB.
    High,
}

impl ResistanceStrategy {
    pub fn from_level(resistance_level: i32) -> Self {
        if resistance_level >= HIGH_RESISTANCE_LEVEL {
            ResistanceStrategy::High
        } else {
            ResistanceStrategy::Direct
        }
    }
}

/// Counters collected while embedding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmbedReport {
    /// Payload bits written, one per eligible coefficient.
    pub bits_written: usize,
    /// Coefficients whose value actually changed.
    pub coefficients_modified: usize,
    /// Sequence positions visited, eligible or not.
    pub positions_visited: usize,
}

/// Embedder for writing framed payloads into DCT coefficients.
///
/// # Note
///
/// The embedder does NOT frame or transform. Data passed to [`Embedder::embed`]
/// is expected to be the output of [`crate::frame::build_frame`].
#[derive(Debug)]
pub struct Embedder {
    strategy: ResistanceStrategy,
}

impl Default for Embedder {
    fn default() -> Self {
        Embedder {
            strategy: ResistanceStrategy::Direct,
        }
    }
}

impl Embedder {
    /// Create an embedder for a resistance level (documented range 1-10).
    pub fn new(resistance_level: i32) -> Self {
        Self::with_strategy(ResistanceStrategy::from_level(resistance_level))
    }

    pub fn with_strategy(strategy: ResistanceStrategy) -> Self {
        Embedder { strategy }
    }

    pub fn strategy(&self) -> ResistanceStrategy {
        self.strategy
    }

    /// Embed a framed payload and verify it by re-extraction.
    ///
    /// # Arguments
    /// * `coefficients` - Mutable slice of quantized DCT coefficients
    /// * `framed` - Frame bytes to write
    /// * `sequence` - Visiting order built for `coefficients.len()`
    ///
    /// # Returns
    /// * `Ok(EmbedReport)` on success (coefficients modified in-place)
    /// * `Err(OutguessError::InvalidInput)` if `sequence` was built for another buffer length
    /// * `Err(OutguessError::InsufficientCoefficients)` if the sequence runs out
    /// * `Err(OutguessError::VerificationFailed)` if re-extraction disagrees
    pub fn embed(
        &self,
        coefficients: &mut [i16],
        framed: &[u8],
        sequence: &EmbeddingSequence,
    ) -> Result<EmbedReport> {
        self.embed_with_progress(coefficients, framed, sequence, |_| {})
    }

    /// Same as [`Embedder::embed`], reporting progress as a percentage (0-100).
    ///
    /// Percentages never decrease; 100 is reported once the frame is written and verified.
    pub fn embed_with_progress<F>(
        &self,
        coefficients: &mut [i16],
        framed: &[u8],
        sequence: &EmbeddingSequence,
        mut progress: F,
    ) -> Result<EmbedReport>
    where
        F: FnMut(u8),
    {
        sequence.check_buffer(coefficients)?;

        let total_bits = framed.len() * 8;
        let mut report = EmbedReport::default();
        let mut last_percent = 0u8;
        progress(0);

        for idx in sequence.iter() {
            if report.bits_written == total_bits {
                break;
            }
            report.positions_visited += 1;

            let coeff = coefficients[idx];
            if !is_eligible(coeff, idx) {
                continue;
            }

            let byte = framed[report.bits_written / 8];
            let bit = (byte >> (7 - report.bits_written % 8)) & 1 == 1;

            let written = modify_coefficient(coeff, bit, self.strategy);
            debug_assert!(is_eligible(written, idx));
            if written != coeff {
                coefficients[idx] = written;
                report.coefficients_modified += 1;
            }
            report.bits_written += 1;

            let percent = ((report.bits_written * 100) / total_bits) as u8;
            // 100 is reserved for after verification
            if percent > last_percent && percent < 100 {
                last_percent = percent;
                progress(percent);
            }
        }

        if report.bits_written < total_bits {
            return Err(OutguessError::InsufficientCoefficients {
                written_bits: report.bits_written,
                required_bits: total_bits,
            });
        }

        self.verify(coefficients, framed, sequence)?;
        progress(100);

        log::trace!(
            "embedded {} bits, {} coefficients changed, {} positions visited",
            report.bits_written,
            report.coefficients_modified,
            report.positions_visited
        );

        Ok(report)
    }

    /// Re-extract the frame and compare it with what was written.
    ///
    /// The whole frame is compared, which covers the mandatory leading 16 bytes.
    pub fn verify(
        &self,
        coefficients: &[i16],
        framed: &[u8],
        sequence: &EmbeddingSequence,
    ) -> Result<()> {
        let extracted = Extractor::new()
            .read_bytes(coefficients, sequence, framed.len())
            .map_err(|_| OutguessError::VerificationFailed { offset: 0 })?;

        match extracted.iter().zip(framed).position(|(a, b)| a != b) {
            Some(offset) => Err(OutguessError::VerificationFailed { offset }),
            None => Ok(()),
        }
    }
}

/// Rewrite an eligible coefficient so its LSB equals `bit`.
///
/// The result is always eligible again: never zero, magnitude at least 2.
pub fn modify_coefficient(coeff: i16, bit: bool, strategy: ResistanceStrategy) -> i16 {
    let written = match strategy {
        ResistanceStrategy::High => push_away_from_zero(coeff, bit)
            // only i16::MIN and i16::MAX overflow; both keep |v| >= 2 on a direct set
            .unwrap_or_else(|| set_lsb(coeff, bit)),
        ResistanceStrategy::Direct => set_lsb(coeff, bit),
    };

    if written.unsigned_abs() < MIN_MAGNITUDE {
        // -2 receiving a 1 would shrink to -1
        push_away_from_zero(coeff, bit).unwrap_or(written)
    } else {
        written
    }
}

#[inline]
fn set_lsb(coeff: i16, bit: bool) -> i16 {
    (coeff & !1) | bit as i16
}

/// Grow the magnitude by one (sign preserved), then force the LSB. `None` on i16 overflow.
#[inline]
fn push_away_from_zero(coeff: i16, bit: bool) -> Option<i16> {
    let v = coeff as i32;
    let pushed = if v > 0 { v + 1 } else { v - 1 };
    let target = if bit { pushed | 1 } else { pushed & !1 };
    i16::try_from(target).ok()
}
