//! Capacity estimation.
//!
//! The estimate scales the eligible coefficient count by a resistance factor
//! and a quality factor and subtracts the frame header. It is deliberately
//! conservative for resistance levels above 1 and qualities below 100; the
//! engine's real limit is one bit per eligible coefficient.

use crate::coefficients::count_eligible;
use crate::frame::HEADER_LEN;

/// Capacity lost per resistance level above 1.
const RESISTANCE_STEP: f64 = 0.08;

/// `1 - (level - 1) * 0.08`. Not clamped: levels above 13 go negative.
pub fn resistance_factor(resistance_level: i32) -> f64 {
    1.0 - (resistance_level as f64 - 1.0) * RESISTANCE_STEP
}

/// `quality / 100`.
pub fn quality_factor(quality: i32) -> f64 {
    quality as f64 / 100.0
}

/// Maximum payload bytes for a buffer, never negative.
///
/// # Arguments
/// * `coefficients` - The unmodified coefficient buffer
/// * `resistance_level` - Documented range 1-10
/// * `quality` - Documented range 1-100
pub fn max_message_size(coefficients: &[i16], resistance_level: i32, quality: i32) -> usize {
    capacity_for_eligible(count_eligible(coefficients), resistance_level, quality)
}

/// Same as [`max_message_size`] for a known eligible count.
pub fn capacity_for_eligible(eligible: usize, resistance_level: i32, quality: i32) -> usize {
    let available_bits =
        (eligible as f64 * resistance_factor(resistance_level) * quality_factor(quality)).floor();
    if available_bits <= 0.0 {
        return 0;
    }

    let bytes = (available_bits as usize) / 8;
    bytes.saturating_sub(HEADER_LEN)
}
