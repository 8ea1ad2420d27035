//! Embedding statistics for a carrier buffer.

use crate::coefficients::count_eligible;
use crate::decoder::Extractor;
use crate::frame::HEADER_LEN;
use crate::sequence::EmbeddingSequence;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EmbeddingStats {
    pub total_coefficients: usize,
    pub eligible_coefficients: usize,
    /// Coefficients carrying frame bits, zero when no valid frame is present.
    pub coefficients_used: usize,
    /// `coefficients_used / eligible_coefficients`, zero for an empty carrier.
    pub capacity_utilization: f64,
}

/// Gather statistics; a frame counts only if its header parses and its checksum verifies.
pub fn embedding_stats(coefficients: &[i16]) -> EmbeddingStats {
    let eligible_coefficients = count_eligible(coefficients);
    let sequence = EmbeddingSequence::for_buffer(coefficients.len());

    let coefficients_used = Extractor::new()
        .extract_frame(coefficients, &sequence)
        .map(|payload| (HEADER_LEN + payload.len()) * 8)
        .unwrap_or(0);

    let capacity_utilization = if eligible_coefficients == 0 {
        0.0
    } else {
        coefficients_used as f64 / eligible_coefficients as f64
    };

    EmbeddingStats {
        total_coefficients: coefficients.len(),
        eligible_coefficients,
        coefficients_used,
        capacity_utilization,
    }
}
