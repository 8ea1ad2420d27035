//! Compression-resistance self-test.
//!
//! Simulates requantization noise on a carrier that already holds a message
//! and checks whether the message can still be recovered.

use crate::cipher::Password;
use crate::coefficients::is_eligible;
use crate::decoder::Extractor;
use crate::error::Result;
use crate::sequence::EmbeddingSequence;

/// Chance that one eligible coefficient is nudged at `quality`, `min(1, (1 - q/100) * 2)`.
pub fn nudge_probability(quality: i32) -> f64 {
    ((1.0 - quality as f64 / 100.0) * 2.0).clamp(0.0, 1.0)
}

/// Copy of `coefficients` with eligible AC values nudged by +-1.
///
/// DC terms and coefficients with magnitude below 2 are copied unchanged.
pub fn simulate_requantization(
    coefficients: &[i16],
    quality: i32,
    rng: &mut fastrand::Rng,
) -> Vec<i16> {
    let probability = nudge_probability(quality);

    coefficients
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if !is_eligible(c, i) || rng.f64() >= probability {
                return c;
            }
            if rng.bool() {
                c.saturating_add(1)
            } else {
                c.saturating_sub(1)
            }
        })
        .collect()
}

/// Extract the message, perturb a copy of the buffer, extract again, compare.
///
/// Fails if the unperturbed buffer holds no readable message. A perturbed
/// buffer that no longer extracts counts as not surviving.
pub fn survives_recompression(
    coefficients: &[i16],
    quality: i32,
    password: &Password,
) -> Result<bool> {
    survives_recompression_with_rng(coefficients, quality, password, &mut fastrand::Rng::new())
}

/// [`survives_recompression`] with a caller-supplied generator.
pub fn survives_recompression_with_rng(
    coefficients: &[i16],
    quality: i32,
    password: &Password,
    rng: &mut fastrand::Rng,
) -> Result<bool> {
    let sequence = EmbeddingSequence::for_buffer(coefficients.len());
    let extractor = Extractor::new();

    let original = password.transform(&extractor.extract_frame(coefficients, &sequence)?);

    let perturbed = simulate_requantization(coefficients, quality, rng);
    let survived = match extractor.extract_frame(&perturbed, &sequence) {
        Ok(payload) => password.transform(&payload) == original,
        Err(e) => {
            log::debug!("message lost after simulated requantization: {e}");
            false
        }
    };

    log::debug!(
        "requantization at quality {quality} (nudge probability {:.2}): survived={survived}",
        nudge_probability(quality)
    );
    Ok(survived)
}
