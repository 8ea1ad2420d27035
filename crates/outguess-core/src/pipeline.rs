//! Buffer-level hide and unveil.
//!
//! `hide` is capacity check, keyed stream, framing, embedding and
//! verification. `unveil` is extraction, checksum, keyed stream. Both work on
//! a coefficient buffer owned by the caller; nothing is kept between calls.

use log::Level;

use crate::capacity;
use crate::config::Config;
use crate::decoder::Extractor;
use crate::detect::histogram_entropy;
use crate::encoder::{EmbedReport, Embedder};
use crate::error::{OutguessError, Result};
use crate::frame::build_frame;
use crate::sequence::EmbeddingSequence;

/// What a successful [`hide`] did to the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hidden {
    pub report: EmbedReport,
    /// Capacity estimate the message was checked against.
    pub capacity: usize,
}

fn summary_level(config: &Config) -> Level {
    if config.verbose {
        Level::Info
    } else {
        Level::Debug
    }
}

/// Hide `message` in `coefficients`.
///
/// The capacity check happens before any coefficient is modified. On an
/// embedding or verification error the buffer is left partially written and
/// must be discarded.
pub fn hide(coefficients: &mut [i16], message: &[u8], config: &Config) -> Result<Hidden> {
    hide_with_progress(coefficients, message, config, |_| {})
}

/// [`hide`] with a percentage progress callback.
pub fn hide_with_progress<F>(
    coefficients: &mut [i16],
    message: &[u8],
    config: &Config,
    progress: F,
) -> Result<Hidden>
where
    F: FnMut(u8),
{
    let capacity =
        capacity::max_message_size(coefficients, config.resistance_level, config.quality);
    if message.len() > capacity {
        return Err(OutguessError::MessageTooLarge {
            required: message.len(),
            available: capacity,
        });
    }
    if message.len() > config.max_message_size {
        log::warn!(
            "message of {} bytes exceeds the advisory maximum of {} bytes",
            message.len(),
            config.max_message_size
        );
    }

    let payload = config.password.transform(message);
    let framed = build_frame(&payload)?;
    let sequence = EmbeddingSequence::for_buffer(coefficients.len());

    let report = Embedder::with_strategy(config.strategy()).embed_with_progress(
        coefficients,
        &framed,
        &sequence,
        progress,
    )?;

    let level = summary_level(config);
    if log::log_enabled!(level) {
        log::log!(
            level,
            "embedded {} bytes with entropy {:.3} ({} coefficients changed, {:?} strategy, capacity {} bytes)",
            message.len(),
            histogram_entropy(coefficients),
            report.coefficients_modified,
            config.strategy(),
            capacity
        );
    }

    Ok(Hidden { report, capacity })
}

/// Recover the message hidden in `coefficients`.
///
/// A wrong password is not detected: the checksum covers the transformed
/// bytes, so extraction succeeds and returns garbled content.
pub fn unveil(coefficients: &[i16], config: &Config) -> Result<Vec<u8>> {
    let sequence = EmbeddingSequence::for_buffer(coefficients.len());

    let payload = Extractor::new()
        .extract_frame(coefficients, &sequence)
        .inspect_err(|e| {
            if let OutguessError::DeclaredLengthTooLarge { length, .. } = e {
                log::warn!("implausible frame length {length}, carrier holds no message or was resized");
            }
        })?;

    let message = config.password.transform(&payload);
    log::log!(
        summary_level(config),
        "extracted and verified {} bytes",
        message.len()
    );

    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::test_support::generate_test_coefficients;

    #[test]
    fn test_hide_and_unveil() {
        let mut coeffs = generate_test_coefficients(100);
        let config = Config::default();

        let hidden = hide(&mut coeffs, b"HELLO", &config).unwrap();
        assert_eq!(hidden.report.bits_written, (8 + 5) * 8);
        assert!(hidden.report.positions_visited >= hidden.report.bits_written);
        assert!(hidden.report.coefficients_modified <= hidden.report.bits_written);
        assert!(hidden.capacity >= 5);
        assert_eq!(unveil(&coeffs, &config).unwrap(), b"HELLO");
    }

    #[test]
    fn test_hide_and_unveil_with_password() {
        let mut coeffs = generate_test_coefficients(100);
        let config = Config::default().with_password("secret123");

        hide(&mut coeffs, b"attack at dawn", &config).unwrap();
        assert_eq!(unveil(&coeffs, &config).unwrap(), b"attack at dawn");

        // without the password the stored ciphertext comes back
        let raw = unveil(&coeffs, &Config::default()).unwrap();
        assert_ne!(raw, b"attack at dawn");
        assert_eq!(raw.len(), 14);
    }

    #[test]
    fn test_too_large_leaves_buffer_untouched() {
        let mut coeffs = generate_test_coefficients(20);
        let original = coeffs.clone();
        let config = Config::default();
        let capacity = capacity::max_message_size(&coeffs, 5, 85);

        let err = hide(&mut coeffs, &vec![1u8; capacity + 1], &config).unwrap_err();
        assert!(matches!(err, OutguessError::MessageTooLarge { .. }));
        assert_eq!(coeffs, original);
    }

    #[test]
    fn test_advisory_limit_is_not_enforced() {
        let mut coeffs = generate_test_coefficients(100);
        let config = Config::default().with_max_message_size(2);

        hide(&mut coeffs, b"longer than two", &config).unwrap();
        assert_eq!(unveil(&coeffs, &config).unwrap(), b"longer than two");
    }

    #[test]
    fn test_unveil_plain_carrier_fails() {
        let coeffs = generate_test_coefficients(100);
        let err = unveil(&coeffs, &Config::default()).unwrap_err();
        assert_eq!(err.code(), crate::ErrorCode::ExtractionFailed);
    }
}
