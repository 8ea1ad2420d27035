//! File-level analysis calls. Each decodes the carrier once and answers
//! from the buffer; any failure collapses into the neutral answer.

use std::path::Path;

use crate::cipher::Password;
use crate::codec::{CoefficientCodec, ContainerCodec};
use crate::config::{QUALITY_RANGE, RESISTANCE_RANGE};
use crate::error::{OutguessError, Result};
use crate::stats::EmbeddingStats;
use crate::{capacity, detect, resistance, stats};

use super::guarded;

fn decode_with<T>(
    codec: &dyn CoefficientCodec,
    image: &Path,
    op: impl FnOnce(Vec<i16>) -> Result<T>,
) -> Result<T> {
    guarded(|| op(codec.decode(image)?.coefficients))
}

/// `false` on any failure, including a carrier that cannot be decoded.
pub fn has_hidden_data(image: impl AsRef<Path>) -> bool {
    has_hidden_data_with(&ContainerCodec, image.as_ref())
}

pub fn has_hidden_data_with(codec: &dyn CoefficientCodec, image: &Path) -> bool {
    decode_with(codec, image, |coefficients| {
        let report = detect::analyze(&coefficients);
        log::debug!("detection report for {}: {report:?}", image.display());
        Ok(report.is_suspicious())
    })
    .unwrap_or(false)
}

/// Capacity estimate in bytes, `0` on any failure or out-of-range setting.
pub fn max_message_size(image: impl AsRef<Path>, resistance_level: i32, quality: i32) -> usize {
    max_message_size_with(&ContainerCodec, image.as_ref(), resistance_level, quality)
}

pub fn max_message_size_with(
    codec: &dyn CoefficientCodec,
    image: &Path,
    resistance_level: i32,
    quality: i32,
) -> usize {
    if !RESISTANCE_RANGE.contains(&resistance_level) || !QUALITY_RANGE.contains(&quality) {
        return 0;
    }
    decode_with(codec, image, |coefficients| {
        Ok(capacity::max_message_size(
            &coefficients,
            resistance_level,
            quality,
        ))
    })
    .unwrap_or(0)
}

/// Whether the hidden message survives simulated requantization at `quality`.
///
/// `false` when the carrier holds no readable message.
pub fn test_compression_resistance<P: Into<Password>>(
    image: impl AsRef<Path>,
    quality: i32,
    password: P,
) -> bool {
    test_compression_resistance_with(&ContainerCodec, image.as_ref(), quality, &password.into())
}

pub fn test_compression_resistance_with(
    codec: &dyn CoefficientCodec,
    image: &Path,
    quality: i32,
    password: &Password,
) -> bool {
    if !QUALITY_RANGE.contains(&quality) {
        return false;
    }
    decode_with(codec, image, |coefficients| {
        resistance::survives_recompression(&coefficients, quality, password)
    })
    .unwrap_or_else(|e: OutguessError| {
        log::debug!("compression self-test on {} failed: {e}", image.display());
        false
    })
}

/// Statistics for a carrier, `None` if it cannot be decoded.
pub fn embedding_stats(image: impl AsRef<Path>) -> Option<EmbeddingStats> {
    embedding_stats_with(&ContainerCodec, image.as_ref())
}

pub fn embedding_stats_with(codec: &dyn CoefficientCodec, image: &Path) -> Option<EmbeddingStats> {
    decode_with(codec, image, |coefficients| {
        Ok(stats::embedding_stats(&coefficients))
    })
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DecodedImage;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    fn cover() -> (TempDir, PathBuf) {
        let dir = tempdir().expect("Failed to create temporary directory");
        let path = dir.path().join("cover.jpg");
        ContainerCodec
            .encode(&DecodedImage::synthetic(128, 96, 85, 21), 85, &path)
            .unwrap();
        (dir, path)
    }

    #[test]
    fn test_max_message_size() {
        let (_dir, path) = cover();
        let decoded = ContainerCodec.decode(&path).unwrap();

        assert_eq!(
            max_message_size(&path, 5, 85),
            capacity::max_message_size(&decoded.coefficients, 5, 85)
        );
        assert!(max_message_size(&path, 1, 100) > max_message_size(&path, 10, 100));
        assert_eq!(max_message_size(&path, 0, 85), 0);
        assert_eq!(max_message_size(&path, 5, 101), 0);
        assert_eq!(max_message_size(path.with_file_name("missing.jpg"), 5, 85), 0);
    }

    #[test]
    fn test_analysis_of_missing_file_is_neutral() {
        let (dir, _path) = cover();
        let missing = dir.path().join("missing.jpg");

        assert!(!has_hidden_data(&missing));
        assert!(!test_compression_resistance(&missing, 90, Password::none()));
        assert!(embedding_stats(&missing).is_none());
    }

    #[test]
    fn test_compression_resistance_on_plain_cover_is_false() {
        let (_dir, path) = cover();
        assert!(!test_compression_resistance(&path, 100, Password::none()));
        assert!(!test_compression_resistance(&path, 0, Password::none()));
    }

    #[test]
    fn test_compression_resistance_noise_free() {
        let (dir, path) = cover();
        let secret = dir.path().join("secret.jpg");
        let embedded = crate::api::embed::prepare()
            .with_image(&path)
            .with_output(&secret)
            .with_message("resist")
            .with_password("pw")
            .execute();
        assert!(embedded.success);

        assert!(test_compression_resistance(&secret, 100, "pw"));
        assert!(!test_compression_resistance(&secret, 50, "pw"));
    }

    #[test]
    fn test_stats_after_embedding() {
        let (dir, path) = cover();
        let secret = dir.path().join("secret.jpg");
        let embedded = crate::api::embed::prepare()
            .with_image(&path)
            .with_output(&secret)
            .with_message("12345")
            .execute();
        assert!(embedded.success, "{:?}", embedded.error_message);

        assert_eq!(embedding_stats(&path).unwrap().coefficients_used, 0);
        assert_eq!(embedding_stats(&secret).unwrap().coefficients_used, 8 * 13);
    }
}
