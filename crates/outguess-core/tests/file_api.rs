use std::fs;
use std::path::{Path, PathBuf};

use outguess_core::api::{self, embed, extract};
use outguess_core::{CoefficientCodec, Config, ContainerCodec, DecodedImage, ErrorCode};
use tempfile::{tempdir, TempDir};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_image(dir: &Path, name: &str, image: &DecodedImage) -> PathBuf {
    let path = dir.join(name);
    ContainerCodec.encode(image, image.quality, &path).unwrap();
    path
}

fn setup() -> (TempDir, PathBuf) {
    init_logger();
    let dir = tempdir().expect("Failed to create temporary directory");
    let cover = write_image(
        dir.path(),
        "cover.jpg",
        &DecodedImage::synthetic(160, 120, 85, 99),
    );
    (dir, cover)
}

#[test]
fn embed_then_extract_hello() {
    let (dir, cover) = setup();
    let secret = dir.path().join("secret.jpg");

    let embedded = embed::prepare()
        .with_image(&cover)
        .with_output(&secret)
        .with_message("HELLO")
        .execute();
    assert!(embedded.success, "{:?}", embedded.error_message);
    assert_eq!(embedded.error_code, ErrorCode::Success);
    assert!(embedded.error_message.is_none());
    assert_eq!(embedded.message_size, 5);
    assert_eq!(embedded.output_path, secret);
    assert_eq!(embedded.output_size, fs::metadata(&secret).unwrap().len());
    assert!((embedded.compression_ratio - 1.0).abs() < 1e-9);

    let extracted = extract::prepare().from_image(&secret).execute();
    assert!(extracted.success);
    assert!(extracted.verified);
    assert_eq!(extracted.error_code, ErrorCode::Success);
    assert_eq!(extracted.message, b"HELLO");
    assert_eq!(extracted.as_text(), "HELLO");
}

#[test]
fn wrong_password_reports_success_with_garbled_message() {
    let (dir, cover) = setup();
    let secret = dir.path().join("secret.jpg");

    assert!(
        embed::prepare()
            .with_image(&cover)
            .with_output(&secret)
            .with_message("attack at dawn")
            .with_password("secret123")
            .execute()
            .success
    );

    let right = extract::prepare()
        .from_image(&secret)
        .with_password("secret123")
        .execute();
    let wrong = extract::prepare()
        .from_image(&secret)
        .with_password("wrong")
        .execute();

    assert_eq!(right.message, b"attack at dawn");
    assert!(wrong.success);
    assert!(wrong.verified);
    assert_eq!(wrong.error_code, ErrorCode::Success);
    assert_eq!(wrong.message.len(), right.message.len());
    assert_ne!(wrong.message, right.message);
}

#[test]
fn config_record_drives_both_directions() {
    let (dir, cover) = setup();
    let secret = dir.path().join("secret.jpg");
    let config = Config::new()
        .with_password("hunter2")
        .with_resistance(9)
        .with_quality(75)
        .with_verbose(true);

    let embedded = embed::prepare()
        .with_image(&cover)
        .with_output(&secret)
        .with_message([0u8, 1, 2, 254, 255])
        .with_config(config.clone())
        .execute();
    assert!(embedded.success, "{:?}", embedded.error_message);

    // the output is written at the configured quality
    assert_eq!(ContainerCodec.decode(&secret).unwrap().quality, 75);

    let extracted = extract::prepare()
        .from_image(&secret)
        .with_config(config)
        .execute();
    assert_eq!(extracted.message, [0u8, 1, 2, 254, 255]);
}

#[test]
fn capacity_plus_one_is_message_too_large() {
    let (dir, cover) = setup();
    let secret = dir.path().join("secret.jpg");
    let capacity = api::max_message_size(&cover, 5, 85);
    assert!(capacity > 0);

    let result = embed::prepare()
        .with_image(&cover)
        .with_output(&secret)
        .with_message(vec![7u8; capacity + 1])
        .execute();
    assert!(!result.success);
    assert_eq!(result.error_code, ErrorCode::MessageTooLarge);
    assert_eq!(result.error_code.as_i32(), -4);
    assert!(!secret.exists());

    let result = embed::prepare()
        .with_image(&cover)
        .with_output(&secret)
        .with_message(vec![7u8; capacity])
        .execute();
    assert!(result.success, "{:?}", result.error_message);
}

#[test]
fn undersized_and_missing_files() {
    let (dir, _cover) = setup();
    let tiny = dir.path().join("tiny.jpg");
    fs::write(&tiny, [0xFF, 0xD8, 0xFF, 0xE0, 0, 0]).unwrap();
    let missing = dir.path().join("missing.jpg");

    let result = extract::prepare().from_image(&tiny).execute();
    assert_eq!(result.error_code, ErrorCode::InvalidFormat);

    let result = extract::prepare().from_image(&missing).execute();
    assert_eq!(result.error_code, ErrorCode::FileNotFound);

    let result = embed::prepare()
        .with_image(&tiny)
        .with_output(dir.path().join("out.jpg"))
        .with_message("x")
        .execute();
    assert_eq!(result.error_code, ErrorCode::InvalidFormat);
    assert_eq!(result.original_size, 0);

    assert_eq!(api::max_message_size(&tiny, 5, 85), 0);
    assert!(!api::has_hidden_data(&missing));
}

#[test]
fn detector_needs_both_signals() {
    let (dir, _cover) = setup();

    // skewed LSBs over many distinct values
    let mut rng = fastrand::Rng::with_seed(5);
    let mut skewed = DecodedImage::synthetic(64, 64, 85, 1);
    for (i, c) in skewed.coefficients.iter_mut().enumerate() {
        if i % 64 != 0 {
            *c = rng.i16(1..40) * 2 * if rng.bool() { 1 } else { -1 };
        }
    }
    let skewed = write_image(dir.path(), "skewed.jpg", &skewed);
    assert!(api::has_hidden_data(&skewed));

    // skewed LSBs but a single value, so no entropy vote
    let mut flat = DecodedImage::synthetic(64, 64, 85, 1);
    for (i, c) in flat.coefficients.iter_mut().enumerate() {
        *c = if i % 64 == 0 { 0 } else { 2 };
    }
    let flat = write_image(dir.path(), "flat.jpg", &flat);
    assert!(!api::has_hidden_data(&flat));
}

#[test]
fn stats_track_embedded_frame() {
    let (dir, cover) = setup();
    let secret = dir.path().join("secret.jpg");
    let embedded = embed::prepare()
        .with_image(&cover)
        .with_output(&secret)
        .with_message("stats")
        .execute();
    assert!(embedded.error_code.is_success(), "{:?}", embedded.error_message);

    let before = api::embedding_stats(&cover).unwrap();
    let after = api::embedding_stats(&secret).unwrap();

    assert_eq!(before.total_coefficients, after.total_coefficients);
    assert_eq!(before.eligible_coefficients, after.eligible_coefficients);
    assert_eq!(before.coefficients_used, 0);
    assert_eq!(after.coefficients_used, 8 * (8 + 5));
}

#[test]
fn compression_self_test() {
    let (dir, cover) = setup();
    let secret = dir.path().join("secret.jpg");
    embed::prepare()
        .with_image(&cover)
        .with_output(&secret)
        .with_message("still here?")
        .with_password("pw")
        .execute();

    assert!(api::test_compression_resistance(&secret, 100, "pw"));
    assert!(!api::test_compression_resistance(&cover, 100, "pw"));
}

#[test]
fn error_codes_are_stable() {
    let expected = [
        (ErrorCode::Success, 0),
        (ErrorCode::InvalidInput, -1),
        (ErrorCode::FileNotFound, -2),
        (ErrorCode::InvalidFormat, -3),
        (ErrorCode::MessageTooLarge, -4),
        (ErrorCode::EmbeddingFailed, -5),
        (ErrorCode::ExtractionFailed, -6),
        (ErrorCode::AllocationFailure, -7),
        (ErrorCode::CryptoFailure, -8),
    ];
    for (code, value) in expected {
        assert_eq!(code.as_i32(), value);
        assert_eq!(ErrorCode::try_from(value), Ok(code));
        assert!(!code.description().is_empty());
        assert_eq!(code.is_success(), value == 0);
    }
    assert!(!outguess_core::VERSION.is_empty());
}
