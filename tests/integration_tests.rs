//! Integration tests for Kavach
//!
//! Exercises the public pipeline end to end:
//! - round trip through encode/decode
//! - key sensitivity (wrong key is an error, never garbage)
//! - capacity boundary and all-or-nothing embedding
//! - alpha preservation and metric sanity
//! - truncated and non-stego images

use kavach::crypto::KdfParams;
use kavach::metrics::{security_index, PSNR_CEILING};
use kavach::raster::{load_pixels, save_png};
use kavach::stego::{eligible_lsbs, is_eligible, required_bits};
use kavach::{
    capacity, compute, decode_with_config, encode_with_config, extract_blob, narrate, Config,
    Error, NarrativeError, NarrativeService, PixelBuffer, SecurityReport,
};

/// Cheap Argon2 settings so the suite stays fast.
fn config() -> Config {
    Config {
        kdf: KdfParams {
            memory_kib: 256,
            iterations: 1,
        },
        ..Config::default()
    }
}

fn gradient(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        [
            ((x * 7 + y) % 256) as u8,
            ((y * 13) % 256) as u8,
            ((x ^ y) % 256) as u8,
            (255 - (x % 50)) as u8,
        ]
    })
    .unwrap()
}

/// Test basic encode/decode roundtrip
#[test]
fn test_encode_decode_roundtrip() {
    let carrier = gradient(100, 100);
    let config = config();

    let result = encode_with_config(&carrier, "hi", "pw1", &config).unwrap();
    let secret = decode_with_config(result.pixels(), "pw1", &config).unwrap();

    assert_eq!(secret, "hi");
}

/// Test roundtrip with assorted texts, including empty and multi-byte
#[test]
fn test_roundtrip_various_texts() {
    let carrier = gradient(160, 120);
    let config = config();
    let long = "The quick brown fox jumps over the lazy dog. ".repeat(200);

    for (text, key) in [
        ("", "k"),
        ("नमस्ते दुनिया", "कुंजी"),
        ("emoji 🛰️🔐 and\nnewlines\r\n", "a"),
        (long.as_str(), "long-key-with-symbols-!@#$%^&*()"),
    ] {
        let result = encode_with_config(&carrier, text, key, &config).unwrap();
        assert_eq!(decode_with_config(result.pixels(), key, &config).unwrap(), text);
    }
}

/// Test that the default configuration (full Argon2 cost) also round-trips
#[test]
fn test_default_config_roundtrip() {
    let carrier = gradient(64, 64);
    let result = kavach::encode(&carrier, "defaults", "pw").unwrap();
    assert_eq!(kavach::decode(result.pixels(), "pw").unwrap(), "defaults");
}

/// Test that a wrong key is reported, not silently decoded
#[test]
fn test_wrong_key_fails() {
    let carrier = gradient(100, 100);
    let config = config();

    let result = encode_with_config(&carrier, "classified", "key-one", &config).unwrap();

    for wrong in ["key-two", "key-on", "KEY-ONE", "key-one "] {
        let err = decode_with_config(result.pixels(), wrong, &config).unwrap_err();
        assert!(matches!(err, Error::Decryption), "key {:?} gave {:?}", wrong, err);
    }
}

/// Test that a 4x4 carrier is too small for "hi" while 100x100 fits
#[test]
fn test_small_carrier_capacity_exceeded() {
    let config = config();
    let tiny = PixelBuffer::new(4, 4, vec![0u8; 64]).unwrap();

    match encode_with_config(&tiny, "hi", "pw1", &config) {
        Err(Error::CapacityExceeded {
            required,
            available,
        }) => {
            assert_eq!(available, 48);
            assert!(required > available);
        }
        other => panic!("expected CapacityExceeded, got {:?}", other),
    }

    let big = PixelBuffer::new(100, 100, vec![0u8; 100 * 100 * 4]).unwrap();
    let result = encode_with_config(&big, "hi", "pw1", &config).unwrap();
    assert_eq!(decode_with_config(result.pixels(), "pw1", &config).unwrap(), "hi");
}

/// Test that the capacity arithmetic matches the blob the encoder produces
#[test]
fn test_capacity_matches_blob_size() {
    let config = config();
    let carrier = gradient(100, 100);
    let result = encode_with_config(&carrier, "measure me", "pw", &config).unwrap();

    let blob = extract_blob(result.pixels(), &config).unwrap();
    assert!(required_bits(blob.len()) <= capacity(&carrier, &config).available_bits);
    assert!(blob.len() <= capacity(&carrier, &config).max_blob_bytes);
}

/// Test that alpha samples are never modified
#[test]
fn test_alpha_preserved() {
    let carrier = gradient(120, 80);
    let result = encode_with_config(&carrier, &"x".repeat(2000), "pw", &config()).unwrap();

    assert!(carrier.alpha().eq(result.pixels().alpha()));
}

/// Test that only low bits of RGB samples change
#[test]
fn test_only_lsbs_change() {
    let carrier = gradient(100, 100);
    let result = encode_with_config(&carrier, "lsb only", "pw", &config()).unwrap();

    for (index, (a, b)) in carrier
        .as_bytes()
        .iter()
        .zip(result.pixels().as_bytes())
        .enumerate()
    {
        assert_eq!(a & 0xFE, b & 0xFE, "high bits changed at sample {}", index);
        if !is_eligible(index) {
            assert_eq!(a, b);
        }
    }
}

/// Test metrics: unchanged carrier and fully flipped LSBs
#[test]
fn test_metrics_bounds() {
    let carrier = gradient(50, 50);

    let same = compute(&carrier, &carrier).unwrap();
    assert_eq!(same.mse, 0.0);
    assert_eq!(same.psnr, PSNR_CEILING);

    let flipped: Vec<u8> = carrier
        .as_bytes()
        .iter()
        .enumerate()
        .map(|(i, &s)| if is_eligible(i) { s ^ 1 } else { s })
        .collect();
    let flipped = PixelBuffer::new(50, 50, flipped).unwrap();
    let worst = compute(&carrier, &flipped).unwrap();

    assert!((worst.mse - 1.0).abs() < 1e-12);
    assert!(worst.psnr < same.psnr);
    assert!((worst.psnr - 48.130_803_6).abs() < 1e-6);
}

/// Test that re-embedding identical bits costs nothing
#[test]
fn test_reembedding_same_bits_gives_zero_mse() {
    let config = config();
    let carrier = gradient(100, 100);
    let first = encode_with_config(&carrier, "twice", "pw", &config).unwrap();

    // Write the very same frame again on top of the stego image
    let blob = extract_blob(first.pixels(), &config).unwrap();
    let again = config
        .lsb_codec()
        .embed(first.pixels(), blob.as_bytes())
        .unwrap();

    let report = compute(first.pixels(), &again).unwrap();
    assert_eq!(report.mse, 0.0);
    assert_eq!(report.psnr, 100.0);
    assert_eq!(report.security_index, 100.0);
}

/// Test the encode report: measured accuracy, a high PSNR and the derived index
#[test]
fn test_encode_report() {
    let result = encode_with_config(&gradient(200, 200), "report", "pw", &config()).unwrap();
    let report = result.report();

    assert_eq!(report.accuracy, 100.0);
    assert!(report.mse > 0.0 && report.mse < 0.1);
    assert!(report.psnr > 45.0 && report.psnr < PSNR_CEILING);
    // A few hundred flipped bits put PSNR in the 70s, so the index is below the cap
    assert_eq!(report.security_index, security_index(report.psnr));
    assert!(report.security_index > 0.0 && report.security_index < 100.0);
}

/// Test that a cropped stego image reports truncation, not garbage
#[test]
fn test_truncated_stego_image() {
    let config = config();
    let carrier = gradient(100, 100);
    let result = encode_with_config(&carrier, &"payload ".repeat(40), "pw", &config).unwrap();

    // One row = 300 bits: the header fits, the blob does not
    let cropped = result.into_pixels().truncate_rows(1).unwrap();
    match decode_with_config(&cropped, "pw", &config) {
        Err(Error::TruncatedData {
            required,
            available,
        }) => {
            assert_eq!(available, 300);
            assert!(required > available);
        }
        other => panic!("expected TruncatedData, got {:?}", other),
    }
}

/// Test that an ordinary image has no payload
#[test]
fn test_plain_image_has_no_payload() {
    let plain = PixelBuffer::filled(80, 80, [10, 20, 30, 255]).unwrap();
    assert!(matches!(
        decode_with_config(&plain, "pw", &config()),
        Err(Error::NoPayloadFound)
    ));
}

/// Test that flipping one embedded bit is caught by the integrity check
#[test]
fn test_corrupted_payload_bit() {
    let config = config();
    let result = encode_with_config(&gradient(100, 100), "fragile", "pw", &config).unwrap();

    let mut samples = result.pixels().as_bytes().to_vec();
    // Eligible sample 200 lies inside the blob; buffer index 200 / 3 * 4 + 200 % 3
    let index = 200 / 3 * 4 + 200 % 3;
    samples[index] ^= 1;
    let corrupted = PixelBuffer::new(100, 100, samples).unwrap();

    assert!(matches!(
        decode_with_config(&corrupted, "pw", &config),
        Err(Error::Decryption)
    ));
}

/// Test that a smaller payload ceiling rejects oversized secrets and headers
#[test]
fn test_payload_ceiling() {
    let tight = Config {
        max_payload_bytes: 64,
        ..config()
    };
    let carrier = gradient(200, 200);

    // Random-looking text compresses poorly, so the blob exceeds 64 bytes
    let noisy: String = (0..200u32)
        .map(|i| char::from(b'!' + ((i * 7919) % 90) as u8))
        .collect();
    assert!(matches!(
        encode_with_config(&carrier, &noisy, "pw", &tight),
        Err(Error::PayloadTooLarge { max: 64, .. })
    ));

    // A header written under the default ceiling is rejected by the tight one
    let result = encode_with_config(&carrier, &noisy, "pw", &config()).unwrap();
    assert!(matches!(
        decode_with_config(result.pixels(), "pw", &tight),
        Err(Error::NoPayloadFound)
    ));
}

/// Test that each encode uses fresh randomness
#[test]
fn test_same_input_different_stego() {
    let config = config();
    let carrier = gradient(100, 100);

    let a = encode_with_config(&carrier, "same", "pw", &config).unwrap();
    let b = encode_with_config(&carrier, "same", "pw", &config).unwrap();

    assert_ne!(a.pixels(), b.pixels());
    assert_eq!(decode_with_config(b.pixels(), "pw", &config).unwrap(), "same");
}

/// Test the extracted frame bit for bit against what was embedded
#[test]
fn test_frame_layout_in_image() {
    let config = config();
    let result = encode_with_config(&gradient(100, 100), "layout", "pw", &config).unwrap();
    let blob = extract_blob(result.pixels(), &config).unwrap();

    let header: u32 = eligible_lsbs(result.pixels())
        .take(32)
        .fold(0, |acc, bit| (acc << 1) | u32::from(bit));
    assert_eq!(header as usize, blob.len());
}

/// Test a full PNG file round trip through the raster boundary
#[test]
fn test_png_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stego.png");
    let config = config();

    let result = encode_with_config(&gradient(90, 60), "through a file", "pw", &config).unwrap();
    save_png(result.pixels(), &path).unwrap();

    let reloaded = load_pixels(&path).unwrap();
    assert_eq!(
        decode_with_config(&reloaded, "pw", &config).unwrap(),
        "through a file"
    );
}

/// Test that narrative failures never affect the report
#[test]
fn test_narrative_fails_open() {
    struct Offline;

    impl NarrativeService for Offline {
        fn summarize(&self, _: &SecurityReport) -> Result<String, NarrativeError> {
            Err(NarrativeError::Unavailable("no network".into()))
        }
    }

    let result = encode_with_config(&gradient(100, 100), "hi", "pw", &config()).unwrap();
    let text = narrate(&Offline, result.report());

    assert_eq!(text, kavach::config::DEFAULT_NARRATIVE_PLACEHOLDER);
    assert!(result.report().psnr > 0.0);
}

/// Test that independent calls on separate threads do not interfere
#[test]
fn test_concurrent_encodes() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let config = config();
                let carrier = gradient(80, 80);
                let secret = format!("thread {}", i);
                let result = encode_with_config(&carrier, &secret, "pw", &config).unwrap();
                decode_with_config(result.pixels(), "pw", &config).unwrap() == secret
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
