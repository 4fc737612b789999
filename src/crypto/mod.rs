//! Payload protection: compression, text armoring and password encryption.
//!
//! Packing a secret:
//! 1. Compress the UTF-8 bytes (zlib/DEFLATE)
//! 2. Base64-encode the compressed bytes into text
//! 3. Encrypt that text under the key (Argon2id + AES-256-GCM)
//! 4. Prefix a format version byte
//!
//! Unpacking runs the steps in reverse. Any failure on the way back is
//! reported as [`PayloadError::Decryption`], without saying which step
//! failed.

pub mod compression;
pub mod symmetric;

pub use compression::{compress, decompress, CompressionError, DEFAULT_LEVEL};
pub use symmetric::{decrypt_symmetric, encrypt_symmetric, KdfParams, SymmetricError};

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;
use tracing::debug;

/// Current blob format version.
pub const BLOB_VERSION: u8 = 1;

/// Errors that can occur while packing or unpacking a payload.
#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("Encryption key must not be empty")]
    EmptyKey,

    #[error("Compression error: {0}")]
    Compression(#[from] CompressionError),

    #[error("Encryption error: {0}")]
    Encryption(SymmetricError),

    /// Wrong key, corrupted blob, or a failed decode after decryption.
    #[error("Failed to extract data. Ensure the key is correct and file is valid.")]
    Decryption,
}

/// An encrypted, self-describing payload.
///
/// Layout: `version (1) || kdf params (8) || salt (16) || nonce (12) || ciphertext+tag`.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    bytes: Vec<u8>,
}

impl EncryptedBlob {
    /// Wraps raw blob bytes, e.g. as read out of an image.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Parses the base64 text form.
    pub fn from_text(text: &str) -> Result<Self, PayloadError> {
        BASE64
            .decode(text.trim())
            .map(Self::from_bytes)
            .map_err(|e| {
                debug!(error = %e, "blob text is not base64");
                PayloadError::Decryption
            })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Base64 text form, for transport outside an image.
    pub fn to_text(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

// Keep ciphertext out of logs and panic messages.
impl fmt::Debug for EncryptedBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedBlob")
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Compresses and encrypts secrets, and reverses the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadCodec {
    compression_level: u32,
    kdf: KdfParams,
}

impl Default for PayloadCodec {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL, KdfParams::default())
    }
}

impl PayloadCodec {
    pub fn new(compression_level: u32, kdf: KdfParams) -> Self {
        Self {
            compression_level,
            kdf,
        }
    }

    /// Compresses, armors and encrypts `plaintext` under `key`.
    pub fn pack(&self, plaintext: &str, key: &str) -> Result<EncryptedBlob, PayloadError> {
        if key.is_empty() {
            return Err(PayloadError::EmptyKey);
        }

        let compressed = compress(plaintext.as_bytes(), self.compression_level)?;
        let armored = BASE64.encode(&compressed);

        let ciphertext = encrypt_symmetric(armored.as_bytes(), key, &self.kdf)
            .map_err(PayloadError::Encryption)?;

        let mut bytes = Vec::with_capacity(1 + ciphertext.len());
        bytes.push(BLOB_VERSION);
        bytes.extend(ciphertext);

        debug!(
            plaintext_len = plaintext.len(),
            compressed_len = compressed.len(),
            blob_len = bytes.len(),
            "packed payload"
        );
        Ok(EncryptedBlob { bytes })
    }

    /// Decrypts and decompresses a blob produced by [`PayloadCodec::pack`].
    pub fn unpack(&self, blob: &EncryptedBlob, key: &str) -> Result<String, PayloadError> {
        if key.is_empty() {
            return Err(PayloadError::EmptyKey);
        }

        let (&version, ciphertext) = blob.as_bytes().split_first().ok_or_else(|| {
            debug!("blob is empty");
            PayloadError::Decryption
        })?;
        if version != BLOB_VERSION {
            debug!(version, "unsupported blob version");
            return Err(PayloadError::Decryption);
        }

        let armored = decrypt_symmetric(ciphertext, key).map_err(|e| {
            debug!(error = %e, "decryption failed");
            PayloadError::Decryption
        })?;

        let armored = String::from_utf8(armored).map_err(|_| {
            debug!("decrypted payload is not UTF-8");
            PayloadError::Decryption
        })?;
        if armored.is_empty() {
            debug!("decrypted payload is empty");
            return Err(PayloadError::Decryption);
        }

        let compressed = BASE64.decode(armored.as_bytes()).map_err(|e| {
            debug!(error = %e, "decrypted payload is not base64");
            PayloadError::Decryption
        })?;

        let plaintext = decompress(&compressed).map_err(|e| {
            debug!(error = %e, "decompression failed");
            PayloadError::Decryption
        })?;

        String::from_utf8(plaintext).map_err(|_| {
            debug!("decompressed payload is not UTF-8");
            PayloadError::Decryption
        })
    }
}

/// Packs with default settings.
pub fn pack(plaintext: &str, key: &str) -> Result<EncryptedBlob, PayloadError> {
    PayloadCodec::default().pack(plaintext, key)
}

/// Unpacks with default settings.
pub fn unpack(blob: &EncryptedBlob, key: &str) -> Result<String, PayloadError> {
    PayloadCodec::default().unpack(blob, key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> PayloadCodec {
        PayloadCodec::new(
            DEFAULT_LEVEL,
            KdfParams {
                memory_kib: 256,
                iterations: 1,
            },
        )
    }

    #[test]
    fn test_pack_unpack_roundtrip() {
        let codec = codec();
        let blob = codec.pack("Meet at the north gate at 0400.", "pw1").unwrap();

        assert_eq!(blob.as_bytes()[0], BLOB_VERSION);
        assert_eq!(codec.unpack(&blob, "pw1").unwrap(), "Meet at the north gate at 0400.");
    }

    #[test]
    fn test_unicode_and_empty_text() {
        let codec = codec();
        for text in ["", "कवच 🛡️ ñandú", "\n\t"] {
            let blob = codec.pack(text, "key").unwrap();
            assert_eq!(codec.unpack(&blob, "key").unwrap(), text);
        }
    }

    #[test]
    fn test_wrong_key_is_decryption_error() {
        let codec = codec();
        let blob = codec.pack("secret", "right").unwrap();

        assert!(matches!(
            codec.unpack(&blob, "wrong"),
            Err(PayloadError::Decryption)
        ));
    }

    #[test]
    fn test_empty_key_rejected() {
        let codec = codec();
        assert!(matches!(codec.pack("x", ""), Err(PayloadError::EmptyKey)));

        let blob = codec.pack("x", "k").unwrap();
        assert!(matches!(codec.unpack(&blob, ""), Err(PayloadError::EmptyKey)));
    }

    #[test]
    fn test_malformed_blobs_are_decryption_errors() {
        let codec = codec();
        let mut blob = codec.pack("secret", "k").unwrap().into_bytes();

        let empty = EncryptedBlob::from_bytes(vec![]);
        assert!(matches!(codec.unpack(&empty, "k"), Err(PayloadError::Decryption)));

        blob[0] = 9;
        let bad_version = EncryptedBlob::from_bytes(blob.clone());
        assert!(matches!(codec.unpack(&bad_version, "k"), Err(PayloadError::Decryption)));

        blob[0] = BLOB_VERSION;
        blob.truncate(20);
        let short = EncryptedBlob::from_bytes(blob);
        assert!(matches!(codec.unpack(&short, "k"), Err(PayloadError::Decryption)));
    }

    #[test]
    fn test_repetitive_text_is_compressed_before_encryption() {
        let codec = codec();
        let text = "A".repeat(5000);
        let blob = codec.pack(&text, "k").unwrap();

        assert!(blob.len() < 200);
    }

    #[test]
    fn test_text_form_roundtrip() {
        let codec = codec();
        let blob = codec.pack("portable", "k").unwrap();
        let parsed = EncryptedBlob::from_text(&blob.to_text()).unwrap();

        assert_eq!(parsed, blob);
        assert!(matches!(
            EncryptedBlob::from_text("not base64!"),
            Err(PayloadError::Decryption)
        ));
    }

    #[test]
    fn test_debug_hides_bytes() {
        let blob = EncryptedBlob::from_bytes(vec![1, 2, 3]);
        assert_eq!(format!("{:?}", blob), "EncryptedBlob { len: 3 }");
    }
}
