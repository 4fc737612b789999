//! Password-based symmetric encryption.
//!
//! - Argon2id derives a 256-bit key from the password and a random salt
//! - AES-256-GCM (CTR keystream + GHASH tag) encrypts and authenticates
//!
//! Output format:
//! `memory_kib (4, BE) || iterations (4, BE) || salt (16) || nonce (12) || ciphertext+tag`

use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    Aes256Gcm,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

/// Argon2 salt size.
pub const SALT_SIZE: usize = 16;

/// Nonce size for AES-256-GCM.
pub const NONCE_SIZE: usize = 12;

/// GCM authentication tag size.
pub const TAG_SIZE: usize = 16;

/// Size of the serialized KDF parameters.
const PARAMS_SIZE: usize = 8;

/// Bytes preceding the ciphertext.
pub const HEADER_SIZE: usize = PARAMS_SIZE + SALT_SIZE + NONCE_SIZE;

/// Upper bounds accepted when reading parameters back from a blob: a few
/// times the default cost, so a crafted image cannot stall decoding.
const MAX_MEMORY_KIB: u32 = 64 * 1024;
const MAX_ITERATIONS: u32 = 4;

/// Errors that can occur during symmetric encryption.
#[derive(Error, Debug)]
pub enum SymmetricError {
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid ciphertext: too short")]
    CiphertextTooShort,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Unsupported KDF parameters: {memory_kib} KiB, {iterations} iterations")]
    InvalidParams { memory_kib: u32, iterations: u32 },
}

/// Argon2id cost parameters. Stored in every ciphertext so the decoder does
/// not need to know them in advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes.
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
        }
    }
}

impl KdfParams {
    /// Checks the parameters against the accepted range.
    pub fn validate(&self) -> Result<(), SymmetricError> {
        let memory_ok = (Params::MIN_M_COST..=MAX_MEMORY_KIB).contains(&self.memory_kib);
        let iterations_ok = (1..=MAX_ITERATIONS).contains(&self.iterations);
        if memory_ok && iterations_ok {
            Ok(())
        } else {
            Err(SymmetricError::InvalidParams {
                memory_kib: self.memory_kib,
                iterations: self.iterations,
            })
        }
    }

    fn to_bytes(self) -> [u8; PARAMS_SIZE] {
        let mut out = [0u8; PARAMS_SIZE];
        out[..4].copy_from_slice(&self.memory_kib.to_be_bytes());
        out[4..].copy_from_slice(&self.iterations.to_be_bytes());
        out
    }

    fn from_bytes(bytes: &[u8; PARAMS_SIZE]) -> Self {
        Self {
            memory_kib: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            iterations: u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
        }
    }
}

/// Derives a 256-bit key from a password and salt.
fn derive_key(
    passphrase: &str,
    salt: &[u8],
    params: &KdfParams,
) -> Result<Zeroizing<[u8; 32]>, SymmetricError> {
    params.validate()?;
    let argon_params = Params::new(params.memory_kib, params.iterations, 1, Some(32))
        .map_err(|e| SymmetricError::KeyDerivationFailed(e.to_string()))?;

    let mut key = Zeroizing::new([0u8; 32]);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params)
        .hash_password_into(passphrase.as_bytes(), salt, &mut *key)
        .map_err(|e| SymmetricError::KeyDerivationFailed(e.to_string()))?;
    Ok(key)
}

/// Encrypts data under a password, with a fresh salt and nonce per call.
pub fn encrypt_symmetric(
    plaintext: &[u8],
    passphrase: &str,
    params: &KdfParams,
) -> Result<Vec<u8>, SymmetricError> {
    let mut salt = [0u8; SALT_SIZE];
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt, params)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_slice())
        .map_err(|e| SymmetricError::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(GenericArray::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| SymmetricError::EncryptionFailed(e.to_string()))?;

    let mut result = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
    result.extend_from_slice(&params.to_bytes());
    result.extend_from_slice(&salt);
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypts data produced by [`encrypt_symmetric`].
///
/// Fails if the password is wrong or any byte was altered.
pub fn decrypt_symmetric(data: &[u8], passphrase: &str) -> Result<Vec<u8>, SymmetricError> {
    if data.len() < HEADER_SIZE + TAG_SIZE {
        return Err(SymmetricError::CiphertextTooShort);
    }

    let (params_bytes, rest) = data.split_at(PARAMS_SIZE);
    let (salt, rest) = rest.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let params_bytes: &[u8; PARAMS_SIZE] = params_bytes
        .try_into()
        .map_err(|_| SymmetricError::CiphertextTooShort)?;
    let params = KdfParams::from_bytes(params_bytes);

    let key = derive_key(passphrase, salt, &params)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_slice())
        .map_err(|e| SymmetricError::DecryptionFailed(e.to_string()))?;

    cipher
        .decrypt(GenericArray::from_slice(nonce_bytes), ciphertext)
        .map_err(|e| SymmetricError::DecryptionFailed(e.to_string()))
}
