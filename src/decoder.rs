//! Secret decoding.
//!
//! Reverses [`encode`](crate::encode): read the framed blob out of the
//! image's low bits, then decrypt and decompress it. Every failure is
//! returned as a typed [`Error`]; partial text is never returned.

use tracing::info;

use crate::config::Config;
use crate::crypto::EncryptedBlob;
use crate::stego::PixelBuffer;
use crate::Error;

/// Recovers the secret hidden in `stego` with the default configuration.
pub fn decode(stego: &PixelBuffer, key: &str) -> Result<String, Error> {
    decode_with_config(stego, key, &Config::default())
}

/// Recovers the secret hidden in `stego`.
pub fn decode_with_config(
    stego: &PixelBuffer,
    key: &str,
    config: &Config,
) -> Result<String, Error> {
    if key.is_empty() {
        return Err(Error::EmptyKey);
    }

    let blob = extract_blob(stego, config)?;
    let secret = config.payload_codec().unpack(&blob, key)?;

    info!(
        width = stego.width(),
        height = stego.height(),
        blob_bytes = blob.len(),
        "decoded secret from image"
    );
    Ok(secret)
}

/// Reads the encrypted blob without decrypting it.
pub fn extract_blob(stego: &PixelBuffer, config: &Config) -> Result<EncryptedBlob, Error> {
    let bytes = config.lsb_codec().extract(stego)?;
    Ok(EncryptedBlob::from_bytes(bytes))
}
