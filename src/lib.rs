//! # Kavach - encrypted LSB steganography for images
//!
//! Kavach hides a secret text inside a carrier image's pixels and reports how
//! much the image changed.
//!
//! ## Overview
//!
//! - The secret is **compressed** (zlib), armored as base64 and **encrypted**
//!   with a password (Argon2id + AES-256-GCM, fresh salt and nonce per call)
//! - The encrypted blob is **framed** behind a 32-bit big-endian length header
//! - The frame is written into the **least significant bit** of every R, G and
//!   B sample; alpha is never touched
//! - **PSNR**, **MSE** and a derived **security index** describe the distortion
//!
//! ## Security Model
//!
//! - Secrecy comes from the encryption layer; the embedding order is fixed
//!   and public
//! - A wrong key fails loudly, it never yields plausible-looking text
//! - The scheme is fragile: re-encoding the image with a lossy format, or
//!   resizing it, destroys the hidden data. Always keep the PNG output.
//!
//! ## Example Usage
//!
//! ```rust
//! use kavach::{decode, encode, PixelBuffer};
//!
//! let carrier = PixelBuffer::filled(100, 100, [120, 80, 200, 255]).unwrap();
//!
//! let result = encode(&carrier, "rendezvous at dawn", "pw1").unwrap();
//! println!("PSNR: {:.2} dB", result.report().psnr);
//!
//! let secret = decode(result.pixels(), "pw1").unwrap();
//! assert_eq!(secret, "rendezvous at dawn");
//! ```
//!
//! ## Modules
//!
//! - [`crypto`]: compression and password encryption of the payload
//! - [`stego`]: pixel buffers, bit framing and LSB embedding
//! - [`metrics`]: MSE, PSNR and security index
//! - [`encoder`] / [`decoder`]: the end-to-end pipeline
//! - [`narrative`]: prose summaries of a report
//! - [`raster`]: image file decoding and PNG output

/// Default ceiling on the embedded payload, in bytes.
pub const MAX_PAYLOAD_BYTES: usize = 1_000_000;

pub mod config;
pub mod crypto;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod metrics;
pub mod narrative;
pub mod raster;
pub mod stego;

// Re-export commonly used types at the crate root
pub use config::{Config, ConfigError};
pub use crypto::{pack, unpack, EncryptedBlob, PayloadCodec, PayloadError};
pub use decoder::{decode, decode_with_config, extract_blob};
pub use encoder::{capacity, encode, encode_with_config, Capacity, StegoResult};
pub use error::Error;
pub use metrics::{compute, compute_raw, MseRating, PsnrRating, SecurityReport};
pub use narrative::{narrate, NarrativeError, NarrativeService, OfflineAnalyst};
pub use stego::{BitPacker, BitSequence, LsbCodec, PixelBuffer, StegoError};
