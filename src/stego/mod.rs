//! Steganography module for hiding data in raw RGBA pixel buffers.
//!
//! - [`pixels`]: the `PixelBuffer` value type and the alpha skip rule
//! - [`bits`]: length-prefixed bit framing
//! - [`lsb`]: LSB embedding and extraction

pub mod bits;
pub mod error;
pub mod lsb;
pub mod pixels;

pub use bits::{BitPacker, BitSequence, HEADER_BITS};
pub use error::StegoError;
pub use lsb::{available_bits, eligible_lsbs, max_payload_len, required_bits, LsbCodec};
pub use pixels::{is_eligible, PixelBuffer, CHANNELS, ELIGIBLE_CHANNELS};
