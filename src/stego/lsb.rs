//! LSB (Least Significant Bit) embedding in RGBA pixel buffers.
//!
//! One bit is stored in the low bit of every R, G and B sample; alpha
//! samples are skipped. Bits are laid out in buffer order with no
//! permutation, so embed and extract only have to agree on the skip rule.
//!
//! The result is fragile: only lossless formats (PNG, BMP) survive a
//! save/load cycle, and any rewrite of the pixels destroys the payload.

use tracing::debug;

use super::bits::{BitPacker, BitSequence, HEADER_BITS};
use super::pixels::{is_eligible, PixelBuffer, ELIGIBLE_CHANNELS};
use super::StegoError;

/// Bits available in a carrier of `pixel_count` pixels.
pub fn available_bits(pixel_count: usize) -> usize {
    pixel_count * ELIGIBLE_CHANNELS
}

/// Bits reserved for a payload of `payload_len` bytes.
///
/// The header is budgeted as 32 *bytes* rather than 32 bits, so this is
/// larger than the number of bits actually written.
pub fn required_bits(payload_len: usize) -> usize {
    (HEADER_BITS + payload_len) * 8
}

/// Largest payload (bytes) a carrier of `pixel_count` pixels accepts.
pub fn max_payload_len(pixel_count: usize) -> usize {
    (available_bits(pixel_count) / 8).saturating_sub(HEADER_BITS)
}

/// Embeds and extracts framed payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct LsbCodec {
    packer: BitPacker,
}

impl LsbCodec {
    pub fn new(packer: BitPacker) -> Self {
        Self { packer }
    }

    pub fn packer(&self) -> &BitPacker {
        &self.packer
    }

    /// Bits the carrier can hold.
    pub fn capacity_bits(&self, carrier: &PixelBuffer) -> usize {
        available_bits(carrier.pixel_count())
    }

    /// Frames `payload` and writes it into a copy of `carrier`.
    ///
    /// The carrier itself is never modified.
    pub fn embed(&self, carrier: &PixelBuffer, payload: &[u8]) -> Result<PixelBuffer, StegoError> {
        let bits = self.packer.to_bits(payload)?;
        let mut working = carrier.clone();
        self.embed_bits(&mut working, &bits)?;
        Ok(working)
    }

    /// Writes `bits` into the low bits of the eligible samples of `working`.
    ///
    /// Fails with [`StegoError::CapacityExceeded`] before touching any sample
    /// when the carrier is too small. Returns the number of samples written.
    pub fn embed_bits(
        &self,
        working: &mut PixelBuffer,
        bits: &BitSequence,
    ) -> Result<usize, StegoError> {
        let available = self.capacity_bits(working);
        let required = required_bits(bits.payload_len());
        if required > available {
            return Err(StegoError::CapacityExceeded {
                required,
                available,
            });
        }

        let mut stream = bits.iter();
        let mut written = 0usize;

        for (index, sample) in working.samples_mut().iter_mut().enumerate() {
            if !is_eligible(index) {
                continue;
            }
            let Some(bit) = stream.next() else {
                break;
            };
            *sample = (*sample & 0xFE) | bit;
            written += 1;
        }

        debug!(
            bits = written,
            capacity = available,
            "embedded payload into carrier"
        );
        Ok(written)
    }

    /// Reads a framed payload back out of `stego`.
    pub fn extract(&self, stego: &PixelBuffer) -> Result<Vec<u8>, StegoError> {
        let payload = self.packer.from_bits_with_length(eligible_lsbs(stego))?;
        debug!(bytes = payload.len(), "extracted payload from image");
        Ok(payload)
    }
}

/// Low bits of the eligible samples, in embedding order.
pub fn eligible_lsbs(pixels: &PixelBuffer) -> impl Iterator<Item = u8> + '_ {
    pixels
        .as_bytes()
        .iter()
        .enumerate()
        .filter(|(index, _)| is_eligible(*index))
        .map(|(_, sample)| sample & 1)
}
