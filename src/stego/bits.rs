//! Length-prefixed bit framing.
//!
//! Layout: a 32-bit big-endian byte count, followed by the payload bytes.
//! Every byte (header included) is emitted most-significant bit first.

use super::StegoError;
use crate::MAX_PAYLOAD_BYTES;

/// Number of bits in the length header.
pub const HEADER_BITS: usize = 32;

/// A framed payload, ready to be written bit by bit.
///
/// The frame is stored packed (header bytes followed by payload bytes) and
/// expanded lazily by [`BitSequence::iter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSequence {
    frame: Vec<u8>,
}

impl BitSequence {
    /// Total number of bits, header included.
    pub fn len(&self) -> usize {
        self.frame.len() * 8
    }

    /// Always false: a sequence carries at least its header.
    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    /// Length of the payload in bytes (the value stored in the header).
    pub fn payload_len(&self) -> usize {
        self.frame.len() - HEADER_BITS / 8
    }

    /// Returns bit `index` (0 or 1), or `None` past the end.
    pub fn get(&self, index: usize) -> Option<u8> {
        let byte = self.frame.get(index / 8)?;
        Some((byte >> (7 - index % 8)) & 1)
    }

    /// Iterates the bits in transmission order.
    pub fn iter(&self) -> MsbBits<'_> {
        MsbBits {
            bytes: &self.frame,
            index: 0,
        }
    }
}

/// MSB-first bit iterator over a byte slice.
pub struct MsbBits<'a> {
    bytes: &'a [u8],
    index: usize,
}

impl Iterator for MsbBits<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        let byte = self.bytes.get(self.index / 8)?;
        let bit = (byte >> (7 - self.index % 8)) & 1;
        self.index += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.bytes.len() * 8).saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MsbBits<'_> {}

/// Frames payloads into bit sequences and reads them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitPacker {
    max_payload_bytes: usize,
}

impl Default for BitPacker {
    fn default() -> Self {
        Self::new(MAX_PAYLOAD_BYTES)
    }
}

impl BitPacker {
    /// Creates a packer with the given payload ceiling. The ceiling is capped
    /// at `u32::MAX`, the largest length the header can express.
    pub fn new(max_payload_bytes: usize) -> Self {
        Self {
            max_payload_bytes: max_payload_bytes.min(u32::MAX as usize),
        }
    }

    pub fn max_payload_bytes(&self) -> usize {
        self.max_payload_bytes
    }

    /// Frames `bytes` behind a 32-bit big-endian length header.
    ///
    /// Payloads above the ceiling are refused, since the extractor would
    /// reject their header anyway.
    pub fn to_bits(&self, bytes: &[u8]) -> Result<BitSequence, StegoError> {
        if bytes.len() > self.max_payload_bytes {
            return Err(StegoError::PayloadTooLarge {
                len: bytes.len(),
                max: self.max_payload_bytes,
            });
        }

        let mut frame = Vec::with_capacity(HEADER_BITS / 8 + bytes.len());
        frame.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        frame.extend_from_slice(bytes);
        Ok(BitSequence { frame })
    }

    /// Reads a length-prefixed payload from a bit source.
    ///
    /// Consumes exactly `32 + L * 8` bits and never more, where `L` is the
    /// decoded header. Each item of `bits` must be 0 or 1.
    pub fn from_bits_with_length<I>(&self, bits: I) -> Result<Vec<u8>, StegoError>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut bits = bits.into_iter();

        let mut declared = 0u32;
        for read in 0..HEADER_BITS {
            let Some(bit) = bits.next() else {
                return Err(StegoError::TruncatedData {
                    required: HEADER_BITS,
                    available: read,
                });
            };
            declared = (declared << 1) | u32::from(bit & 1);
        }

        if declared == 0 || declared as usize > self.max_payload_bytes {
            return Err(StegoError::NoPayloadFound { declared });
        }

        let len = declared as usize;
        let required = HEADER_BITS + len * 8;
        let mut payload = Vec::with_capacity(len);

        for byte_index in 0..len {
            let mut byte = 0u8;
            for bit_index in 0..8 {
                let Some(bit) = bits.next() else {
                    return Err(StegoError::TruncatedData {
                        required,
                        available: HEADER_BITS + byte_index * 8 + bit_index,
                    });
                };
                byte = (byte << 1) | (bit & 1);
            }
            payload.push(byte);
        }

        Ok(payload)
    }
}
