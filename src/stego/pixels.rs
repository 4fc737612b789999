//! Raw RGBA pixel storage.

use super::StegoError;

/// Interleaved samples per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Samples per pixel that may carry payload bits (alpha is never touched).
pub const ELIGIBLE_CHANNELS: usize = 3;

/// An RGBA8 image held as a flat, row-major sample vector.
///
/// The length invariant `data.len() == width * height * 4` is checked on
/// construction and cannot be broken afterwards, since the samples are only
/// reachable mutably through the crate-internal codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wraps RGBA samples, checking them against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, StegoError> {
        let expected = sample_count(width, height)?;
        if data.len() != expected {
            return Err(StegoError::DimensionMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a buffer where every pixel has the same RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, StegoError> {
        let count = sample_count(width, height)?;
        let data = rgba.iter().copied().cycle().take(count).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a buffer by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, StegoError>
    where
        F: FnMut(u32, u32) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(sample_count(width, height)?);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.data.len() / CHANNELS
    }

    /// The interleaved RGBA samples.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer and returns the samples.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Alpha samples in pixel order.
    pub fn alpha(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.chunks_exact(CHANNELS).map(|px| px[CHANNELS - 1])
    }

    /// Keeps only the first `rows` rows. Useful to simulate a cropped or
    /// partially transmitted image.
    pub fn truncate_rows(mut self, rows: u32) -> Result<Self, StegoError> {
        let rows = rows.min(self.height);
        let count = sample_count(self.width, rows)?;
        self.data.truncate(count);
        self.height = rows;
        Ok(self)
    }
}

/// Returns true when the sample at `index` is R, G or B.
#[inline]
pub fn is_eligible(index: usize) -> bool {
    (index + 1) % CHANNELS != 0
}

pub(crate) fn sample_count(width: u32, height: u32) -> Result<usize, StegoError> {
    if width == 0 || height == 0 {
        return Err(StegoError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(CHANNELS))
        .ok_or(StegoError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_checks_length() {
        assert!(PixelBuffer::new(2, 2, vec![0; 16]).is_ok());

        let result = PixelBuffer::new(2, 2, vec![0; 15]);
        assert_eq!(
            result,
            Err(StegoError::DimensionMismatch {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            PixelBuffer::new(0, 4, vec![]),
            Err(StegoError::InvalidDimensions { .. })
        ));
        assert!(PixelBuffer::filled(4, 0, [0; 4]).is_err());
    }

    #[test]
    fn test_filled_and_alpha() {
        let buffer = PixelBuffer::filled(3, 2, [1, 2, 3, 200]).unwrap();
        assert_eq!(buffer.pixel_count(), 6);
        assert_eq!(&buffer.as_bytes()[..8], &[1, 2, 3, 200, 1, 2, 3, 200]);
        assert!(buffer.alpha().all(|a| a == 200));
    }

    #[test]
    fn test_from_fn_is_row_major() {
        let buffer = PixelBuffer::from_fn(2, 2, |x, y| [x as u8, y as u8, 0, 255]).unwrap();
        assert_eq!(
            buffer.as_bytes(),
            &[0, 0, 0, 255, 1, 0, 0, 255, 0, 1, 0, 255, 1, 1, 0, 255]
        );
    }

    #[test]
    fn test_eligibility_skips_every_fourth_sample() {
        let eligible: Vec<bool> = (0..8).map(is_eligible).collect();
        assert_eq!(
            eligible,
            vec![true, true, true, false, true, true, true, false]
        );
    }

    #[test]
    fn test_truncate_rows() {
        let buffer = PixelBuffer::filled(4, 4, [9; 4]).unwrap();
        let cropped = buffer.truncate_rows(1).unwrap();
        assert_eq!(cropped.height(), 1);
        assert_eq!(cropped.as_bytes().len(), 16);
    }
}
