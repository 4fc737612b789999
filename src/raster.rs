//! Conversion between image files and [`PixelBuffer`]s.
//!
//! Carriers may be any format the `image` crate decodes. Stego output is
//! always written as PNG: a lossy format would rewrite the low bits and
//! destroy the hidden data.

use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::stego::{PixelBuffer, StegoError};

/// Errors that can occur at the image file boundary.
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("Image load error: {0}")]
    ImageLoadError(String),

    #[error("Image save error: {0}")]
    ImageSaveError(String),

    #[error("Invalid pixel data: {0}")]
    InvalidPixels(#[from] StegoError),
}

/// Decodes an image file into RGBA pixels.
pub fn load_pixels<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, RasterError> {
    let image = image::open(path).map_err(|e| RasterError::ImageLoadError(e.to_string()))?;
    from_image(image)
}

/// Decodes an in-memory image into RGBA pixels.
pub fn load_pixels_from_memory(bytes: &[u8]) -> Result<PixelBuffer, RasterError> {
    let image =
        image::load_from_memory(bytes).map_err(|e| RasterError::ImageLoadError(e.to_string()))?;
    from_image(image)
}

/// Writes `pixels` as PNG, whatever the extension of `path`.
pub fn save_png<P: AsRef<Path>>(pixels: &PixelBuffer, path: P) -> Result<(), RasterError> {
    let path = path.as_ref();
    let is_png = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        warn!(path = %path.display(), "stego output is PNG regardless of file extension");
    }

    to_rgba_image(pixels)?
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| RasterError::ImageSaveError(e.to_string()))
}

/// Encodes `pixels` as PNG bytes.
pub fn to_png_bytes(pixels: &PixelBuffer) -> Result<Vec<u8>, RasterError> {
    let mut bytes = Vec::new();
    to_rgba_image(pixels)?
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| RasterError::ImageSaveError(e.to_string()))?;
    Ok(bytes)
}

fn from_image(image: DynamicImage) -> Result<PixelBuffer, RasterError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(PixelBuffer::new(width, height, rgba.into_raw())?)
}

fn to_rgba_image(pixels: &PixelBuffer) -> Result<RgbaImage, RasterError> {
    RgbaImage::from_raw(pixels.width(), pixels.height(), pixels.as_bytes().to_vec()).ok_or_else(
        || {
            RasterError::InvalidPixels(StegoError::DimensionMismatch {
                expected: pixels.pixel_count() * 4,
                actual: pixels.as_bytes().len(),
            })
        },
    )
}
