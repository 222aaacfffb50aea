//! Cover art decoding and the missing-artwork placeholder.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::error::{CollageError, Result};
use crate::models::CellSize;

/// Fill colour of the placeholder tile.
pub const PLACEHOLDER_COLOR: Rgb<u8> = Rgb([40, 40, 40]);

/// Encode the fixed placeholder tile as PNG.
///
/// Dark grey, so entities without artwork stay distinguishable from the
/// black background of unfilled cells.
pub fn placeholder_png() -> Result<Bytes> {
    let size = CellSize::default();
    let tile = RgbImage::from_pixel(size.width, size.height, PLACEHOLDER_COLOR);
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(tile).write_to(&mut buf, ImageFormat::Png)?;
    Ok(Bytes::from(buf.into_inner()))
}

/// Decode downloaded bytes, reporting failures against `url`.
pub fn decode(url: &str, data: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(data).map_err(|e| CollageError::image_fetch(url, e))
}
