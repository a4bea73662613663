//! Image decode/encode via the `image` crate.
//!
//! Eight-bit gray, gray+alpha, RGB and RGBA images keep their layout. Any
//! other layout (16-bit, float) is converted to RGBA8.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat};

use crate::buffer::PixelBuffer;
use crate::error::{DecodeError, DsipError, DsipResult};

/// Decode encoded image bytes (format sniffed from the content).
pub fn decode(bytes: &[u8]) -> DsipResult<PixelBuffer> {
    let img = image::load_from_memory(bytes).map_err(DecodeError::Decode)?;
    from_dynamic(img)
}

/// Encode `buffer` in `format`.
pub fn encode(buffer: &PixelBuffer, format: ImageFormat) -> DsipResult<Vec<u8>> {
    let img = to_dynamic(buffer)?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).map_err(DecodeError::Encode)?;
    Ok(out.into_inner())
}

/// Load and decode an image file.
pub fn load(path: &Path) -> DsipResult<PixelBuffer> {
    let img = image::open(path).map_err(|err| match err {
        image::ImageError::IoError(io) => DecodeError::Io(io),
        other => DecodeError::Decode(other),
    })?;
    tracing::debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "loaded image"
    );
    from_dynamic(img)
}

/// Encode and write an image file; the format follows the extension.
pub fn save(path: &Path, buffer: &PixelBuffer) -> DsipResult<()> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| DecodeError::UnsupportedFormat(path.display().to_string()))?;
    let img = to_dynamic(buffer)?;
    // JPEG has no alpha channel.
    let img = if format == ImageFormat::Jpeg && img.color().has_alpha() {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img
    };
    img.save_with_format(path, format).map_err(DecodeError::Encode)?;
    tracing::debug!(path = %path.display(), ?format, "saved image");
    Ok(())
}

fn from_dynamic(img: DynamicImage) -> DsipResult<PixelBuffer> {
    let (width, height) = (img.width(), img.height());
    let (channels, data) = match img {
        DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
        other => (4, other.to_rgba8().into_raw()),
    };
    PixelBuffer::new(width, height, channels, data)
}

fn to_dynamic(buffer: &PixelBuffer) -> DsipResult<DynamicImage> {
    let (w, h) = (buffer.width(), buffer.height());
    let data = buffer.as_bytes().to_vec();
    let img = match buffer.channels() {
        1 => image::GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        2 => image::GrayAlphaImage::from_raw(w, h, data).map(DynamicImage::ImageLumaA8),
        3 => image::RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        _ => image::RgbaImage::from_raw(w, h, data).map(DynamicImage::ImageRgba8),
    };
    img.ok_or_else(|| DsipError::config("pixel buffer does not match its dimensions"))
}
