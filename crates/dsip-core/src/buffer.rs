//! 8-bit interleaved pixel buffers used for sources, LUT images, grain, and output.

use glam::Vec3;

use crate::error::{DsipError, DsipResult};

/// Owned, row-major, channel-interleaved 8-bit image.
///
/// `data.len() == width × height × channels` always holds; the constructor
/// rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap existing samples. Fails on zero dimensions, a channel count
    /// outside `1..=4`, or a length mismatch.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> DsipResult<Self> {
        if width == 0 || height == 0 {
            return Err(DsipError::config(format!(
                "image has zero size ({width}x{height})"
            )));
        }
        if !(1..=4).contains(&channels) {
            return Err(DsipError::config(format!(
                "unsupported channel count {channels}"
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(DsipError::config(format!(
                "buffer holds {} bytes, expected {expected} for {width}x{height}x{channels}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Zero-filled buffer with the same geometry as `self`.
    pub fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data: vec![0; self.data.len()],
        }
    }

    /// Single-color buffer, mostly useful for tests and synthetic plates.
    pub fn filled(width: u32, height: u32, pixel: &[u8]) -> DsipResult<Self> {
        let count = width as usize * height as usize;
        let data = pixel.repeat(count);
        let channels = u8::try_from(pixel.len())
            .map_err(|_| DsipError::config("pixel has too many channels"))?;
        Self::new(width, height, channels, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Number of pixels (`width × height`).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Bytes per row.
    pub fn row_stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }

    /// All samples.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Iterate pixels in row-major order, each as a `channels`-long slice.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.channels as usize)
    }

    /// One row of samples. Panics if `row >= height`.
    pub fn row(&self, row: u32) -> &[u8] {
        assert!(row < self.height, "row {row} out of bounds ({})", self.height);
        let stride = self.row_stride();
        let start = row as usize * stride;
        &self.data[start..start + stride]
    }

    /// Samples of the pixel at `(row, col)`. Panics when out of bounds.
    pub fn pixel(&self, row: u32, col: u32) -> &[u8] {
        assert!(
            row < self.height && col < self.width,
            "pixel ({row}, {col}) out of bounds ({}x{})",
            self.width,
            self.height
        );
        let channels = self.channels as usize;
        let start = (row as usize * self.width as usize + col as usize) * channels;
        &self.data[start..start + channels]
    }

    /// Single sample at `(row, col, channel)`, or `None` when out of bounds.
    pub fn sample(&self, row: u32, col: u32, channel: u8) -> Option<u8> {
        if row >= self.height || col >= self.width || channel >= self.channels {
            return None;
        }
        let index = (row as usize * self.width as usize + col as usize) * self.channels as usize
            + channel as usize;
        self.data.get(index).copied()
    }

    /// Pixel at `(row, col)` as normalized RGB. Gray buffers replicate
    /// channel 0.
    pub fn rgb_at(&self, row: u32, col: u32) -> Vec3 {
        normalized_rgb(self.pixel(row, col))
    }
}

/// Normalize the first three samples of a pixel to `[0, 1]`.
///
/// One- and two-channel (gray, gray+alpha) pixels replicate the gray value.
#[inline]
pub(crate) fn normalized_rgb(px: &[u8]) -> Vec3 {
    if px.len() >= 3 {
        Vec3::new(px[0] as f32, px[1] as f32, px[2] as f32) / 255.0
    } else {
        Vec3::splat(px[0] as f32 / 255.0)
    }
}

/// Quantize a normalized value to a byte: clamp to `[0, 1]`, then
/// `round(v × 255)`.
#[inline]
pub fn quantize(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = PixelBuffer::new(2, 2, 3, vec![0; 11]).unwrap_err();
        assert!(matches!(err, DsipError::Configuration(_)));
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(PixelBuffer::new(0, 4, 3, vec![]).is_err());
        assert!(PixelBuffer::new(4, 0, 3, vec![]).is_err());
    }

    #[test]
    fn test_new_rejects_bad_channel_count() {
        assert!(PixelBuffer::new(1, 1, 0, vec![]).is_err());
        assert!(PixelBuffer::new(1, 1, 5, vec![0; 5]).is_err());
    }

    #[test]
    fn test_pixel_accessors_use_row_major_layout() {
        let data: Vec<u8> = (0..24).collect();
        let buf = PixelBuffer::new(4, 2, 3, data).unwrap();
        assert_eq!(buf.pixel(0, 0), &[0, 1, 2]);
        assert_eq!(buf.pixel(1, 2), &[18, 19, 20]);
        assert_eq!(buf.sample(1, 3, 2), Some(23));
        assert_eq!(buf.row(1), &(12..24).collect::<Vec<u8>>()[..]);
    }

    #[test]
    fn test_sample_out_of_bounds_is_none() {
        let buf = PixelBuffer::filled(2, 2, &[1, 2, 3]).unwrap();
        assert_eq!(buf.sample(2, 0, 0), None);
        assert_eq!(buf.sample(0, 2, 0), None);
        assert_eq!(buf.sample(0, 0, 3), None);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_pixel_out_of_bounds_panics() {
        let buf = PixelBuffer::filled(2, 2, &[0, 0, 0]).unwrap();
        let _ = buf.pixel(0, 2);
    }

    #[test]
    fn test_rgb_at_replicates_gray() {
        let buf = PixelBuffer::filled(1, 1, &[51, 255]).unwrap();
        assert_eq!(buf.rgb_at(0, 0), Vec3::splat(0.2));
    }

    #[test]
    fn test_quantize_rounds_and_clamps() {
        assert_eq!(quantize(-0.5), 0);
        assert_eq!(quantize(0.5), 128);
        assert_eq!(quantize(0.499), 127);
        assert_eq!(quantize(1.7), 255);
        assert_eq!(quantize(f32::NAN), 0);
    }

    #[test]
    fn test_blank_like_keeps_geometry() {
        let buf = PixelBuffer::filled(3, 2, &[9, 9, 9, 9]).unwrap();
        let blank = buf.blank_like();
        assert_eq!((blank.width(), blank.height(), blank.channels()), (3, 2, 4));
        assert!(blank.as_bytes().iter().all(|&b| b == 0));
    }
}
