//! RGB + luminance histogram computation.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;

/// Number of bins per channel.
pub const BINS: usize = 256;

/// Rec. 709 luminance weights.
const LUMA_REC709: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Histogram data for R, G, B, and luminance channels (256 bins each).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramData {
    /// Bin counts for `[R, G, B, Luma]` channels. Each `Vec` has 256 entries.
    pub bins: [Vec<u32>; 4],
    /// Peak bin value across all channels (for normalization).
    pub peak: u32,
    /// Number of pixels counted.
    pub total: u64,
}

impl HistogramData {
    /// Bins as fractions of the pixel count.
    pub fn normalized(&self) -> [Vec<f32>; 4] {
        let scale = if self.total == 0 {
            0.0
        } else {
            1.0 / self.total as f32
        };
        self.bins
            .clone()
            .map(|bins| bins.into_iter().map(|c| c as f32 * scale).collect())
    }
}

/// Compute the histogram of an 8-bit buffer. Gray buffers count the gray
/// value in all three color channels; alpha is ignored.
pub fn compute(image: &PixelBuffer) -> HistogramData {
    let mut bins: [Vec<u32>; 4] = std::array::from_fn(|_| vec![0u32; BINS]);

    for px in image.pixels() {
        let rgb = if px.len() >= 3 {
            [px[0], px[1], px[2]]
        } else {
            [px[0]; 3]
        };
        let luma = LUMA_REC709
            .iter()
            .zip(rgb)
            .map(|(w, v)| w * v as f32)
            .sum::<f32>()
            .round()
            .min(255.0) as usize;

        for (c, v) in rgb.into_iter().enumerate() {
            bins[c][v as usize] += 1;
        }
        bins[3][luma] += 1;
    }

    let peak = bins.iter().flatten().copied().max().unwrap_or(0);
    HistogramData {
        bins,
        peak,
        total: image.pixel_count() as u64,
    }
}
