//! Color cube decoding and trilinear LUT sampling.

use glam::Vec3;

use crate::buffer::PixelBuffer;
use crate::error::{DsipError, DsipResult};

/// A cubic color lookup table.
///
/// Cells are stored R-fastest: `idx = red + green × level + blue × level²`,
/// three normalized floats per cell. Sampling uses trilinear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCube {
    /// Grid size per axis. Always at least 2.
    level: usize,
    /// Cell values, `level³ × 3` floats.
    data: Vec<f32>,
}

impl ColorCube {
    /// Create a cube from raw cell data in R-fastest order.
    pub fn from_data(level: usize, data: Vec<f32>) -> DsipResult<Self> {
        if level < 2 {
            return Err(DsipError::config(format!(
                "LUT level must be at least 2, got {level}"
            )));
        }
        let expected = level * level * level * 3;
        if data.len() != expected {
            return Err(DsipError::config(format!(
                "expected {expected} LUT values for level {level}, got {}",
                data.len()
            )));
        }
        Ok(Self { level, data })
    }

    /// Identity cube: cell `(i, j, k)` holds `(i, j, k) / (level − 1)`.
    pub fn identity(level: usize) -> DsipResult<Self> {
        let step = 1.0 / level.saturating_sub(1).max(1) as f32;
        let mut data = Vec::with_capacity(level * level * level * 3);
        for b in 0..level {
            for g in 0..level {
                for r in 0..level {
                    data.extend([r as f32 * step, g as f32 * step, b as f32 * step]);
                }
            }
        }
        Self::from_data(level, data)
    }

    /// Decode a LUT image whose pixel count is a perfect cube.
    ///
    /// Pixels are read in row-major order and each contributes one cell, so a
    /// Hald image of width `L³` becomes a cube of level `L²`. Only the first
    /// three channels are used; alpha is ignored.
    pub fn from_image(image: &PixelBuffer) -> DsipResult<Self> {
        if image.channels() < 3 {
            return Err(DsipError::config(format!(
                "LUT image needs RGB channels, got {}",
                image.channels()
            )));
        }

        let pixel_count = image.pixel_count();
        let level = (pixel_count as f64).cbrt().round() as usize;
        if level * level * level != pixel_count {
            return Err(DsipError::config(format!(
                "LUT image {}x{} has {pixel_count} pixels, which is not a perfect cube",
                image.width(),
                image.height()
            )));
        }

        let mut data = Vec::with_capacity(pixel_count * 3);
        for px in image.pixels() {
            data.extend(px[..3].iter().map(|&v| v as f32 / 255.0));
        }

        tracing::debug!(
            level,
            width = image.width(),
            height = image.height(),
            "decoded color cube"
        );
        Self::from_data(level, data)
    }

    /// Grid size per axis.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Raw cell values.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn cell(&self, index: usize) -> Vec3 {
        let i = index * 3;
        Vec3::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Map a normalized RGB triple through the cube.
    ///
    /// # Algorithm
    /// Per axis, `x = c × (level − 1)` with `c` clamped to `[0, 1]`; the base
    /// index is `floor(x)` clamped to `[0, level − 2]` so the forward
    /// neighbour always exists, and the residual is `x − index`. Two lerps
    /// along red build each edge of the `blue` layer's face, one lerp along
    /// green collapses them, the same is repeated on the `blue + 1` layer
    /// (`+ level²`), and a final lerp along blue gives the result.
    pub fn sample(&self, rgb: Vec3) -> Vec3 {
        let level = self.level;
        let scale = (level - 1) as f32;
        let max_index = (level - 2) as f32;

        let pos = rgb.clamp(Vec3::ZERO, Vec3::ONE) * scale;
        let base = pos.floor().clamp(Vec3::ZERO, Vec3::splat(max_index));
        let frac = pos - base;

        let red = base.x as usize;
        let green = base.y as usize;
        let blue = base.z as usize;

        let stride_b = level * level;
        let idx = red + green * level + blue * stride_b;

        let near = self.bilerp_face(idx, frac);
        let far = self.bilerp_face(idx + stride_b, frac);
        lerp(near, far, frac.z)
    }

    /// Red/green bilinear blend of the four cells at `idx` on one blue layer.
    #[inline]
    fn bilerp_face(&self, idx: usize, frac: Vec3) -> Vec3 {
        let row = self.level;
        let g0 = lerp(self.cell(idx), self.cell(idx + 1), frac.x);
        let g1 = lerp(self.cell(idx + row), self.cell(idx + row + 1), frac.x);
        lerp(g0, g1, frac.y)
    }
}

/// `a + (b − a) × t`; exact whenever `a == b`.
#[inline]
fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec3_near(a: Vec3, b: Vec3, tol: f32) {
        assert!(
            (a - b).abs().max_element() < tol,
            "expected {b:?}, got {a:?} (tol {tol})"
        );
    }

    #[test]
    fn test_identity_unit_cube_returns_input() {
        let cube = ColorCube::identity(2).unwrap();
        for rgb in [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.25, 0.5, 0.75),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.9, 0.1, 0.6),
        ] {
            assert_vec3_near(cube.sample(rgb), rgb, 1e-6);
        }
    }

    #[test]
    fn test_identity_cube_level_four_returns_interior_input() {
        let cube = ColorCube::identity(4).unwrap();
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            let rgb = Vec3::new(t, 1.0 - t, (t * 3.7).fract());
            assert_vec3_near(cube.sample(rgb), rgb, 1e-4);
        }
    }

    #[test]
    fn test_uniform_gray_cube_is_exact() {
        let cube = ColorCube::from_data(3, vec![0.5; 27 * 3]).unwrap();
        for rgb in [Vec3::ZERO, Vec3::new(0.3, 0.77, 0.01), Vec3::ONE, Vec3::splat(-4.0)] {
            assert_eq!(cube.sample(rgb), Vec3::splat(0.5));
        }
    }

    #[test]
    fn test_hand_computed_unit_cube() {
        // Cube where only the blue channel of the (1,1,1) corner is non-zero.
        let mut data = vec![0.0; 8 * 3];
        data[7 * 3 + 2] = 1.0;
        let cube = ColorCube::from_data(2, data).unwrap();
        let out = cube.sample(Vec3::new(0.5, 0.5, 0.5));
        assert_vec3_near(out, Vec3::new(0.0, 0.0, 0.125), 1e-6);
        let out = cube.sample(Vec3::new(1.0, 0.5, 0.25));
        assert_vec3_near(out, Vec3::new(0.0, 0.0, 0.125), 1e-6);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        let cube = ColorCube::identity(5).unwrap();
        assert_vec3_near(cube.sample(Vec3::new(-1.0, 2.0, 0.5)), Vec3::new(0.0, 1.0, 0.5), 1e-6);
        assert_vec3_near(cube.sample(Vec3::splat(f32::MAX)), Vec3::ONE, 1e-6);
    }

    #[test]
    fn test_from_data_rejects_wrong_length() {
        assert!(ColorCube::from_data(2, vec![0.0; 23]).is_err());
        assert!(ColorCube::from_data(1, vec![0.0; 3]).is_err());
    }

    #[test]
    fn test_from_image_decodes_hald_layout() {
        // Level-2 Hald: 8x8 image, cube level 4.
        let cube = ColorCube::identity(4).unwrap();
        let bytes: Vec<u8> = cube
            .data()
            .iter()
            .map(|v| (v * 255.0).round() as u8)
            .collect();
        let image = PixelBuffer::new(8, 8, 3, bytes).unwrap();
        let decoded = ColorCube::from_image(&image).unwrap();
        assert_eq!(decoded.level(), 4);
        assert_vec3_near(decoded.sample(Vec3::new(0.2, 0.4, 0.6)), Vec3::new(0.2, 0.4, 0.6), 1e-2);
    }

    #[test]
    fn test_from_image_ignores_alpha() {
        let mut bytes = Vec::new();
        for b in 0..2u8 {
            for g in 0..2u8 {
                for r in 0..2u8 {
                    bytes.extend([r * 255, g * 255, b * 255, 7]);
                }
            }
        }
        let image = PixelBuffer::new(4, 2, 4, bytes).unwrap();
        let decoded = ColorCube::from_image(&image).unwrap();
        assert_eq!(decoded, ColorCube::identity(2).unwrap());
    }

    #[test]
    fn test_from_image_rejects_non_cubic_pixel_count() {
        let image = PixelBuffer::new(3, 3, 3, vec![0; 27]).unwrap();
        let err = ColorCube::from_image(&image).unwrap_err();
        assert!(matches!(err, DsipError::Configuration(_)));
    }

    #[test]
    fn test_from_image_rejects_grayscale() {
        let image = PixelBuffer::new(8, 1, 1, vec![0; 8]).unwrap();
        assert!(ColorCube::from_image(&image).is_err());
    }
}
