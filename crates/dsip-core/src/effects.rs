//! Per-pixel film effects: grain overlay and radial vignette.
//!
//! The tuning constants here are shared by the CPU pipeline and the preview
//! uniform block; they are not user-configurable.

use glam::{Vec2, Vec3};

use crate::buffer::{PixelBuffer, normalized_rgb};

/// Multiplier applied to `u(1−u) × v(1−v)` before the falloff exponent.
pub const VIGNETTE_SCALE: f32 = 15.0;

/// Falloff exponent of the vignette.
pub const VIGNETTE_EXPONENT: f32 = 0.15;

/// Overlay blend for one channel.
///
/// ```text
/// base > 0.5 → 2 × base × blend
/// otherwise  → 1 − 2 × (1 − base) × (1 − blend)
/// ```
///
/// Both branches meet at `base = 0.5`, where the result equals `blend`.
/// The output is not clamped.
#[inline]
pub fn overlay_blend(base: f32, blend: f32) -> f32 {
    if base > 0.5 {
        2.0 * base * blend
    } else {
        1.0 - 2.0 * (1.0 - base) * (1.0 - blend)
    }
}

/// [`overlay_blend`] applied independently to each channel.
#[inline]
pub fn overlay_blend_rgb(base: Vec3, blend: Vec3) -> Vec3 {
    Vec3::new(
        overlay_blend(base.x, blend.x),
        overlay_blend(base.y, blend.y),
        overlay_blend(base.z, blend.z),
    )
}

/// Texture coordinate of a pixel center: `((col + 0.5) / width, (row + 0.5) / height)`.
#[inline]
pub fn pixel_center_uv(row: u32, col: u32, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (col as f32 + 0.5) / width as f32,
        (row as f32 + 0.5) / height as f32,
    )
}

/// Vignette brightness factor at `uv`.
///
/// ```text
/// falloff = (u(1 − u) × v(1 − v) × 15) ^ 0.15
/// ```
///
/// `0.9375 ^ 0.15 ≈ 0.9904` at the center, `0` on any edge.
#[inline]
pub fn vignette_falloff(uv: Vec2) -> f32 {
    let u = uv.x * (1.0 - uv.x);
    let v = uv.y * (1.0 - uv.y);
    (u * v * VIGNETTE_SCALE).powf(VIGNETTE_EXPONENT)
}

/// Multiply every channel by [`vignette_falloff`].
#[inline]
pub fn apply_vignette(color: Vec3, uv: Vec2) -> Vec3 {
    color * vignette_falloff(uv)
}

/// Tiling policy for grain plates: coordinates wrap modulo the plate size,
/// no resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrainTiling {
    pub width: u32,
    pub height: u32,
}

impl GrainTiling {
    /// Tiling for a plate of the given size. Returns `None` for an empty plate.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then_some(Self { width, height })
    }

    /// Tiling for an existing plate. Pixel buffers are never empty.
    pub fn for_plate(grain: &PixelBuffer) -> Self {
        Self {
            width: grain.width(),
            height: grain.height(),
        }
    }

    /// Plate coordinate `(row, col)` that a destination pixel reads.
    #[inline]
    pub fn wrap(&self, row: u32, col: u32) -> (u32, u32) {
        tile_coord(row, col, self.width, self.height)
    }
}

/// `(row mod grain_h, col mod grain_w)`. Both sizes must be non-zero.
#[inline]
pub fn tile_coord(row: u32, col: u32, grain_w: u32, grain_h: u32) -> (u32, u32) {
    (row % grain_h, col % grain_w)
}

/// Normalized grain RGB for destination pixel `(row, col)`, tiling the plate.
#[inline]
pub fn sample_grain(grain: &PixelBuffer, row: u32, col: u32) -> Vec3 {
    let (gr, gc) = GrainTiling::for_plate(grain).wrap(row, col);
    normalized_rgb(grain.pixel(gr, gc))
}
