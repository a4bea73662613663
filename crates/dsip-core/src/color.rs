//! Colorspace helpers: sRGB transfer curves and the pipeline's HSV model.
//!
//! Everything here is pure and operates on values normalized to `[0, 1]`.
//! A preview shader must reproduce these functions exactly.

use glam::Vec3;

/// Epsilon added to `6 × chroma` when deriving hue.
const HUE_EPSILON: f32 = 1e-20;

/// sRGB EOTF per IEC 61966-2-1.
///
/// ```text
/// V <= 0.04045 → V / 12.92
/// V >  0.04045 → ((V + 0.055) / 1.055) ^ 2.4
/// ```
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Inverse of [`srgb_to_linear`].
///
/// ```text
/// L <= 0.0031308 → L × 12.92
/// L >  0.0031308 → L^(1/2.4) × 1.055 − 0.055
/// ```
#[inline]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        c.powf(1.0 / 2.4) * 1.055 - 0.055
    }
}

/// Per-channel [`srgb_to_linear`].
#[inline]
pub fn srgb_to_linear_rgb(rgb: Vec3) -> Vec3 {
    Vec3::new(
        srgb_to_linear(rgb.x),
        srgb_to_linear(rgb.y),
        srgb_to_linear(rgb.z),
    )
}

/// Per-channel [`linear_to_srgb`].
#[inline]
pub fn linear_to_srgb_rgb(rgb: Vec3) -> Vec3 {
    Vec3::new(
        linear_to_srgb(rgb.x),
        linear_to_srgb(rgb.y),
        linear_to_srgb(rgb.z),
    )
}

/// Convert RGB to `(hue°, saturation, value)` packed as `Vec3(h, s, v)`.
///
/// This is the branch-light swap formulation, not textbook HSV: the channels
/// are sorted with two conditional swaps while `K` tracks the hue sector
/// offset, and both divisions are epsilon-guarded instead of special-cased.
///
/// ```text
/// if g < b: swap(g, b); K = −1
/// if r < g: swap(r, g); K = −2/6 − K
/// chroma = r − min(g, b)
/// h = |360 × (K + (g − b) / (6 × chroma + 1e-20))|
/// s = chroma / (r + ε)
/// v = r
/// ```
///
/// For achromatic input the hue is whatever `K` lands on and `s ≈ 0`; callers
/// must tolerate that rather than expect a defined hue.
pub fn rgb_to_hsv(rgb: Vec3) -> Vec3 {
    let (mut r, mut g, mut b) = (rgb.x, rgb.y, rgb.z);
    let mut k = 0.0_f32;

    if g < b {
        std::mem::swap(&mut g, &mut b);
        k = -1.0;
    }
    if r < g {
        std::mem::swap(&mut r, &mut g);
        k = -2.0 / 6.0 - k;
    }

    let chroma = r - g.min(b);
    let hue = (360.0 * (k + (g - b) / (6.0 * chroma + HUE_EPSILON))).abs();
    let saturation = chroma / (r + f32::EPSILON);

    Vec3::new(hue, saturation, r)
}

/// Convert `Vec3(h°, s, v)` back to RGB with the classic six-sector table.
///
/// The sector is `floor(h / 60) mod 6`, so hues at or past 360° wrap. A hue
/// that produces no valid sector (NaN, infinities) yields gray at `v`.
pub fn hsv_to_rgb(hsv: Vec3) -> Vec3 {
    let (hue, saturation, value) = (hsv.x, hsv.y, hsv.z);

    if saturation == 0.0 {
        return Vec3::splat(value);
    }

    let h = hue / 60.0;
    let sector_floor = h.floor();
    let frac = h - sector_floor;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * frac);
    let t = value * (1.0 - saturation * (1.0 - frac));

    if !sector_floor.is_finite() {
        return Vec3::splat(value);
    }

    match (sector_floor as i64).rem_euclid(6) {
        0 => Vec3::new(value, t, p),
        1 => Vec3::new(q, value, p),
        2 => Vec3::new(p, value, t),
        3 => Vec3::new(p, q, value),
        4 => Vec3::new(t, p, value),
        5 => Vec3::new(value, p, q),
        _ => Vec3::splat(value),
    }
}
