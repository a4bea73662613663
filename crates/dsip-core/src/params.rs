//! Parameter set that defines a look.
//!
//! `ProcessParams` is the single source of truth for both the CPU pipeline
//! and the preview shader. The shader never reads its own copy of a tuning
//! value: it receives a [`ProcessUniforms`] built from the same struct.

use std::ops::RangeInclusive;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::effects::{VIGNETTE_EXPONENT, VIGNETTE_SCALE};

/// Every look adjustment. Copied by value into each processing call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessParams {
    /// Blend between the HSV-adjusted color (0) and the LUT color (1).
    pub lut_strength: f32,
    /// Blend between the plain color (0) and the grain overlay (1).
    pub grain_strength: f32,
    /// Blend between the plain color (0) and the vignetted color (1).
    pub vignette_strength: f32,
    /// Hue gain. 1.0 = unchanged.
    pub hue: f32,
    /// Saturation gain. 1.0 = unchanged.
    pub saturation: f32,
    /// Value gain. 1.0 = unchanged.
    pub lightness: f32,
    /// Additive offset in linear light. 0.0 = unchanged.
    pub brightness: f32,
    /// Gain around 0.5. 1.0 = unchanged.
    pub contrast: f32,
    /// Full export pipeline when true; LUT-only preview otherwise.
    pub cpu_pipeline: bool,
}

impl ProcessParams {
    /// Range offered for the three strength sliders.
    pub const STRENGTH_RANGE: RangeInclusive<f32> = 0.0..=1.0;
    /// Range offered for the hue, saturation, and lightness gains.
    pub const GAIN_RANGE: RangeInclusive<f32> = 0.0..=1.0;
    /// Range offered for brightness.
    pub const BRIGHTNESS_RANGE: RangeInclusive<f32> = -0.2..=0.2;
    /// Range offered for contrast.
    pub const CONTRAST_RANGE: RangeInclusive<f32> = 0.8..=1.2;

    /// LUT-only preview of the same look.
    pub fn preview(self) -> Self {
        Self {
            cpu_pipeline: false,
            ..self
        }
    }

    /// Constant term of the contrast/brightness step:
    /// `0.5 − contrast × 0.5 + brightness`.
    #[inline]
    pub fn contrast_bias(&self) -> f32 {
        (0.5 - self.contrast * 0.5) + self.brightness
    }

    /// Copy with every slider clamped to the range the UI exposes.
    pub fn clamped_to_ui(self) -> Self {
        let clamp = |v: f32, r: &RangeInclusive<f32>| v.clamp(*r.start(), *r.end());
        Self {
            lut_strength: clamp(self.lut_strength, &Self::STRENGTH_RANGE),
            grain_strength: clamp(self.grain_strength, &Self::STRENGTH_RANGE),
            vignette_strength: clamp(self.vignette_strength, &Self::STRENGTH_RANGE),
            hue: clamp(self.hue, &Self::GAIN_RANGE),
            saturation: clamp(self.saturation, &Self::GAIN_RANGE),
            lightness: clamp(self.lightness, &Self::GAIN_RANGE),
            brightness: clamp(self.brightness, &Self::BRIGHTNESS_RANGE),
            contrast: clamp(self.contrast, &Self::CONTRAST_RANGE),
            cpu_pipeline: self.cpu_pipeline,
        }
    }
}

impl Default for ProcessParams {
    /// Identity look: LUT, grain, and vignette off, gains neutral.
    fn default() -> Self {
        Self {
            lut_strength: 0.0,
            grain_strength: 0.0,
            vignette_strength: 0.0,
            hue: 1.0,
            saturation: 1.0,
            lightness: 1.0,
            brightness: 0.0,
            contrast: 1.0,
            cpu_pipeline: true,
        }
    }
}

/// Uniform block for a preview shader, `std140`-compatible.
///
/// Field order matches the shader declaration; every value comes from
/// [`ProcessParams`] or the shared effect constants.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ProcessUniforms {
    /// Source image size in pixels (`u_textureResolution`).
    pub texture_resolution: [f32; 2],
    /// Grain plate size in pixels, used to tile grain in texture space.
    pub grain_resolution: [f32; 2],
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub lut_strength: f32,
    pub vignette_strength: f32,
    pub grain_strength: f32,
    pub brightness: f32,
    pub contrast: f32,
    pub vignette_scale: f32,
    pub vignette_exponent: f32,
    /// LUT grid size per axis.
    pub lut_level: f32,
    pub _padding: f32,
}

impl ProcessUniforms {
    /// Build the uniform block for an image of `width × height` with a grain
    /// plate of `grain_size` and a cube of `lut_level`.
    pub fn from_params(
        params: &ProcessParams,
        width: u32,
        height: u32,
        grain_size: (u32, u32),
        lut_level: usize,
    ) -> Self {
        Self {
            texture_resolution: [width as f32, height as f32],
            grain_resolution: [grain_size.0 as f32, grain_size.1 as f32],
            hue: params.hue,
            saturation: params.saturation,
            lightness: params.lightness,
            lut_strength: params.lut_strength,
            vignette_strength: params.vignette_strength,
            grain_strength: params.grain_strength,
            brightness: params.brightness,
            contrast: params.contrast,
            vignette_scale: VIGNETTE_SCALE,
            vignette_exponent: VIGNETTE_EXPONENT,
            lut_level: lut_level as f32,
            _padding: 0.0,
        }
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let params = ProcessParams::default();
        assert_eq!(params.lut_strength, 0.0);
        assert_eq!(params.hue, 1.0);
        assert_eq!(params.contrast, 1.0);
        assert_eq!(params.contrast_bias(), 0.0);
        assert!(params.cpu_pipeline);
    }

    #[test]
    fn test_contrast_bias_matches_formula() {
        let params = ProcessParams {
            contrast: 1.2,
            brightness: 0.1,
            ..Default::default()
        };
        assert!((params.contrast_bias() - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_preview_only_toggles_pipeline() {
        let params = ProcessParams {
            grain_strength: 0.4,
            ..Default::default()
        };
        let preview = params.preview();
        assert!(!preview.cpu_pipeline);
        assert_eq!(preview.grain_strength, 0.4);
    }

    #[test]
    fn test_clamped_to_ui() {
        let params = ProcessParams {
            lut_strength: 3.0,
            brightness: -1.0,
            contrast: 0.1,
            hue: -0.5,
            ..Default::default()
        }
        .clamped_to_ui();
        assert_eq!(params.lut_strength, 1.0);
        assert_eq!(params.brightness, -0.2);
        assert_eq!(params.contrast, 0.8);
        assert_eq!(params.hue, 0.0);
    }

    #[test]
    fn test_serde_fills_missing_fields_with_defaults() {
        let params: ProcessParams = serde_json::from_str(r#"{"grain_strength":0.3}"#).unwrap();
        assert_eq!(params.grain_strength, 0.3);
        assert_eq!(params.saturation, 1.0);
        assert!(params.cpu_pipeline);
    }

    #[test]
    fn test_uniforms_layout_is_std140_sized() {
        assert_eq!(std::mem::size_of::<ProcessUniforms>(), 64);
        assert_eq!(std::mem::size_of::<ProcessUniforms>() % 16, 0);
    }

    #[test]
    fn test_uniforms_mirror_params() {
        let params = ProcessParams {
            lut_strength: 0.7,
            contrast: 1.1,
            ..Default::default()
        };
        let u = ProcessUniforms::from_params(&params, 640, 480, (256, 256), 64);
        assert_eq!(u.texture_resolution, [640.0, 480.0]);
        assert_eq!(u.lut_strength, 0.7);
        assert_eq!(u.contrast, 1.1);
        assert_eq!(u.vignette_scale, VIGNETTE_SCALE);
        assert_eq!(u.lut_level, 64.0);
        assert_eq!(u.as_bytes().len(), 64);
        let back: &ProcessUniforms = bytemuck::from_bytes(u.as_bytes());
        assert_eq!(*back, u);
    }
}
