//! Pipeline orchestration: applies a look to every pixel of a source image.
//!
//! The per-pixel chain, in order:
//! 1. LUT sample of the gamma-encoded source
//! 2. Linearize source, HSV gain, back to RGB
//! 3. Mix linearized LUT color with the HSV color by `lut_strength`
//! 4. Contrast/brightness
//! 5. Grain overlay, mixed by `grain_strength`
//! 6. Vignette, mixed by `vignette_strength`
//! 7. Back to sRGB, clamp, quantize
//!
//! Preview mode (`cpu_pipeline == false`) stops after step 1.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use glam::{Vec2, Vec3};
use rayon::prelude::*;

use crate::buffer::{PixelBuffer, normalized_rgb, quantize};
use crate::color::{hsv_to_rgb, linear_to_srgb_rgb, rgb_to_hsv, srgb_to_linear_rgb};
use crate::effects::{apply_vignette, overlay_blend_rgb, pixel_center_uv, sample_grain};
use crate::error::{DsipError, DsipResult};
use crate::lut::ColorCube;
use crate::params::ProcessParams;

/// `a × t + b × (1 − t)`: `t = 1` selects `a`, `t = 0` selects `b`.
#[inline]
pub fn mix(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a * t + b * (1.0 - t)
}

/// Apply a look to `source`, decoding `lut` into a cube first.
///
/// Fails before touching any pixel when the LUT is not cubic or a buffer is
/// unusable. `source` must be RGB or RGBA; the alpha channel of an RGBA
/// source is written as fully opaque.
pub fn process_image(
    source: &PixelBuffer,
    lut: &PixelBuffer,
    grain: &PixelBuffer,
    params: ProcessParams,
) -> DsipResult<PixelBuffer> {
    let cube = ColorCube::from_image(lut)?;
    process_image_with_cube(source, &cube, grain, params)
}

/// Same as [`process_image`] with an already decoded cube.
pub fn process_image_with_cube(
    source: &PixelBuffer,
    cube: &ColorCube,
    grain: &PixelBuffer,
    params: ProcessParams,
) -> DsipResult<PixelBuffer> {
    run(source, cube, grain, params, None)
}

/// Same as [`process_image_with_cube`], checking `cancel` before each row.
///
/// Returns [`DsipError::Cancelled`] and no output once the flag is observed.
pub fn process_image_cancellable(
    source: &PixelBuffer,
    cube: &ColorCube,
    grain: &PixelBuffer,
    params: ProcessParams,
    cancel: &AtomicBool,
) -> DsipResult<PixelBuffer> {
    run(source, cube, grain, params, Some(cancel))
}

/// Full export-path color for one pixel.
///
/// `src` is the gamma-encoded source color, `uv` the pixel-center texture
/// coordinate and `grain` the tiled grain sample, all normalized. Returns
/// the gamma-encoded result clamped to `[0, 1]`. This is the function a
/// preview shader mirrors.
pub fn shade_pixel(
    src: Vec3,
    uv: Vec2,
    grain: Vec3,
    cube: &ColorCube,
    params: &ProcessParams,
) -> Vec3 {
    let lut_color = cube.sample(src);

    let gains = Vec3::new(params.hue, params.saturation, params.lightness);
    let hsv_color = hsv_to_rgb(rgb_to_hsv(srgb_to_linear_rgb(src)) * gains);

    let mut color = mix(srgb_to_linear_rgb(lut_color), hsv_color, params.lut_strength);
    color = color * params.contrast + Vec3::splat(params.contrast_bias());

    let grained = overlay_blend_rgb(color, grain);
    color = mix(grained, color, params.grain_strength);

    let vignetted = apply_vignette(color, uv);
    color = mix(vignetted, color, params.vignette_strength);

    linear_to_srgb_rgb(color).clamp(Vec3::ZERO, Vec3::ONE)
}

/// LUT-only color for one pixel, still gamma-encoded.
#[inline]
pub fn preview_pixel(src: Vec3, cube: &ColorCube) -> Vec3 {
    cube.sample(src).clamp(Vec3::ZERO, Vec3::ONE)
}

fn validate(source: &PixelBuffer) -> DsipResult<()> {
    match source.channels() {
        3 | 4 => Ok(()),
        n => Err(DsipError::config(format!(
            "source image must be RGB or RGBA, got {n} channels"
        ))),
    }
}

fn run(
    source: &PixelBuffer,
    cube: &ColorCube,
    grain: &PixelBuffer,
    params: ProcessParams,
    cancel: Option<&AtomicBool>,
) -> DsipResult<PixelBuffer> {
    validate(source)?;

    let start = Instant::now();
    let width = source.width();
    let height = source.height();
    let channels = source.channels() as usize;
    let stride = source.row_stride();

    tracing::debug!(
        width,
        height,
        channels,
        lut_level = cube.level(),
        grain_width = grain.width(),
        grain_height = grain.height(),
        cpu_pipeline = params.cpu_pipeline,
        "processing image"
    );

    let mut dest = source.blank_like();
    dest.as_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .try_for_each(|(row, row_out)| {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                return Err(DsipError::Cancelled);
            }

            let row = row as u32;
            let row_in = source.row(row);
            for (col, (src_px, dst_px)) in row_in
                .chunks_exact(channels)
                .zip(row_out.chunks_exact_mut(channels))
                .enumerate()
            {
                let col = col as u32;
                let src = normalized_rgb(src_px);
                let color = if params.cpu_pipeline {
                    let uv = pixel_center_uv(row, col, width, height);
                    let grain_rgb = sample_grain(grain, row, col);
                    shade_pixel(src, uv, grain_rgb, cube, &params)
                } else {
                    preview_pixel(src, cube)
                };

                dst_px[0] = quantize(color.x);
                dst_px[1] = quantize(color.y);
                dst_px[2] = quantize(color.z);
                if channels == 4 {
                    dst_px[3] = u8::MAX;
                }
            }
            Ok(())
        })?;

    tracing::info!(
        width,
        height,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "image processed"
    );
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_grain() -> PixelBuffer {
        PixelBuffer::filled(3, 3, &[128, 128, 128]).unwrap()
    }

    fn gradient(width: u32, height: u32, channels: u8) -> PixelBuffer {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let r = (x * 255 / (width - 1).max(1)) as u8;
                let g = (y * 255 / (height - 1).max(1)) as u8;
                data.extend([r, g, 96]);
                if channels == 4 {
                    data.push(10);
                }
            }
        }
        PixelBuffer::new(width, height, channels, data).unwrap()
    }

    #[test]
    fn test_mix_endpoints() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-1.0, 0.5, 9.0);
        assert_eq!(mix(a, b, 1.0), a);
        assert_eq!(mix(a, b, 0.0), b);
        assert_eq!(mix(a, b, 0.5), Vec3::new(0.0, 1.25, 6.0));
    }

    #[test]
    fn test_identity_configuration_is_lossless() {
        let source = gradient(7, 5, 3);
        let cube = ColorCube::identity(8).unwrap();
        let out =
            process_image_with_cube(&source, &cube, &gray_grain(), ProcessParams::default())
                .unwrap();
        for (a, b) in source.as_bytes().iter().zip(out.as_bytes()) {
            assert!((*a as i32 - *b as i32).abs() <= 1, "{a} vs {b}");
        }
    }

    #[test]
    fn test_preview_mode_writes_lut_color_only() {
        // Cube that maps everything to a fixed orange.
        let mut data = Vec::new();
        for _ in 0..27 {
            data.extend([1.0, 0.5, 0.0]);
        }
        let cube = ColorCube::from_data(3, data).unwrap();
        let params = ProcessParams {
            lut_strength: 0.0,
            grain_strength: 1.0,
            vignette_strength: 1.0,
            contrast: 1.2,
            brightness: 0.2,
            cpu_pipeline: false,
            ..Default::default()
        };
        let out = process_image_with_cube(&gradient(4, 4, 3), &cube, &gray_grain(), params)
            .unwrap();
        for px in out.pixels() {
            assert_eq!(px, &[255, 128, 0]);
        }
    }

    #[test]
    fn test_alpha_is_forced_opaque() {
        let cube = ColorCube::identity(2).unwrap();
        for params in [ProcessParams::default(), ProcessParams::default().preview()] {
            let out =
                process_image_with_cube(&gradient(3, 2, 4), &cube, &gray_grain(), params).unwrap();
            assert!(out.pixels().all(|px| px[3] == 255));
        }
    }

    #[test]
    fn test_full_vignette_darkens_edges_more_than_center() {
        let source = PixelBuffer::filled(9, 9, &[200, 200, 200]).unwrap();
        let cube = ColorCube::identity(2).unwrap();
        let params = ProcessParams {
            vignette_strength: 1.0,
            ..Default::default()
        };
        let out = process_image_with_cube(&source, &cube, &gray_grain(), params).unwrap();
        let center = out.pixel(4, 4)[0];
        let corner = out.pixel(0, 0)[0];
        assert!(center < 200);
        assert!(corner < center);
    }

    #[test]
    fn test_parallel_output_matches_per_pixel_reference() {
        let source = gradient(11, 6, 3);
        let grain_data = vec![0, 40, 80, 120, 160, 200, 240, 30, 60, 90, 150, 210];
        let grain = PixelBuffer::new(2, 2, 3, grain_data).unwrap();
        let cube = ColorCube::identity(5).unwrap();
        let params = ProcessParams {
            lut_strength: 0.6,
            grain_strength: 0.35,
            vignette_strength: 0.5,
            hue: 0.9,
            saturation: 0.8,
            lightness: 0.95,
            brightness: 0.05,
            contrast: 1.1,
            cpu_pipeline: true,
        };
        let out = process_image_with_cube(&source, &cube, &grain, params).unwrap();
        for row in 0..source.height() {
            for col in 0..source.width() {
                let uv = pixel_center_uv(row, col, source.width(), source.height());
                let expected = shade_pixel(
                    source.rgb_at(row, col),
                    uv,
                    sample_grain(&grain, row, col),
                    &cube,
                    &params,
                );
                let px = out.pixel(row, col);
                assert_eq!(px, &[quantize(expected.x), quantize(expected.y), quantize(expected.z)]);
            }
        }
    }

    #[test]
    fn test_rejects_single_channel_source() {
        let source = PixelBuffer::filled(2, 2, &[10]).unwrap();
        let cube = ColorCube::identity(2).unwrap();
        let err = process_image_with_cube(&source, &cube, &gray_grain(), ProcessParams::default())
            .unwrap_err();
        assert!(matches!(err, DsipError::Configuration(_)));
    }

    #[test]
    fn test_cancelled_before_start_returns_error() {
        let cancel = AtomicBool::new(true);
        let cube = ColorCube::identity(2).unwrap();
        let err = process_image_cancellable(
            &gradient(4, 4, 3),
            &cube,
            &gray_grain(),
            ProcessParams::default(),
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err, DsipError::Cancelled));
    }

    #[test]
    fn test_cancellable_without_cancel_matches_plain_call() {
        let cancel = AtomicBool::new(false);
        let cube = ColorCube::identity(3).unwrap();
        let source = gradient(5, 3, 3);
        let a = process_image_with_cube(&source, &cube, &gray_grain(), ProcessParams::default())
            .unwrap();
        let b = process_image_cancellable(
            &source,
            &cube,
            &gray_grain(),
            ProcessParams::default(),
            &cancel,
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
