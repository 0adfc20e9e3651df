// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Contrast-adaptive shading.
//!
//! For each tile the kernel estimates how much luma error halving the
//! shading rate along an axis would introduce, and compares it with a
//! just-noticeable difference derived from the tile's brightness.

use super::{check_extent, tile_pixels, KernelError};
use vrs_core::renderer::{
    ColorImage, ContrastAdaptiveUniforms, SceneInput, VelocityImage,
};
use vrs_core::{ShadingRate, ShadingRateTileMap};

/// Error attenuation per pixel of mean tile motion.
pub const MOTION_ERROR_FALLOFF: f32 = 0.1;

/// Below this Weber-Fechner constant the logarithmic model degenerates to
/// the linear one.
const WEBER_FECHNER_EPSILON: f32 = 1e-6;

/// Rec. 709 luma of a linear color, never negative.
#[inline]
pub fn luma(color: [f32; 4]) -> f32 {
    (0.2126 * color[0] + 0.7152 * color[1] + 0.0722 * color[2]).max(0.0)
}

/// Luma statistics of one tile.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TileLuma {
    /// Mean luma.
    pub average: f32,
    /// Estimated error of half rate along X.
    pub error_x: f32,
    /// Estimated error of half rate along Y.
    pub error_y: f32,
}

impl TileLuma {
    /// Gathers the statistics of tile `(tx, ty)`.
    pub fn measure(color: &ColorImage, tx: u32, ty: u32, tile_size: u32) -> Self {
        let (x0, y0, x1, y1) = tile_pixels(tx, ty, tile_size, color.width(), color.height());

        let mut sum = 0.0f32;
        let mut count = 0u32;
        let mut sum_x = 0.0f32;
        let mut pairs_x = 0u32;
        let mut sum_y = 0.0f32;
        let mut pairs_y = 0u32;

        for y in y0..y1 {
            for x in x0..x1 {
                let l = luma(color.get(x, y));
                sum += l;
                count += 1;
                if x + 1 < x1 {
                    let d = 0.5 * (luma(color.get(x + 1, y)) - l);
                    sum_x += d * d;
                    pairs_x += 1;
                }
                if y + 1 < y1 {
                    let d = 0.5 * (luma(color.get(x, y + 1)) - l);
                    sum_y += d * d;
                    pairs_y += 1;
                }
            }
        }

        let rms = |sum: f32, n: u32| if n == 0 { 0.0 } else { (sum / n as f32).sqrt() };
        Self {
            average: if count == 0 { 0.0 } else { sum / count as f32 },
            error_x: rms(sum_x, pairs_x),
            error_y: rms(sum_y, pairs_y),
        }
    }
}

/// Mean motion of tile `(tx, ty)` in pixels.
pub fn mean_motion(velocity: &VelocityImage, tx: u32, ty: u32, tile_size: u32) -> f32 {
    let (x0, y0, x1, y1) = tile_pixels(tx, ty, tile_size, velocity.width(), velocity.height());
    let mut sum = 0.0f32;
    let mut count = 0u32;
    for y in y0..y1 {
        for x in x0..x1 {
            let [vx, vy] = velocity.get(x, y);
            sum += (vx * vx + vy * vy).sqrt();
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

/// Just-noticeable luma difference for a tile of mean luma `average`.
pub fn just_noticeable_difference(u: &ContrastAdaptiveUniforms, average: f32) -> f32 {
    let adapted = average + u.environment_luma;
    let c = u.weber_fechner_constant;
    if u.use_weber_fechner != 0 && c > WEBER_FECHNER_EPSILON {
        u.sensitivity_threshold * (c * adapted).ln_1p() / c
    } else {
        u.sensitivity_threshold * adapted
    }
}

/// Log2 rate along one axis: 2 (quarter), 1 (half) or 0 (full).
#[inline]
pub fn axis_log2(error: f32, jnd: f32, quarter_rate_sensitivity: f32) -> u8 {
    if quarter_rate_sensitivity * error < jnd {
        2
    } else if error < jnd {
        1
    } else {
        0
    }
}

/// Rate chosen for a tile with the given statistics and mean motion.
pub fn contrast_rate(u: &ContrastAdaptiveUniforms, stats: &TileLuma, motion: f32) -> ShadingRate {
    let jnd = just_noticeable_difference(u, stats.average);
    let attenuation = if u.use_motion_vectors != 0 {
        1.0 / (1.0 + u.motion_error_falloff * motion.max(0.0))
    } else {
        1.0
    };
    let k = u.quarter_rate_sensitivity;
    ShadingRate::from_axes_log2(
        axis_log2(stats.error_x * attenuation, jnd, k),
        axis_log2(stats.error_y * attenuation, jnd, k),
        u.extended != 0,
    )
}

/// Writes a contrast-adaptive rate into every tile.
///
/// A missing velocity image reads as zero motion.
pub fn contrast_adaptive(
    map: &mut ShadingRateTileMap,
    color: &ColorImage,
    velocity: Option<&VelocityImage>,
    u: &ContrastAdaptiveUniforms,
) -> Result<(), KernelError> {
    let target = (u.target_width, u.target_height);
    check_extent(SceneInput::Color, color.extent(), target)?;
    if let Some(velocity) = velocity {
        check_extent(SceneInput::Velocity, velocity.extent(), target)?;
    }

    for (tx, ty) in map.grid().coords() {
        let stats = TileLuma::measure(color, tx, ty, u.tile_size);
        let motion = match velocity {
            Some(v) if u.use_motion_vectors != 0 => mean_motion(v, tx, ty, u.tile_size),
            _ => 0.0,
        };
        map.set(tx, ty, contrast_rate(u, &stats, motion));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vrs_core::TileGrid;

    fn uniforms() -> ContrastAdaptiveUniforms {
        ContrastAdaptiveUniforms {
            tiles_x: 2,
            tiles_y: 1,
            tile_size: 8,
            extended: 1,
            target_width: 16,
            target_height: 8,
            use_weber_fechner: 0,
            use_motion_vectors: 0,
            sensitivity_threshold: 0.15,
            quarter_rate_sensitivity: 2.13,
            environment_luma: 0.05,
            weber_fechner_constant: 1.0,
            motion_error_falloff: MOTION_ERROR_FALLOFF,
            _pad: [0.0; 3],
        }
    }

    fn gray(v: f32) -> [f32; 4] {
        [v, v, v, 1.0]
    }

    #[test]
    fn test_luma_weights() {
        assert_relative_eq!(luma([1.0, 1.0, 1.0, 1.0]), 1.0, epsilon = 1e-6);
        assert_relative_eq!(luma([0.0, 1.0, 0.0, 0.0]), 0.7152);
        assert_eq!(luma([-1.0, 0.0, 0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_tile_luma_of_vertical_stripes() {
        // Columns alternate 0 and 1: every horizontal pair differs by 1.
        let color = ColorImage::from_fn(8, 8, |x, _| gray((x % 2) as f32));
        let stats = TileLuma::measure(&color, 0, 0, 8);
        assert_relative_eq!(stats.average, 0.5, epsilon = 1e-6);
        assert_relative_eq!(stats.error_x, 0.5, epsilon = 1e-6);
        assert_eq!(stats.error_y, 0.0);
    }

    #[test]
    fn test_single_pixel_tile_has_no_error() {
        let color = ColorImage::filled(9, 9, gray(0.3));
        let stats = TileLuma::measure(&color, 1, 1, 8);
        assert_relative_eq!(stats.average, 0.3 * (0.2126 + 0.7152 + 0.0722), epsilon = 1e-6);
        assert_eq!(stats.error_x, 0.0);
        assert_eq!(stats.error_y, 0.0);
    }

    #[test]
    fn test_weber_fechner_compresses_threshold() {
        let mut u = uniforms();
        let linear = just_noticeable_difference(&u, 2.0);
        u.use_weber_fechner = 1;
        let perceptual = just_noticeable_difference(&u, 2.0);
        assert!(perceptual < linear);
        assert_relative_eq!(perceptual, 0.15 * (2.05f32).ln_1p(), epsilon = 1e-6);

        u.weber_fechner_constant = 0.0;
        assert_relative_eq!(just_noticeable_difference(&u, 2.0), linear);
    }

    #[test]
    fn test_axis_rule() {
        assert_eq!(axis_log2(0.01, 0.1, 2.13), 2);
        assert_eq!(axis_log2(0.06, 0.1, 2.13), 1);
        assert_eq!(axis_log2(0.2, 0.1, 2.13), 0);
    }

    #[test]
    fn test_flat_tile_is_coarse_and_stripes_stay_fine_across() {
        let u = uniforms();
        let color = ColorImage::from_fn(16, 8, |x, _| {
            if x < 8 {
                gray(0.5)
            } else {
                gray((x % 2) as f32)
            }
        });
        let mut map = ShadingRateTileMap::new(TileGrid::new(2, 1));
        contrast_adaptive(&mut map, &color, None, &u).unwrap();
        assert_eq!(map.get(0, 0), Some(ShadingRate::R4x4));
        // Full rate across the stripes, quarter rate along them, clamped to 1x2.
        assert_eq!(map.get(1, 0), Some(ShadingRate::R1x2));
    }

    #[test]
    fn test_base_only_output() {
        let mut u = uniforms();
        u.extended = 0;
        let color = ColorImage::filled(16, 8, gray(0.5));
        let mut map = ShadingRateTileMap::new(TileGrid::new(2, 1));
        contrast_adaptive(&mut map, &color, None, &u).unwrap();
        assert!(!map.contains_extended());
        assert_eq!(map.get(0, 0), Some(ShadingRate::R2x2));
    }

    #[test]
    fn test_motion_relaxes_the_decision() {
        let mut u = uniforms();
        u.use_motion_vectors = 1;
        let stats = TileLuma {
            average: 0.5,
            error_x: 0.1,
            error_y: 0.1,
        };
        assert_eq!(contrast_rate(&u, &stats, 0.0), ShadingRate::R1x1);
        assert_eq!(contrast_rate(&u, &stats, 100.0), ShadingRate::R4x4);

        let velocity = VelocityImage::filled(16, 8, [3.0, 4.0]);
        assert_relative_eq!(mean_motion(&velocity, 1, 0, 8), 5.0);
    }

    #[test]
    fn test_rejects_mismatched_velocity() {
        let u = uniforms();
        let color = ColorImage::new(16, 8);
        let velocity = VelocityImage::new(4, 4);
        let mut map = ShadingRateTileMap::new(TileGrid::new(2, 1));
        let err = contrast_adaptive(&mut map, &color, Some(&velocity), &u).unwrap_err();
        assert!(matches!(
            err,
            KernelError::ExtentMismatch {
                input: SceneInput::Velocity,
                ..
            }
        ));
    }
}
