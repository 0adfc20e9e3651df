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

use super::{band_rate, check_extent, tile_pixels, KernelError};
use vrs_core::renderer::{DepthImage, DepthLodUniforms, SceneInput};
use vrs_core::{RateLadder, ShadingRateTileMap};

/// Normalized linear distance in `[0, 1]` of a reversed-Z depth sample,
/// 0 at the near plane and 1 at the far plane.
pub fn linearize_depth(raw: f32, near: f32, far: f32) -> f32 {
    if far <= near {
        return 0.0;
    }
    let d = raw.clamp(0.0, 1.0);
    let z = near * far / (d * (far - near) + near);
    ((z - near) / (far - near)).clamp(0.0, 1.0)
}

/// Assigns each tile a rate from the linear depth of its nearest sample.
pub fn depth_lod(
    map: &mut ShadingRateTileMap,
    depth: &DepthImage,
    u: &DepthLodUniforms,
) -> Result<(), KernelError> {
    check_extent(
        SceneInput::Depth,
        depth.extent(),
        (u.target_width, u.target_height),
    )?;
    let ladder = RateLadder::new(u.extended != 0);

    for (tx, ty) in map.grid().coords() {
        let (x0, y0, x1, y1) = tile_pixels(tx, ty, u.tile_size, u.target_width, u.target_height);
        // Reversed-Z: the largest value is the closest surface.
        let mut nearest = 0.0f32;
        for y in y0..y1 {
            for x in x0..x1 {
                nearest = nearest.max(depth.get(x, y));
            }
        }
        let distance = linearize_depth(nearest, u.camera_near, u.camera_far);
        map.set(tx, ty, band_rate(distance, u.lod_near, u.lod_far, ladder));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vrs_core::{ShadingRate, TileGrid};

    fn uniforms(width: u32, height: u32) -> DepthLodUniforms {
        DepthLodUniforms {
            tiles_x: width.div_ceil(8),
            tiles_y: height.div_ceil(8),
            tile_size: 8,
            extended: 1,
            target_width: width,
            target_height: height,
            _pad: [0; 2],
            camera_near: 1.0,
            camera_far: 100.0,
            lod_near: 0.2,
            lod_far: 0.5,
        }
    }

    #[test]
    fn test_linearize_depth_endpoints() {
        assert_relative_eq!(linearize_depth(1.0, 1.0, 100.0), 0.0);
        assert_relative_eq!(linearize_depth(0.0, 1.0, 100.0), 1.0);
        assert_eq!(linearize_depth(0.5, 10.0, 10.0), 0.0);
        assert!(linearize_depth(0.1, 1.0, 100.0) > linearize_depth(0.2, 1.0, 100.0));
    }

    #[test]
    fn test_near_geometry_is_full_rate_far_is_coarse() {
        let u = uniforms(16, 8);
        // Left tile hugs the camera, right tile sits at the far plane.
        let depth = DepthImage::from_fn(16, 8, |x, _| if x < 8 { 1.0 } else { 0.0 });
        let mut map = ShadingRateTileMap::new(TileGrid::new(2, 1));
        depth_lod(&mut map, &depth, &u).unwrap();
        assert_eq!(map.get(0, 0), Some(ShadingRate::R1x1));
        assert_eq!(map.get(1, 0), Some(ShadingRate::R4x4));
    }

    #[test]
    fn test_one_near_sample_keeps_the_tile_fine() {
        let u = uniforms(8, 8);
        let depth = DepthImage::from_fn(8, 8, |x, y| if (x, y) == (3, 5) { 1.0 } else { 0.0 });
        let mut map = ShadingRateTileMap::new(TileGrid::new(1, 1));
        depth_lod(&mut map, &depth, &u).unwrap();
        assert_eq!(map.get(0, 0), Some(ShadingRate::R1x1));
    }

    #[test]
    fn test_clamps_to_base_rates() {
        let mut u = uniforms(8, 8);
        u.extended = 0;
        let depth = DepthImage::new(8, 8);
        let mut map = ShadingRateTileMap::new(TileGrid::new(1, 1));
        depth_lod(&mut map, &depth, &u).unwrap();
        assert_eq!(map.get(0, 0), Some(ShadingRate::R2x2));
    }

    #[test]
    fn test_rejects_mismatched_depth() {
        let u = uniforms(16, 16);
        let depth = DepthImage::new(8, 8);
        let mut map = ShadingRateTileMap::new(TileGrid::new(2, 2));
        assert!(matches!(
            depth_lod(&mut map, &depth, &u),
            Err(KernelError::ExtentMismatch { .. })
        ));
    }
}
