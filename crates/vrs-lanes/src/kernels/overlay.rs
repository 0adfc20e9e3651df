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

use super::{check_extent, KernelError, GRID_COLOR};
use vrs_core::renderer::{ColorImage, OverlayUniforms, SceneInput};
use vrs_core::{ShadingRate, ShadingRateTileMap};

/// Opacity of the rate tint in blend mode.
pub const OVERLAY_ALPHA: f32 = 0.4;

/// Tint of a rate code, `None` for full rate.
pub fn rate_tint(code: u8) -> Option<[f32; 3]> {
    match ShadingRate::from_code(code) {
        Some(ShadingRate::R1x1) => None,
        Some(ShadingRate::R1x2 | ShadingRate::R2x1) => Some([0.0, 0.4, 1.0]),
        Some(ShadingRate::R2x2) => Some([0.0, 1.0, 0.0]),
        Some(ShadingRate::R2x4 | ShadingRate::R4x2) => Some([1.0, 1.0, 0.0]),
        Some(ShadingRate::R4x4) => Some([1.0, 0.0, 0.0]),
        None => Some([1.0, 0.0, 1.0]),
    }
}

/// Tints `color` by the rate of each tile and writes the result to `output`.
/// The rate map is only read.
pub fn debug_overlay(
    map: &ShadingRateTileMap,
    color: &ColorImage,
    output: &mut ColorImage,
    u: &OverlayUniforms,
) -> Result<(), KernelError> {
    let target = (u.target_width, u.target_height);
    check_extent(SceneInput::Color, color.extent(), target)?;
    check_extent(SceneInput::DebugOutput, output.extent(), target)?;
    let ts = u.tile_size.max(1);

    for y in 0..u.target_height {
        for x in 0..u.target_width {
            let (tx, ty) = (x / ts, y / ts);
            let base = color.get(x, y);
            let grid_line = u.draw_grid != 0 && (x % ts == 0 || y % ts == 0);

            let texel = if grid_line {
                GRID_COLOR
            } else if tx >= map.grid().width || ty >= map.grid().height {
                base
            } else {
                match rate_tint(map.code(tx, ty)) {
                    None => base,
                    Some(tint) if u.blend_mask != 0 => [
                        base[0] + (tint[0] - base[0]) * OVERLAY_ALPHA,
                        base[1] + (tint[1] - base[1]) * OVERLAY_ALPHA,
                        base[2] + (tint[2] - base[2]) * OVERLAY_ALPHA,
                        base[3],
                    ],
                    Some(tint) => [tint[0], tint[1], tint[2], base[3]],
                }
            };
            output.set(x, y, texel);
        }
    }
    Ok(())
}
