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

use super::{check_extent, luma, KernelError, TileLuma};
use vrs_core::renderer::{ColorImage, DiagnosticUniforms, SceneInput, VelocityImage};
use vrs_core::settings::DiagnosticView;
use vrs_core::{ShadingRate, ShadingRateTileMap};

/// Motion magnitude, in pixels, painted as white.
pub const VELOCITY_DISPLAY_RANGE: f32 = 16.0;

/// Lanes per wave assumed by the wave-lane view.
pub const WAVE_SIZE: u32 = 32;

/// Color painted on tile borders when the grid is on.
pub const GRID_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

fn gray(v: f32) -> [f32; 4] {
    let v = v.clamp(0.0, 1.0);
    [v, v, v, 1.0]
}

fn unorm(value: u32, extent: u32) -> f32 {
    if extent <= 1 {
        0.0
    } else {
        value as f32 / (extent - 1) as f32
    }
}

/// Paints the selected view into `output` and forces the rate map to 1x1.
///
/// Every pixel is one thread and every tile one work-group.
pub fn diagnostic(
    map: &mut ShadingRateTileMap,
    color: &ColorImage,
    velocity: Option<&VelocityImage>,
    output: &mut ColorImage,
    u: &DiagnosticUniforms,
) -> Result<(), KernelError> {
    let target = (u.target_width, u.target_height);
    check_extent(SceneInput::Color, color.extent(), target)?;
    check_extent(SceneInput::DebugOutput, output.extent(), target)?;
    if let Some(velocity) = velocity {
        check_extent(SceneInput::Velocity, velocity.extent(), target)?;
    }

    map.fill(ShadingRate::R1x1);

    let view = DiagnosticView::from_index(u.view).unwrap_or_default();
    let ts = u.tile_size.max(1);

    for (tx, ty) in map.grid().coords() {
        let stats = TileLuma::measure(color, tx, ty, ts);
        let x0 = tx * ts;
        let y0 = ty * ts;
        for y in y0..(y0 + ts).min(u.target_height) {
            for x in x0..(x0 + ts).min(u.target_width) {
                let (lx, ly) = (x - x0, y - y0);
                let local_index = ly * ts + lx;
                let texel = match view {
                    DiagnosticView::TargetColor => color.get(x, y),
                    DiagnosticView::GroupId => {
                        [unorm(tx, u.tiles_x), unorm(ty, u.tiles_y), 0.0, 1.0]
                    }
                    DiagnosticView::GroupIndex => gray(unorm(local_index, ts * ts)),
                    DiagnosticView::GroupThreadId => [unorm(lx, ts), unorm(ly, ts), 0.0, 1.0],
                    DiagnosticView::DispatchThreadId => [
                        unorm(x, u.target_width),
                        unorm(y, u.target_height),
                        0.0,
                        1.0,
                    ],
                    DiagnosticView::Velocity => {
                        let [vx, vy] = velocity.map_or([0.0, 0.0], |v| v.get(x, y));
                        gray((vx * vx + vy * vy).sqrt() / VELOCITY_DISPLAY_RANGE)
                    }
                    DiagnosticView::Luma => gray(luma(color.get(x, y))),
                    DiagnosticView::LogLuma => gray(luma(color.get(x, y)).ln_1p() / 2f32.ln()),
                    DiagnosticView::AverageTileLuma => gray(stats.average),
                    DiagnosticView::MseLumaX => gray(stats.error_x),
                    DiagnosticView::MseLumaY => gray(stats.error_y),
                    DiagnosticView::MseLumaXy => gray(
                        (0.5 * (stats.error_x * stats.error_x + stats.error_y * stats.error_y))
                            .sqrt(),
                    ),
                    DiagnosticView::WaveLane => {
                        gray((local_index % WAVE_SIZE) as f32 / (WAVE_SIZE - 1) as f32)
                    }
                };
                let texel = if u.draw_grid != 0 && (lx == 0 || ly == 0) {
                    GRID_COLOR
                } else {
                    texel
                };
                output.set(x, y, texel);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use vrs_core::TileGrid;

    fn uniforms(view: DiagnosticView) -> DiagnosticUniforms {
        DiagnosticUniforms {
            tiles_x: 2,
            tiles_y: 2,
            tile_size: 8,
            view: view.index(),
            target_width: 16,
            target_height: 16,
            draw_grid: 0,
            _pad: 0,
        }
    }

    fn run(
        view: DiagnosticView,
        velocity: Option<&VelocityImage>,
    ) -> (ShadingRateTileMap, ColorImage) {
        let color = ColorImage::from_fn(16, 16, |x, _| [x as f32 / 15.0, 0.5, 0.25, 1.0]);
        let mut output = ColorImage::new(16, 16);
        let mut map = ShadingRateTileMap::filled(TileGrid::new(2, 2), ShadingRate::R4x4);
        diagnostic(&mut map, &color, velocity, &mut output, &uniforms(view)).unwrap();
        (map, output)
    }

    #[test]
    fn test_rate_output_is_always_full_rate() {
        for view in DiagnosticView::ALL {
            let (map, _) = run(view, None);
            assert_eq!(map, ShadingRateTileMap::new(TileGrid::new(2, 2)));
        }
    }

    #[test]
    fn test_target_color_is_copied() {
        let (_, output) = run(DiagnosticView::TargetColor, None);
        assert_eq!(output.get(15, 3), [1.0, 0.5, 0.25, 1.0]);
    }

    #[test]
    fn test_group_id_and_wave_lane() {
        let (_, output) = run(DiagnosticView::GroupId, None);
        assert_eq!(output.get(12, 2), [1.0, 0.0, 0.0, 1.0]);

        let (_, output) = run(DiagnosticView::WaveLane, None);
        assert_eq!(output.get(0, 0), [0.0, 0.0, 0.0, 1.0]);
        // Local index 31 is the last lane of the first wave.
        assert_eq!(output.get(7, 3), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(output.get(0, 4), [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_velocity_view_scales_magnitude() {
        let velocity = VelocityImage::filled(16, 16, [0.0, 8.0]);
        let (_, output) = run(DiagnosticView::Velocity, Some(&velocity));
        assert_relative_eq!(output.get(5, 5)[0], 0.5);

        let (_, still) = run(DiagnosticView::Velocity, None);
        assert_eq!(still.get(5, 5)[0], 0.0);
    }

    #[test]
    fn test_grid_darkens_tile_borders() {
        let color = ColorImage::filled(16, 16, [1.0; 4]);
        let mut output = ColorImage::new(16, 16);
        let mut map = ShadingRateTileMap::new(TileGrid::new(2, 2));
        let mut u = uniforms(DiagnosticView::TargetColor);
        u.draw_grid = 1;
        diagnostic(&mut map, &color, None, &mut output, &u).unwrap();
        assert_eq!(output.get(8, 5), GRID_COLOR);
        assert_eq!(output.get(9, 5), [1.0; 4]);
    }

    #[test]
    fn test_unknown_view_falls_back_to_target_color() {
        let color = ColorImage::filled(16, 16, [0.2, 0.3, 0.4, 1.0]);
        let mut output = ColorImage::new(16, 16);
        let mut map = ShadingRateTileMap::new(TileGrid::new(2, 2));
        let mut u = uniforms(DiagnosticView::TargetColor);
        u.view = 99;
        diagnostic(&mut map, &color, None, &mut output, &u).unwrap();
        assert_eq!(output, color);
    }
}
