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

//! CPU quadrant reference pattern.

use super::{frame_context, stage_and_upload};
use vrs_core::lane::{Lane, LaneContext, LaneError, LaneKind};
use vrs_core::{ShadingRate, TileGrid};

/// Splits the map into four quadrants at the ceiling midpoint of each axis:
/// top-left 1x1, top-right 1x2, bottom-left 2x2, bottom-right 4x4.
#[derive(Debug, Default)]
pub struct QuadrantLane;

impl QuadrantLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Rate of tile `(x, y)`. The bottom-right quadrant falls back to 2x2
    /// without extended rates.
    pub fn rate_at(grid: TileGrid, x: u32, y: u32, extended: bool) -> ShadingRate {
        let (mid_x, mid_y) = grid.midpoint();
        match (x < mid_x, y < mid_y) {
            (true, true) => ShadingRate::R1x1,
            (false, true) => ShadingRate::R1x2,
            (true, false) => ShadingRate::R2x2,
            (false, false) => ShadingRate::R4x4.clamp_to_base(extended),
        }
    }
}

impl Lane for QuadrantLane {
    fn strategy_name(&self) -> &'static str {
        "Quadrant"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Generator
    }

    fn execute(&self, ctx: &mut LaneContext) -> Result<(), LaneError> {
        let (device, frame) = frame_context(ctx)?;
        let (grid, extended) = (frame.grid, frame.extended());
        stage_and_upload(device.as_ref(), grid, frame.tile_size(), |x, y| {
            Self::rate_at(grid, x, y, extended)
        })
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadrant_counts(grid: TileGrid) -> [usize; 4] {
        let mut counts = [0; 4];
        for (x, y) in grid.coords() {
            match QuadrantLane::rate_at(grid, x, y, true) {
                ShadingRate::R1x1 => counts[0] += 1,
                ShadingRate::R1x2 => counts[1] += 1,
                ShadingRate::R2x2 => counts[2] += 1,
                ShadingRate::R4x4 => counts[3] += 1,
                other => panic!("unexpected rate {other}"),
            }
        }
        counts
    }

    #[test]
    fn test_even_grid_splits_evenly() {
        assert_eq!(quadrant_counts(TileGrid::new(4, 2)), [2, 2, 2, 2]);
    }

    #[test]
    fn test_odd_grid_gives_the_extra_row_and_column_to_the_top_left() {
        let grid = TileGrid::new(5, 3);
        // Midpoint (3, 2).
        assert_eq!(quadrant_counts(grid), [6, 4, 3, 2]);
        assert_eq!(QuadrantLane::rate_at(grid, 2, 1, true), ShadingRate::R1x1);
        assert_eq!(QuadrantLane::rate_at(grid, 3, 1, true), ShadingRate::R1x2);
        assert_eq!(QuadrantLane::rate_at(grid, 2, 2, true), ShadingRate::R2x2);
        assert_eq!(QuadrantLane::rate_at(grid, 3, 2, true), ShadingRate::R4x4);
    }

    #[test]
    fn test_bottom_right_is_clamped_without_extended_rates() {
        let grid = TileGrid::new(2, 2);
        assert_eq!(QuadrantLane::rate_at(grid, 1, 1, false), ShadingRate::R2x2);
    }
}
