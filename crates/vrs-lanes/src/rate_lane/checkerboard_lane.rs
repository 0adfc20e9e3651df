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

//! CPU checkerboard reference pattern.

use super::{frame_context, stage_and_upload};
use vrs_core::lane::{Lane, LaneContext, LaneError, LaneKind};
use vrs_core::ShadingRate;

/// Alternates 1x1 and 2x2 tiles: 1x1 wherever `x + y` is even.
#[derive(Debug, Default)]
pub struct CheckerboardLane;

impl CheckerboardLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Rate of tile `(x, y)`.
    #[inline]
    pub fn rate_at(x: u32, y: u32) -> ShadingRate {
        if (x + y) % 2 == 0 {
            ShadingRate::R1x1
        } else {
            ShadingRate::R2x2
        }
    }
}

impl Lane for CheckerboardLane {
    fn strategy_name(&self) -> &'static str {
        "Checkerboard"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Generator
    }

    fn execute(&self, ctx: &mut LaneContext) -> Result<(), LaneError> {
        let (device, frame) = frame_context(ctx)?;
        stage_and_upload(device.as_ref(), frame.grid, frame.tile_size(), Self::rate_at)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity() {
        assert_eq!(CheckerboardLane::rate_at(0, 0), ShadingRate::R1x1);
        assert_eq!(CheckerboardLane::rate_at(1, 0), ShadingRate::R2x2);
        assert_eq!(CheckerboardLane::rate_at(7, 3), ShadingRate::R1x1);
        assert_eq!(CheckerboardLane::rate_at(8, 3), ShadingRate::R2x2);
    }
}
