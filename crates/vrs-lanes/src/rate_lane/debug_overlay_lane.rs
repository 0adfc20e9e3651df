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

use super::{dispatch, frame_context};
use vrs_core::lane::{FrameInputs, Lane, LaneContext, LaneError, LaneKind};
use vrs_core::renderer::{OverlayUniforms, RateMapPass};

/// Tints the debug output by the rate of each tile.
#[derive(Debug, Default)]
pub struct DebugOverlayLane;

impl DebugOverlayLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Uniform block for the current frame.
    pub fn uniforms(frame: &FrameInputs) -> OverlayUniforms {
        let overlay = &frame.settings.overlay;
        OverlayUniforms {
            tiles_x: frame.grid.width,
            tiles_y: frame.grid.height,
            tile_size: frame.tile_size(),
            blend_mask: overlay.blend_mask as u32,
            draw_grid: overlay.draw_grid as u32,
            target_width: frame.targets.width,
            target_height: frame.targets.height,
            _pad: 0,
        }
    }
}

impl Lane for DebugOverlayLane {
    fn strategy_name(&self) -> &'static str {
        "DebugOverlay"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Overlay
    }

    fn execute(&self, ctx: &mut LaneContext) -> Result<(), LaneError> {
        let (device, frame) = frame_context(ctx)?;
        dispatch(
            device.as_ref(),
            frame,
            &RateMapPass::DebugOverlay(Self::uniforms(frame)),
        )
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
