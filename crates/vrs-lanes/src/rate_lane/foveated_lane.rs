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
use vrs_core::renderer::{FoveatedUniforms, RateMapPass};

/// GPU foveated falloff around a focal point offset from the screen center.
#[derive(Debug, Default)]
pub struct FoveatedLane;

impl FoveatedLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Uniform block for the current frame.
    pub fn uniforms(frame: &FrameInputs) -> FoveatedUniforms {
        let settings = &frame.settings.foveated;
        let (offset_x, offset_y) = settings.center_offset();
        FoveatedUniforms {
            tiles_x: frame.grid.width,
            tiles_y: frame.grid.height,
            tile_size: frame.tile_size(),
            extended: frame.extended() as u32,
            center_x: frame.grid.width as f32 / 2.0 + offset_x,
            center_y: frame.grid.height as f32 / 2.0 + offset_y,
            inner_radius: settings.inner_radius(),
            outer_radius: settings.outer_radius(),
        }
    }
}

impl Lane for FoveatedLane {
    fn strategy_name(&self) -> &'static str {
        "Foveated"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Generator
    }

    fn execute(&self, ctx: &mut LaneContext) -> Result<(), LaneError> {
        let (device, frame) = frame_context(ctx)?;
        dispatch(
            device.as_ref(),
            frame,
            &RateMapPass::Foveated(Self::uniforms(frame)),
        )
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
