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
use vrs_core::renderer::{DiagnosticUniforms, RateMapPass};

/// Engineering views of the compute pipeline. Writes 1x1 to every tile.
#[derive(Debug, Default)]
pub struct DiagnosticLane;

impl DiagnosticLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Uniform block for the current frame.
    pub fn uniforms(frame: &FrameInputs) -> DiagnosticUniforms {
        DiagnosticUniforms {
            tiles_x: frame.grid.width,
            tiles_y: frame.grid.height,
            tile_size: frame.tile_size(),
            view: frame.settings.diagnostic.view.index(),
            target_width: frame.targets.width,
            target_height: frame.targets.height,
            draw_grid: frame.settings.overlay.draw_grid as u32,
            _pad: 0,
        }
    }
}

impl Lane for DiagnosticLane {
    fn strategy_name(&self) -> &'static str {
        "ComputeDiagnostic"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Generator
    }

    fn execute(&self, ctx: &mut LaneContext) -> Result<(), LaneError> {
        let (device, frame) = frame_context(ctx)?;
        dispatch(
            device.as_ref(),
            frame,
            &RateMapPass::Diagnostic(Self::uniforms(frame)),
        )
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
