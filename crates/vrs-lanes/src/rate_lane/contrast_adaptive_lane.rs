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
use crate::kernels::MOTION_ERROR_FALLOFF;
use vrs_core::lane::{FrameInputs, Lane, LaneContext, LaneError, LaneKind};
use vrs_core::renderer::{ContrastAdaptiveUniforms, RateMapPass};

/// GPU contrast-adaptive shading: tiles whose luma error stays under the
/// just-noticeable difference are shaded at half or quarter rate.
#[derive(Debug, Default)]
pub struct ContrastAdaptiveLane;

impl ContrastAdaptiveLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Uniform block for the current frame.
    pub fn uniforms(frame: &FrameInputs) -> ContrastAdaptiveUniforms {
        let settings = &frame.settings.contrast_adaptive;
        ContrastAdaptiveUniforms {
            tiles_x: frame.grid.width,
            tiles_y: frame.grid.height,
            tile_size: frame.tile_size(),
            extended: frame.extended() as u32,
            target_width: frame.targets.width,
            target_height: frame.targets.height,
            use_weber_fechner: settings.use_weber_fechner as u32,
            use_motion_vectors: settings.use_motion_vectors as u32,
            sensitivity_threshold: settings.sensitivity_threshold(),
            quarter_rate_sensitivity: settings.quarter_rate_sensitivity(),
            environment_luma: settings.environment_luma(),
            weber_fechner_constant: settings.weber_fechner_constant(),
            motion_error_falloff: MOTION_ERROR_FALLOFF,
            _pad: [0.0; 3],
        }
    }
}

impl Lane for ContrastAdaptiveLane {
    fn strategy_name(&self) -> &'static str {
        "ContrastAdaptive"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Generator
    }

    fn execute(&self, ctx: &mut LaneContext) -> Result<(), LaneError> {
        let (device, frame) = frame_context(ctx)?;
        if frame.settings.contrast_adaptive.use_motion_vectors && frame.targets.velocity.is_none() {
            log::debug!("Motion vectors requested but no velocity buffer is bound");
        }
        dispatch(
            device.as_ref(),
            frame,
            &RateMapPass::ContrastAdaptive(Self::uniforms(frame)),
        )
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
