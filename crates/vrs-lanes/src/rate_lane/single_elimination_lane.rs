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
use vrs_core::renderer::{
    FilterUniforms, RateMapPass, NEIGHBORHOOD_MOORE, NEIGHBORHOOD_VON_NEUMANN,
};
use vrs_core::settings::PostFilter;

/// Removes isolated coarse tiles with the neighborhood chosen by
/// [`PostFilter`]. Does nothing when the policy is [`PostFilter::None`].
#[derive(Debug, Default)]
pub struct SingleEliminationLane;

impl SingleEliminationLane {
    /// Creates the lane.
    pub fn new() -> Self {
        Self
    }

    /// Uniform block for the current frame, `None` when filtering is off.
    pub fn uniforms(frame: &FrameInputs) -> Option<FilterUniforms> {
        let neighborhood = match frame.settings.post_filter {
            PostFilter::None => return None,
            PostFilter::VonNeumann => NEIGHBORHOOD_VON_NEUMANN,
            PostFilter::Moore => NEIGHBORHOOD_MOORE,
        };
        Some(FilterUniforms {
            tiles_x: frame.grid.width,
            tiles_y: frame.grid.height,
            neighborhood,
            _pad: 0,
        })
    }
}

impl Lane for SingleEliminationLane {
    fn strategy_name(&self) -> &'static str {
        "SingleElimination"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::PostFilter
    }

    fn execute(&self, ctx: &mut LaneContext) -> Result<(), LaneError> {
        let (device, frame) = frame_context(ctx)?;
        match Self::uniforms(frame) {
            Some(u) => dispatch(device.as_ref(), frame, &RateMapPass::SingleElimination(u)),
            None => Ok(()),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
