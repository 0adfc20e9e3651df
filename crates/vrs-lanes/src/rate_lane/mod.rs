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

//! Rate-map lanes.
//!
//! Every lane reads two entries from the [`LaneContext`]:
//!
//! | Key              | Purpose                                   |
//! |------------------|-------------------------------------------|
//! | [`ShadingDevice`] | Device owning the GPU-resident rate map   |
//! | [`FrameInputs`]   | Settings, capabilities, grid and targets |
//!
//! Generators write every tile of the map. CPU generators stage the codes on
//! the host and upload them; GPU generators record a [`RateMapPass`].

mod checkerboard_lane;
mod contrast_adaptive_lane;
mod debug_overlay_lane;
mod depth_lod_lane;
mod depth_of_field_lane;
mod diagnostic_lane;
mod foveated_lane;
mod quadrant_lane;
mod single_elimination_lane;

pub use checkerboard_lane::*;
pub use contrast_adaptive_lane::*;
pub use debug_overlay_lane::*;
pub use depth_lod_lane::*;
pub use depth_of_field_lane::*;
pub use diagnostic_lane::*;
pub use foveated_lane::*;
pub use quadrant_lane::*;
pub use single_elimination_lane::*;

use std::sync::Arc;
use vrs_core::lane::{FrameInputs, Lane, LaneContext, LaneError, ShadingDevice};
use vrs_core::renderer::{RateMapPass, SceneInput, ShadingRateDevice};
use vrs_core::{ShadingMode, ShadingRate, ShadingRateTileMap, TileGrid};

/// The device and frame inputs of `ctx`.
pub(crate) fn frame_context(
    ctx: &LaneContext,
) -> Result<(Arc<dyn ShadingRateDevice>, &FrameInputs), LaneError> {
    let device = ctx
        .get::<ShadingDevice>()
        .ok_or(LaneError::missing("ShadingDevice"))?
        .0
        .clone();
    let frame = ctx
        .get::<FrameInputs>()
        .ok_or(LaneError::missing("FrameInputs"))?;
    Ok((device, frame))
}

/// Records `pass` after checking that every image it needs is bound.
///
/// Velocity is optional: devices read zero motion when it is absent.
pub(crate) fn dispatch(
    device: &dyn ShadingRateDevice,
    frame: &FrameInputs,
    pass: &RateMapPass,
) -> Result<(), LaneError> {
    let required = pass
        .inputs()
        .iter()
        .copied()
        .filter(|input| *input != SceneInput::Velocity)
        .chain(pass.output());
    for input in required {
        if frame.targets.get(input).is_none() {
            return Err(LaneError::MissingSceneInput(input.name()));
        }
    }
    log::trace!("Dispatching {} over {:?}", pass.label(), pass.workgroups());
    device.dispatch_rate_pass(pass, &frame.targets)?;
    Ok(())
}

/// Builds the map on the host and uploads its visible rows.
///
/// The staging buffer carries `tile_size` extra rows so a generator writing
/// one row past a rounded-down edge stays in bounds.
pub(crate) fn stage_and_upload(
    device: &dyn ShadingRateDevice,
    grid: TileGrid,
    tile_size: u32,
    rate_at: impl Fn(u32, u32) -> ShadingRate,
) -> Result<(), LaneError> {
    let staged_rows = grid.height + tile_size;
    let mut staging = vec![ShadingRate::R1x1.code(); grid.width as usize * staged_rows as usize];
    for (x, y) in grid.coords() {
        staging[grid.index(x, y)] = rate_at(x, y).code();
    }
    let map = ShadingRateTileMap::from_codes(grid, staging);
    device.upload_rate_map(&map)?;
    Ok(())
}

/// Overwrites the rate map with 1x1.
pub fn upload_full_rate(device: &dyn ShadingRateDevice, grid: TileGrid) -> Result<(), LaneError> {
    device.upload_rate_map(&ShadingRateTileMap::new(grid))?;
    Ok(())
}

/// One generator lane per [`ShadingMode`], in [`ShadingMode::ALL`] order.
///
/// The depth-of-field lane starts without a source; hosts that own a
/// depth-of-field pass register a [`DepthOfFieldLane::with_source`] after
/// these.
pub fn generator_lanes() -> Vec<Box<dyn Lane>> {
    ShadingMode::ALL
        .iter()
        .map(|mode| -> Box<dyn Lane> {
            match mode {
                ShadingMode::Quadrant => Box::new(QuadrantLane::new()),
                ShadingMode::Checkerboard => Box::new(CheckerboardLane::new()),
                ShadingMode::Foveated => Box::new(FoveatedLane::new()),
                ShadingMode::DepthLod => Box::new(DepthLodLane::new()),
                ShadingMode::DepthOfField => Box::new(DepthOfFieldLane::new()),
                ShadingMode::ComputeDiagnostic => Box::new(DiagnosticLane::new()),
                ShadingMode::ContrastAdaptive => Box::new(ContrastAdaptiveLane::new()),
            }
        })
        .collect()
}
