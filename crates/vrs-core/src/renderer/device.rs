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

//! The device contract implemented by shading-rate backends.

use super::{RateMapPass, ShadingRateBinding, VrsError};
use crate::capability::CapabilitySource;
use crate::rate::{ShadingRateTileMap, TileGrid};
use std::fmt;

/// Opaque handle to a scene image registered with a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// The role a scene image plays for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneInput {
    /// The rendered frame, read by luma-based passes.
    Color,
    /// Reversed-Z scene depth.
    Depth,
    /// Per-pixel screen-space motion in pixels.
    Velocity,
    /// Image written by the debug overlay and the diagnostic pass.
    DebugOutput,
}

impl SceneInput {
    /// Lower-case name used in log lines and errors.
    pub fn name(self) -> &'static str {
        match self {
            SceneInput::Color => "color",
            SceneInput::Depth => "depth",
            SceneInput::Velocity => "velocity",
            SceneInput::DebugOutput => "debug output",
        }
    }
}

/// Scene images bound for the current frame. Unbound inputs are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneTargets {
    /// Width of the render target in pixels.
    pub width: u32,
    /// Height of the render target in pixels.
    pub height: u32,
    /// Color target.
    pub color: Option<TextureId>,
    /// Depth buffer.
    pub depth: Option<TextureId>,
    /// Velocity buffer.
    pub velocity: Option<TextureId>,
    /// Debug output image. May alias `color`.
    pub debug_output: Option<TextureId>,
}

impl SceneTargets {
    /// Targets of the given extent with nothing bound.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// The texture bound for `input`.
    pub fn get(&self, input: SceneInput) -> Option<TextureId> {
        match input {
            SceneInput::Color => self.color,
            SceneInput::Depth => self.depth,
            SceneInput::Velocity => self.velocity,
            SceneInput::DebugOutput => self.debug_output,
        }
    }

    /// The texture bound for `input`, or [`VrsError::MissingSceneInput`].
    pub fn require(&self, input: SceneInput) -> Result<TextureId, VrsError> {
        self.get(input).ok_or(VrsError::MissingSceneInput(input))
    }
}

/// Resource state of the rate map. The map must be [`RateMapState::Unordered`]
/// while passes write it and [`RateMapState::ShadingRateSource`] before draws
/// consume it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateMapState {
    /// Writable by compute passes and uploads.
    Unordered,
    /// Readable by the rasterizer as a shading-rate image.
    ShadingRateSource,
    /// Source of a copy to host-visible memory.
    CopySource,
}

/// A backend owning the GPU-resident rate map.
///
/// Work is recorded in call order. Only [`ShadingRateDevice::read_back_rate_map`]
/// blocks: it drains all previously recorded work before returning.
pub trait ShadingRateDevice: CapabilitySource + Send + Sync + fmt::Debug {
    /// (Re)allocates the rate map for `grid` and clears it to full rate.
    fn create_rate_map(&self, grid: TileGrid) -> Result<(), VrsError>;

    /// Overwrites the whole rate map with host-generated codes.
    fn upload_rate_map(&self, map: &ShadingRateTileMap) -> Result<(), VrsError>;

    /// Records one compute pass over the rate map.
    fn dispatch_rate_pass(&self, pass: &RateMapPass, targets: &SceneTargets)
        -> Result<(), VrsError>;

    /// Records a resource-state transition of the rate map.
    fn transition_rate_map(&self, state: RateMapState) -> Result<(), VrsError>;

    /// Copies the rate map to host memory, waiting for the GPU to finish.
    fn read_back_rate_map(&self) -> Result<ShadingRateTileMap, VrsError>;

    /// Applies the shading-rate state used by subsequent draws.
    fn bind_shading_rate(&self, binding: &ShadingRateBinding) -> Result<(), VrsError>;
}

/// The depth-of-field post-process, able to write its own rate map derived
/// from its circle-of-confusion computation.
pub trait DepthOfFieldRateSource: Send + Sync + fmt::Debug {
    /// Records the depth-of-field rate pass on `device`.
    fn encode_rate_map(
        &self,
        device: &dyn ShadingRateDevice,
        targets: &SceneTargets,
        low_quality: bool,
    ) -> Result<(), VrsError>;
}
