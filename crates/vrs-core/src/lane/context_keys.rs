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

//! Context key types for [`LaneContext`](super::LaneContext).
//!
//! | Key                 | Meaning                                              |
//! |---------------------|------------------------------------------------------|
//! | [`ShadingDevice`]   | Device owning the GPU-resident rate map              |
//! | [`FrameInputs`]     | Settings, capabilities, grid and targets of the frame |

use crate::capability::VrsCapabilities;
use crate::rate::TileGrid;
use crate::renderer::{SceneTargets, ShadingRateDevice};
use crate::settings::VrsSettings;
use std::sync::Arc;

/// Device that rate-map lanes record their work on.
#[derive(Debug, Clone)]
pub struct ShadingDevice(pub Arc<dyn ShadingRateDevice>);

/// Everything a rate-map lane reads for the current frame.
#[derive(Debug, Clone)]
pub struct FrameInputs {
    /// Snapshot of the configuration for this frame.
    pub settings: VrsSettings,
    /// Session capabilities.
    pub capabilities: VrsCapabilities,
    /// Grid of the rate map.
    pub grid: TileGrid,
    /// Scene images bound for this frame.
    pub targets: SceneTargets,
}

impl FrameInputs {
    /// Tile size in pixels.
    pub fn tile_size(&self) -> u32 {
        self.capabilities.tile_size
    }

    /// Whether the extended rates may be written.
    pub fn extended(&self) -> bool {
        self.capabilities.additional_rates
    }
}
