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

use super::{frame_context, upload_full_rate};
use std::sync::Arc;
use vrs_core::lane::{Lane, LaneContext, LaneError, LaneKind};
use vrs_core::renderer::DepthOfFieldRateSource;

/// Bridges to the host's depth-of-field pass, which derives rates from its
/// circle of confusion. Without a source the map is left at full rate.
#[derive(Debug, Default)]
pub struct DepthOfFieldLane {
    source: Option<Arc<dyn DepthOfFieldRateSource>>,
}

impl DepthOfFieldLane {
    /// A lane with no depth-of-field source attached.
    pub fn new() -> Self {
        Self { source: None }
    }

    /// A lane forwarding to `source`.
    pub fn with_source(source: Arc<dyn DepthOfFieldRateSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Whether a depth-of-field source is attached.
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }
}

impl Lane for DepthOfFieldLane {
    fn strategy_name(&self) -> &'static str {
        "DepthOfField"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Generator
    }

    fn on_initialize(&self, _ctx: &mut LaneContext) -> Result<(), LaneError> {
        if self.source.is_none() {
            log::debug!("DepthOfField lane has no depth-of-field source");
        }
        Ok(())
    }

    fn execute(&self, ctx: &mut LaneContext) -> Result<(), LaneError> {
        let (device, frame) = frame_context(ctx)?;
        match &self.source {
            Some(source) => {
                source.encode_rate_map(
                    device.as_ref(),
                    &frame.targets,
                    frame.settings.depth_of_field.low_quality,
                )?;
                Ok(())
            }
            None => {
                log::warn!("No depth-of-field source attached, shading at full rate");
                upload_full_rate(device.as_ref(), frame.grid)
            }
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
