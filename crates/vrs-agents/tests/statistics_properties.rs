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


//! Statistics invariants over arbitrary render-target extents.

use approx::assert_abs_diff_eq;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};
use vrs_agents::VrsAgent;
use vrs_core::renderer::{
    RateMapPass, RateMapState, SceneTargets, ShadingRateBinding, ShadingRateDevice,
};
use vrs_core::{
    CapabilitySource, ShadingMode, ShadingRateSupport, ShadingRateTier, ShadingRateTileMap,
    TileGrid, VrsError,
};

/// Keeps the last uploaded map and nothing else.
#[derive(Debug)]
struct HostMapDevice {
    support: ShadingRateSupport,
    map: Mutex<Option<ShadingRateTileMap>>,
}

impl CapabilitySource for HostMapDevice {
    fn query_shading_rate_support(&self) -> Result<ShadingRateSupport, VrsError> {
        Ok(self.support)
    }
}

impl ShadingRateDevice for HostMapDevice {
    fn create_rate_map(&self, grid: TileGrid) -> Result<(), VrsError> {
        *self.map.lock().unwrap() = Some(ShadingRateTileMap::new(grid));
        Ok(())
    }

    fn upload_rate_map(&self, map: &ShadingRateTileMap) -> Result<(), VrsError> {
        *self.map.lock().unwrap() = Some(map.clone());
        Ok(())
    }

    fn dispatch_rate_pass(
        &self,
        _pass: &RateMapPass,
        _targets: &SceneTargets,
    ) -> Result<(), VrsError> {
        Ok(())
    }

    fn transition_rate_map(&self, _state: RateMapState) -> Result<(), VrsError> {
        Ok(())
    }

    fn read_back_rate_map(&self) -> Result<ShadingRateTileMap, VrsError> {
        self.map.lock().unwrap().clone().ok_or(VrsError::RateMapNotCreated)
    }

    fn bind_shading_rate(&self, _binding: &ShadingRateBinding) -> Result<(), VrsError> {
        Ok(())
    }
}

proptest! {
    #[test]
    fn test_cpu_mode_statistics_cover_every_tile(
        width in 1u32..400,
        height in 1u32..300,
        tile_size in prop_oneof![Just(8u32), Just(16u32), Just(32u32)],
        extended in any::<bool>(),
        checkerboard in any::<bool>(),
    ) {
        let device = Arc::new(HostMapDevice {
            support: ShadingRateSupport {
                tier: ShadingRateTier::Tier2,
                tile_size,
                additional_rates: extended,
                sum_combiner: true,
                per_primitive: false,
            },
            map: Mutex::new(None),
        });
        let mut agent = VrsAgent::new(device);
        agent.settings_mut().mode = if checkerboard {
            ShadingMode::Checkerboard
        } else {
            ShadingMode::Quadrant
        };
        agent.initialize(SceneTargets::new(width, height)).unwrap();
        agent.render().unwrap();
        let stats = agent.compute_statistics().unwrap();

        assert_abs_diff_eq!(stats.total(), 100.0, epsilon = 1e-3);
        prop_assert_eq!(stats.unrecognized_tiles(), 0);
        if !extended {
            for rate in vrs_core::ShadingRate::ALL.iter().filter(|r| r.is_extended()) {
                prop_assert_eq!(stats.percent(*rate), 0.0);
            }
        }

        let map = agent.read_back_rate_map().unwrap().unwrap();
        prop_assert_eq!(map.grid(), agent.grid());
    }
}
