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


//! The frame agent driving the software device end to end.

use approx::assert_relative_eq;
use std::sync::Arc;
use vrs_agents::VrsAgent;
use vrs_core::renderer::{ColorImage, DepthImage, RateMapState, SceneTargets};
use vrs_core::settings::PostFilter;
use vrs_core::{ShadingMode, ShadingRate, ShadingRateTileMap, TileGrid, VrsSettings};
use vrs_infra::SoftwareShadingDevice;

const WIDTH: u32 = 64;
const HEIGHT: u32 = 32;

/// Near plane on the left half, far plane on the right half.
fn split_depth() -> DepthImage {
    DepthImage::from_fn(WIDTH, HEIGHT, |x, _| if x < WIDTH / 2 { 1.0 } else { 0.0 })
}

fn depth_lod_settings() -> VrsSettings {
    let mut settings = VrsSettings::default();
    settings.mode = ShadingMode::DepthLod;
    settings
}

fn agent_with(
    device: &Arc<SoftwareShadingDevice>,
    settings: VrsSettings,
    targets: SceneTargets,
) -> VrsAgent {
    let mut agent = VrsAgent::with_settings(device.clone(), settings);
    agent.initialize(targets).unwrap();
    agent
}

#[test]
fn test_depth_lod_frame_statistics() {
    let device = Arc::new(SoftwareShadingDevice::tier2(16));
    let mut targets = SceneTargets::new(WIDTH, HEIGHT);
    targets.depth = Some(device.register_depth(split_depth()).unwrap());

    let settings = depth_lod_settings();
    let mut agent = agent_with(&device, settings, targets);
    assert_eq!(agent.grid(), TileGrid::new(4, 2));

    agent.render().unwrap();
    assert_eq!(device.map_state(), Some(RateMapState::ShadingRateSource));

    let stats = agent.compute_statistics().unwrap();
    assert_relative_eq!(stats.percent(ShadingRate::R1x1), 50.0);
    assert_relative_eq!(stats.percent(ShadingRate::R4x4), 50.0);
    // Readback restores the state draws expect.
    assert_eq!(device.map_state(), Some(RateMapState::ShadingRateSource));
}

#[test]
fn test_missing_depth_falls_back_to_full_rate() {
    let device = Arc::new(SoftwareShadingDevice::tier2(16));
    let settings = depth_lod_settings();
    let mut agent = agent_with(&device, settings, SceneTargets::new(WIDTH, HEIGHT));

    agent.render().unwrap();
    assert_eq!(
        device.rate_map().unwrap(),
        ShadingRateTileMap::new(TileGrid::new(4, 2))
    );
}

#[test]
fn test_overlay_paints_the_color_target() {
    let device = Arc::new(SoftwareShadingDevice::tier2(16));
    let color = device
        .register_color(ColorImage::filled(WIDTH, HEIGHT, [0.0, 0.0, 0.0, 1.0]))
        .unwrap();
    let mut targets = SceneTargets::new(WIDTH, HEIGHT);
    targets.color = Some(color);
    targets.debug_output = Some(color);
    targets.depth = Some(device.register_depth(split_depth()).unwrap());

    let mut settings = depth_lod_settings();
    settings.overlay.enabled = true;
    settings.overlay.blend_mask = false;
    let mut agent = agent_with(&device, settings, targets);
    agent.render().unwrap();

    let painted = device.color_image(color).unwrap();
    assert_eq!(painted.get(8, 8), [0.0, 0.0, 0.0, 1.0]);
    assert_eq!(painted.get(56, 8), [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn test_post_filter_removes_isolated_tiles() {
    let device = Arc::new(SoftwareShadingDevice::tier2(16));
    // Only the far corner tile is coarse.
    let depth = DepthImage::from_fn(WIDTH, HEIGHT, |x, y| {
        if x >= WIDTH - 16 && y >= HEIGHT - 16 {
            0.0
        } else {
            1.0
        }
    });
    let mut targets = SceneTargets::new(WIDTH, HEIGHT);
    targets.depth = Some(device.register_depth(depth).unwrap());

    let mut settings = depth_lod_settings();
    settings.post_filter = PostFilter::VonNeumann;
    let mut agent = agent_with(&device, settings, targets);
    agent.render().unwrap();
    assert_eq!(
        device.rate_map().unwrap(),
        ShadingRateTileMap::new(TileGrid::new(4, 2))
    );
}

#[test]
fn test_diagnostic_mode_keeps_full_rate() {
    let device = Arc::new(SoftwareShadingDevice::tier2(16));
    let color = device
        .register_color(ColorImage::filled(WIDTH, HEIGHT, [0.5, 0.5, 0.5, 1.0]))
        .unwrap();
    let output = device.register_color(ColorImage::new(WIDTH, HEIGHT)).unwrap();
    let mut targets = SceneTargets::new(WIDTH, HEIGHT);
    targets.color = Some(color);
    targets.debug_output = Some(output);

    let mut settings = VrsSettings::default();
    settings.mode = ShadingMode::ComputeDiagnostic;
    let mut agent = agent_with(&device, settings, targets);
    agent.render().unwrap();

    assert_eq!(
        agent.read_back_rate_map().unwrap(),
        Some(ShadingRateTileMap::new(TileGrid::new(4, 2)))
    );
    assert_ne!(
        device.color_image(output).unwrap(),
        ColorImage::new(WIDTH, HEIGHT)
    );
}

#[test]
fn test_bind_reaches_the_device() {
    let device = Arc::new(SoftwareShadingDevice::tier2(16));
    let mut agent = agent_with(
        &device,
        VrsSettings::default(),
        SceneTargets::new(WIDTH, HEIGHT),
    );
    agent.render().unwrap();
    let binding = agent.bind().unwrap();
    assert!(binding.rate_image);
    assert_eq!(device.current_binding(), Some(binding));

    agent.clear().unwrap();
    assert!(!device.current_binding().unwrap().rate_image);
}
