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


use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use vrs_core::capability::{CapabilitySource, ShadingRateSupport, ShadingRateTier};
use vrs_core::renderer::{
    ColorImage, DepthImage, RateMapPass, RateMapState, SceneInput, SceneTargets,
    ShadingRateBinding, ShadingRateDevice, TextureId, VelocityImage, VrsError,
};
use vrs_core::{ShadingRateTileMap, TileGrid};
use vrs_lanes::kernels::{run_pass, PassImages};

#[derive(Debug, Clone)]
enum SceneImage {
    Color(ColorImage),
    Depth(DepthImage),
    Velocity(VelocityImage),
}

#[derive(Debug)]
struct SoftwareState {
    map: Option<ShadingRateTileMap>,
    map_state: RateMapState,
    binding: ShadingRateBinding,
    images: HashMap<TextureId, SceneImage>,
    next_id: u64,
}

impl SoftwareState {
    fn expect_state(&self, expected: RateMapState, operation: &str) -> Result<(), VrsError> {
        if self.map.is_none() {
            return Err(VrsError::RateMapNotCreated);
        }
        if self.map_state != expected {
            return Err(VrsError::Backend(format!(
                "{operation} needs the rate map in {expected:?}, it is in {:?}",
                self.map_state
            )));
        }
        Ok(())
    }

    fn insert(&mut self, image: SceneImage) -> TextureId {
        let id = TextureId(self.next_id);
        self.next_id += 1;
        self.images.insert(id, image);
        id
    }
}

/// Host implementation of [`ShadingRateDevice`].
///
/// All state sits behind one mutex, so the device can be shared through an
/// `Arc` like a GPU device.
#[derive(Debug)]
pub struct SoftwareShadingDevice {
    support: ShadingRateSupport,
    state: Mutex<SoftwareState>,
}

impl SoftwareShadingDevice {
    /// A device answering capability queries with `support`.
    pub fn new(support: ShadingRateSupport) -> Self {
        Self {
            support,
            state: Mutex::new(SoftwareState {
                map: None,
                map_state: RateMapState::ShadingRateSource,
                binding: ShadingRateBinding::FULL_RATE,
                images: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// A full-featured tier-2 device with the given tile size.
    pub fn tier2(tile_size: u32) -> Self {
        Self::new(ShadingRateSupport {
            tier: ShadingRateTier::Tier2,
            tile_size,
            additional_rates: true,
            sum_combiner: true,
            per_primitive: true,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, SoftwareState>, VrsError> {
        self.state
            .lock()
            .map_err(|_| VrsError::Backend("software device state poisoned".to_string()))
    }

    /// Registers a color image. The same ID may be bound as color and as
    /// debug output.
    pub fn register_color(&self, image: ColorImage) -> Result<TextureId, VrsError> {
        Ok(self.lock()?.insert(SceneImage::Color(image)))
    }

    /// Registers a depth image.
    pub fn register_depth(&self, image: DepthImage) -> Result<TextureId, VrsError> {
        Ok(self.lock()?.insert(SceneImage::Depth(image)))
    }

    /// Registers a velocity image.
    pub fn register_velocity(&self, image: VelocityImage) -> Result<TextureId, VrsError> {
        Ok(self.lock()?.insert(SceneImage::Velocity(image)))
    }

    /// Replaces the contents of a registered color image.
    pub fn replace_color(&self, id: TextureId, image: ColorImage) -> Result<(), VrsError> {
        let mut state = self.lock()?;
        match state.images.get_mut(&id) {
            Some(SceneImage::Color(slot)) => {
                *slot = image;
                Ok(())
            }
            _ => Err(VrsError::UnknownTexture {
                id,
                input: SceneInput::Color,
            }),
        }
    }

    /// A copy of a registered color image.
    pub fn color_image(&self, id: TextureId) -> Option<ColorImage> {
        match self.lock().ok()?.images.get(&id) {
            Some(SceneImage::Color(image)) => Some(image.clone()),
            _ => None,
        }
    }

    /// The rate map as it is now, whatever its resource state.
    pub fn rate_map(&self) -> Option<ShadingRateTileMap> {
        self.lock().ok()?.map.clone()
    }

    /// Current resource state of the rate map.
    pub fn map_state(&self) -> Option<RateMapState> {
        self.lock().ok().map(|state| state.map_state)
    }

    /// The binding last applied by [`ShadingRateDevice::bind_shading_rate`].
    pub fn current_binding(&self) -> Option<ShadingRateBinding> {
        self.lock().ok().map(|state| state.binding)
    }
}

impl CapabilitySource for SoftwareShadingDevice {
    fn query_shading_rate_support(&self) -> Result<ShadingRateSupport, VrsError> {
        Ok(self.support)
    }
}

fn take_color(
    images: &mut HashMap<TextureId, SceneImage>,
    id: TextureId,
    input: SceneInput,
) -> Result<ColorImage, VrsError> {
    match images.remove(&id) {
        Some(SceneImage::Color(image)) => Ok(image),
        Some(other) => {
            images.insert(id, other);
            Err(VrsError::UnknownTexture { id, input })
        }
        None => Err(VrsError::UnknownTexture { id, input }),
    }
}

fn color_of<'a>(
    images: &'a HashMap<TextureId, SceneImage>,
    id: TextureId,
) -> Result<&'a ColorImage, VrsError> {
    match images.get(&id) {
        Some(SceneImage::Color(image)) => Ok(image),
        _ => Err(VrsError::UnknownTexture {
            id,
            input: SceneInput::Color,
        }),
    }
}

fn depth_of<'a>(
    images: &'a HashMap<TextureId, SceneImage>,
    id: TextureId,
) -> Result<&'a DepthImage, VrsError> {
    match images.get(&id) {
        Some(SceneImage::Depth(image)) => Ok(image),
        _ => Err(VrsError::UnknownTexture {
            id,
            input: SceneInput::Depth,
        }),
    }
}

fn velocity_of<'a>(
    images: &'a HashMap<TextureId, SceneImage>,
    id: TextureId,
) -> Result<&'a VelocityImage, VrsError> {
    match images.get(&id) {
        Some(SceneImage::Velocity(image)) => Ok(image),
        _ => Err(VrsError::UnknownTexture {
            id,
            input: SceneInput::Velocity,
        }),
    }
}

/// Resolves the read-only inputs of `pass` and runs it.
///
/// `aliased_color` stands in for the color image when the debug output is
/// bound to the same texture.
fn execute(
    pass: &RateMapPass,
    map: &mut ShadingRateTileMap,
    images: &HashMap<TextureId, SceneImage>,
    targets: &SceneTargets,
    output: Option<&mut ColorImage>,
    aliased_color: Option<&ColorImage>,
) -> Result<(), VrsError> {
    let reads = |input: SceneInput| pass.inputs().contains(&input);

    let color = match (reads(SceneInput::Color), aliased_color) {
        (false, _) => None,
        (true, Some(image)) => Some(image),
        (true, None) => Some(color_of(images, targets.require(SceneInput::Color)?)?),
    };
    let depth = if reads(SceneInput::Depth) {
        Some(depth_of(images, targets.require(SceneInput::Depth)?)?)
    } else {
        None
    };
    let velocity = match targets.velocity {
        Some(id) if reads(SceneInput::Velocity) => Some(velocity_of(images, id)?),
        _ => None,
    };

    run_pass(
        pass,
        map,
        PassImages {
            color,
            depth,
            velocity,
            output,
        },
    )?;
    Ok(())
}

impl ShadingRateDevice for SoftwareShadingDevice {
    fn create_rate_map(&self, grid: TileGrid) -> Result<(), VrsError> {
        let mut state = self.lock()?;
        log::debug!(
            "Software device: rate map {}x{} tiles",
            grid.width,
            grid.height
        );
        state.map = Some(ShadingRateTileMap::new(grid));
        state.map_state = RateMapState::Unordered;
        Ok(())
    }

    fn upload_rate_map(&self, map: &ShadingRateTileMap) -> Result<(), VrsError> {
        let mut state = self.lock()?;
        state.expect_state(RateMapState::Unordered, "upload")?;
        let current = state.map.as_mut().ok_or(VrsError::RateMapNotCreated)?;
        if current.grid() != map.grid() {
            return Err(VrsError::Backend(format!(
                "uploaded map covers {:?}, rate map is {:?}",
                map.grid(),
                current.grid()
            )));
        }
        *current = map.clone();
        Ok(())
    }

    fn dispatch_rate_pass(
        &self,
        pass: &RateMapPass,
        targets: &SceneTargets,
    ) -> Result<(), VrsError> {
        let mut guard = self.lock()?;
        guard.expect_state(RateMapState::Unordered, pass.label())?;
        let SoftwareState { map, images, .. } = &mut *guard;
        let map = map.as_mut().ok_or(VrsError::RateMapNotCreated)?;

        let Some(output_input) = pass.output() else {
            return execute(pass, map, images, targets, None, None);
        };

        let output_id = targets.require(output_input)?;
        let mut output = take_color(images, output_id, output_input)?;
        let aliased = (targets.color == Some(output_id)).then(|| output.clone());
        let result = execute(
            pass,
            map,
            images,
            targets,
            Some(&mut output),
            aliased.as_ref(),
        );
        images.insert(output_id, SceneImage::Color(output));
        result
    }

    fn transition_rate_map(&self, to: RateMapState) -> Result<(), VrsError> {
        let mut state = self.lock()?;
        if state.map.is_none() {
            return Err(VrsError::RateMapNotCreated);
        }
        log::trace!("Software device: rate map {:?} -> {to:?}", state.map_state);
        state.map_state = to;
        Ok(())
    }

    fn read_back_rate_map(&self) -> Result<ShadingRateTileMap, VrsError> {
        let state = self.lock()?;
        state.expect_state(RateMapState::CopySource, "read back")?;
        state.map.clone().ok_or(VrsError::RateMapNotCreated)
    }

    fn bind_shading_rate(&self, binding: &ShadingRateBinding) -> Result<(), VrsError> {
        let mut state = self.lock()?;
        if binding.rate_image && state.map.is_none() {
            return Err(VrsError::RateMapNotCreated);
        }
        state.binding = *binding;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrs_core::renderer::{DepthLodUniforms, FoveatedUniforms, OverlayUniforms};
    use vrs_core::ShadingRate;

    fn coarse_pass(grid: TileGrid) -> RateMapPass {
        RateMapPass::Foveated(FoveatedUniforms {
            tiles_x: grid.width,
            tiles_y: grid.height,
            tile_size: 8,
            extended: 1,
            center_x: 0.0,
            center_y: 0.0,
            inner_radius: -1.0,
            outer_radius: 0.0,
        })
    }

    fn overlay_pass(grid: TileGrid) -> RateMapPass {
        RateMapPass::DebugOverlay(OverlayUniforms {
            tiles_x: grid.width,
            tiles_y: grid.height,
            tile_size: 8,
            blend_mask: 0,
            draw_grid: 0,
            target_width: grid.width * 8,
            target_height: grid.height * 8,
            _pad: 0,
        })
    }

    #[test]
    fn test_operations_before_creation_fail() {
        let device = SoftwareShadingDevice::tier2(8);
        let grid = TileGrid::new(2, 2);
        assert!(matches!(
            device.upload_rate_map(&ShadingRateTileMap::new(grid)),
            Err(VrsError::RateMapNotCreated)
        ));
        assert!(matches!(
            device.read_back_rate_map(),
            Err(VrsError::RateMapNotCreated)
        ));
        assert!(matches!(
            device.transition_rate_map(RateMapState::CopySource),
            Err(VrsError::RateMapNotCreated)
        ));
    }

    #[test]
    fn test_pass_then_readback() {
        let device = SoftwareShadingDevice::tier2(8);
        let grid = TileGrid::new(3, 2);
        device.create_rate_map(grid).unwrap();
        device
            .dispatch_rate_pass(&coarse_pass(grid), &SceneTargets::new(24, 16))
            .unwrap();

        // Readback is only legal from the copy-source state.
        assert!(matches!(
            device.read_back_rate_map(),
            Err(VrsError::Backend(_))
        ));
        device
            .transition_rate_map(RateMapState::CopySource)
            .unwrap();
        let map = device.read_back_rate_map().unwrap();
        assert_eq!(map, ShadingRateTileMap::filled(grid, ShadingRate::R4x4));
    }

    #[test]
    fn test_writes_need_unordered_state() {
        let device = SoftwareShadingDevice::tier2(8);
        let grid = TileGrid::new(2, 2);
        device.create_rate_map(grid).unwrap();
        device
            .transition_rate_map(RateMapState::ShadingRateSource)
            .unwrap();
        let err = device
            .dispatch_rate_pass(&coarse_pass(grid), &SceneTargets::new(16, 16))
            .unwrap_err();
        assert!(matches!(err, VrsError::Backend(_)));
        assert!(device
            .upload_rate_map(&ShadingRateTileMap::new(grid))
            .is_err());
    }

    #[test]
    fn test_upload_rejects_other_grids() {
        let device = SoftwareShadingDevice::tier2(8);
        device.create_rate_map(TileGrid::new(2, 2)).unwrap();
        let err = device
            .upload_rate_map(&ShadingRateTileMap::new(TileGrid::new(3, 2)))
            .unwrap_err();
        assert!(matches!(err, VrsError::Backend(_)));
    }

    #[test]
    fn test_overlay_may_alias_color() {
        let device = SoftwareShadingDevice::tier2(8);
        let grid = TileGrid::new(2, 1);
        let color = device
            .register_color(ColorImage::filled(16, 8, [0.0, 0.0, 0.0, 1.0]))
            .unwrap();
        let mut targets = SceneTargets::new(16, 8);
        targets.color = Some(color);
        targets.debug_output = Some(color);

        device.create_rate_map(grid).unwrap();
        let mut map = ShadingRateTileMap::new(grid);
        map.set(1, 0, ShadingRate::R4x4);
        device.upload_rate_map(&map).unwrap();
        device
            .dispatch_rate_pass(&overlay_pass(grid), &targets)
            .unwrap();

        let painted = device.color_image(color).unwrap();
        assert_eq!(painted.get(3, 3), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(painted.get(12, 3), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(device.rate_map().unwrap(), map);
    }

    #[test]
    fn test_missing_and_mistyped_inputs() {
        let device = SoftwareShadingDevice::tier2(8);
        let grid = TileGrid::new(2, 1);
        device.create_rate_map(grid).unwrap();
        let depth = device.register_depth(DepthImage::new(16, 8)).unwrap();

        let mut targets = SceneTargets::new(16, 8);
        let err = device
            .dispatch_rate_pass(&overlay_pass(grid), &targets)
            .unwrap_err();
        assert!(matches!(
            err,
            VrsError::MissingSceneInput(SceneInput::DebugOutput)
        ));

        targets.debug_output = Some(depth);
        let err = device
            .dispatch_rate_pass(&overlay_pass(grid), &targets)
            .unwrap_err();
        assert!(matches!(err, VrsError::UnknownTexture { id, .. } if id == depth));
        // A failed lookup leaves the image registered.
        targets.depth = Some(depth);
        let depth_pass = RateMapPass::DepthLod(DepthLodUniforms {
            tiles_x: 2,
            tiles_y: 1,
            tile_size: 8,
            extended: 1,
            target_width: 16,
            target_height: 8,
            _pad: [0; 2],
            camera_near: 0.1,
            camera_far: 100.0,
            lod_near: 0.1,
            lod_far: 0.9,
        });
        assert!(device.dispatch_rate_pass(&depth_pass, &targets).is_ok());
        assert!(device.replace_color(depth, ColorImage::new(16, 8)).is_err());
    }

    #[test]
    fn test_binding_is_recorded() {
        let device = SoftwareShadingDevice::tier2(8);
        let binding = ShadingRateBinding::uniform(ShadingRate::R2x2);
        device.bind_shading_rate(&binding).unwrap();
        assert_eq!(device.current_binding(), Some(binding));
        assert_eq!(
            device.query_shading_rate_support().unwrap().tier,
            ShadingRateTier::Tier2
        );
    }
}
