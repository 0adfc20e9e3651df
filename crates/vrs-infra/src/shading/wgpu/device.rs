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
use std::sync::{mpsc, Arc, Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use wgpu::util::DeviceExt;

use vrs_core::capability::{CapabilitySource, ShadingRateSupport, ShadingRateTier};
use vrs_core::renderer::{
    ColorImage, DepthImage, RateMapPass, RateMapState, SceneInput, SceneTargets,
    ShadingRateBinding, ShadingRateDevice, TextureId, VelocityImage, VrsError,
};
use vrs_core::{ShadingRateTileMap, TileGrid};

use super::conversions::{
    codes_to_words, color_to_rgba8, depth_to_unorm16, padded_bytes_per_row, rgba8_to_color,
    velocity_to_rg32, words_to_codes, COLOR_FORMAT, DEPTH_FORMAT, VELOCITY_FORMAT,
};
use super::pipelines::{create_pass_pipeline, first_image_binding, reads_snapshot, PassPipeline};

/// Support reported by devices created without an explicit one.
pub const EMULATED_SUPPORT: ShadingRateSupport = ShadingRateSupport {
    tier: ShadingRateTier::Tier2,
    tile_size: 16,
    additional_rates: true,
    sum_combiner: false,
    per_primitive: false,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextureKind {
    Color,
    Depth,
    Velocity,
}

impl TextureKind {
    fn accepts(self, input: SceneInput) -> bool {
        matches!(
            (self, input),
            (TextureKind::Color, SceneInput::Color | SceneInput::DebugOutput)
                | (TextureKind::Depth, SceneInput::Depth)
                | (TextureKind::Velocity, SceneInput::Velocity)
        )
    }
}

#[derive(Debug)]
struct GpuTexture {
    kind: TextureKind,
    texture: wgpu::Texture,
}

impl GpuTexture {
    fn extent(&self) -> (u32, u32) {
        let size = self.texture.size();
        (size.width, size.height)
    }

    fn view(&self) -> wgpu::TextureView {
        self.texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

/// The rate map and its companions.
#[derive(Debug)]
struct RateMapBuffers {
    grid: TileGrid,
    size: u64,
    storage: wgpu::Buffer,
    snapshot: wgpu::Buffer,
    staging: wgpu::Buffer,
}

#[derive(Debug)]
struct GpuState {
    rate_map: Option<RateMapBuffers>,
    map_state: RateMapState,
    binding: ShadingRateBinding,
    textures: HashMap<TextureId, GpuTexture>,
    next_id: u64,
}

impl GpuState {
    fn expect_state(
        &self,
        expected: RateMapState,
        operation: &str,
    ) -> Result<&RateMapBuffers, VrsError> {
        let map = self.rate_map.as_ref().ok_or(VrsError::RateMapNotCreated)?;
        if self.map_state != expected {
            return Err(VrsError::Backend(format!(
                "{operation} needs the rate map in {expected:?}, it is in {:?}",
                self.map_state
            )));
        }
        Ok(map)
    }

    fn texture(
        &self,
        id: TextureId,
        input: SceneInput,
        targets: &SceneTargets,
    ) -> Result<&GpuTexture, VrsError> {
        let texture = self
            .textures
            .get(&id)
            .filter(|t| t.kind.accepts(input))
            .ok_or(VrsError::UnknownTexture { id, input })?;
        let expected = (targets.width, targets.height);
        if texture.extent() != expected {
            return Err(VrsError::ExtentMismatch {
                input,
                expected,
                actual: texture.extent(),
            });
        }
        Ok(texture)
    }
}

/// wgpu implementation of [`ShadingRateDevice`].
///
/// Every call that records GPU work submits it right away, so uploads and
/// passes execute in call order.
#[derive(Debug)]
pub struct WgpuShadingDevice {
    device: wgpu::Device,
    queue: wgpu::Queue,
    support: ShadingRateSupport,
    zero_velocity: wgpu::Texture,
    pipelines: Mutex<HashMap<&'static str, Arc<PassPipeline>>>,
    state: Mutex<GpuState>,
}

impl WgpuShadingDevice {
    /// Creates a device on the default adapter, without a surface, blocking
    /// until it is ready.
    pub fn new_headless(support: ShadingRateSupport) -> Result<Self> {
        pollster::block_on(Self::request(support))
    }

    /// Requests an adapter and a logical device, reporting `support` to the
    /// capability probe.
    pub async fn request(support: ShadingRateSupport) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("Failed to find a suitable adapter: {}", e))?;
        let info = adapter.get_info();
        log::info!(
            "Using graphics adapter: \"{}\" (Backend: {:?})",
            info.name,
            info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("VRS Logical Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| anyhow!("Failed to create logical device: {}", e))?;

        device.on_uncaptured_error(Box::new(|e| {
            log::error!("WGPU Uncaptured Error: {e:?}");
        }));

        Ok(Self::from_device(device, queue, support))
    }

    /// Wraps a device the host already owns.
    pub fn from_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        support: ShadingRateSupport,
    ) -> Self {
        let zero_velocity = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("VRS Zero Velocity"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: VELOCITY_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        Self {
            device,
            queue,
            support,
            zero_velocity,
            pipelines: Mutex::new(HashMap::new()),
            state: Mutex::new(GpuState {
                rate_map: None,
                map_state: RateMapState::ShadingRateSource,
                binding: ShadingRateBinding::FULL_RATE,
                textures: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, GpuState>, VrsError> {
        self.state
            .lock()
            .map_err(|_| VrsError::Backend("wgpu device state poisoned".to_string()))
    }

    /// The underlying wgpu device.
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Runs `f` with the rate-map storage buffer, if the map exists.
    pub fn with_rate_map_buffer<R>(&self, f: impl FnOnce(&wgpu::Buffer) -> R) -> Option<R> {
        let state = self.lock().ok()?;
        state.rate_map.as_ref().map(|map| f(&map.storage))
    }

    /// The binding last applied by [`ShadingRateDevice::bind_shading_rate`].
    pub fn current_binding(&self) -> Option<ShadingRateBinding> {
        self.lock().ok().map(|state| state.binding)
    }

    fn create_scene_texture(
        &self,
        kind: TextureKind,
        width: u32,
        height: u32,
        texels: &[u8],
    ) -> Result<TextureId, VrsError> {
        let (label, format, bytes_per_texel, usage) = match kind {
            TextureKind::Color => (
                "VRS Color Target",
                COLOR_FORMAT,
                4,
                wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::STORAGE_BINDING
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::COPY_SRC,
            ),
            TextureKind::Depth => (
                "VRS Depth Target",
                DEPTH_FORMAT,
                2,
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            ),
            TextureKind::Velocity => (
                "VRS Velocity Target",
                VELOCITY_FORMAT,
                8,
                wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            ),
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        self.write_texels(&texture, texels, bytes_per_texel);

        let mut state = self.lock()?;
        let id = TextureId(state.next_id);
        state.next_id += 1;
        state.textures.insert(id, GpuTexture { kind, texture });
        Ok(id)
    }

    fn write_texels(&self, texture: &wgpu::Texture, data: &[u8], bytes_per_texel: u32) {
        let size = texture.size();
        self.queue.write_texture(
            texture.as_image_copy(),
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(size.width * bytes_per_texel),
                rows_per_image: Some(size.height),
            },
            size,
        );
    }

    /// Creates a color texture holding `image`. It can be bound as color, as
    /// debug output, or as both.
    pub fn upload_color(&self, image: &ColorImage) -> Result<TextureId, VrsError> {
        self.create_scene_texture(
            TextureKind::Color,
            image.width(),
            image.height(),
            &color_to_rgba8(image),
        )
    }

    /// Creates a depth texture holding `image`.
    pub fn upload_depth(&self, image: &DepthImage) -> Result<TextureId, VrsError> {
        self.create_scene_texture(
            TextureKind::Depth,
            image.width(),
            image.height(),
            bytemuck::cast_slice(&depth_to_unorm16(image)),
        )
    }

    /// Creates a velocity texture holding `image`.
    pub fn upload_velocity(&self, image: &VelocityImage) -> Result<TextureId, VrsError> {
        self.create_scene_texture(
            TextureKind::Velocity,
            image.width(),
            image.height(),
            velocity_to_rg32(image),
        )
    }

    /// Overwrites a color texture created by [`WgpuShadingDevice::upload_color`].
    pub fn write_color(&self, id: TextureId, image: &ColorImage) -> Result<(), VrsError> {
        let targets = SceneTargets::new(image.width(), image.height());
        let state = self.lock()?;
        let texture = state.texture(id, SceneInput::Color, &targets)?;
        self.write_texels(&texture.texture, &color_to_rgba8(image), 4);
        Ok(())
    }

    /// Copies a color texture back to the host.
    pub fn read_color(&self, id: TextureId) -> Result<ColorImage, VrsError> {
        let state = self.lock()?;
        let texture = &state
            .textures
            .get(&id)
            .filter(|t| t.kind == TextureKind::Color)
            .ok_or(VrsError::UnknownTexture {
                id,
                input: SceneInput::Color,
            })?
            .texture;
        let size = texture.size();
        let padded_row = padded_bytes_per_row(size.width, 4);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("VRS Color Readback"),
            size: u64::from(padded_row) * u64::from(size.height),
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("VRS Color Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(size.height),
                },
            },
            size,
        );
        self.queue.submit(Some(encoder.finish()));

        let bytes = self.map_read(&buffer)?;
        Ok(rgba8_to_color(&bytes, size.width, size.height, padded_row))
    }

    /// Maps `buffer`, blocking until every submitted command has completed.
    fn map_read(&self, buffer: &wgpu::Buffer) -> Result<Vec<u8>, VrsError> {
        let slice = buffer.slice(..);
        let (sender, receiver) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| VrsError::Readback(format!("device poll failed: {e}")))?;
        receiver
            .recv()
            .map_err(|_| VrsError::Readback("map callback dropped".to_string()))?
            .map_err(|e| VrsError::Readback(format!("buffer map failed: {e}")))?;

        let bytes = slice.get_mapped_range().to_vec();
        buffer.unmap();
        Ok(bytes)
    }

    fn pipeline(&self, pass: &RateMapPass) -> Result<Arc<PassPipeline>, VrsError> {
        let mut pipelines = self
            .pipelines
            .lock()
            .map_err(|_| VrsError::Backend("pipeline cache poisoned".to_string()))?;
        if let Some(pipeline) = pipelines.get(pass.label()) {
            return Ok(pipeline.clone());
        }

        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = create_pass_pipeline(&self.device, pass);
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(VrsError::Backend(format!(
                "failed to build {}: {error}",
                pass.label()
            )));
        }

        let pipeline = Arc::new(pipeline);
        pipelines.insert(pass.label(), pipeline.clone());
        Ok(pipeline)
    }

    fn create_map_buffer(&self, label: &str, size: u64, usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage,
            mapped_at_creation: false,
        })
    }
}

impl CapabilitySource for WgpuShadingDevice {
    fn query_shading_rate_support(&self) -> Result<ShadingRateSupport, VrsError> {
        Ok(self.support)
    }
}

impl ShadingRateDevice for WgpuShadingDevice {
    fn create_rate_map(&self, grid: TileGrid) -> Result<(), VrsError> {
        // wgpu zero-initializes buffers and code 0 is 1x1.
        let size = (grid.tile_count().max(1) * std::mem::size_of::<u32>()) as u64;
        let buffers = RateMapBuffers {
            grid,
            size,
            storage: self.create_map_buffer(
                "VRS Rate Map",
                size,
                wgpu::BufferUsages::STORAGE
                    | wgpu::BufferUsages::COPY_DST
                    | wgpu::BufferUsages::COPY_SRC,
            ),
            snapshot: self.create_map_buffer(
                "VRS Rate Map Snapshot",
                size,
                wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            ),
            staging: self.create_map_buffer(
                "VRS Rate Map Readback",
                size,
                wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            ),
        };
        log::debug!(
            "wgpu device: rate map {}x{} tiles ({} bytes)",
            grid.width,
            grid.height,
            size
        );

        let mut state = self.lock()?;
        state.rate_map = Some(buffers);
        state.map_state = RateMapState::Unordered;
        Ok(())
    }

    fn upload_rate_map(&self, map: &ShadingRateTileMap) -> Result<(), VrsError> {
        let state = self.lock()?;
        let buffers = state.expect_state(RateMapState::Unordered, "upload")?;
        if buffers.grid != map.grid() {
            return Err(VrsError::Backend(format!(
                "uploaded map covers {:?}, rate map is {:?}",
                map.grid(),
                buffers.grid
            )));
        }
        let words = codes_to_words(map.as_bytes());
        if !words.is_empty() {
            self.queue
                .write_buffer(&buffers.storage, 0, bytemuck::cast_slice(&words));
        }
        Ok(())
    }

    fn dispatch_rate_pass(
        &self,
        pass: &RateMapPass,
        targets: &SceneTargets,
    ) -> Result<(), VrsError> {
        let state = self.lock()?;
        let buffers = state.expect_state(RateMapState::Unordered, pass.label())?;
        let (tiles_x, tiles_y) = pass.workgroups();
        if (tiles_x, tiles_y) != (buffers.grid.width, buffers.grid.height) {
            return Err(VrsError::Backend(format!(
                "{} covers {tiles_x}x{tiles_y} tiles, rate map is {:?}",
                pass.label(),
                buffers.grid
            )));
        }

        let pipeline = self.pipeline(pass)?;
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(pass.label()),
            });

        if reads_snapshot(pass) {
            encoder.copy_buffer_to_buffer(&buffers.storage, 0, &buffers.snapshot, 0, buffers.size);
        }

        let output_id = pass.output().map(|input| targets.require(input)).transpose()?;
        let mut views = Vec::with_capacity(pass.inputs().len() + 1);
        for &input in pass.inputs() {
            let view = match (input, targets.get(input)) {
                (SceneInput::Velocity, None) => self
                    .zero_velocity
                    .create_view(&wgpu::TextureViewDescriptor::default()),
                (_, id) => {
                    let id = id.ok_or(VrsError::MissingSceneInput(input))?;
                    let texture = state.texture(id, input, targets)?;
                    if Some(id) == output_id {
                        // A texture cannot be sampled and written by one
                        // dispatch: read from a copy.
                        let scratch = self.device.create_texture(&wgpu::TextureDescriptor {
                            label: Some("VRS Aliased Color"),
                            size: texture.texture.size(),
                            mip_level_count: 1,
                            sample_count: 1,
                            dimension: wgpu::TextureDimension::D2,
                            format: COLOR_FORMAT,
                            usage: wgpu::TextureUsages::TEXTURE_BINDING
                                | wgpu::TextureUsages::COPY_DST,
                            view_formats: &[],
                        });
                        encoder.copy_texture_to_texture(
                            texture.texture.as_image_copy(),
                            scratch.as_image_copy(),
                            texture.texture.size(),
                        );
                        scratch.create_view(&wgpu::TextureViewDescriptor::default())
                    } else {
                        texture.view()
                    }
                }
            };
            views.push(view);
        }
        if let (Some(input), Some(id)) = (pass.output(), output_id) {
            views.push(state.texture(id, input, targets)?.view());
        }

        let uniforms = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("VRS Pass Uniforms"),
                contents: pass.uniform_bytes(),
                usage: wgpu::BufferUsages::UNIFORM,
            });

        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: buffers.storage.as_entire_binding(),
            },
        ];
        if reads_snapshot(pass) {
            entries.push(wgpu::BindGroupEntry {
                binding: 2,
                resource: buffers.snapshot.as_entire_binding(),
            });
        }
        let first = first_image_binding(pass);
        for (offset, view) in views.iter().enumerate() {
            entries.push(wgpu::BindGroupEntry {
                binding: first + offset as u32,
                resource: wgpu::BindingResource::TextureView(view),
            });
        }
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(pass.label()),
            layout: &pipeline.bind_group_layout,
            entries: &entries,
        });

        {
            let mut compute = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some(pass.label()),
                timestamp_writes: None,
            });
            compute.set_pipeline(&pipeline.pipeline);
            compute.set_bind_group(0, &bind_group, &[]);
            compute.dispatch_workgroups(tiles_x, tiles_y, 1);
        }
        self.queue.submit(Some(encoder.finish()));
        log::trace!("wgpu device: dispatched {}", pass.label());
        Ok(())
    }

    fn transition_rate_map(&self, to: RateMapState) -> Result<(), VrsError> {
        // wgpu inserts the barriers itself; the state only guards the call order.
        let mut state = self.lock()?;
        if state.rate_map.is_none() {
            return Err(VrsError::RateMapNotCreated);
        }
        log::trace!("wgpu device: rate map {:?} -> {to:?}", state.map_state);
        state.map_state = to;
        Ok(())
    }

    fn read_back_rate_map(&self) -> Result<ShadingRateTileMap, VrsError> {
        let state = self.lock()?;
        let buffers = state.expect_state(RateMapState::CopySource, "read back")?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("VRS Rate Map Readback Encoder"),
            });
        encoder.copy_buffer_to_buffer(&buffers.storage, 0, &buffers.staging, 0, buffers.size);
        self.queue.submit(Some(encoder.finish()));

        let bytes = self.map_read(&buffers.staging)?;
        Ok(ShadingRateTileMap::from_codes(
            buffers.grid,
            words_to_codes(&bytes),
        ))
    }

    fn bind_shading_rate(&self, binding: &ShadingRateBinding) -> Result<(), VrsError> {
        let mut state = self.lock()?;
        if binding.rate_image && state.rate_map.is_none() {
            return Err(VrsError::RateMapNotCreated);
        }
        log::trace!("wgpu device: shading rate binding {binding:?}");
        state.binding = *binding;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrs_core::renderer::FoveatedUniforms;
    use vrs_core::ShadingRate;

    // Returns None if no adapter is available, e.g. on CI without a GPU.
    fn create_test_device() -> Option<WgpuShadingDevice> {
        WgpuShadingDevice::new_headless(EMULATED_SUPPORT).ok()
    }

    #[test]
    fn test_upload_and_read_back_or_skip() {
        let Some(device) = create_test_device() else {
            println!("Skipping wgpu device test: could not create test device.");
            return;
        };
        let grid = TileGrid::new(5, 3);
        device.create_rate_map(grid).unwrap();
        let mut map = ShadingRateTileMap::new(grid);
        map.set(4, 2, ShadingRate::R4x4);
        map.set(0, 1, ShadingRate::R2x1);
        device.upload_rate_map(&map).unwrap();
        device
            .transition_rate_map(RateMapState::CopySource)
            .unwrap();
        assert_eq!(device.read_back_rate_map().unwrap(), map);
    }

    #[test]
    fn test_foveated_pass_or_skip() {
        let Some(device) = create_test_device() else {
            println!("Skipping wgpu device test: could not create test device.");
            return;
        };
        let grid = TileGrid::new(4, 4);
        device.create_rate_map(grid).unwrap();
        let pass = RateMapPass::Foveated(FoveatedUniforms {
            tiles_x: 4,
            tiles_y: 4,
            tile_size: 16,
            extended: 1,
            center_x: 0.0,
            center_y: 0.0,
            inner_radius: -1.0,
            outer_radius: 0.0,
        });
        device
            .dispatch_rate_pass(&pass, &SceneTargets::new(64, 64))
            .unwrap();
        device
            .transition_rate_map(RateMapState::CopySource)
            .unwrap();
        assert_eq!(
            device.read_back_rate_map().unwrap(),
            ShadingRateTileMap::filled(grid, ShadingRate::R4x4)
        );
    }

    #[test]
    fn test_state_rules_or_skip() {
        let Some(device) = create_test_device() else {
            println!("Skipping wgpu device test: could not create test device.");
            return;
        };
        assert!(matches!(
            device.read_back_rate_map(),
            Err(VrsError::RateMapNotCreated)
        ));
        device.create_rate_map(TileGrid::new(2, 2)).unwrap();
        assert!(matches!(
            device.read_back_rate_map(),
            Err(VrsError::Backend(_))
        ));
        assert_eq!(
            device.query_shading_rate_support().unwrap(),
            EMULATED_SUPPORT
        );
    }
}
