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


use std::borrow::Cow;

use vrs_core::renderer::{RateMapPass, SceneInput};
use vrs_lanes::shaders::{shader_source, ENTRY_POINT};

use super::conversions::COLOR_FORMAT;

/// A compiled rate-map pass.
#[derive(Debug)]
pub(crate) struct PassPipeline {
    pub(crate) pipeline: wgpu::ComputePipeline,
    pub(crate) bind_group_layout: wgpu::BindGroupLayout,
}

/// Whether the pass binds a copy of the rate map taken before it runs.
pub(crate) fn reads_snapshot(pass: &RateMapPass) -> bool {
    matches!(pass, RateMapPass::SingleElimination(_))
}

/// First binding slot after the uniform block, the rate map and the snapshot.
pub(crate) fn first_image_binding(pass: &RateMapPass) -> u32 {
    if reads_snapshot(pass) {
        3
    } else {
        2
    }
}

fn compute_entry(binding: u32, ty: wgpu::BindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty,
        count: None,
    }
}

fn storage_buffer(read_only: bool) -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Storage { read_only },
        has_dynamic_offset: false,
        min_binding_size: None,
    }
}

fn sampled_texture(input: SceneInput) -> wgpu::BindingType {
    let sample_type = match input {
        SceneInput::Depth => wgpu::TextureSampleType::Depth,
        _ => wgpu::TextureSampleType::Float { filterable: false },
    };
    wgpu::BindingType::Texture {
        sample_type,
        view_dimension: wgpu::TextureViewDimension::D2,
        multisampled: false,
    }
}

/// Bind group layout of `pass`, in the order the WGSL sources declare it.
pub(crate) fn layout_entries(pass: &RateMapPass) -> Vec<wgpu::BindGroupLayoutEntry> {
    let overlay = matches!(pass, RateMapPass::DebugOverlay(_));
    let mut entries = vec![
        compute_entry(
            0,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
        ),
        // The overlay only reads the map.
        compute_entry(1, storage_buffer(overlay)),
    ];
    if reads_snapshot(pass) {
        entries.push(compute_entry(2, storage_buffer(true)));
    }

    let mut binding = first_image_binding(pass);
    for input in pass.inputs() {
        entries.push(compute_entry(binding, sampled_texture(*input)));
        binding += 1;
    }
    if pass.output().is_some() {
        entries.push(compute_entry(
            binding,
            wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::WriteOnly,
                format: COLOR_FORMAT,
                view_dimension: wgpu::TextureViewDimension::D2,
            },
        ));
    }
    entries
}

/// Compiles the WGSL source of `pass`.
pub(crate) fn create_pass_pipeline(device: &wgpu::Device, pass: &RateMapPass) -> PassPipeline {
    let label = Some(pass.label());
    log::debug!("Compiling rate-map pipeline {}", pass.label());

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label,
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(shader_source(pass))),
    });
    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label,
        entries: &layout_entries(pass),
    });
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label,
        bind_group_layouts: &[&bind_group_layout],
        push_constant_ranges: &[],
    });
    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label,
        layout: Some(&layout),
        module: &module,
        entry_point: Some(ENTRY_POINT),
        compilation_options: Default::default(),
        cache: None,
    });

    PassPipeline {
        pipeline,
        bind_group_layout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrs_core::renderer::{DiagnosticUniforms, FilterUniforms, OverlayUniforms};

    fn bindings(pass: &RateMapPass) -> Vec<u32> {
        layout_entries(pass).iter().map(|e| e.binding).collect()
    }

    #[test]
    fn test_filter_binds_snapshot() {
        let pass = RateMapPass::SingleElimination(FilterUniforms {
            tiles_x: 1,
            tiles_y: 1,
            neighborhood: 0,
            _pad: 0,
        });
        assert_eq!(bindings(&pass), vec![0, 1, 2]);
        assert!(matches!(
            layout_entries(&pass)[2].ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                ..
            }
        ));
    }

    #[test]
    fn test_image_passes_follow_input_order() {
        let diagnostic = RateMapPass::Diagnostic(DiagnosticUniforms {
            tiles_x: 1,
            tiles_y: 1,
            tile_size: 8,
            view: 0,
            target_width: 8,
            target_height: 8,
            draw_grid: 0,
            _pad: 0,
        });
        assert_eq!(bindings(&diagnostic), vec![0, 1, 2, 3, 4]);
        assert!(matches!(
            layout_entries(&diagnostic)[4].ty,
            wgpu::BindingType::StorageTexture { .. }
        ));

        let overlay = RateMapPass::DebugOverlay(OverlayUniforms {
            tiles_x: 1,
            tiles_y: 1,
            tile_size: 8,
            blend_mask: 1,
            draw_grid: 0,
            target_width: 8,
            target_height: 8,
            _pad: 0,
        });
        let entries = layout_entries(&overlay);
        assert_eq!(bindings(&overlay), vec![0, 1, 2, 3]);
        assert!(matches!(
            entries[1].ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: true },
                ..
            }
        ));
    }
}
