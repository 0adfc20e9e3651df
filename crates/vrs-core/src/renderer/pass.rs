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

//! Compute passes over the rate map and their uniform blocks.
//!
//! Every uniform block is `#[repr(C)]`, `Pod`, and padded to a multiple of 16
//! bytes so it can be uploaded verbatim into a WGSL `var<uniform>`.

use super::device::SceneInput;
use bytemuck::{Pod, Zeroable};

/// Uniforms of the foveated pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FoveatedUniforms {
    /// Tile columns.
    pub tiles_x: u32,
    /// Tile rows.
    pub tiles_y: u32,
    /// Tile size in pixels.
    pub tile_size: u32,
    /// Non-zero when extended rates may be written.
    pub extended: u32,
    /// Focal point, in tiles.
    pub center_x: f32,
    /// Focal point, in tiles.
    pub center_y: f32,
    /// Radius of the full-rate disc, in tiles.
    pub inner_radius: f32,
    /// Radius beyond which the coarsest rate applies, in tiles.
    pub outer_radius: f32,
}

/// Uniforms of the depth level-of-detail pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DepthLodUniforms {
    /// Tile columns.
    pub tiles_x: u32,
    /// Tile rows.
    pub tiles_y: u32,
    /// Tile size in pixels.
    pub tile_size: u32,
    /// Non-zero when extended rates may be written.
    pub extended: u32,
    /// Render target width in pixels.
    pub target_width: u32,
    /// Render target height in pixels.
    pub target_height: u32,
    /// Padding.
    pub _pad: [u32; 2],
    /// Camera near clip distance.
    pub camera_near: f32,
    /// Camera far clip distance.
    pub camera_far: f32,
    /// Normalized depth below which tiles stay at full rate.
    pub lod_near: f32,
    /// Normalized depth beyond which tiles get the coarsest rate.
    pub lod_far: f32,
}

/// Uniforms of the contrast-adaptive pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ContrastAdaptiveUniforms {
    /// Tile columns.
    pub tiles_x: u32,
    /// Tile rows.
    pub tiles_y: u32,
    /// Tile size in pixels.
    pub tile_size: u32,
    /// Non-zero when extended rates may be written.
    pub extended: u32,
    /// Render target width in pixels.
    pub target_width: u32,
    /// Render target height in pixels.
    pub target_height: u32,
    /// Non-zero to use the Weber-Fechner threshold.
    pub use_weber_fechner: u32,
    /// Non-zero to attenuate errors by tile motion.
    pub use_motion_vectors: u32,
    /// Just-noticeable-difference scale `τ`.
    pub sensitivity_threshold: f32,
    /// Quarter-rate constant `K`.
    pub quarter_rate_sensitivity: f32,
    /// Ambient luma added to the tile average.
    pub environment_luma: f32,
    /// Weber-Fechner constant `c`.
    pub weber_fechner_constant: f32,
    /// Error attenuation per pixel of motion.
    pub motion_error_falloff: f32,
    /// Padding.
    pub _pad: [f32; 3],
}

/// Uniforms of the compute-diagnostic pass.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DiagnosticUniforms {
    /// Tile columns.
    pub tiles_x: u32,
    /// Tile rows.
    pub tiles_y: u32,
    /// Tile size in pixels.
    pub tile_size: u32,
    /// Index of the diagnostic view.
    pub view: u32,
    /// Render target width in pixels.
    pub target_width: u32,
    /// Render target height in pixels.
    pub target_height: u32,
    /// Non-zero to darken tile borders.
    pub draw_grid: u32,
    /// Padding.
    pub _pad: u32,
}

/// Neighborhood used by the single-elimination post-filter.
pub const NEIGHBORHOOD_VON_NEUMANN: u32 = 0;
/// Neighborhood used by the single-elimination post-filter.
pub const NEIGHBORHOOD_MOORE: u32 = 1;

/// Uniforms of the single-elimination post-filter.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FilterUniforms {
    /// Tile columns.
    pub tiles_x: u32,
    /// Tile rows.
    pub tiles_y: u32,
    /// [`NEIGHBORHOOD_VON_NEUMANN`] or [`NEIGHBORHOOD_MOORE`].
    pub neighborhood: u32,
    /// Padding.
    pub _pad: u32,
}

/// Uniforms of the debug overlay.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct OverlayUniforms {
    /// Tile columns.
    pub tiles_x: u32,
    /// Tile rows.
    pub tiles_y: u32,
    /// Tile size in pixels.
    pub tile_size: u32,
    /// Non-zero to alpha-blend the tint, zero to replace the pixel.
    pub blend_mask: u32,
    /// Non-zero to draw tile borders.
    pub draw_grid: u32,
    /// Render target width in pixels.
    pub target_width: u32,
    /// Render target height in pixels.
    pub target_height: u32,
    /// Padding.
    pub _pad: u32,
}

/// One compute pass over the rate map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateMapPass {
    /// Distance-from-focal-point falloff.
    Foveated(FoveatedUniforms),
    /// Linearized scene depth mapped onto the rate ladder.
    DepthLod(DepthLodUniforms),
    /// Per-tile luma error analysis.
    ContrastAdaptive(ContrastAdaptiveUniforms),
    /// Engineering visualization; forces full rate.
    Diagnostic(DiagnosticUniforms),
    /// Isolated coarse-tile removal.
    SingleElimination(FilterUniforms),
    /// Rate tint over the debug output.
    DebugOverlay(OverlayUniforms),
}

impl RateMapPass {
    /// Label used for pipelines and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            RateMapPass::Foveated(_) => "vrs_foveated",
            RateMapPass::DepthLod(_) => "vrs_depth_lod",
            RateMapPass::ContrastAdaptive(_) => "vrs_contrast_adaptive",
            RateMapPass::Diagnostic(_) => "vrs_diagnostic",
            RateMapPass::SingleElimination(_) => "vrs_single_elimination",
            RateMapPass::DebugOverlay(_) => "vrs_debug_overlay",
        }
    }

    /// The uniform block as bytes.
    pub fn uniform_bytes(&self) -> &[u8] {
        match self {
            RateMapPass::Foveated(u) => bytemuck::bytes_of(u),
            RateMapPass::DepthLod(u) => bytemuck::bytes_of(u),
            RateMapPass::ContrastAdaptive(u) => bytemuck::bytes_of(u),
            RateMapPass::Diagnostic(u) => bytemuck::bytes_of(u),
            RateMapPass::SingleElimination(u) => bytemuck::bytes_of(u),
            RateMapPass::DebugOverlay(u) => bytemuck::bytes_of(u),
        }
    }

    /// Work-group count: one work-group per tile.
    pub fn workgroups(&self) -> (u32, u32) {
        match self {
            RateMapPass::Foveated(u) => (u.tiles_x, u.tiles_y),
            RateMapPass::DepthLod(u) => (u.tiles_x, u.tiles_y),
            RateMapPass::ContrastAdaptive(u) => (u.tiles_x, u.tiles_y),
            RateMapPass::Diagnostic(u) => (u.tiles_x, u.tiles_y),
            RateMapPass::SingleElimination(u) => (u.tiles_x, u.tiles_y),
            RateMapPass::DebugOverlay(u) => (u.tiles_x, u.tiles_y),
        }
    }

    /// Scene images the pass reads, in binding order after the rate map.
    ///
    /// [`SceneInput::Velocity`] is optional: devices substitute zero motion
    /// when it is not bound.
    pub fn inputs(&self) -> &'static [SceneInput] {
        match self {
            RateMapPass::Foveated(_) | RateMapPass::SingleElimination(_) => &[],
            RateMapPass::DepthLod(_) => &[SceneInput::Depth],
            RateMapPass::ContrastAdaptive(_) | RateMapPass::Diagnostic(_) => {
                &[SceneInput::Color, SceneInput::Velocity]
            }
            RateMapPass::DebugOverlay(_) => &[SceneInput::Color],
        }
    }

    /// The image the pass writes besides the rate map, if any.
    pub fn output(&self) -> Option<SceneInput> {
        match self {
            RateMapPass::Diagnostic(_) | RateMapPass::DebugOverlay(_) => {
                Some(SceneInput::DebugOutput)
            }
            _ => None,
        }
    }
}
