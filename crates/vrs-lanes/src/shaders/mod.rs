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

//! WGSL sources of the rate-map compute passes.
//!
//! Every pass binds its uniform block at binding 0 and the rate map, one
//! `u32` code per tile, at binding 1. Scene images follow in the order
//! given by [`RateMapPass::inputs`](vrs_core::renderer::RateMapPass::inputs),
//! then the debug output if the pass has one.

use vrs_core::renderer::RateMapPass;

/// Foveated falloff.
pub const FOVEATED_WGSL: &str = include_str!("foveated.wgsl");

/// Depth level of detail.
pub const DEPTH_LOD_WGSL: &str = include_str!("depth_lod.wgsl");

/// Contrast-adaptive shading.
pub const CONTRAST_ADAPTIVE_WGSL: &str = include_str!("contrast_adaptive.wgsl");

/// Compute diagnostic views.
pub const DIAGNOSTIC_WGSL: &str = include_str!("diagnostic.wgsl");

/// Single-tile elimination post-filter.
pub const SINGLE_ELIMINATION_WGSL: &str = include_str!("single_elimination.wgsl");

/// Rate tint overlay.
pub const DEBUG_OVERLAY_WGSL: &str = include_str!("debug_overlay.wgsl");

/// Entry point shared by every pass.
pub const ENTRY_POINT: &str = "main";

/// The WGSL source implementing `pass`.
pub fn shader_source(pass: &RateMapPass) -> &'static str {
    match pass {
        RateMapPass::Foveated(_) => FOVEATED_WGSL,
        RateMapPass::DepthLod(_) => DEPTH_LOD_WGSL,
        RateMapPass::ContrastAdaptive(_) => CONTRAST_ADAPTIVE_WGSL,
        RateMapPass::Diagnostic(_) => DIAGNOSTIC_WGSL,
        RateMapPass::SingleElimination(_) => SINGLE_ELIMINATION_WGSL,
        RateMapPass::DebugOverlay(_) => DEBUG_OVERLAY_WGSL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [&str; 6] = [
        FOVEATED_WGSL,
        DEPTH_LOD_WGSL,
        CONTRAST_ADAPTIVE_WGSL,
        DIAGNOSTIC_WGSL,
        SINGLE_ELIMINATION_WGSL,
        DEBUG_OVERLAY_WGSL,
    ];

    #[test]
    fn test_every_shader_has_compute_entry() {
        for source in ALL {
            assert!(source.contains("@compute"));
            assert!(source.contains("fn main("));
        }
    }

    #[test]
    fn test_every_shader_binds_uniforms_and_rate_map() {
        for source in ALL {
            assert!(source.contains("@binding(0) var<uniform>"));
            assert!(source.contains("@binding(1) var<storage"));
            assert!(source.contains("rate_map"));
        }
    }

    #[test]
    fn test_image_passes_bind_their_textures() {
        assert!(DEPTH_LOD_WGSL.contains("texture_depth_2d"));
        assert!(CONTRAST_ADAPTIVE_WGSL.contains("@binding(3) var velocity_texture"));
        assert!(DIAGNOSTIC_WGSL.contains("@binding(4) var output_texture"));
        assert!(DEBUG_OVERLAY_WGSL.contains("@binding(3) var output_texture"));
        assert!(SINGLE_ELIMINATION_WGSL.contains("@binding(2) var<storage, read> snapshot"));
    }
}
