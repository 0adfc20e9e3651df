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

//! Host implementations of the rate-map compute passes.
//!
//! Each kernel consumes the same uniform block as its WGSL counterpart and
//! applies the same per-tile decision. [`run_pass`] dispatches a
//! [`RateMapPass`] onto them.

mod contrast;
mod depth_lod;
mod diagnostic;
mod foveated;
mod overlay;
mod single_elimination;

pub use contrast::*;
pub use depth_lod::*;
pub use diagnostic::*;
pub use foveated::*;
pub use overlay::*;
pub use single_elimination::*;

use vrs_core::renderer::{
    ColorImage, DepthImage, RateMapPass, SceneInput, VelocityImage, VrsError,
};
use vrs_core::{RateLadder, ShadingRate, ShadingRateTileMap, TileGrid};

/// Failure of a host kernel.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// A scene image required by the pass was not supplied.
    #[error("pass needs the {0:?} image")]
    MissingInput(SceneInput),
    /// A scene image does not cover the pass's render target.
    #[error("{input:?} image is {actual:?}, pass expects {expected:?}")]
    ExtentMismatch {
        /// Which image.
        input: SceneInput,
        /// Target extent of the pass.
        expected: (u32, u32),
        /// Extent of the supplied image.
        actual: (u32, u32),
    },
    /// The rate map does not have the grid the pass was built for.
    #[error("rate map is {actual:?}, pass expects {expected:?}")]
    GridMismatch {
        /// Grid of the pass.
        expected: TileGrid,
        /// Grid of the rate map.
        actual: TileGrid,
    },
}

impl From<KernelError> for VrsError {
    fn from(e: KernelError) -> Self {
        match e {
            KernelError::MissingInput(input) => VrsError::MissingSceneInput(input),
            KernelError::ExtentMismatch {
                input,
                expected,
                actual,
            } => VrsError::ExtentMismatch {
                input,
                expected,
                actual,
            },
            other => VrsError::Backend(other.to_string()),
        }
    }
}

/// Scene images available to a pass.
#[derive(Debug, Default)]
pub struct PassImages<'a> {
    /// Color target.
    pub color: Option<&'a ColorImage>,
    /// Depth buffer.
    pub depth: Option<&'a DepthImage>,
    /// Velocity buffer. Absent means zero motion.
    pub velocity: Option<&'a VelocityImage>,
    /// Debug output image.
    pub output: Option<&'a mut ColorImage>,
}

/// Executes `pass` on the host.
pub fn run_pass(
    pass: &RateMapPass,
    map: &mut ShadingRateTileMap,
    images: PassImages<'_>,
) -> Result<(), KernelError> {
    let (tiles_x, tiles_y) = pass.workgroups();
    check_grid(map, TileGrid::new(tiles_x, tiles_y))?;

    match pass {
        RateMapPass::Foveated(u) => {
            foveated(map, u);
            Ok(())
        }
        RateMapPass::DepthLod(u) => {
            let depth = images.depth.ok_or(KernelError::MissingInput(SceneInput::Depth))?;
            depth_lod(map, depth, u)
        }
        RateMapPass::ContrastAdaptive(u) => {
            let color = images.color.ok_or(KernelError::MissingInput(SceneInput::Color))?;
            contrast_adaptive(map, color, images.velocity, u)
        }
        RateMapPass::Diagnostic(u) => {
            let color = images.color.ok_or(KernelError::MissingInput(SceneInput::Color))?;
            let output = images
                .output
                .ok_or(KernelError::MissingInput(SceneInput::DebugOutput))?;
            diagnostic(map, color, images.velocity, output, u)
        }
        RateMapPass::SingleElimination(u) => {
            single_elimination(map, u);
            Ok(())
        }
        RateMapPass::DebugOverlay(u) => {
            let color = images.color.ok_or(KernelError::MissingInput(SceneInput::Color))?;
            let output = images
                .output
                .ok_or(KernelError::MissingInput(SceneInput::DebugOutput))?;
            debug_overlay(map, color, output, u)
        }
    }
}

fn check_grid(map: &ShadingRateTileMap, expected: TileGrid) -> Result<(), KernelError> {
    if map.grid() == expected {
        Ok(())
    } else {
        Err(KernelError::GridMismatch {
            expected,
            actual: map.grid(),
        })
    }
}

pub(crate) fn check_extent(
    input: SceneInput,
    actual: (u32, u32),
    expected: (u32, u32),
) -> Result<(), KernelError> {
    if actual == expected {
        Ok(())
    } else {
        Err(KernelError::ExtentMismatch {
            input,
            expected,
            actual,
        })
    }
}

/// Maps `value` inside the band `[start, end]` onto `ladder`.
///
/// At or below `start` gives 1x1, at or beyond `end` the coarsest rung. An
/// empty band (`end <= start`) is a hard step at `start`.
pub fn band_rate(value: f32, start: f32, end: f32, ladder: RateLadder) -> ShadingRate {
    // `!(a > b)` also catches NaN.
    if !(value > start) {
        ladder.sample(0.0)
    } else if value >= end {
        ladder.coarsest()
    } else {
        ladder.sample((value - start) / (end - start))
    }
}

/// Pixel rectangle `[x0, x1) x [y0, y1)` covered by tile `(tx, ty)`, cut at
/// the target edge.
pub(crate) fn tile_pixels(
    tx: u32,
    ty: u32,
    tile_size: u32,
    width: u32,
    height: u32,
) -> (u32, u32, u32, u32) {
    let x0 = tx * tile_size;
    let y0 = ty * tile_size;
    (
        x0.min(width),
        y0.min(height),
        (x0 + tile_size).min(width),
        (y0 + tile_size).min(height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrs_core::renderer::FilterUniforms;

    #[test]
    fn test_band_rate_edges() {
        let ladder = RateLadder::new(true);
        assert_eq!(band_rate(10.0, 30.0, 50.0, ladder), ShadingRate::R1x1);
        assert_eq!(band_rate(30.0, 30.0, 50.0, ladder), ShadingRate::R1x1);
        assert_eq!(band_rate(50.0, 30.0, 50.0, ladder), ShadingRate::R4x4);
        assert_eq!(band_rate(40.0, 30.0, 50.0, ladder), ShadingRate::R2x2);
        assert_eq!(band_rate(31.0, 40.0, 20.0, ladder), ShadingRate::R1x1);
        assert_eq!(band_rate(41.0, 40.0, 20.0, ladder), ShadingRate::R4x4);
        assert_eq!(band_rate(f32::NAN, 0.0, 1.0, ladder), ShadingRate::R1x1);
    }

    #[test]
    fn test_tile_pixels_clip_at_edge() {
        assert_eq!(tile_pixels(0, 0, 16, 100, 40), (0, 0, 16, 16));
        assert_eq!(tile_pixels(6, 2, 16, 100, 40), (96, 32, 100, 40));
    }

    #[test]
    fn test_run_pass_rejects_wrong_grid() {
        let mut map = ShadingRateTileMap::new(TileGrid::new(4, 4));
        let pass = RateMapPass::SingleElimination(FilterUniforms {
            tiles_x: 5,
            tiles_y: 4,
            neighborhood: 0,
            _pad: 0,
        });
        let err = run_pass(&pass, &mut map, PassImages::default()).unwrap_err();
        assert!(matches!(err, KernelError::GridMismatch { .. }));
    }
}
