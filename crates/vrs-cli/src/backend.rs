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


//! Device selection for the command line driver.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use vrs_core::renderer::{ColorImage, SceneTargets, ShadingRateDevice, TextureId};
use vrs_core::{ShadingRateSupport, ShadingRateTier};
use vrs_infra::shading::wgpu::EMULATED_SUPPORT;
use vrs_infra::{SoftwareShadingDevice, WgpuShadingDevice};

use crate::scene::SyntheticScene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Host kernels, no GPU needed.
    Software,
    /// WGSL compute passes on the default wgpu adapter.
    Wgpu,
}

/// The device a run renders on.
#[derive(Debug, Clone)]
pub enum Backend {
    Software(Arc<SoftwareShadingDevice>),
    Wgpu(Arc<WgpuShadingDevice>),
}

impl Backend {
    pub fn create(kind: BackendKind, tile_size: u32, tier: ShadingRateTier) -> Result<Self> {
        let support = ShadingRateSupport {
            tier,
            tile_size,
            ..EMULATED_SUPPORT
        };
        Ok(match kind {
            BackendKind::Software => {
                Backend::Software(Arc::new(SoftwareShadingDevice::new(support)))
            }
            BackendKind::Wgpu => Backend::Wgpu(Arc::new(
                WgpuShadingDevice::new_headless(support)
                    .context("Failed to create the wgpu device")?,
            )),
        })
    }

    pub fn device(&self) -> Arc<dyn ShadingRateDevice> {
        match self {
            Backend::Software(device) => device.clone(),
            Backend::Wgpu(device) => device.clone(),
        }
    }

    /// Uploads the scene and binds every input, with a dedicated debug output.
    pub fn register_scene(&self, scene: &SyntheticScene) -> Result<SceneTargets> {
        let mut targets = SceneTargets::new(scene.width(), scene.height());
        let blank = ColorImage::new(scene.width(), scene.height());
        match self {
            Backend::Software(device) => {
                targets.color = Some(device.register_color(scene.color.clone())?);
                targets.depth = Some(device.register_depth(scene.depth.clone())?);
                targets.velocity = Some(device.register_velocity(scene.velocity.clone())?);
                targets.debug_output = Some(device.register_color(blank)?);
            }
            Backend::Wgpu(device) => {
                targets.color = Some(device.upload_color(&scene.color)?);
                targets.depth = Some(device.upload_depth(&scene.depth)?);
                targets.velocity = Some(device.upload_velocity(&scene.velocity)?);
                targets.debug_output = Some(device.upload_color(&blank)?);
            }
        }
        Ok(targets)
    }

    /// Copies a color image back to the host.
    pub fn read_color(&self, id: TextureId) -> Result<ColorImage> {
        match self {
            Backend::Software(device) => device
                .color_image(id)
                .with_context(|| format!("No color image {id:?} on the software device")),
            Backend::Wgpu(device) => Ok(device.read_color(id)?),
        }
    }
}
