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

//! Parameter groups, one per generator mode.
//!
//! Numeric fields are private so every write goes through a clamping setter.

use super::range::ParamRange;
use super::DiagnosticView;
use serde::{Deserialize, Serialize};

/// Parameters of the foveated generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoveatedSettings {
    inner_radius: f32,
    outer_radius: f32,
    center_offset_x: f32,
    center_offset_y: f32,
    /// Recompute the center offset from the pointer every frame.
    pub track_pointer: bool,
}

impl FoveatedSettings {
    /// Radius of the full-rate disc, in tiles.
    pub const INNER_RADIUS: ParamRange = ParamRange::new("foveated.inner_radius", 0.0, 100.0, 30.0);
    /// Radius beyond which the coarsest rate applies, in tiles.
    pub const OUTER_RADIUS: ParamRange = ParamRange::new("foveated.outer_radius", 0.0, 100.0, 50.0);
    /// Horizontal offset of the focal point from the screen center, in tiles.
    pub const CENTER_OFFSET_X: ParamRange =
        ParamRange::new("foveated.center_offset_x", -100.0, 100.0, 0.0);
    /// Vertical offset of the focal point from the screen center, in tiles.
    pub const CENTER_OFFSET_Y: ParamRange =
        ParamRange::new("foveated.center_offset_y", -100.0, 100.0, 0.0);

    /// Inner radius in tiles.
    pub fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    /// Sets the inner radius, clamped.
    pub fn set_inner_radius(&mut self, value: f32) {
        self.inner_radius = Self::INNER_RADIUS.clamp(value);
    }

    /// Outer radius in tiles.
    pub fn outer_radius(&self) -> f32 {
        self.outer_radius
    }

    /// Sets the outer radius, clamped.
    pub fn set_outer_radius(&mut self, value: f32) {
        self.outer_radius = Self::OUTER_RADIUS.clamp(value);
    }

    /// `(x, y)` offset of the focal point in tiles.
    pub fn center_offset(&self) -> (f32, f32) {
        (self.center_offset_x, self.center_offset_y)
    }

    /// Sets the focal point offset, clamped per axis.
    pub fn set_center_offset(&mut self, x: f32, y: f32) {
        self.center_offset_x = Self::CENTER_OFFSET_X.clamp(x);
        self.center_offset_y = Self::CENTER_OFFSET_Y.clamp(y);
    }

    /// Sets the focal point offset from pointer tracking. Saturates silently,
    /// a pointer near the edge of a wide display is routinely out of range.
    pub fn set_tracked_center_offset(&mut self, x: f32, y: f32) {
        self.center_offset_x = Self::CENTER_OFFSET_X.saturate(x);
        self.center_offset_y = Self::CENTER_OFFSET_Y.saturate(y);
    }

    pub(crate) fn sanitize(&mut self) {
        self.set_inner_radius(self.inner_radius);
        self.set_outer_radius(self.outer_radius);
        self.set_center_offset(self.center_offset_x, self.center_offset_y);
    }
}

impl Default for FoveatedSettings {
    fn default() -> Self {
        Self {
            inner_radius: Self::INNER_RADIUS.default,
            outer_radius: Self::OUTER_RADIUS.default,
            center_offset_x: Self::CENTER_OFFSET_X.default,
            center_offset_y: Self::CENTER_OFFSET_Y.default,
            track_pointer: true,
        }
    }
}

/// Parameters of the depth level-of-detail generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthLodSettings {
    lod_near: f32,
    lod_far: f32,
    camera_near: f32,
    camera_far: f32,
}

impl DepthLodSettings {
    /// Normalized depth below which tiles stay at full rate.
    pub const LOD_NEAR: ParamRange = ParamRange::new("depth_lod.lod_near", 0.0, 1.0, 0.2);
    /// Normalized depth beyond which tiles get the coarsest rate.
    pub const LOD_FAR: ParamRange = ParamRange::new("depth_lod.lod_far", 0.0, 1.0, 0.5);
    /// Camera near clip distance.
    pub const CAMERA_NEAR: ParamRange = ParamRange::new("depth_lod.camera_near", 1.0, 10000.0, 1.0);
    /// Camera far clip distance.
    pub const CAMERA_FAR: ParamRange =
        ParamRange::new("depth_lod.camera_far", 1.0, 10000.0, 10000.0);

    /// `(lod_near, lod_far)`.
    pub fn lod_range(&self) -> (f32, f32) {
        (self.lod_near, self.lod_far)
    }

    /// Sets the normalized LOD band, clamped.
    pub fn set_lod_range(&mut self, near: f32, far: f32) {
        self.lod_near = Self::LOD_NEAR.clamp(near);
        self.lod_far = Self::LOD_FAR.clamp(far);
    }

    /// `(near, far)` camera clip distances.
    pub fn camera_clip(&self) -> (f32, f32) {
        (self.camera_near, self.camera_far)
    }

    /// Sets the camera clip distances, clamped. Normally fed from the camera
    /// collaborator every frame.
    pub fn set_camera_clip(&mut self, near: f32, far: f32) {
        self.camera_near = Self::CAMERA_NEAR.clamp(near);
        self.camera_far = Self::CAMERA_FAR.clamp(far);
    }

    pub(crate) fn sanitize(&mut self) {
        self.set_lod_range(self.lod_near, self.lod_far);
        self.set_camera_clip(self.camera_near, self.camera_far);
    }
}

impl Default for DepthLodSettings {
    fn default() -> Self {
        Self {
            lod_near: Self::LOD_NEAR.default,
            lod_far: Self::LOD_FAR.default,
            camera_near: Self::CAMERA_NEAR.default,
            camera_far: Self::CAMERA_FAR.default,
        }
    }
}

/// Parameters of the depth-of-field-linked generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthOfFieldSettings {
    /// Ask the depth-of-field pass for its low-quality rate map.
    pub low_quality: bool,
}

/// Parameters of the compute-diagnostic generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticSettings {
    /// What the pass paints into the debug output.
    pub view: DiagnosticView,
}

/// Parameters of the contrast-adaptive generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrastAdaptiveSettings {
    sensitivity_threshold: f32,
    quarter_rate_sensitivity: f32,
    environment_luma: f32,
    weber_fechner_constant: f32,
    /// Use the Weber-Fechner threshold instead of the linear one.
    pub use_weber_fechner: bool,
    /// Attenuate per-tile errors by the tile's motion.
    pub use_motion_vectors: bool,
    /// Recompute the sensitivity threshold from GPU frame time every frame.
    pub dynamic_threshold: bool,
    dynamic_target_fps: u32,
}

impl ContrastAdaptiveSettings {
    /// Just-noticeable-difference scale `τ`.
    pub const SENSITIVITY_THRESHOLD: ParamRange =
        ParamRange::new("contrast_adaptive.sensitivity_threshold", 0.0, 1.0, 0.15);
    /// Quarter-rate constant `K`.
    pub const QUARTER_RATE_SENSITIVITY: ParamRange =
        ParamRange::new("contrast_adaptive.quarter_rate_sensitivity", 0.0, 10.0, 2.13);
    /// Ambient luma added to tile averages.
    pub const ENVIRONMENT_LUMA: ParamRange =
        ParamRange::new("contrast_adaptive.environment_luma", 0.0, 10.0, 0.05);
    /// Weber-Fechner constant `c`.
    pub const WEBER_FECHNER_CONSTANT: ParamRange =
        ParamRange::new("contrast_adaptive.weber_fechner_constant", 0.0, 10.0, 1.0);
    /// Frame rate the dynamic threshold aims for.
    pub const DYNAMIC_TARGET_FPS: ParamRange =
        ParamRange::new("contrast_adaptive.dynamic_target_fps", 15.0, 60.0, 30.0);

    /// Sensitivity threshold `τ`.
    pub fn sensitivity_threshold(&self) -> f32 {
        self.sensitivity_threshold
    }

    /// Sets `τ`, clamped to [0, 1].
    pub fn set_sensitivity_threshold(&mut self, value: f32) {
        self.sensitivity_threshold = Self::SENSITIVITY_THRESHOLD.clamp(value);
    }

    /// Sets `τ` from the frame-time controller. Clamps without a notice since
    /// saturation is the expected steady state when the GPU is far over budget.
    pub fn set_dynamic_sensitivity_threshold(&mut self, value: f32) {
        self.sensitivity_threshold = Self::SENSITIVITY_THRESHOLD.saturate(value);
    }

    /// Quarter-rate constant `K`.
    pub fn quarter_rate_sensitivity(&self) -> f32 {
        self.quarter_rate_sensitivity
    }

    /// Sets `K`, clamped.
    pub fn set_quarter_rate_sensitivity(&mut self, value: f32) {
        self.quarter_rate_sensitivity = Self::QUARTER_RATE_SENSITIVITY.clamp(value);
    }

    /// Ambient luma.
    pub fn environment_luma(&self) -> f32 {
        self.environment_luma
    }

    /// Sets the ambient luma, clamped.
    pub fn set_environment_luma(&mut self, value: f32) {
        self.environment_luma = Self::ENVIRONMENT_LUMA.clamp(value);
    }

    /// Weber-Fechner constant `c`.
    pub fn weber_fechner_constant(&self) -> f32 {
        self.weber_fechner_constant
    }

    /// Sets `c`, clamped.
    pub fn set_weber_fechner_constant(&mut self, value: f32) {
        self.weber_fechner_constant = Self::WEBER_FECHNER_CONSTANT.clamp(value);
    }

    /// Frame rate targeted by the dynamic threshold.
    pub fn dynamic_target_fps(&self) -> u32 {
        self.dynamic_target_fps
    }

    /// Sets the target frame rate, clamped to [15, 60].
    pub fn set_dynamic_target_fps(&mut self, fps: u32) {
        self.dynamic_target_fps = Self::DYNAMIC_TARGET_FPS.clamp(fps as f32) as u32;
    }

    /// Frame time matching the target frame rate, in milliseconds.
    pub fn target_frame_time_ms(&self) -> f32 {
        1000.0 / self.dynamic_target_fps.max(1) as f32
    }

    pub(crate) fn sanitize(&mut self) {
        self.set_sensitivity_threshold(self.sensitivity_threshold);
        self.set_quarter_rate_sensitivity(self.quarter_rate_sensitivity);
        self.set_environment_luma(self.environment_luma);
        self.set_weber_fechner_constant(self.weber_fechner_constant);
        self.set_dynamic_target_fps(self.dynamic_target_fps);
    }
}

impl Default for ContrastAdaptiveSettings {
    fn default() -> Self {
        Self {
            sensitivity_threshold: Self::SENSITIVITY_THRESHOLD.default,
            quarter_rate_sensitivity: Self::QUARTER_RATE_SENSITIVITY.default,
            environment_luma: Self::ENVIRONMENT_LUMA.default,
            weber_fechner_constant: Self::WEBER_FECHNER_CONSTANT.default,
            use_weber_fechner: false,
            use_motion_vectors: false,
            dynamic_threshold: false,
            dynamic_target_fps: Self::DYNAMIC_TARGET_FPS.default as u32,
        }
    }
}

/// Debug overlay toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOverlaySettings {
    /// Draw the overlay at all.
    pub enabled: bool,
    /// Blend the tint over the frame instead of replacing it.
    pub blend_mask: bool,
    /// Draw tile borders.
    pub draw_grid: bool,
}

impl Default for DebugOverlaySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            blend_mask: true,
            draw_grid: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foveated_defaults_and_clamps() {
        let mut fov = FoveatedSettings::default();
        assert_eq!(fov.inner_radius(), 30.0);
        assert_eq!(fov.outer_radius(), 50.0);
        assert!(fov.track_pointer);
        fov.set_inner_radius(-3.0);
        fov.set_outer_radius(1e9);
        fov.set_center_offset(-500.0, 12.5);
        assert_eq!(fov.inner_radius(), 0.0);
        assert_eq!(fov.outer_radius(), 100.0);
        assert_eq!(fov.center_offset(), (-100.0, 12.5));
    }

    #[test]
    fn test_contrast_adaptive_defaults() {
        let ca = ContrastAdaptiveSettings::default();
        assert_eq!(ca.sensitivity_threshold(), 0.15);
        assert_eq!(ca.quarter_rate_sensitivity(), 2.13);
        assert_eq!(ca.environment_luma(), 0.05);
        assert_eq!(ca.weber_fechner_constant(), 1.0);
        assert_eq!(ca.dynamic_target_fps(), 30);
        assert!(!ca.use_weber_fechner && !ca.use_motion_vectors && !ca.dynamic_threshold);
    }

    #[test]
    fn test_target_fps_clamp() {
        let mut ca = ContrastAdaptiveSettings::default();
        ca.set_dynamic_target_fps(500);
        assert_eq!(ca.dynamic_target_fps(), 60);
        ca.set_dynamic_target_fps(0);
        assert_eq!(ca.dynamic_target_fps(), 15);
        approx::assert_relative_eq!(ca.target_frame_time_ms(), 1000.0 / 15.0);
    }

    #[test]
    fn test_dynamic_threshold_saturates() {
        let mut ca = ContrastAdaptiveSettings::default();
        ca.set_dynamic_sensitivity_threshold(37.0);
        assert_eq!(ca.sensitivity_threshold(), 1.0);
        ca.set_dynamic_sensitivity_threshold(f32::NAN);
        assert_eq!(ca.sensitivity_threshold(), 0.15);
    }

    #[test]
    fn test_depth_lod_defaults() {
        let lod = DepthLodSettings::default();
        assert_eq!(lod.lod_range(), (0.2, 0.5));
        assert_eq!(lod.camera_clip(), (1.0, 10000.0));
    }
}
