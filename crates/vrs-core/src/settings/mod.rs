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

//! Mode configuration.
//!
//! [`VrsSettings`] is the single configuration object handed to every
//! generator. Parameters are grouped per mode so one mode's tuning never
//! leaks into another's, and every numeric parameter has a declared
//! [`ParamRange`] that setters clamp to.

mod modes;
mod names;
mod overrides;
mod range;

pub use modes::*;
pub use names::*;
pub use overrides::*;
pub use range::*;

use crate::capability::VrsCapabilities;
use crate::rate::{CombinerPair, ShadingRate};
use crate::renderer::VrsError;
use serde::{Deserialize, Serialize};

/// The rate-map generator algorithm.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShadingMode {
    /// Fixed four-quadrant reference pattern, generated on the CPU.
    Quadrant,
    /// Alternating 1x1 / 2x2 reference pattern, generated on the CPU.
    Checkerboard,
    /// Distance falloff from a focal point.
    Foveated,
    /// Scene depth mapped onto the rate ladder.
    DepthLod,
    /// Rate map supplied by the depth-of-field post-process.
    DepthOfField,
    /// Engineering visualization, full rate.
    ComputeDiagnostic,
    /// Per-tile luma error analysis.
    #[default]
    ContrastAdaptive,
}

impl ShadingMode {
    /// All modes, in menu order.
    pub const ALL: [ShadingMode; 7] = [
        ShadingMode::Quadrant,
        ShadingMode::Checkerboard,
        ShadingMode::Foveated,
        ShadingMode::DepthLod,
        ShadingMode::DepthOfField,
        ShadingMode::ComputeDiagnostic,
        ShadingMode::ContrastAdaptive,
    ];

    /// Whether the map is synthesized on the host and uploaded.
    pub fn is_cpu(self) -> bool {
        matches!(self, ShadingMode::Quadrant | ShadingMode::Checkerboard)
    }

    /// Strategy name of the lane implementing this mode.
    pub fn strategy_name(self) -> &'static str {
        match self {
            ShadingMode::Quadrant => "Quadrant",
            ShadingMode::Checkerboard => "Checkerboard",
            ShadingMode::Foveated => "Foveated",
            ShadingMode::DepthLod => "DepthLod",
            ShadingMode::DepthOfField => "DepthOfField",
            ShadingMode::ComputeDiagnostic => "ComputeDiagnostic",
            ShadingMode::ContrastAdaptive => "ContrastAdaptive",
        }
    }
}

/// What the compute-diagnostic pass paints into the debug output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum DiagnosticView {
    /// The color target, unchanged.
    #[default]
    TargetColor = 0,
    /// Work-group coordinates.
    GroupId = 1,
    /// Flattened thread index inside the work-group.
    GroupIndex = 2,
    /// Thread coordinates inside the work-group.
    GroupThreadId = 3,
    /// Global pixel coordinates.
    DispatchThreadId = 4,
    /// Motion magnitude.
    Velocity = 5,
    /// Rec.709 luma.
    Luma = 6,
    /// Log-compressed luma.
    LogLuma = 7,
    /// Average luma of the tile.
    AverageTileLuma = 8,
    /// Horizontal half-rate error.
    MseLumaX = 9,
    /// Vertical half-rate error.
    MseLumaY = 10,
    /// Both half-rate errors.
    MseLumaXy = 11,
    /// Lane index within a 32-wide wave.
    WaveLane = 12,
}

impl DiagnosticView {
    /// All views, in menu order.
    pub const ALL: [DiagnosticView; 13] = [
        DiagnosticView::TargetColor,
        DiagnosticView::GroupId,
        DiagnosticView::GroupIndex,
        DiagnosticView::GroupThreadId,
        DiagnosticView::DispatchThreadId,
        DiagnosticView::Velocity,
        DiagnosticView::Luma,
        DiagnosticView::LogLuma,
        DiagnosticView::AverageTileLuma,
        DiagnosticView::MseLumaX,
        DiagnosticView::MseLumaY,
        DiagnosticView::MseLumaXy,
        DiagnosticView::WaveLane,
    ];

    /// Index passed to shaders.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Inverse of [`DiagnosticView::index`].
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Neighborhood policy of the single-elimination post-filter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostFilter {
    /// No filtering.
    #[default]
    None,
    /// 4-connected neighborhood.
    VonNeumann,
    /// 8-connected neighborhood.
    Moore,
}

impl PostFilter {
    /// Resolves the two independent toggles of a UI into one policy.
    ///
    /// Requesting both selects von Neumann, with a notice.
    pub fn from_toggles(von_neumann: bool, moore: bool) -> Self {
        match (von_neumann, moore) {
            (true, true) => {
                log::warn!(
                    "Both von Neumann and Moore post-filters requested, applying von Neumann only"
                );
                PostFilter::VonNeumann
            }
            (true, false) => PostFilter::VonNeumann,
            (false, true) => PostFilter::Moore,
            (false, false) => PostFilter::None,
        }
    }
}

/// The complete configuration of the feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VrsSettings {
    /// Gates generation, binding and readback.
    pub enabled: bool,
    /// Active generator.
    pub mode: ShadingMode,
    tier1_rate: ShadingRate,
    /// Tier-2 combiner stages.
    pub combiners: CombinerPair,
    /// Post-filter policy applied after generation.
    pub post_filter: PostFilter,
    /// Read the map back at the end of each frame to refresh statistics.
    pub calculate_statistics: bool,
    /// Foveated parameters.
    pub foveated: FoveatedSettings,
    /// Depth LOD parameters.
    pub depth_lod: DepthLodSettings,
    /// Depth-of-field-linked parameters.
    pub depth_of_field: DepthOfFieldSettings,
    /// Compute-diagnostic parameters.
    pub diagnostic: DiagnosticSettings,
    /// Contrast-adaptive parameters.
    pub contrast_adaptive: ContrastAdaptiveSettings,
    /// Debug overlay toggles.
    pub overlay: DebugOverlaySettings,
}

impl Default for VrsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            mode: ShadingMode::default(),
            tier1_rate: ShadingRate::R1x1,
            combiners: CombinerPair::default(),
            post_filter: PostFilter::None,
            calculate_statistics: true,
            foveated: FoveatedSettings::default(),
            depth_lod: DepthLodSettings::default(),
            depth_of_field: DepthOfFieldSettings::default(),
            diagnostic: DiagnosticSettings::default(),
            contrast_adaptive: ContrastAdaptiveSettings::default(),
            overlay: DebugOverlaySettings::default(),
        }
    }
}

impl VrsSettings {
    /// Uniform rate used at tier 1, and as the per-draw rate at tier 2.
    pub fn tier1_rate(&self) -> ShadingRate {
        self.tier1_rate
    }

    /// Sets the uniform rate. Extended rates without hardware support are
    /// rejected in favour of 1x1, with a notice. Returns the rate applied.
    pub fn set_tier1_rate(
        &mut self,
        rate: ShadingRate,
        capabilities: &VrsCapabilities,
    ) -> ShadingRate {
        self.tier1_rate = if rate.is_extended() && !capabilities.additional_rates {
            log::warn!("Shading rate {rate} needs additional-rate support, using 1X1");
            ShadingRate::R1x1
        } else {
            rate
        };
        self.tier1_rate
    }

    /// Re-applies every range and capability gate, e.g. after deserializing.
    pub fn sanitize(&mut self, capabilities: &VrsCapabilities) {
        self.set_tier1_rate(self.tier1_rate, capabilities);
        self.foveated.sanitize();
        self.depth_lod.sanitize();
        self.contrast_adaptive.sanitize();
    }

    /// Parses a RON document and sanitizes it against `capabilities`.
    ///
    /// Missing fields take their defaults.
    pub fn from_ron_str(source: &str, capabilities: &VrsCapabilities) -> Result<Self, VrsError> {
        let mut settings: VrsSettings = ron::de::from_str(source)?;
        settings.sanitize(capabilities);
        Ok(settings)
    }

    /// Parses a JSON document and sanitizes it against `capabilities`.
    pub fn from_json_str(source: &str, capabilities: &VrsCapabilities) -> Result<Self, VrsError> {
        let mut settings: VrsSettings = serde_json::from_str(source)?;
        settings.sanitize(capabilities);
        Ok(settings)
    }

    /// Serializes to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, VrsError> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty_config)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::ShadingRateTier;
    use crate::rate::ShadingRateCombiner;

    fn tier2(additional_rates: bool) -> VrsCapabilities {
        VrsCapabilities {
            tier: ShadingRateTier::Tier2,
            tile_size: 16,
            additional_rates,
            sum_combiner: true,
        }
    }

    #[test]
    fn test_defaults() {
        let settings = VrsSettings::default();
        assert!(settings.enabled);
        assert_eq!(settings.mode, ShadingMode::ContrastAdaptive);
        assert_eq!(settings.tier1_rate(), ShadingRate::R1x1);
        assert_eq!(settings.combiners.first, ShadingRateCombiner::Passthrough);
        assert_eq!(settings.combiners.second, ShadingRateCombiner::Override);
        assert_eq!(settings.post_filter, PostFilter::None);
        assert!(!settings.overlay.enabled);
        assert_eq!(settings.diagnostic.view, DiagnosticView::TargetColor);
    }

    #[test]
    fn test_extended_tier1_rate_is_rejected_without_support() {
        let mut settings = VrsSettings::default();
        settings.set_tier1_rate(ShadingRate::R2x2, &tier2(false));
        assert_eq!(settings.tier1_rate(), ShadingRate::R2x2);
        let applied = settings.set_tier1_rate(ShadingRate::R4x4, &tier2(false));
        assert_eq!(applied, ShadingRate::R1x1);
        assert_eq!(settings.set_tier1_rate(ShadingRate::R4x4, &tier2(true)), ShadingRate::R4x4);
    }

    #[test]
    fn test_post_filter_toggles_prefer_von_neumann() {
        assert_eq!(PostFilter::from_toggles(true, true), PostFilter::VonNeumann);
        assert_eq!(PostFilter::from_toggles(false, true), PostFilter::Moore);
        assert_eq!(PostFilter::from_toggles(false, false), PostFilter::None);
    }

    #[test]
    fn test_diagnostic_view_index_round_trip() {
        for view in DiagnosticView::ALL {
            assert_eq!(DiagnosticView::from_index(view.index()), Some(view));
        }
        assert_eq!(DiagnosticView::from_index(13), None);
    }

    #[test]
    fn test_ron_loading_clamps_and_gates() {
        let source = r#"(
            mode: Foveated,
            tier1_rate: R4x4,
            foveated: (inner_radius: 250.0),
            contrast_adaptive: (sensitivity_threshold: -1.0),
        )"#;
        let settings = VrsSettings::from_ron_str(source, &tier2(false)).unwrap();
        assert_eq!(settings.mode, ShadingMode::Foveated);
        assert_eq!(settings.tier1_rate(), ShadingRate::R1x1);
        assert_eq!(settings.foveated.inner_radius(), 100.0);
        assert_eq!(settings.foveated.outer_radius(), 50.0);
        assert_eq!(settings.contrast_adaptive.sensitivity_threshold(), 0.0);
    }

    #[test]
    fn test_json_loading() {
        let source = r#"{ "enabled": false, "post_filter": "Moore" }"#;
        let settings = VrsSettings::from_json_str(source, &tier2(true)).unwrap();
        assert!(!settings.enabled);
        assert_eq!(settings.post_filter, PostFilter::Moore);
        assert!(VrsSettings::from_json_str("{ nope", &tier2(true)).is_err());
    }

    #[test]
    fn test_ron_round_trip() {
        let mut settings = VrsSettings::default();
        settings.mode = ShadingMode::DepthLod;
        settings.depth_lod.set_lod_range(0.1, 0.9);
        let text = settings.to_ron_string().unwrap();
        let loaded = VrsSettings::from_ron_str(&text, &tier2(true)).unwrap();
        assert_eq!(loaded, settings);
    }
}
