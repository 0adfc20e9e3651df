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

//! Textual names of configuration enums.
//!
//! Each enum has exactly one table. The first entry for a variant is its
//! display label; later entries are aliases accepted on input. Lookups are
//! case-insensitive and never fail: unknown tokens fall back to the enum's
//! default with a notice.

use super::{DiagnosticView, ShadingMode};
use crate::rate::{ShadingRate, ShadingRateCombiner};

/// An enum with a name table.
pub trait NamedVariant: Copy + PartialEq + Default + 'static {
    /// What the enum is called in diagnostics.
    const KIND: &'static str;

    /// `(name, variant)` pairs. Display labels first.
    const TABLE: &'static [(&'static str, Self)];

    /// Finds the variant named `token`, ignoring case and surrounding spaces.
    fn lookup(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::TABLE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(token))
            .map(|(_, variant)| *variant)
    }

    /// Like [`NamedVariant::lookup`], falling back to the default with a notice.
    fn parse_or_default(token: &str) -> Self {
        Self::lookup(token).unwrap_or_else(|| {
            let fallback = Self::default();
            log::warn!(
                "Unrecognized {} '{token}', using {}",
                Self::KIND,
                fallback.display_name()
            );
            fallback
        })
    }

    /// Display label of this variant.
    fn display_name(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(_, variant)| *variant == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }
}

impl NamedVariant for ShadingRate {
    const KIND: &'static str = "shading rate";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("1X1", ShadingRate::R1x1),
        ("1X2", ShadingRate::R1x2),
        ("2X1", ShadingRate::R2x1),
        ("2X2", ShadingRate::R2x2),
        ("2X4", ShadingRate::R2x4),
        ("4X2", ShadingRate::R4x2),
        ("4X4", ShadingRate::R4x4),
    ];
}

impl NamedVariant for ShadingRateCombiner {
    const KIND: &'static str = "combiner";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("Passthrough", ShadingRateCombiner::Passthrough),
        ("Override", ShadingRateCombiner::Override),
        ("Min", ShadingRateCombiner::Min),
        ("Max", ShadingRateCombiner::Max),
        ("Sum", ShadingRateCombiner::Sum),
    ];
}

impl NamedVariant for ShadingMode {
    const KIND: &'static str = "shading mode";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("Quadrant (CPU)", ShadingMode::Quadrant),
        ("Checkerboard (CPU)", ShadingMode::Checkerboard),
        ("Foveated (GPU)", ShadingMode::Foveated),
        ("Depth LOD (GPU)", ShadingMode::DepthLod),
        ("Depth DoF (GPU)", ShadingMode::DepthOfField),
        ("Compute Test (GPU)", ShadingMode::ComputeDiagnostic),
        ("Contrast Adaptive (GPU)", ShadingMode::ContrastAdaptive),
        ("Quadrant", ShadingMode::Quadrant),
        ("Checkerboard", ShadingMode::Checkerboard),
        ("Foveated", ShadingMode::Foveated),
        ("DepthLod", ShadingMode::DepthLod),
        ("DepthOfField", ShadingMode::DepthOfField),
        ("ComputeDiagnostic", ShadingMode::ComputeDiagnostic),
        ("ContrastAdaptive", ShadingMode::ContrastAdaptive),
        ("depth-lod", ShadingMode::DepthLod),
        ("dof", ShadingMode::DepthOfField),
        ("diagnostic", ShadingMode::ComputeDiagnostic),
        ("contrast-adaptive", ShadingMode::ContrastAdaptive),
    ];
}

impl NamedVariant for DiagnosticView {
    const KIND: &'static str = "diagnostic view";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("Target Color", DiagnosticView::TargetColor),
        ("Group ID", DiagnosticView::GroupId),
        ("Group Index", DiagnosticView::GroupIndex),
        ("Group Thread ID", DiagnosticView::GroupThreadId),
        ("Dispatch Thread ID", DiagnosticView::DispatchThreadId),
        ("Velocity", DiagnosticView::Velocity),
        ("Luma", DiagnosticView::Luma),
        ("Log Luma", DiagnosticView::LogLuma),
        ("Avg. Tile Luma", DiagnosticView::AverageTileLuma),
        ("MSE Luma X", DiagnosticView::MseLumaX),
        ("MSE Luma Y", DiagnosticView::MseLumaY),
        ("MSE Luma XY", DiagnosticView::MseLumaXy),
        ("Wave Lane", DiagnosticView::WaveLane),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_variant_has_a_label<T: NamedVariant + std::fmt::Debug>(all: &[T]) {
        for variant in all {
            assert_ne!(variant.display_name(), "?", "{variant:?} has no label");
            assert_eq!(T::lookup(variant.display_name()), Some(*variant));
        }
    }

    #[test]
    fn test_tables_are_complete() {
        every_variant_has_a_label(&ShadingRate::ALL);
        every_variant_has_a_label(&ShadingRateCombiner::ALL);
        every_variant_has_a_label(&ShadingMode::ALL);
        every_variant_has_a_label(&DiagnosticView::ALL);
    }

    #[test]
    fn test_strategy_names_parse_back() {
        for mode in ShadingMode::ALL {
            assert_eq!(ShadingMode::lookup(mode.strategy_name()), Some(mode));
            assert_eq!(ShadingMode::parse_or_default(mode.strategy_name()), mode);
        }
        assert_eq!(
            ShadingMode::lookup("ContrastAdaptive"),
            Some(ShadingMode::ContrastAdaptive)
        );
    }

    #[test]
    fn test_lookup_ignores_case_and_spaces() {
        assert_eq!(ShadingRate::lookup(" 2x4 "), Some(ShadingRate::R2x4));
        assert_eq!(
            ShadingRateCombiner::lookup("OVERRIDE"),
            Some(ShadingRateCombiner::Override)
        );
        assert_eq!(ShadingMode::lookup("Depth-LOD"), Some(ShadingMode::DepthLod));
        assert_eq!(
            DiagnosticView::lookup("avg. tile luma"),
            Some(DiagnosticView::AverageTileLuma)
        );
    }

    #[test]
    fn test_unknown_tokens_fall_back_to_default() {
        assert_eq!(ShadingRate::parse_or_default("8X8"), ShadingRate::R1x1);
        assert_eq!(
            ShadingRateCombiner::parse_or_default("average"),
            ShadingRateCombiner::Passthrough
        );
        assert_eq!(ShadingMode::parse_or_default(""), ShadingMode::ContrastAdaptive);
        assert_eq!(DiagnosticView::parse_or_default("??"), DiagnosticView::TargetColor);
    }

    #[test]
    fn test_display_name_uses_first_entry() {
        assert_eq!(ShadingMode::Foveated.display_name(), "Foveated (GPU)");
        assert_eq!(ShadingRate::R4x2.display_name(), "4X2");
    }
}
