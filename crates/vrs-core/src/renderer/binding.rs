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

//! The shading-rate state consulted by every draw.

use crate::capability::{ShadingRateTier, VrsCapabilities};
use crate::rate::{CombinerPair, ShadingRate, ShadingRateCombiner};
use crate::settings::VrsSettings;

/// Shading-rate state applied to the rasterizer for subsequent draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadingRateBinding {
    /// Per-draw rate (the uniform rate at tier 1).
    pub base_rate: ShadingRate,
    /// Combiner stages. `None` leaves the hardware defaults (passthrough).
    pub combiners: Option<CombinerPair>,
    /// Whether the rate map is attached as the shading-rate image.
    pub rate_image: bool,
}

impl Default for ShadingRateBinding {
    fn default() -> Self {
        Self::FULL_RATE
    }
}

impl ShadingRateBinding {
    /// Full rate, no combiners, no image.
    pub const FULL_RATE: ShadingRateBinding = ShadingRateBinding {
        base_rate: ShadingRate::R1x1,
        combiners: None,
        rate_image: false,
    };

    /// A single rate for every pixel.
    pub fn uniform(rate: ShadingRate) -> Self {
        Self {
            base_rate: rate,
            combiners: None,
            rate_image: false,
        }
    }

    /// The rate map combined with `base_rate` through `combiners`.
    pub fn per_tile(base_rate: ShadingRate, combiners: CombinerPair) -> Self {
        Self {
            base_rate,
            combiners: Some(combiners),
            rate_image: true,
        }
    }

    /// The binding a variable-rate draw region should use.
    ///
    /// Disabled or unsupported hardware binds full rate. `Sum` is replaced by
    /// `Passthrough` on hardware without the sum combiner.
    pub fn resolve(capabilities: &VrsCapabilities, settings: &VrsSettings) -> Self {
        if !settings.enabled {
            return Self::FULL_RATE;
        }
        match capabilities.tier {
            ShadingRateTier::NotSupported => Self::FULL_RATE,
            ShadingRateTier::Tier1 => Self::uniform(settings.tier1_rate()),
            ShadingRateTier::Tier2 => {
                let gate = |combiner: ShadingRateCombiner| {
                    if combiner == ShadingRateCombiner::Sum && !capabilities.sum_combiner {
                        log::warn!("Sum combiner is not supported, binding Passthrough");
                        ShadingRateCombiner::Passthrough
                    } else {
                        combiner
                    }
                };
                let combiners = CombinerPair {
                    first: gate(settings.combiners.first),
                    second: gate(settings.combiners.second),
                };
                Self::per_tile(settings.tier1_rate(), combiners)
            }
        }
    }

    /// Full rate for "hero" objects inside a variable-rate region. The image
    /// stays attached but both stages pass the 1x1 base rate through.
    pub fn hero(&self) -> Self {
        Self {
            base_rate: ShadingRate::R1x1,
            combiners: self.combiners.map(|_| CombinerPair::PASSTHROUGH),
            rate_image: self.rate_image,
        }
    }

    /// The binding after a variable-rate region ends: image and combiners
    /// detached, base rate kept.
    pub fn cleared(&self) -> Self {
        Self {
            base_rate: self.base_rate,
            combiners: None,
            rate_image: false,
        }
    }

    /// The rate a pixel ends up shaded at, evaluated in hardware order:
    /// `second(first(base, primitive), tile)`.
    ///
    /// An absent primitive rate or an unbound image skips its stage.
    pub fn effective_rate(
        &self,
        primitive: Option<ShadingRate>,
        tile: Option<ShadingRate>,
        extended: bool,
    ) -> ShadingRate {
        let Some(combiners) = self.combiners else {
            return self.base_rate;
        };
        let mut rate = self.base_rate;
        if let Some(primitive) = primitive {
            rate = combiners.first.combine(rate, primitive, extended);
        }
        if let (true, Some(tile)) = (self.rate_image, tile) {
            rate = combiners.second.combine(rate, tile, extended);
        }
        rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(tier: ShadingRateTier, sum_combiner: bool) -> VrsCapabilities {
        VrsCapabilities {
            tier,
            tile_size: if tier == ShadingRateTier::Tier2 { 16 } else { 0 },
            additional_rates: true,
            sum_combiner,
        }
    }

    #[test]
    fn test_resolve_per_tier() {
        let mut settings = VrsSettings::default();
        settings.set_tier1_rate(ShadingRate::R2x2, &caps(ShadingRateTier::Tier2, true));

        let none =
            ShadingRateBinding::resolve(&caps(ShadingRateTier::NotSupported, false), &settings);
        assert_eq!(none, ShadingRateBinding::FULL_RATE);

        let tier1 = ShadingRateBinding::resolve(&caps(ShadingRateTier::Tier1, false), &settings);
        assert_eq!(tier1, ShadingRateBinding::uniform(ShadingRate::R2x2));

        let tier2 = ShadingRateBinding::resolve(&caps(ShadingRateTier::Tier2, true), &settings);
        assert!(tier2.rate_image);
        assert_eq!(tier2.base_rate, ShadingRate::R2x2);
        assert_eq!(tier2.combiners, Some(settings.combiners));
    }

    #[test]
    fn test_disabled_binds_full_rate() {
        let mut settings = VrsSettings::default();
        settings.enabled = false;
        let binding = ShadingRateBinding::resolve(&caps(ShadingRateTier::Tier2, true), &settings);
        assert_eq!(binding, ShadingRateBinding::FULL_RATE);
    }

    #[test]
    fn test_sum_is_gated() {
        let mut settings = VrsSettings::default();
        settings.combiners.second = ShadingRateCombiner::Sum;
        let binding = ShadingRateBinding::resolve(&caps(ShadingRateTier::Tier2, false), &settings);
        assert_eq!(
            binding.combiners.map(|c| c.second),
            Some(ShadingRateCombiner::Passthrough)
        );
    }

    #[test]
    fn test_default_combiners_take_tile_rate() {
        let binding = ShadingRateBinding::per_tile(ShadingRate::R1x1, CombinerPair::default());
        assert_eq!(
            binding.effective_rate(None, Some(ShadingRate::R2x2), true),
            ShadingRate::R2x2
        );
        assert_eq!(
            binding.effective_rate(Some(ShadingRate::R4x4), Some(ShadingRate::R1x2), true),
            ShadingRate::R1x2
        );
    }

    #[test]
    fn test_hero_and_cleared() {
        let binding = ShadingRateBinding::per_tile(ShadingRate::R2x2, CombinerPair::default());
        let hero = binding.hero();
        assert_eq!(hero.effective_rate(None, Some(ShadingRate::R4x4), true), ShadingRate::R1x1);
        assert!(hero.rate_image);

        let cleared = binding.cleared();
        assert!(!cleared.rate_image);
        assert_eq!(cleared.combiners, None);
        assert_eq!(cleared.effective_rate(None, Some(ShadingRate::R4x4), true), ShadingRate::R2x2);
    }
}
