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

//! Hardware capability probing.
//!
//! The probe runs once per session. Its result, [`VrsCapabilities`], is
//! immutable afterwards and every other component treats it as read-only.

use crate::rate::ShadingRate;
use crate::renderer::VrsError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hardware support level for variable rate shading.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShadingRateTier {
    /// No variable rate shading. Every operation becomes a no-op.
    #[default]
    NotSupported,
    /// A single uniform rate per draw.
    Tier1,
    /// Per-tile rates from a screen-space image, plus combiners.
    Tier2,
}

impl fmt::Display for ShadingRateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShadingRateTier::NotSupported => write!(f, "not supported"),
            ShadingRateTier::Tier1 => write!(f, "tier 1"),
            ShadingRateTier::Tier2 => write!(f, "tier 2"),
        }
    }
}

/// Raw answer of the driver, before validation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShadingRateSupport {
    /// Reported tier.
    pub tier: ShadingRateTier,
    /// Reported tile size in pixels.
    pub tile_size: u32,
    /// Whether 2x4, 4x2 and 4x4 are available.
    pub additional_rates: bool,
    /// Whether the `Sum` combiner is available.
    pub sum_combiner: bool,
    /// Whether a per-primitive rate can be written from vertex shaders.
    pub per_primitive: bool,
}

/// Something that can answer the shading-rate feature query, usually a device.
pub trait CapabilitySource {
    /// Queries the driver. An `Err` means the query itself failed.
    fn query_shading_rate_support(&self) -> Result<ShadingRateSupport, VrsError>;
}

/// Tile sizes accepted for tier-2 rate images.
pub const VALID_TILE_SIZES: [u32; 3] = [8, 16, 32];

/// Validated capability descriptor for the session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrsCapabilities {
    /// Supported tier.
    pub tier: ShadingRateTier,
    /// Tile size in pixels. Zero below tier 2.
    pub tile_size: u32,
    /// Whether the extended rates (2x4, 4x2, 4x4) may be used.
    pub additional_rates: bool,
    /// Whether the `Sum` combiner may be bound.
    pub sum_combiner: bool,
}

impl VrsCapabilities {
    /// Descriptor of hardware without any support.
    pub const NONE: VrsCapabilities = VrsCapabilities {
        tier: ShadingRateTier::NotSupported,
        tile_size: 0,
        additional_rates: false,
        sum_combiner: false,
    };

    /// Builds a descriptor from a raw driver answer, applying the same rules
    /// as [`probe`].
    pub fn from_support(support: ShadingRateSupport) -> Self {
        if support.tier == ShadingRateTier::NotSupported {
            return Self::NONE;
        }

        let mut tier = support.tier;
        let mut tile_size = 0;
        if tier == ShadingRateTier::Tier2 {
            if VALID_TILE_SIZES.contains(&support.tile_size) {
                tile_size = support.tile_size;
            } else {
                log::warn!(
                    "Driver reported tier 2 with unusable tile size {}, falling back to tier 1",
                    support.tile_size
                );
                tier = ShadingRateTier::Tier1;
            }
        }

        Self {
            tier,
            tile_size,
            additional_rates: support.additional_rates,
            sum_combiner: support.sum_combiner && tier == ShadingRateTier::Tier2,
        }
    }

    /// Whether variable rate shading is available at all.
    pub fn is_supported(&self) -> bool {
        self.tier > ShadingRateTier::NotSupported
    }

    /// Whether per-tile rate maps are available.
    pub fn supports_tile_map(&self) -> bool {
        self.tier == ShadingRateTier::Tier2
    }

    /// Whether `rate` may be used on this hardware.
    pub fn supports_rate(&self, rate: ShadingRate) -> bool {
        self.is_supported() && (self.additional_rates || !rate.is_extended())
    }

    /// The rates selectable on this hardware, finest first.
    pub fn available_rates(&self) -> &'static [ShadingRate] {
        if self.additional_rates {
            &ShadingRate::ALL
        } else {
            &ShadingRate::BASE
        }
    }
}

/// Queries `source` once and validates the answer.
///
/// A failed query degrades to [`VrsCapabilities::NONE`]; it is never fatal.
pub fn probe(source: &dyn CapabilitySource) -> VrsCapabilities {
    match source.query_shading_rate_support() {
        Ok(support) => {
            let capabilities = VrsCapabilities::from_support(support);
            log::info!(
                "Variable rate shading: {}, tile size {}, additional rates {}, sum combiner {}, per-primitive {}",
                capabilities.tier,
                capabilities.tile_size,
                capabilities.additional_rates,
                capabilities.sum_combiner,
                support.per_primitive
            );
            capabilities
        }
        Err(e) => {
            log::warn!("Shading-rate capability query failed, disabling VRS: {e}");
            VrsCapabilities::NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Result<ShadingRateSupport, ()>);

    impl CapabilitySource for FixedSource {
        fn query_shading_rate_support(&self) -> Result<ShadingRateSupport, VrsError> {
            self.0
                .map_err(|_| VrsError::Unsupported("feature query".to_string()))
        }
    }

    #[test]
    fn test_failed_query_disables_feature() {
        let caps = probe(&FixedSource(Err(())));
        assert_eq!(caps, VrsCapabilities::NONE);
        assert!(!caps.is_supported());
    }

    #[test]
    fn test_not_supported_ignores_other_fields() {
        let caps = probe(&FixedSource(Ok(ShadingRateSupport {
            tier: ShadingRateTier::NotSupported,
            tile_size: 16,
            additional_rates: true,
            ..Default::default()
        })));
        assert_eq!(caps, VrsCapabilities::NONE);
    }

    #[test]
    fn test_tier1_has_no_tile_size() {
        let caps = probe(&FixedSource(Ok(ShadingRateSupport {
            tier: ShadingRateTier::Tier1,
            tile_size: 16,
            additional_rates: true,
            sum_combiner: true,
            per_primitive: false,
        })));
        assert_eq!(caps.tier, ShadingRateTier::Tier1);
        assert_eq!(caps.tile_size, 0);
        assert!(caps.additional_rates);
        assert!(!caps.sum_combiner);
        assert!(!caps.supports_tile_map());
    }

    #[test]
    fn test_tier2_keeps_tile_size() {
        let caps = probe(&FixedSource(Ok(ShadingRateSupport {
            tier: ShadingRateTier::Tier2,
            tile_size: 8,
            additional_rates: false,
            sum_combiner: true,
            per_primitive: true,
        })));
        assert_eq!(caps.tile_size, 8);
        assert!(caps.supports_tile_map());
        assert!(!caps.supports_rate(ShadingRate::R4x4));
        assert!(caps.supports_rate(ShadingRate::R2x2));
        assert_eq!(caps.available_rates().len(), 4);
    }

    #[test]
    fn test_tier2_with_bad_tile_size_degrades() {
        let caps = probe(&FixedSource(Ok(ShadingRateSupport {
            tier: ShadingRateTier::Tier2,
            tile_size: 0,
            ..Default::default()
        })));
        assert_eq!(caps.tier, ShadingRateTier::Tier1);
        assert_eq!(caps.tile_size, 0);
    }
}
