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

use super::ShadingRate;
use serde::{Deserialize, Serialize};

/// Operator merging two shading-rate inputs into one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShadingRateCombiner {
    /// Keep the left-hand input.
    #[default]
    Passthrough,
    /// Take the right-hand input.
    Override,
    /// Per-axis minimum (the finer of the two).
    Min,
    /// Per-axis maximum (the coarser of the two).
    Max,
    /// Per-axis product of block sizes, clamped to the largest expressible block.
    Sum,
}

impl ShadingRateCombiner {
    /// All combiners, in menu order.
    pub const ALL: [ShadingRateCombiner; 5] = [
        ShadingRateCombiner::Passthrough,
        ShadingRateCombiner::Override,
        ShadingRateCombiner::Min,
        ShadingRateCombiner::Max,
        ShadingRateCombiner::Sum,
    ];

    /// Applies the operator to `lhs` and `rhs`.
    pub fn combine(self, lhs: ShadingRate, rhs: ShadingRate, extended: bool) -> ShadingRate {
        let (lx, ly) = lhs.axes_log2();
        let (rx, ry) = rhs.axes_log2();
        match self {
            ShadingRateCombiner::Passthrough => lhs,
            ShadingRateCombiner::Override => rhs,
            ShadingRateCombiner::Min => {
                ShadingRate::from_axes_log2(lx.min(rx), ly.min(ry), extended)
            }
            ShadingRateCombiner::Max => {
                ShadingRate::from_axes_log2(lx.max(rx), ly.max(ry), extended)
            }
            ShadingRateCombiner::Sum => ShadingRate::from_axes_log2(lx + rx, ly + ry, extended),
        }
    }

    /// Display label, e.g. `"Override"`.
    pub const fn label(self) -> &'static str {
        match self {
            ShadingRateCombiner::Passthrough => "Passthrough",
            ShadingRateCombiner::Override => "Override",
            ShadingRateCombiner::Min => "Min",
            ShadingRateCombiner::Max => "Max",
            ShadingRateCombiner::Sum => "Sum",
        }
    }
}

/// The two combiner stages of tier-2 hardware.
///
/// `first` merges the per-draw rate with the per-primitive rate, `second`
/// merges that result with the rate read from the tile map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinerPair {
    /// Per-draw ⊕ per-primitive.
    pub first: ShadingRateCombiner,
    /// Previous stage ⊕ tile map.
    pub second: ShadingRateCombiner,
}

impl Default for CombinerPair {
    fn default() -> Self {
        Self {
            first: ShadingRateCombiner::Passthrough,
            second: ShadingRateCombiner::Override,
        }
    }
}

impl CombinerPair {
    /// Both stages pass the per-draw rate through untouched.
    pub const PASSTHROUGH: CombinerPair = CombinerPair {
        first: ShadingRateCombiner::Passthrough,
        second: ShadingRateCombiner::Passthrough,
    };

    /// The pair as the two-element array graphics APIs expect.
    pub fn as_array(&self) -> [ShadingRateCombiner; 2] {
        [self.first, self.second]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_and_override() {
        let c = ShadingRateCombiner::Passthrough;
        assert_eq!(c.combine(ShadingRate::R1x2, ShadingRate::R4x4, true), ShadingRate::R1x2);
        let c = ShadingRateCombiner::Override;
        assert_eq!(c.combine(ShadingRate::R1x2, ShadingRate::R4x4, true), ShadingRate::R4x4);
    }

    #[test]
    fn test_min_max_are_per_axis() {
        let min = ShadingRateCombiner::Min.combine(ShadingRate::R1x2, ShadingRate::R2x1, true);
        assert_eq!(min, ShadingRate::R1x1);
        let max = ShadingRateCombiner::Max.combine(ShadingRate::R1x2, ShadingRate::R2x1, true);
        assert_eq!(max, ShadingRate::R2x2);
    }

    #[test]
    fn test_sum_clamps_to_capabilities() {
        let sum = ShadingRateCombiner::Sum;
        assert_eq!(sum.combine(ShadingRate::R2x2, ShadingRate::R2x2, true), ShadingRate::R4x4);
        assert_eq!(sum.combine(ShadingRate::R2x2, ShadingRate::R2x2, false), ShadingRate::R2x2);
        assert_eq!(sum.combine(ShadingRate::R2x1, ShadingRate::R2x1, true), ShadingRate::R2x1);
    }

    #[test]
    fn test_default_pair() {
        let pair = CombinerPair::default();
        assert_eq!(
            pair.as_array(),
            [ShadingRateCombiner::Passthrough, ShadingRateCombiner::Override]
        );
    }
}
