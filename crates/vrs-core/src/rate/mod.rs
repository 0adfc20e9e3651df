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

//! Shading-rate codes and the data structures built from them.
//!
//! A shading rate describes how many pixels share one pixel-shader invocation,
//! expressed as `width x height`. Rates are stored as 8-bit codes using the
//! `(log2(width) << 2) | log2(height)` encoding that D3D12 exposes directly and
//! that Vulkan's fragment shading rate attachments can be derived from.

mod combiner;
mod statistics;
mod tile_map;

pub use combiner::*;
pub use statistics::*;
pub use tile_map::*;

use serde::{Deserialize, Serialize};

/// One of the seven canonical shading rates.
///
/// The first four are always available once the hardware supports variable rate
/// shading at all. The last three ("extended" rates) require an explicit
/// capability bit, see [`crate::VrsCapabilities::additional_rates`].
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum ShadingRate {
    /// One shade per pixel (full rate).
    #[default]
    R1x1 = 0x00,
    /// One shade per 1x2 block.
    R1x2 = 0x01,
    /// One shade per 2x1 block.
    R2x1 = 0x04,
    /// One shade per 2x2 block.
    R2x2 = 0x05,
    /// One shade per 2x4 block. Extended.
    R2x4 = 0x06,
    /// One shade per 4x2 block. Extended.
    R4x2 = 0x09,
    /// One shade per 4x4 block. Extended.
    R4x4 = 0x0A,
}

impl ShadingRate {
    /// All rates in canonical order (finest first, as reported in statistics).
    pub const ALL: [ShadingRate; 7] = [
        ShadingRate::R1x1,
        ShadingRate::R1x2,
        ShadingRate::R2x1,
        ShadingRate::R2x2,
        ShadingRate::R2x4,
        ShadingRate::R4x2,
        ShadingRate::R4x4,
    ];

    /// The rates that do not depend on the extended-rate capability.
    pub const BASE: [ShadingRate; 4] = [
        ShadingRate::R1x1,
        ShadingRate::R1x2,
        ShadingRate::R2x1,
        ShadingRate::R2x2,
    ];

    /// The raw 8-bit code written into a tile map.
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a raw tile-map value. Returns `None` for codes outside the seven
    /// canonical rates (including the 4x1/1x4 codes no hardware accepts).
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(ShadingRate::R1x1),
            0x01 => Some(ShadingRate::R1x2),
            0x04 => Some(ShadingRate::R2x1),
            0x05 => Some(ShadingRate::R2x2),
            0x06 => Some(ShadingRate::R2x4),
            0x09 => Some(ShadingRate::R4x2),
            0x0A => Some(ShadingRate::R4x4),
            _ => None,
        }
    }

    /// Position of this rate in [`ShadingRate::ALL`].
    pub const fn index(self) -> usize {
        match self {
            ShadingRate::R1x1 => 0,
            ShadingRate::R1x2 => 1,
            ShadingRate::R2x1 => 2,
            ShadingRate::R2x2 => 3,
            ShadingRate::R2x4 => 4,
            ShadingRate::R4x2 => 5,
            ShadingRate::R4x4 => 6,
        }
    }

    /// `(log2(width), log2(height))` of the shading block.
    #[inline]
    pub const fn axes_log2(self) -> (u8, u8) {
        (self.code() >> 2, self.code() & 0x3)
    }

    /// Width and height of the shading block in pixels.
    pub const fn block_size(self) -> (u32, u32) {
        let (x, y) = self.axes_log2();
        (1 << x, 1 << y)
    }

    /// Sum of both axis exponents. 0 for 1x1, 4 for 4x4.
    ///
    /// Used as the ordering key for "finer" / "coarser" comparisons.
    #[inline]
    pub const fn coarseness(self) -> u8 {
        let (x, y) = self.axes_log2();
        x + y
    }

    /// Whether the rate needs the extended-rate capability.
    pub const fn is_extended(self) -> bool {
        matches!(
            self,
            ShadingRate::R2x4 | ShadingRate::R4x2 | ShadingRate::R4x4
        )
    }

    /// Builds the rate closest to the requested per-axis exponents that the
    /// hardware can express.
    ///
    /// Each axis is clamped to 4 pixels (2 when extended rates are missing) and
    /// the 4x1 / 1x4 shapes, which no API exposes, are narrowed to 2x1 / 1x2.
    pub fn from_axes_log2(x: u8, y: u8, extended: bool) -> Self {
        let limit = if extended { 2 } else { 1 };
        let mut x = x.min(limit);
        let mut y = y.min(limit);
        if x == 2 && y == 0 {
            x = 1;
        }
        if y == 2 && x == 0 {
            y = 1;
        }
        // Every (x, y) left here maps onto a canonical code.
        ShadingRate::from_code((x << 2) | y).unwrap_or(ShadingRate::R1x1)
    }

    /// Replaces an extended rate with 2x2 when the hardware cannot express it.
    pub fn clamp_to_base(self, extended: bool) -> Self {
        if !extended && self.is_extended() {
            ShadingRate::R2x2
        } else {
            self
        }
    }

    /// Display label, e.g. `"2X2"`.
    pub const fn label(self) -> &'static str {
        match self {
            ShadingRate::R1x1 => "1X1",
            ShadingRate::R1x2 => "1X2",
            ShadingRate::R2x1 => "2X1",
            ShadingRate::R2x2 => "2X2",
            ShadingRate::R2x4 => "2X4",
            ShadingRate::R4x2 => "4X2",
            ShadingRate::R4x4 => "4X4",
        }
    }
}

impl std::fmt::Display for ShadingRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered sequence of rates, finest first, that distance-driven generators
/// walk as their input parameter grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLadder {
    rungs: &'static [ShadingRate],
}

const BASE_LADDER: [ShadingRate; 3] = [ShadingRate::R1x1, ShadingRate::R2x1, ShadingRate::R2x2];
const EXTENDED_LADDER: [ShadingRate; 5] = [
    ShadingRate::R1x1,
    ShadingRate::R2x1,
    ShadingRate::R2x2,
    ShadingRate::R4x2,
    ShadingRate::R4x4,
];

impl RateLadder {
    /// The ladder matching the extended-rate capability.
    pub const fn new(extended: bool) -> Self {
        Self {
            rungs: if extended {
                &EXTENDED_LADDER
            } else {
                &BASE_LADDER
            },
        }
    }

    /// The rungs, finest first.
    pub fn rungs(&self) -> &'static [ShadingRate] {
        self.rungs
    }

    /// The coarsest rung.
    pub fn coarsest(&self) -> ShadingRate {
        self.rungs[self.rungs.len() - 1]
    }

    /// Maps a normalized parameter onto the ladder.
    ///
    /// `t <= 0` yields 1x1, `t >= 1` the coarsest rung, and the open interval
    /// is split evenly across the interior rungs. The mapping is monotone.
    pub fn sample(&self, t: f32) -> ShadingRate {
        let last = self.rungs.len() - 1;
        if t.is_nan() || t <= 0.0 {
            return self.rungs[0];
        }
        if t >= 1.0 {
            return self.rungs[last];
        }
        let interior = (last - 1) as f32;
        let step = ((t * interior) as usize).min(last - 2);
        self.rungs[1 + step]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_code() {
        for rate in ShadingRate::ALL {
            assert_eq!(ShadingRate::from_code(rate.code()), Some(rate));
        }
        assert_eq!(ShadingRate::from_code(0x08), None); // 4x1
        assert_eq!(ShadingRate::from_code(0x02), None); // 1x4
        assert_eq!(ShadingRate::from_code(0xFF), None);
    }

    #[test]
    fn test_index_matches_canonical_order() {
        for (i, rate) in ShadingRate::ALL.iter().enumerate() {
            assert_eq!(rate.index(), i);
        }
    }

    #[test]
    fn test_block_size_and_coarseness() {
        assert_eq!(ShadingRate::R1x2.block_size(), (1, 2));
        assert_eq!(ShadingRate::R4x2.block_size(), (4, 2));
        assert_eq!(ShadingRate::R1x1.coarseness(), 0);
        assert_eq!(ShadingRate::R2x2.coarseness(), 2);
        assert_eq!(ShadingRate::R4x4.coarseness(), 4);
    }

    #[test]
    fn test_from_axes_log2_without_extended_rates() {
        assert_eq!(ShadingRate::from_axes_log2(2, 2, false), ShadingRate::R2x2);
        assert_eq!(ShadingRate::from_axes_log2(2, 1, false), ShadingRate::R2x2);
        assert_eq!(ShadingRate::from_axes_log2(2, 0, false), ShadingRate::R2x1);
        assert_eq!(ShadingRate::from_axes_log2(0, 1, false), ShadingRate::R1x2);
        for x in 0..4 {
            for y in 0..4 {
                assert!(!ShadingRate::from_axes_log2(x, y, false).is_extended());
            }
        }
    }

    #[test]
    fn test_from_axes_log2_never_builds_4x1() {
        assert_eq!(ShadingRate::from_axes_log2(2, 0, true), ShadingRate::R2x1);
        assert_eq!(ShadingRate::from_axes_log2(0, 2, true), ShadingRate::R1x2);
        assert_eq!(ShadingRate::from_axes_log2(2, 1, true), ShadingRate::R4x2);
        assert_eq!(ShadingRate::from_axes_log2(3, 3, true), ShadingRate::R4x4);
    }

    #[test]
    fn test_ladder_endpoints() {
        let base = RateLadder::new(false);
        assert_eq!(base.sample(-1.0), ShadingRate::R1x1);
        assert_eq!(base.sample(0.0), ShadingRate::R1x1);
        assert_eq!(base.sample(0.5), ShadingRate::R2x1);
        assert_eq!(base.sample(1.0), ShadingRate::R2x2);
        assert_eq!(base.sample(f32::NAN), ShadingRate::R1x1);

        let extended = RateLadder::new(true);
        assert_eq!(extended.sample(0.1), ShadingRate::R2x1);
        assert_eq!(extended.sample(0.5), ShadingRate::R2x2);
        assert_eq!(extended.sample(0.9), ShadingRate::R4x2);
        assert_eq!(extended.sample(2.0), ShadingRate::R4x4);
    }

    #[test]
    fn test_ladder_is_monotone() {
        for extended in [false, true] {
            let ladder = RateLadder::new(extended);
            let mut previous = 0;
            for i in -10..=110 {
                let coarseness = ladder.sample(i as f32 / 100.0).coarseness();
                assert!(coarseness >= previous);
                previous = coarseness;
            }
        }
    }
}
