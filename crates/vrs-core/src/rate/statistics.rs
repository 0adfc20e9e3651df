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

use super::{ShadingRate, ShadingRateTileMap};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Share of tiles at each of the seven rates, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateStatistics {
    percents: [f32; 7],
    unrecognized_tiles: u32,
}

impl Default for RateStatistics {
    fn default() -> Self {
        Self::full_rate()
    }
}

impl RateStatistics {
    /// Every tile at 1x1.
    pub fn full_rate() -> Self {
        Self::uniform(ShadingRate::R1x1)
    }

    /// Every tile at `rate`.
    pub fn uniform(rate: ShadingRate) -> Self {
        let mut percents = [0.0; 7];
        percents[rate.index()] = 100.0;
        Self {
            percents,
            unrecognized_tiles: 0,
        }
    }

    /// Single linear scan over the map's codes.
    ///
    /// Codes outside the canonical seven are counted separately and do not
    /// contribute to any percentage.
    pub fn from_tile_map(map: &ShadingRateTileMap) -> Self {
        let mut counts = [0u32; 7];
        let mut unrecognized_tiles = 0;
        for code in map.as_bytes() {
            match ShadingRate::from_code(*code) {
                Some(rate) => counts[rate.index()] += 1,
                None => unrecognized_tiles += 1,
            }
        }

        let total = map.as_bytes().len();
        if total == 0 {
            return Self::full_rate();
        }
        if unrecognized_tiles > 0 {
            log::warn!("{unrecognized_tiles} of {total} tiles hold an unrecognized rate code");
        }

        let mut percents = [0.0; 7];
        for (percent, count) in percents.iter_mut().zip(counts) {
            *percent = count as f32 * 100.0 / total as f32;
        }
        Self {
            percents,
            unrecognized_tiles,
        }
    }

    /// Percentage of tiles at `rate`.
    pub fn percent(&self, rate: ShadingRate) -> f32 {
        self.percents[rate.index()]
    }

    /// All seven percentages in [`ShadingRate::ALL`] order.
    pub fn percents(&self) -> &[f32; 7] {
        &self.percents
    }

    /// Sum of all percentages. 100 unless the map held unrecognized codes.
    pub fn total(&self) -> f32 {
        self.percents.iter().sum()
    }

    /// Tiles whose code was not one of the seven canonical rates.
    pub fn unrecognized_tiles(&self) -> u32 {
        self.unrecognized_tiles
    }

    /// `(rate, percent)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ShadingRate, f32)> + '_ {
        ShadingRate::ALL.into_iter().zip(self.percents.iter().copied())
    }
}

impl fmt::Display for RateStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (rate, percent)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{rate}:{percent:.2}%")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate::TileGrid;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_full_rate_statistics() {
        let stats = RateStatistics::full_rate();
        assert_eq!(stats.percent(ShadingRate::R1x1), 100.0);
        for rate in &ShadingRate::ALL[1..] {
            assert_eq!(stats.percent(*rate), 0.0);
        }
    }

    #[test]
    fn test_counts_from_tile_map() {
        let mut map = ShadingRateTileMap::new(TileGrid::new(2, 2));
        map.set(0, 0, ShadingRate::R2x2);
        map.set(1, 0, ShadingRate::R2x2);
        map.set(1, 1, ShadingRate::R4x4);
        let stats = RateStatistics::from_tile_map(&map);
        assert_abs_diff_eq!(stats.percent(ShadingRate::R1x1), 25.0);
        assert_abs_diff_eq!(stats.percent(ShadingRate::R2x2), 50.0);
        assert_abs_diff_eq!(stats.percent(ShadingRate::R4x4), 25.0);
        assert_abs_diff_eq!(stats.total(), 100.0, epsilon = 1e-4);
    }

    #[test]
    fn test_unrecognized_codes_are_reported() {
        let map = ShadingRateTileMap::from_codes(TileGrid::new(2, 1), vec![0x00, 0x08]);
        let stats = RateStatistics::from_tile_map(&map);
        assert_eq!(stats.unrecognized_tiles(), 1);
        assert_abs_diff_eq!(stats.percent(ShadingRate::R1x1), 50.0);
    }

    #[test]
    fn test_empty_map_reports_full_rate() {
        let map = ShadingRateTileMap::new(TileGrid::default());
        assert_eq!(RateStatistics::from_tile_map(&map), RateStatistics::full_rate());
    }

    #[test]
    fn test_display_lists_every_rate() {
        let text = RateStatistics::full_rate().to_string();
        assert!(text.starts_with("1X1:100.00%"));
        assert!(text.ends_with("4X4:0.00%"));
    }
}
