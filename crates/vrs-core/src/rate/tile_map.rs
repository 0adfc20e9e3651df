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

/// Dimensions of a tile map, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileGrid {
    /// Number of tile columns.
    pub width: u32,
    /// Number of tile rows.
    pub height: u32,
}

impl TileGrid {
    /// Creates a grid of `width` x `height` tiles.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The grid covering a `width` x `height` pixel target, rounding partial
    /// tiles up. A zero tile size yields an empty grid.
    pub fn for_extent(width: u32, height: u32, tile_size: u32) -> Self {
        if tile_size == 0 {
            return Self::default();
        }
        Self {
            width: width.div_ceil(tile_size),
            height: height.div_ceil(tile_size),
        }
    }

    /// Total number of tiles.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Whether the grid has no tiles.
    pub fn is_empty(&self) -> bool {
        self.tile_count() == 0
    }

    /// Linear index of tile `(x, y)`, row-major.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Whether `(x, y)` lies inside the grid.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    /// Ceiling midpoint of both axes, used to split the grid into quadrants.
    pub fn midpoint(&self) -> (u32, u32) {
        (self.width.div_ceil(2), self.height.div_ceil(2))
    }

    /// Iterates over every tile coordinate, row-major.
    pub fn coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }
}

/// A 2-D grid of 8-bit shading-rate codes, one per tile, row-major.
///
/// The raw bytes are kept as-is so maps read back from a GPU round-trip
/// exactly; accessors decode them into [`ShadingRate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShadingRateTileMap {
    grid: TileGrid,
    codes: Vec<u8>,
}

impl ShadingRateTileMap {
    /// A map covering `grid`, cleared to full rate.
    pub fn new(grid: TileGrid) -> Self {
        Self::filled(grid, ShadingRate::R1x1)
    }

    /// A map covering `grid` with every tile set to `rate`.
    pub fn filled(grid: TileGrid, rate: ShadingRate) -> Self {
        Self {
            grid,
            codes: vec![rate.code(); grid.tile_count()],
        }
    }

    /// Wraps raw codes, e.g. from a readback. Missing trailing tiles are padded
    /// with full rate and surplus bytes (padding rows) are dropped.
    pub fn from_codes(grid: TileGrid, mut codes: Vec<u8>) -> Self {
        codes.resize(grid.tile_count(), ShadingRate::R1x1.code());
        Self { grid, codes }
    }

    /// The grid this map covers.
    pub fn grid(&self) -> TileGrid {
        self.grid
    }

    /// The rate of tile `(x, y)`, or `None` if the stored code is not canonical.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<ShadingRate> {
        ShadingRate::from_code(self.code(x, y))
    }

    /// The raw code of tile `(x, y)`.
    pub fn code(&self, x: u32, y: u32) -> u8 {
        self.codes[self.grid.index(x, y)]
    }

    /// Sets tile `(x, y)`.
    pub fn set(&mut self, x: u32, y: u32, rate: ShadingRate) {
        let index = self.grid.index(x, y);
        self.codes[index] = rate.code();
    }

    /// Sets every tile to `rate`.
    pub fn fill(&mut self, rate: ShadingRate) {
        self.codes.fill(rate.code());
    }

    /// The raw per-tile byte buffer, row-major, one byte per tile.
    pub fn as_bytes(&self) -> &[u8] {
        &self.codes
    }

    /// Consumes the map, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.codes
    }

    /// Iterates over `(x, y, code)` for every tile.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, u8)> + '_ {
        self.grid
            .coords()
            .zip(self.codes.iter())
            .map(|((x, y), code)| (x, y, *code))
    }

    /// Whether any tile holds one of the extended rates.
    pub fn contains_extended(&self) -> bool {
        self.codes
            .iter()
            .filter_map(|c| ShadingRate::from_code(*c))
            .any(ShadingRate::is_extended)
    }
}
