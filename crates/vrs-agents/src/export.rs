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


//! Single-channel images of a rate map for offline analysis.

use image::{GrayImage, Luma};
use vrs_core::ShadingRateTileMap;

/// One pixel per tile, holding the raw rate code.
pub fn rate_map_image(map: &ShadingRateTileMap) -> GrayImage {
    let grid = map.grid();
    GrayImage::from_fn(grid.width, grid.height, |x, y| Luma([map.code(x, y)]))
}

/// [`rate_map_image`] scaled up so each tile covers `tile_size` pixels.
pub fn rate_map_image_per_pixel(map: &ShadingRateTileMap, tile_size: u32) -> GrayImage {
    let grid = map.grid();
    let ts = tile_size.max(1);
    GrayImage::from_fn(grid.width * ts, grid.height * ts, |x, y| {
        Luma([map.code(x / ts, y / ts)])
    })
}
