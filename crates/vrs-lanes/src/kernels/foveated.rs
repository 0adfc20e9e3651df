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

use super::band_rate;
use vrs_core::renderer::FoveatedUniforms;
use vrs_core::{RateLadder, ShadingRate, ShadingRateTileMap};

/// Distance in tiles from the center of tile `(x, y)` to the focal point.
pub fn foveated_distance(u: &FoveatedUniforms, x: u32, y: u32) -> f32 {
    let dx = x as f32 + 0.5 - u.center_x;
    let dy = y as f32 + 0.5 - u.center_y;
    (dx * dx + dy * dy).sqrt()
}

/// Rate of tile `(x, y)` under the foveated falloff.
pub fn foveated_rate(u: &FoveatedUniforms, x: u32, y: u32) -> ShadingRate {
    band_rate(
        foveated_distance(u, x, y),
        u.inner_radius,
        u.outer_radius,
        RateLadder::new(u.extended != 0),
    )
}

/// Writes the foveated falloff into every tile.
pub fn foveated(map: &mut ShadingRateTileMap, u: &FoveatedUniforms) {
    for (x, y) in map.grid().coords() {
        map.set(x, y, foveated_rate(u, x, y));
    }
}
