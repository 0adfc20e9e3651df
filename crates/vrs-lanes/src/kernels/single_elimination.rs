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

use vrs_core::renderer::{FilterUniforms, NEIGHBORHOOD_MOORE};
use vrs_core::{ShadingRate, ShadingRateTileMap};

const VON_NEUMANN: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];
const MOORE: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Neighbor offsets for a filter neighborhood selector.
pub fn neighborhood_offsets(neighborhood: u32) -> &'static [(i64, i64)] {
    if neighborhood == NEIGHBORHOOD_MOORE {
        &MOORE
    } else {
        &VON_NEUMANN
    }
}

/// Demotes every coarse tile with no coarse neighbor to 1x1.
///
/// Decisions are taken against the map as it was before the pass, so the
/// result does not depend on traversal order and a second pass is a no-op.
pub fn single_elimination(map: &mut ShadingRateTileMap, u: &FilterUniforms) {
    let snapshot = map.clone();
    let grid = snapshot.grid();
    let offsets = neighborhood_offsets(u.neighborhood);
    let coarse = |x: i64, y: i64| {
        grid.contains(x, y) && snapshot.code(x as u32, y as u32) != ShadingRate::R1x1.code()
    };

    for (x, y) in grid.coords() {
        if snapshot.code(x, y) == ShadingRate::R1x1.code() {
            continue;
        }
        let (xi, yi) = (i64::from(x), i64::from(y));
        if !offsets.iter().any(|(dx, dy)| coarse(xi + dx, yi + dy)) {
            map.set(x, y, ShadingRate::R1x1);
        }
    }
}
