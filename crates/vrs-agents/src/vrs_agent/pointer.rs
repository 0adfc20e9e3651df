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


use vrs_core::settings::FoveatedSettings;
use vrs_core::TileGrid;

/// Drives the foveated focal point from the pointer.
///
/// The configured offset is saved on the first tracked sample and put back
/// when tracking is switched off.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    saved_offset: Option<(f32, f32)>,
}

impl PointerTracker {
    /// A tracker that has not seen any sample yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a configured offset is currently being overridden.
    pub fn is_tracking(&self) -> bool {
        self.saved_offset.is_some()
    }

    /// Applies one frame worth of pointer input to `foveated`.
    ///
    /// `pointer` is in render-target pixels. Frames without a sample leave
    /// the offset where it was.
    pub fn update(
        &mut self,
        foveated: &mut FoveatedSettings,
        pointer: Option<(f32, f32)>,
        grid: TileGrid,
        tile_size: u32,
    ) {
        if foveated.track_pointer {
            let Some((px, py)) = pointer else {
                return;
            };
            if self.saved_offset.is_none() {
                self.saved_offset = Some(foveated.center_offset());
                log::debug!(
                    "Pointer tracking started, saved offset {:?}",
                    foveated.center_offset()
                );
            }
            let (x, y) = pointer_offset(px, py, grid, tile_size);
            foveated.set_tracked_center_offset(x, y);
        } else if let Some((x, y)) = self.saved_offset.take() {
            log::debug!("Pointer tracking stopped, restoring offset ({x}, {y})");
            foveated.set_center_offset(x, y);
        }
    }
}

/// Offset from the grid center of the tile under pixel `(px, py)`.
pub fn pointer_offset(px: f32, py: f32, grid: TileGrid, tile_size: u32) -> (f32, f32) {
    let ts = tile_size.max(1) as f32;
    (
        (px / ts).floor() - grid.width as f32 / 2.0,
        (py / ts).floor() - grid.height as f32 / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRID: TileGrid = TileGrid::new(40, 20);

    #[test]
    fn test_pointer_offset_is_in_tiles_from_center() {
        assert_eq!(pointer_offset(0.0, 0.0, GRID, 16), (-20.0, -10.0));
        assert_eq!(pointer_offset(335.0, 161.0, GRID, 16), (0.0, 0.0));
        assert_eq!(pointer_offset(639.0, 319.0, GRID, 16), (19.0, 9.0));
    }

    #[test]
    fn test_offset_is_saved_and_restored() {
        let mut foveated = FoveatedSettings::default();
        foveated.set_center_offset(3.0, -2.0);
        let mut tracker = PointerTracker::new();

        tracker.update(&mut foveated, Some((0.0, 0.0)), GRID, 16);
        assert!(tracker.is_tracking());
        assert_eq!(foveated.center_offset(), (-20.0, -10.0));

        tracker.update(&mut foveated, Some((320.0, 160.0)), GRID, 16);
        assert_eq!(foveated.center_offset(), (0.0, 0.0));

        foveated.track_pointer = false;
        tracker.update(&mut foveated, Some((0.0, 0.0)), GRID, 16);
        assert!(!tracker.is_tracking());
        assert_eq!(foveated.center_offset(), (3.0, -2.0));
    }

    #[test]
    fn test_missing_sample_keeps_offset() {
        let mut foveated = FoveatedSettings::default();
        let mut tracker = PointerTracker::new();
        tracker.update(&mut foveated, None, GRID, 16);
        assert!(!tracker.is_tracking());
        assert_eq!(foveated.center_offset(), (0.0, 0.0));
    }

    #[test]
    fn test_far_pointer_saturates() {
        let mut foveated = FoveatedSettings::default();
        let mut tracker = PointerTracker::new();
        let wide = TileGrid::new(480, 270);
        tracker.update(&mut foveated, Some((7679.0, 0.0)), wide, 8);
        assert_eq!(foveated.center_offset(), (100.0, -100.0));
    }
}
