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


//! A procedural frame exercising every input the rate-map passes read.

use vrs_core::renderer::{ColorImage, DepthImage, VelocityImage};

/// Horizontal motion of the lower half, in pixels per frame.
pub const SCENE_MOTION: f32 = 8.0;

/// Color, depth and velocity of one synthetic frame.
///
/// Left to right the color target holds a flat panel, single-pixel stripes
/// and a smooth gradient. Depth runs from the far plane at the top to the
/// near plane at the bottom, and the lower half moves sideways.
#[derive(Debug, Clone)]
pub struct SyntheticScene {
    pub color: ColorImage,
    pub depth: DepthImage,
    pub velocity: VelocityImage,
}

impl SyntheticScene {
    pub fn new(width: u32, height: u32) -> Self {
        let third = (width / 3).max(1);
        let color = ColorImage::from_fn(width, height, |x, _| match x / third {
            0 => [0.6, 0.6, 0.6, 1.0],
            1 => {
                let v = (x % 2) as f32;
                [v, v, v, 1.0]
            }
            _ => {
                let t = (x - 2 * third) as f32 / third as f32;
                [t, 0.5 * t, 0.25, 1.0]
            }
        });

        let last_row = height.saturating_sub(1).max(1) as f32;
        let depth = DepthImage::from_fn(width, height, |_, y| y as f32 / last_row);

        let velocity = VelocityImage::from_fn(width, height, |_, y| {
            if y >= height / 2 {
                [SCENE_MOTION, 0.0]
            } else {
                [0.0, 0.0]
            }
        });

        Self {
            color,
            depth,
            velocity,
        }
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_layout() {
        let scene = SyntheticScene::new(90, 20);
        assert_eq!(scene.depth.extent(), (90, 20));
        assert_eq!(scene.velocity.extent(), (90, 20));
        assert_eq!(scene.color.get(0, 0), scene.color.get(29, 19));
        assert_ne!(scene.color.get(30, 0), scene.color.get(31, 0));
        assert_eq!(scene.depth.get(0, 0), 0.0);
        assert_eq!(scene.depth.get(0, 19), 1.0);
        assert_eq!(scene.velocity.get(5, 9), [0.0, 0.0]);
        assert_eq!(scene.velocity.get(5, 10), [SCENE_MOTION, 0.0]);
    }
}
