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

//! Host-side scene images used by software backends and tests.

/// A row-major 2-D image of `T` texels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image2D<T> {
    width: u32,
    height: u32,
    texels: Vec<T>,
}

/// Linear RGBA color.
pub type ColorImage = Image2D<[f32; 4]>;
/// Reversed-Z depth, 1.0 at the near plane and 0.0 at the far plane.
pub type DepthImage = Image2D<f32>;
/// Screen-space motion in pixels.
pub type VelocityImage = Image2D<[f32; 2]>;

impl<T: Copy + Default> Image2D<T> {
    /// An image of `width` x `height` default texels.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, T::default())
    }

    /// An image where every texel is `value`.
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        Self {
            width,
            height,
            texels: vec![value; width as usize * height as usize],
        }
    }

    /// An image where texel `(x, y)` is `f(x, y)`.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> T) -> Self {
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            texels,
        }
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Texel `(x, y)`.
    ///
    /// # Panics
    /// Panics if `(x, y)` is outside the image.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> T {
        self.texels[y as usize * self.width as usize + x as usize]
    }

    /// Overwrites texel `(x, y)`.
    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: T) {
        let index = y as usize * self.width as usize + x as usize;
        self.texels[index] = value;
    }

    /// All texels, row-major.
    pub fn texels(&self) -> &[T] {
        &self.texels
    }
}
