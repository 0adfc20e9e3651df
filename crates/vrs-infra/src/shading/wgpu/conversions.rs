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


//! Texel and rate-code conversions between host images and GPU formats.

use vrs_core::renderer::{ColorImage, DepthImage, VelocityImage};

/// Texture format of color targets and debug outputs.
pub(crate) const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
/// Texture format of depth buffers. The only depth format writable from the host.
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth16Unorm;
/// Texture format of velocity buffers.
pub(crate) const VELOCITY_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rg32Float;

fn unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// RGBA8 bytes of a linear color image.
pub(crate) fn color_to_rgba8(image: &ColorImage) -> Vec<u8> {
    image
        .texels()
        .iter()
        .flat_map(|texel| texel.map(unorm8))
        .collect()
}

/// Decodes tightly packed rows out of a padded readback buffer.
pub(crate) fn rgba8_to_color(bytes: &[u8], width: u32, height: u32, padded_row: u32) -> ColorImage {
    ColorImage::from_fn(width, height, |x, y| {
        let at = (y * padded_row + x * 4) as usize;
        match bytes.get(at..at + 4) {
            Some(px) => [
                px[0] as f32 / 255.0,
                px[1] as f32 / 255.0,
                px[2] as f32 / 255.0,
                px[3] as f32 / 255.0,
            ],
            None => [0.0; 4],
        }
    })
}

/// 16-bit unorm depth words.
pub(crate) fn depth_to_unorm16(image: &DepthImage) -> Vec<u16> {
    image
        .texels()
        .iter()
        .map(|d| (d.clamp(0.0, 1.0) * u16::MAX as f32).round() as u16)
        .collect()
}

/// RG32 float texels of a velocity image.
pub(crate) fn velocity_to_rg32(image: &VelocityImage) -> &[u8] {
    bytemuck::cast_slice(image.texels())
}

/// Widens rate codes to the storage-buffer layout.
pub(crate) fn codes_to_words(codes: &[u8]) -> Vec<u32> {
    codes.iter().map(|&c| u32::from(c)).collect()
}

/// Narrows storage-buffer words back to codes. Out-of-range words become
/// `0xFF`, which no rate uses.
pub(crate) fn words_to_codes(bytes: &[u8]) -> Vec<u8> {
    bytes
        .chunks_exact(4)
        .map(|chunk| {
            let word: u32 = bytemuck::pod_read_unaligned(chunk);
            u8::try_from(word).unwrap_or(0xFF)
        })
        .collect()
}

/// Row pitch of a texture-to-buffer copy.
pub(crate) fn padded_bytes_per_row(width: u32, bytes_per_texel: u32) -> u32 {
    let unpadded = width * bytes_per_texel;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}
