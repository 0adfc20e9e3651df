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


//! A shading-rate device running the WGSL rate-map passes on wgpu.
//!
//! wgpu has no shading-rate image API. The device keeps the rate map in a
//! storage buffer, one `u32` code per tile, which renderers bind and read in
//! their own fragment shaders. Capabilities are therefore the emulated
//! support the device was created with.

mod conversions;
mod device;
mod pipelines;

pub use device::*;
