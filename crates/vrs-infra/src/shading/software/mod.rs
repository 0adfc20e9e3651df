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


//! A shading-rate device that runs every pass on the host.
//!
//! Scene images are registered up front and addressed by [`TextureId`]. Rate
//! map passes go through [`vrs_lanes::kernels::run_pass`], so results match
//! the WGSL passes tile for tile.

mod device;

pub use device::*;
