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

//! # VRS Lanes
//!
//! The strategies that decide, per tile, which shading rate to apply.
//!
//! - [`rate_lane`]: one [`Lane`](vrs_core::lane::Lane) per generator mode, plus
//!   the single-elimination post-filter and the debug overlay.
//! - [`kernels`]: host reference implementations of every GPU pass. Software
//!   devices execute them directly; the WGSL in [`shaders`] mirrors them.

pub mod kernels;
pub mod rate_lane;
pub mod shaders;

pub use kernels::KernelError;
pub use rate_lane::*;
