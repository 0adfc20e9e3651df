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

//! # VRS Core
//!
//! Foundational crate containing the types, traits and interface contracts of
//! the variable rate shading decision engine.
//!
//! Nothing in here talks to a GPU. Backends implement [`renderer::ShadingRateDevice`]
//! and [`capability::CapabilitySource`]; strategies implement [`lane::Lane`].

#![warn(missing_docs)]

pub mod capability;
pub mod lane;
pub mod rate;
pub mod renderer;
pub mod settings;

pub use capability::{CapabilitySource, ShadingRateSupport, ShadingRateTier, VrsCapabilities};
pub use rate::{
    RateLadder, RateStatistics, ShadingRate, ShadingRateCombiner, ShadingRateTileMap, TileGrid,
};
pub use renderer::VrsError;
pub use settings::{ShadingMode, VrsSettings};
