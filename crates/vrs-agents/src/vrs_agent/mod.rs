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


//! Acts as the **[A]gent** for variable rate shading.
//!
//! The agent decides *which* lane runs and in what order. The lanes decide
//! *what* each tile's rate is. Per frame the host calls, in order:
//!
//! 1. [`VrsAgent::update`] with the measured GPU time and pointer position,
//! 2. [`VrsAgent::render`] to record generation, filtering and the overlay,
//! 3. [`VrsAgent::bind`] around the variable-rate draws and
//!    [`VrsAgent::clear`] after them,
//! 4. [`VrsAgent::end_frame`], which refreshes statistics when enabled.

mod agent;
mod pointer;

pub use agent::*;
pub use pointer::PointerTracker;
