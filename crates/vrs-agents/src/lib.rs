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


//! # VRS Agents
//!
//! The orchestration layer of the shading-rate engine. [`VrsAgent`] owns the
//! session capabilities and configuration, selects the lane for the active
//! mode every frame, sequences generation, post-filtering and the debug
//! overlay, and exposes the binding and statistics the renderer consumes.

pub mod experiment;
pub mod export;
pub mod vrs_agent;

pub use experiment::{Experiment, ExperimentOutcome, ExperimentSuite};
pub use vrs_agent::*;
