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

//! # Lane Abstraction
//!
//! A **Lane** is a swappable processing strategy owned by an agent. Every
//! shading-rate generator, the post-filter and the debug overlay are lanes.
//!
//! The agent fills a [`LaneContext`] with the frame's inputs (device, targets,
//! settings, capabilities, grid) and hands it to one lane at a time:
//!
//! ```rust,ignore
//! use vrs_core::lane::{Lane, LaneContext, LaneError, LaneKind};
//!
//! struct FullRateLane;
//!
//! impl Lane for FullRateLane {
//!     fn strategy_name(&self) -> &'static str { "FullRate" }
//!     fn lane_kind(&self) -> LaneKind { LaneKind::Generator }
//!
//!     fn execute(&self, ctx: &mut LaneContext) -> Result<(), LaneError> {
//!         let device = ctx.get::<ShadingDevice>().ok_or(LaneError::missing("ShadingDevice"))?;
//!         // ...
//!         Ok(())
//!     }
//!
//!     fn as_any(&self) -> &dyn std::any::Any { self }
//! }
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

pub mod context_keys;
pub use context_keys::*;

/// Error type for lane operations.
#[derive(Debug)]
pub enum LaneError {
    /// A value the lane needs was not present in the [`LaneContext`].
    InvalidContext {
        /// What the lane expected.
        expected: &'static str,
        /// Description of what was received.
        received: String,
    },
    /// A scene input (depth, color, velocity, ...) needed by the pass is absent.
    MissingSceneInput(&'static str),
    /// The device failed while recording or executing the lane's work.
    ExecutionFailed(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for LaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneError::InvalidContext { expected, received } => {
                write!(
                    f,
                    "Invalid lane context: expected {expected}, got {received}"
                )
            }
            LaneError::MissingSceneInput(name) => write!(f, "Missing scene input: {name}"),
            LaneError::ExecutionFailed(e) => write!(f, "Lane execution failed: {e}"),
        }
    }
}

impl std::error::Error for LaneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaneError::ExecutionFailed(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl LaneError {
    /// Convenience constructor for a missing context entry.
    pub fn missing(type_name: &'static str) -> Self {
        LaneError::InvalidContext {
            expected: type_name,
            received: "not found in LaneContext".into(),
        }
    }
}

impl From<crate::renderer::VrsError> for LaneError {
    fn from(e: crate::renderer::VrsError) -> Self {
        match e {
            crate::renderer::VrsError::MissingSceneInput(input) => {
                LaneError::MissingSceneInput(input.name())
            }
            other => LaneError::ExecutionFailed(Box::new(other)),
        }
    }
}

/// Classification of lane types, used for routing and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Writes a complete shading-rate map for the frame.
    Generator,
    /// Refines the generated map in place.
    PostFilter,
    /// Visualizes the map without modifying it.
    Overlay,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaneKind::Generator => write!(f, "Generator"),
            LaneKind::PostFilter => write!(f, "PostFilter"),
            LaneKind::Overlay => write!(f, "Overlay"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LaneContext: generic type-map for passing data to lanes
// ─────────────────────────────────────────────────────────────────────────────

/// A type-erased, extensible context for passing data to lanes.
///
/// Agents populate a `LaneContext` with the data their lanes need, then pass
/// it to [`Lane::execute`]. Lanes retrieve values by type.
///
/// ```rust,ignore
/// let mut ctx = LaneContext::new();
/// ctx.insert(TileGrid::new(120, 68));
/// assert_eq!(ctx.get::<TileGrid>().map(|g| g.width), Some(120));
/// ```
pub struct LaneContext {
    data: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl LaneContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Inserts a value, keyed by its concrete type.
    ///
    /// If a value of the same type was already present, it is replaced.
    pub fn insert<T: 'static + Send + Sync>(&mut self, value: T) {
        self.data.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Returns a shared reference to a value by type.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.data.get(&TypeId::of::<T>())?.downcast_ref()
    }

    /// Returns a mutable reference to a value by type.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.data.get_mut(&TypeId::of::<T>())?.downcast_mut()
    }

    /// Returns the value of type `T` or a [`LaneError::InvalidContext`].
    pub fn require<T: 'static>(&self) -> Result<&T, LaneError> {
        self.get::<T>()
            .ok_or_else(|| LaneError::missing(std::any::type_name::<T>()))
    }

    /// Checks whether a value of the given type is present.
    pub fn contains<T: 'static>(&self) -> bool {
        self.data.contains_key(&TypeId::of::<T>())
    }

    /// Removes and returns a value by type.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.data
            .remove(&TypeId::of::<T>())
            .and_then(|b| b.downcast().ok().map(|b| *b))
    }
}

impl Default for LaneContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LaneContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaneContext")
            .field("entries", &self.data.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// LaneRegistry: generic container for heterogeneous lanes
// ─────────────────────────────────────────────────────────────────────────────

/// A registry that stores [`Lane`] trait objects for agent use.
///
/// Custom strategies can be registered under an existing strategy name to
/// replace a built-in lane; the most recently registered lane wins.
pub struct LaneRegistry {
    lanes: Vec<Box<dyn Lane>>,
}

impl LaneRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { lanes: Vec::new() }
    }

    /// Adds a lane to the registry.
    pub fn register(&mut self, lane: Box<dyn Lane>) {
        self.lanes.push(lane);
    }

    /// Finds a lane by its strategy name.
    pub fn get(&self, name: &str) -> Option<&dyn Lane> {
        self.lanes
            .iter()
            .rev()
            .find(|l| l.strategy_name() == name)
            .map(|b| b.as_ref())
    }

    /// Returns all lanes of a given kind.
    pub fn find_by_kind(&self, kind: LaneKind) -> Vec<&dyn Lane> {
        self.lanes
            .iter()
            .filter(|l| l.lane_kind() == kind)
            .map(|b| b.as_ref())
            .collect()
    }

    /// Returns a slice of all registered lanes.
    pub fn all(&self) -> &[Box<dyn Lane>] {
        &self.lanes
    }

    /// Returns the number of registered lanes.
    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    /// Returns `true` if no lanes are registered.
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }
}

impl Default for LaneRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LaneRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.lanes.iter().map(|l| l.strategy_name()))
            .finish()
    }
}

/// Base trait for every lane.
///
/// ## Lifecycle
///
/// ```text
/// on_initialize(ctx)  →  [ execute(ctx) ]*  →  on_shutdown(ctx)
/// ```
pub trait Lane: Send + Sync {
    /// Name identifying this lane's strategy, unique per kind.
    fn strategy_name(&self) -> &'static str;

    /// The kind of processing this lane performs.
    fn lane_kind(&self) -> LaneKind;

    /// Called once when the owning agent initializes or its target is resized.
    ///
    /// Default is a no-op returning `Ok(())`.
    fn on_initialize(&self, _ctx: &mut LaneContext) -> Result<(), LaneError> {
        Ok(())
    }

    /// Records this lane's work for the current frame.
    fn execute(&self, ctx: &mut LaneContext) -> Result<(), LaneError>;

    /// Called when the owning agent shuts down.
    fn on_shutdown(&self, _ctx: &mut LaneContext) {}

    /// Downcast to a concrete type for type-specific operations.
    fn as_any(&self) -> &dyn Any;
}
