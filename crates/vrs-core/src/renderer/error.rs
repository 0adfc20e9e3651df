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

//! Error type shared by devices, lanes and agents.
//!
//! Degraded modes (missing hardware support, clamped parameters, unknown
//! configuration tokens) are not errors. These variants cover collaborator
//! failures only.

use super::device::{SceneInput, TextureId};
use std::fmt;

/// A failure reported by a shading-rate backend or while loading settings.
#[derive(Debug)]
pub enum VrsError {
    /// The hardware or driver cannot perform the requested operation.
    Unsupported(String),
    /// A rate-map operation was issued before the rate map was created.
    RateMapNotCreated,
    /// A scene image the pass reads or writes is not bound.
    MissingSceneInput(SceneInput),
    /// A texture ID does not refer to a live image of the expected kind.
    UnknownTexture {
        /// The offending ID.
        id: TextureId,
        /// Which input it was bound as.
        input: SceneInput,
    },
    /// A scene image does not match the extent the pass was set up for.
    ExtentMismatch {
        /// Which input mismatched.
        input: SceneInput,
        /// Extent the pass expected.
        expected: (u32, u32),
        /// Extent of the bound image.
        actual: (u32, u32),
    },
    /// Copying the rate map back to host memory failed.
    Readback(String),
    /// A settings document could not be parsed or written.
    Settings(String),
    /// Any other backend failure (device lost, poisoned lock, ...).
    Backend(String),
}

impl fmt::Display for VrsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VrsError::Unsupported(what) => write!(f, "Unsupported: {what}"),
            VrsError::RateMapNotCreated => write!(f, "Shading-rate map has not been created"),
            VrsError::MissingSceneInput(input) => {
                write!(f, "Scene input {input:?} is not bound")
            }
            VrsError::UnknownTexture { id, input } => {
                write!(f, "Texture {id:?} bound as {input:?} does not exist")
            }
            VrsError::ExtentMismatch {
                input,
                expected,
                actual,
            } => write!(
                f,
                "Scene input {input:?} is {}x{}, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            VrsError::Readback(details) => write!(f, "Rate-map readback failed: {details}"),
            VrsError::Settings(details) => write!(f, "Invalid settings: {details}"),
            VrsError::Backend(details) => write!(f, "Backend error: {details}"),
        }
    }
}

impl std::error::Error for VrsError {}

impl From<ron::error::SpannedError> for VrsError {
    fn from(e: ron::error::SpannedError) -> Self {
        VrsError::Settings(e.to_string())
    }
}

impl From<ron::Error> for VrsError {
    fn from(e: ron::Error) -> Self {
        VrsError::Settings(e.to_string())
    }
}

impl From<serde_json::Error> for VrsError {
    fn from(e: serde_json::Error) -> Self {
        VrsError::Settings(e.to_string())
    }
}
