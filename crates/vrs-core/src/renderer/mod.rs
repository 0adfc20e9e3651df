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

//! Backend-facing contracts: the device trait, the passes it executes, the
//! binding state it applies to draws, and the scene images it reads.

pub mod binding;
pub mod device;
pub mod error;
pub mod image;
pub mod pass;

pub use self::binding::*;
pub use self::device::*;
pub use self::error::*;
pub use self::image::*;
pub use self::pass::*;
