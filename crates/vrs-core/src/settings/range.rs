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

/// Declared valid range and default of a numeric parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    /// Parameter name used in diagnostics.
    pub name: &'static str,
    /// Inclusive lower bound.
    pub min: f32,
    /// Inclusive upper bound.
    pub max: f32,
    /// Value used when nothing else is configured, or for NaN input.
    pub default: f32,
}

impl ParamRange {
    /// Declares a range.
    pub const fn new(name: &'static str, min: f32, max: f32, default: f32) -> Self {
        Self {
            name,
            min,
            max,
            default,
        }
    }

    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamps `value` into the range, warning when it had to be changed.
    pub fn clamp(&self, value: f32) -> f32 {
        let clamped = self.saturate(value);
        if clamped != value {
            log::warn!(
                "{} = {value} is outside [{}, {}], using {clamped}",
                self.name,
                self.min,
                self.max
            );
        }
        clamped
    }

    /// Clamps `value` into the range without any diagnostic. NaN becomes the
    /// default.
    pub fn saturate(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        }
    }
}
