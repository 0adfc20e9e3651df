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


//! Experiments: named configuration snapshots run through one dispatcher,
//! [`VrsAgent::run_experiment`](crate::VrsAgent::run_experiment).

use serde::{Deserialize, Serialize};
use vrs_core::{
    RateStatistics, ShadingMode, ShadingRateTileMap, VrsCapabilities, VrsError, VrsSettings,
};

/// One configuration to measure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Name used for reports and exported files.
    pub name: String,
    /// Complete settings applied for the run.
    pub settings: VrsSettings,
    /// Read the rate map back after the frame.
    pub capture_rate_map: bool,
    /// Compute rate statistics after the frame.
    pub capture_statistics: bool,
    /// Baseline run the others are compared against.
    pub control: bool,
}

impl Experiment {
    /// An experiment that captures nothing.
    pub fn new(name: impl Into<String>, settings: VrsSettings) -> Self {
        Self {
            name: name.into(),
            settings,
            capture_rate_map: false,
            capture_statistics: false,
            control: false,
        }
    }

    /// Enables both captures.
    pub fn capturing(mut self) -> Self {
        self.capture_rate_map = true;
        self.capture_statistics = true;
        self
    }

    /// The baseline: `base` with the feature switched off, capturing both.
    pub fn control(base: &VrsSettings) -> Self {
        let mut settings = base.clone();
        settings.enabled = false;
        settings.overlay.enabled = false;
        let mut experiment = Self::new("Control", settings).capturing();
        experiment.control = true;
        experiment
    }
}

/// Sensitivity threshold steps of the contrast-adaptive sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensitivityLevel {
    /// τ = 0.25
    Low,
    /// τ = 0.50
    Medium,
    /// τ = 0.75
    High,
}

impl SensitivityLevel {
    /// All levels, lowest first.
    pub const ALL: [SensitivityLevel; 3] = [
        SensitivityLevel::Low,
        SensitivityLevel::Medium,
        SensitivityLevel::High,
    ];

    /// Sensitivity threshold of the level.
    pub fn threshold(self) -> f32 {
        match self {
            SensitivityLevel::Low => 0.25,
            SensitivityLevel::Medium => 0.50,
            SensitivityLevel::High => 0.75,
        }
    }

    /// Name fragment used in experiment names.
    pub fn name(self) -> &'static str {
        match self {
            SensitivityLevel::Low => "Low",
            SensitivityLevel::Medium => "Medium",
            SensitivityLevel::High => "High",
        }
    }
}

/// An ordered list of experiments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSuite {
    /// Experiments in run order.
    pub experiments: Vec<Experiment>,
}

impl ExperimentSuite {
    /// An empty suite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an experiment.
    pub fn push(&mut self, experiment: Experiment) {
        self.experiments.push(experiment);
    }

    /// Number of experiments.
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Whether the suite is empty.
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Experiments in run order.
    pub fn iter(&self) -> impl Iterator<Item = &Experiment> {
        self.experiments.iter()
    }

    /// The control run followed by the contrast-adaptive sensitivity sweep.
    ///
    /// For the linear model, then the Weber-Fechner model, each sensitivity
    /// level gets a captured run followed by an uncaptured run with the
    /// overlay on (no blending, no grid). Everything else comes from `base`.
    pub fn contrast_adaptive_sweep(base: &VrsSettings) -> Self {
        let mut suite = Self::new();
        suite.push(Experiment::control(base));

        for weber_fechner in [false, true] {
            for level in SensitivityLevel::ALL {
                let mut settings = base.clone();
                settings.enabled = true;
                settings.mode = ShadingMode::ContrastAdaptive;
                settings.contrast_adaptive.use_weber_fechner = weber_fechner;
                settings.contrast_adaptive.dynamic_threshold = false;
                settings
                    .contrast_adaptive
                    .set_sensitivity_threshold(level.threshold());
                settings.overlay.enabled = false;
                settings.overlay.blend_mask = false;
                settings.overlay.draw_grid = false;

                let name = format!(
                    "ContrastAdaptive{}{}",
                    level.name(),
                    if weber_fechner { "WeberFechner" } else { "" }
                );

                let mut overlay = settings.clone();
                overlay.overlay.enabled = true;

                suite.push(Experiment::new(name.clone(), settings).capturing());
                suite.push(Experiment::new(format!("{name}-Overlay"), overlay));
            }
        }
        suite
    }

    /// Parses a RON suite and sanitizes every snapshot against `capabilities`.
    pub fn from_ron_str(source: &str, capabilities: &VrsCapabilities) -> Result<Self, VrsError> {
        let mut suite: ExperimentSuite = ron::de::from_str(source)?;
        for experiment in &mut suite.experiments {
            experiment.settings.sanitize(capabilities);
        }
        Ok(suite)
    }

    /// Serializes to pretty RON.
    pub fn to_ron_string(&self) -> Result<String, VrsError> {
        let pretty_config = ron::ser::PrettyConfig::default().indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty_config)?)
    }
}

/// What one experiment run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentOutcome {
    /// Name of the experiment.
    pub name: String,
    /// Whether it was the control run.
    pub control: bool,
    /// Statistics, when captured.
    pub statistics: Option<RateStatistics>,
    /// The rate map, when captured and available.
    pub rate_map: Option<ShadingRateTileMap>,
}
