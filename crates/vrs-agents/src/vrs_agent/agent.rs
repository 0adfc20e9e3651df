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


//! Defines the VrsAgent, the per-frame orchestrator of the shading-rate map.

use super::pointer::PointerTracker;
use crate::experiment::{Experiment, ExperimentOutcome};
use std::sync::Arc;
use std::time::{Duration, Instant};
use vrs_core::capability::{self, ShadingRateTier, VrsCapabilities};
use vrs_core::lane::{FrameInputs, Lane, LaneContext, LaneError, LaneRegistry, ShadingDevice};
use vrs_core::renderer::{RateMapState, SceneTargets, ShadingRateBinding, ShadingRateDevice};
use vrs_core::settings::{PostFilter, StartupOverrides};
use vrs_core::{
    RateStatistics, ShadingMode, ShadingRate, ShadingRateTileMap, TileGrid, VrsError, VrsSettings,
};
use vrs_lanes::{generator_lanes, upload_full_rate, DebugOverlayLane, SingleEliminationLane};

const POST_FILTER_LANE: &str = "SingleElimination";
const OVERLAY_LANE: &str = "DebugOverlay";

/// Measurements of the previous frame fed to [`VrsAgent::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTelemetry {
    /// GPU time of the previous frame in milliseconds, if measured.
    pub gpu_frame_time_ms: Option<f32>,
    /// Pointer position in render-target pixels, if known.
    pub pointer: Option<(f32, f32)>,
}

/// The agent responsible for the shading-rate map of one render target.
pub struct VrsAgent {
    // Device owning the GPU-resident rate map.
    device: Arc<dyn ShadingRateDevice>,
    // Generators, the post-filter and the overlay. Later registrations win.
    lanes: LaneRegistry,
    // Probed once at creation.
    capabilities: VrsCapabilities,
    settings: VrsSettings,
    // Grid of the rate map. Empty below tier 2.
    grid: TileGrid,
    targets: SceneTargets,
    // Binding most recently applied to the device.
    binding: ShadingRateBinding,
    statistics: RateStatistics,
    pointer: PointerTracker,
    initialized: bool,
    // Whether the map holds a generated frame since the last (re)allocation.
    frame_generated: bool,
    // Duration of the last render() call.
    last_render_time: Duration,
    frame_count: u64,
}

impl VrsAgent {
    /// Creates an agent for `device`, probing its capabilities once.
    pub fn new(device: Arc<dyn ShadingRateDevice>) -> Self {
        let capabilities = capability::probe(device.as_ref());

        let mut lanes = LaneRegistry::new();
        for lane in generator_lanes() {
            lanes.register(lane);
        }
        lanes.register(Box::new(SingleEliminationLane::new()));
        lanes.register(Box::new(DebugOverlayLane::new()));

        let mut settings = VrsSettings::default();
        settings.sanitize(&capabilities);

        Self {
            device,
            lanes,
            capabilities,
            settings,
            grid: TileGrid::new(0, 0),
            targets: SceneTargets::default(),
            binding: ShadingRateBinding::FULL_RATE,
            statistics: RateStatistics::full_rate(),
            pointer: PointerTracker::new(),
            initialized: false,
            frame_generated: false,
            last_render_time: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Creates an agent with the given configuration.
    pub fn with_settings(device: Arc<dyn ShadingRateDevice>, settings: VrsSettings) -> Self {
        let mut agent = Self::new(device);
        agent.set_settings(settings);
        agent
    }

    /// Registers a lane. A lane with the same strategy name as an existing
    /// one replaces it for selection.
    pub fn add_lane(&mut self, lane: Box<dyn Lane>) {
        if self.initialized && self.capabilities.supports_tile_map() {
            let mut ctx = self.lane_context();
            if let Err(e) = lane.on_initialize(&mut ctx) {
                log::error!("Failed to initialize VRS lane {}: {}", lane.strategy_name(), e);
            }
        }
        self.lanes.register(lane);
    }

    /// The registered lanes.
    pub fn lanes(&self) -> &LaneRegistry {
        &self.lanes
    }

    /// Session capabilities.
    pub fn capabilities(&self) -> &VrsCapabilities {
        &self.capabilities
    }

    /// Current configuration.
    pub fn settings(&self) -> &VrsSettings {
        &self.settings
    }

    /// Mutable access to the configuration. Setters on the per-mode groups
    /// clamp on their own; call [`VrsAgent::set_settings`] to re-apply the
    /// capability gates after replacing fields wholesale.
    pub fn settings_mut(&mut self) -> &mut VrsSettings {
        &mut self.settings
    }

    /// Replaces the configuration, sanitized against the capabilities.
    ///
    /// Pointer tracking starts over from the new foveated offset.
    pub fn set_settings(&mut self, mut settings: VrsSettings) {
        settings.sanitize(&self.capabilities);
        if !settings.enabled {
            settings.overlay.enabled = false;
        }
        self.settings = settings;
        self.pointer = PointerTracker::new();
    }

    /// Sets the tier-1 rate, gated on the capabilities. Returns the rate applied.
    pub fn set_tier1_rate(&mut self, rate: ShadingRate) -> ShadingRate {
        self.settings.set_tier1_rate(rate, &self.capabilities)
    }

    /// Applies textual startup overrides.
    pub fn apply_overrides(&mut self, overrides: &StartupOverrides) {
        overrides.apply(&mut self.settings, &self.capabilities);
        if !self.settings.enabled {
            self.settings.overlay.enabled = false;
        }
    }

    /// Grid of the rate map.
    pub fn grid(&self) -> TileGrid {
        self.grid
    }

    /// Scene images of the current frame.
    pub fn targets(&self) -> &SceneTargets {
        &self.targets
    }

    /// Binding most recently applied.
    pub fn binding(&self) -> ShadingRateBinding {
        self.binding
    }

    /// Last computed statistics.
    pub fn statistics(&self) -> RateStatistics {
        self.statistics
    }

    /// Whether the map holds a generated frame.
    pub fn has_generated_frame(&self) -> bool {
        self.frame_generated
    }

    /// Frames rendered since creation.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// CPU time spent recording the last frame.
    pub fn last_render_time(&self) -> Duration {
        self.last_render_time
    }

    /// Allocates the rate map for `targets` and initializes every lane.
    ///
    /// Also used on resize. The new map starts at full rate and counts as
    /// not generated.
    pub fn initialize(&mut self, targets: SceneTargets) -> Result<(), VrsError> {
        self.targets = targets;
        self.frame_generated = false;

        if !self.capabilities.supports_tile_map() {
            self.grid = TileGrid::new(0, 0);
            self.initialized = true;
            log::info!(
                "VRS agent initialized at {} without a rate map",
                self.capabilities.tier
            );
            return Ok(());
        }

        self.grid =
            TileGrid::for_extent(targets.width, targets.height, self.capabilities.tile_size);
        self.device.create_rate_map(self.grid)?;

        let mut ctx = self.lane_context();
        for lane in self.lanes.all() {
            if let Err(e) = lane.on_initialize(&mut ctx) {
                log::error!("Failed to initialize VRS lane {}: {}", lane.strategy_name(), e);
            }
        }

        self.initialized = true;
        log::info!(
            "VRS agent initialized: {}x{} tiles of {}px for a {}x{} target",
            self.grid.width,
            self.grid.height,
            self.capabilities.tile_size,
            targets.width,
            targets.height
        );
        Ok(())
    }

    /// Rebinds the scene images for the coming frame, reallocating the map
    /// when the extent changed.
    pub fn set_targets(&mut self, targets: SceneTargets) -> Result<(), VrsError> {
        let resized = (targets.width, targets.height) != (self.targets.width, self.targets.height);
        if !self.initialized || resized {
            return self.initialize(targets);
        }
        self.targets = targets;
        Ok(())
    }

    /// Per-frame configuration update: pointer tracking and the dynamic
    /// contrast threshold. Only runs at tier 2.
    pub fn update(&mut self, telemetry: &FrameTelemetry) {
        if !self.capabilities.supports_tile_map() {
            return;
        }

        self.pointer.update(
            &mut self.settings.foveated,
            telemetry.pointer,
            self.grid,
            self.capabilities.tile_size,
        );

        let contrast = &mut self.settings.contrast_adaptive;
        if self.settings.mode == ShadingMode::ContrastAdaptive && contrast.dynamic_threshold {
            if let Some(gpu_ms) = telemetry.gpu_frame_time_ms {
                let target_ms = contrast.target_frame_time_ms();
                contrast.set_dynamic_sensitivity_threshold(gpu_ms / target_ms);
                log::trace!(
                    "Dynamic sensitivity threshold {:.3} from {gpu_ms:.2}ms",
                    contrast.sensitivity_threshold()
                );
            }
        }
    }

    /// Records the rate map for this frame: generation, then the post-filter
    /// and the debug overlay when requested, then the transition to
    /// shading-rate source.
    ///
    /// Does nothing when disabled or below tier 2. The compute-diagnostic
    /// mode skips the post-filter and the overlay.
    pub fn render(&mut self) -> Result<(), VrsError> {
        if !self.settings.enabled {
            self.settings.overlay.enabled = false;
            return Ok(());
        }
        if !self.capabilities.supports_tile_map() {
            return Ok(());
        }
        if !self.initialized {
            return Err(VrsError::RateMapNotCreated);
        }
        if self.grid.is_empty() {
            log::trace!("Render target is empty, no rate map to generate");
            return Ok(());
        }

        let frame_start = Instant::now();
        if let Err(e) = self.record_frame() {
            // The map may be partially written.
            self.frame_generated = false;
            return Err(e);
        }

        self.frame_generated = true;
        self.frame_count += 1;
        self.last_render_time = frame_start.elapsed();
        log::trace!(
            "VRS frame {} recorded in {:.3}ms",
            self.frame_count,
            self.last_render_time.as_secs_f32() * 1000.0
        );
        Ok(())
    }

    /// Binds the variable-rate state for the draws that follow.
    pub fn bind(&mut self) -> Result<ShadingRateBinding, VrsError> {
        let binding = ShadingRateBinding::resolve(&self.capabilities, &self.settings);
        self.apply_binding(binding)?;
        Ok(binding)
    }

    /// Binds full rate for a "hero" object inside a variable-rate region.
    pub fn bind_hero(&mut self) -> Result<ShadingRateBinding, VrsError> {
        let binding = ShadingRateBinding::resolve(&self.capabilities, &self.settings).hero();
        self.apply_binding(binding)?;
        Ok(binding)
    }

    /// Detaches the rate map and combiners after the variable-rate region.
    pub fn clear(&mut self) -> Result<(), VrsError> {
        self.apply_binding(self.binding.cleared())
    }

    /// The rate a pixel is shaded at under the current binding.
    pub fn effective_rate(
        &self,
        primitive: Option<ShadingRate>,
        tile: Option<ShadingRate>,
    ) -> ShadingRate {
        self.binding
            .effective_rate(primitive, tile, self.capabilities.additional_rates)
    }

    /// Refreshes and returns the rate statistics.
    ///
    /// Only a tier-2 session with a generated frame reads the map back; that
    /// readback is the one point where the CPU waits for the GPU.
    pub fn compute_statistics(&mut self) -> Result<RateStatistics, VrsError> {
        let statistics = if !self.settings.enabled {
            RateStatistics::full_rate()
        } else {
            match self.capabilities.tier {
                ShadingRateTier::NotSupported => RateStatistics::full_rate(),
                ShadingRateTier::Tier1 => RateStatistics::uniform(self.settings.tier1_rate()),
                ShadingRateTier::Tier2 => {
                    if !self.frame_generated {
                        log::warn!(
                            "Rate statistics requested before a rate map was generated, keeping the previous values"
                        );
                        return Ok(self.statistics);
                    }
                    RateStatistics::from_tile_map(&self.read_back()?)
                }
            }
        };
        self.statistics = statistics;
        Ok(statistics)
    }

    /// Copies the generated rate map to host memory.
    ///
    /// `None` when there is nothing to read: disabled, below tier 2, or no
    /// frame generated yet.
    pub fn read_back_rate_map(&self) -> Result<Option<ShadingRateTileMap>, VrsError> {
        if !self.settings.enabled || !self.capabilities.supports_tile_map() {
            log::debug!("No rate map to read back");
            return Ok(None);
        }
        if !self.frame_generated {
            log::warn!("Rate map readback requested before a rate map was generated");
            return Ok(None);
        }
        self.read_back().map(Some)
    }

    /// End-of-frame bookkeeping: refreshes statistics when enabled.
    pub fn end_frame(&mut self) -> Result<(), VrsError> {
        if self.settings.calculate_statistics {
            self.compute_statistics()?;
        }
        Ok(())
    }

    /// Runs one experiment: applies its snapshot, renders a frame, captures
    /// what it asks for and restores the previous configuration.
    pub fn run_experiment(
        &mut self,
        experiment: &Experiment,
    ) -> Result<ExperimentOutcome, VrsError> {
        log::info!("Running experiment '{}'", experiment.name);
        let previous = self.settings.clone();
        let pointer = self.pointer;
        self.set_settings(experiment.settings.clone());
        let outcome = self.capture_experiment(experiment);
        self.settings = previous;
        self.pointer = pointer;
        outcome
    }

    /// Shuts every lane down and releases the frame state.
    pub fn shutdown(&mut self) {
        let mut ctx = self.lane_context();
        for lane in self.lanes.all() {
            lane.on_shutdown(&mut ctx);
        }
        self.initialized = false;
        self.frame_generated = false;
        self.binding = ShadingRateBinding::FULL_RATE;
        log::info!("VRS agent shut down after {} frames", self.frame_count);
    }

    fn capture_experiment(
        &mut self,
        experiment: &Experiment,
    ) -> Result<ExperimentOutcome, VrsError> {
        self.render()?;
        let statistics = if experiment.capture_statistics {
            Some(self.compute_statistics()?)
        } else {
            None
        };
        let rate_map = if experiment.capture_rate_map {
            self.read_back_rate_map()?
        } else {
            None
        };
        Ok(ExperimentOutcome {
            name: experiment.name.clone(),
            control: experiment.control,
            statistics,
            rate_map,
        })
    }

    fn record_frame(&self) -> Result<(), VrsError> {
        let mut ctx = self.lane_context();

        self.device.transition_rate_map(RateMapState::Unordered)?;
        self.run_generator(&mut ctx)?;

        if self.settings.mode != ShadingMode::ComputeDiagnostic {
            if self.settings.post_filter != PostFilter::None {
                self.run_optional_lane(POST_FILTER_LANE, &mut ctx)?;
            }
            if self.settings.overlay.enabled {
                self.run_optional_lane(OVERLAY_LANE, &mut ctx)?;
            }
        }

        self.device
            .transition_rate_map(RateMapState::ShadingRateSource)
    }

    fn lane_context(&self) -> LaneContext {
        let mut ctx = LaneContext::new();
        ctx.insert(ShadingDevice(self.device.clone()));
        ctx.insert(FrameInputs {
            settings: self.settings.clone(),
            capabilities: self.capabilities,
            grid: self.grid,
            targets: self.targets,
        });
        ctx
    }

    fn run_generator(&self, ctx: &mut LaneContext) -> Result<(), VrsError> {
        let name = self.settings.mode.strategy_name();
        let Some(lane) = self.lanes.get(name) else {
            log::warn!("No lane registered for {name}, shading at full rate");
            return upload_full_rate(self.device.as_ref(), self.grid)
                .map_err(|e| lane_failure(name, e));
        };
        match lane.execute(ctx) {
            Ok(()) => Ok(()),
            Err(LaneError::MissingSceneInput(input)) => {
                log::warn!("{name} needs the {input} image, shading at full rate this frame");
                upload_full_rate(self.device.as_ref(), self.grid).map_err(|e| lane_failure(name, e))
            }
            Err(e) => Err(lane_failure(name, e)),
        }
    }

    fn run_optional_lane(&self, name: &str, ctx: &mut LaneContext) -> Result<(), VrsError> {
        let Some(lane) = self.lanes.get(name) else {
            log::debug!("No {name} lane registered");
            return Ok(());
        };
        match lane.execute(ctx) {
            Ok(()) => Ok(()),
            Err(LaneError::MissingSceneInput(input)) => {
                log::warn!("{name} skipped, the {input} image is not bound");
                Ok(())
            }
            Err(e) => Err(lane_failure(name, e)),
        }
    }

    fn apply_binding(&mut self, binding: ShadingRateBinding) -> Result<(), VrsError> {
        self.binding = binding;
        if !self.capabilities.is_supported() {
            return Ok(());
        }
        self.device.bind_shading_rate(&binding)
    }

    fn read_back(&self) -> Result<ShadingRateTileMap, VrsError> {
        self.device.transition_rate_map(RateMapState::CopySource)?;
        let map = self.device.read_back_rate_map();
        self.device
            .transition_rate_map(RateMapState::ShadingRateSource)?;
        map
    }
}

fn lane_failure(lane: &str, e: LaneError) -> VrsError {
    VrsError::Backend(format!("VRS lane {lane} failed: {e}"))
}

impl std::fmt::Debug for VrsAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VrsAgent")
            .field("capabilities", &self.capabilities)
            .field("mode", &self.settings.mode)
            .field("grid", &self.grid)
            .field("lanes", &self.lanes)
            .field("frame_count", &self.frame_count)
            .finish()
    }
}
