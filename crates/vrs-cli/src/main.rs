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


//! Headless driver: renders shading-rate maps for a synthetic frame and
//! reports how the tiles are distributed across rates.
//!
//! ```text
//! vrs --width 1920 --height 1080 --set mode=ContrastAdaptive --export rates.png
//! vrs --config vrs.ron --sweep
//! ```

mod backend;
mod scene;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use vrs_agents::export::{rate_map_image, rate_map_image_per_pixel};
use vrs_agents::{ExperimentSuite, FrameTelemetry, VrsAgent};
use vrs_core::settings::StartupOverrides;
use vrs_core::{ShadingRateTier, ShadingRateTileMap, VrsCapabilities, VrsSettings};

use backend::{Backend, BackendKind};
use scene::SyntheticScene;

#[derive(Parser, Debug)]
#[command(
    name = "vrs",
    about = "Render variable-rate shading maps for a synthetic frame."
)]
struct Args {
    /// Device to run the rate-map passes on
    #[arg(long, value_enum, default_value_t = BackendKind::Software)]
    backend: BackendKind,

    /// Render target width in pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Render target height in pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Tile size reported by the device (8, 16 or 32)
    #[arg(long, default_value_t = 16)]
    tile_size: u32,

    /// Emulate tier-1 hardware (a single rate per draw)
    #[arg(long, action = clap::ArgAction::SetTrue)]
    tier1: bool,

    /// Settings file, RON or JSON by extension
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Settings override, e.g. `mode=Foveated` or `overlay=on`
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Frames to render before reporting
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// GPU frame time fed to the dynamic threshold, in milliseconds
    #[arg(long, value_name = "MS")]
    gpu_frame_ms: Option<f32>,

    /// Pointer position in pixels, as `X,Y`
    #[arg(long, value_name = "X,Y", value_parser = parse_pointer)]
    pointer: Option<(f32, f32)>,

    /// Write the rate map as a grayscale PNG
    #[arg(long, value_name = "PATH")]
    export: Option<PathBuf>,

    /// Export one pixel per render-target pixel instead of one per tile
    #[arg(long, action = clap::ArgAction::SetTrue)]
    per_pixel: bool,

    /// Write the debug output image as a PNG
    #[arg(long, value_name = "PATH")]
    debug_output: Option<PathBuf>,

    /// Run the experiments of a RON suite file
    #[arg(long, value_name = "PATH")]
    experiments: Option<PathBuf>,

    /// Run the built-in contrast-adaptive sensitivity sweep
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "experiments")]
    sweep: bool,

    /// Directory receiving one rate-map PNG per experiment
    #[arg(long, value_name = "DIR")]
    experiment_dir: Option<PathBuf>,

    /// Write the effective settings as RON
    #[arg(long, value_name = "PATH")]
    dump_settings: Option<PathBuf>,
}

fn parse_pointer(value: &str) -> Result<(f32, f32), String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got '{value}'"))?;
    let x = x.trim().parse::<f32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|e| e.to_string())?;
    Ok((x, y))
}

fn load_settings(path: &Path, capabilities: &VrsCapabilities) -> Result<VrsSettings> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    let settings = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => VrsSettings::from_json_str(&source, capabilities),
        _ => VrsSettings::from_ron_str(&source, capabilities),
    }
    .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(settings)
}

fn save_rate_map(
    map: &ShadingRateTileMap,
    tile_size: u32,
    per_pixel: bool,
    path: &Path,
) -> Result<()> {
    let image = if per_pixel {
        rate_map_image_per_pixel(map, tile_size)
    } else {
        rate_map_image(map)
    };
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Rate map written to {}", path.display());
    Ok(())
}

fn run_experiments(agent: &mut VrsAgent, args: &Args) -> Result<()> {
    let suite = if let Some(path) = &args.experiments {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read experiments from {}", path.display()))?;
        ExperimentSuite::from_ron_str(&source, agent.capabilities())
            .with_context(|| format!("Failed to parse {}", path.display()))?
    } else if args.sweep {
        ExperimentSuite::contrast_adaptive_sweep(agent.settings())
    } else {
        return Ok(());
    };

    if let Some(dir) = &args.experiment_dir {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let tile_size = agent.capabilities().tile_size;

    for experiment in suite.iter() {
        let outcome = agent.run_experiment(experiment)?;
        match &outcome.statistics {
            Some(stats) => println!("{:<32} {stats}", outcome.name),
            None => println!("{:<32} (no statistics)", outcome.name),
        }
        if let (Some(dir), Some(map)) = (&args.experiment_dir, &outcome.rate_map) {
            let path = dir.join(format!("{}.png", outcome.name));
            save_rate_map(map, tile_size, args.per_pixel, &path)?;
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        bail!("Render target must not be empty, got {}x{}", args.width, args.height);
    }
    let tier = if args.tier1 {
        ShadingRateTier::Tier1
    } else {
        ShadingRateTier::Tier2
    };
    let backend = Backend::create(args.backend, args.tile_size, tier)?;
    let scene = SyntheticScene::new(args.width, args.height);
    let targets = backend.register_scene(&scene)?;

    let mut agent = VrsAgent::new(backend.device());
    if let Some(path) = &args.config {
        let settings = load_settings(path, agent.capabilities())?;
        agent.set_settings(settings);
    }
    agent.apply_overrides(&StartupOverrides::parse(&args.overrides));
    agent.initialize(targets)?;

    let telemetry = FrameTelemetry {
        gpu_frame_time_ms: args.gpu_frame_ms,
        pointer: args.pointer,
    };
    for _ in 0..args.frames {
        agent.update(&telemetry);
        agent.render()?;
        agent.bind()?;
        agent.clear()?;
        agent.end_frame()?;
    }
    log::info!(
        "Rendered {} frame(s), last in {:?}",
        agent.frame_count(),
        agent.last_render_time()
    );

    let stats = agent.compute_statistics()?;
    println!("{:<32} {stats}", agent.settings().mode.strategy_name());

    if let Some(path) = &args.export {
        match agent.read_back_rate_map()? {
            Some(map) => save_rate_map(&map, agent.capabilities().tile_size, args.per_pixel, path)?,
            None => log::warn!("No rate map to export at {}", agent.capabilities().tier),
        }
    }

    if let Some(path) = &args.debug_output {
        let id = agent
            .targets()
            .debug_output
            .context("No debug output is bound")?;
        let output = backend.read_color(id)?;
        let png = image::RgbaImage::from_fn(output.width(), output.height(), |x, y| {
            image::Rgba(output.get(x, y).map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
        });
        png.save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Debug output written to {}", path.display());
    }

    run_experiments(&mut agent, &args)?;

    if let Some(path) = &args.dump_settings {
        fs::write(path, agent.settings().to_ron_string()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    agent.shutdown();
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .filter_module("wgpu_core", log::LevelFilter::Warn)
        .init();
    run(Args::parse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_pointer() {
        assert_eq!(parse_pointer("12.5, 40"), Ok((12.5, 40.0)));
        assert!(parse_pointer("12").is_err());
        assert!(parse_pointer("a,b").is_err());
    }

    #[test]
    fn test_args_defaults_and_overrides() {
        let args = Args::try_parse_from([
            "vrs",
            "--set",
            "mode=Foveated",
            "--set",
            "overlay=on",
            "--pointer",
            "10,20",
        ])
        .unwrap();
        assert_eq!(args.backend, BackendKind::Software);
        assert_eq!((args.width, args.height, args.tile_size), (1920, 1080, 16));
        assert_eq!(args.overrides, vec!["mode=Foveated", "overlay=on"]);
        assert_eq!(args.pointer, Some((10.0, 20.0)));
    }

    #[test]
    fn test_sweep_conflicts_with_suite_file() {
        assert!(Args::try_parse_from(["vrs", "--sweep", "--experiments", "a.ron"]).is_err());
    }

    #[test]
    fn test_software_run_reports_and_exports() -> Result<()> {
        let dir = tempdir()?;
        let export = dir.path().join("rates.png");
        let args = Args::try_parse_from([
            "vrs",
            "--width",
            "96",
            "--height",
            "64",
            "--export",
            export.to_str().unwrap(),
        ])
        .unwrap();
        run(args).unwrap();
        let image = image::open(&export)?.to_luma8();
        assert_eq!(image.dimensions(), (6, 4));
        Ok(())
    }
}
