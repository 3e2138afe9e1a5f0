//! Headless terrain demo
//!
//! Loads a heightmap (or synthesizes a radial hill), assembles the scene,
//! drives the per-frame callback for a number of frames and optionally writes
//! the terrain, trees and run statistics to a JSON file.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-headless -- --heightmap images/terrain.png --frames 120
//! RUST_LOG=debug cargo run --package demo-headless -- --export terrain.json
//! ```

use clap::{Parser, ValueEnum};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use terrain_core::heightmap::load_heightmap;
use terrain_core::scene::TreeInstance;
use terrain_core::{
    Heightmap, SamplingPolicy, SceneConfig, SceneContext, SceneStats, TerrainMesh, Viewport,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Side length of the synthesized heightmap in pixels
const SYNTHETIC_SIZE: u32 = 257;

/// Heightmap terrain demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "terrain-demo")]
#[command(about = "Heightmap terrain scene demo", long_about = None)]
struct Args {
    /// Heightmap image (PNG/JPEG); a radial hill is generated when omitted
    #[arg(long)]
    heightmap: Option<PathBuf>,

    /// Scene configuration JSON (defaults reproduce the stock scene)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override terrain vertices per side
    #[arg(short, long)]
    resolution: Option<usize>,

    /// Override terrain height scale
    #[arg(long)]
    height_scale: Option<f32>,

    /// Heightmap sampling policy
    #[arg(long, value_enum)]
    sampling: Option<SamplingArg>,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 60)]
    frames: u64,

    /// Initial viewport width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Initial viewport height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Write terrain, trees and statistics to this JSON file
    #[arg(short, long)]
    export: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SamplingArg {
    Nearest,
    Bilinear,
}

impl From<SamplingArg> for SamplingPolicy {
    fn from(arg: SamplingArg) -> Self {
        match arg {
            SamplingArg::Nearest => SamplingPolicy::Nearest,
            SamplingArg::Bilinear => SamplingPolicy::Bilinear,
        }
    }
}

/// JSON export document
#[derive(serde::Serialize)]
struct Export<'a> {
    stats: SceneStats,
    terrain: &'a TerrainMesh,
    trees: &'a [TreeInstance],
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading scene config from {}", path.display());
            SceneConfig::load(path)?
        }
        None => SceneConfig::default(),
    };
    if let Some(resolution) = args.resolution {
        config.terrain.resolution = resolution;
    }
    if let Some(height_scale) = args.height_scale {
        config.terrain.height_scale = height_scale;
    }
    if let Some(sampling) = args.sampling {
        config.terrain.sampling = sampling.into();
        config.water.layer.sampling = sampling.into();
    }

    // Decode fully before any geometry is built
    let heightmap = match &args.heightmap {
        Some(path) => load_heightmap(path, config.brightness)?,
        None if args.config.is_some() => load_heightmap(&config.heightmap_path, config.brightness)?,
        None => {
            info!("No heightmap given, synthesizing a {SYNTHETIC_SIZE}px radial hill");
            radial_hill(SYNTHETIC_SIZE)?
        }
    };

    let mut scene = SceneContext::init(config, &heightmap)?;

    let landscape = Viewport::new(args.width, args.height);
    let portrait = Viewport::new(args.height, args.width);
    for frame in 0..args.frames {
        // Rotate the "window" halfway through to exercise resize handling
        let viewport = if frame < args.frames / 2 {
            landscape
        } else {
            portrait
        };
        let info = scene.frame(viewport);
        if info.resized {
            info!(
                "Frame {}: viewport {}x{}, camera aspect {:.3}",
                info.frame, viewport.width, viewport.height, info.aspect
            );
        }
    }

    let camera = scene.camera();
    info!(
        "Camera at ({:.1}, {:.1}, {:.1}), {:.1} m from target, fov {}°",
        camera.position.x,
        camera.position.y,
        camera.position.z,
        camera.distance_to_target(),
        camera.fov_degrees
    );
    for layer in scene.config().material.layers() {
        match layer.alpha_map {
            Some(mask) => info!(
                "Splat layer {} blended by {}",
                layer.color_map.display(),
                mask.display()
            ),
            None => info!("Splat base layer {}", layer.color_map.display()),
        }
    }

    let stats = scene.stats();
    info!(
        "Ran {} frames ({} resizes): terrain {} vertices / {} triangles, elevation {:.2}..{:.2} m, water {} vertices, {} trees",
        stats.frames,
        stats.resizes,
        stats.terrain_vertices,
        stats.terrain_triangles,
        stats.min_elevation,
        stats.max_elevation,
        stats.water_vertices,
        stats.trees
    );

    if let Some(path) = &args.export {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(
            writer,
            &Export {
                stats,
                terrain: scene.terrain(),
                trees: scene.trees(),
            },
        )?;
        info!("Exported scene to {}", path.display());
    }

    scene.teardown();
    Ok(())
}

/// Cone-shaped hill: 1.0 at the centre falling to 0.0 at the inscribed circle
fn radial_hill(size: u32) -> Result<Heightmap, terrain_core::TerrainError> {
    let center = (size - 1) as f32 / 2.0;
    let samples = (0..size)
        .flat_map(|y| (0..size).map(move |x| (x, y)))
        .map(|(x, y)| {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            (1.0 - (dx * dx + dy * dy).sqrt() / center).max(0.0)
        })
        .collect();
    Heightmap::from_samples(size, size, samples)
}
