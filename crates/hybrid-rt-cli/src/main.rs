//! hybrid-rt CLI - software raytracer with advisory hardware probing
//!
//! Renders a JSON scene (or the built-in demo quad) to PNG or PPM, prints
//! acceleration structure statistics, and reports what ray-tracing hardware
//! is available.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Instant;

use hybrid_rt_raytrace::Bvh;
use hybrid_rt_render::render;
use hybrid_rt_scene::{demo_scene, Scene};

mod config;
mod output;

use config::{load_settings, Overrides};
use output::write_image;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
#[command(name = "hybrid-rt")]
#[command(version)]
#[command(about = "BVH-accelerated software raytracer", long_about = None)]
struct Cli {
    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a scene to an image
    Render {
        /// Scene JSON file (default: built-in demo quad)
        #[arg(short, long)]
        scene: Option<PathBuf>,
        /// Output image (.png or .ppm)
        #[arg(short, long, default_value = "out.png")]
        output: PathBuf,
        /// TOML render settings
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Report ray-tracing hardware before rendering
        #[arg(long)]
        probe: bool,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Report ray-tracing hardware capabilities
    Probe {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display scene and acceleration structure statistics
    Info {
        /// Scene JSON file (default: built-in demo quad)
        scene: Option<PathBuf>,
        /// TOML render settings (only the bvh table is used)
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: Overrides,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render {
            scene,
            output,
            config,
            probe,
            overrides,
        } => {
            render_scene(scene.as_deref(), &output, config.as_deref(), probe, &overrides)?;
        }
        Commands::Probe { json } => {
            show_probe(json)?;
        }
        Commands::Info {
            scene,
            config,
            overrides,
        } => {
            show_info(scene.as_deref(), config.as_deref(), &overrides)?;
        }
    }

    Ok(())
}

fn load_scene(path: Option<&Path>) -> Result<Scene> {
    match path {
        Some(path) => {
            Scene::load(path).with_context(|| format!("failed to load scene {}", path.display()))
        }
        None => Ok(demo_scene()),
    }
}

fn render_scene(
    scene: Option<&Path>,
    output: &Path,
    config: Option<&Path>,
    probe: bool,
    overrides: &Overrides,
) -> Result<()> {
    let mut settings = load_settings(config)?;
    overrides.apply(&mut settings);
    settings.validate()?;
    // Fail on a bad extension before spending time rendering.
    output::ImageKind::from_path(output)?;

    if probe {
        let report = hybrid_rt_gpu::detect();
        tracing::info!(
            backend = %report.backend,
            device = report.device_name.as_deref().unwrap_or("none"),
            "hardware probe (rendering in software)"
        );
    }

    let scene = load_scene(scene)?;
    let frame = render(&scene, &settings)?;
    let (width, height) = (frame.width(), frame.height());
    write_image(output, frame)?;

    println!("Wrote {width}x{height} image to {}", output.display());
    Ok(())
}

fn show_probe(json: bool) -> Result<()> {
    let report = hybrid_rt_gpu::detect();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn show_info(scene_path: Option<&Path>, config: Option<&Path>, overrides: &Overrides) -> Result<()> {
    let mut settings = load_settings(config)?;
    overrides.apply(&mut settings);
    let scene = load_scene(scene_path)?;

    let name = scene_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "demo".to_string());
    let vertices: usize = scene.meshes.iter().map(|m| m.vertices.len()).sum();

    println!("Scene: {name}");
    println!("  Meshes: {}", scene.meshes.len());
    println!("  Vertices: {vertices}");
    println!("  Triangles: {}", scene.triangle_count());
    println!("  Materials: {}", scene.materials.len());
    println!("  Textures: {}", scene.textures.len());

    let start = Instant::now();
    let bvh = Bvh::build_with(&scene, &settings.bvh)?;
    let elapsed = start.elapsed();

    println!("\nBVH ({:?}, max leaf size {}):", settings.bvh.strategy, settings.bvh.max_leaf_size);
    println!("  Nodes: {}", bvh.node_count());
    println!("  Leaves: {}", bvh.leaf_count());
    println!("  Depth: {}", bvh.depth());
    println!("  Build time: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    if let Some(bounds) = bvh.root_bounds() {
        let (min, max) = (bounds.min, bounds.max);
        println!(
            "  Bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
    }

    Ok(())
}
