use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use planetoid_input::{Action, Viewport};
use planetoid_kernel::{
    ActivationLog, FrameDriver, GalleryConfig, MediaGallery, Scene, SceneConfig, World,
};
use planetoid_render::DebugTextRenderer;
use planetoid_tools::SceneInspector;
use planetoid_tween::TweenScheduler;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "planetoid-cli", about = "Headless planet scene driver")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Generate a planet and print a summary
    Generate {
        /// Scene config (.yaml, .yml or .json); defaults apply when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the config seed
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of rebuilds to run after the first pass
        #[arg(short, long, default_value = "0")]
        rebuilds: u32,
        /// Print the scatter report as JSON
        #[arg(long)]
        json: bool,
        /// Print the effective config as YAML and exit
        #[arg(long)]
        dump_config: bool,
    },
    /// Run the frame loop with an optional scripted pointer
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Number of ticks to run
        #[arg(short, long, default_value = "300")]
        ticks: u32,
        /// Seconds per tick
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        #[arg(long, default_value = "800")]
        width: f32,
        #[arg(long, default_value = "600")]
        height: f32,
        /// Pointer position in screen pixels, held for the whole run
        #[arg(long, num_args = 2, value_names = ["X", "Y"])]
        pointer: Option<Vec<f32>>,
        /// Click at the pointer position after the last tick
        #[arg(long, requires = "pointer")]
        click: bool,
    },
    /// Media gallery demo: hover a panel, resize, click
    Gallery {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = "1200")]
        width: f32,
        #[arg(long, default_value = "800")]
        height: f32,
        /// Width to resize to half-way through the run
        #[arg(long, default_value = "500")]
        resize_to: f32,
        #[arg(short, long, default_value = "60")]
        ticks: u32,
    },
}

fn load_scene_config(path: Option<PathBuf>, seed: Option<u64>) -> anyhow::Result<SceneConfig> {
    let mut config = match path {
        Some(path) => SceneConfig::load(&path)
            .with_context(|| format!("loading scene config {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = seed {
        config.seed = seed;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("planetoid-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", planetoid_assets::crate_info());
            println!("props: {}", planetoid_props::crate_info());
            println!("tween: {}", planetoid_tween::crate_info());
            println!("camera: {}", planetoid_camera::crate_info());
            println!("render: {}", planetoid_render::crate_info());
            println!("kernel: {}", planetoid_kernel::crate_info());
            println!("tools: {}", planetoid_tools::crate_info());
        }
        Commands::Generate {
            config,
            seed,
            rebuilds,
            json,
            dump_config,
        } => {
            let config = load_scene_config(config, seed)?;
            if dump_config {
                print!("{}", config.to_yaml()?);
                return Ok(());
            }

            let mut tweens = TweenScheduler::new();
            let mut world = World::generate(config, &mut tweens)?;
            for _ in 0..rebuilds {
                world.rebuild(&mut tweens)?;
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&world.report())?);
            } else {
                let summary =
                    SceneInspector::summary(&world, &tweens, &Default::default());
                println!("{summary}");
            }
        }
        Commands::Simulate {
            config,
            seed,
            ticks,
            dt,
            width,
            height,
            pointer,
            click,
        } => {
            let config = load_scene_config(config, seed)?;
            let viewport = Viewport::new(width, height)?;
            let mut tweens = TweenScheduler::new();
            let world = World::generate(config, &mut tweens)?;
            let mut driver = FrameDriver::new(
                world,
                tweens,
                DebugTextRenderer::new(),
                ActivationLog::default(),
                viewport,
            );

            let pointer = pointer.and_then(|p| match p.as_slice() {
                [x, y] => Some((*x, *y)),
                _ => None,
            });
            if let Some((x, y)) = pointer {
                driver.handle(Action::PointerMoved { x, y })?;
            }
            let mut last = String::new();
            for _ in 0..ticks {
                last = driver.tick(dt)?;
            }
            if let (true, Some((x, y))) = (click, pointer) {
                driver.handle(Action::PointerClicked { x, y })?;
            }
            tracing::info!(ticks, fps = driver.timer().fps(), "simulation finished");

            println!("{last}");
            println!("{}", SceneInspector::from_driver(&driver));
            println!(
                "Frame time: avg={:?} max={:?} over {} ticks",
                driver.timer().average_work(),
                driver.timer().max_work(),
                driver.timer().count()
            );
            for (id, resource) in &driver.activation().entries {
                println!("Activated [{}] {resource}", id.short());
            }
        }
        Commands::Gallery {
            config,
            width,
            height,
            resize_to,
            ticks,
        } => {
            let config = match config {
                Some(path) => GalleryConfig::load(&path)
                    .with_context(|| format!("loading gallery config {}", path.display()))?,
                None => GalleryConfig::default(),
            };
            let viewport = Viewport::new(width, height)?;
            let gallery = MediaGallery::new(config, &viewport)?;
            let mut driver = FrameDriver::new(
                gallery,
                TweenScheduler::new(),
                DebugTextRenderer::new(),
                ActivationLog::default(),
                viewport,
            );

            // Hover the first panel through its on-screen position.
            let first = driver
                .scene()
                .pick_targets()
                .first()
                .map(|target| target.volume.center());
            let hover = first
                .and_then(|center| driver.camera().world_to_ndc(center))
                .map(|ndc| driver.viewport().to_screen(ndc.truncate()));
            if let Some(at) = hover {
                driver.handle(Action::PointerMoved { x: at.x, y: at.y })?;
            }

            let half = ticks / 2;
            for _ in 0..half {
                driver.tick(1.0 / 60.0)?;
            }
            println!("{}", driver.tick(1.0 / 60.0)?);

            driver.handle(Action::Resized {
                width: resize_to,
                height,
            })?;
            for _ in half..ticks {
                driver.tick(1.0 / 60.0)?;
            }
            println!("{}", driver.tick(1.0 / 60.0)?);

            if let Some(at) = hover {
                driver.handle(Action::PointerClicked { x: at.x, y: at.y })?;
            }
            let stats = driver.scene().assets().stats();
            println!(
                "Layout: {:?} relayouts={} meshes registered={} disposed={}",
                driver.scene().layout(),
                driver.scene().relayouts(),
                stats.meshes_registered,
                stats.meshes_disposed
            );
            for (id, resource) in &driver.activation().entries {
                println!("Activated [{}] {resource}", id.short());
            }
        }
    }

    Ok(())
}
