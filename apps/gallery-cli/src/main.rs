use clap::{Parser, Subcommand};
use gallery_assets::ImageSource;
use gallery_common::{GalleryConfig, Screen};
use gallery_input::{PointerTracker, WheelDelta};
use gallery_kernel::{FrameLoop, Gallery};
use gallery_render::{DebugTextRenderer, Renderer};
use gallery_tools::GalleryInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gallery-cli", about = "CLI tool for headless gallery runs")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run frames headless with scripted input and print the plane layout
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        /// Wheel lines applied before the first frame (positive scrolls right)
        #[arg(long, allow_hyphen_values = true)]
        wheel: Option<f32>,
        /// Horizontal drag distance in pixels applied before the first frame
        #[arg(long, allow_hyphen_values = true)]
        drag: Option<f32>,
        /// Screen width in logical pixels
        #[arg(long, default_value = "1280")]
        width: f32,
        /// Screen height in logical pixels
        #[arg(long, default_value = "720")]
        height: f32,
        /// Number of planes when the config lists no images
        #[arg(short, long, default_value = "6")]
        items: usize,
        /// Print the layout every N frames (0 prints only the last frame)
        #[arg(short, long, default_value = "0")]
        every: u64,
    },
    /// Print the resolved configuration as JSON
    Config,
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GalleryConfig> {
    Ok(match path {
        Some(path) => GalleryConfig::load(path)?,
        None => GalleryConfig::default(),
    })
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("gallery-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", gallery_kernel::crate_info());
            println!("input: {}", gallery_input::crate_info());
            println!("render: {}", gallery_render::crate_info());
            println!("assets: {}", gallery_assets::crate_info());
            println!("tools: {}", gallery_tools::crate_info());
        }
        Commands::Simulate {
            ticks,
            wheel,
            drag,
            width,
            height,
            items,
            every,
        } => {
            let config = load_config(cli.config.as_ref())?;
            let labels: Vec<String> = if config.images.is_empty() {
                (0..items).map(|i| format!("plane-{i}")).collect()
            } else {
                config
                    .images
                    .iter()
                    .map(|p| ImageSource::new(p.clone()).label())
                    .collect()
            };
            println!(
                "Simulating {} planes for {ticks} frames at {width}x{height}",
                labels.len()
            );

            let mut gallery = Gallery::new(config, labels, Screen::new(width, height));
            let mut tracker = PointerTracker::new();

            if let Some(lines) = wheel {
                if let Some(action) = tracker.wheel(WheelDelta::Lines { x: 0.0, y: lines }) {
                    gallery.apply(&action);
                }
            }
            if let Some(distance) = drag {
                let start = width / 2.0;
                let script = [
                    tracker.cursor_moved(start),
                    tracker.mouse_button(true),
                    tracker.cursor_moved(start + distance),
                    tracker.mouse_button(false),
                ];
                for action in script.into_iter().flatten() {
                    gallery.apply(&action);
                }
            }

            let renderer = DebugTextRenderer::new();
            let mut frame_loop = FrameLoop::new();
            frame_loop.start();
            for frame in 0..ticks {
                let print = every > 0 && frame % every == 0;
                frame_loop.step(&mut gallery, |g| {
                    if print {
                        print!("{}", renderer.render(g));
                    }
                });
            }
            frame_loop.stop();
            tracker.detach();

            print!("{}", renderer.render(&gallery));
            println!("{}", GalleryInspector::summary(&gallery));
            if let Some(info) = GalleryInspector::centered_item(&gallery)
                .and_then(|index| GalleryInspector::inspect_item(&gallery, index))
            {
                println!("Centered: {info}");
            }
        }
        Commands::Config => {
            let config = load_config(cli.config.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
