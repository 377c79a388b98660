//! kinetype CLI
//!
//! Inspect presets, validate heading configs and preview hover sessions
//! without a browser.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kinetype_heading::{HeadingConfig, Preset};

mod preview;

use preview::{HoverPlan, PreviewOptions};

#[derive(Parser)]
#[command(name = "kinetype")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Per-character heading animation toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in presets
    Presets,

    /// Print a preset as a TOML config file
    Show {
        /// Preset name (playful, elegant, energetic, minimal, dynamic, chaotic, gsap-style, varied)
        preset: String,
    },

    /// Validate a heading config file
    Check {
        /// Path to a TOML config
        config: PathBuf,
    },

    /// Simulate a hover session and print what each frame paints
    Preview {
        /// Heading text
        #[arg(short, long, default_value = "Hello World")]
        text: String,

        /// Start from a preset
        #[arg(short, long, conflicts_with = "config")]
        preset: Option<String>,

        /// Load a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Character indices to hover, in order (e.g. 0,3,4)
        #[arg(long, value_delimiter = ',', conflicts_with = "sweep")]
        hover: Vec<usize>,

        /// Hover every character left to right
        #[arg(long)]
        sweep: bool,

        /// Time the pointer rests on each character, in milliseconds
        #[arg(long, default_value = "150")]
        dwell: f32,

        /// Number of frames to simulate
        #[arg(short, long, default_value = "60")]
        frames: usize,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: f32,

        /// Seed for the random family
        #[arg(long)]
        seed: Option<u64>,

        /// Emit frames as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Presets => cmd_presets(),

        Commands::Show { preset } => cmd_show(&preset),

        Commands::Check { config } => cmd_check(&config),

        Commands::Preview {
            text,
            preset,
            config,
            hover,
            sweep,
            dwell,
            frames,
            fps,
            seed,
            json,
        } => {
            let config = resolve_config(preset.as_deref(), config.as_deref())?;
            let plan = if sweep || hover.is_empty() {
                HoverPlan::Sweep
            } else {
                HoverPlan::Indices(hover)
            };
            cmd_preview(
                PreviewOptions {
                    text,
                    config,
                    plan,
                    dwell_ms: dwell,
                    frames,
                    fps,
                    seed,
                },
                json,
            )
        }
    }
}

fn resolve_config(preset: Option<&str>, path: Option<&Path>) -> Result<HeadingConfig> {
    match (preset, path) {
        (Some(name), _) => Ok(name.parse::<Preset>()?.config()),
        (None, Some(path)) => HeadingConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display())),
        (None, None) => Ok(HeadingConfig::default()),
    }
}

fn cmd_presets() -> Result<()> {
    println!(
        "{:<12} {:<9} {:>6}  {:<22} {:>7}  extras",
        "preset", "family", "dur", "ease", "stagger"
    );
    for preset in Preset::ALL {
        let config = preset.config();
        let mut extras = Vec::new();
        if let Some(color) = config.hover_color {
            extras.push(format!("hover {}", color));
        }
        if config.add_glow {
            extras.push("glow".to_string());
        }
        if config.enable_squish {
            extras.push("squish".to_string());
        }
        println!(
            "{:<12} {:<9} {:>5}s  {:<22} {:>6}s  {}",
            preset.name(),
            config.animation_family.name(),
            config.duration,
            config.ease.to_string(),
            config.adjacent_stagger,
            extras.join(", ")
        );
    }
    Ok(())
}

fn cmd_show(preset: &str) -> Result<()> {
    let config = preset.parse::<Preset>()?.config();
    print!("{}", config.to_toml()?);
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let config =
        HeadingConfig::load(path).with_context(|| format!("failed to load {}", path.display()))?;

    info!(
        "{} is valid: {} over {}s, ease {}",
        path.display(),
        config.animation_family,
        config.duration,
        config.ease
    );
    if !config.propagates() {
        info!("adjacent-stagger is 0: hovering will not propagate to neighbours");
    }
    Ok(())
}

fn cmd_preview(options: PreviewOptions, json: bool) -> Result<()> {
    info!(
        "Previewing {:?} with {} ({} frames at {} fps)",
        options.text, options.config.animation_family, options.frames, options.fps
    );

    let frames = preview::run(&options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&frames)?);
    } else {
        print!("{}", preview::render_text(&frames));
    }
    Ok(())
}
