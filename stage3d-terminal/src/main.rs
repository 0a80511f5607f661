//! stage3d - run a demo scene in the terminal
//!
//! Controls:
//!   - Space: action (scatter animates while held, fan toggles swing)
//!   - S: stop / start the fan blades
//!   - Arrows / W A D: orbit the camera
//!   - +/-: zoom
//!   - Q/ESC: quit

use anyhow::{Context, Result};
use clap::Parser;
use stage3d_core::{build_demo, load_config, AssetPaths, DemoKind};
use stage3d_terminal::TerminalApp;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "stage3d")]
#[command(about = "Animated 3D demo scenes rendered in the terminal")]
#[command(version)]
struct Args {
    /// Demo to run (scatter, fan, orbit)
    #[arg(short, long, default_value = "orbit")]
    demo: DemoKind,

    /// Path to configuration file
    #[arg(short, long, default_value = "stage3d.toml")]
    config: PathBuf,

    /// Seed for the scatter layout
    #[arg(long)]
    seed: Option<u64>,

    /// STL file replacing the orbit demo's earth sphere
    #[arg(long)]
    earth_mesh: Option<PathBuf>,

    /// STL file replacing the orbit demo's cone markers
    #[arg(long)]
    marker_mesh: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Where logs go; the terminal itself is busy drawing
    #[arg(long, default_value = "stage3d.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let log_file = File::create(&args.log_file)
        .with_context(|| format!("failed to create log file {}", args.log_file.display()))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("stage3d v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = load_config(&args.config).context("failed to load configuration")?;

    // Override seed if specified
    if let Some(seed) = args.seed {
        config.scatter.seed = Some(seed);
    }

    let assets = AssetPaths {
        earth_mesh: args.earth_mesh,
        marker_mesh: args.marker_mesh,
    };
    let demo = build_demo(args.demo, &config, &assets)
        .with_context(|| format!("failed to set up the {} demo", args.demo))?;

    let mut app = TerminalApp::new(demo, config.renderer.target_fps)
        .context("failed to read terminal size")?;
    app.run().context("terminal loop failed")?;

    info!("Exited cleanly");
    Ok(())
}
