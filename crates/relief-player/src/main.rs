//! Relief - walk around a room whose walls are raised from video frames
//!
//! Usage:
//!   relief [video-file | frame-directory] [--config <relief.toml>]
//!
//! Without a path, frames come from the configured camera.

use anyhow::{Context, Result};
use clap::Parser;
use relief_audio::{extract_audio, SoundtrackPlayer};
use relief_core::ReliefConfig;
use relief_player::ReliefApp;
use relief_video::{open_source, SourceSpec};
use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};

#[derive(Parser)]
#[command(name = "relief")]
#[command(about = "Video frames as terrain walls you can walk between", long_about = None)]
#[command(version)]
struct Args {
    /// Video file or directory of frames; omit to use the camera
    source: Option<PathBuf>,

    /// Read configuration from this file only, instead of the global and local layers
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ReliefConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReliefConfig::load().context("Failed to load config")?,
    };

    let spec = SourceSpec::from_arg(args.source.as_deref());
    let source = open_source(
        &spec,
        &config.capture,
        config.terrain.image_width,
        config.terrain.image_height,
    )
    .context("Failed to open frame source")?;

    let soundtrack = match spec.video_file() {
        Some(video) => match extract_audio(&config.capture.ffmpeg, video) {
            Ok(path) => SoundtrackPlayer::new(&config.audio, &path),
            Err(e) => {
                log::warn!("No soundtrack: {}", e);
                SoundtrackPlayer::silent()
            }
        },
        None => SoundtrackPlayer::silent(),
    };

    println!("Controls:");
    println!("  WASD     - Move");
    println!("  Mouse    - Look");
    println!("  Space    - Jump / ascend while flying");
    println!("  Ctrl     - Descend while flying");
    println!("  Shift    - Sprint");
    println!("  Tab      - Free / capture the mouse");
    println!("  Escape   - Exit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ReliefApp::new(config, source, soundtrack);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.take_fatal() {
        return Err(err).context("Session ended abnormally");
    }
    Ok(())
}
