mod cli;
mod config;
mod encoder;
mod processing;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::SlideshowConfig;
use processing::timeline::Timeline;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Render(args) => {
            let config = args.into_config()?;
            processing::create_slideshow(&config)?;
        }
        Commands::Plan { args, json } => {
            let config = args.into_config()?;
            let timeline = processing::build_timeline(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&timeline)?);
            } else {
                print_plan(&config, &timeline);
            }
        }
        Commands::InitConfig { path } => {
            SlideshowConfig::default().save(&path)?;
            println!("Wrote default config to {}", path.display());
        }
    }

    Ok(())
}

/// Log to stderr so progress output and JSON on stdout stay clean
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "kenburns=debug" } else { "kenburns=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(env_filter)
        .init();
}

fn print_plan(config: &SlideshowConfig, timeline: &Timeline) {
    let (width, height) = timeline.canvas_size();
    println!("Slideshow plan: {}", config.output.display());
    println!("  Output: {}x{} @ {} fps ({})", width, height, config.fps, config.codec);
    println!(
        "  Duration: {:.2}s ({} frames)",
        timeline.total_duration(),
        timeline.total_frames(config.fps)
    );
    println!("  Zoom: {:.0}%", config.zoom_factor * 100.0);
    println!("\nClips:");
    for (i, (clip, start)) in timeline.clips.iter().zip(timeline.start_times()).enumerate() {
        println!(
            "  [{index}] {path} {width}x{height} at {start:.2}s, center ({x:.0}, {y:.0})",
            index = i + 1,
            path = clip.path.display(),
            width = clip.width,
            height = clip.height,
            start = start,
            x = clip.center.x,
            y = clip.center.y,
        );
    }
}
