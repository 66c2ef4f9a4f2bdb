use crate::config::SlideshowConfig;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kenburns")]
#[command(about = "Render a slideshow video with a slow zoom on each still image")]
#[command(version)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render and encode the slideshow
    Render(SlideshowArgs),

    /// Show clip layout and timing without encoding
    Plan {
        #[command(flatten)]
        args: SlideshowArgs,

        /// Print the timeline as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the default configuration to a JSON file
    InitConfig {
        /// Config file to create
        path: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct SlideshowArgs {
    /// Images in playback order (defaults to apl1.jpg .. apl12.jpg)
    pub images: Vec<PathBuf>,

    /// Output video file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON config file; command-line flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seconds each image is shown
    #[arg(long)]
    pub duration: Option<f64>,

    /// Peak zoom above 1.0 (0.1 = 10%)
    #[arg(long)]
    pub zoom: Option<f64>,

    /// Output frame rate
    #[arg(long)]
    pub fps: Option<u32>,

    /// FFmpeg video codec
    #[arg(long)]
    pub codec: Option<String>,

    /// Seed for zoom center selection
    #[arg(long)]
    pub seed: Option<u64>,
}

impl SlideshowArgs {
    /// Resolve defaults, then the config file, then explicit flags
    pub fn into_config(self) -> Result<SlideshowConfig> {
        let mut config = match &self.config {
            Some(path) => SlideshowConfig::load(path)?,
            None => SlideshowConfig::default(),
        };

        if !self.images.is_empty() {
            config.images = self.images;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(duration) = self.duration {
            config.duration_per_image = duration;
        }
        if let Some(zoom) = self.zoom {
            config.zoom_factor = zoom;
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(codec) = self.codec {
            config.codec = codec;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}
