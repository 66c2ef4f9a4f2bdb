use crate::config::SlideshowConfig;
use crate::processing::zoom::{zoom_scale, ZoomCenter};
use anyhow::{Context, Result};
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One still image on the timeline with its zoom parameters
#[derive(Debug, Clone, Serialize)]
pub struct Clip {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Seconds on screen
    pub duration: f64,
    pub zoom_factor: f64,
    pub center: ZoomCenter,
}

impl Clip {
    /// Read the image size from the file header and pick a zoom center
    pub fn open<R: Rng>(path: &Path, duration: f64, zoom_factor: f64, rng: &mut R) -> Result<Self> {
        let (width, height) = image::image_dimensions(path)
            .with_context(|| format!("Failed to read image: {}", path.display()))?;
        Ok(Self::new(path.to_path_buf(), width, height, duration, zoom_factor, rng))
    }

    pub fn new<R: Rng>(
        path: PathBuf,
        width: u32,
        height: u32,
        duration: f64,
        zoom_factor: f64,
        rng: &mut R,
    ) -> Self {
        let center = ZoomCenter::random(width, height, rng);
        Self {
            path,
            width,
            height,
            duration,
            zoom_factor,
            center,
        }
    }

    pub fn frame_count(&self, fps: u32) -> usize {
        (self.duration * fps as f64).round() as usize
    }

    /// Magnification at local time `t`
    pub fn scale_at(&self, t: f64) -> f64 {
        zoom_scale(t, self.duration, self.zoom_factor)
    }
}

/// Clips played back to back, in input order
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub clips: Vec<Clip>,
}

impl Timeline {
    /// Build one clip per configured image
    pub fn build<R: Rng>(config: &SlideshowConfig, rng: &mut R) -> Result<Self> {
        if config.images.is_empty() {
            anyhow::bail!("No images provided");
        }

        let clips = config
            .images
            .iter()
            .map(|path| {
                let clip = Clip::open(path, config.duration_per_image, config.zoom_factor, rng)?;
                debug!(
                    path = %clip.path.display(),
                    width = clip.width,
                    height = clip.height,
                    center_x = clip.center.x,
                    center_y = clip.center.y,
                    "clip prepared"
                );
                Ok(clip)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_clips(clips)
    }

    pub fn from_clips(clips: Vec<Clip>) -> Result<Self> {
        if clips.is_empty() {
            anyhow::bail!("No images provided");
        }
        Ok(Self { clips })
    }

    /// Nominal length in seconds; there are no cross-fades to subtract
    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(|c| c.duration).sum()
    }

    pub fn total_frames(&self, fps: u32) -> usize {
        self.clips.iter().map(|c| c.frame_count(fps)).sum()
    }

    /// Start time of each clip in seconds
    pub fn start_times(&self) -> Vec<f64> {
        self.clips
            .iter()
            .scan(0.0, |start, clip| {
                let this = *start;
                *start += clip.duration;
                Some(this)
            })
            .collect()
    }

    /// Output frame size: large enough for every clip, rounded up to even
    /// dimensions for yuv420p.
    pub fn canvas_size(&self) -> (u32, u32) {
        let width = self.clips.iter().map(|c| c.width).max().unwrap_or(0);
        let height = self.clips.iter().map(|c| c.height).max().unwrap_or(0);
        (round_up_even(width), round_up_even(height))
    }
}

fn round_up_even(value: u32) -> u32 {
    value + value % 2
}
