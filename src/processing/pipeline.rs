use crate::config::SlideshowConfig;
use crate::encoder::{check_ffmpeg, VideoEncoder};
use crate::processing::effects::compose_frame;
use crate::processing::timeline::{Clip, Timeline};
use crate::processing::zoom::apply_zoom;
use anyhow::{Context, Result};
use image::{DynamicImage, RgbaImage};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Render every clip and encode the result to `config.output`
pub fn create_slideshow(config: &SlideshowConfig) -> Result<()> {
    config.validate()?;
    check_ffmpeg()?;

    let timeline = build_timeline(config)?;
    let (canvas_width, canvas_height) = timeline.canvas_size();
    let total_frames = timeline.total_frames(config.fps);

    println!("Creating slideshow: {}", config.output.display());
    println!("  Images: {}", timeline.clips.len());
    println!("  Output: {}x{} @ {} fps ({})", canvas_width, canvas_height, config.fps, config.codec);
    println!(
        "  Duration: {:.2}s ({} frames)",
        timeline.total_duration(),
        total_frames
    );
    info!(
        clips = timeline.clips.len(),
        width = canvas_width,
        height = canvas_height,
        frames = total_frames,
        "timeline ready"
    );

    let mut encoder = VideoEncoder::new(
        canvas_width,
        canvas_height,
        config.fps,
        &config.codec,
        &config.output,
    )?;

    let pb = ProgressBar::new(total_frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let written = render_timeline(&timeline, config.fps, &mut encoder, &pb)?;
    pb.finish_and_clear();
    encoder.finish()?;
    info!(frames = written, output = %config.output.display(), "encoding complete");

    println!("Slideshow video created and saved as {}", config.output.display());
    Ok(())
}

/// Render every clip in order and feed the frames to `encoder`.
///
/// Returns the number of frames written.
pub fn render_timeline(
    timeline: &Timeline,
    fps: u32,
    encoder: &mut VideoEncoder,
    pb: &ProgressBar,
) -> Result<u64> {
    let (canvas_width, canvas_height) = timeline.canvas_size();

    for (index, clip) in timeline.clips.iter().enumerate() {
        debug!(index, path = %clip.path.display(), "rendering clip");
        let source = image::open(&clip.path)
            .with_context(|| format!("Failed to load image: {}", clip.path.display()))?;

        for frame in 0..clip.frame_count(fps) {
            let t = frame as f64 / fps as f64;
            let canvas = render_frame(clip, &source, t, canvas_width, canvas_height);
            encoder.write_frame(canvas.as_raw())?;
            pb.inc(1);
        }
    }

    Ok(encoder.frame_count())
}

/// Lay out the clips without touching the encoder
pub fn build_timeline(config: &SlideshowConfig) -> Result<Timeline> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    Timeline::build(config, &mut rng)
}

/// Render one output frame of `clip` at local time `t`
pub fn render_frame(
    clip: &Clip,
    source: &DynamicImage,
    t: f64,
    canvas_width: u32,
    canvas_height: u32,
) -> RgbaImage {
    let zoomed = apply_zoom(source, clip.scale_at(t), clip.center);
    compose_frame(&zoomed, canvas_width, canvas_height)
}
