use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fraction of the image kept clear on each side when picking a zoom center
const CENTER_MARGIN: f64 = 0.3;

/// Point the simulated camera zooms toward, in source pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomCenter {
    pub x: f64,
    pub y: f64,
}

impl ZoomCenter {
    /// Pick a center uniformly inside the middle 40% of the image on each axis
    pub fn random<R: Rng>(width: u32, height: u32, rng: &mut R) -> Self {
        let fx = rng.random_range(CENTER_MARGIN..=1.0 - CENTER_MARGIN);
        let fy = rng.random_range(CENTER_MARGIN..=1.0 - CENTER_MARGIN);
        Self {
            x: fx * width as f64,
            y: fy * height as f64,
        }
    }
}

/// Magnification at local time `t` of a clip lasting `duration` seconds.
///
/// Rises linearly from 1.0 at the start to `1 + zoom_factor` at the midpoint,
/// then falls back to 1.0 at the end.
pub fn zoom_scale(t: f64, duration: f64, zoom_factor: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }

    let progress = (t / duration).clamp(0.0, 1.0);
    // Triangle wave: 0 at both ends, 1 at the midpoint
    let ramp = 1.0 - (2.0 * progress - 1.0).abs();
    1.0 + zoom_factor * ramp
}

/// Region of the source image visible in one frame, in continuous pixel
/// coordinates (not snapped to whole pixels)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropWindow {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Compute the visible region for a given magnification.
///
/// The window is `width / scale` by `height / scale` and shrinks toward the
/// zoom center: the center sits at the same relative position in the window
/// as in the full image, so it never moves on screen and the window never
/// leaves the image.
pub fn crop_window(width: u32, height: u32, scale: f64, center: ZoomCenter) -> CropWindow {
    let width_f = width as f64;
    let height_f = height as f64;
    let scale = scale.max(1.0);

    let cx = center.x.clamp(0.0, width_f);
    let cy = center.y.clamp(0.0, height_f);

    CropWindow {
        left: cx * (1.0 - 1.0 / scale),
        top: cy * (1.0 - 1.0 / scale),
        width: width_f / scale,
        height: height_f / scale,
    }
}

/// Magnify the image around the zoom center, keeping the source dimensions.
///
/// Each output pixel is sampled bilinearly from the crop window, so the window
/// moves by fractions of a pixel between frames instead of snapping.
pub fn apply_zoom(img: &DynamicImage, scale: f64, center: ZoomCenter) -> DynamicImage {
    if scale <= 1.0 {
        return img.clone();
    }

    let (width, height) = img.dimensions();
    let window = crop_window(width, height, scale, center);
    let source = img.to_rgba8();

    let step_x = window.width / width as f64;
    let step_y = window.height / height as f64;
    let max_x = width.saturating_sub(1) as f64;
    let max_y = height.saturating_sub(1) as f64;

    let zoomed = RgbaImage::from_fn(width, height, |x, y| {
        // Pixel centers in the window, back to sample indices in the source
        let sx = (window.left + (x as f64 + 0.5) * step_x - 0.5).clamp(0.0, max_x);
        let sy = (window.top + (y as f64 + 0.5) * step_y - 0.5).clamp(0.0, max_y);
        image::imageops::interpolate_bilinear(&source, sx as f32, sy as f32)
            .unwrap_or(Rgba([0, 0, 0, 0]))
    });

    DynamicImage::ImageRgba8(zoomed)
}
