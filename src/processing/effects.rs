use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

/// Fill behind frames smaller than the canvas
pub const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Placement of a frame on the output canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentLayout {
    pub offset_x: u32,
    pub offset_y: u32,
}

impl ContentLayout {
    /// Center content on the canvas. The canvas is sized to the largest clip,
    /// so content is never scaled here.
    pub fn calculate(
        content_width: u32,
        content_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Self {
        Self {
            offset_x: canvas_width.saturating_sub(content_width) / 2,
            offset_y: canvas_height.saturating_sub(content_height) / 2,
        }
    }
}

/// Center a rendered frame on an opaque canvas of the output size
pub fn compose_frame(frame: &DynamicImage, canvas_width: u32, canvas_height: u32) -> RgbaImage {
    let (width, height) = frame.dimensions();
    if width == canvas_width && height == canvas_height {
        return flatten(frame.to_rgba8());
    }

    let layout = ContentLayout::calculate(width, height, canvas_width, canvas_height);
    let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, BACKGROUND);
    image::imageops::replace(
        &mut canvas,
        &frame.to_rgba8(),
        layout.offset_x as i64,
        layout.offset_y as i64,
    );
    flatten(canvas)
}

/// Blend any transparency against the background so every pixel is opaque
fn flatten(mut img: RgbaImage) -> RgbaImage {
    for pixel in img.pixels_mut() {
        let alpha = pixel[3];
        if alpha < 255 {
            pixel[0] = blend_channel(BACKGROUND[0], pixel[0], alpha);
            pixel[1] = blend_channel(BACKGROUND[1], pixel[1], alpha);
            pixel[2] = blend_channel(BACKGROUND[2], pixel[2], alpha);
            pixel[3] = 255;
        }
    }
    img
}

/// Blend a single color channel with alpha
pub fn blend_channel(bg: u8, fg: u8, alpha: u8) -> u8 {
    let bg = bg as u32;
    let fg = fg as u32;
    let alpha = alpha as u32;
    ((bg * (255 - alpha) + fg * alpha) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_centers_smaller_content() {
        let layout = ContentLayout::calculate(100, 50, 200, 100);
        assert_eq!((layout.offset_x, layout.offset_y), (50, 25));

        let odd = ContentLayout::calculate(41, 30, 42, 50);
        assert_eq!((odd.offset_x, odd.offset_y), (0, 10));
    }

    #[test]
    fn test_compose_pads_with_black() {
        let frame = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 255])));
        let canvas = compose_frame(&frame, 4, 4);

        assert_eq!(canvas.dimensions(), (4, 4));
        assert_eq!(*canvas.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*canvas.get_pixel(3, 3), BACKGROUND);
        assert_eq!(*canvas.get_pixel(1, 1), Rgba([200, 100, 50, 255]));
        assert_eq!(*canvas.get_pixel(2, 2), Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn test_compose_flattens_transparency() {
        let frame = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 0])));
        let canvas = compose_frame(&frame, 2, 2);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_blend_channel() {
        assert_eq!(blend_channel(0, 255, 255), 255);
        assert_eq!(blend_channel(0, 255, 0), 0);
        assert_eq!(blend_channel(100, 200, 128), 150);
    }
}
