use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "apl.mp4";
pub const DEFAULT_DURATION_PER_IMAGE: f64 = 5.0;
pub const DEFAULT_ZOOM_FACTOR: f64 = 0.1;
pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_CODEC: &str = "libx264";

/// Images rendered when none are given on the command line or in a config file
pub fn default_images() -> Vec<PathBuf> {
    (1..=12).map(|i| PathBuf::from(format!("apl{}.jpg", i))).collect()
}

/// Everything needed to render one slideshow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowConfig {
    /// Images in playback order
    pub images: Vec<PathBuf>,
    pub output: PathBuf,
    /// Seconds each image stays on screen
    pub duration_per_image: f64,
    /// Peak magnification above 1.0 (0.1 = 10% zoom)
    pub zoom_factor: f64,
    pub fps: u32,
    /// ffmpeg video codec name
    pub codec: String,
    /// Seed for zoom center selection; random when absent
    pub seed: Option<u64>,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            images: default_images(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            duration_per_image: DEFAULT_DURATION_PER_IMAGE,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            fps: DEFAULT_FPS,
            codec: DEFAULT_CODEC.to_string(),
            seed: None,
        }
    }
}

impl SlideshowConfig {
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        Ok(config)
    }

    /// Reject parameters the renderer cannot produce a video from
    pub fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            anyhow::bail!("No images provided");
        }
        if !self.duration_per_image.is_finite() || self.duration_per_image <= 0.0 {
            anyhow::bail!(
                "Duration per image must be positive, got {}",
                self.duration_per_image
            );
        }
        if !self.zoom_factor.is_finite() || self.zoom_factor < 0.0 {
            anyhow::bail!("Zoom factor must be zero or positive, got {}", self.zoom_factor);
        }
        if self.fps == 0 {
            anyhow::bail!("Frame rate must be at least 1 fps");
        }
        if self.codec.trim().is_empty() {
            anyhow::bail!("Codec name must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_slideshow() {
        let config = SlideshowConfig::default();
        assert_eq!(config.images.len(), 12);
        assert_eq!(config.images[0], PathBuf::from("apl1.jpg"));
        assert_eq!(config.images[11], PathBuf::from("apl12.jpg"));
        assert_eq!(config.output, PathBuf::from("apl.mp4"));
        assert_eq!(config.duration_per_image, 5.0);
        assert_eq!(config.zoom_factor, 0.1);
        assert_eq!(config.fps, 30);
        assert_eq!(config.codec, "libx264");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("show.json");

        let config = SlideshowConfig {
            images: vec![PathBuf::from("a.png"), PathBuf::from("b.png")],
            fps: 24,
            seed: Some(3),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = SlideshowConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{ "zoom_factor": 0.25, "output": "out.mp4" }"#).unwrap();

        let loaded = SlideshowConfig::load(&path).unwrap();
        assert_eq!(loaded.zoom_factor, 0.25);
        assert_eq!(loaded.output, PathBuf::from("out.mp4"));
        assert_eq!(loaded.images, default_images());
        assert_eq!(loaded.fps, DEFAULT_FPS);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SlideshowConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty = SlideshowConfig {
            images: Vec::new(),
            ..Default::default()
        };
        assert!(empty.validate().unwrap_err().to_string().contains("No images"));

        let zero_duration = SlideshowConfig {
            duration_per_image: 0.0,
            ..Default::default()
        };
        assert!(zero_duration.validate().is_err());

        let negative_duration = SlideshowConfig {
            duration_per_image: -2.0,
            ..Default::default()
        };
        assert!(negative_duration.validate().is_err());

        let zero_fps = SlideshowConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(zero_fps.validate().is_err());

        let negative_zoom = SlideshowConfig {
            zoom_factor: -0.5,
            ..Default::default()
        };
        assert!(negative_zoom.validate().is_err());

        let no_codec = SlideshowConfig {
            codec: " ".to_string(),
            ..Default::default()
        };
        assert!(no_codec.validate().is_err());
    }
}
