pub mod effects;
pub mod pipeline;
pub mod timeline;
pub mod zoom;

// Re-export the main entry points
pub use pipeline::{build_timeline, create_slideshow};
