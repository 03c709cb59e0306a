//! Audioring library - real-time 3D audio spectrum visualizer

pub mod audio;
pub mod camera;
pub mod cli;
pub mod color;
pub mod error;
pub mod params;
pub mod rendering;
pub mod scene;
pub mod shapes;
pub mod tracks;
pub mod visualizer;

pub use error::{Result, VisualizerError};
