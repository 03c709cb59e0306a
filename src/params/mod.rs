//! Parameter definitions with units and documented semantics.
//!
//! All magic numbers of the visualizer live here with:
//! - Units (world units, degrees, milliseconds, decibels)
//! - Documented ranges and meanings
//! - Validation where a bad value would break an invariant

mod audio;
mod render;
mod visualizer;

// Re-export all types
pub use audio::{AnalyserConfig, PlaybackConfig, MAX_FFT_SIZE, MIN_FFT_SIZE};
pub use render::RenderConfig;
pub use visualizer::VisualizerConfig;
