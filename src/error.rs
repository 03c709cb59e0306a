//! Error type shared by every subsystem.

use thiserror::Error;

/// Visualizer errors
#[derive(Error, Debug)]
pub enum VisualizerError {
    #[error("Spectrum analyser has not been created (load audio first)")]
    AnalyserNotReady,

    #[error("Cube collection holds {cubes} cubes but the spectrum has {bins} bins")]
    CollectionMismatch { cubes: usize, bins: usize },

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Audio device error: {0}")]
    AudioDevice(String),

    #[error("GPU initialisation failed: {0}")]
    Gpu(String),

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for visualizer operations
pub type Result<T> = std::result::Result<T, VisualizerError>;
