//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::params::{AnalyserConfig, PlaybackConfig, RenderConfig, VisualizerConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Audioring")]
#[command(about = "Real-time 3D audio spectrum visualizer", long_about = None)]
pub struct Args {
    /// Audio files to cycle through (keys 1-9, left/right arrows)
    #[arg(value_name = "TRACK", default_value = "sounds/Blip.mp3")]
    pub tracks: Vec<PathBuf>,

    /// FFT window size (power of 2); the ring gets half as many cubes
    #[arg(long, value_name = "SAMPLES", default_value_t = 512)]
    pub fft_size: usize,

    /// Radius of the cube ring
    #[arg(long, value_name = "UNITS", default_value_t = 100.0)]
    pub radius: f32,

    /// Number of discs in the centre stack
    #[arg(long, value_name = "COUNT", default_value_t = 10)]
    pub discs: usize,

    /// Radius of the largest disc
    #[arg(long, value_name = "UNITS", default_value_t = 25.0)]
    pub disc_radius: f32,

    /// Playback volume (0.0 - 1.0)
    #[arg(long, value_name = "GAIN", default_value_t = 0.5)]
    pub volume: f32,

    /// Initial window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 1280)]
    pub width: u32,

    /// Initial window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value_t = 720)]
    pub height: u32,
}

impl Args {
    pub fn analyser_config(&self) -> AnalyserConfig {
        AnalyserConfig::default().with_fft_size(self.fft_size)
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            volume: self.volume.clamp(0.0, 1.0),
            ..PlaybackConfig::default()
        }
    }

    pub fn visualizer_config(&self) -> VisualizerConfig {
        VisualizerConfig {
            ring_radius: self.radius,
            disc_count: self.discs,
            disc_radius: self.disc_radius,
            ..VisualizerConfig::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            ..RenderConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["audioring"]);
        assert_eq!(args.tracks, vec![PathBuf::from("sounds/Blip.mp3")]);
        assert_eq!(args.analyser_config().fft_size, 512);
        assert_eq!(args.playback_config().volume, 0.5);
        assert_eq!(args.visualizer_config().disc_count, 10);
        assert_eq!(args.render_config().window_width, 1280);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "audioring",
            "a.mp3",
            "b.wav",
            "--fft-size",
            "1024",
            "--discs",
            "5",
            "--volume",
            "3.0",
        ]);
        assert_eq!(args.tracks.len(), 2);
        assert_eq!(args.analyser_config().frequency_bin_count(), 512);
        assert_eq!(args.visualizer_config().disc_count, 5);
        assert_eq!(args.playback_config().volume, 1.0);
    }
}
