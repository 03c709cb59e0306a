//! Spectrum analysis and playback configuration.

use crate::error::{Result, VisualizerError};

/// Smallest FFT size accepted by the analyser
pub const MIN_FFT_SIZE: usize = 32;

/// Largest FFT size accepted by the analyser (also the analysis tap capacity)
pub const MAX_FFT_SIZE: usize = 32768;

/// Spectrum analyser configuration
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size (power of 2 in MIN_FFT_SIZE..=MAX_FFT_SIZE)
    /// Produces fft_size / 2 frequency bins
    pub fft_size: usize,

    /// Temporal smoothing between analyses (0 = none, just below 1 = heavy)
    pub smoothing: f32,

    /// Magnitude mapped to byte value 0 (decibels)
    pub min_decibels: f32,

    /// Magnitude mapped to byte value 255 (decibels)
    pub max_decibels: f32,

    /// Analysis refresh interval (milliseconds)
    /// 16 ms ≈ one analysis per 60 Hz display frame
    pub update_interval_ms: u64,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            smoothing: 0.8,
            min_decibels: -100.0,
            max_decibels: -30.0,
            update_interval_ms: 16,
        }
    }
}

impl AnalyserConfig {
    /// Same configuration with a different FFT size
    pub fn with_fft_size(&self, fft_size: usize) -> Self {
        Self {
            fft_size,
            ..self.clone()
        }
    }

    /// Number of usable frequency bins
    pub fn frequency_bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two()
            || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&self.fft_size)
        {
            return Err(VisualizerError::InvalidConfig(format!(
                "FFT size must be a power of 2 between {} and {}, got {}",
                MIN_FFT_SIZE, MAX_FFT_SIZE, self.fft_size
            )));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(VisualizerError::InvalidConfig(format!(
                "Smoothing must be in [0, 1), got {}",
                self.smoothing
            )));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(VisualizerError::InvalidConfig(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels, self.max_decibels
            )));
        }
        Ok(())
    }
}

/// Playback settings applied whenever a track finishes loading
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Output gain (0.0 - 1.0)
    pub volume: f32,

    /// Restart from the beginning when the track ends
    pub looping: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 0.5,
            looping: true,
        }
    }
}
