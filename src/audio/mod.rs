//! Audio decoding, playback and spectrum analysis.
//!
//! Decoded tracks play through a cpal output stream. Everything sent to
//! the device is mirrored into an analysis tap, which a background thread
//! turns into byte-scaled frequency spectra for the visuals.

mod analyser;
mod decoder;
mod fft;
mod loader;
mod sound;
mod system;

// Re-export public types
pub use analyser::{AnalyserHandle, SpectrumAnalyser, SpectrumSnapshot};
pub use decoder::decode_file;
pub use fft::blackman_window;
pub use loader::{AudioLoader, LoadEvent, LoadedTrack};
pub use sound::{AnalysisTap, Sound};
pub use system::{AudioEngine, AudioSystem};

/// Decoded audio: interleaved stereo samples at the source sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved stereo samples [L0, R0, L1, R1, ...]
    pub samples: Vec<f32>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioBuffer {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Number of stereo frames
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f32 / self.sample_rate as f32
    }

    /// (left, right) pair of a frame
    pub fn frame(&self, index: usize) -> (f32, f32) {
        (self.samples[index * 2], self.samples[index * 2 + 1])
    }
}

/// Fold interleaved samples with `channels` channels into stereo
///
/// Mono is duplicated to both sides; extra channels beyond the first two
/// are dropped.
pub fn to_stereo(interleaved: &[f32], channels: usize) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => interleaved.iter().flat_map(|&s| [s, s]).collect(),
        2 => interleaved.to_vec(),
        n => interleaved
            .chunks_exact(n)
            .flat_map(|frame| [frame[0], frame[1]])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_stereo() {
        assert_eq!(to_stereo(&[0.1, 0.2], 1), vec![0.1, 0.1, 0.2, 0.2]);
        assert_eq!(to_stereo(&[0.1, 0.2], 2), vec![0.1, 0.2]);
        assert_eq!(
            to_stereo(&[0.1, 0.2, 0.3, 0.4, 0.5, 0.6], 3),
            vec![0.1, 0.2, 0.4, 0.5]
        );
        assert!(to_stereo(&[0.1], 0).is_empty());
    }

    #[test]
    fn test_buffer_duration() {
        let buffer = AudioBuffer::new(vec![0.0; 2 * 22050], 44100);
        assert_eq!(buffer.frames(), 22050);
        assert!((buffer.duration_secs() - 0.5).abs() < 1e-6);
    }
}
