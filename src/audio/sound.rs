//! Playback state for one audio source, and the analysis tap it feeds.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::warn;

use super::AudioBuffer;
use crate::params::{PlaybackConfig, MAX_FFT_SIZE};

/// Ring buffer of the mono mix most recently sent to the output device
#[derive(Clone)]
pub struct AnalysisTap {
    ring: Arc<Mutex<VecDeque<f32>>>,
    capacity: usize,
}

impl Default for AnalysisTap {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisTap {
    /// Tap large enough for the biggest supported FFT
    pub fn new() -> Self {
        Self::with_capacity(MAX_FFT_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ring: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push_slice(&self, samples: &[f32]) {
        let mut ring = self.ring.lock();
        for &sample in samples {
            push_bounded(&mut ring, self.capacity, sample);
        }
    }

    /// Copy the newest `n` samples (oldest first) into `out`
    ///
    /// When fewer are buffered, `out` is front-padded with silence.
    pub fn latest_into(&self, n: usize, out: &mut Vec<f32>) {
        out.clear();
        let ring = self.ring.lock();
        let available = ring.len().min(n);
        out.resize(n - available, 0.0);
        out.extend(ring.iter().skip(ring.len() - available));
    }

    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn push_bounded(ring: &mut VecDeque<f32>, capacity: usize, sample: f32) {
    if ring.len() == capacity {
        ring.pop_front();
    }
    ring.push_back(sample);
}

/// Playback state for a single audio source
///
/// The output stream calls [`Sound::fill`] from the audio thread; the UI
/// thread installs buffers and toggles playback. Both go through a shared
/// mutex owned by the caller.
#[derive(Debug)]
pub struct Sound {
    buffer: Option<Arc<AudioBuffer>>,
    /// Read position in source frames (fractional when resampling)
    cursor: f64,
    playing: bool,
    looping: bool,
    volume: f32,
}

impl Default for Sound {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound {
    pub fn new() -> Self {
        Self {
            buffer: None,
            cursor: 0.0,
            playing: false,
            looping: false,
            volume: 1.0,
        }
    }

    /// Replace the source buffer and rewind
    pub fn set_buffer(&mut self, buffer: Arc<AudioBuffer>) {
        self.buffer = Some(buffer);
        self.cursor = 0.0;
    }

    pub fn buffer(&self) -> Option<&Arc<AudioBuffer>> {
        self.buffer.as_ref()
    }

    /// Start playing from the current position
    ///
    /// Without a buffer there is nothing to play and the call is ignored.
    pub fn play(&mut self) {
        if self.buffer.is_none() {
            warn!("Sound has no buffer, ignoring play");
            return;
        }
        self.playing = true;
    }

    /// Stop and rewind
    pub fn stop(&mut self) {
        self.playing = false;
        self.cursor = 0.0;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.max(0.0);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Swap in a freshly loaded track and start it
    ///
    /// Stops whatever is playing now, installs `buffer`, then applies the
    /// playback settings before playing.
    pub fn install(&mut self, buffer: Arc<AudioBuffer>, playback: &PlaybackConfig) {
        if self.playing {
            self.stop();
        }
        self.set_buffer(buffer);
        self.set_loop(playback.looping);
        self.set_volume(playback.volume);
        self.play();
    }

    /// Fill an interleaved output buffer and mirror the mono mix into `tap`
    ///
    /// Source frames are picked nearest-neighbour at the ratio between the
    /// buffer's sample rate and `output_rate`. Silence is written (and
    /// tapped) while stopped.
    pub fn fill(&mut self, output: &mut [f32], channels: usize, output_rate: u32, tap: &AnalysisTap) {
        if channels == 0 {
            return;
        }

        let mut ring = tap.ring.lock();
        for frame in output.chunks_mut(channels) {
            let (left, right) = self.next_frame(output_rate);

            match frame.len() {
                1 => frame[0] = (left + right) * 0.5,
                _ => {
                    frame[0] = left;
                    frame[1] = right;
                    frame[2..].fill(0.0);
                }
            }
            push_bounded(&mut ring, tap.capacity, (left + right) * 0.5);
        }
    }

    fn next_frame(&mut self, output_rate: u32) -> (f32, f32) {
        if !self.playing || output_rate == 0 {
            return (0.0, 0.0);
        }
        let Some(buffer) = self.buffer.as_ref() else {
            return (0.0, 0.0);
        };
        let frames = buffer.frames();
        if frames == 0 {
            self.playing = false;
            return (0.0, 0.0);
        }

        let (left, right) = buffer.frame((self.cursor as usize).min(frames - 1));
        self.cursor += buffer.sample_rate as f64 / output_rate as f64;

        if self.cursor >= frames as f64 {
            if self.looping {
                self.cursor %= frames as f64;
            } else {
                self.playing = false;
                self.cursor = 0.0;
            }
        }

        (left * self.volume, right * self.volume)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(frames: usize, rate: u32) -> Arc<AudioBuffer> {
        let samples = (0..frames)
            .flat_map(|i| {
                let v = (i + 1) as f32 / frames as f32;
                [v, -v]
            })
            .collect();
        Arc::new(AudioBuffer::new(samples, rate))
    }

    #[test]
    fn test_play_without_buffer_is_ignored() {
        let mut sound = Sound::new();
        sound.play();
        assert!(!sound.is_playing());
    }

    #[test]
    fn test_install_applies_playback_settings() {
        let mut sound = Sound::new();
        sound.install(ramp(4, 48000), &PlaybackConfig::default());

        assert!(sound.is_playing());
        assert!(sound.is_looping());
        assert_eq!(sound.volume(), 0.5);
    }

    #[test]
    fn test_install_replaces_playing_buffer() {
        let mut sound = Sound::new();
        let tap = AnalysisTap::with_capacity(16);
        let first = ramp(8, 48000);
        let second = ramp(4, 48000);

        sound.install(Arc::clone(&first), &PlaybackConfig::default());
        let mut out = [0.0; 6];
        sound.fill(&mut out, 2, 48000, &tap);

        sound.install(Arc::clone(&second), &PlaybackConfig::default());
        assert!(Arc::ptr_eq(sound.buffer().unwrap(), &second));

        // Rewound to the start of the new buffer
        let mut out = [0.0; 2];
        sound.fill(&mut out, 2, 48000, &tap);
        assert_eq!(out, [0.25 * 0.5, -0.25 * 0.5]);
    }

    #[test]
    fn test_fill_stereo_and_tap() {
        let mut sound = Sound::new();
        let tap = AnalysisTap::with_capacity(16);
        sound.set_buffer(ramp(4, 48000));
        sound.play();

        let mut out = [0.0; 8];
        sound.fill(&mut out, 2, 48000, &tap);
        assert_eq!(out, [0.25, -0.25, 0.5, -0.5, 0.75, -0.75, 1.0, -1.0]);
        assert_eq!(tap.len(), 4);

        // Not looping: playback ended with the buffer
        assert!(!sound.is_playing());
    }

    #[test]
    fn test_fill_loops() {
        let mut sound = Sound::new();
        let tap = AnalysisTap::with_capacity(16);
        sound.set_buffer(ramp(2, 48000));
        sound.set_loop(true);
        sound.play();

        let mut out = [0.0; 3];
        sound.fill(&mut out, 1, 48000, &tap);
        // Mono output of a symmetric ramp is silent; the position still loops
        assert_eq!(out, [0.0; 3]);
        assert!(sound.is_playing());
    }

    #[test]
    fn test_fill_resamples_and_clears_extra_channels() {
        let mut sound = Sound::new();
        let tap = AnalysisTap::with_capacity(16);
        sound.set_buffer(ramp(4, 24000));
        sound.play();

        // Half-rate source: every source frame is used twice
        let mut out = [9.0; 8];
        sound.fill(&mut out, 4, 48000, &tap);
        assert_eq!(out, [0.25, -0.25, 0.0, 0.0, 0.25, -0.25, 0.0, 0.0]);
    }

    #[test]
    fn test_stopped_sound_writes_silence() {
        let mut sound = Sound::new();
        let tap = AnalysisTap::with_capacity(4);
        let mut out = [1.0; 4];
        sound.fill(&mut out, 2, 48000, &tap);
        assert_eq!(out, [0.0; 4]);
        assert_eq!(tap.len(), 2);
    }

    #[test]
    fn test_tap_keeps_latest_samples() {
        let tap = AnalysisTap::with_capacity(4);
        tap.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let mut out = Vec::new();
        tap.latest_into(2, &mut out);
        assert_eq!(out, vec![5.0, 6.0]);

        tap.latest_into(6, &mut out);
        assert_eq!(out, vec![0.0, 0.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
