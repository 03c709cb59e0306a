//! Audio system tying playback, loading and analysis to an output device.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use super::analyser::{AnalyserHandle, SpectrumSnapshot};
use super::loader::{AudioLoader, LoadEvent};
use super::sound::{AnalysisTap, Sound};
use crate::error::{Result, VisualizerError};
use crate::params::{AnalyserConfig, PlaybackConfig};

/// Playback, loading and analysis state, independent of any device
pub struct AudioEngine {
    /// Shared with the output callback
    sound: Arc<Mutex<Sound>>,

    /// Mono mix of everything sent to the device
    tap: AnalysisTap,

    /// Running analyser; replaced on every load
    analyser: Option<AnalyserHandle>,

    analyser_config: AnalyserConfig,
    playback: PlaybackConfig,
    loader: AudioLoader,
}

impl AudioEngine {
    pub fn new(analyser_config: AnalyserConfig, playback: PlaybackConfig) -> Result<Self> {
        analyser_config.validate()?;

        Ok(Self {
            sound: Arc::new(Mutex::new(Sound::new())),
            tap: AnalysisTap::new(),
            analyser: None,
            analyser_config,
            playback,
            loader: AudioLoader::new(),
        })
    }

    /// Rebuild the analyser for `fft_size` and start loading `path`
    ///
    /// The new analyser exists when this returns, so its bin count can lay
    /// out geometry right away. An invalid `fft_size` is rejected before
    /// anything changes. Playback switches once decoding finishes (see
    /// [`AudioEngine::poll_loads`]); only the newest request ever starts
    /// playing.
    pub fn load_audio(&mut self, path: &Path, fft_size: usize) -> Result<u64> {
        self.replace_analyser(fft_size)?;
        Ok(self.loader.request(path))
    }

    fn replace_analyser(&mut self, fft_size: usize) -> Result<()> {
        let config = self.analyser_config.with_fft_size(fft_size);
        config.validate()?;

        // Stop the old analysis thread before starting its replacement
        self.analyser = None;
        self.analyser = Some(AnalyserHandle::spawn(config, self.tap.clone())?);
        Ok(())
    }

    /// Apply finished loads; returns the path of a newly started track
    ///
    /// Failed and stale loads leave the current playback untouched.
    pub fn poll_loads(&mut self) -> Option<PathBuf> {
        let mut started = None;
        while let Some(event) = self.loader.try_next() {
            if let LoadEvent::Ready(track) = event {
                self.sound.lock().install(track.buffer, &self.playback);
                info!("Playing {}", track.path.display());
                started = Some(track.path);
            }
        }
        started
    }

    /// Latest spectrum, if an analyser exists
    pub fn snapshot(&self) -> Option<SpectrumSnapshot> {
        self.analyser.as_ref().map(AnalyserHandle::snapshot)
    }

    /// Bin count of the current analyser
    pub fn bin_count(&self) -> Option<usize> {
        self.analyser.as_ref().map(AnalyserHandle::bin_count)
    }

    pub fn is_playing(&self) -> bool {
        self.sound.lock().is_playing()
    }
}

/// Audio system: an [`AudioEngine`] feeding the default output device
pub struct AudioSystem {
    engine: AudioEngine,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioSystem {
    /// Open the default output device and start a (silent) stream
    pub fn new(analyser_config: AnalyserConfig, playback: PlaybackConfig) -> Result<Self> {
        let engine = AudioEngine::new(analyser_config, playback)?;

        // Setup audio output device
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| VisualizerError::AudioDevice("No audio output device found".into()))?;

        let config = device.default_output_config().map_err(|e| {
            VisualizerError::AudioDevice(format!("Failed to get audio config: {}", e))
        })?;

        info!(
            "Audio: {} @ {}Hz, {} channels, {:?}",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate().0,
            config.channels(),
            config.sample_format()
        );

        let sample_format = config.sample_format();
        let stream_config: cpal::StreamConfig = config.into();
        let sound = Arc::clone(&engine.sound);
        let tap = engine.tap.clone();

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, sound, tap)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, sound, tap)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, sound, tap)?,
            other => {
                return Err(VisualizerError::AudioDevice(format!(
                    "Unsupported output sample format {:?}",
                    other
                )))
            }
        };

        stream.play().map_err(|e| {
            VisualizerError::AudioDevice(format!("Failed to start audio stream: {}", e))
        })?;

        Ok(Self {
            engine,
            _stream: stream,
        })
    }

    /// See [`AudioEngine::load_audio`]
    pub fn load_audio(&mut self, path: &Path, fft_size: usize) -> Result<u64> {
        self.engine.load_audio(path, fft_size)
    }

    pub fn poll_loads(&mut self) -> Option<PathBuf> {
        self.engine.poll_loads()
    }

    pub fn snapshot(&self) -> Option<SpectrumSnapshot> {
        self.engine.snapshot()
    }

    pub fn bin_count(&self) -> Option<usize> {
        self.engine.bin_count()
    }
}

/// Build an output stream for device sample type `T`
///
/// The sound renders into an f32 scratch buffer that is converted into the
/// device buffer on every callback.
fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    sound: Arc<Mutex<Sound>>,
    tap: AnalysisTap,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let output_rate = config.sample_rate.0;
    let mut scratch: Vec<f32> = Vec::new();

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                sound.lock().fill(&mut scratch, channels, output_rate, &tap);
                write_converted(&scratch, data);
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| VisualizerError::AudioDevice(format!("Failed to build audio stream: {}", e)))
}

/// Convert f32 samples into the device sample type
fn write_converted<T>(source: &[f32], output: &mut [T])
where
    T: Sample + FromSample<f32>,
{
    for (out, &sample) in output.iter_mut().zip(source) {
        *out = T::from_sample(sample);
    }
}
