//! Byte-scaled frequency spectrum analysis.

use parking_lot::Mutex;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::debug;

use super::fft::{blackman_window, spawn_analysis_thread};
use super::sound::AnalysisTap;
use crate::error::Result;
use crate::params::AnalyserConfig;

/// One analysis result: a byte magnitude per frequency bin
///
/// The bin count is fixed by the analyser that produced the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpectrumSnapshot {
    pub magnitudes: Vec<u8>,
}

impl SpectrumSnapshot {
    /// All-zero spectrum with `bins` bins
    pub fn silent(bins: usize) -> Self {
        Self {
            magnitudes: vec![0; bins],
        }
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Mean byte magnitude over all bins (0 for an empty spectrum)
    pub fn average_frequency(&self) -> f32 {
        if self.magnitudes.is_empty() {
            return 0.0;
        }
        let sum: u32 = self.magnitudes.iter().map(|&m| m as u32).sum();
        sum as f32 / self.magnitudes.len() as f32
    }
}

/// FFT analyser producing smoothed, decibel-scaled byte spectra
///
/// Each analysis windows the latest `fft_size` samples (Blackman), takes
/// the normalised FFT magnitude, blends it with the previous result by
/// `smoothing`, and maps `min_decibels..max_decibels` onto `0..=255`.
pub struct SpectrumAnalyser {
    fft: Arc<dyn Fft<f32>>,
    config: AnalyserConfig,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    data: Vec<u8>,
}

impl SpectrumAnalyser {
    pub fn new(config: AnalyserConfig) -> Result<Self> {
        config.validate()?;

        let fft_size = config.fft_size;
        let bins = config.frequency_bin_count();

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        let window = (0..fft_size).map(|i| blackman_window(i, fft_size)).collect();

        Ok(Self {
            fft,
            config,
            window,
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
            smoothed: vec![0.0; bins],
            data: vec![0; bins],
        })
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    pub fn frequency_bin_count(&self) -> usize {
        self.data.len()
    }

    /// Analyse the most recent `fft_size` samples of `samples`
    ///
    /// Shorter input is treated as preceded by silence.
    pub fn analyse(&mut self, samples: &[f32]) {
        let fft_size = self.config.fft_size;
        let recent = &samples[samples.len().saturating_sub(fft_size)..];
        let pad = fft_size - recent.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        let tau = self.config.smoothing;
        let min_db = self.config.min_decibels;
        let range_db = self.config.max_decibels - min_db;

        for (k, (smoothed, byte)) in self
            .smoothed
            .iter_mut()
            .zip(self.data.iter_mut())
            .enumerate()
        {
            let magnitude = self.buffer[k].norm() / fft_size as f32;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;

            let db = if *smoothed > 0.0 {
                20.0 * smoothed.log10()
            } else {
                f32::NEG_INFINITY
            };
            let scaled = (255.0 / range_db) * (db - min_db);
            *byte = scaled.floor().clamp(0.0, 255.0) as u8;
        }
    }

    /// Byte magnitudes of the last analysis
    pub fn frequency_data(&self) -> &[u8] {
        &self.data
    }

    pub fn average_frequency(&self) -> f32 {
        self.snapshot().average_frequency()
    }

    pub fn snapshot(&self) -> SpectrumSnapshot {
        SpectrumSnapshot {
            magnitudes: self.data.clone(),
        }
    }
}

/// A running analyser: background thread plus its latest snapshot
///
/// Dropping the handle stops and joins the thread.
pub struct AnalyserHandle {
    bin_count: usize,
    snapshot: Arc<Mutex<SpectrumSnapshot>>,
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl AnalyserHandle {
    /// Start analysing `tap` with the given configuration
    pub fn spawn(config: AnalyserConfig, tap: AnalysisTap) -> Result<Self> {
        let interval = Duration::from_millis(config.update_interval_ms);
        let analyser = SpectrumAnalyser::new(config)?;
        let bin_count = analyser.frequency_bin_count();

        debug!(
            "Spectrum analyser created: fft_size={}, bins={}, interval={:?}",
            analyser.fft_size(),
            bin_count,
            interval
        );

        let snapshot = Arc::new(Mutex::new(SpectrumSnapshot::silent(bin_count)));
        let stop = Arc::new(AtomicBool::new(false));
        let thread = spawn_analysis_thread(
            analyser,
            tap,
            Arc::clone(&snapshot),
            Arc::clone(&stop),
            interval,
        );

        Ok(Self {
            bin_count,
            snapshot,
            stop,
            thread: Some(thread),
        })
    }

    pub fn bin_count(&self) -> usize {
        self.bin_count
    }

    /// Copy of the latest spectrum
    pub fn snapshot(&self) -> SpectrumSnapshot {
        self.snapshot.lock().clone()
    }
}

impl Drop for AnalyserHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
