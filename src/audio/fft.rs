//! Spectrum analysis thread and window function.

use parking_lot::Mutex;
use std::f32::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::analyser::{SpectrumAnalyser, SpectrumSnapshot};
use super::sound::AnalysisTap;

/// Spawn the analysis thread
///
/// Every `interval` the latest `fft_size` tap samples are analysed and the
/// shared snapshot replaced. The loop exits once `stop` is set.
pub fn spawn_analysis_thread(
    mut analyser: SpectrumAnalyser,
    tap: AnalysisTap,
    snapshot: Arc<Mutex<SpectrumSnapshot>>,
    stop: Arc<AtomicBool>,
    interval: Duration,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let fft_size = analyser.fft_size();
        let mut samples = Vec::with_capacity(fft_size);

        while !stop.load(Ordering::Relaxed) {
            thread::sleep(interval);

            tap.latest_into(fft_size, &mut samples);
            analyser.analyse(&samples);

            *snapshot.lock() = analyser.snapshot();
        }
    })
}

/// Blackman window function for FFT analysis
pub fn blackman_window(index: usize, size: usize) -> f32 {
    const ALPHA: f32 = 0.16;
    let a0 = 0.5 * (1.0 - ALPHA);
    let a1 = 0.5;
    let a2 = 0.5 * ALPHA;
    let x = index as f32 / size as f32;
    a0 - a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos()
}
