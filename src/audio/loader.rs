//! Background track loading with last-request-wins semantics.
//!
//! Every request takes a fresh generation number. Decoding happens on a
//! worker thread; when the result comes back it is only handed out if no
//! newer request was made in the meantime.

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::decoder::decode_file;
use super::AudioBuffer;
use crate::error::{Result, VisualizerError};

/// A decoded track ready to be installed
#[derive(Debug, Clone)]
pub struct LoadedTrack {
    pub path: PathBuf,
    pub buffer: Arc<AudioBuffer>,
}

/// Outcome of one finished load
#[derive(Debug)]
pub enum LoadEvent {
    /// The newest request finished decoding
    Ready(LoadedTrack),
    /// The newest request failed; nothing will play
    Failed {
        path: PathBuf,
        error: VisualizerError,
    },
    /// A superseded request finished and was discarded
    Stale { path: PathBuf },
}

struct Completion {
    generation: u64,
    path: PathBuf,
    result: Result<AudioBuffer>,
}

/// Issues load requests and filters their completions by generation
pub struct AudioLoader {
    generation: u64,
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
}

impl Default for AudioLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioLoader {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self {
            generation: 0,
            sender,
            receiver,
        }
    }

    /// Generation of the most recent request (0 before any request)
    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    /// Decode `path` in the background; returns the request's generation
    pub fn request(&mut self, path: &Path) -> u64 {
        self.request_with(path, decode_file)
    }

    /// Like [`AudioLoader::request`] with a custom decode function
    pub fn request_with<F>(&mut self, path: &Path, decode: F) -> u64
    where
        F: FnOnce(&Path) -> Result<AudioBuffer> + Send + 'static,
    {
        self.generation += 1;
        let generation = self.generation;
        let path = path.to_path_buf();
        let sender = self.sender.clone();

        info!("Loading {} (request {})", path.display(), generation);
        thread::spawn(move || {
            let result = decode(&path);
            // The loader may be gone already; then nobody wants the result
            let _ = sender.send(Completion {
                generation,
                path,
                result,
            });
        });

        generation
    }

    /// Next finished load, without blocking
    pub fn try_next(&mut self) -> Option<LoadEvent> {
        let completion = self.receiver.try_recv().ok()?;
        Some(self.classify(completion))
    }

    /// Next finished load, waiting up to `timeout`
    pub fn next_timeout(&mut self, timeout: Duration) -> Option<LoadEvent> {
        match self.receiver.recv_timeout(timeout) {
            Ok(completion) => Some(self.classify(completion)),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    fn classify(&self, completion: Completion) -> LoadEvent {
        let Completion {
            generation,
            path,
            result,
        } = completion;

        if generation != self.generation {
            debug!(
                "Discarding stale load of {} (request {}, current {})",
                path.display(),
                generation,
                self.generation
            );
            return LoadEvent::Stale { path };
        }

        match result {
            Ok(buffer) => LoadEvent::Ready(LoadedTrack {
                path,
                buffer: Arc::new(buffer),
            }),
            Err(error) => {
                warn!("Failed to load {}: {}", path.display(), error);
                LoadEvent::Failed { path, error }
            }
        }
    }
}
