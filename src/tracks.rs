//! Track list the user switches between while the visualizer runs.

use std::path::{Path, PathBuf};

/// Ordered list of selectable tracks with a current selection
#[derive(Debug, Clone)]
pub struct TrackSelector {
    tracks: Vec<PathBuf>,
    current: usize,
}

impl TrackSelector {
    /// Selector starting on the first track; `None` when `tracks` is empty
    pub fn new(tracks: Vec<PathBuf>) -> Option<Self> {
        if tracks.is_empty() {
            return None;
        }
        Some(Self { tracks, current: 0 })
    }

    pub fn current(&self) -> &Path {
        &self.tracks[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Select a track by index
    ///
    /// Returns the new path when the selection changed, like a "change"
    /// event; re-selecting the current track or an out-of-range index
    /// returns `None`.
    pub fn select(&mut self, index: usize) -> Option<&Path> {
        if index >= self.tracks.len() || index == self.current {
            return None;
        }
        self.current = index;
        Some(self.current())
    }

    /// Select the following track, wrapping around
    pub fn next(&mut self) -> Option<&Path> {
        self.select((self.current + 1) % self.tracks.len())
    }

    /// Select the preceding track, wrapping around
    pub fn previous(&mut self) -> Option<&Path> {
        let len = self.tracks.len();
        self.select((self.current + len - 1) % len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> TrackSelector {
        TrackSelector::new(vec![
            PathBuf::from("sounds/Blip.mp3"),
            PathBuf::from("sounds/Drift.ogg"),
            PathBuf::from("sounds/Pulse.wav"),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_list_has_no_selector() {
        assert!(TrackSelector::new(vec![]).is_none());
    }

    #[test]
    fn test_select_emits_change_only_on_change() {
        let mut tracks = selector();
        assert_eq!(tracks.len(), 3);
        assert!(!tracks.is_empty());
        assert_eq!(tracks.current(), Path::new("sounds/Blip.mp3"));

        assert_eq!(tracks.select(2), Some(Path::new("sounds/Pulse.wav")));
        assert_eq!(tracks.select(2), None);
        assert_eq!(tracks.select(7), None);
        assert_eq!(tracks.current_index(), 2);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut tracks = selector();
        assert_eq!(tracks.previous(), Some(Path::new("sounds/Pulse.wav")));
        assert_eq!(tracks.next(), Some(Path::new("sounds/Blip.mp3")));
        assert_eq!(tracks.next(), Some(Path::new("sounds/Drift.ogg")));
    }

    #[test]
    fn test_single_track_never_changes() {
        let mut tracks = TrackSelector::new(vec![PathBuf::from("a.wav")]).unwrap();
        assert_eq!(tracks.next(), None);
        assert_eq!(tracks.previous(), None);
    }
}
