//! The ordered queue, its active index and the sort key applied to it.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::LibrarySettings;
use crate::error::PlaylistError;
use crate::library::{NaturalKey, TagReader, Track, extract_metadata, natural_key, scan_audio_files};

/// Ordering applied to the queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    #[serde(alias = "file_name", alias = "filename")]
    FileName,
    Title,
    /// Track number, ties broken by title.
    #[serde(alias = "track_number", alias = "track")]
    TrackNumber,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::FileName, SortKey::Title, SortKey::TrackNumber];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::FileName => "File Name",
            SortKey::Title => "Title",
            SortKey::TrackNumber => "Track Number",
        }
    }

    /// The key after this one, wrapping around.
    pub fn cycle(self) -> SortKey {
        match self {
            SortKey::FileName => SortKey::Title,
            SortKey::Title => SortKey::TrackNumber,
            SortKey::TrackNumber => SortKey::FileName,
        }
    }

    fn key_for(self, track: &Track) -> (u32, NaturalKey) {
        match self {
            SortKey::FileName => (0, natural_key(&track.filename)),
            SortKey::Title => (0, natural_key(&track.title)),
            SortKey::TrackNumber => (track.track_number, natural_key(&track.title)),
        }
    }

    /// Stable sort of `tracks` by this key.
    pub fn sort(self, tracks: &mut [Track]) {
        tracks.sort_by_cached_key(|t| self.key_for(t));
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Ordered tracks plus the active index.
///
/// Invariant: `active` is `None` or a valid index into `tracks`.
#[derive(Debug, Default)]
pub struct PlaylistModel {
    tracks: Vec<Track>,
    active: Option<usize>,
    sort_key: SortKey,
}

impl PlaylistModel {
    pub fn new(sort_key: SortKey) -> Self {
        Self {
            tracks: Vec::new(),
            active: None,
            sort_key,
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn active_track(&self) -> Option<&Track> {
        self.active.and_then(|i| self.tracks.get(i))
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    fn replace(&mut self, tracks: Vec<Track>) {
        self.active = if tracks.is_empty() { None } else { Some(0) };
        self.tracks = tracks;
    }

    /// Replace the playlist with `paths` in the order given (no sorting).
    ///
    /// Unreadable files still produce fallback records.
    pub fn load_from_paths(&mut self, paths: &[PathBuf], reader: &dyn TagReader) {
        let tracks = paths
            .iter()
            .map(|p| extract_metadata(p, reader))
            .collect();
        self.replace(tracks);
        tracing::info!(count = self.tracks.len(), "loaded picked files");
    }

    /// Add `paths` after the existing tracks, keeping the active track.
    pub fn append_paths(&mut self, paths: &[PathBuf], reader: &dyn TagReader) {
        self.tracks
            .extend(paths.iter().map(|p| extract_metadata(p, reader)));
        if self.active.is_none() && !self.tracks.is_empty() {
            self.active = Some(0);
        }
    }

    /// Scan `root` recursively, sort by the current key and replace the playlist.
    ///
    /// When nothing matches, the playlist is left untouched and
    /// [`PlaylistError::NoAudioFiles`] is returned.
    pub fn load_from_directory(
        &mut self,
        root: &Path,
        settings: &LibrarySettings,
        reader: &dyn TagReader,
    ) -> Result<usize, PlaylistError> {
        if !root.is_dir() {
            return Err(PlaylistError::NotADirectory(root.to_path_buf()));
        }

        let paths = scan_audio_files(root, settings);
        if paths.is_empty() {
            return Err(PlaylistError::NoAudioFiles(root.to_path_buf()));
        }

        let mut tracks: Vec<Track> = paths
            .iter()
            .map(|p| extract_metadata(p, reader))
            .collect();
        self.sort_key.sort(&mut tracks);
        self.replace(tracks);

        tracing::info!(root = %root.display(), count = self.tracks.len(), sort = ?self.sort_key, "scanned folder");
        Ok(self.tracks.len())
    }

    /// Re-sort by `key`, keeping the active track active. No-op when empty.
    pub fn set_sort_key(&mut self, key: SortKey) {
        if self.tracks.is_empty() {
            return;
        }
        self.sort_key = key;

        let active_path = self.active_track().map(|t| t.path.clone());
        key.sort(&mut self.tracks);

        if let Some(path) = active_path {
            self.active = self.tracks.iter().position(|t| t.path == path);
        }
        tracing::debug!(sort = ?key, active = ?self.active, "playlist resorted");
    }

    /// Move the active index circularly. Returns `None` when empty.
    pub fn advance(&mut self, direction: Direction) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        let next = match (self.active, direction) {
            (None, Direction::Next) => 0,
            (None, Direction::Previous) => len - 1,
            (Some(i), Direction::Next) => (i + 1) % len,
            (Some(i), Direction::Previous) => (i + len - 1) % len,
        };
        self.active = Some(next);
        Some(next)
    }

    /// Make `index` the active track. Out-of-range indices are ignored.
    pub fn select_index(&mut self, index: usize) {
        if index < self.tracks.len() {
            self.active = Some(index);
        }
    }
}
