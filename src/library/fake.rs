//! In-memory `TagReader` for tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::MetadataError;

use super::metadata::{RawTags, TagReader};

/// Paths without an entry behave like corrupt files.
#[derive(Debug, Default)]
pub(crate) struct FakeTagReader {
    tags: HashMap<PathBuf, RawTags>,
    pictures: HashMap<PathBuf, Vec<u8>>,
}

impl FakeTagReader {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, path: &str, title: &str, track: Option<&str>, secs: u64) -> Self {
        self.tags.insert(
            PathBuf::from(path),
            RawTags {
                title: Some(title.to_string()),
                artist: Some("Artist".to_string()),
                duration: Some(Duration::from_secs(secs)),
                track: track.map(str::to_string),
                ..RawTags::default()
            },
        );
        self
    }

    pub(crate) fn with_picture(mut self, path: &str, bytes: Vec<u8>) -> Self {
        self.pictures.insert(PathBuf::from(path), bytes);
        self
    }
}

impl TagReader for FakeTagReader {
    fn read_tags(&self, path: &Path) -> Result<RawTags, MetadataError> {
        self.tags
            .get(path)
            .cloned()
            .ok_or_else(|| MetadataError::Unreadable {
                path: path.to_path_buf(),
                reason: "no such fixture".to_string(),
            })
    }

    fn read_picture(&self, path: &Path) -> Result<Option<Vec<u8>>, MetadataError> {
        Ok(self.pictures.get(path).cloned())
    }
}
