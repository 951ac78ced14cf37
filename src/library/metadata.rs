//! Tag reading and the path → `Track` extractor.
//!
//! Reading tags never fails from the caller's point of view: an unreadable file
//! still produces a record with filename-derived fallbacks.

use std::path::Path;
use std::time::Duration;

use lofty::config::ParseOptions;
use lofty::picture::PictureType;
use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use lofty::probe::Probe;

use crate::error::MetadataError;

use super::model::{Track, UNKNOWN_ARTIST};

/// Raw tag data as returned by a [`TagReader`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<Duration>,
    /// Track field as stored, e.g. `"3"` or `"3/12"`.
    pub track: Option<String>,
    pub sample_rate: Option<u32>,
    pub bit_depth: Option<u8>,
}

/// Source of tag data for audio files.
pub trait TagReader {
    /// Read textual tags and audio properties. Must not decode pictures.
    fn read_tags(&self, path: &Path) -> Result<RawTags, MetadataError>;

    /// Read the embedded cover image bytes, if any.
    fn read_picture(&self, path: &Path) -> Result<Option<Vec<u8>>, MetadataError>;
}

/// `TagReader` backed by `lofty`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagReader;

impl TagReader for LoftyTagReader {
    fn read_tags(&self, path: &Path) -> Result<RawTags, MetadataError> {
        let lofty_err = |source| MetadataError::Lofty {
            path: path.to_path_buf(),
            source,
        };

        if !path.is_file() {
            return Err(MetadataError::Unreadable {
                path: path.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }

        // Cover art is only needed for the loaded track, so skip it while scanning.
        let tagged = Probe::open(path)
            .map_err(lofty_err)?
            .options(ParseOptions::new().read_cover_art(false))
            .read()
            .map_err(lofty_err)?;

        let properties = tagged.properties();
        let mut tags = RawTags {
            duration: Some(properties.duration()),
            sample_rate: properties.sample_rate(),
            bit_depth: properties.bit_depth(),
            ..RawTags::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            tags.title = tag.title().map(|v| v.to_string());
            tags.artist = tag.artist().map(|v| v.to_string());
            tags.track = tag.track().map(|n| n.to_string());
        }

        Ok(tags)
    }

    fn read_picture(&self, path: &Path) -> Result<Option<Vec<u8>>, MetadataError> {
        let tagged = lofty::read_from_path(path).map_err(|source| MetadataError::Lofty {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
            return Ok(None);
        };

        // Prefer the front cover, otherwise use the first picture.
        let pictures = tag.pictures();
        let picture = pictures
            .iter()
            .find(|p| matches!(p.pic_type(), PictureType::CoverFront))
            .or_else(|| pictures.first());

        Ok(picture.map(|p| p.data().to_vec()))
    }
}

/// Parse a track field in `"N"` or `"N/Total"` form; anything else is 0.
pub fn parse_track_number(field: &str) -> u32 {
    let number = field.split('/').next().unwrap_or_default().trim();
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    number.parse().unwrap_or(0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build a `Track` for `path`, falling back to filename-derived values when
/// tags cannot be read.
pub fn extract_metadata(path: &Path, reader: &dyn TagReader) -> Track {
    let filename = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let extension = path
        .extension()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_default();

    match reader.read_tags(path) {
        Ok(tags) => Track {
            path: path.to_path_buf(),
            title: non_empty(tags.title).unwrap_or_else(|| filename.clone()),
            artist: non_empty(tags.artist).unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
            duration: tags.duration.unwrap_or(Duration::ZERO),
            extension,
            track_number: tags.track.as_deref().map(parse_track_number).unwrap_or(0),
            sample_rate: tags.sample_rate,
            bit_depth: tags.bit_depth,
            filename,
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "tag read failed, using fallback metadata");
            Track {
                path: path.to_path_buf(),
                title: filename.clone(),
                artist: UNKNOWN_ARTIST.to_string(),
                duration: Duration::ZERO,
                extension,
                filename,
                track_number: 0,
                sample_rate: None,
                bit_depth: None,
            }
        }
    }
}
