//! Library module: track records, tag reading, folder scanning, natural
//! ordering and lazy album art.

mod artwork;
mod metadata;
mod model;
mod natural;
mod scan;

pub use artwork::{ArtPixels, load_album_art};
pub use metadata::{LoftyTagReader, RawTags, TagReader, extract_metadata, parse_track_number};
pub use model::{Track, UNKNOWN_ARTIST};
pub use natural::{NaturalKey, natural_cmp, natural_key};
pub use scan::{is_audio_file, scan_audio_files};

pub(crate) use scan::{is_hidden, normalized_extensions};

#[cfg(test)]
pub(crate) mod fake;
