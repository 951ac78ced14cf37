//! Error types shared across the player.
//!
//! None of these are fatal: callers degrade to a fallback value or report the
//! condition on the status line.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to read tags or pictures from an audio file.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to read tags from {path}: {source}")]
    Lofty {
        path: PathBuf,
        #[source]
        source: lofty::error::LoftyError,
    },

    #[error("unreadable audio file {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

/// Conditions reported by playlist loading.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// The folder contains no file with a recognized extension.
    #[error("no audio files found in {0}")]
    NoAudioFiles(PathBuf),

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Failures inside the audio thread.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(#[from] rodio::StreamError),

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },
}
