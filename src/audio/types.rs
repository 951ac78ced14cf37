//! Audio-related small types: commands, notifications and the transport seam.

use std::path::PathBuf;
use std::time::Duration;

/// Stamp of one `load_track` call. Every notification carries the stamp of the
/// source it describes so stale ones can be told apart.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Replace the current source. The new source starts paused.
    SetSource { path: PathBuf, load: LoadId },
    /// Start the current source from where it is.
    Play,
    Pause,
    Resume,
    /// Seek to an absolute position in the current source.
    Seek(Duration),
    /// Playback speed multiplier.
    SetRate(f32),
    /// Output volume, `0.0..=1.0`.
    SetVolume(f32),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Playback state reported by the transport.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportState {
    Playing,
    Paused,
    /// The source played to its end.
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEventKind {
    PositionChanged { position: Duration },
    DurationChanged { duration: Duration },
    StateChanged { state: TransportState },
    /// The source could not be opened or decoded.
    SourceFailed { reason: String },
}

/// Notification sent from the audio thread to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportEvent {
    pub load: LoadId,
    pub kind: TransportEventKind,
}

impl TransportEvent {
    pub fn new(load: LoadId, kind: TransportEventKind) -> Self {
        Self { load, kind }
    }
}

/// Anything that accepts playback commands.
pub trait Transport {
    fn send(&mut self, cmd: AudioCmd);
}

#[cfg(test)]
impl Transport for Vec<AudioCmd> {
    fn send(&mut self, cmd: AudioCmd) {
        self.push(cmd);
    }
}
