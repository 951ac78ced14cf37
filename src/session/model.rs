//! Transport state for the loaded track and the commands that change it.
//!
//! The transport is the only source of truth for position: commands are sent
//! and the session waits for the matching notification.

use std::path::PathBuf;
use std::time::Duration;

use crate::audio::{AudioCmd, LoadId, Transport, TransportEvent, TransportEventKind, TransportState};
use crate::library::Track;
use crate::playlist::{Direction, PlaylistModel};

pub const MIN_RATE: f32 = 0.25;
pub const MAX_RATE: f32 = 2.0;

/// Per-load lifecycle: `Idle -> Loading -> Playing <-> Paused -> Completed -> Loading`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedTrack {
    pub load: LoadId,
    pub path: PathBuf,
}

/// What applying a transport notification did.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Applied,
    /// The notification referenced a source that is no longer loaded.
    Discarded,
    /// The track completed and the playlist moved on to this index.
    Advanced(usize),
    /// The transport could not play the loaded source.
    Failed(String),
}

#[derive(Debug)]
pub struct PlaybackSession {
    state: SessionState,
    position: Duration,
    duration: Duration,
    rate: f32,
    volume: f32,
    loaded: Option<LoadedTrack>,
    last_load: u64,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn round_hundredths(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

impl PlaybackSession {
    pub fn new(volume: f32) -> Self {
        Self {
            state: SessionState::Idle,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            rate: 1.0,
            volume: volume.clamp(0.0, 1.0),
            loaded: None,
            last_load: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Loading counts as playing: autoplay has been requested.
    pub fn is_playing(&self) -> bool {
        matches!(self.state, SessionState::Loading | SessionState::Playing)
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    /// `Duration::ZERO` while unknown.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn loaded(&self) -> Option<&LoadedTrack> {
        self.loaded.as_ref()
    }

    /// Fraction of the track played, `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.position.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn clamp_to_duration(&self, position: Duration) -> Duration {
        if self.duration.is_zero() {
            position
        } else {
            position.min(self.duration)
        }
    }

    /// Swap the transport's source to `track` and autoplay it.
    ///
    /// The current source is paused first so two tracks never overlap.
    pub fn load_track(&mut self, track: &Track, transport: &mut impl Transport) {
        self.last_load += 1;
        let load = LoadId(self.last_load);

        self.position = Duration::ZERO;
        self.duration = track.duration;

        transport.send(AudioCmd::Pause);
        transport.send(AudioCmd::SetSource {
            path: track.path.clone(),
            load,
        });
        transport.send(AudioCmd::SetRate(self.rate));
        transport.send(AudioCmd::Play);

        self.loaded = Some(LoadedTrack {
            load,
            path: track.path.clone(),
        });
        self.state = SessionState::Loading;
        tracing::debug!(path = %track.path.display(), load = load.0, "loading track");
    }

    /// Pause or resume the loaded track.
    ///
    /// No-op when nothing is loaded or the source failed: the transport has
    /// nothing to resume, so the track must be loaded again.
    pub fn toggle_play_pause(&mut self, transport: &mut impl Transport) {
        if self.loaded.is_none() || self.state == SessionState::Idle {
            return;
        }
        if self.is_playing() {
            transport.send(AudioCmd::Pause);
            self.state = SessionState::Paused;
        } else {
            transport.send(AudioCmd::Resume);
            self.state = SessionState::Playing;
        }
    }

    /// Seek to `target`, clamped to the known duration.
    pub fn seek(&mut self, target: Duration, transport: &mut impl Transport) {
        if self.loaded.is_none() {
            return;
        }
        transport.send(AudioCmd::Seek(self.clamp_to_duration(target)));
    }

    /// Seek relative to the last reported position.
    pub fn seek_by(&mut self, delta_ms: i64, transport: &mut impl Transport) {
        let current = self.position.as_millis() as i64;
        let target = current.saturating_add(delta_ms).max(0) as u64;
        self.seek(Duration::from_millis(target), transport);
    }

    /// Change the playback speed by `delta`, clamped to `MIN_RATE..=MAX_RATE`.
    pub fn set_rate(&mut self, delta: f32, transport: &mut impl Transport) {
        self.rate = round_hundredths(self.rate + delta).clamp(MIN_RATE, MAX_RATE);
        transport.send(AudioCmd::SetRate(self.rate));
    }

    /// Change the output volume by `delta`, clamped to `0.0..=1.0`.
    pub fn set_volume(&mut self, delta: f32, transport: &mut impl Transport) {
        self.volume = round_hundredths(self.volume + delta).clamp(0.0, 1.0);
        transport.send(AudioCmd::SetVolume(self.volume));
    }

    /// Apply a notification from the transport.
    ///
    /// Notifications for anything but the currently loaded source are dropped.
    /// Completion advances `playlist` and loads the next track.
    pub fn on_transport_event(
        &mut self,
        event: TransportEvent,
        playlist: &mut PlaylistModel,
        transport: &mut impl Transport,
    ) -> EventOutcome {
        let current = self.loaded.as_ref().map(|l| l.load);
        if current != Some(event.load) {
            tracing::trace!(event = ?event, current = ?current, "discarding stale transport event");
            return EventOutcome::Discarded;
        }

        match event.kind {
            TransportEventKind::PositionChanged { position } => {
                self.position = self.clamp_to_duration(position);
                EventOutcome::Applied
            }
            TransportEventKind::DurationChanged { duration } => {
                self.duration = duration;
                self.position = self.clamp_to_duration(self.position);
                EventOutcome::Applied
            }
            TransportEventKind::StateChanged { state } => match state {
                TransportState::Playing => {
                    self.state = SessionState::Playing;
                    EventOutcome::Applied
                }
                TransportState::Paused => {
                    self.state = SessionState::Paused;
                    EventOutcome::Applied
                }
                TransportState::Completed => {
                    self.state = SessionState::Completed;
                    // The queue is circular, so a non-empty playlist always has a next track.
                    let Some(next) = playlist.advance(Direction::Next) else {
                        self.state = SessionState::Idle;
                        return EventOutcome::Applied;
                    };
                    match playlist.get(next).cloned() {
                        Some(track) => {
                            self.load_track(&track, transport);
                            EventOutcome::Advanced(next)
                        }
                        None => EventOutcome::Applied,
                    }
                }
            },
            TransportEventKind::SourceFailed { reason } => {
                tracing::warn!(reason = %reason, "transport could not play the track");
                self.state = SessionState::Idle;
                EventOutcome::Failed(reason)
            }
        }
    }
}
