use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::error::AudioError;

use super::sink::create_sink_at;
use super::types::{AudioCmd, LoadId, TransportEvent, TransportEventKind, TransportState};

/// How often position notifications are emitted while playing.
const TICK: Duration = Duration::from_millis(200);

/// Notification bookkeeping for the current source, kept apart from the sink
/// so it can be exercised without an output device.
#[derive(Debug, Clone)]
pub(super) struct SourceState {
    pub(super) load: LoadId,
    pub(super) paused: bool,
    pub(super) completed: bool,
}

impl SourceState {
    pub(super) fn new(load: LoadId) -> Self {
        Self {
            load,
            paused: true,
            completed: false,
        }
    }

    fn event(&self, kind: TransportEventKind) -> TransportEvent {
        TransportEvent::new(self.load, kind)
    }

    pub(super) fn resumed(&mut self) -> TransportEvent {
        self.paused = false;
        self.event(TransportEventKind::StateChanged {
            state: TransportState::Playing,
        })
    }

    pub(super) fn paused(&mut self) -> TransportEvent {
        self.paused = true;
        self.event(TransportEventKind::StateChanged {
            state: TransportState::Paused,
        })
    }

    pub(super) fn sought(&mut self, position: Duration) -> TransportEvent {
        self.completed = false;
        self.event(TransportEventKind::PositionChanged { position })
    }

    /// Periodic check: report progress, or completion exactly once when the sink drained.
    pub(super) fn on_tick(&mut self, drained: bool, position: Duration) -> Option<TransportEvent> {
        if self.paused || self.completed {
            return None;
        }
        if drained {
            self.completed = true;
            return Some(self.event(TransportEventKind::StateChanged {
                state: TransportState::Completed,
            }));
        }
        Some(self.event(TransportEventKind::PositionChanged { position }))
    }
}

struct Loaded {
    path: PathBuf,
    sink: Sink,
    state: SourceState,
    /// Where a rebuilt sink started; its own position counts from zero.
    offset: Duration,
}

/// Owns the output stream and the single sink that is swapped between tracks.
struct Deck {
    stream: Option<OutputStream>,
    events: Sender<TransportEvent>,
    current: Option<Loaded>,
    rate: f32,
    volume: f32,
}

impl Deck {
    fn emit(&self, event: TransportEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("transport event receiver dropped");
        }
    }

    fn handle(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::SetSource { path, load } => self.set_source(path, load),
            AudioCmd::Play | AudioCmd::Resume => {
                if let Some(cur) = self.current.as_mut() {
                    cur.sink.play();
                    let ev = cur.state.resumed();
                    self.emit(ev);
                }
            }
            AudioCmd::Pause => {
                if let Some(cur) = self.current.as_mut() {
                    cur.sink.pause();
                    let ev = cur.state.paused();
                    self.emit(ev);
                }
            }
            AudioCmd::Seek(position) => self.seek(position),
            AudioCmd::SetRate(rate) => {
                self.rate = rate;
                if let Some(cur) = self.current.as_ref() {
                    cur.sink.set_speed(rate);
                }
            }
            AudioCmd::SetVolume(volume) => {
                self.volume = volume;
                if let Some(cur) = self.current.as_ref() {
                    cur.sink.set_volume(volume);
                }
            }
            AudioCmd::Quit { .. } => {}
        }
    }

    fn set_source(&mut self, path: PathBuf, load: LoadId) {
        // Only one sink may exist at a time so tracks never overlap.
        if let Some(old) = self.current.take() {
            old.sink.stop();
        }

        let Some(stream) = self.stream.as_ref() else {
            self.emit(TransportEvent::new(
                load,
                TransportEventKind::SourceFailed {
                    reason: "no audio output device".to_string(),
                },
            ));
            return;
        };

        match create_sink_at(stream, &path, Duration::ZERO) {
            Ok((sink, total)) => {
                sink.set_speed(self.rate);
                sink.set_volume(self.volume);
                tracing::debug!(path = %path.display(), load = load.0, "source loaded");
                self.current = Some(Loaded {
                    path,
                    sink,
                    state: SourceState::new(load),
                    offset: Duration::ZERO,
                });
                if let Some(duration) = total {
                    self.emit(TransportEvent::new(
                        load,
                        TransportEventKind::DurationChanged { duration },
                    ));
                }
                self.emit(TransportEvent::new(
                    load,
                    TransportEventKind::PositionChanged {
                        position: Duration::ZERO,
                    },
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to open source");
                self.emit(TransportEvent::new(
                    load,
                    TransportEventKind::SourceFailed {
                        reason: e.to_string(),
                    },
                ));
            }
        }
    }

    fn seek(&mut self, position: Duration) {
        let Some(cur) = self.current.as_mut() else {
            return;
        };

        if cur.sink.try_seek(position).is_ok() {
            cur.offset = Duration::ZERO;
        } else {
            // Not every decoder can seek: rebuild the sink and skip into the file.
            tracing::debug!(path = %cur.path.display(), "try_seek failed, rebuilding sink");
            let Some(stream) = self.stream.as_ref() else {
                return;
            };
            match create_sink_at(stream, &cur.path, position) {
                Ok((sink, _)) => {
                    cur.sink.stop();
                    sink.set_speed(self.rate);
                    sink.set_volume(self.volume);
                    if !cur.state.paused {
                        sink.play();
                    }
                    cur.sink = sink;
                    cur.offset = position;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "seek failed");
                    return;
                }
            }
        }

        let ev = cur.state.sought(position);
        self.emit(ev);
    }

    fn tick(&mut self) {
        let Some(cur) = self.current.as_mut() else {
            return;
        };
        if let Some(ev) = cur.state.on_tick(cur.sink.empty(), cur.offset + cur.sink.get_pos()) {
            self.emit(ev);
        }
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(cur) = self.current.take() {
            // Fade out gently before stopping.
            if !cur.state.paused {
                fade_out_sink(&cur.sink, self.volume, fade_out_ms);
            }
            cur.sink.stop();
        }
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<TransportEvent>,
    volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped, which garbles the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                let err = AudioError::from(e);
                tracing::error!(error = %err, "audio output unavailable");
                None
            }
        };

        let mut deck = Deck {
            stream,
            events,
            current: None,
            rate: 1.0,
            volume,
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    deck.quit(fade_out_ms);
                    break;
                }
                Ok(cmd) => deck.handle(cmd),
                Err(RecvTimeoutError::Timeout) => deck.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("audio thread stopped");
    })
}
