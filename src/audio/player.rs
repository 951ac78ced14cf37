use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, Transport, TransportEvent};

/// Handle to the audio thread. Commands go in through [`Transport::send`];
/// notifications come out of the receiver returned by [`AudioPlayer::new`].
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(volume: f32) -> (Self, Receiver<TransportEvent>) {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, event_rx) = mpsc::channel::<TransportEvent>();

        let audio_handle = spawn_audio_thread(rx, event_tx, volume);

        let player = Self {
            tx,
            join: Mutex::new(Some(audio_handle)),
        };
        (player, event_rx)
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.tx.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Transport for AudioPlayer {
    fn send(&mut self, cmd: AudioCmd) {
        if let Err(e) = self.tx.send(cmd) {
            tracing::warn!(cmd = ?e.0, "audio thread is gone, dropping command");
        }
    }
}
