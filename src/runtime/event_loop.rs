use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Command};
use crate::audio::{AudioPlayer, TransportEvent};
use crate::config;
use crate::picker::BrowserInput;
use crate::playlist::SortKey;
use crate::ui;

/// Result of translating one key press.
#[derive(Debug, Clone, PartialEq)]
enum KeyAction {
    Quit,
    Dispatch(Command),
    None,
}

/// Two-key prefixes (`gg`, `zz`) tracked across iterations.
#[derive(Debug, Default)]
struct KeyState {
    pending_gg: bool,
    pending_zz: bool,
}

impl KeyState {
    fn translate(&mut self, key: KeyEvent, cursor: usize, settings: &config::Settings) -> KeyAction {
        let gg = std::mem::take(&mut self.pending_gg);
        let zz = std::mem::take(&mut self.pending_zz);

        let seek_ms = settings.controls.seek_seconds.min(i64::MAX as u64 / 1000) as i64 * 1000;
        let rate = settings.audio.rate_step;
        let volume = settings.audio.volume_step;

        let cmd = match key.code {
            KeyCode::Char('q') => return KeyAction::Quit,
            KeyCode::Char('g') => {
                if gg {
                    Command::CursorTop
                } else {
                    self.pending_gg = true;
                    return KeyAction::None;
                }
            }
            KeyCode::Char('z') => {
                if zz {
                    Command::FollowPlayback
                } else {
                    self.pending_zz = true;
                    return KeyAction::None;
                }
            }
            KeyCode::Char('G') | KeyCode::End => Command::CursorBottom,
            KeyCode::Home => Command::CursorTop,
            KeyCode::Char('j') | KeyCode::Down => Command::CursorDown,
            KeyCode::Char('k') | KeyCode::Up => Command::CursorUp,
            KeyCode::Enter => Command::PlayRow(cursor),
            KeyCode::Char(' ') | KeyCode::Char('p') => Command::PlayPause,
            KeyCode::Char('l') | KeyCode::Right => Command::Next,
            KeyCode::Char('h') | KeyCode::Left => Command::Previous,
            KeyCode::Char('L') => Command::SeekBy(seek_ms),
            KeyCode::Char('H') => Command::SeekBy(-seek_ms),
            KeyCode::Char(']') => Command::ChangeRate(rate),
            KeyCode::Char('[') => Command::ChangeRate(-rate),
            KeyCode::Char('+') | KeyCode::Char('=') => Command::ChangeVolume(volume),
            KeyCode::Char('-') => Command::ChangeVolume(-volume),
            KeyCode::Char('s') => Command::CycleSortKey,
            KeyCode::Char(c @ '1'..='3') => {
                Command::SetSortKey(SortKey::ALL[(c as u8 - b'1') as usize])
            }
            KeyCode::Char('o') => Command::OpenFilePicker,
            KeyCode::Char('a') => Command::OpenAppendPicker,
            KeyCode::Char('O') => Command::OpenFolderPicker,
            _ => return KeyAction::None,
        };
        KeyAction::Dispatch(cmd)
    }
}

fn browser_input(code: KeyCode) -> Option<BrowserInput> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(BrowserInput::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(BrowserInput::Down),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => Some(BrowserInput::Activate),
        KeyCode::Left | KeyCode::Backspace | KeyCode::Char('h') => Some(BrowserInput::Parent),
        KeyCode::Char(' ') => Some(BrowserInput::ToggleMark),
        KeyCode::Char('d') => Some(BrowserInput::PickDirectory),
        KeyCode::Esc | KeyCode::Char('q') => Some(BrowserInput::Cancel),
        _ => None,
    }
}

/// Main terminal event loop: drains transport notifications, draws, and turns
/// key presses into commands. Returns `Ok(())` when quit is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App<AudioPlayer>,
    events: &Receiver<TransportEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut keys = KeyState::default();

    loop {
        // Arrival order matters: a stale Completed must be seen after the load that outdated it.
        while let Ok(ev) = events.try_recv() {
            app.handle_transport_event(ev);
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui, &settings.controls))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if app.browser().is_some() {
            if let Some(input) = browser_input(key.code) {
                app.browser_input(input);
            }
            continue;
        }

        match keys.translate(key, app.cursor(), settings) {
            KeyAction::Quit => {
                tracing::info!("quit requested");
                app.transport()
                    .quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                return Ok(());
            }
            KeyAction::Dispatch(cmd) => app.dispatch(cmd),
            KeyAction::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(keys: &mut KeyState, c: KeyCode) -> KeyAction {
        keys.translate(
            KeyEvent::new(c, KeyModifiers::NONE),
            4,
            &config::Settings::default(),
        )
    }

    #[test]
    fn double_g_jumps_to_top_and_other_keys_reset_the_prefix() {
        let mut keys = KeyState::default();
        assert_eq!(press(&mut keys, KeyCode::Char('g')), KeyAction::None);
        assert_eq!(
            press(&mut keys, KeyCode::Char('g')),
            KeyAction::Dispatch(Command::CursorTop)
        );

        press(&mut keys, KeyCode::Char('g'));
        press(&mut keys, KeyCode::Char('j'));
        assert_eq!(press(&mut keys, KeyCode::Char('g')), KeyAction::None);
    }

    #[test]
    fn steps_come_from_settings() {
        let mut keys = KeyState::default();
        let defaults = config::Settings::default();
        assert_eq!(
            press(&mut keys, KeyCode::Char('H')),
            KeyAction::Dispatch(Command::SeekBy(-(defaults.controls.seek_seconds as i64) * 1000))
        );
        assert_eq!(
            press(&mut keys, KeyCode::Char(']')),
            KeyAction::Dispatch(Command::ChangeRate(defaults.audio.rate_step))
        );
        assert_eq!(
            press(&mut keys, KeyCode::Char('-')),
            KeyAction::Dispatch(Command::ChangeVolume(-defaults.audio.volume_step))
        );
    }

    #[test]
    fn enter_plays_the_row_under_the_cursor() {
        let mut keys = KeyState::default();
        assert_eq!(
            press(&mut keys, KeyCode::Enter),
            KeyAction::Dispatch(Command::PlayRow(4))
        );
        assert_eq!(
            press(&mut keys, KeyCode::Char('2')),
            KeyAction::Dispatch(Command::SetSortKey(SortKey::Title))
        );
        assert_eq!(press(&mut keys, KeyCode::Char('q')), KeyAction::Quit);
    }

    #[test]
    fn browser_keys() {
        assert_eq!(browser_input(KeyCode::Char(' ')), Some(BrowserInput::ToggleMark));
        assert_eq!(browser_input(KeyCode::Backspace), Some(BrowserInput::Parent));
        assert_eq!(browser_input(KeyCode::Esc), Some(BrowserInput::Cancel));
        assert_eq!(browser_input(KeyCode::Char('x')), None);
    }
}
