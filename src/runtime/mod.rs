use std::env;
use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::library::LoftyTagReader;

mod event_loop;
mod logging;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let log_path = logging::init(&settings.logging);
    tracing::info!(log = ?log_path, "starting hires");

    let args: Vec<PathBuf> = env::args_os().skip(1).map(PathBuf::from).collect();

    let (audio_player, events) = AudioPlayer::new(settings.audio.volume);
    let mut app = App::new(audio_player, Box::new(LoftyTagReader), &settings);

    if let Some(cmd) = startup::startup_command(&args, &settings.library) {
        app.dispatch(cmd);
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        tracing::error!(error = %e, "event loop failed");
    }
    run_result
}
