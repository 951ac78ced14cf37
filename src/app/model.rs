//! Application model: `App` ties the playlist, the playback session and the
//! transport together and executes user intents expressed as [`Command`]s.
//!
//! The UI is a projection of this state; nothing here knows about the terminal.

use std::path::{Path, PathBuf};

use crate::audio::{Transport, TransportEvent};
use crate::config::{LibrarySettings, Settings};
use crate::library::{ArtPixels, TagReader, Track, load_album_art};
use crate::picker::{BrowserInput, FileBrowser, PickerMode, PickerOutcome};
use crate::playlist::{Direction, PlaylistModel, SortKey};
use crate::session::{EventOutcome, PlaybackSession, SessionState};

/// User intents, executed synchronously by [`App::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PlayPause,
    Next,
    Previous,
    /// Relative seek in milliseconds.
    SeekBy(i64),
    ChangeRate(f32),
    ChangeVolume(f32),
    SetSortKey(SortKey),
    CycleSortKey,
    /// Play the row at this index of the queue as currently displayed.
    PlayRow(usize),
    CursorUp,
    CursorDown,
    CursorTop,
    CursorBottom,
    FollowPlayback,
    OpenFilePicker,
    /// Pick files to add after the current queue.
    OpenAppendPicker,
    OpenFolderPicker,
    LoadPaths(Vec<PathBuf>),
    AppendPaths(Vec<PathBuf>),
    LoadDirectory(PathBuf),
}

pub struct App<T: Transport> {
    playlist: PlaylistModel,
    session: PlaybackSession,
    transport: T,
    reader: Box<dyn TagReader>,
    library: LibrarySettings,

    /// Art grid size in terminal cells, `None` when art is disabled.
    art_size: Option<(u16, u16)>,
    art: Option<ArtPixels>,

    cursor: usize,
    follow_playback: bool,
    browser: Option<FileBrowser>,
    /// Picked files are appended instead of replacing the queue.
    append_pick: bool,
    status: Option<String>,
    current_dir: Option<PathBuf>,
}

impl<T: Transport> App<T> {
    pub fn new(transport: T, reader: Box<dyn TagReader>, settings: &Settings) -> Self {
        let art_size = settings
            .ui
            .show_album_art
            .then(|| (settings.ui.art_rows * 2, settings.ui.art_rows));

        Self {
            playlist: PlaylistModel::new(settings.library.sort_key),
            session: PlaybackSession::new(settings.audio.volume),
            transport,
            reader,
            library: settings.library.clone(),
            art_size,
            art: None,
            cursor: 0,
            follow_playback: settings.ui.follow_playback,
            browser: None,
            append_pick: false,
            status: None,
            current_dir: settings.library.default_dir.clone(),
        }
    }

    pub fn playlist(&self) -> &PlaylistModel {
        &self.playlist
    }

    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn art(&self) -> Option<&ArtPixels> {
        self.art.as_ref()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn follow_playback(&self) -> bool {
        self.follow_playback
    }

    pub fn browser(&self) -> Option<&FileBrowser> {
        self.browser.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// The track the transport is playing, if any.
    pub fn now_playing(&self) -> Option<&Track> {
        self.session.loaded()?;
        self.playlist.active_track()
    }

    pub fn dispatch(&mut self, cmd: Command) {
        tracing::debug!(?cmd, "dispatch");
        match cmd {
            Command::PlayPause => {
                // Idle with a loaded track means the source failed; retry the load.
                if self.session.loaded().is_none() || self.session.state() == SessionState::Idle {
                    self.play_active();
                } else {
                    self.session.toggle_play_pause(&mut self.transport);
                }
            }
            Command::Next => self.skip(Direction::Next),
            Command::Previous => self.skip(Direction::Previous),
            Command::SeekBy(ms) => self.session.seek_by(ms, &mut self.transport),
            Command::ChangeRate(delta) => self.session.set_rate(delta, &mut self.transport),
            Command::ChangeVolume(delta) => self.session.set_volume(delta, &mut self.transport),
            Command::SetSortKey(key) => self.set_sort_key(key),
            Command::CycleSortKey => self.set_sort_key(self.playlist.sort_key().cycle()),
            Command::PlayRow(index) => {
                if index < self.playlist.len() {
                    self.playlist.select_index(index);
                    self.follow_playback = true;
                    self.play_active();
                }
            }
            Command::CursorUp => self.move_cursor(|c, _| c.saturating_sub(1)),
            Command::CursorDown => self.move_cursor(|c, len| (c + 1).min(len.saturating_sub(1))),
            Command::CursorTop => self.move_cursor(|_, _| 0),
            Command::CursorBottom => self.move_cursor(|_, len| len.saturating_sub(1)),
            Command::FollowPlayback => {
                self.follow_playback = true;
                self.sync_cursor();
            }
            Command::OpenFilePicker => self.open_browser(PickerMode::Files, false),
            Command::OpenAppendPicker => self.open_browser(PickerMode::Files, true),
            Command::OpenFolderPicker => self.open_browser(PickerMode::Directory, false),
            Command::LoadPaths(paths) => self.load_paths(paths),
            Command::AppendPaths(paths) => self.append_paths(paths),
            Command::LoadDirectory(dir) => self.load_directory(&dir),
        }
    }

    /// Route a transport notification through the session.
    pub fn handle_transport_event(&mut self, event: TransportEvent) {
        match self
            .session
            .on_transport_event(event, &mut self.playlist, &mut self.transport)
        {
            EventOutcome::Advanced(_) => {
                self.refresh_art();
                self.sync_cursor();
            }
            EventOutcome::Failed(reason) => {
                let name = self
                    .playlist
                    .active_track()
                    .map(|t| t.filename.clone())
                    .unwrap_or_default();
                self.status = Some(format!("Cannot play {name}: {reason}"));
            }
            EventOutcome::Applied | EventOutcome::Discarded => {}
        }
    }

    /// Feed input to the open browser. No-op when the browser is closed.
    pub fn browser_input(&mut self, input: BrowserInput) {
        let Some(browser) = self.browser.as_mut() else {
            return;
        };
        match browser.handle(input) {
            PickerOutcome::Pending => {}
            PickerOutcome::Cancelled => self.browser = None,
            PickerOutcome::Files(paths) => {
                self.browser = None;
                if self.append_pick {
                    self.dispatch(Command::AppendPaths(paths));
                } else {
                    self.dispatch(Command::LoadPaths(paths));
                }
            }
            PickerOutcome::Directory(dir) => {
                self.browser = None;
                self.dispatch(Command::LoadDirectory(dir));
            }
        }
    }

    fn skip(&mut self, direction: Direction) {
        if self.playlist.advance(direction).is_some() {
            self.play_active();
        }
    }

    fn set_sort_key(&mut self, key: SortKey) {
        let under_cursor = self.playlist.get(self.cursor).map(|t| t.path.clone());
        self.playlist.set_sort_key(key);

        if self.follow_playback {
            self.sync_cursor();
        } else if let Some(path) = under_cursor {
            self.cursor = self
                .playlist
                .tracks()
                .iter()
                .position(|t| t.path == path)
                .unwrap_or(0);
        }
    }

    fn move_cursor(&mut self, f: impl Fn(usize, usize) -> usize) {
        self.follow_playback = false;
        self.cursor = f(self.cursor, self.playlist.len());
    }

    fn sync_cursor(&mut self) {
        if self.follow_playback {
            self.cursor = self.playlist.active_index().unwrap_or(0);
        }
        self.cursor = self.cursor.min(self.playlist.len().saturating_sub(1));
    }

    fn open_browser(&mut self, mode: PickerMode, append: bool) {
        self.append_pick = append;
        let start = self
            .current_dir
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        self.browser = Some(FileBrowser::open(
            &start,
            mode,
            &self.library.extensions,
            self.library.include_hidden,
        ));
    }

    fn play_active(&mut self) {
        let Some(track) = self.playlist.active_track().cloned() else {
            return;
        };
        self.session.load_track(&track, &mut self.transport);
        self.refresh_art();
        self.sync_cursor();
    }

    fn refresh_art(&mut self) {
        self.art = match (self.art_size, self.playlist.active_track()) {
            (Some((cols, rows)), Some(track)) => {
                load_album_art(self.reader.as_ref(), &track.path, cols, rows)
            }
            _ => None,
        };
    }

    fn load_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        self.current_dir = paths[0].parent().map(Path::to_path_buf);
        self.playlist.load_from_paths(&paths, self.reader.as_ref());
        self.status = Some(format!("Loaded {} track(s)", self.playlist.len()));
        self.play_active();
    }

    fn append_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        self.playlist.append_paths(&paths, self.reader.as_ref());
        self.status = Some(format!("Added {} track(s)", paths.len()));
        if self.session.loaded().is_none() {
            self.play_active();
        }
    }

    fn load_directory(&mut self, dir: &Path) {
        match self
            .playlist
            .load_from_directory(dir, &self.library, self.reader.as_ref())
        {
            Ok(count) => {
                self.current_dir = Some(dir.to_path_buf());
                self.status = Some(format!("Loaded {count} track(s) from {}", dir.display()));
                self.play_active();
            }
            Err(e) => {
                tracing::info!(error = %e, "folder load failed");
                self.status = Some(e.to_string());
            }
        }
    }
}
