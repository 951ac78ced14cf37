//! Browser state for picking audio files or a folder.
//!
//! Input arrives as [`BrowserInput`] so the model stays free of terminal types.

use std::fs;
use std::path::{Path, PathBuf};

use crate::library::{is_audio_file, is_hidden, natural_cmp, normalized_extensions};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PickerMode {
    /// Pick one or more audio files.
    Files,
    /// Pick a folder to scan.
    Directory,
}

/// Result of feeding input to the browser.
#[derive(Debug, Clone, PartialEq)]
pub enum PickerOutcome {
    Pending,
    Cancelled,
    Files(Vec<PathBuf>),
    Directory(PathBuf),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BrowserInput {
    Up,
    Down,
    /// Enter a directory or confirm.
    Activate,
    Parent,
    ToggleMark,
    /// Confirm the directory being browsed.
    PickDirectory,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

#[derive(Debug)]
pub struct FileBrowser {
    mode: PickerMode,
    cwd: PathBuf,
    entries: Vec<Entry>,
    cursor: usize,
    /// In the order they were marked.
    marked: Vec<PathBuf>,
    extensions: Vec<String>,
    include_hidden: bool,
}

impl FileBrowser {
    /// Open at `start_dir`, listing directories and files with `extensions`.
    pub fn open(start_dir: &Path, mode: PickerMode, extensions: &[String], include_hidden: bool) -> Self {
        let mut browser = Self {
            mode,
            cwd: start_dir.to_path_buf(),
            entries: Vec::new(),
            cursor: 0,
            marked: Vec::new(),
            extensions: normalized_extensions(extensions),
            include_hidden,
        };
        browser.refresh();
        browser
    }

    pub fn mode(&self) -> PickerMode {
        self.mode
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_marked(&self, path: &Path) -> bool {
        self.marked.iter().any(|p| p == path)
    }

    pub fn marked_count(&self) -> usize {
        self.marked.len()
    }

    fn refresh(&mut self) {
        let read = match fs::read_dir(&self.cwd) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::debug!(dir = %self.cwd.display(), error = %e, "cannot list directory");
                self.entries.clear();
                self.cursor = 0;
                return;
            }
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in read.filter_map(Result::ok) {
            let path = entry.path();
            if !self.include_hidden && is_hidden(&path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if path.is_dir() {
                dirs.push(Entry {
                    path,
                    name,
                    is_dir: true,
                });
            } else if is_audio_file(&path, &self.extensions) {
                files.push(Entry {
                    path,
                    name,
                    is_dir: false,
                });
            }
        }
        dirs.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        files.sort_by(|a, b| natural_cmp(&a.name, &b.name));

        self.entries = dirs;
        self.entries.extend(files);
        self.cursor = 0;
    }

    fn enter(&mut self, dir: PathBuf) {
        self.cwd = dir;
        self.refresh();
    }

    fn current(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    pub fn handle(&mut self, input: BrowserInput) -> PickerOutcome {
        match input {
            BrowserInput::Up => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            BrowserInput::Down => {
                if self.cursor + 1 < self.entries.len() {
                    self.cursor += 1;
                }
            }
            BrowserInput::Parent => {
                if let Some(parent) = self.cwd.parent().map(Path::to_path_buf) {
                    let from = self.cwd.clone();
                    self.enter(parent);
                    if let Some(i) = self.entries.iter().position(|e| e.path == from) {
                        self.cursor = i;
                    }
                }
            }
            BrowserInput::ToggleMark => {
                if self.mode == PickerMode::Files {
                    if let Some(entry) = self.current().filter(|e| !e.is_dir) {
                        let path = entry.path.clone();
                        match self.marked.iter().position(|p| *p == path) {
                            Some(i) => {
                                self.marked.remove(i);
                            }
                            None => self.marked.push(path),
                        }
                    }
                    if self.cursor + 1 < self.entries.len() {
                        self.cursor += 1;
                    }
                }
            }
            BrowserInput::Activate => match self.current().cloned() {
                Some(entry) if entry.is_dir => self.enter(entry.path),
                Some(entry) if self.mode == PickerMode::Files => {
                    let picked = if self.marked.is_empty() {
                        vec![entry.path]
                    } else {
                        std::mem::take(&mut self.marked)
                    };
                    return PickerOutcome::Files(picked);
                }
                _ => {}
            },
            BrowserInput::PickDirectory => {
                if self.mode == PickerMode::Directory {
                    return PickerOutcome::Directory(self.cwd.clone());
                }
            }
            BrowserInput::Cancel => return PickerOutcome::Cancelled,
        }
        PickerOutcome::Pending
    }
}
