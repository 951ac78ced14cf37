use std::path::PathBuf;

use crate::app::Command;
use crate::config::LibrarySettings;

/// Translate command-line paths into the initial load.
///
/// A single directory is scanned; otherwise the given files are loaded in
/// order. With no arguments the configured default folder is scanned.
pub fn startup_command(args: &[PathBuf], library: &LibrarySettings) -> Option<Command> {
    match args {
        [] => library.default_dir.clone().map(Command::LoadDirectory),
        [dir] if dir.is_dir() => Some(Command::LoadDirectory(dir.clone())),
        _ => {
            let (dirs, files): (Vec<&PathBuf>, Vec<&PathBuf>) = args.iter().partition(|p| p.is_dir());
            for dir in dirs {
                tracing::warn!(dir = %dir.display(), "ignoring directory mixed with file arguments");
            }
            if files.is_empty() {
                None
            } else {
                Some(Command::LoadPaths(files.into_iter().cloned().collect()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn no_arguments_use_default_dir() {
        let mut library = LibrarySettings::default();
        assert_eq!(startup_command(&[], &library), None);

        library.default_dir = Some(PathBuf::from("/music"));
        assert_eq!(
            startup_command(&[], &library),
            Some(Command::LoadDirectory(PathBuf::from("/music")))
        );
    }

    #[test]
    fn single_directory_is_scanned() {
        let dir = tempdir().unwrap();
        let args = vec![dir.path().to_path_buf()];
        assert_eq!(
            startup_command(&args, &LibrarySettings::default()),
            Some(Command::LoadDirectory(dir.path().to_path_buf()))
        );
    }

    #[test]
    fn files_keep_argument_order_and_skip_directories() {
        let dir = tempdir().unwrap();
        let b = dir.path().join("b.mp3");
        let a = dir.path().join("a.mp3");
        fs::write(&b, b"x").unwrap();
        fs::write(&a, b"x").unwrap();

        let args = vec![b.clone(), dir.path().to_path_buf(), a.clone()];
        assert_eq!(
            startup_command(&args, &LibrarySettings::default()),
            Some(Command::LoadPaths(vec![b, a]))
        );
    }
}
