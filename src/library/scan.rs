use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

pub(crate) fn normalized_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Whether `path` has one of `extensions` (already normalized), ignoring case.
pub fn is_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            extensions.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Enumerate audio files under `dir` according to `settings`.
///
/// Runs to completion synchronously. Unreadable entries are skipped.
pub fn scan_audio_files(dir: &Path, settings: &LibrarySettings) -> Vec<PathBuf> {
    let extensions = normalized_extensions(&settings.extensions);

    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() || entry.path().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_audio_file(path, &extensions))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let exts = normalized_extensions(&LibrarySettings::default().extensions);
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.M4a"), &exts));
        assert!(is_audio_file(Path::new("/tmp/a.alac"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a.ogg"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &exts));
        assert!(!is_audio_file(Path::new("/tmp/a"), &exts));
    }

    #[test]
    fn normalized_extensions_strip_dots_and_blanks() {
        let exts = normalized_extensions(&[".MP3".into(), " flac ".into(), "".into()]);
        assert_eq!(exts, vec!["mp3".to_string(), "flac".to_string()]);
    }

    #[test]
    fn scan_recurses_and_filters_non_audio() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("disc 2");
        fs::create_dir_all(&sub).unwrap();
        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();
        fs::write(sub.join("a.flac"), b"not a real flac").unwrap();

        let files = scan_audio_files(dir.path(), &LibrarySettings::default());
        assert_eq!(files.len(), 2);
        assert!(files.contains(&dir.path().join("b.MP3")));
        assert!(files.contains(&sub.join("a.flac")));
    }

    #[test]
    fn scan_skips_hidden_by_default() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let files = scan_audio_files(dir.path(), &LibrarySettings::default());
        assert_eq!(files, vec![dir.path().join("visible.mp3")]);

        let settings = LibrarySettings {
            include_hidden: true,
            ..LibrarySettings::default()
        };
        assert_eq!(scan_audio_files(dir.path(), &settings).len(), 2);
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let files = scan_audio_files(dir.path(), &settings);
        assert_eq!(files, vec![dir.path().join("root.mp3")]);
    }

    #[test]
    fn scan_respects_max_depth() {
        let dir = tempdir().unwrap();
        let d1 = dir.path().join("d1");
        let d2 = d1.join("d2");
        fs::create_dir_all(&d2).unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        fs::write(d1.join("one.mp3"), b"not real").unwrap();
        fs::write(d2.join("two.mp3"), b"not real").unwrap();

        // WalkDir depth counts root as 0, children as 1, grandchildren as 2...
        let settings = LibrarySettings {
            max_depth: Some(2),
            ..LibrarySettings::default()
        };
        let files = scan_audio_files(dir.path(), &settings);

        assert!(files.contains(&dir.path().join("root.mp3")));
        assert!(files.contains(&d1.join("one.mp3")));
        assert!(!files.contains(&d2.join("two.mp3")));
    }
}
