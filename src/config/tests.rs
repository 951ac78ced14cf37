use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use crate::playlist::SortKey;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_hires_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("HIRES_CONFIG_PATH", "/tmp/hires-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/hires-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("hires")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_falls_back_to_home_local_state() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_STATE_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_log_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".local/state")
            .join("hires")
            .join("hires.log")
    );
}

#[test]
fn defaults_recognize_the_supported_extensions() {
    let s = Settings::default();
    assert_eq!(
        s.library.extensions,
        vec!["mp3", "flac", "wav", "m4a", "alac"]
    );
    assert_eq!(s.library.sort_key, SortKey::FileName);
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.audio.volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.rate_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.art_rows = 1;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions = vec!["  ".to_string()];
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file_and_parse_sort_key_aliases() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[audio]
volume = 0.5
rate_step = 0.05
quit_fade_out_ms = 0

[controls]
seek_seconds = 10

[ui]
header_text = "hello"
show_album_art = false
art_rows = 4

[library]
extensions = ["flac"]
recursive = false
sort_key = "track_number"
default_dir = "/music"

[logging]
level = "debug"
file = "/tmp/hires.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("HIRES_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("HIRES__AUDIO__VOLUME");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.volume, 0.5);
    assert_eq!(s.audio.rate_step, 0.05);
    assert_eq!(s.audio.quit_fade_out_ms, 0);
    assert_eq!(s.controls.seek_seconds, 10);
    assert_eq!(s.ui.header_text, "hello");
    assert!(!s.ui.show_album_art);
    assert_eq!(s.ui.art_rows, 4);
    assert_eq!(s.library.extensions, vec!["flac".to_string()]);
    assert!(!s.library.recursive);
    assert_eq!(s.library.sort_key, SortKey::TrackNumber);
    assert_eq!(
        s.library.default_dir,
        Some(std::path::PathBuf::from("/music"))
    );
    assert_eq!(s.logging.level, "debug");
    assert_eq!(
        s.logging.file,
        Some(std::path::PathBuf::from("/tmp/hires.log"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
seek_seconds = 5
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("HIRES_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("HIRES__CONTROLS__SEEK_SECONDS", "30");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.seek_seconds, 30);
}
