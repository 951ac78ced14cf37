use super::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn extensions() -> Vec<String> {
    vec!["mp3".into(), "flac".into()]
}

fn touch(path: &Path) {
    fs::write(path, b"x").unwrap();
}

fn names(browser: &FileBrowser) -> Vec<&str> {
    browser.entries().iter().map(|e| e.name.as_str()).collect()
}

#[test]
fn lists_directories_first_then_audio_in_natural_order() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("Disc 10")).unwrap();
    fs::create_dir(dir.path().join("Disc 2")).unwrap();
    fs::create_dir(dir.path().join(".hidden")).unwrap();
    touch(&dir.path().join("track10.mp3"));
    touch(&dir.path().join("track2.FLAC"));
    touch(&dir.path().join("notes.txt"));

    let browser = FileBrowser::open(dir.path(), PickerMode::Files, &extensions(), false);
    assert_eq!(names(&browser), vec!["Disc 2", "Disc 10", "track2.FLAC", "track10.mp3"]);
}

#[test]
fn enter_on_file_without_marks_picks_that_file() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.mp3"));
    touch(&dir.path().join("b.mp3"));

    let mut browser = FileBrowser::open(dir.path(), PickerMode::Files, &extensions(), false);
    browser.handle(BrowserInput::Down);
    let outcome = browser.handle(BrowserInput::Activate);
    assert_eq!(outcome, PickerOutcome::Files(vec![dir.path().join("b.mp3")]));
}

#[test]
fn marked_files_are_returned_in_mark_order() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.mp3"));
    touch(&dir.path().join("b.mp3"));
    touch(&dir.path().join("c.mp3"));

    let mut browser = FileBrowser::open(dir.path(), PickerMode::Files, &extensions(), false);
    browser.handle(BrowserInput::Down);
    browser.handle(BrowserInput::Down);
    browser.handle(BrowserInput::ToggleMark); // c
    browser.handle(BrowserInput::Up);
    browser.handle(BrowserInput::Up);
    browser.handle(BrowserInput::ToggleMark); // a, cursor moves to b
    assert_eq!(browser.marked_count(), 2);
    assert!(browser.is_marked(&dir.path().join("c.mp3")));

    let outcome = browser.handle(BrowserInput::Activate);
    assert_eq!(
        outcome,
        PickerOutcome::Files(vec![dir.path().join("c.mp3"), dir.path().join("a.mp3")])
    );
}

#[test]
fn toggling_a_mark_twice_unmarks() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("a.mp3"));

    let mut browser = FileBrowser::open(dir.path(), PickerMode::Files, &extensions(), false);
    browser.handle(BrowserInput::ToggleMark);
    browser.handle(BrowserInput::ToggleMark);
    assert_eq!(browser.marked_count(), 0);
}

#[test]
fn navigating_into_and_out_of_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("album");
    fs::create_dir(&sub).unwrap();
    touch(&sub.join("01.mp3"));
    touch(&dir.path().join("z.mp3"));

    let mut browser = FileBrowser::open(dir.path(), PickerMode::Files, &extensions(), false);
    assert_eq!(browser.handle(BrowserInput::Activate), PickerOutcome::Pending);
    assert_eq!(browser.cwd(), sub.as_path());
    assert_eq!(names(&browser), vec!["01.mp3"]);

    browser.handle(BrowserInput::Parent);
    assert_eq!(browser.cwd(), dir.path());
    assert_eq!(browser.entries()[browser.cursor()].path, sub);
}

#[test]
fn directory_mode_confirms_current_directory() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("album");
    fs::create_dir(&sub).unwrap();
    touch(&dir.path().join("a.mp3"));

    let mut browser = FileBrowser::open(dir.path(), PickerMode::Directory, &extensions(), false);
    browser.handle(BrowserInput::Down);
    assert_eq!(browser.handle(BrowserInput::Activate), PickerOutcome::Pending);
    assert_eq!(browser.handle(BrowserInput::ToggleMark), PickerOutcome::Pending);
    assert_eq!(browser.marked_count(), 0);

    browser.handle(BrowserInput::Up);
    browser.handle(BrowserInput::Activate);
    assert_eq!(
        browser.handle(BrowserInput::PickDirectory),
        PickerOutcome::Directory(sub)
    );
}

#[test]
fn cancel_and_unreadable_directory() {
    let dir = tempdir().unwrap();
    let mut browser = FileBrowser::open(&dir.path().join("missing"), PickerMode::Files, &extensions(), false);
    assert!(browser.entries().is_empty());
    assert_eq!(browser.handle(BrowserInput::Activate), PickerOutcome::Pending);
    assert_eq!(browser.handle(BrowserInput::Cancel), PickerOutcome::Cancelled);
}
