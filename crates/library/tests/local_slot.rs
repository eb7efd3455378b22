use quire_config::{Config, DEFAULT_SLOT};
use quire_library::error::ErrorKind;
use quire_library::{BackupStatus, ChapterRemoval, Session};
use quire_model::{ChapterField, UNTITLED};
use serde_json::{Value, json};
use std::path::Path;

fn config(root: &Path) -> Config {
    let mut config = Config::default();
    config.storage.root = root.to_path_buf();
    config
}

#[test]
fn test_edits_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());

    let mut session = Session::from_config(&config).unwrap();
    let book_id = session.create_book().unwrap();
    session.rename_book(&book_id, "Field Notes").unwrap();
    let first = session.book(&book_id).unwrap().chapters[0].id.clone();
    let second = session.add_chapter(&book_id).unwrap();
    session.update_chapter_field(&book_id, &second, ChapterField::Content, "Day two").unwrap();
    session.capture_current().unwrap();
    assert!(matches!(session.backup_status(), BackupStatus::LastBackup { .. }));

    let reopened = Session::from_config(&config).unwrap();
    assert_eq!(reopened.library(), session.library());
    assert!(reopened.current_book_id().is_none());
    let book = reopened.book(&book_id).unwrap();
    assert_eq!(book.title(), "Field Notes");
    assert_eq!(book.chapters.iter().map(|c| c.id.clone()).collect::<Vec<_>>(), vec![first, second]);
    assert_eq!(book.change_history.len(), 1);
}

#[test]
fn test_legacy_slot_is_rewritten_once() {
    let dir = tempfile::tempdir().unwrap();
    let slot = dir.path().join(DEFAULT_SLOT);
    let legacy = json!({"books": [
        {
            "id": "b1",
            "title": "",
            "lastEdited": 1_700_000_000_000_i64,
            "chapters": [{"id": "c1", "title": "", "content": ""}],
            "changeHistory": [],
        },
    ]});
    std::fs::write(&slot, legacy.to_string()).unwrap();

    let session = Session::from_config(&config(dir.path())).unwrap();
    let books = session.list_books();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].display_title(), UNTITLED);

    let stored: Value = serde_json::from_slice(&std::fs::read(&slot).unwrap()).unwrap();
    assert!(stored.get("books").is_none());
    assert_eq!(stored["b1"]["id"], "b1");

    let again = Session::from_config(&config(dir.path())).unwrap();
    assert_eq!(again.library(), session.library());
}

#[test]
fn test_chapter_floor_and_import() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::from_config(&config(dir.path())).unwrap();
    let book_id = session.create_book().unwrap();
    let only = session.book(&book_id).unwrap().chapters[0].id.clone();
    assert_eq!(session.delete_chapter(&book_id, &only).unwrap(), ChapterRemoval::LastChapter);

    let export_dir = tempfile::tempdir().unwrap();
    let path = session.write_export(export_dir.path()).unwrap();
    session.delete_book(&book_id).unwrap();
    assert!(session.library().is_empty());

    let import = Session::read_import(&path).unwrap();
    session.import_all(import).unwrap();
    assert!(session.book(&book_id).is_some());

    let err = quire_library::transfer::parse_import(br#"{"shelves": []}"#).unwrap_err();
    assert!(matches!(&*err, ErrorKind::InvalidFormat));
}

#[test]
fn test_read_only_storage_keeps_disk_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path());
    config.storage.read_only = true;

    let mut session = Session::from_config(&config).unwrap();
    session.create_book().unwrap();
    assert!(!dir.path().join(DEFAULT_SLOT).exists());
}
