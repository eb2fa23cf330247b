//! Document loader tests against real directory trees.

use std::fs;
use std::path::Path;

use preflight_analysis::scanner::{Category, CategorySpec, DocumentLoader, EncodingWarning};
use preflight_core::errors::{LoadError, PreflightErrorCode};

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn loader(root: &Path) -> DocumentLoader {
    DocumentLoader::new(root, &["gs".to_string()])
}

#[test]
fn test_missing_required_category_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "server/Api.gs", b"function api() {}\n");

    let err = loader(dir.path())
        .load(&[CategorySpec::required(Category::Client), CategorySpec::optional(Category::Server)])
        .unwrap_err();
    assert!(matches!(err, LoadError::MissingCategory { ref category, .. } if category == "client"));
    assert_eq!(err.error_code(), "MISSING_CATEGORY");
}

#[test]
fn test_missing_optional_category_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "client/Menu.gs", b"function onOpen() {}\n");

    let report = loader(dir.path())
        .load(&[CategorySpec::required(Category::Client), CategorySpec::optional(Category::Web)])
        .unwrap();
    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.in_category(Category::Web).count(), 0);
    assert!(report.failures.is_empty());
}

#[test]
fn test_documents_are_sorted_and_filtered() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "client/b.gs", b"b");
    write(dir.path(), "client/a.gs", b"a");
    write(dir.path(), "client/notes.md", b"# notes");
    write(dir.path(), "client/nested/c.gs", b"c");
    write(dir.path(), "server/z.gs", b"z");

    let report = loader(dir.path())
        .load(&[CategorySpec::required(Category::Client), CategorySpec::optional(Category::Server)])
        .unwrap();
    let paths: Vec<_> = report.documents.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["client/a.gs", "client/b.gs", "client/nested/c.gs", "server/z.gs"]);
    assert_eq!(report.documents[3].category, Category::Server);
}

#[test]
fn test_byte_order_mark_is_kept_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "client/Bom.gs", b"\xEF\xBB\xBFfunction a() {}\n");

    let report = loader(dir.path()).load(&[CategorySpec::required(Category::Client)]).unwrap();
    let doc = &report.documents[0];
    assert!(doc.text.starts_with('\u{feff}'));
    assert!(doc.warnings.contains(&EncodingWarning::ByteOrderMark));
    assert_eq!(doc.lines[0], "function a() {}");
}

#[test]
fn test_control_characters_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "client/Ctl.gs", b"var a = 1;\nvar b = '\x07';\n");

    let report = loader(dir.path()).load(&[CategorySpec::required(Category::Client)]).unwrap();
    let warning = &report.documents[0].warnings[0];
    assert!(matches!(warning, EncodingWarning::ControlCharacters { count: 1, first_line: 2 }));
}

#[test]
fn test_oversized_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "client/Big.gs", &[b'x'; 64]);
    write(dir.path(), "client/Small.gs", b"x");

    let report = loader(dir.path())
        .with_max_file_size(16)
        .load(&[CategorySpec::required(Category::Client)])
        .unwrap();
    assert_eq!(report.documents.len(), 1);
    assert_eq!(report.skipped, 1);
}

#[test]
fn test_ignore_file_is_honored() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ".preflightignore", b"generated/\n");
    write(dir.path(), "client/generated/Gen.gs", b"g");
    write(dir.path(), "client/node_modules/dep.gs", b"d");
    write(dir.path(), "client/Real.gs", b"r");

    let report = loader(dir.path()).load(&[CategorySpec::required(Category::Client)]).unwrap();
    let paths: Vec<_> = report.documents.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["client/Real.gs"]);
}

#[test]
fn test_load_tree_classifies_by_path() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "table/client/Menu.gs", b"m");
    write(dir.path(), "table/server/Api.gs", b"s");
    write(dir.path(), "archive/Old.gs", b"o");
    write(dir.path(), ".hidden/Secret.gs", b"h");

    let report = loader(dir.path()).load_tree().unwrap();
    let entries: Vec<_> = report
        .documents
        .iter()
        .map(|d| (d.path.as_str(), d.category))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("archive/Old.gs", Category::Other),
            ("table/client/Menu.gs", Category::Client),
            ("table/server/Api.gs", Category::Server),
        ]
    );
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_recorded_and_others_load() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "client/Good.gs", b"function good() {}\n");
    std::os::unix::fs::symlink(
        dir.path().join("client/Gone.gs"),
        dir.path().join("client/Broken.gs"),
    )
    .unwrap();

    let report = loader(dir.path()).load(&[CategorySpec::required(Category::Client)]).unwrap();
    let paths: Vec<_> = report.documents.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["client/Good.gs"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, "client/Broken.gs");
    assert!(report.failures[0].message.contains("IO error"));
}

#[test]
fn test_invalid_root() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    let err = loader(&missing).load_tree().unwrap_err();
    assert!(matches!(err, LoadError::InvalidRoot { .. }));
}
