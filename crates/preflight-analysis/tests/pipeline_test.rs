//! End-to-end runs over a fixture project.

use std::fs;
use std::path::Path;

use preflight_analysis::enforcement::reporters::create_reporter;
use preflight_analysis::{CheckId, FindingKind, Preflight, RunStatus, Severity};
use preflight_core::config::PreflightConfig;

const MENU: &str = r#"function onOpen() {
  SpreadsheetApp.getUi()
    .createMenu('Tools')
    .addItem('Alpha', 'alpha')
    .addItem('Beta', 'beta')
    .addItem('Gamma', 'gamma')
    .addItem('Delta', 'delta')
    .addItem('Alpha again', 'alpha')
    .addItem('Ghost', 'ghost')
    .addToUi();
}
"#;

const ACTIONS: &str = r#"function alpha(range) {
  if (!range) return;
  range.clear();
}

function beta() {
  return callServer('beta');
}
"#;

const WEB: &str = r#"function gamma(e) {
  if (!e) return;
  return HtmlService.createHtmlOutput('ok');
}

function delta(e) {
  if (!e) return;
  try {
    callServer('delta');
  } catch (err) {
    Logger.log(err);
  }
}
"#;

const BROKEN: &str = r#"function sync(rows) {
  if (!rows) return;
  write(rows));
}
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "client/Menu.gs", MENU);
    write(dir.path(), "client/Actions.gs", ACTIONS);
    write(dir.path(), "web/Web.gs", WEB);
    write(dir.path(), "server/Sync.gs", BROKEN);
    dir
}

fn pipeline(root: &Path) -> Preflight {
    Preflight::from_config(root, &PreflightConfig::default()).unwrap()
}

#[test]
fn test_fixture_project_fails_on_missing_symbol_and_extra_paren() {
    let dir = fixture();
    let preflight = pipeline(dir.path());
    let load = preflight.load().unwrap();
    assert_eq!(load.documents.len(), 4);

    let symbols = preflight.symbol_report(&load);
    assert_eq!(symbols.declared_count, 5);
    assert_eq!(symbols.references_total, 6);
    assert_eq!(symbols.missing.len(), 1);
    assert_eq!(symbols.missing[0].name, "ghost");
    assert_eq!(symbols.missing[0].line, 9);

    let report = preflight.run_all(&load);
    let balance = report.check(CheckId::Balance).unwrap();
    let unmatched_closes: Vec<_> = balance
        .findings
        .iter()
        .filter(|f| f.kind == FindingKind::UnmatchedClose)
        .collect();
    assert_eq!(unmatched_closes.len(), 1);
    assert_eq!(unmatched_closes[0].locator.file, "server/Sync.gs");
    assert_eq!(unmatched_closes[0].locator.line, 3);
    assert_eq!(unmatched_closes[0].locator.column, Some(14));
    assert!(!balance
        .findings
        .iter()
        .any(|f| f.kind == FindingKind::UnmatchedOpen));

    assert_eq!(report.status(), RunStatus::Failed);
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_advisory_findings_do_not_fail_a_clean_project() {
    let dir = fixture();
    write(dir.path(), "server/Sync.gs", "function sync(rows) {\n  if (!rows) return;\n  write(rows);\n}\n");
    write(
        dir.path(),
        "client/Menu.gs",
        &MENU.replace("    .addItem('Ghost', 'ghost')\n", ""),
    );

    let preflight = pipeline(dir.path());
    let report = preflight.run_all(&preflight.load().unwrap());

    let heuristics = report.check(CheckId::Heuristics).unwrap();
    assert!(heuristics
        .findings
        .iter()
        .any(|f| f.kind == FindingKind::MissingErrorHandling && f.locator.line == 7));
    assert!(heuristics
        .findings
        .iter()
        .any(|f| f.kind == FindingKind::MissingValidation && f.locator.line == 6));
    assert_eq!(report.count(Severity::Defect), 0);
    assert_eq!(report.status(), RunStatus::Passed);
    assert_eq!(report.exit_code(), 0);
}

#[test]
fn test_reports_are_byte_identical_across_runs() {
    let dir = fixture();
    let first = {
        let preflight = pipeline(dir.path());
        let report = preflight.run_all(&preflight.load().unwrap());
        serde_json::to_vec(&report).unwrap()
    };
    let second = {
        let preflight = pipeline(dir.path());
        let report = preflight.run_all(&preflight.load().unwrap());
        serde_json::to_vec(&report).unwrap()
    };
    assert_eq!(first, second);

    let preflight = pipeline(dir.path());
    let load = preflight.load().unwrap();
    let console = create_reporter("console").unwrap();
    assert_eq!(
        console.generate(&preflight.run_all(&load)).unwrap(),
        console.generate(&preflight.run_all(&load)).unwrap()
    );
}

#[test]
fn test_conflict_marker_scan_over_whole_tree() {
    let dir = fixture();
    write(
        dir.path(),
        "shared/Merge.gs",
        "var a = 1;\n<<<<<<< HEAD\nvar b = 2;\n=======\nvar b = 3;\n>>>>>>> topic\n",
    );
    write(dir.path(), "docs/Guide.gs", "// <<<<<<< example of a marker\n");

    let preflight = pipeline(dir.path());
    let load = preflight.load_tree().unwrap();
    let report = preflight.run(&[CheckId::Patterns], &load);
    let conflicts: Vec<_> = report
        .findings()
        .filter(|f| f.kind == FindingKind::ConflictMarker)
        .map(|f| (f.locator.file.as_str(), f.locator.line))
        .collect();
    assert_eq!(
        conflicts,
        vec![("shared/Merge.gs", 2), ("shared/Merge.gs", 4), ("shared/Merge.gs", 6)]
    );
    assert_eq!(report.exit_code(), 1);
}

#[test]
fn test_structure_statistics() {
    let dir = fixture();
    let preflight = pipeline(dir.path());
    let load = preflight.load().unwrap();
    let structure = preflight.structure(&load);
    assert_eq!(structure.total.files, 4);
    assert_eq!(structure.total.functions, 6);
}
