//! Integration tests for the non-interactive command line

use std::path::Path;
use std::process::Command;

fn run_command(db: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .arg("run")
        .arg("-q")
        .arg("--")
        // Tests must be deterministic and not depend on a user's ~/.config/shiftgrid/config.toml.
        .arg("--no-config")
        .arg("--db")
        .arg(db)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_totals_single_mode() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("plans.db");
    let (stdout, _, code) = run_command(
        &db,
        &[
            "October", "--columns", "Ann,Bob", "--set", "A1=8", "--set", "B1=16", "--set",
            "C2=A", "--set", "A3=x", "--set", "B3=4", "--totals",
        ],
    );
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Ann\t12\nBob\t8");
}

#[test]
fn test_totals_double_mode() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("plans.db");
    let (stdout, _, code) = run_command(
        &db,
        &[
            "October", "--double", "--columns", "Ann", "--set", "A1=6", "--set", "B1=10",
            "--set", "C1=11", "--set", "D1=15", "--set", "B2=B", "--totals",
        ],
    );
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Ann\t8");
}

#[test]
fn test_save_reopen_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("plans.db");
    let (stdout, _, code) = run_command(
        &db,
        &["October", "--columns", "Ann", "--set", "A1=8", "--set", "B1=16", "--save"],
    );
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Saved October ("));
    assert!(stdout.trim_end().ends_with("to default/schedules"));

    // Reopening keeps the stored cells; --columns is ignored for an existing schedule.
    let (stdout, stderr, code) =
        run_command(&db, &["October", "--columns", "Zed", "--set", "A2=A", "--totals", "--save"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Ann\t16\n"));
    assert!(stderr.contains("ignored"));

    let (stdout, _, code) = run_command(&db, &["--list"]);
    assert_eq!(code, 0);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("\tOctober"));
}

#[test]
fn test_unsaved_edits_warn() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("plans.db");
    let (_, stderr, code) = run_command(&db, &["October", "--columns", "Ann", "--set", "A1=8"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("edits to 'October' were not saved"));

    let (stdout, _, _) = run_command(&db, &["--list"]);
    assert_eq!(stdout.trim(), "");
}

#[test]
fn test_collections_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("plans.db");
    run_command(&db, &["October", "--save"]);
    run_command(&db, &["October", "--collection", "archive", "--save"]);
    run_command(&db, &["Payroll", "--database", "finance", "--save"]);

    let (stdout, _, _) = run_command(&db, &["--list-databases"]);
    assert_eq!(stdout.trim(), "default\nfinance");

    let (stdout, _, _) = run_command(&db, &["--list-collections"]);
    assert_eq!(stdout.trim(), "archive\nschedules");

    let (stdout, _, code) = run_command(&db, &["--delete", "October"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "Deleted October from default/schedules");

    let (_, stderr, code) = run_command(&db, &["--delete", "October"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("no document named 'October'"));

    let (stdout, _, _) = run_command(&db, &["--list", "--collection", "archive"]);
    assert!(stdout.trim().ends_with("\tOctober"));
}

#[test]
fn test_print_report() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("plans.db");
    let report = dir.path().join("october.txt");
    let (stdout, _, code) = run_command(
        &db,
        &[
            "October",
            "--columns",
            "Ann",
            "--month",
            "2026-10",
            "--set",
            "A1=8",
            "--set",
            "B1=16",
            "-o",
            report.to_str().unwrap(),
        ],
    );
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Printed 1 page(s) to"));
    let text = std::fs::read_to_string(&report).unwrap();
    assert!(text.contains("October (2026-10)"));
    assert!(text.contains("01 Th"));
    assert!(text.contains("Signature"));
}

#[test]
fn test_json_export_import() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("plans.db");
    let json = dir.path().join("october.json");
    let (_, _, code) = run_command(
        &db,
        &[
            "October",
            "--columns",
            "Ann",
            "--set",
            "A1=8",
            "--set",
            "B1=16",
            "--export-json",
            json.to_str().unwrap(),
        ],
    );
    assert_eq!(code, 0);
    let content = std::fs::read_to_string(&json).unwrap();
    assert!(content.contains("\"type\": \"Schedule1\""));
    assert!(content.contains("\"columnNames\""));

    let (stdout, _, code) = run_command(
        &db,
        &["November", "--import-json", json.to_str().unwrap(), "--totals", "--save"],
    );
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Ann\t8\nSaved November ("));
}

#[test]
fn test_duplicate_name_on_import_fails() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("plans.db");
    let json = dir.path().join("october.json");
    run_command(&db, &["October", "--save", "--export-json", json.to_str().unwrap()]);

    let (_, stderr, code) =
        run_command(&db, &["--import-json", json.to_str().unwrap(), "--save"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("October"));
}

#[test]
fn test_invalid_arguments() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("plans.db");

    let (_, stderr, code) = run_command(&db, &["--set", "ZZ=8"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid cell reference: ZZ"));

    let (_, stderr, code) = run_command(&db, &["x", "--columns", "Ann", "--set", "C1=8"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("cannot set C1"));

    let (_, stderr, code) = run_command(&db, &["x", "--month", "2026-13", "--totals"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid month"));
}
