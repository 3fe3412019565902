use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn expgrid(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("expgrid").unwrap();
    cmd.env("EXPENSE_GRID_DATA_DIR", dir.path());
    cmd
}

fn add(dir: &TempDir, args: &[&str]) {
    expgrid(dir)
        .args(["expense", "add"])
        .args(args)
        .args(["--year", "2025"])
        .assert()
        .success();
}

#[test]
fn init_creates_settings() {
    let dir = TempDir::new().unwrap();
    expgrid(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized expense-grid"));
    assert!(dir.path().join("config.json").exists());

    expgrid(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

#[test]
fn add_and_list_expenses() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["Rent", "1200", "--day", "5"]);
    add(&dir, &["Insurance", "300", "--month", "mar"]);

    expgrid(&dir)
        .args(["expense", "list", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent"))
        .stdout(predicate::str::contains("Insurance"));
}

#[test]
fn grid_marks_paid_months() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["Rent", "1200"]);

    expgrid(&dir)
        .args(["expense", "set", "Rent", "jan", "--paid", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(paid)"));

    expgrid(&dir)
        .args(["grid", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expenses 2025"))
        .stdout(predicate::str::contains("Rent"))
        .stdout(predicate::str::contains("✓"));
}

#[test]
fn empty_grid_has_hint() {
    let dir = TempDir::new().unwrap();
    expgrid(&dir)
        .args(["grid", "--year", "2030"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active expenses for 2030"));
}

#[test]
fn clone_forward_copies_rows_once() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["Rent", "1200"]);
    add(&dir, &["Gym", "40"]);

    expgrid(&dir)
        .args(["year", "clone-forward", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cloned 2 expense(s) from 2025 into 2026"));

    expgrid(&dir)
        .args(["expense", "list", "--year", "2026"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gym"));

    expgrid(&dir)
        .args(["year", "clone-forward", "--year", "2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Year error"));
}

#[test]
fn export_csv_to_stdout() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["Rent", "1200"]);

    expgrid(&dir)
        .args(["export", "grid", "-", "--format", "csv", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ID,Due Day,Description,Jan"))
        .stdout(predicate::str::contains("Rent"));
}

#[test]
fn advise_prompt_only_includes_rows() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["Rent", "1200"]);

    expgrid(&dir)
        .args(["advise", "--year", "2025", "--prompt-only", "--profile", "Teacher"])
        .assert()
        .success()
        .stdout(predicate::str::contains("for the year 2025"))
        .stdout(predicate::str::contains("\"description\":\"Rent\""))
        .stdout(predicate::str::contains("Teacher"));
}

#[test]
fn advise_without_rows_fails() {
    let dir = TempDir::new().unwrap();
    expgrid(&dir)
        .args(["advise", "--year", "2025", "--prompt-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Advisor error"));
}

#[test]
fn unknown_expense_is_not_found() {
    let dir = TempDir::new().unwrap();
    expgrid(&dir)
        .args(["expense", "show", "Nothing", "--year", "2025"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn delete_requires_force() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["Rent", "1200"]);

    expgrid(&dir)
        .args(["expense", "delete", "Rent", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    expgrid(&dir)
        .args(["expense", "delete", "Rent", "--year", "2025", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted expense: Rent"));

    expgrid(&dir)
        .args(["expense", "list", "--year", "2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses found."));
}

#[test]
fn history_records_changes() {
    let dir = TempDir::new().unwrap();
    add(&dir, &["Rent", "1200"]);

    expgrid(&dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rent"));
}
