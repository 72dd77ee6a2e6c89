use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn stride(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stride").unwrap();
    cmd.current_dir(dir.path()).env("STRIDE_ROOT", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    stride(dir)
        .args(["init", "--name", "test-project"])
        .assert()
        .success();
    stride(dir)
        .args(["tenant", "create", "acme", "--name", "Acme Inc"])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// stride init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    stride(&dir).arg("init").assert().success();

    assert!(dir.path().join(".stride").is_dir());
    assert!(dir.path().join(".stride/tenants").is_dir());
    assert!(dir.path().join(".stride/config.yaml").exists());
}

#[test]
fn init_twice_fails() {
    let dir = TempDir::new().unwrap();
    stride(&dir).arg("init").assert().success();
    stride(&dir)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

// ---------------------------------------------------------------------------
// tenant / strategy
// ---------------------------------------------------------------------------

#[test]
fn tenant_create_and_list() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    stride(&dir)
        .args(["tenant", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acme"));
}

#[test]
fn tenant_invalid_slug_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    stride(&dir)
        .args(["tenant", "create", "BAD SLUG", "--name", "x"])
        .assert()
        .failure();
}

#[test]
fn strategy_create_activate_and_state() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    stride(&dir)
        .args([
            "strategy", "create", "acme", "summer-launch",
            "--title", "Summer Launch",
            "--category", "content",
            "--category", "email",
        ])
        .assert()
        .success();

    stride(&dir)
        .args(["strategy", "activate", "acme", "summer-launch"])
        .assert()
        .success();

    stride(&dir)
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("summer-launch"));
}

// ---------------------------------------------------------------------------
// task / report / milestone
// ---------------------------------------------------------------------------

#[test]
fn task_flow_and_report() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    stride(&dir)
        .args(["strategy", "create", "acme", "summer", "--title", "Summer"])
        .assert()
        .success();
    stride(&dir)
        .args(["strategy", "activate", "acme", "summer"])
        .assert()
        .success();

    let output = stride(&dir)
        .args([
            "--json", "task", "add", "acme", "summer",
            "--title", "Write launch post",
            "--category", "content",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let id = json["task_id"].as_str().unwrap();

    stride(&dir)
        .args(["task", "complete", "acme", "summer", id])
        .assert()
        .success();

    // Report for the current month includes the completion.
    let now = chrono::Utc::now();
    use chrono::Datelike;
    stride(&dir)
        .args([
            "--json", "report", "show", "acme",
            "--year", &now.year().to_string(),
            "--month", &now.month().to_string(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completed_tasks\": 1"));

    stride(&dir)
        .args(["milestone", "list", "acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("first-task-done"));
}

#[test]
fn report_invalid_month_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    stride(&dir)
        .args(["strategy", "create", "acme", "summer", "--title", "Summer"])
        .assert()
        .success();
    stride(&dir)
        .args(["strategy", "activate", "acme", "summer"])
        .assert()
        .success();

    stride(&dir)
        .args(["report", "show", "acme", "--year", "2025", "--month", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid month"));
}

#[test]
fn milestone_share_twice_succeeds() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    stride(&dir)
        .args(["strategy", "create", "acme", "summer", "--title", "Summer"])
        .assert()
        .success();
    stride(&dir)
        .args(["strategy", "activate", "acme", "summer"])
        .assert()
        .success();

    let now = chrono::Utc::now();
    use chrono::Datelike;
    stride(&dir)
        .args([
            "report", "show", "acme",
            "--year", &now.year().to_string(),
            "--month", &now.month().to_string(),
        ])
        .assert()
        .success();

    for _ in 0..2 {
        stride(&dir)
            .args(["milestone", "share", "acme", "first-activation"])
            .assert()
            .success();
    }
}
