// Smoke tests for the non-interactive entry points of the compiled binary.
// HOME points at a scratch directory so stored settings never leak in or out.

use assert_cmd::Command;
use tempfile::TempDir;

fn keyforge(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("keyforge").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("KEYFORGE_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn list_rows_prints_rows_in_cycle_order() {
    let home = TempDir::new().unwrap();
    let out = stdout_of(keyforge(&home).arg("--list-rows"));
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "home\tHome row");
    assert_eq!(lines[4], "caps\tCapital row");
    assert_eq!(lines[6], "mixed\tMixed row");
}

#[test]
fn print_emits_a_drill_for_the_requested_row() {
    let home = TempDir::new().unwrap();
    let out = stdout_of(keyforge(&home).args(["--print", "--row", "numbers", "--length", "40"]));
    let drill = out.trim_end_matches('\n');

    assert_eq!(drill.chars().count(), 40);
    assert!(drill.chars().all(|c| c == ' ' || c.is_ascii_digit()));
}

#[test]
fn print_with_seed_is_reproducible() {
    let home = TempDir::new().unwrap();
    let args = ["--print", "--mode", "paragraph", "--seed", "2024"];

    let first = stdout_of(keyforge(&home).args(args));
    let second = stdout_of(keyforge(&home).args(args));

    assert_eq!(first, second);
    assert!(first.trim().ends_with('.'));
}

#[test]
fn saved_config_becomes_the_default() {
    let home = TempDir::new().unwrap();
    keyforge(&home)
        .args(["--save-config", "--row", "caps", "--list-rows"])
        .assert()
        .success();

    let out = stdout_of(keyforge(&home).arg("--print"));
    let drill = out.trim_end_matches('\n');
    assert_eq!(drill.chars().count(), 120);
    assert!(drill.chars().all(|c| c == ' ' || c.is_ascii_uppercase()));
}

#[test]
fn interactive_mode_requires_a_tty() {
    let home = TempDir::new().unwrap();
    let assert = keyforge(&home).write_stdin("").assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();

    assert!(stderr.contains("stdin must be a tty"), "{stderr}");
}

#[test]
fn zero_length_is_rejected() {
    let home = TempDir::new().unwrap();
    let assert = keyforge(&home)
        .args(["--print", "--length", "0"])
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).into_owned();

    assert!(stderr.contains("drill length must be between 1 and 1000"), "{stderr}");
}
