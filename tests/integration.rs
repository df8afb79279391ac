//! Integration tests for the console-commands binary.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test config file.
fn create_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let config_path = dir.path().join("console-commands.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

/// Get a command with config path set via env var, running inside `dir`.
fn cmd_with_config(dir: &TempDir, config_path: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("console-commands");
    cmd.env("CONSOLE_COMMANDS_CONFIG", config_path)
        .env_remove("CONSOLE_COMMANDS_LOG")
        .current_dir(dir.path());
    cmd
}

/// Get a command with temp dir but no config.
fn cmd_without_config(home: &TempDir) -> assert_cmd::Command {
    cmd_with_config(home, &home.path().join("nonexistent.toml"))
}

#[test]
fn test_echo() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["echo", "--text=hello"])
        .assert()
        .success()
        .stdout("hello\n");
}

#[test]
fn test_echo_quoted_value_and_flags() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["echo", "--text=\"hello", "world\"", "-un"])
        .assert()
        .success()
        .stdout("HELLO WORLD");
}

#[test]
fn test_multiple_commands_in_order() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["echo", "--text", "one", "ECHO", "--text", "=", "two", "-u"])
        .assert()
        .success()
        .stdout("one\nTWO\n");
}

#[test]
fn test_no_command() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["-u"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Invalid command. No command was provided.",
        ));
}

#[test]
fn test_empty_invocation() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No command was provided"));
}

#[test]
fn test_invalid_argument_rejected() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["echo", "--text=hi", "--color=red", "-z"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid argument: color"))
        .stderr(predicate::str::contains("Invalid flag: z"));
}

#[test]
fn test_rejection_does_not_stop_run() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["echo", "-z", "echo", "--text=after"])
        .assert()
        .code(1)
        .stdout("after\n");
}

#[test]
fn test_format_error_exit_code() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["echo", "--text=a=b"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("malformed argument '--text=a=b'"));
}

#[test]
fn test_unknown_token_aborts_by_default() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["echo", "stray", "--text=x"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unknown token 'stray'"));
}

#[test]
fn test_unknown_token_skip_policy() {
    let dir = TempDir::new().unwrap();
    let config = create_config(
        &dir,
        r#"
[parser]
unknown_tokens = "skip"
"#,
    );

    cmd_with_config(&dir, &config)
        .args(["echo", "stray", "--text=x"])
        .assert()
        .success()
        .stdout("x\n")
        .stderr(predicate::str::contains("skipping unknown token"));
}

#[test]
fn test_project_config_overrides_user_config() {
    let dir = TempDir::new().unwrap();
    let config = create_config(
        &dir,
        r#"
[parser]
unknown_tokens = "skip"
"#,
    );
    fs::write(
        dir.path().join(".console-commands.toml"),
        "[parser]\nunknown_tokens = \"abort\"\n",
    )
    .unwrap();

    cmd_with_config(&dir, &config)
        .args(["echo", "stray", "--text=x"])
        .assert()
        .code(2);
}

#[test]
fn test_missing_value_is_handler_error() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["echo", "--text"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing required argument '--text'"));
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["help"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "Usage: console-commands [echo | help | info | No Command]",
        ))
        .stdout(predicate::str::contains("Command: echo: Prints the given text."))
        .stdout(predicate::str::contains("Argument: --text"))
        .stdout(predicate::str::contains("Flag: -u"));
}

#[test]
fn test_info_exits_before_later_commands() {
    let dir = TempDir::new().unwrap();
    let config = create_config(
        &dir,
        r#"
[app]
name = "demo"
version = "9.9.9"
"#,
    );

    cmd_with_config(&dir, &config)
        .args(["info", "echo", "--text=never"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("demo\nVersion: 9.9.9\n"))
        .stdout(predicate::str::contains("never").not());
}

#[test]
fn test_invalid_config_fails_open() {
    let dir = TempDir::new().unwrap();
    let config = create_config(&dir, "this is not toml [");

    cmd_with_config(&dir, &config)
        .args(["echo", "--text=still works"])
        .assert()
        .success()
        .stdout("still works\n")
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn test_duplicate_flag_warning() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["echo", "--text=x", "-uu"])
        .assert()
        .success()
        .stdout("X\n")
        .stderr(predicate::str::contains("flag was already defined"));
}

#[test]
fn test_audit_log_written() {
    let dir = TempDir::new().unwrap();
    let audit_path = dir.path().join("audit.jsonl");
    let config = create_config(
        &dir,
        &format!(
            r#"
[audit]
enabled = true
path = "{}"
"#,
            audit_path.display()
        ),
    );

    cmd_with_config(&dir, &config)
        .args(["echo", "--text=hi", "-u", "bogus-free", "echo", "-q"])
        .assert()
        .code(2);
    assert!(!audit_path.exists() || fs::read_to_string(&audit_path).unwrap().is_empty());

    cmd_with_config(&dir, &config)
        .args(["echo", "--text=hi", "-u", "echo", "-q"])
        .assert()
        .code(1);

    let content = fs::read_to_string(&audit_path).unwrap();
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["command"], "echo");
    assert_eq!(lines[0]["status"], "executed");
    assert_eq!(lines[0]["flags"][0], "u");
    assert_eq!(lines[1]["status"], "rejected");
    assert!(lines[1]["reason"]
        .as_str()
        .unwrap()
        .contains("Invalid flag: q"));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_argument() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .arg("echo")
        .arg(OsStr::from_bytes(b"--text=\xff"))
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("argument is not valid UTF-8: --text=\u{fffd}"));
}

#[test]
fn test_value_with_too_many_equals() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["echo", "--text", "--a=b=c"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("malformed argument '--a=b=c'"));
}

#[test]
fn test_no_color_when_piped() {
    let dir = TempDir::new().unwrap();
    cmd_without_config(&dir)
        .args(["-z", "help"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Command: echo: Prints the given text.\n"))
        .stdout(predicate::str::contains("\x1b[").not())
        .stderr(predicate::str::contains("No command was provided"))
        .stderr(predicate::str::contains("\x1b[").not());
}
