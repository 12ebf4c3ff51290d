//! Integration tests for the cellfmt binary

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cellfmt-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn write_file(name: &str, content: &str) -> PathBuf {
    let path = scratch_dir().join(name);
    std::fs::write(&path, content).expect("write scratch file");
    path
}

/// Run with an empty settings file so a user's cellfmt.toml cannot leak in.
fn run(args: &[&str], stdin: Option<&str>) -> (String, String, i32) {
    let config = write_file("empty.toml", "");
    let mut child = Command::new(env!("CARGO_BIN_EXE_cellfmt"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute cellfmt");

    if let Some(mut pipe) = child.stdin.take() {
        if let Some(input) = stdin {
            pipe.write_all(input.as_bytes()).expect("write stdin");
        }
    }

    let output = child.wait_with_output().expect("wait for cellfmt");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

#[test]
fn test_beautify_is_default() {
    let (stdout, _, code) = run(&["-i", "2", "=IF(A1>5,SUM(B1:B5),0)"], None);
    assert_eq!(stdout.trim_end(), "=IF(\n  A1 > 5,\n  SUM(\n    B1:B5\n  ),\n  0\n)");
    assert_eq!(code, 0);
}

#[test]
fn test_minify_from_stdin() {
    let (stdout, _, code) = run(&["-m", "minify"], Some("= SUM( A1 , B1 )\n"));
    assert_eq!(stdout.trim(), "=SUM(A1,B1)");
    assert_eq!(code, 0);
}

#[test]
fn test_formula_from_file() {
    let path = write_file("formula.txt", "=AND(A1,B1)\n");
    let (stdout, _, code) = run(&["-m", "js", "-f", path.to_str().unwrap()], None);
    assert_eq!(stdout.trim(), "(A1&&B1)");
    assert_eq!(code, 0);
}

#[test]
fn test_eu_flag() {
    let (stdout, _, code) = run(&["-m", "minify", "--eu", "=ROUND( 1,5 ; 0 )"], None);
    assert_eq!(stdout.trim(), "=ROUND(1,5;0)");
    assert_eq!(code, 0);
}

#[test]
fn test_tokens_mode_prints_json() {
    let (stdout, _, code) = run(&["-m", "tokens", "=#N/A+1"], None);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"#N/A\""));
    assert!(stdout.contains("\"Error\""));
}

#[test]
fn test_mapping_rewrites_to_let() {
    let mapping = write_file("fields.csv", "field,location\nDue Date,C:C\n");
    let (stdout, _, code) = run(
        &["-m", "minify", "--mapping", mapping.to_str().unwrap(), "=[Due Date]@row+1"],
        None,
    );
    assert_eq!(stdout.trim(), "=LET(_Due_Date,C:C,_Due_Date+1)");
    assert_eq!(code, 0);
}

#[test]
fn test_settings_file_sets_mode() {
    let settings = write_file("minify.toml", "mode = \"minify\"\n");
    let output = Command::new(env!("CARGO_BIN_EXE_cellfmt"))
        .arg("--config")
        .arg(&settings)
        .arg("=1 + 2")
        .output()
        .expect("Failed to execute cellfmt");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "=1+2");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_unbalanced_formula_fails() {
    let (stdout, stderr, code) = run(&["=SUM(1))"], None);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Error:"), "{}", stderr);
    assert!(stderr.contains("Unbalanced"));
    assert_eq!(code, 1);
}

#[test]
fn test_unmapped_reference_fails() {
    let mapping = write_file("empty.csv", "field,location\n");
    let (_, stderr, code) = run(&["--mapping", mapping.to_str().unwrap(), "=Owner@row"], None);
    assert!(stderr.contains("Owner@row"), "{}", stderr);
    assert_eq!(code, 1);
}

#[test]
fn test_unknown_mode_fails() {
    let (_, stderr, code) = run(&["-m", "yaml", "=1"], None);
    assert!(stderr.contains("Unknown mode 'yaml'"), "{}", stderr);
    assert_eq!(code, 1);
}
