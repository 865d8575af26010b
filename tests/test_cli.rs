//! Tests for the `stack` binary's exit status and standard output.
//!
//! Tests cover:
//! - `done!` and exit 0 on success, with per-frame progress lines
//! - One-line diagnostics with exit 2 for rejected invocations
//! - Exit 1 for failures after validation

mod common;

use std::path::Path;
use std::process::{Command, Output};

use common::*;

fn stack<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_stack"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run stack binary")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn test_single_output_run_prints_done() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;
    write_white_frames(input.path(), 2);
    write_text_file(input.path(), "notes.txt");
    let target = output.path().join("stack.png");

    let result = stack(["4x4", arg(input.path()), arg(&target)]);

    assert_eq!(result.status.code(), Some(0));
    let lines = stdout_lines(&result);
    assert_eq!(lines.last().map(String::as_str), Some("done!"));
    assert!(lines.contains(&"1/2 image \"frame_000.png\" 4x4".to_string()));
    assert!(lines.contains(&"2/2 image \"frame_001.png\" 4x4".to_string()));
    assert!(lines.contains(&"non image \"notes.txt\"".to_string()));
    assert!(target.is_file());
    Ok(())
}

#[test]
fn test_negative_batch_count_is_one_line_config_error() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;

    let result = stack(["-3", "10x10", arg(input.path()), arg(output.path())]);

    assert_eq!(result.status.code(), Some(2));
    let lines = stdout_lines(&result);
    assert_eq!(lines.len(), 1, "{:?}", lines);
    assert!(lines[0].contains("batch count"), "{}", lines[0]);
    Ok(())
}

#[test]
fn test_rejected_invocations_print_one_line() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;
    let target = output.path().join("stack.png");
    let missing_parent = output.path().join("missing").join("stack.png");

    let cases: Vec<Vec<&str>> = vec![
        vec![arg(input.path()), arg(&target)],
        vec!["10by10", arg(input.path()), arg(&target)],
        vec!["4x4", arg(input.path()), arg(&missing_parent)],
        vec!["--depth", "abc", "4x4", arg(input.path()), arg(&target)],
        vec!["--depth", "12", "4x4", arg(input.path()), arg(&target)],
    ];
    for args in cases {
        let result = stack(&args);
        assert_eq!(result.status.code(), Some(2), "{:?}", args);
        assert_eq!(stdout_lines(&result).len(), 1, "{:?}", args);
    }
    assert!(!target.exists());
    Ok(())
}

#[test]
fn test_pipeline_failure_exits_one() -> anyhow::Result<()> {
    let input = tempfile::TempDir::new()?;
    let output = tempfile::TempDir::new()?;
    write_corrupt_frame(input.path(), "broken.png");
    let target = output.path().join("stack.png");

    let result = stack(["4x4", arg(input.path()), arg(&target)]);

    assert_eq!(result.status.code(), Some(1));
    let lines = stdout_lines(&result);
    assert!(lines.last().is_some_and(|l| l.contains("no frames")), "{:?}", lines);
    assert!(!target.exists());
    Ok(())
}
