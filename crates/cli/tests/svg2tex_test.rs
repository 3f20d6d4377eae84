//! Command line behavior that needs no renderer.

use std::fs;
use std::process::Command;

fn svg2tex() -> Command {
    Command::new(env!("CARGO_BIN_EXE_svg2tex"))
}

#[test]
fn test_help_lists_options() {
    let output = svg2tex().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--method", "--search-root", "--force", "--inkscape", "--json"] {
        assert!(stdout.contains(flag), "missing {flag} in help");
    }
}

#[test]
fn test_requires_an_input() {
    let output = svg2tex().output().unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_unknown_name_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = svg2tex()
        .args(["no-such-drawing", "--inkscape", "/nonexistent/inkscape", "-r"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no-such-drawing.svg"), "{stderr}");
}

#[test]
fn test_non_svg_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "hello").unwrap();
    let output = svg2tex()
        .arg(&input)
        .args(["--inkscape", "/nonexistent/inkscape"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not an SVG file"), "{stderr}");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_invalid_method_rejected() {
    let output = svg2tex()
        .args(["drawing.svg", "--method", "png"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
