//! End-to-end run of the binary against a stub `inkscape` script.
//!
//! Kept in its own test binary: the stub is written and then executed, and
//! concurrent process spawns from other tests could hold it open.
#![cfg(unix)]

use std::fs::{self, File};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;
use std::time::{Duration, SystemTime};

const STUB: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --query-all)
      echo "svg1,0,0,100,50"
      echo "text1,10,20,30,8"
      exit 0
      ;;
    --export-filename=*)
      printf '%%PDF-1.4\n' > "${arg#--export-filename=}"
      ;;
  esac
done
"#;

const DRAWING: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" id="svg1" width="100" height="50">
  <rect id="rect1" x="0" y="0" width="100" height="50"/>
  <text id="text1" x="10" y="20">Label</text>
</svg>
"#;

fn write_stub(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("inkscape");
    fs::write(&path, STUB).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_convert_by_name_then_skip() {
    let tools = tempfile::tempdir().unwrap();
    let stub = write_stub(tools.path());

    let root = tempfile::tempdir().unwrap();
    let nested = root.path().join("figures");
    fs::create_dir(&nested).unwrap();
    let svg = nested.join("diagram.svg");
    fs::write(&svg, DRAWING).unwrap();
    // Sources older than anything written below.
    File::options()
        .write(true)
        .open(&svg)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(60))
        .unwrap();

    let run = || {
        Command::new(env!("CARGO_BIN_EXE_svg2tex"))
            .arg("diagram")
            .arg("-r")
            .arg(root.path())
            .arg("--inkscape")
            .arg(&stub)
            .arg("--json")
            .output()
            .unwrap()
    };

    let output = run();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let tex = fs::read_to_string(nested.join("diagram.pdf_tex")).unwrap();
    assert!(tex.contains(r"\begin{picture}(1, 0.5)%"), "{tex}");
    assert!(tex.contains(r"\put(0.1, 0.3){"), "{tex}");
    assert_eq!(
        fs::read_to_string(nested.join("diagram.pdf")).unwrap(),
        "%PDF-1.4\n"
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report[0]["labels"], 1);
    assert_eq!(report[0]["frame"]["width"], 100.0);

    // Outputs are newer than the source now.
    let output = run();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report[0]["skipped"], true);

    let mut names: Vec<String> = fs::read_dir(&nested)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["diagram.pdf", "diagram.pdf_tex", "diagram.svg"]);
}
