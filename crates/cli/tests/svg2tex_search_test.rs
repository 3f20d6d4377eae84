//! Name lookup under the search root converts every matching drawing.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::process::Command;

const STUB: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    --query-all)
      echo "svg1,0,0,100,50"
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
</svg>
"#;

#[test]
fn test_same_name_in_two_directories() {
    let tools = tempfile::tempdir().unwrap();
    let stub = tools.path().join("inkscape");
    fs::write(&stub, STUB).unwrap();
    fs::set_permissions(&stub, fs::Permissions::from_mode(0o755)).unwrap();

    let root = tempfile::tempdir().unwrap();
    for sub in ["a", "b"] {
        let dir = root.path().join(sub);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("fig.svg"), DRAWING).unwrap();
    }
    fs::write(root.path().join("other.svg"), DRAWING).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_svg2tex"))
        .arg("fig")
        .arg("-r")
        .arg(root.path())
        .arg("--inkscape")
        .arg(&stub)
        .arg("--json")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sources: Vec<&str> = report
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["source"].as_str().unwrap())
        .collect();
    assert_eq!(sources.len(), 2);
    assert!(sources[0].ends_with("a/fig.svg"), "{sources:?}");
    assert!(sources[1].ends_with("b/fig.svg"), "{sources:?}");

    for sub in ["a", "b"] {
        let dir = root.path().join(sub);
        assert!(dir.join("fig.pdf").is_file(), "{sub}");
        assert!(dir.join("fig.pdf_tex").is_file(), "{sub}");
    }
    assert!(!root.path().join("other.pdf").exists());
}
