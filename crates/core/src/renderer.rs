//! External renderer boundary.
//!
//! The pipeline needs two things from a renderer: export a document's drawing
//! area to PDF, and report the bounding box of every identified element.
//! [`Inkscape`] implements both by running the `inkscape` executable.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::bbox::{BBoxReport, parse_query_output};
use crate::error::{Result, SvgTexError};
use crate::units::DPI;

/// Operations the conversion pipeline needs from a renderer.
pub trait Renderer {
    /// Exports the drawing area of `svg` to `output`.
    fn rasterize(&self, svg: &Path, output: &Path) -> Result<()>;

    /// Reports the bounding box of every element with an id in `svg`.
    fn query_bounding_boxes(&self, svg: &Path) -> Result<BBoxReport>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn rasterize(&self, svg: &Path, output: &Path) -> Result<()> {
        (**self).rasterize(svg, output)
    }

    fn query_bounding_boxes(&self, svg: &Path) -> Result<BBoxReport> {
        (**self).query_bounding_boxes(svg)
    }
}

/// Command-line dialect of the `inkscape` executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InkscapeCli {
    /// Inkscape 1.x: `--export-type`, `--export-filename`.
    #[default]
    Modern,
    /// Inkscape 0.92: `--without-gui`, `--export-pdf`, `--file`.
    Legacy,
}

/// Renderer backed by the `inkscape` executable.
#[derive(Debug, Clone)]
pub struct Inkscape {
    program: PathBuf,
    cli: InkscapeCli,
}

impl Inkscape {
    pub const PROGRAM: &'static str = "inkscape";

    /// Locates `inkscape` on `PATH`.
    pub fn locate() -> Result<Self> {
        let found = which::which(Self::PROGRAM)
            .map_err(|e| SvgTexError::tool(Self::PROGRAM, format!("not found on PATH: {e}")))?;
        // Resolve symlinks; some macOS installs only work through the real path.
        let program = std::fs::canonicalize(&found).unwrap_or(found);
        Ok(Self::with_program(program))
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            cli: InkscapeCli::default(),
        }
    }

    pub fn with_cli(mut self, cli: InkscapeCli) -> Self {
        self.cli = cli;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn cli(&self) -> InkscapeCli {
        self.cli
    }

    fn export_args(&self, svg: &Path, output: &Path) -> Vec<OsString> {
        let with_path = |prefix: &str, path: &Path| {
            let mut arg = OsString::from(prefix);
            arg.push(path.as_os_str());
            arg
        };
        let mut args: Vec<OsString> = Vec::new();
        if self.cli == InkscapeCli::Legacy {
            args.push("--without-gui".into());
        }
        args.push("--export-area-drawing".into());
        args.push("--export-ignore-filters".into());
        args.push(format!("--export-dpi={DPI}").into());
        match self.cli {
            InkscapeCli::Modern => {
                args.push("--export-type=pdf".into());
                args.push(with_path("--export-filename=", output));
                args.push(svg.as_os_str().to_owned());
            }
            InkscapeCli::Legacy => {
                args.push(with_path("--export-pdf=", output));
                args.push(with_path("--file=", svg));
            }
        }
        args
    }

    fn query_args(&self, svg: &Path) -> Vec<OsString> {
        match self.cli {
            InkscapeCli::Modern => vec!["--query-all".into(), svg.as_os_str().to_owned()],
            InkscapeCli::Legacy => {
                let mut file = OsString::from("--file=");
                file.push(svg.as_os_str());
                vec!["--without-gui".into(), "--query-all".into(), file]
            }
        }
    }

    fn run(&self, args: &[OsString]) -> Result<Output> {
        tracing::debug!(program = %self.program.display(), ?args, "running renderer");
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| SvgTexError::tool(self.program.display().to_string(), e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SvgTexError::tool(
                self.program.display().to_string(),
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }
        Ok(output)
    }
}

impl Renderer for Inkscape {
    fn rasterize(&self, svg: &Path, output: &Path) -> Result<()> {
        self.run(&self.export_args(svg, output))?;
        let produced = std::fs::metadata(output).map(|m| m.len() > 0).unwrap_or(false);
        if !produced {
            return Err(SvgTexError::tool(
                self.program.display().to_string(),
                format!("produced no output at {}", output.display()),
            ));
        }
        Ok(())
    }

    fn query_bounding_boxes(&self, svg: &Path) -> Result<BBoxReport> {
        let output = self.run(&self.query_args(svg))?;
        parse_query_output(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modern_export_args() {
        let ink = Inkscape::with_program("inkscape");
        let args = ink.export_args(Path::new("in.svg"), Path::new("out.pdf"));
        assert_eq!(
            args,
            vec![
                OsString::from("--export-area-drawing"),
                OsString::from("--export-ignore-filters"),
                OsString::from("--export-dpi=96"),
                OsString::from("--export-type=pdf"),
                OsString::from("--export-filename=out.pdf"),
                OsString::from("in.svg"),
            ]
        );
    }

    #[test]
    fn test_legacy_query_args() {
        let ink = Inkscape::with_program("inkscape").with_cli(InkscapeCli::Legacy);
        let args = ink.query_args(Path::new("in.svg"));
        assert_eq!(
            args,
            vec![
                OsString::from("--without-gui"),
                OsString::from("--query-all"),
                OsString::from("--file=in.svg"),
            ]
        );
    }
}
