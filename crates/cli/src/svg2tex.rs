//! svg2tex - Convert SVG drawings into a PDF background plus a LaTeX overlay
//!
//! For every input `name.svg` this writes `name.pdf` (graphics only) and
//! `name.pdf_tex`, a `picture` environment placing the drawing's text on top
//! of it. Include the result with `\def\svgwidth{...}\input{name.pdf_tex}`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::SystemTime;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use clap::{ArgAction, Parser, ValueEnum};
use serde_json::{Value, json};
use svgtex_core::convert::{ConvertOptions, ImageReference, OutputPaths, convert, export_pdf};
use svgtex_core::renderer::{Inkscape, InkscapeCli};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

/// What to produce for each drawing.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
enum Method {
    /// Graphics-only PDF plus a `.pdf_tex` text overlay (default)
    #[default]
    LatexPdf,
    /// The whole drawing as a PDF, text included
    Pdf,
}

/// How the overlay names the background PDF.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum ImageRefArg {
    /// The PDF path as derived from the input path
    #[default]
    AsGiven,
    /// Only the PDF file name (for `\graphicspath` setups)
    FileName,
}

impl From<ImageRefArg> for ImageReference {
    fn from(arg: ImageRefArg) -> Self {
        match arg {
            ImageRefArg::AsGiven => ImageReference::AsGiven,
            ImageRefArg::FileName => ImageReference::FileName,
        }
    }
}

/// Convert SVG drawings into a PDF background and a LaTeX text overlay.
#[derive(Parser, Debug)]
#[command(name = "svg2tex")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// SVG files, or base names searched as `<name>.svg` under the search root
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Conversion method
    #[arg(short = 'm', long, value_enum, default_value = "latex-pdf")]
    method: Method,

    /// Directory searched recursively for inputs given by name
    #[arg(short = 'r', long = "search-root", default_value = "./img")]
    search_root: PathBuf,

    /// Convert even when the outputs are newer than the source
    #[arg(short = 'f', long, action = ArgAction::SetTrue)]
    force: bool,

    /// Path to the inkscape executable (default: looked up on PATH)
    #[arg(long)]
    inkscape: Option<PathBuf>,

    /// Use the command line of Inkscape 0.92 and older
    #[arg(long = "legacy-inkscape", action = ArgAction::SetTrue)]
    legacy_inkscape: bool,

    /// How the overlay refers to the background PDF
    #[arg(long = "image-reference", value_enum, default_value = "as-given")]
    image_reference: ImageRefArg,

    /// Print a JSON report of every input on stdout
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Resolves an argument to SVG paths: an existing file as is, otherwise
/// every `<name>.svg` found under `root`.
fn resolve_input(arg: &str, root: &Path) -> Result<Vec<PathBuf>> {
    let direct = PathBuf::from(arg);
    if direct.is_file() {
        return Ok(vec![direct]);
    }
    let file_name = if arg.to_ascii_lowercase().ends_with(".svg") {
        arg.to_string()
    } else {
        format!("{arg}.svg")
    };
    let found = if root.is_dir() {
        find_files(root, &file_name)?
    } else {
        Vec::new()
    };
    if found.is_empty() {
        bail!(
            "no file `{arg}` and no `{file_name}` under {}",
            root.display()
        );
    }
    for path in &found {
        tracing::debug!(input = arg, path = %path.display(), "resolved by name");
    }
    Ok(found)
}

/// Every file named `file_name` under `root`, in name order.
fn find_files(root: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("searching {}", root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == file_name {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

fn modified(path: &Path) -> io::Result<SystemTime> {
    fs::metadata(path)?.modified()
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Whether every target exists and is newer than `source`.
fn is_up_to_date(source: &Path, targets: &[&Path]) -> io::Result<bool> {
    let source_time = modified(source)?;
    tracing::debug!(source = %source.display(), modified = %format_time(source_time));
    for target in targets {
        let target_time = match modified(target) {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        tracing::debug!(target = %target.display(), modified = %format_time(target_time));
        if target_time <= source_time {
            return Ok(false);
        }
    }
    Ok(true)
}

fn build_renderer(args: &Args) -> Result<Inkscape> {
    let inkscape = match &args.inkscape {
        Some(program) => Inkscape::with_program(program),
        None => Inkscape::locate()?,
    };
    let cli = if args.legacy_inkscape {
        InkscapeCli::Legacy
    } else {
        InkscapeCli::Modern
    };
    Ok(inkscape.with_cli(cli))
}

fn process_input(svg: &Path, renderer: &Inkscape, args: &Args) -> Result<Value> {
    let outputs = OutputPaths::for_input(svg)?;
    let targets: Vec<&Path> = match args.method {
        Method::LatexPdf => vec![&outputs.background, &outputs.overlay],
        Method::Pdf => vec![&outputs.background],
    };
    if !args.force && is_up_to_date(svg, &targets)? {
        tracing::info!(source = %svg.display(), "outputs are up to date, skipping");
        return Ok(json!({ "source": svg, "skipped": true }));
    }

    match args.method {
        Method::LatexPdf => {
            let options = ConvertOptions {
                image_reference: args.image_reference.into(),
            };
            let report = convert(renderer, svg, &options)?;
            Ok(serde_json::to_value(report)?)
        }
        Method::Pdf => {
            let background = export_pdf(renderer, svg)?;
            tracing::info!(background = %background.display(), "exported pdf");
            Ok(json!({ "source": svg, "outputs": { "background": background } }))
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let inputs = args
        .inputs
        .iter()
        .map(|arg| resolve_input(arg, &args.search_root))
        .collect::<Result<Vec<_>>>()?
        .concat();
    let renderer = build_renderer(args)?;
    tracing::debug!(program = %renderer.program().display(), cli = ?renderer.cli());

    let mut reports = Vec::with_capacity(inputs.len());
    for svg in &inputs {
        let report = process_input(svg, &renderer, args)
            .with_context(|| format!("converting {}", svg.display()))?;
        reports.push(report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
