//! The conversion pipeline: SVG in, background PDF plus `.pdf_tex` out.
//!
//! Stages run in a fixed order: extract labels, render the graphics-only
//! document (bounding boxes + PDF), query the original document's boxes,
//! reconcile, generate the picture. Outputs are staged in temporary files
//! next to their destination and persisted only after every stage succeeded.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempPath;

use crate::bbox::{BBoxReport, BoundingBox, drawing_area, union_bounding_box};
use crate::document::Document;
use crate::error::{Result, SvgTexError};
use crate::extract::split_text_graphics;
use crate::picture::TexPicture;
use crate::renderer::Renderer;

/// Extension of the background graphic.
pub const BACKGROUND_EXTENSION: &str = "pdf";

/// Extension of the text overlay.
pub const OVERLAY_EXTENSION: &str = "pdf_tex";

/// How the picture refers to the background graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageReference {
    /// The background path as derived from the input path.
    #[default]
    AsGiven,
    /// The bare file name, for documents using `\graphicspath`.
    FileName,
}

/// Options for a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub image_reference: ImageReference,
}

/// Output files derived from the input's base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub background: PathBuf,
    pub overlay: PathBuf,
}

impl OutputPaths {
    pub fn for_input(svg: &Path) -> Result<Self> {
        let is_svg = svg
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        if !is_svg {
            return Err(SvgTexError::UnsupportedInput(svg.to_path_buf()));
        }
        Ok(Self {
            background: svg.with_extension(BACKGROUND_EXTENSION),
            overlay: svg.with_extension(OVERLAY_EXTENSION),
        })
    }

    /// Name written into `\includegraphics`.
    pub fn image_name(&self, reference: ImageReference) -> String {
        let path = match reference {
            ImageReference::AsGiven => self.background.as_path(),
            ImageReference::FileName => self
                .background
                .file_name()
                .map_or(self.background.as_path(), Path::new),
        };
        path.to_string_lossy().replace('\\', "/")
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertReport {
    pub source: PathBuf,
    pub outputs: OutputPaths,
    pub labels: usize,
    /// Union of the drawing area and the label anchors.
    pub frame: BoundingBox,
    pub drawing_area: BoundingBox,
}

/// Converts `svg_path` into a background PDF and a `.pdf_tex` overlay.
pub fn convert<R: Renderer>(
    renderer: &R,
    svg_path: &Path,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    let outputs = OutputPaths::for_input(svg_path)?;
    let doc = Document::open(svg_path)?;
    doc.log_dimensions()?;

    let extraction = split_text_graphics(&doc)?;

    let background = staged_output(&outputs.background)?;
    let graphics_report =
        render_graphics(renderer, &extraction.graphics, svg_path, &background)?;
    let drawing = drawing_area(&graphics_report, doc.root_id()?.as_deref())?;
    tracing::debug!(?drawing, "drawing area");

    let anchors = renderer.query_bounding_boxes(svg_path)?;
    let frame = union_bounding_box(
        &drawing,
        &anchors,
        &extraction.text_ids,
        &extraction.ignore_ids,
    )?;
    tracing::debug!(?frame, "union frame");

    let tex = TexPicture::new(frame, drawing)
        .with_background(outputs.image_name(options.image_reference))
        .with_labels(&extraction.labels)
        .dumps()?;
    let overlay = staged_output(&outputs.overlay)?;
    std::fs::write(&overlay, tex)?;

    publish(background, overlay, &outputs)?;
    tracing::info!(
        background = %outputs.background.display(),
        overlay = %outputs.overlay.display(),
        "conversion finished"
    );

    Ok(ConvertReport {
        source: svg_path.to_path_buf(),
        outputs,
        labels: extraction.labels.len(),
        frame,
        drawing_area: drawing,
    })
}

/// Exports the whole drawing, text included, to PDF.
pub fn export_pdf<R: Renderer>(renderer: &R, svg_path: &Path) -> Result<PathBuf> {
    let outputs = OutputPaths::for_input(svg_path)?;
    let background = staged_output(&outputs.background)?;
    renderer.rasterize(svg_path, &background)?;
    background
        .persist(&outputs.background)
        .map_err(io::Error::from)?;
    Ok(outputs.background)
}

/// Moves both staged outputs into place. The overlay goes first and is
/// removed again when the background cannot follow it.
fn publish(background: TempPath, overlay: TempPath, outputs: &OutputPaths) -> Result<()> {
    overlay.persist(&outputs.overlay).map_err(io::Error::from)?;
    if let Err(e) = background.persist(&outputs.background) {
        if let Err(cleanup) = std::fs::remove_file(&outputs.overlay) {
            tracing::warn!(
                overlay = %outputs.overlay.display(),
                error = %cleanup,
                "could not remove overlay after failed background"
            );
        }
        return Err(io::Error::from(e).into());
    }
    Ok(())
}

/// Writes the graphics-only document next to the source, queries its boxes
/// and renders it to `output`. The temporary SVG is removed on return,
/// whether or not the renderer succeeded.
fn render_graphics<R: Renderer>(
    renderer: &R,
    graphics: &Document,
    source: &Path,
    output: &Path,
) -> Result<BBoxReport> {
    // Same directory as the source so relative links still resolve.
    let mut svg = tempfile::Builder::new()
        .prefix(".svgtex-")
        .suffix(".svg")
        .tempfile_in(parent_dir(source))?;
    graphics.write_to(&mut svg)?;
    let report = renderer.query_bounding_boxes(svg.path())?;
    renderer.rasterize(svg.path(), output)?;
    Ok(report)
}

/// A temporary file in the destination's directory, removed unless persisted.
fn staged_output(destination: &Path) -> Result<TempPath> {
    let suffix = destination
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let file = tempfile::Builder::new()
        .prefix(".svgtex-")
        .suffix(&suffix)
        .tempfile_in(parent_dir(destination))?;
    Ok(file.into_temp_path())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
