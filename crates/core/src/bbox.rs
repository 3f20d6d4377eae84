//! Bounding boxes reported by the renderer and their reconciliation.
//!
//! Two reports exist per conversion: one over the graphics-only document,
//! which yields the drawing area, and one over the original document, which
//! still has the text anchors. The union of the drawing area and the anchors'
//! top-left corners is the frame every output position is expressed in.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::error::{Result, SvgTexError};
use crate::utils::Point;

/// Prefix of the id the renderer reports for the whole drawing.
pub const DRAWING_AREA_PREFIX: &str = "svg";

/// An axis-aligned box, top-left corner plus size, Y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    pub fn x1(&self) -> f64 {
        self.x + self.width
    }

    pub fn y1(&self) -> f64 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Point {
        (self.x, self.y)
    }

    pub fn bottom_left(&self) -> Point {
        (self.x, self.y1())
    }

    /// Smallest box covering `self` and `point`; `self` unchanged when the
    /// point already lies inside.
    pub fn include_point(&self, point: Point) -> Self {
        let (x, y) = point;
        let (x0, y0) = (self.x.min(x), self.y.min(y));
        let (x1, y1) = (self.x1().max(x), self.y1().max(y));
        if x0 == self.x && y0 == self.y && x1 == self.x1() && y1 == self.y1() {
            *self
        } else {
            Self::from_corners(x0, y0, x1, y1)
        }
    }

    /// Fails unless both width and height are strictly positive.
    pub fn validate(self) -> Result<Self> {
        if self.width > 0.0 && self.height > 0.0 {
            Ok(self)
        } else {
            Err(SvgTexError::InconsistentGeometry(format!(
                "bounding box {}x{} at ({}, {}) is empty",
                self.width, self.height, self.x, self.y
            )))
        }
    }
}

/// Per-element boxes keyed by element id, in report order.
pub type BBoxReport = IndexMap<String, BoundingBox>;

/// Parses the renderer's `id,x,y,width,height` lines.
pub fn parse_query_output(output: &str) -> Result<BBoxReport> {
    let mut report = BBoxReport::new();
    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let bad = || SvgTexError::tool("query", format!("unexpected bounding box line `{line}`"));
        let mut parts = line.rsplitn(5, ',');
        let mut next = || -> Result<f64> {
            parts
                .next()
                .and_then(|p| p.trim().parse::<f64>().ok())
                .ok_or_else(bad)
        };
        let height = next()?;
        let width = next()?;
        let y = next()?;
        let x = next()?;
        let id = parts.next().filter(|id| !id.is_empty()).ok_or_else(bad)?;
        report.insert(id.to_string(), BoundingBox::new(x, y, width, height));
    }
    Ok(report)
}

/// Finds the drawing-area box in a report over the graphics-only document.
///
/// Prefers `root_id`, then the first id starting with
/// [`DRAWING_AREA_PREFIX`], then the first entry.
pub fn drawing_area(report: &BBoxReport, root_id: Option<&str>) -> Result<BoundingBox> {
    let by_root = root_id.and_then(|id| report.get(id));
    let by_prefix = || {
        report
            .iter()
            .find(|(id, _)| id.starts_with(DRAWING_AREA_PREFIX))
            .map(|(_, b)| b)
    };
    let first = || report.first().map(|(_, b)| b);
    by_root
        .or_else(by_prefix)
        .or_else(first)
        .copied()
        .ok_or_else(|| SvgTexError::tool("query", "bounding box report is empty"))
}

/// Merges the drawing area with the label anchors into one frame.
///
/// Anchors come from `anchors`, a report over the original document,
/// restricted to `text_ids` minus `ignore_ids`. Only an anchor's top-left
/// corner is folded in. Ids missing from the report contribute nothing.
pub fn union_bounding_box(
    drawing: &BoundingBox,
    anchors: &BBoxReport,
    text_ids: &IndexSet<String>,
    ignore_ids: &HashSet<String>,
) -> Result<BoundingBox> {
    let mut frame = *drawing;
    for id in text_ids.iter().filter(|id| !ignore_ids.contains(*id)) {
        let Some(anchor) = anchors.get(id) else {
            tracing::debug!(id = %id, "text anchor not reported, skipping");
            continue;
        };
        frame = frame.include_point(anchor.top_left());
    }
    frame.validate()
}
