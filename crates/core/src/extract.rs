//! Label extraction: splits a drawing into text labels and graphics.
//!
//! Every `<text>` element becomes at most one [`Label`]. Its styled runs
//! (`<tspan>` children) are merged: the texts are joined with a space, the
//! position and style come from the first run. Consumed elements are cut out
//! of the document so the remainder contains graphics only.

use std::collections::HashSet;

use indexmap::IndexSet;
use roxmltree::Node;

use crate::document::{Document, is_svg_element};
use crate::error::{Result, SvgTexError};
use crate::label::{Label, LabelStyle};
use crate::style::{Style, inherit, parse_style};
use crate::transform::{AffineTransform, parse_number_list, parse_transform};
use crate::utils::{Point, round_to};

/// Elements whose content is only drawn by reference, never in place.
const DEFINITION_BLOCKS: [&str; 3] = ["defs", "marker", "symbol"];

/// Result of splitting a document.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The document with every text element removed.
    pub graphics: Document,
    /// Labels in document order.
    pub labels: Vec<Label>,
    /// Ids of the text elements that produced a label, in document order.
    pub text_ids: IndexSet<String>,
    /// Ids of elements inside definition blocks.
    pub ignore_ids: HashSet<String>,
}

/// Walks text elements and resolves them into labels.
#[derive(Debug, Clone, Copy)]
pub struct LabelExtractor {
    /// Pixels per user unit.
    scaling: f64,
}

impl Default for LabelExtractor {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl LabelExtractor {
    pub fn new(scaling: f64) -> Self {
        Self { scaling }
    }

    /// Extractor using the document's own viewBox scale.
    pub fn for_document(doc: &Document) -> Result<Self> {
        let scaling = doc.scaling()?;
        tracing::debug!(scaling, "user unit scale");
        Ok(Self::new(scaling))
    }

    pub fn scaling(&self) -> f64 {
        self.scaling
    }

    pub fn extract(&self, doc: &Document) -> Result<Extraction> {
        let tree = doc.tree()?;
        let ignore_ids = definition_ids(&tree);

        let mut labels = Vec::new();
        let mut text_ids = IndexSet::new();
        let mut ranges = Vec::new();
        for node in tree.descendants() {
            if is_svg_element(&node, "flowRoot") {
                tracing::warn!(
                    id = node.attribute("id").unwrap_or_default(),
                    "flowed text is not supported and stays in the graphics"
                );
                continue;
            }
            if !is_svg_element(&node, "text") {
                continue;
            }
            if node
                .ancestors()
                .skip(1)
                .any(|a| is_svg_element(&a, "text"))
            {
                continue;
            }
            match self.interpret_text(node)? {
                Some(label) => {
                    // Only anchors that carry a label may widen the frame.
                    if let Some(id) = node.attribute("id") {
                        text_ids.insert(id.to_string());
                    }
                    labels.push(label);
                }
                None => tracing::debug!(
                    id = node.attribute("id").unwrap_or_default(),
                    "text element without content"
                ),
            }
            ranges.push(node.range());
        }

        let graphics = if ranges.is_empty() {
            doc.clone()
        } else {
            doc.without_ranges(&ranges)?
        };
        tracing::info!(labels = labels.len(), "extracted text labels");

        Ok(Extraction {
            graphics,
            labels,
            text_ids,
            ignore_ids,
        })
    }

    fn interpret_text(&self, text: Node<'_, '_>) -> Result<Option<Label>> {
        let runs: Vec<Node<'_, '_>> = text
            .children()
            .filter(|c| is_svg_element(c, "tspan"))
            .collect();
        let runs = if runs.is_empty() { vec![text] } else { runs };

        let texts: Vec<String> = runs.iter().filter_map(|run| run_text(*run)).collect();
        if texts.is_empty() {
            return Ok(None);
        }

        let first = runs[0];
        let (position, angle) = self.position_and_angle(first, text)?;
        let style = effective_style(text, first)?;

        Ok(Some(
            Label::new(texts.join(" "), position)
                .with_angle(angle)
                .with_style(LabelStyle::resolve(&style)?),
        ))
    }

    /// Absolute position of a run anchor (in pixels) and its Y-up angle.
    fn position_and_angle(&self, run: Node<'_, '_>, text: Node<'_, '_>) -> Result<(Point, f64)> {
        let xform = absolute_transform(run)?;
        let x = first_coordinate(run, "x")?
            .or(first_coordinate(text, "x")?)
            .unwrap_or(0.0);
        let y = first_coordinate(run, "y")?
            .or(first_coordinate(text, "y")?)
            .unwrap_or(0.0);
        let (ax, ay) = xform.apply((x, y));
        // SVG angles grow clockwise with Y down.
        let angle = round_to(-xform.rotation_degrees(), 3);
        Ok(((ax * self.scaling, ay * self.scaling), angle))
    }
}

/// Splits `doc` using its own viewBox scale.
pub fn split_text_graphics(doc: &Document) -> Result<Extraction> {
    LabelExtractor::for_document(doc)?.extract(doc)
}

/// Composes the `transform` of every element from the root down to `node`.
pub fn absolute_transform(node: Node<'_, '_>) -> Result<AffineTransform> {
    let chain: Vec<Node<'_, '_>> = node.ancestors().filter(|n| n.is_element()).collect();
    chain
        .iter()
        .rev()
        .try_fold(AffineTransform::identity(), |abs, n| {
            match n.attribute("transform") {
                Some(t) => Ok(AffineTransform::compose(&abs, &parse_transform(t)?)),
                None => Ok(abs),
            }
        })
}

/// The run's style declarations overlaid on its text element's.
fn effective_style(text: Node<'_, '_>, run: Node<'_, '_>) -> Result<Style> {
    let parent = match text.attribute("style") {
        Some(s) => parse_style(s)?,
        None => Style::new(),
    };
    if run == text {
        return Ok(parent);
    }
    match run.attribute("style") {
        Some(s) => Ok(inherit(&parent, &parse_style(s)?)),
        None => Ok(parent),
    }
}

fn run_text(run: Node<'_, '_>) -> Option<String> {
    let text: String = run
        .descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect();
    (!text.is_empty()).then_some(text)
}

/// First value of a coordinate list attribute such as `x="10 20 30"`.
fn first_coordinate(node: Node<'_, '_>, name: &'static str) -> Result<Option<f64>> {
    let Some(value) = node.attribute(name) else {
        return Ok(None);
    };
    let values = parse_number_list(value).map_err(|msg| SvgTexError::parse(name, value, msg))?;
    Ok(values.first().copied())
}

/// Ids of elements inside definition blocks, the blocks included.
fn definition_ids(tree: &roxmltree::Document<'_>) -> HashSet<String> {
    tree.descendants()
        .filter(|n| {
            n.ancestors()
                .any(|a| DEFINITION_BLOCKS.iter().any(|b| is_svg_element(&a, b)))
        })
        .filter_map(|n| n.attribute("id"))
        .map(str::to_string)
        .collect()
}
