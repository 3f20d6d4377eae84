//! The source drawing and its graphics-only variant.
//!
//! A [`Document`] owns the SVG source text. Parsing is done on demand with
//! `roxmltree`, which borrows the text; removing elements produces a new
//! document by cutting the elements' byte ranges out of the source.

use std::io::Write;
use std::ops::Range;
use std::path::Path;

use crate::error::Result;
use crate::units::{PhysicalSize, viewbox_scale};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    source: String,
}

impl Document {
    /// Wraps `source`, failing if it is not well-formed XML.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let doc = Self {
            source: source.into(),
        };
        doc.tree()?;
        Ok(doc)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(std::fs::read_to_string(path)?)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parses the source into a read-only tree.
    pub fn tree(&self) -> Result<roxmltree::Document<'_>> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        Ok(roxmltree::Document::parse_with_options(
            &self.source,
            options,
        )?)
    }

    /// Returns a copy with the given byte ranges removed.
    ///
    /// Ranges may arrive in any order and may overlap.
    pub fn without_ranges(&self, ranges: &[Range<usize>]) -> Result<Self> {
        let mut sorted = ranges.to_vec();
        sorted.sort_by_key(|r| r.start);

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for range in sorted {
            if range.start > cursor {
                out.push_str(&self.source[cursor..range.start]);
            }
            cursor = cursor.max(range.end);
        }
        out.push_str(&self.source[cursor.min(self.source.len())..]);
        Self::parse(out)
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.source.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    /// Value of an attribute on the root element.
    pub fn root_attribute(&self, name: &str) -> Result<Option<String>> {
        let tree = self.tree()?;
        Ok(tree.root_element().attribute(name).map(str::to_string))
    }

    pub fn root_id(&self) -> Result<Option<String>> {
        self.root_attribute("id")
    }

    /// Pixels per user unit, from the declared width and the `viewBox`.
    pub fn scaling(&self) -> Result<f64> {
        let tree = self.tree()?;
        let root = tree.root_element();
        let viewbox = root.attribute("viewBox");
        match root.attribute("width") {
            Some(width) => viewbox_scale(width, viewbox),
            None => {
                tracing::debug!("no declared width, assuming one pixel per user unit");
                Ok(1.0)
            }
        }
    }

    /// Declared width and height, when both are present.
    pub fn physical_size(&self) -> Result<Option<PhysicalSize>> {
        let tree = self.tree()?;
        let root = tree.root_element();
        match (root.attribute("width"), root.attribute("height")) {
            (Some(w), Some(h)) => Ok(Some(PhysicalSize::from_declared(w, h)?)),
            _ => Ok(None),
        }
    }

    /// Logs the declared size in pixels, inches and big points.
    pub fn log_dimensions(&self) -> Result<()> {
        let Some(size) = self.physical_size()? else {
            tracing::info!("document declares no width/height");
            return Ok(());
        };
        let (w_in, h_in) = size.inches();
        let (w_bp, h_bp) = size.big_points();
        tracing::info!(
            "width = {:.2} px, height = {:.2} px; {:.2} x {:.2} in; {:.2} x {:.2} bp",
            size.width,
            size.height,
            w_in,
            h_in,
            w_bp,
            h_bp
        );
        Ok(())
    }
}

/// Whether `node` is the SVG element `name`.
///
/// Elements without a namespace are accepted too, since hand-written files
/// often omit the `xmlns` declaration.
pub fn is_svg_element(node: &roxmltree::Node<'_, '_>, name: &str) -> bool {
    if !node.is_element() || node.tag_name().name() != name {
        return false;
    }
    matches!(node.tag_name().namespace(), None | Some(SVG_NS))
}
