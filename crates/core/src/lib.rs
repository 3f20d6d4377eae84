//! svgtex - split SVG drawings into a graphics-only PDF and a LaTeX
//! `picture` overlay carrying the drawing's text.

pub mod bbox;
pub mod convert;
pub mod document;
pub mod error;
pub mod extract;
pub mod label;
pub mod picture;
pub mod renderer;
pub mod style;
pub mod transform;
pub mod units;
pub mod utils;

pub use bbox::{BBoxReport, BoundingBox};
pub use convert::{
    ConvertOptions, ConvertReport, ImageReference, OutputPaths, convert, export_pdf,
};
pub use document::Document;
pub use error::{Result, SvgTexError};
pub use extract::{Extraction, LabelExtractor, split_text_graphics};
pub use label::Label;
pub use picture::TexPicture;
pub use renderer::{Inkscape, InkscapeCli, Renderer};
pub use transform::{AffineTransform, parse_transform};
