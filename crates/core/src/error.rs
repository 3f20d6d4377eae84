//! Error types for the svgtex conversion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for conversion operations.
#[derive(Error, Debug)]
pub enum SvgTexError {
    /// Malformed transform, style, color or number attribute.
    #[error("cannot parse {what} `{input}`: {msg}")]
    Parse {
        what: &'static str,
        input: String,
        msg: String,
    },

    #[error("unsupported length unit: {0}")]
    UnsupportedUnit(String),

    #[error("`{tool}` failed: {msg}")]
    ExternalTool { tool: String, msg: String },

    #[error("inconsistent geometry: {0}")]
    InconsistentGeometry(String),

    #[error("xml error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("not an SVG file: {}", .0.display())]
    UnsupportedInput(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SvgTexError {
    pub(crate) fn parse(what: &'static str, input: &str, msg: impl Into<String>) -> Self {
        Self::Parse {
            what,
            input: input.to_string(),
            msg: msg.into(),
        }
    }

    pub(crate) fn tool(tool: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            msg: msg.into(),
        }
    }
}

/// Convenience Result type alias for SvgTexError.
pub type Result<T> = std::result::Result<T, SvgTexError>;
