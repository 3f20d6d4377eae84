//! Typeset text labels extracted from a drawing.

use serde::Serialize;

use crate::error::{Result, SvgTexError};
use crate::style::{Rgb, Style, lookup_font_family, lookup_font_size, parse_color};
use crate::utils::Point;

pub const WEIGHT_NORMAL: u16 = 400;
pub const WEIGHT_BOLD: u16 = 700;

/// Family tag used when a label has no resolved `font-family`.
pub const DEFAULT_FONT_FAMILY: &str = "rm";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

/// Horizontal alignment relative to the anchor (`text-anchor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

/// Visual style of a label resolved from its effective `style` declarations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelStyle {
    pub color: Rgb,
    /// LaTeX family tag; `None` falls back to [`DEFAULT_FONT_FAMILY`].
    pub font_family: Option<&'static str>,
    pub font_weight: u16,
    pub font_style: FontStyle,
    /// LaTeX size command such as `\small`.
    pub font_size: Option<&'static str>,
    pub align: Align,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            color: Rgb::BLACK,
            font_family: None,
            font_weight: WEIGHT_NORMAL,
            font_style: FontStyle::Normal,
            font_size: None,
            align: Align::Start,
        }
    }
}

impl LabelStyle {
    /// Resolves the label style from effective declarations.
    ///
    /// Unknown families, sizes and non-hex paints are logged and left at their
    /// defaults. A malformed color or weight is an error.
    pub fn resolve(style: &Style) -> Result<Self> {
        let mut resolved = Self::default();

        if let Some(fill) = style.get("fill") {
            match parse_color(fill)? {
                Some(rgb) => resolved.color = rgb,
                None => tracing::warn!(fill = %fill, "only hex text colors are supported"),
            }
        }

        if let Some(weight) = style.get("font-weight") {
            resolved.font_weight = parse_font_weight(weight)?;
        }

        if let Some(font_style) = style.get("font-style") {
            match font_style.as_str() {
                "normal" => resolved.font_style = FontStyle::Normal,
                "italic" => resolved.font_style = FontStyle::Italic,
                "oblique" => resolved.font_style = FontStyle::Oblique,
                other => tracing::debug!(font_style = other, "ignoring font-style"),
            }
        }

        if let Some(anchor) = style.get("text-anchor") {
            match anchor.as_str() {
                "start" => resolved.align = Align::Start,
                "middle" => resolved.align = Align::Center,
                "end" => resolved.align = Align::End,
                other => tracing::debug!(text_anchor = other, "ignoring text-anchor"),
            }
        }

        if let Some(family) = style.get("font-family") {
            resolved.font_family = lookup_font_family(family);
            if resolved.font_family.is_none() {
                tracing::warn!(font_family = %family, "could not match font-family");
            }
        }

        if let Some(size) = style.get("font-size") {
            resolved.font_size = lookup_font_size(size);
            if resolved.font_size.is_none() {
                tracing::warn!(font_size = %size, "could not match font-size");
            }
        }

        Ok(resolved)
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight >= WEIGHT_BOLD
    }

    pub fn family_tag(&self) -> &'static str {
        self.font_family.unwrap_or(DEFAULT_FONT_FAMILY)
    }
}

fn parse_font_weight(value: &str) -> Result<u16> {
    match value.trim() {
        "bold" | "bolder" => Ok(WEIGHT_BOLD),
        "normal" | "lighter" => Ok(WEIGHT_NORMAL),
        numeric => numeric
            .parse::<u16>()
            .map_err(|e| SvgTexError::parse("font-weight", value, e.to_string())),
    }
}

/// One positioned, styled unit of typeset text.
///
/// The position is absolute, in renderer pixels, with Y pointing down. The
/// angle is in degrees with Y pointing up, counter-clockwise positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub text: String,
    pub position: Point,
    pub angle: f64,
    pub style: LabelStyle,
}

impl Label {
    pub fn new(text: impl Into<String>, position: Point) -> Self {
        Self {
            text: text.into(),
            position,
            angle: 0.0,
            style: LabelStyle::default(),
        }
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }
}
