//! Length units and the viewBox scale factor.
//!
//! The renderer works in CSS pixels at a fixed density of 96 px per inch.
//! Declared document lengths carry an optional two-letter unit suffix; a bare
//! number is already in pixels.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SvgTexError};
use crate::transform::parse_number_list;

/// 72 PostScript points (big points) per inch.
pub const PT_PER_INCH: f64 = 72.0;

/// 96 SVG user units (px) per inch.
pub const DPI: f64 = 96.0;

/// Big points per SVG user unit.
pub const BP_PER_PX: f64 = PT_PER_INCH / DPI;

const MM_PER_INCH: f64 = 25.4;
const CM_PER_INCH: f64 = 2.54;

/// Units accepted for declared document lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Inch,
    Millimeter,
    Centimeter,
    Point,
    Pixel,
    /// No suffix: already in pixels.
    Unitless,
}

impl LengthUnit {
    fn from_suffix(suffix: &str) -> Result<Self> {
        match suffix {
            "" => Ok(Self::Unitless),
            "in" => Ok(Self::Inch),
            "mm" => Ok(Self::Millimeter),
            "cm" => Ok(Self::Centimeter),
            "pt" => Ok(Self::Point),
            "px" => Ok(Self::Pixel),
            other => Err(SvgTexError::UnsupportedUnit(other.to_string())),
        }
    }

    /// Pixels per one of this unit.
    pub fn px_per_unit(self) -> f64 {
        match self {
            Self::Inch => DPI,
            Self::Millimeter => DPI / MM_PER_INCH,
            Self::Centimeter => DPI / CM_PER_INCH,
            Self::Point => 1.0 / BP_PER_PX,
            Self::Pixel | Self::Unitless => 1.0,
        }
    }

    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Inch => "in",
            Self::Millimeter => "mm",
            Self::Centimeter => "cm",
            Self::Point => "pt",
            Self::Pixel => "px",
            Self::Unitless => "",
        }
    }
}

/// A declared length such as `210mm` or `2in`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f64,
    pub unit: LengthUnit,
}

impl Length {
    pub fn to_px(self) -> f64 {
        self.value * self.unit.px_per_unit()
    }
}

impl FromStr for Length {
    type Err = SvgTexError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let split = trimmed
            .char_indices()
            .rev()
            .take_while(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
            .last()
            .map_or(trimmed.len(), |(i, _)| i);
        let (number, suffix) = trimmed.split_at(split);
        let unit = LengthUnit::from_suffix(suffix.trim())?;
        let value = number
            .trim()
            .parse::<f64>()
            .map_err(|e| SvgTexError::parse("length", s, e.to_string()))?;
        Ok(Self { value, unit })
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit.suffix())
    }
}

/// Converts a declared length string to pixels.
pub fn length_to_px(s: &str) -> Result<f64> {
    Ok(s.parse::<Length>()?.to_px())
}

/// A document `viewBox`: `min-x min-y width height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl FromStr for ViewBox {
    type Err = SvgTexError;

    fn from_str(s: &str) -> Result<Self> {
        let values = parse_number_list(s).map_err(|msg| SvgTexError::parse("viewBox", s, msg))?;
        let &[min_x, min_y, width, height] = values.as_slice() else {
            return Err(SvgTexError::parse(
                "viewBox",
                s,
                format!("expected 4 numbers, got {}", values.len()),
            ));
        };
        if width <= 0.0 || height <= 0.0 {
            return Err(SvgTexError::parse("viewBox", s, "non-positive size"));
        }
        Ok(Self {
            min_x,
            min_y,
            width,
            height,
        })
    }
}

/// Pixels per viewBox unit implied by the declared document width.
///
/// Without a viewBox one user unit is one pixel. Both axes are assumed to
/// share the same scale.
pub fn viewbox_scale(declared_width: &str, viewbox: Option<&str>) -> Result<f64> {
    let Some(viewbox) = viewbox else {
        return Ok(1.0);
    };
    let viewbox: ViewBox = viewbox.parse()?;
    Ok(length_to_px(declared_width)? / viewbox.width)
}

/// Declared physical size of a drawing, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicalSize {
    pub width: f64,
    pub height: f64,
}

impl PhysicalSize {
    pub fn from_declared(width: &str, height: &str) -> Result<Self> {
        Ok(Self {
            width: length_to_px(width)?,
            height: length_to_px(height)?,
        })
    }

    pub fn inches(&self) -> (f64, f64) {
        (self.width / DPI, self.height / DPI)
    }

    pub fn big_points(&self) -> (f64, f64) {
        (self.width * BP_PER_PX, self.height * BP_PER_PX)
    }
}
