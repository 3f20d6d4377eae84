//! Inline `style` attribute parsing and the font lookup tables.

use std::collections::HashMap;
use std::sync::LazyLock;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Result, SvgTexError};

/// Parsed declarations of a `style` attribute, in source order.
pub type Style = IndexMap<String, String>;

/// Font families with a LaTeX family tag (`\rmfamily`, `\sffamily`, ...).
pub static FONT_FAMILIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("CMU Serif", "rm"),
        ("CMU Sans Serif", "sf"),
        ("CMU Typewriter Text", "tt"),
        ("Calibri", "rm"),
    ])
});

/// Font sizes with a LaTeX relative size command.
pub static FONT_SIZES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("9px", r"\scriptsize"),
        ("10px", r"\footnotesize"),
        ("11px", r"\small"),
        ("12px", r"\normalsize"),
        ("13px", r"\large"),
    ])
});

/// Parses a semicolon-delimited `key:value` list.
///
/// Empty declarations are skipped; a declaration without a colon or with an
/// empty property name is an error. Later duplicates win.
pub fn parse_style(attribute: &str) -> Result<Style> {
    let mut style = Style::new();
    for decl in attribute.split(';').map(str::trim).filter(|d| !d.is_empty()) {
        let Some((key, value)) = decl.split_once(':') else {
            return Err(SvgTexError::parse(
                "style",
                attribute,
                format!("declaration `{decl}` has no `:`"),
            ));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(SvgTexError::parse(
                "style",
                attribute,
                format!("declaration `{decl}` has no property name"),
            ));
        }
        style.insert(key.to_string(), value.trim().to_string());
    }
    Ok(style)
}

/// Overlays `child` onto `parent`; keys of `child` win on conflict.
pub fn inherit(parent: &Style, child: &Style) -> Style {
    let mut merged = parent.clone();
    for (key, value) in child {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// An 8-bit RGB triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);

    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }
}

/// Parses a paint value into a color.
///
/// `#rrggbb` and `#rgb` are colors. Other paints (`none`, named colors,
/// `url(...)`) are `None`. A `#` value that is not valid hex is an error.
pub fn parse_color(value: &str) -> Result<Option<Rgb>> {
    let value = value.trim();
    let Some(hex) = value.strip_prefix('#') else {
        return Ok(None);
    };
    let bad = |msg: &str| SvgTexError::parse("color", value, msg);
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad("not a hex color"));
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|e| bad(&e.to_string()));
    match hex.len() {
        6 => Ok(Some(Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ))),
        3 => {
            let expand = |i: usize| channel(&hex[i..=i].repeat(2));
            Ok(Some(Rgb(expand(0)?, expand(1)?, expand(2)?)))
        }
        _ => Err(bad("expected 3 or 6 hex digits")),
    }
}

/// Looks up the LaTeX family tag for a `font-family` value.
pub fn lookup_font_family(value: &str) -> Option<&'static str> {
    FONT_FAMILIES.get(unquote(value)).copied()
}

/// Looks up the LaTeX size command for a `font-size` value.
pub fn lookup_font_size(value: &str) -> Option<&'static str> {
    FONT_SIZES.get(value.trim()).copied()
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['\'', '"'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    value
}
