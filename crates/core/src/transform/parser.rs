//! Parser for SVG `transform` attribute values.

use std::sync::LazyLock;

use regex::Regex;

use super::AffineTransform;
use crate::error::{Result, SvgTexError};

static TRANSFORM_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\s,]*([A-Za-z]+)\s*\(([^()]*)\)").expect("valid transform regex")
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number regex")
});

/// Parses a transform attribute into one composed transform.
///
/// Function calls are folded left to right, each one composed outside the
/// running result, so the leftmost call is the first applied to a local
/// point. An empty attribute is the identity.
pub fn parse_transform(attribute: &str) -> Result<AffineTransform> {
    let mut rest = attribute;
    let mut xform = AffineTransform::identity();
    loop {
        if rest.trim_matches(|c: char| c.is_whitespace() || c == ',').is_empty() {
            return Ok(xform);
        }
        let caps = TRANSFORM_CALL
            .captures(rest)
            .ok_or_else(|| SvgTexError::parse("transform", attribute, "expected `name(args)`"))?;
        let name = caps.get(1).map_or("", |m| m.as_str());
        let args = parse_number_list(caps.get(2).map_or("", |m| m.as_str()))
            .map_err(|msg| SvgTexError::parse("transform", attribute, msg))?;
        let step = single_transform(name, &args)
            .map_err(|msg| SvgTexError::parse("transform", attribute, msg))?;
        xform = AffineTransform::compose(&step, &xform);
        rest = &rest[caps.get(0).map_or(rest.len(), |m| m.end())..];
    }
}

fn single_transform(name: &str, args: &[f64]) -> std::result::Result<AffineTransform, String> {
    match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => Ok(AffineTransform::matrix(a, b, c, d, e, f)),
        ("translate", &[tx]) => Ok(AffineTransform::translate(tx, 0.0)),
        ("translate", &[tx, ty]) => Ok(AffineTransform::translate(tx, ty)),
        ("scale", &[s]) => Ok(AffineTransform::uniform_scale(s)),
        ("scale", &[sx, sy]) => Ok(AffineTransform::scale(sx, sy)),
        ("rotate", &[angle]) => Ok(AffineTransform::rotate(angle)),
        ("rotate", &[angle, cx, cy]) => Ok(AffineTransform::rotate_about(angle, cx, cy)),
        ("matrix" | "translate" | "scale" | "rotate", _) => Err(format!(
            "wrong number of arguments for `{name}`: {}",
            args.len()
        )),
        _ => Err(format!("unsupported transform function `{name}`")),
    }
}

/// Parses a comma and/or whitespace separated list of numbers.
///
/// Compact forms such as `10-5` (two numbers) are accepted; anything else
/// between numbers is an error.
pub(crate) fn parse_number_list(s: &str) -> std::result::Result<Vec<f64>, String> {
    let mut values = Vec::new();
    let mut last = 0;
    for m in NUMBER.find_iter(s) {
        let gap = &s[last..m.start()];
        if !is_separator(gap) {
            return Err(format!("unexpected `{}` in argument list", gap.trim()));
        }
        let value = m
            .as_str()
            .parse::<f64>()
            .map_err(|e| format!("bad number `{}`: {e}", m.as_str()))?;
        values.push(value);
        last = m.end();
    }
    let tail = &s[last..];
    if !is_separator(tail) {
        return Err(format!("unexpected `{}` in argument list", tail.trim()));
    }
    Ok(values)
}

fn is_separator(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace() || c == ',') && s.matches(',').count() <= 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_list_separators() {
        assert_eq!(parse_number_list("1, 2 3").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(parse_number_list("10-5").unwrap(), vec![10.0, -5.0]);
        assert_eq!(parse_number_list(" 1e2,.5 ").unwrap(), vec![100.0, 0.5]);
        assert!(parse_number_list("").unwrap().is_empty());
    }

    #[test]
    fn test_number_list_rejects_garbage() {
        assert!(parse_number_list("1, x").is_err());
        assert!(parse_number_list("1,,2").is_err());
        assert!(parse_number_list("2px").is_err());
    }
}
