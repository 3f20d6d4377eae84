//! LaTeX `picture` generation for the text overlay (`.pdf_tex`).
//!
//! The picture's unit length is the width of the union frame, so the canvas
//! is always one unit wide. Positions are flipped from the SVG convention
//! (origin top-left, Y down) to the picture convention (origin bottom-left,
//! Y up), divided by the unit and rounded to three digits.

use std::io::Write;

use crate::bbox::BoundingBox;
use crate::error::{Result, SvgTexError};
use crate::label::{Align, FontStyle, Label};
use crate::utils::{Point, normalize};

/// Fixed head of every picture: color and transparency fallbacks and the
/// unit length taken from `\svgwidth`.
pub const PICTURE_PREAMBLE: &str = r"% Picture generated by svgtex
\makeatletter
\providecommand\color[2][]{%
  \errmessage{(svgtex) Color is used for the text in the drawing,
    but the package 'color.sty' is not loaded}%
  \renewcommand\color[2][]{}}%
\providecommand\transparent[1]{%
  \errmessage{
    (svgtex) Transparency is used for the text in the drawing,
    but the package 'transparent.sty' is not loaded}%
  \renewcommand\transparent[1]{}}%
\setlength{\unitlength}{\svgwidth}%
\global\let\svgwidth\undefined%
\makeatother
";

/// Maps a point from the frame's Y-down coordinates to Y-up coordinates
/// with the origin at the frame's bottom-left corner.
pub fn flip_point(frame: &BoundingBox, point: Point) -> Point {
    let (x, y) = point;
    (x - frame.x, (frame.height + frame.y) - y)
}

/// A picture: optional background graphic plus labels, in one frame.
#[derive(Debug, Clone)]
pub struct TexPicture<'a> {
    /// Union of the drawing area and label anchors.
    frame: BoundingBox,
    /// Drawing area of the background graphic.
    drawing: BoundingBox,
    background: Option<String>,
    labels: &'a [Label],
}

impl<'a> TexPicture<'a> {
    pub fn new(frame: BoundingBox, drawing: BoundingBox) -> Self {
        Self {
            frame,
            drawing,
            background: None,
            labels: &[],
        }
    }

    /// Name passed to `\includegraphics` for the background.
    pub fn with_background(mut self, name: impl Into<String>) -> Self {
        self.background = Some(name.into());
        self
    }

    pub fn with_labels(mut self, labels: &'a [Label]) -> Self {
        self.labels = labels;
        self
    }

    fn unit(&self) -> f64 {
        self.frame.width
    }

    fn place(&self, point: Point) -> Point {
        let (x, y) = flip_point(&self.frame, point);
        (normalize(x, self.unit()), normalize(y, self.unit()))
    }

    /// Canvas size in picture units: `(1, height / width)`.
    pub fn canvas_size(&self) -> Result<Point> {
        let frame = self.frame.validate()?;
        let width = normalize(frame.width, self.unit());
        let height = normalize(frame.height, self.unit());
        if width != 1.0 {
            return Err(SvgTexError::InconsistentGeometry(format!(
                "normalized canvas width is {width}, expected 1"
            )));
        }
        Ok((width, height))
    }

    /// Placement of the background graphic.
    fn background_put(&self, name: &str) -> String {
        let (x, y) = self.place(self.drawing.bottom_left());
        let scale = self.drawing.width / self.unit();
        format!(r"\put({x}, {y}){{\includegraphics[width={scale}\unitlength]{{{name}}}}}%")
    }

    fn label_put(&self, label: &Label) -> String {
        let (x, y) = self.place(label.position);
        format!(r"\put({x}, {y}){{{}}}%", label_markup(label))
    }

    /// Serializes the picture.
    pub fn dumps(&self) -> Result<String> {
        let (width, height) = self.canvas_size()?;
        let mut out = String::new();
        out.push_str("\\begingroup%\n");
        out.push_str(PICTURE_PREAMBLE);
        out.push_str(&format!(r"\begin{{picture}}({width}, {height})%"));
        out.push('\n');
        if let Some(name) = &self.background {
            out.push_str(&self.background_put(name));
            out.push('\n');
        }
        for label in self.labels {
            out.push_str(&self.label_put(label));
            out.push('\n');
        }
        out.push_str("\\end{picture}%\n");
        out.push_str("\\endgroup%\n");
        Ok(out)
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.dumps()?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// LaTeX markup for one label: font selection, color, alignment box and an
/// optional rotation.
pub fn label_markup(label: &Label) -> String {
    let style = &label.style;
    let mut font = format!(r"\{}family", style.family_tag());
    if style.is_bold() {
        font.push_str(r"\bfseries");
    }
    match style.font_style {
        FontStyle::Italic => font.push_str(r"\itshape"),
        FontStyle::Oblique => font.push_str(r"\slshape"),
        FontStyle::Normal => {}
    }
    if let Some(size) = style.font_size {
        font.push_str(size);
    }

    let color = if style.color.is_black() {
        String::new()
    } else {
        let c = style.color;
        format!(r"\color[RGB]{{{},{},{}}}", c.0, c.1, c.2)
    };

    let align = match style.align {
        Align::Start => r"\makebox(0,0)[bl]",
        Align::Center => r"\makebox(0,0)[b]",
        Align::End => r"\makebox(0,0)[br]",
    };

    let markup = format!(r"{font}{color}{align}{{\smash{{{}}}}}", label.text);
    if label.angle != 0.0 {
        format!(r"\rotatebox{{{}}}{{{markup}}}", label.angle)
    } else {
        markup
    }
}
