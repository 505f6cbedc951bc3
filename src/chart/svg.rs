use std::fmt::{self, Write};

use super::scene::{Anchor, Scene, Shape};

const FONT_FAMILY: &str = "sans-serif";

fn escape(text: &str) -> String {
  let mut escaped = String::with_capacity(text.len());
  for c in text.chars() {
    match c {
      '&' => escaped.push_str("&amp;"),
      '<' => escaped.push_str("&lt;"),
      '>' => escaped.push_str("&gt;"),
      '"' => escaped.push_str("&quot;"),
      _ => escaped.push(c),
    }
  }

  escaped
}

fn anchor(anchor: Anchor) -> &'static str {
  match anchor {
    Anchor::Start => "start",
    Anchor::Middle => "middle",
    Anchor::End => "end",
  }
}

/// Serializes `scene` to an SVG document, one element per primitive in scene
/// order. Coordinates are printed with two decimals, so equal scenes always
/// produce identical documents.
pub fn render(scene: &Scene) -> Result<String, fmt::Error> {
  let mut svg = String::new();

  writeln!(
    svg,
    r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
    w = scene.width,
    h = scene.height,
  )?;
  writeln!(svg, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;

  for shape in &scene.shapes {
    let class = shape.tag().class();

    match shape {
      Shape::Rect {
        x,
        y,
        width,
        height,
        fill,
        ..
      } => writeln!(
        svg,
        r#"<rect class="{class}" x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" fill="{fill}"/>"#,
      )?,
      Shape::Line {
        x1,
        y1,
        x2,
        y2,
        stroke,
        stroke_width,
        ..
      } => writeln!(
        svg,
        r#"<line class="{class}" x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{stroke}" stroke-width="{stroke_width:.2}"/>"#,
      )?,
      Shape::Text {
        x,
        y,
        content,
        font_size,
        anchor: text_anchor,
        rotation,
        ..
      } => {
        write!(
          svg,
          r#"<text class="{class}" x="{x:.2}" y="{y:.2}" font-family="{FONT_FAMILY}" font-size="{font_size:.0}" text-anchor="{}""#,
          anchor(*text_anchor),
        )?;
        if *rotation != 0.0 {
          write!(svg, r#" transform="rotate({rotation:.0} {x:.2} {y:.2})""#)?;
        }
        writeln!(svg, ">{}</text>", escape(content))?;
      }
    }
  }

  writeln!(svg, "</svg>")?;

  Ok(svg)
}
