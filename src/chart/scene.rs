use crate::role::Role;

/// What a primitive depicts. Serializers use it as a class name; tests use it
/// to find primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
  Axis,
  AxisTitle,
  Tick,
  TickLabel,
  LegendSwatch { config: Role },
  LegendLabel { config: Role },
  Bar { benchmark: usize, config: Role },
  Whisker { benchmark: usize, config: Role },
  BenchmarkLabel { benchmark: usize },
}

impl Tag {
  pub fn class(&self) -> &'static str {
    match self {
      Tag::Axis => "axis",
      Tag::AxisTitle => "axis-title",
      Tag::Tick => "tick",
      Tag::TickLabel => "tick-label",
      Tag::LegendSwatch { .. } => "legend-swatch",
      Tag::LegendLabel { .. } => "legend-label",
      Tag::Bar { .. } => "bar",
      Tag::Whisker { .. } => "whisker",
      Tag::BenchmarkLabel { .. } => "benchmark-label",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
  Start,
  Middle,
  End,
}

/// A drawable primitive in absolute canvas coordinates, y growing downwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
  Rect {
    tag: Tag,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    fill: &'static str,
  },
  Line {
    tag: Tag,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    stroke: &'static str,
    stroke_width: f64,
  },
  Text {
    tag: Tag,
    x: f64,
    y: f64,
    content: String,
    font_size: f64,
    anchor: Anchor,
    /// Degrees, clockwise, around `(x, y)`.
    rotation: f64,
  },
}

impl Shape {
  pub fn tag(&self) -> Tag {
    match self {
      Shape::Rect { tag, .. } | Shape::Line { tag, .. } | Shape::Text { tag, .. } => *tag,
    }
  }
}

/// An ordered list of primitives on a fixed-size canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
  pub width: f64,
  pub height: f64,
  pub shapes: Vec<Shape>,
}

impl Scene {
  pub fn new(width: f64, height: f64) -> Self {
    Self {
      width,
      height,
      shapes: Vec::new(),
    }
  }

  pub fn push(&mut self, shape: Shape) {
    self.shapes.push(shape);
  }

  /// Primitives whose tag satisfies `predicate`, in drawing order.
  pub fn tagged<F: Fn(Tag) -> bool>(&self, predicate: F) -> impl Iterator<Item = &Shape> {
    self.shapes.iter().filter(move |shape| predicate(shape.tag()))
  }
}
