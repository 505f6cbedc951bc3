//! Speedup bar chart layout.
//!
//! Statistics are first mapped to normalized coordinates inside the plot
//! (0 to 1 on each axis, origin at the bottom left), then to absolute canvas
//! units through [`PlotArea`].

pub mod scene;
pub mod svg;
pub mod ticks;

use tracing::debug;

use self::scene::{Anchor, Scene, Shape, Tag};
use crate::{error::Result, ext::BenchmarkNameExt, role::Config, stats::StatsBundle};

pub const CANVAS_WIDTH: f64 = 1000.0;
pub const CANVAS_HEIGHT: f64 = 600.0;

// Margins, as fractions of the canvas.
const MARGIN_LEFT: f64 = 0.15;
const MARGIN_RIGHT: f64 = 0.05;
const MARGIN_TOP: f64 = 0.05;
const MARGIN_BOTTOM: f64 = 0.20;

/// Left and right padding inside the plot, as a fraction of its width.
const INNER_PADDING: f64 = 0.05;
/// Fraction of the plot height left above the tallest bar. The highest tick is
/// below 1.25 times the maximum ratio, so 1 / 1.25 of the height keeps it in.
const HEADROOM: f64 = 0.20;

const TICK_LENGTH: f64 = 6.0;
const TICK_FONT_SIZE: f64 = 12.0;
const AXIS_TITLE_FONT_SIZE: f64 = 14.0;
const LEGEND_FONT_SIZE: f64 = 13.0;
const LEGEND_SWATCH: f64 = 14.0;
const BENCHMARK_FONT_SIZE: f64 = 11.0;
const BENCHMARK_LABEL_ROTATION: f64 = -60.0;

const AXIS_COLOR: &str = "#000000";
const WHISKER_COLOR: &str = "#000000";

/// Bar colors, assigned by display position.
const PALETTE: [&str; 4] = ["#8c8c8c", "#e8603c", "#3d7dd8", "#58a55c"];

/// The plot rectangle within the canvas, in absolute units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
  pub left: f64,
  pub top: f64,
  pub width: f64,
  pub height: f64,
}

impl PlotArea {
  pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
    Self {
      left: canvas_width * MARGIN_LEFT,
      top: canvas_height * MARGIN_TOP,
      width: canvas_width * (1.0 - MARGIN_LEFT - MARGIN_RIGHT),
      height: canvas_height * (1.0 - MARGIN_TOP - MARGIN_BOTTOM),
    }
  }

  pub fn right(&self) -> f64 {
    self.left + self.width
  }

  pub fn bottom(&self) -> f64 {
    self.top + self.height
  }

  pub fn effective_left(&self) -> f64 {
    self.left + self.width * INNER_PADDING
  }

  pub fn effective_width(&self) -> f64 {
    self.width * (1.0 - 2.0 * INNER_PADDING)
  }

  /// Height that a ratio equal to the maximum reaches.
  pub fn effective_height(&self) -> f64 {
    self.height * (1.0 - HEADROOM)
  }

  /// Canvas x of a normalized horizontal position.
  pub fn x(&self, normalized: f64) -> f64 {
    self.effective_left() + normalized * self.effective_width()
  }

  /// Canvas y of a normalized height.
  pub fn y(&self, normalized: f64) -> f64 {
    self.bottom() - normalized * self.effective_height()
  }
}

/// Lays out one bar per (benchmark, configuration) in `stats`, scaled so the
/// largest speedup reaches the effective plot height. Baseline bars have a
/// ratio of 1.
pub fn layout(stats: &StatsBundle) -> Result<Scene> {
  let max_ratio = stats.max_speedup_ratio();
  let step = ticks::tick_step(max_ratio)?;

  let plot = PlotArea::new(CANVAS_WIDTH, CANVAS_HEIGHT);
  let mut scene = Scene::new(CANVAS_WIDTH, CANVAS_HEIGHT);

  debug!(max_ratio, step, benchmarks = stats.benchmarks.len(), "laying out chart");

  draw_axes(&mut scene, &plot);
  draw_ticks(&mut scene, &plot, max_ratio, step);
  draw_legend(&mut scene, &plot, stats);
  draw_bars(&mut scene, &plot, stats, max_ratio);
  draw_benchmark_labels(&mut scene, &plot, stats);

  Ok(scene)
}

fn color(position: usize) -> &'static str {
  PALETTE[position % PALETTE.len()]
}

fn draw_axes(scene: &mut Scene, plot: &PlotArea) {
  scene.push(Shape::Line {
    tag: Tag::Axis,
    x1: plot.left,
    y1: plot.top,
    x2: plot.left,
    y2: plot.bottom(),
    stroke: AXIS_COLOR,
    stroke_width: 1.0,
  });
  scene.push(Shape::Line {
    tag: Tag::Axis,
    x1: plot.left,
    y1: plot.bottom(),
    x2: plot.right(),
    y2: plot.bottom(),
    stroke: AXIS_COLOR,
    stroke_width: 1.0,
  });
  scene.push(Shape::Text {
    tag: Tag::AxisTitle,
    x: plot.left * 0.3,
    y: plot.top + plot.height / 2.0,
    content: "Speedup (higher is better)".to_string(),
    font_size: AXIS_TITLE_FONT_SIZE,
    anchor: Anchor::Middle,
    rotation: -90.0,
  });
}

fn draw_ticks(scene: &mut Scene, plot: &PlotArea, max_ratio: f64, step: f64) {
  let decimals = ticks::decimals(step);

  for value in ticks::tick_values(max_ratio, step) {
    let y = plot.y(value / max_ratio);

    scene.push(Shape::Line {
      tag: Tag::Tick,
      x1: plot.left - TICK_LENGTH,
      y1: y,
      x2: plot.left,
      y2: y,
      stroke: AXIS_COLOR,
      stroke_width: 1.0,
    });
    scene.push(Shape::Text {
      tag: Tag::TickLabel,
      x: plot.left - TICK_LENGTH - 4.0,
      y: y + TICK_FONT_SIZE / 3.0,
      content: format!("{value:.decimals$}x"),
      font_size: TICK_FONT_SIZE,
      anchor: Anchor::End,
      rotation: 0.0,
    });
  }
}

fn draw_legend(scene: &mut Scene, plot: &PlotArea, stats: &StatsBundle) {
  let cell_width = 1.0 / stats.configs.len() as f64;
  let y = plot.top + LEGEND_SWATCH / 2.0;

  for (position, config) in stats.configs.iter().enumerate() {
    let x = plot.x(position as f64 * cell_width);

    scene.push(Shape::Rect {
      tag: Tag::LegendSwatch { config: config.role },
      x,
      y,
      width: LEGEND_SWATCH,
      height: LEGEND_SWATCH,
      fill: color(position),
    });
    scene.push(Shape::Text {
      tag: Tag::LegendLabel { config: config.role },
      x: x + LEGEND_SWATCH * 1.5,
      y: y + LEGEND_SWATCH - 2.0,
      content: config.label.clone(),
      font_size: LEGEND_FONT_SIZE,
      anchor: Anchor::Start,
      rotation: 0.0,
    });
  }
}

/// Ratio and relative error a bar is drawn with.
fn bar_value(stats: &StatsBundle, benchmark: usize, config: &Config) -> (f64, f64) {
  let benchmark = &stats.benchmarks[benchmark];

  if config.role.is_baseline() {
    (1.0, benchmark.timings[&config.role].relative_stddev_pct)
  } else {
    let speedup = benchmark.speedups[&config.role];
    (speedup.ratio, speedup.relative_stddev_pct)
  }
}

fn draw_bars(scene: &mut Scene, plot: &PlotArea, stats: &StatsBundle, max_ratio: f64) {
  let band_width = 1.0 / stats.benchmarks.len() as f64;
  // One empty slot per band separates neighbouring benchmarks.
  let bar_width = band_width / (stats.configs.len() + 1) as f64;
  let bar_width_abs = bar_width * plot.effective_width();
  let cap_half_width = bar_width_abs / 6.0;

  for benchmark in 0..stats.benchmarks.len() {
    for (position, config) in stats.configs.iter().enumerate() {
      let (ratio, relative_stddev_pct) = bar_value(stats, benchmark, config);

      let x = plot.x(benchmark as f64 * band_width + position as f64 * bar_width);
      let top = plot.y(ratio / max_ratio);
      let height = plot.bottom() - top;

      scene.push(Shape::Rect {
        tag: Tag::Bar {
          benchmark,
          config: config.role,
        },
        x,
        y: top,
        width: bar_width_abs,
        height,
        fill: color(position),
      });

      let whisker = height * relative_stddev_pct / 100.0;
      let center = x + bar_width_abs / 2.0;
      let tag = Tag::Whisker {
        benchmark,
        config: config.role,
      };

      for y in [top - whisker, top + whisker] {
        scene.push(Shape::Line {
          tag,
          x1: center - cap_half_width,
          y1: y,
          x2: center + cap_half_width,
          y2: y,
          stroke: WHISKER_COLOR,
          stroke_width: 1.0,
        });
      }
      scene.push(Shape::Line {
        tag,
        x1: center,
        y1: top - whisker,
        x2: center,
        y2: top + whisker,
        stroke: WHISKER_COLOR,
        stroke_width: 1.0,
      });
    }
  }
}

fn draw_benchmark_labels(scene: &mut Scene, plot: &PlotArea, stats: &StatsBundle) {
  let band_width = 1.0 / stats.benchmarks.len() as f64;

  for (index, benchmark) in stats.benchmarks.iter().enumerate() {
    scene.push(Shape::Text {
      tag: Tag::BenchmarkLabel { benchmark: index },
      x: plot.x((index as f64 + 0.5) * band_width),
      y: plot.bottom() + BENCHMARK_FONT_SIZE,
      content: benchmark.name.display_name().to_string(),
      font_size: BENCHMARK_FONT_SIZE,
      anchor: Anchor::End,
      rotation: BENCHMARK_LABEL_ROTATION,
    });
  }
}
