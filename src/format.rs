use std::{
  fmt::{self, Write},
  io,
};

use crate::stats::StatsBundle;

const COLUMN_WIDTH: usize = 14;
const COLUMN_PADDING: &str = "  ";

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
  Text(String),
  Number(f64),
}

impl fmt::Display for Cell {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Cell::Text(text) => f.write_str(text),
      Cell::Number(number) => write!(f, "{number}"),
    }
  }
}

/// How a column is printed in the text table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
  Name,
  Mean,
  Percent,
  Speedup,
}

impl Column {
  fn render(self, cell: &Cell) -> String {
    match (self, cell) {
      (Column::Name, _) | (_, Cell::Text(_)) => cell.to_string(),
      (Column::Mean, Cell::Number(number)) => format!("{number:.1}"),
      (Column::Percent, Cell::Number(number)) => format!("{number:.2}%"),
      (Column::Speedup, Cell::Number(number)) => format!("{number:.2}x"),
    }
  }
}

fn columns(stats: &StatsBundle) -> Vec<(String, Column)> {
  let mut columns = vec![("bench".to_string(), Column::Name)];

  for config in stats.configs.iter() {
    columns.push((format!("{} mean", config.label), Column::Mean));
    columns.push((format!("{} RSD", config.label), Column::Percent));
  }
  for config in stats.configs.non_baseline() {
    columns.push((format!("{} speedup", config.label), Column::Speedup));
    columns.push((format!("{} speedup RSD", config.label), Column::Percent));
  }
  columns.push((format!("{} in tier", stats.configs.primary().label), Column::Percent));

  columns
}

/// Column headers matching [`to_rows`].
pub fn headers(stats: &StatsBundle) -> Vec<String> {
  columns(stats).into_iter().map(|(header, _)| header).collect()
}

/// One row per benchmark: the name, mean and RSD of every configuration,
/// speedup and its RSD of every non-baseline configuration, then the
/// optimized-tier instruction ratio.
pub fn to_rows(stats: &StatsBundle) -> Vec<Vec<Cell>> {
  stats
    .benchmarks
    .iter()
    .map(|benchmark| {
      let mut row = vec![Cell::Text(benchmark.name.clone())];

      for timing in benchmark.timings.values() {
        row.push(Cell::Number(timing.mean));
        row.push(Cell::Number(timing.relative_stddev_pct));
      }
      for speedup in benchmark.speedups.values() {
        row.push(Cell::Number(speedup.ratio));
        row.push(Cell::Number(speedup.relative_stddev_pct));
      }
      row.push(Cell::Number(benchmark.optimized_tier_ratio));

      row
    })
    .collect()
}

fn format_row<I: IntoIterator<Item = String>>(cells: I, widths: &[usize]) -> String {
  cells
    .into_iter()
    .zip(widths.iter().copied())
    .enumerate()
    .map(|(i, (cell, width))| {
      if i == 0 {
        format!("{cell:<width$}")
      } else {
        format!("{cell:>width$}")
      }
    })
    .collect::<Vec<_>>()
    .join(COLUMN_PADDING)
}

/// Renders the rows of [`to_rows`] as an aligned text table, followed by the
/// total time of every configuration.
pub fn format(stats: &StatsBundle) -> Result<String, fmt::Error> {
  let columns = columns(stats);
  let rendered = to_rows(stats)
    .iter()
    .map(|row| {
      row
        .iter()
        .zip(&columns)
        .map(|(cell, (_, column))| column.render(cell))
        .collect::<Vec<_>>()
    })
    .collect::<Vec<_>>();

  let widths = columns
    .iter()
    .enumerate()
    .map(|(i, (header, _))| {
      rendered
        .iter()
        .map(|row| row[i].len())
        .chain([header.len(), COLUMN_WIDTH])
        .max()
        .unwrap_or(COLUMN_WIDTH)
    })
    .collect::<Vec<_>>();

  let mut table = String::new();

  let header = format_row(columns.iter().map(|(header, _)| header.clone()), &widths);
  writeln!(table, "{header}")?;
  writeln!(table, "{}", "=".repeat(header.len()))?;

  for row in rendered {
    writeln!(table, "{}", format_row(row, &widths))?;
  }
  writeln!(table, "{}", "-".repeat(header.len()))?;

  for config in stats.configs.iter() {
    let total = stats.total_time.get(&config.role).copied().unwrap_or_default();
    writeln!(table, "total {:<COLUMN_WIDTH$}{COLUMN_PADDING}{total:.1}", config.label)?;
  }

  Ok(table)
}

/// Writes the headers and rows of [`to_rows`] as CSV.
pub fn write_csv<W: io::Write>(writer: W, stats: &StatsBundle) -> csv::Result<()> {
  let mut csv = csv::Writer::from_writer(writer);

  csv.write_record(headers(stats))?;
  for row in to_rows(stats) {
    csv.write_record(row.iter().map(Cell::to_string))?;
  }
  csv.flush()?;

  Ok(())
}
