use std::{
  fs::{self, File},
  io::BufWriter,
  path::Path,
};

use anyhow::{Context, Result};
use tracing::info;

use crate::{format, report::Report};

pub const SVG_FILE: &str = "speed.svg";
pub const CSV_FILE: &str = "speed.csv";
pub const TRIPWIRES_FILE: &str = "tripwires.json";
pub const SUMMARY_FILE: &str = "summary.json";

/// Writes the chart, row table, tripwires and summary of `report` into `dir`,
/// creating it if needed.
pub fn write_all(dir: &Path, report: &Report) -> Result<()> {
  fs::create_dir_all(dir).with_context(|| format!("create_dir_all {dir:?}"))?;

  let svg = report.svg().context("render svg")?;
  fs::write(dir.join(SVG_FILE), svg).context("write svg")?;

  let csv = File::create(dir.join(CSV_FILE)).context("create csv")?;
  format::write_csv(BufWriter::new(csv), &report.stats).context("write csv")?;

  let tripwires = serde_json::to_string_pretty(&report.tripwires).context("serialize tripwires")?;
  fs::write(dir.join(TRIPWIRES_FILE), tripwires).context("write tripwires")?;

  let summary = serde_json::to_string_pretty(&report.summary()).context("serialize summary")?;
  fs::write(dir.join(SUMMARY_FILE), summary).context("write summary")?;

  info!(dir = %dir.display(), "wrote report");

  Ok(())
}
