use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use tracing::info;

use crate::{
  chart::{self, scene::Scene, svg},
  error::Result,
  format::{self, Cell},
  results::{Metadata, ResultSet},
  role::{Config, NamingPolicy, ResolvedConfigs, Role},
  stats::{self, BenchmarkStats, SampleStats, StatsBundle},
};

/// Everything a single report invocation produces. Built from scratch on
/// every call; nothing is emitted unless every step succeeded.
#[derive(Debug, Clone)]
pub struct Report {
  pub stats: StatsBundle,
  pub scene: Scene,
  pub rows: Vec<Vec<Cell>>,
  /// Primary configuration timing per benchmark.
  pub tripwires: BTreeMap<String, SampleStats>,
}

/// Per-configuration totals and metadata alongside every benchmark's
/// statistics.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
  pub configs: Vec<&'a Config>,
  pub metadata: &'a BTreeMap<Role, Metadata>,
  pub total_time: &'a BTreeMap<Role, f64>,
  pub benchmarks: &'a [BenchmarkStats],
}

impl Report {
  /// Resolves every role with `policy`, then builds the report over the
  /// benchmarks of the primary configuration, optionally restricted to
  /// `allow_list`.
  pub fn build<R, P>(results: &R, policy: &P, allow_list: Option<&[String]>) -> Result<Self>
  where
    R: ResultSet + ?Sized,
    P: NamingPolicy + ?Sized,
  {
    let names = results.config_names();
    let configs = ResolvedConfigs::resolve(&names, policy)?;

    Self::build_with(results, &configs, allow_list)
  }

  /// Builds the report for already resolved configurations.
  pub fn build_with<R: ResultSet + ?Sized>(
    results: &R,
    configs: &ResolvedConfigs,
    allow_list: Option<&[String]>,
  ) -> Result<Self> {
    let benchmarks = stats::active_benchmarks(results, configs, allow_list);
    let stats = StatsBundle::compute(results, configs, &benchmarks)?;
    let scene = chart::layout(&stats)?;

    info!(
      benchmarks = benchmarks.len(),
      configs = configs.len(),
      max_speedup_ratio = stats.max_speedup_ratio(),
      "built report"
    );

    Ok(Self {
      rows: format::to_rows(&stats),
      tripwires: stats.tripwires(),
      scene,
      stats,
    })
  }

  pub fn table(&self) -> Result<String, fmt::Error> {
    format::format(&self.stats)
  }

  pub fn svg(&self) -> Result<String, fmt::Error> {
    svg::render(&self.scene)
  }

  pub fn summary(&self) -> Summary<'_> {
    Summary {
      configs: self.stats.configs.iter().collect(),
      metadata: &self.stats.metadata,
      total_time: &self.stats.total_time,
      benchmarks: &self.stats.benchmarks,
    }
  }
}
