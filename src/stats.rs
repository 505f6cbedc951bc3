use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::{
  error::{ReportError, Result},
  ext::{CountersExt, SampleExt},
  results::{Metadata, ResultSet},
  role::{Config, ResolvedConfigs, Role},
};

/// Instructions executed in total, tier or not.
pub const INSTRUCTIONS_TOTAL: &str = "instructions_executed_total";
/// Instructions the fallback interpreter executed.
pub const INSTRUCTIONS_FALLBACK: &str = "instructions_executed_by_fallback_vm";

/// Mean and dispersion of one (configuration, benchmark) sample sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleStats {
  pub mean: f64,
  /// Sample standard deviation as a percentage of the mean.
  pub relative_stddev_pct: f64,
}

impl SampleStats {
  pub fn from_samples(config: &str, benchmark: &str, samples: &[f64]) -> Result<Self> {
    if samples.is_empty() {
      return Err(ReportError::MissingResults {
        config: config.to_string(),
        benchmark: benchmark.to_string(),
      });
    }

    let mean = samples.mean();
    if mean == 0.0 {
      return Err(ReportError::DivisionByZero {
        config: config.to_string(),
        benchmark: benchmark.to_string(),
        quantity: "relative standard deviation",
      });
    }

    Ok(Self {
      mean,
      relative_stddev_pct: samples.sample_stddev() / mean * 100.0,
    })
  }
}

/// Speed of a configuration relative to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Speedup {
  /// Baseline mean over this configuration's mean.
  pub ratio: f64,
  pub relative_stddev_pct: f64,
}

impl Speedup {
  /// Ratio of two means with independent errors. Both means are nonzero, as
  /// guaranteed by [`SampleStats::from_samples`].
  pub fn of(baseline: SampleStats, candidate: SampleStats) -> Self {
    let baseline_rsd = baseline.relative_stddev_pct / 100.0;
    let candidate_rsd = candidate.relative_stddev_pct / 100.0;

    Self {
      ratio: baseline.mean / candidate.mean,
      relative_stddev_pct: 100.0 * (baseline_rsd.powi(2) + candidate_rsd.powi(2)).sqrt(),
    }
  }
}

/// Everything computed for one benchmark.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkStats {
  pub name: String,
  /// Timing statistics of every resolved configuration.
  pub timings: BTreeMap<Role, SampleStats>,
  /// Speedups of every non-baseline configuration.
  pub speedups: BTreeMap<Role, Speedup>,
  /// Percentage of instructions the primary configuration retired in its
  /// optimizing tier.
  pub optimized_tier_ratio: f64,
}

/// Per-benchmark statistics for one report, keyed by role. Benchmarks keep the
/// order they were computed in.
#[derive(Debug, Clone)]
pub struct StatsBundle {
  pub configs: ResolvedConfigs,
  pub benchmarks: Vec<BenchmarkStats>,
  /// Sum of every sample of every benchmark, per configuration.
  pub total_time: BTreeMap<Role, f64>,
  pub metadata: BTreeMap<Role, Metadata>,
}

impl StatsBundle {
  /// Computes the statistics of `benchmarks`, in the given order. Any missing
  /// sample sequence or counter aborts the whole computation.
  pub fn compute<R: ResultSet + ?Sized>(
    results: &R,
    configs: &ResolvedConfigs,
    benchmarks: &[String],
  ) -> Result<Self> {
    let mut total_time = configs.iter().map(|c| (c.role, 0.0)).collect::<BTreeMap<_, _>>();
    let mut computed = Vec::with_capacity(benchmarks.len());

    for benchmark in benchmarks {
      let mut timings = BTreeMap::new();
      for config in configs.iter() {
        let samples = results.samples(&config.name, benchmark).unwrap_or_default();
        timings.insert(config.role, SampleStats::from_samples(&config.name, benchmark, samples)?);

        *total_time.entry(config.role).or_insert(0.0) += samples.iter().sum::<f64>();
      }

      let baseline = timings[&Role::Baseline];
      let speedups = configs
        .non_baseline()
        .map(|config| (config.role, Speedup::of(baseline, timings[&config.role])))
        .collect::<BTreeMap<_, _>>();

      let optimized_tier_ratio = optimized_tier_ratio(results, configs.primary(), benchmark)?;

      debug!(benchmark = %benchmark, optimized_tier_ratio, "computed benchmark statistics");
      computed.push(BenchmarkStats {
        name: benchmark.clone(),
        timings,
        speedups,
        optimized_tier_ratio,
      });
    }

    let metadata = configs
      .iter()
      .map(|config| (config.role, results.metadata(&config.name).cloned().unwrap_or_default()))
      .collect();

    Ok(Self {
      configs: configs.clone(),
      benchmarks: computed,
      total_time,
      metadata,
    })
  }

  /// The largest speedup of any non-baseline configuration on any benchmark.
  pub fn max_speedup_ratio(&self) -> f64 {
    self
      .benchmarks
      .iter()
      .flat_map(|benchmark| benchmark.speedups.values())
      .map(|speedup| speedup.ratio)
      .fold(f64::NEG_INFINITY, f64::max)
  }

  /// Primary configuration timing per benchmark, for regression alerting.
  pub fn tripwires(&self) -> BTreeMap<String, SampleStats> {
    self
      .benchmarks
      .iter()
      .map(|benchmark| (benchmark.name.clone(), benchmark.timings[&Role::OptimizedPrimary]))
      .collect()
  }
}

/// The benchmarks a report covers: those the primary configuration has
/// results for, restricted to `allow_list` when one is given, sorted.
pub fn active_benchmarks<R: ResultSet + ?Sized>(
  results: &R,
  configs: &ResolvedConfigs,
  allow_list: Option<&[String]>,
) -> Vec<String> {
  let mut names = results
    .benchmark_names(&configs.primary().name)
    .into_iter()
    .filter(|name| allow_list.map_or(true, |allowed| allowed.iter().any(|a| a == name)))
    .map(str::to_string)
    .collect::<Vec<_>>();

  names.sort();
  names
}

fn optimized_tier_ratio<R: ResultSet + ?Sized>(results: &R, config: &Config, benchmark: &str) -> Result<f64> {
  let counters = results
    .counters(&config.name, benchmark)
    .unwrap_or_default()
    .summed()
    .map_err(|field| ReportError::InvalidCounterData {
      config: config.name.clone(),
      benchmark: benchmark.to_string(),
      reason: format!("sum of {field:?} across runs overflows"),
      field,
    })?;

  let counter = |field: &str| {
    counters
      .get(field)
      .copied()
      .ok_or_else(|| ReportError::MissingCounterData {
        config: config.name.clone(),
        benchmark: benchmark.to_string(),
        field: field.to_string(),
      })
  };

  let total = counter(INSTRUCTIONS_TOTAL)?;
  let fallback = counter(INSTRUCTIONS_FALLBACK)?;

  if fallback < 0 || fallback > total {
    return Err(ReportError::InvalidCounterData {
      config: config.name.clone(),
      benchmark: benchmark.to_string(),
      field: INSTRUCTIONS_FALLBACK.to_string(),
      reason: format!("{fallback} fallback instructions out of {total}"),
    });
  }

  let retired_in_tier = total - fallback;
  if retired_in_tier + fallback == 0 {
    return Err(ReportError::DivisionByZero {
      config: config.name.clone(),
      benchmark: benchmark.to_string(),
      quantity: "optimized-tier instruction ratio",
    });
  }

  Ok(retired_in_tier as f64 / (retired_in_tier + fallback) as f64 * 100.0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::results::{Counters, InMemoryResults};

  fn counters(total: i64, fallback: i64) -> Counters {
    Counters::from([
      (INSTRUCTIONS_TOTAL.to_string(), total),
      (INSTRUCTIONS_FALLBACK.to_string(), fallback),
    ])
  }

  fn loop_bench_results() -> InMemoryResults {
    let mut results = InMemoryResults::default();
    results
      .insert_samples("baseline", "loop_bench", vec![10.0, 10.2, 9.8])
      .insert_samples("optimized", "loop_bench", vec![5.0, 5.1, 4.9])
      .insert_counters("optimized", "loop_bench", vec![counters(600, 100), counters(400, 100)]);

    results
  }

  fn configs() -> ResolvedConfigs {
    ResolvedConfigs::new("baseline", "optimized")
  }

  #[test]
  fn test_single_sample_rsd_is_zero() {
    let stats = SampleStats::from_samples("c", "b", &[3.5]).unwrap();

    assert_eq!(stats.mean, 3.5);
    assert_eq!(stats.relative_stddev_pct, 0.0);
  }

  #[test]
  fn test_zero_variance_rsd_is_zero() {
    for value in [0.1, 0.7, 1.1] {
      let stats = SampleStats::from_samples("c", "b", &[value, value, value]).unwrap();
      assert_eq!(stats.relative_stddev_pct, 0.0, "{value}");
    }
  }

  #[test]
  fn test_zero_mean_is_error() {
    assert!(matches!(
      SampleStats::from_samples("c", "b", &[0.0, 0.0]),
      Err(ReportError::DivisionByZero { .. })
    ));
  }

  #[test]
  fn test_speedup_error_is_symmetric() {
    let a = SampleStats {
      mean: 10.0,
      relative_stddev_pct: 3.0,
    };
    let b = SampleStats {
      mean: 4.0,
      relative_stddev_pct: 4.0,
    };

    let forward = Speedup::of(a, b);
    let backward = Speedup::of(b, a);

    assert!((forward.ratio - 2.5).abs() < 1e-12);
    assert!((backward.ratio - 0.4).abs() < 1e-12);
    assert!((forward.relative_stddev_pct - 5.0).abs() < 1e-9);
    assert!((forward.relative_stddev_pct - backward.relative_stddev_pct).abs() < 1e-12);
  }

  #[test]
  fn test_compute_loop_bench() {
    let results = loop_bench_results();
    let bundle = StatsBundle::compute(&results, &configs(), &["loop_bench".to_string()]).unwrap();

    let bench = &bundle.benchmarks[0];
    let baseline = bench.timings[&Role::Baseline];
    let optimized = bench.timings[&Role::OptimizedPrimary];

    assert!((baseline.mean - 10.0).abs() < 1e-9);
    assert!((optimized.mean - 5.0).abs() < 1e-9);
    assert!(baseline.relative_stddev_pct > 0.0 && baseline.relative_stddev_pct < 5.0);
    assert!(optimized.relative_stddev_pct > 0.0 && optimized.relative_stddev_pct < 5.0);

    let speedup = bench.speedups[&Role::OptimizedPrimary];
    assert!((speedup.ratio - baseline.mean / optimized.mean).abs() < 1e-12);
    assert!((speedup.ratio - 2.0).abs() < 1e-9);
    assert!(!bench.speedups.contains_key(&Role::Baseline));

    // 800 of 1000 instructions retired in the tier.
    assert!((bench.optimized_tier_ratio - 80.0).abs() < 1e-9);
    assert!((bundle.total_time[&Role::Baseline] - 30.0).abs() < 1e-9);
    assert!((bundle.max_speedup_ratio() - 2.0).abs() < 1e-9);
  }

  #[test]
  fn test_missing_samples_is_error() {
    let mut results = loop_bench_results();
    results.insert_samples("baseline", "loop_bench", vec![]);

    assert_eq!(
      StatsBundle::compute(&results, &configs(), &["loop_bench".to_string()]).unwrap_err(),
      ReportError::MissingResults {
        config: "baseline".to_string(),
        benchmark: "loop_bench".to_string(),
      }
    );
  }

  #[test]
  fn test_missing_counters_is_error() {
    let mut results = loop_bench_results();
    results.insert_counters("optimized", "loop_bench", vec![]);

    assert!(matches!(
      StatsBundle::compute(&results, &configs(), &["loop_bench".to_string()]),
      Err(ReportError::MissingCounterData { field, .. }) if field == INSTRUCTIONS_TOTAL
    ));
  }

  #[test]
  fn test_fallback_exceeding_total_is_error() {
    let mut results = loop_bench_results();
    results.insert_counters("optimized", "loop_bench", vec![counters(10, 20)]);

    assert!(matches!(
      StatsBundle::compute(&results, &configs(), &["loop_bench".to_string()]),
      Err(ReportError::InvalidCounterData { .. })
    ));
  }

  #[test]
  fn test_zero_instructions_is_error() {
    let mut results = loop_bench_results();
    results.insert_counters("optimized", "loop_bench", vec![counters(0, 0)]);

    assert!(matches!(
      StatsBundle::compute(&results, &configs(), &["loop_bench".to_string()]),
      Err(ReportError::DivisionByZero {
        quantity: "optimized-tier instruction ratio",
        ..
      })
    ));
  }

  #[test]
  fn test_counter_overflow_is_error() {
    let mut results = loop_bench_results();
    results.insert_counters("optimized", "loop_bench", vec![counters(i64::MAX, 0), counters(1, 0)]);

    assert!(matches!(
      StatsBundle::compute(&results, &configs(), &["loop_bench".to_string()]),
      Err(ReportError::InvalidCounterData { field, .. }) if field == INSTRUCTIONS_TOTAL
    ));
  }

  #[test]
  fn test_active_benchmarks_filtered_and_sorted() {
    let mut results = loop_bench_results();
    results
      .insert_samples("optimized", "fib", vec![1.0])
      .insert_samples("optimized", "nbody", vec![1.0])
      .insert_samples("baseline", "only_baseline", vec![1.0]);

    assert_eq!(
      active_benchmarks(&results, &configs(), None),
      vec!["fib", "loop_bench", "nbody"]
    );

    let allowed = ["nbody".to_string(), "fib".to_string(), "unknown".to_string()];
    assert_eq!(
      active_benchmarks(&results, &configs(), Some(&allowed[..])),
      vec!["fib", "nbody"]
    );
  }

  #[test]
  fn test_tripwires_follow_primary() {
    let results = loop_bench_results();
    let bundle = StatsBundle::compute(&results, &configs(), &["loop_bench".to_string()]).unwrap();

    let tripwires = bundle.tripwires();
    assert_eq!(tripwires.len(), 1);
    assert!((tripwires["loop_bench"].mean - 5.0).abs() < 1e-9);
  }
}
