use std::collections::BTreeMap;

/// Suffix stripped from benchmark names when they are displayed.
const SCRIPT_SUFFIX: &str = ".rb";

#[extend::ext(name = SampleExt)]
pub impl [f64] {
  /// Arithmetic mean. `NaN` for an empty slice.
  fn mean(&self) -> f64 {
    self.iter().sum::<f64>() / self.len() as f64
  }

  /// Sample (Bessel-corrected) standard deviation. Zero for fewer than two
  /// samples or identical samples.
  fn sample_stddev(&self) -> f64 {
    if self.len() < 2 || self.iter().all(|&x| x == self[0]) {
      return 0.0;
    }

    let mean = self.mean();
    let sum_squares = self.iter().map(|x| (x - mean).powi(2)).sum::<f64>();

    (sum_squares / (self.len() - 1) as f64).sqrt()
  }
}

#[extend::ext(name = CountersExt)]
pub impl [BTreeMap<String, i64>] {
  /// Sums every counter across all captured runs. Fails with the name of the
  /// first counter whose sum overflows.
  fn summed(&self) -> Result<BTreeMap<String, i64>, String> {
    let mut total = BTreeMap::new();
    for run in self {
      for (counter, value) in run {
        let sum = total.entry(counter.clone()).or_insert(0i64);
        *sum = sum.checked_add(*value).ok_or_else(|| counter.clone())?;
      }
    }

    Ok(total)
  }
}

#[extend::ext(name = BenchmarkNameExt)]
pub impl str {
  /// The benchmark name as shown in charts.
  fn display_name(&self) -> &str {
    self.strip_suffix(SCRIPT_SUFFIX).unwrap_or(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mean_and_stddev() {
    let samples: [f64; 3] = [10.0, 10.2, 9.8];

    assert!((samples.mean() - 10.0).abs() < 1e-9);
    assert!((samples.sample_stddev() - 0.2).abs() < 1e-9);
  }

  #[test]
  fn test_single_sample_has_no_spread() {
    assert_eq!([4.2_f64].sample_stddev(), 0.0);
  }

  #[test]
  fn test_counters_summed_across_runs() {
    let runs: Vec<BTreeMap<String, i64>> = vec![
      BTreeMap::from([("a".to_string(), 3), ("b".to_string(), 1)]),
      BTreeMap::from([("a".to_string(), 4)]),
    ];

    let total = runs.summed().unwrap();
    assert_eq!(total["a"], 7);
    assert_eq!(total["b"], 1);
  }

  #[test]
  fn test_counter_overflow_names_counter() {
    let runs: Vec<BTreeMap<String, i64>> = vec![
      BTreeMap::from([("a".to_string(), 1), ("b".to_string(), i64::MAX)]),
      BTreeMap::from([("b".to_string(), 1)]),
    ];

    assert_eq!(runs.summed(), Err("b".to_string()));
  }

  #[test]
  fn test_identical_samples_have_no_spread() {
    assert_eq!([0.1_f64, 0.1, 0.1].sample_stddev(), 0.0);
    assert_eq!([0.7_f64, 0.7, 0.7].sample_stddev(), 0.0);
  }

  #[test]
  fn test_display_name() {
    assert_eq!("optcarrot.rb".display_name(), "optcarrot");
    assert_eq!("railsbench".display_name(), "railsbench");
  }
}
