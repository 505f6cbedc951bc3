use std::collections::BTreeMap;

use serde::Deserialize;

/// Interpreter counters captured during one run.
pub type Counters = BTreeMap<String, i64>;

/// Interpreter build information, passed through to report headers.
pub type Metadata = BTreeMap<String, String>;

/// Read-only source of parsed benchmark measurements.
pub trait ResultSet {
  /// Every configuration with results, in a stable order.
  fn config_names(&self) -> Vec<&str>;

  /// Benchmarks with samples for `config`, sorted.
  fn benchmark_names(&self, config: &str) -> Vec<&str>;

  /// Elapsed time of each run.
  fn samples(&self, config: &str, benchmark: &str) -> Option<&[f64]>;

  fn metadata(&self, config: &str) -> Option<&Metadata>;

  /// One counter mapping per captured run.
  fn counters(&self, config: &str, benchmark: &str) -> Option<&[Counters]>;
}

/// Results for a single configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigResults {
  #[serde(default)]
  pub metadata: Metadata,
  #[serde(default)]
  pub samples: BTreeMap<String, Vec<f64>>,
  #[serde(default)]
  pub counters: BTreeMap<String, Vec<Counters>>,
}

/// A result set held in memory, as deserialized from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InMemoryResults {
  pub configs: BTreeMap<String, ConfigResults>,
}

impl InMemoryResults {
  pub fn from_json_str(source: &str) -> serde_json::Result<Self> {
    serde_json::from_str(source)
  }

  pub fn config_mut(&mut self, config: &str) -> &mut ConfigResults {
    self.configs.entry(config.to_string()).or_default()
  }

  pub fn insert_samples(&mut self, config: &str, benchmark: &str, samples: Vec<f64>) -> &mut Self {
    self.config_mut(config).samples.insert(benchmark.to_string(), samples);
    self
  }

  pub fn insert_counters(&mut self, config: &str, benchmark: &str, counters: Vec<Counters>) -> &mut Self {
    self.config_mut(config).counters.insert(benchmark.to_string(), counters);
    self
  }
}

impl ResultSet for InMemoryResults {
  fn config_names(&self) -> Vec<&str> {
    self.configs.keys().map(String::as_str).collect()
  }

  fn benchmark_names(&self, config: &str) -> Vec<&str> {
    self
      .configs
      .get(config)
      .map(|results| results.samples.keys().map(String::as_str).collect())
      .unwrap_or_default()
  }

  fn samples(&self, config: &str, benchmark: &str) -> Option<&[f64]> {
    self.configs.get(config)?.samples.get(benchmark).map(Vec::as_slice)
  }

  fn metadata(&self, config: &str) -> Option<&Metadata> {
    self.configs.get(config).map(|results| &results.metadata)
  }

  fn counters(&self, config: &str, benchmark: &str) -> Option<&[Counters]> {
    self.configs.get(config)?.counters.get(benchmark).map(Vec::as_slice)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_from_json() {
    let results = InMemoryResults::from_json_str(
      r#"{
        "configs": {
          "prod_ruby_with_yjit": {
            "metadata": { "RUBY_VERSION": "3.3.0" },
            "samples": { "fib.rb": [1.0, 1.5], "nbody": [2.0] },
            "counters": { "fib.rb": [{ "instructions_executed_total": 10 }] }
          },
          "prod_ruby_no_jit": { "samples": { "fib.rb": [3.0] } }
        }
      }"#,
    )
    .unwrap();

    assert_eq!(results.config_names(), vec!["prod_ruby_no_jit", "prod_ruby_with_yjit"]);
    assert_eq!(results.benchmark_names("prod_ruby_with_yjit"), vec!["fib.rb", "nbody"]);
    assert_eq!(results.samples("prod_ruby_with_yjit", "fib.rb"), Some(&[1.0, 1.5][..]));
    assert_eq!(results.metadata("prod_ruby_with_yjit").unwrap()["RUBY_VERSION"], "3.3.0");
    assert_eq!(results.counters("prod_ruby_with_yjit", "fib.rb").unwrap().len(), 1);
    assert!(results.counters("prod_ruby_no_jit", "fib.rb").is_none());
    assert!(results.benchmark_names("missing").is_empty());
  }
}
