use thiserror::Error;

use crate::role::Role;

pub type Result<T, E = ReportError> = std::result::Result<T, E>;

/// Every way a report invocation can fail. None of these are recoverable: the
/// report is aborted and nothing is emitted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
  #[error("{role} pattern {pattern:?} matches more than one configuration: {matches:?}")]
  AmbiguousConfig {
    role: Role,
    pattern: String,
    matches: Vec<String>,
  },
  #[error("no configuration matches {role} pattern {pattern:?}")]
  MissingConfig { role: Role, pattern: String },
  #[error("configuration {config:?} has no samples for benchmark {benchmark:?}")]
  MissingResults { config: String, benchmark: String },
  #[error("configuration {config:?} has no counter {field:?} for benchmark {benchmark:?}")]
  MissingCounterData {
    config: String,
    benchmark: String,
    field: String,
  },
  #[error("counter {field:?} of {config:?} for benchmark {benchmark:?} is inconsistent: {reason}")]
  InvalidCounterData {
    config: String,
    benchmark: String,
    field: String,
    reason: String,
  },
  #[error("division by zero computing {quantity} of {config:?} for benchmark {benchmark:?}")]
  DivisionByZero {
    config: String,
    benchmark: String,
    quantity: &'static str,
  },
  #[error("no axis tick step fits a maximum speedup ratio of {max_ratio}")]
  NoTickStep { max_ratio: f64 },
}
