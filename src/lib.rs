//! Comparative speed reports for interpreter configurations.
//!
//! Timing samples and interpreter counters of a [`ResultSet`] are classified
//! by [`Role`], reduced to per-benchmark statistics, and rendered as a speedup
//! chart and as tables.

pub mod chart;
pub mod error;
pub mod ext;
pub mod format;
pub mod output;
pub mod report;
pub mod results;
pub mod role;
pub mod stats;

pub use self::{
  error::{ReportError, Result},
  report::Report,
  results::{InMemoryResults, ResultSet},
  role::{NamingPolicy, ResolvedConfigs, Role, SubstringPolicy},
  stats::StatsBundle,
};
