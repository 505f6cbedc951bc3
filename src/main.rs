use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use speed_report::{output, InMemoryResults, Report, SubstringPolicy};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Args {
  /// Log debug output.
  #[arg(short, long, global = true)]
  verbose: bool,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  Report {
    /// JSON result set to report on.
    #[arg(long)]
    results: PathBuf,
    /// TOML naming policy mapping configuration names to roles.
    #[arg(long)]
    policy: Option<PathBuf>,
    /// Only report on these benchmarks.
    #[arg(short, long = "benchmark")]
    benchmarks: Vec<String>,
    /// Directory the chart, tables and tripwires are written to.
    #[arg(long, default_value = "./report")]
    out_dir: PathBuf,
  },
}

fn init_logging(verbose: bool) {
  let default = if verbose { "speed_report=debug" } else { "speed_report=info" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_policy(path: Option<PathBuf>) -> Result<SubstringPolicy> {
  let Some(path) = path else {
    return Ok(SubstringPolicy::default());
  };

  let source = fs::read_to_string(&path).with_context(|| format!("read {path:?}"))?;
  SubstringPolicy::from_toml_str(&source).with_context(|| format!("parse {path:?}"))
}

fn main() -> Result<()> {
  let args = Args::parse();
  init_logging(args.verbose);

  match args.command {
    Command::Report {
      results,
      policy,
      benchmarks,
      out_dir,
    } => {
      if !results.exists() {
        anyhow::bail!("{results:?} does not exist");
      }

      let policy = load_policy(policy).context("policy")?;
      let source = fs::read_to_string(&results).with_context(|| format!("read {results:?}"))?;
      let results = InMemoryResults::from_json_str(&source).context("parse results")?;

      let allow_list = (!benchmarks.is_empty()).then_some(benchmarks.as_slice());
      let report = Report::build(&results, &policy, allow_list).context("build report")?;

      output::write_all(&out_dir, &report).context("write report")?;
      println!("{}", report.table().context("format")?);
    }
  }

  Ok(())
}
