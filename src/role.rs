use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReportError, Result};

/// The part a configuration plays in a report. The derived ordering is the
/// display order: baseline first, then the optimized configurations, then the
/// optional extra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
  Baseline,
  OptimizedPrimary,
  OptimizedSecondary,
  OptionalExtra,
}

impl Role {
  pub const ALL: [Role; 4] = [
    Role::Baseline,
    Role::OptimizedPrimary,
    Role::OptimizedSecondary,
    Role::OptionalExtra,
  ];

  pub fn is_optional(self) -> bool {
    matches!(self, Role::OptionalExtra)
  }

  pub fn is_baseline(self) -> bool {
    matches!(self, Role::Baseline)
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Role::Baseline => write!(f, "baseline"),
      Role::OptimizedPrimary => write!(f, "optimized-primary"),
      Role::OptimizedSecondary => write!(f, "optimized-secondary"),
      Role::OptionalExtra => write!(f, "optional-extra"),
    }
  }
}

/// Decides which configuration names belong to which role.
pub trait NamingPolicy {
  /// Whether `config` plays `role`.
  fn matches(&self, role: Role, config: &str) -> bool;

  /// Human-readable description of the rule for `role`, used in errors.
  fn describe(&self, role: Role) -> String;

  /// Legend and table label for `role`.
  fn label(&self, role: Role) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RolePattern {
  /// Substring a configuration name must contain.
  pub pattern: String,
  /// Display label.
  pub label: String,
}

impl RolePattern {
  fn new(pattern: &str, label: &str) -> Self {
    Self {
      pattern: pattern.to_string(),
      label: label.to_string(),
    }
  }
}

/// Substring matching against free-form configuration names, loadable from a
/// TOML file with one table per role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubstringPolicy {
  pub baseline: RolePattern,
  pub optimized_primary: RolePattern,
  pub optimized_secondary: RolePattern,
  pub optional_extra: RolePattern,
}

impl Default for SubstringPolicy {
  fn default() -> Self {
    Self {
      baseline: RolePattern::new("prod_ruby_no_jit", "No JIT"),
      optimized_primary: RolePattern::new("prod_ruby_with_yjit", "YJIT"),
      optimized_secondary: RolePattern::new("prod_ruby_with_mjit", "MJIT"),
      optional_extra: RolePattern::new("truffleruby", "TruffleRuby"),
    }
  }
}

impl SubstringPolicy {
  pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(source)
  }

  pub fn role(&self, role: Role) -> &RolePattern {
    match role {
      Role::Baseline => &self.baseline,
      Role::OptimizedPrimary => &self.optimized_primary,
      Role::OptimizedSecondary => &self.optimized_secondary,
      Role::OptionalExtra => &self.optional_extra,
    }
  }
}

impl NamingPolicy for SubstringPolicy {
  fn matches(&self, role: Role, config: &str) -> bool {
    config.contains(self.role(role).pattern.as_str())
  }

  fn describe(&self, role: Role) -> String {
    self.role(role).pattern.clone()
  }

  fn label(&self, role: Role) -> String {
    self.role(role).label.clone()
  }
}

/// Finds the single configuration playing `role`. Returns `Ok(None)` only for
/// an optional role with no match.
pub fn resolve<'a, I, P>(config_names: I, policy: &P, role: Role) -> Result<Option<String>>
where
  I: IntoIterator<Item = &'a str>,
  P: NamingPolicy + ?Sized,
{
  let mut matches = config_names
    .into_iter()
    .filter(|name| policy.matches(role, name))
    .map(str::to_string)
    .collect::<Vec<_>>();

  match matches.len() {
    0 if role.is_optional() => Ok(None),
    0 => Err(ReportError::MissingConfig {
      role,
      pattern: policy.describe(role),
    }),
    1 => Ok(matches.pop()),
    _ => {
      matches.sort();
      Err(ReportError::AmbiguousConfig {
        role,
        pattern: policy.describe(role),
        matches,
      })
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
  pub role: Role,
  pub name: String,
  pub label: String,
}

/// One configuration per role. A baseline and an optimized-primary
/// configuration are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfigs {
  configs: BTreeMap<Role, Config>,
}

impl ResolvedConfigs {
  /// Resolves every role against `config_names`. The secondary optimized role
  /// is required here, like baseline and primary.
  pub fn resolve<P: NamingPolicy + ?Sized>(config_names: &[&str], policy: &P) -> Result<Self> {
    let mut configs = BTreeMap::new();

    for role in Role::ALL {
      let Some(name) = resolve(config_names.iter().copied(), policy, role)? else {
        debug!(%role, "no configuration for optional role");
        continue;
      };

      debug!(%role, config = %name, "resolved configuration");
      configs.insert(
        role,
        Config {
          role,
          name,
          label: policy.label(role),
        },
      );
    }

    Ok(Self { configs })
  }

  /// Builds a resolution directly from names, labelled by role.
  pub fn new(baseline: impl Into<String>, primary: impl Into<String>) -> Self {
    let resolved = Self {
      configs: BTreeMap::new(),
    };

    resolved.with(Role::Baseline, baseline).with(Role::OptimizedPrimary, primary)
  }

  pub fn with(mut self, role: Role, name: impl Into<String>) -> Self {
    self.configs.insert(
      role,
      Config {
        role,
        name: name.into(),
        label: role.to_string(),
      },
    );

    self
  }

  /// Replaces the label of `role`, if it is resolved.
  pub fn labelled(mut self, role: Role, label: impl Into<String>) -> Self {
    if let Some(config) = self.configs.get_mut(&role) {
      config.label = label.into();
    }

    self
  }

  pub fn get(&self, role: Role) -> Option<&Config> {
    self.configs.get(&role)
  }

  pub fn baseline(&self) -> &Config {
    &self.configs[&Role::Baseline]
  }

  pub fn primary(&self) -> &Config {
    &self.configs[&Role::OptimizedPrimary]
  }

  /// Configurations in display order.
  pub fn iter(&self) -> impl Iterator<Item = &Config> {
    self.configs.values()
  }

  /// Every configuration but the baseline, in display order.
  pub fn non_baseline(&self) -> impl Iterator<Item = &Config> {
    self.iter().filter(|config| !config.role.is_baseline())
  }

  pub fn len(&self) -> usize {
    self.configs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.configs.is_empty()
  }
}
