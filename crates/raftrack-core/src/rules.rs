//! Rule tables
//!
//! RAF and theoretical workload are driven by static tables rather than code.
//! Both are plain data so tests can inject synthetic rule sets.
//!
//! # Example
//!
//! ```rust
//! use raftrack_core::rules::{RafRules, RuleSet};
//!
//! let mut raf = RafRules::default();
//! raf.insert("A", "B", 5.0);
//! assert_eq!(raf.get("A", "B"), Some(5.0));
//! assert_eq!(raf.get("A", "C"), None);
//!
//! let rules = RuleSet::from_toml_str(r#"
//!     [raf.A]
//!     B = 5.0
//!
//!     [workload]
//!     daily_rate = 500.0
//!     phase_progress = { B = 0.5 }
//! "#).unwrap();
//! assert_eq!(rules.workload.theoretical(Some(1000.0), Some("B"), None), Some(1.0));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::RulesError;

const DEFAULT_RULES: &str = include_str!("../rules/default_rules.toml");

fn default_high_ca_threshold() -> f64 {
    3000.0
}

/// RAF per (connection level, phase)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RafRules(BTreeMap<String, BTreeMap<String, f64>>);

impl RafRules {
    pub fn get(&self, connection_level: &str, phase: &str) -> Option<f64> {
        self.0.get(connection_level)?.get(phase).copied()
    }

    pub fn insert(&mut self, connection_level: impl Into<String>, phase: impl Into<String>, raf: f64) {
        self.0
            .entry(connection_level.into())
            .or_default()
            .insert(phase.into(), raf);
    }

    pub fn connection_levels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }
}

/// Coefficients for the theoretical workload of a project
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkloadRules {
    /// Contract amount billed per person-day
    pub daily_rate: f64,
    /// Expected share of the contract consumed at each phase
    #[serde(default)]
    pub phase_progress: BTreeMap<String, f64>,
    /// Multiplier per connection level (1.0 when absent)
    #[serde(default)]
    pub connection_factor: BTreeMap<String, f64>,
}

impl WorkloadRules {
    /// Theoretical workload in person-days.
    ///
    /// `None` when the amount is missing, the phase has no coefficient or the
    /// daily rate is not positive.
    pub fn theoretical(
        &self,
        amount: Option<f64>,
        phase: Option<&str>,
        connection_level: Option<&str>,
    ) -> Option<f64> {
        if self.daily_rate <= 0.0 {
            return None;
        }
        let amount = amount?;
        let progress = self.phase_progress.get(phase?)?;
        let factor = connection_level
            .and_then(|level| self.connection_factor.get(level))
            .copied()
            .unwrap_or(1.0);
        Some(amount / self.daily_rate * progress * factor)
    }
}

impl Default for WorkloadRules {
    fn default() -> Self {
        Self {
            daily_rate: 1.0,
            phase_progress: BTreeMap::new(),
            connection_factor: BTreeMap::new(),
        }
    }
}

/// Every externally configured rule the pipeline needs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Contract amount above which a project is listed on the "High CA" sheet
    #[serde(default = "default_high_ca_threshold")]
    pub high_ca_threshold: f64,
    #[serde(default)]
    pub raf: RafRules,
    #[serde(default)]
    pub workload: WorkloadRules,
}

impl RuleSet {
    pub fn from_toml_str(input: &str) -> Result<Self, RulesError> {
        Ok(toml::from_str(input)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, RulesError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, RulesError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_RULES).expect("embedded default rules are valid TOML")
    }
}
