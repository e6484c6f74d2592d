//! Project-name lookups built from the deployments export
//!
//! Two modes exist because they feed different output columns:
//! [`build_lookup`] keeps the last value seen for a key, [`build_sum_lookup`]
//! adds every numeric value sharing the key.

use std::collections::HashMap;

use chrono::NaiveDate;
use raftrack_core::{columns, Table, Value};

/// Key → last value seen for that key.
///
/// Rows with a blank key are skipped. A missing key or value column yields an
/// empty map.
pub fn build_lookup(table: &Table, key: &str, value: &str) -> HashMap<String, Value> {
    let (Some(keys), Some(values)) = (table.column(key), table.column(value)) else {
        return HashMap::new();
    };

    keys.zip(values)
        .filter_map(|(k, v)| Some((k.as_text()?, v.clone())))
        .collect()
}

/// Key → sum of the numeric values sharing that key.
///
/// Non-numeric cells count as zero; a key seen only with blanks maps to 0.
pub fn build_sum_lookup(table: &Table, key: &str, value: &str) -> HashMap<String, f64> {
    let mut sums = HashMap::new();
    let (Some(keys), Some(values)) = (table.column(key), table.column(value)) else {
        return sums;
    };

    for (k, v) in keys.zip(values) {
        if let Some(k) = k.as_text() {
            *sums.entry(k).or_insert(0.0) += v.as_f64().unwrap_or(0.0);
        }
    }
    sums
}

/// Every lookup the resource summary joins on, keyed by project name
#[derive(Clone, Debug, Default)]
pub struct SummaryLookups {
    pub connection_level: HashMap<String, Value>,
    pub phase: HashMap<String, Value>,
    pub amount: HashMap<String, Value>,
    pub ca: HashMap<String, f64>,
    pub last_note: HashMap<String, Value>,
    pub assignment_date: HashMap<String, Value>,
}

impl SummaryLookups {
    /// Build all lookups from the deployments export ("Nom" is the key)
    pub fn from_deployments(deployments: &Table) -> Self {
        Self {
            connection_level: build_lookup(deployments, columns::NOM, columns::NIVEAU_CONNEXION),
            phase: build_lookup(deployments, columns::NOM, columns::PHASE_PROJET),
            amount: build_lookup(deployments, columns::NOM, columns::MONTANT),
            ca: build_sum_lookup(deployments, columns::NOM, columns::CA),
            last_note: build_lookup(deployments, columns::NOM, columns::DERNIERE_NOTE),
            assignment_date: build_lookup(deployments, columns::NOM, columns::DATE_AFFECTATION),
        }
    }

    pub fn connection_level(&self, project: &str) -> Option<String> {
        self.connection_level.get(project).and_then(Value::as_text)
    }

    pub fn phase(&self, project: &str) -> Option<String> {
        self.phase.get(project).and_then(Value::as_text)
    }

    pub fn amount(&self, project: &str) -> Option<f64> {
        self.amount.get(project).and_then(Value::as_f64)
    }

    pub fn ca(&self, project: &str) -> Option<f64> {
        self.ca.get(project).copied()
    }

    pub fn last_note(&self, project: &str) -> Option<String> {
        self.last_note.get(project).and_then(Value::as_text)
    }

    pub fn assignment_date(&self, project: &str) -> Option<NaiveDate> {
        self.assignment_date.get(project).and_then(Value::as_date)
    }
}
