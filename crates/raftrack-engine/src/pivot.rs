//! Workload pivot by (resource, project)

use std::collections::BTreeMap;

use raftrack_core::Table;
use serde::Serialize;

/// Summed workload of one (resource, project) pair
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PivotEntry {
    pub resource: String,
    pub project: String,
    /// `None` when no row of the group carried a numeric value
    pub workload: Option<f64>,
}

/// Group rows by (resource, project) and sum `value_col`.
///
/// Entries come out sorted by resource then project. Rows with a blank
/// resource or project are not part of any group; non-numeric values are
/// skipped.
pub fn pivot_workload(
    table: &Table,
    resource_col: &str,
    project_col: &str,
    value_col: &str,
) -> Vec<PivotEntry> {
    let mut groups: BTreeMap<(String, String), Option<f64>> = BTreeMap::new();

    for row in 0..table.len() {
        let (Some(resource), Some(project)) = (
            table.get(row, resource_col).as_text(),
            table.get(row, project_col).as_text(),
        ) else {
            continue;
        };

        let slot = groups.entry((resource, project)).or_insert(None);
        if let Some(value) = table.get(row, value_col).as_f64() {
            *slot = Some(slot.unwrap_or(0.0) + value);
        }
    }

    groups
        .into_iter()
        .map(|((resource, project), workload)| PivotEntry {
            resource,
            project,
            workload,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use raftrack_core::{columns, Value};

    fn consumption(rows: &[(&str, &str, Option<f64>)]) -> Table {
        let mut table = Table::new([columns::RESSOURCE, columns::PROJET, columns::CHARGE_JH]);
        for (resource, project, charge) in rows {
            table.push_row(vec![
                Value::from(*resource),
                Value::from(*project),
                (*charge).into(),
            ]);
        }
        table
    }

    fn pivot(table: &Table) -> Vec<PivotEntry> {
        pivot_workload(table, columns::RESSOURCE, columns::PROJET, columns::CHARGE_JH)
    }

    fn entry(resource: &str, project: &str, workload: Option<f64>) -> PivotEntry {
        PivotEntry {
            resource: resource.into(),
            project: project.into(),
            workload,
        }
    }

    #[test]
    fn groups_and_sums() {
        let table = consumption(&[
            ("Bob", "P2", Some(1.0)),
            ("Alice", "P1", Some(0.5)),
            ("Bob", "P2", Some(2.0)),
            ("Alice", "P1", Some(1.5)),
            ("Alice", "P3", Some(1.0)),
        ]);
        assert_eq!(
            pivot(&table),
            vec![
                entry("Alice", "P1", Some(2.0)),
                entry("Alice", "P3", Some(1.0)),
                entry("Bob", "P2", Some(3.0)),
            ]
        );
    }

    #[test]
    fn sum_is_conserved() {
        let table = consumption(&[
            ("A", "X", Some(1.25)),
            ("B", "X", None),
            ("A", "Y", Some(3.0)),
            ("A", "X", Some(0.75)),
            ("C", "Z", Some(-1.0)),
        ]);
        let input: f64 = table
            .column(columns::CHARGE_JH)
            .unwrap()
            .filter_map(Value::as_f64)
            .sum();
        let output: f64 = pivot(&table).iter().filter_map(|e| e.workload).sum();
        assert_eq!(input, output);
    }

    #[test]
    fn each_pair_appears_once() {
        let table = consumption(&[
            ("A", "X", Some(1.0)),
            ("A", "X", Some(1.0)),
            ("A", "Y", Some(1.0)),
            ("B", "X", Some(1.0)),
        ]);
        let entries = pivot(&table);
        let mut keys: Vec<_> = entries
            .iter()
            .map(|e| (e.resource.clone(), e.project.clone()))
            .collect();
        keys.dedup();
        assert_eq!(keys.len(), entries.len());
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn null_only_group_has_null_workload() {
        let table = consumption(&[("A", "X", None), ("A", "X", None)]);
        assert_eq!(pivot(&table), vec![entry("A", "X", None)]);
    }

    #[test]
    fn blank_keys_are_skipped() {
        let table = consumption(&[("", "X", Some(1.0)), ("A", "  ", Some(1.0))]);
        assert!(pivot(&table).is_empty());
    }
}
