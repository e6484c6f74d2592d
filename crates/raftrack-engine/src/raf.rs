//! RAF lookup per deployment

use raftrack_core::{columns, RafRules, Table, Value};

/// RAF for one (connection level, phase) pair.
///
/// `None` when either input is falsy or the pair has no rule.
pub fn raf_for(rules: &RafRules, connection_level: &Value, phase: &Value) -> Option<f64> {
    if !connection_level.is_truthy() || !phase.is_truthy() {
        return None;
    }
    rules.get(&connection_level.as_text()?, &phase.as_text()?)
}

/// Copy of `deployments` with a "RAF" column.
///
/// The column is always added, even when the inputs are missing.
pub fn calculate_raf(deployments: &Table, rules: &RafRules) -> Table {
    let values = (0..deployments.len())
        .map(|row| {
            raf_for(
                rules,
                deployments.get(row, columns::NIVEAU_CONNEXION),
                deployments.get(row, columns::PHASE_PROJET),
            )
            .into()
        })
        .collect();
    deployments.with_column(columns::RAF, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rules() -> RafRules {
        let mut rules = RafRules::default();
        rules.insert("A", "B", 5.0);
        rules.insert("A", "C", 0.0);
        rules
    }

    fn raf_column(table: &Table) -> Vec<Value> {
        table.column(columns::RAF).unwrap().cloned().collect()
    }

    #[test]
    fn single_rule_match() {
        let table = Table::from_columns(vec![
            (columns::NIVEAU_CONNEXION, vec![Value::from("A")]),
            (columns::PHASE_PROJET, vec![Value::from("B")]),
        ]);
        let result = calculate_raf(&table, &rules());
        assert_eq!(raf_column(&result), vec![Value::from(5.0)]);
    }

    #[test]
    fn falsy_or_unknown_inputs_are_null() {
        let table = Table::from_columns(vec![
            (
                columns::NIVEAU_CONNEXION,
                vec![
                    Value::Empty,
                    Value::from("A"),
                    Value::from("Z"),
                    Value::from("A"),
                    Value::from(0.0),
                ],
            ),
            (
                columns::PHASE_PROJET,
                vec![
                    Value::from("B"),
                    Value::from(""),
                    Value::from("B"),
                    Value::from("C"),
                    Value::from("B"),
                ],
            ),
        ]);
        let result = calculate_raf(&table, &rules());
        assert_eq!(
            raf_column(&result),
            vec![
                Value::Empty,
                Value::Empty,
                Value::Empty,
                Value::from(0.0),
                Value::Empty
            ]
        );
    }

    #[test]
    fn column_added_without_inputs() {
        let table = Table::from_columns(vec![(columns::NOM, vec![Value::from("P1")])]);
        let result = calculate_raf(&table, &rules());
        assert!(result.has_column(columns::RAF));
        assert_eq!(result.get(0, columns::RAF), &Value::Empty);
        assert!(!table.has_column(columns::RAF));
    }

    #[test]
    fn numeric_levels_match_as_text() {
        let mut rules = RafRules::default();
        rules.insert("2", "B", 7.5);
        assert_eq!(raf_for(&rules, &Value::from(2.0), &Value::from("B")), Some(7.5));
    }
}
