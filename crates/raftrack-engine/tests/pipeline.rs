//! End-to-end pipeline tests over in-memory tables

use pretty_assertions::assert_eq;
use raftrack_core::{columns, PhaseSelection, RuleSet, SummaryColumn, SummaryRow, Table, Value};
use raftrack_engine::{
    calculate_charge_jh, calculate_monthly_raf, calculate_raf, RafJob, ResourceSummaryJob,
    SummaryOptions,
};

// =============================================================================
// Fixtures
// =============================================================================

fn consumption() -> Table {
    let mut table = Table::new([columns::RESSOURCE, columns::PROJET, columns::SOUMISE_H, "Note"]);
    for (resource, project, hours) in [
        ("Alice", "Portail RH", Value::from(8.0)),
        ("Bob", "Intranet", Value::from(16.0)),
        ("Alice", "Portail RH", Value::from("4")),
        ("Alice", "Migration ERP", Value::from(24.0)),
        ("Bob", "Migration ERP", Value::Empty),
        ("Carol", "Archivage", Value::from(8.0)),
    ] {
        table.push_row(vec![Value::from(resource), Value::from(project), hours]);
    }
    table
}

fn deployments() -> Table {
    Table::from_columns(vec![
        (
            columns::NOM,
            vec![
                Value::from("Portail RH"),
                Value::from("Intranet"),
                Value::from("Migration ERP"),
                Value::from("Archivage"),
                Value::from("Portail RH"),
            ],
        ),
        (
            columns::NIVEAU_CONNEXION,
            vec![
                Value::from("Niveau 1"),
                Value::from("Niveau 2"),
                Value::from("Niveau 3"),
                Value::from("Niveau 1"),
                Value::from("Niveau 1"),
            ],
        ),
        (
            columns::PHASE_PROJET,
            vec![
                Value::from("Développement"),
                Value::from("Recette interne"),
                Value::from("Terminé (VSR signée)"),
                Value::from("En production (VSR)"),
                Value::from("Développement"),
            ],
        ),
        (
            columns::MONTANT,
            vec![
                Value::from(6500.0),
                Value::from(1300.0),
                Value::from(13000.0),
                Value::from(2600.0),
                Value::from(6500.0),
            ],
        ),
        (
            columns::CA,
            vec![
                Value::from(1000.0),
                Value::from(200.0),
                Value::from(5000.0),
                Value::Empty,
                Value::from(500.0),
            ],
        ),
        (
            columns::DATE_MEP,
            vec![
                Value::from("2023-01-16"),
                Value::from("2023-01-18"),
                Value::from("15/02/2023"),
                Value::from("2023-02-20"),
                Value::Empty,
            ],
        ),
    ])
}

fn rules() -> RuleSet {
    RuleSet::from_toml_str(
        r#"
        high_ca_threshold = 3000.0

        [raf."Niveau 1"]
        "Développement" = 5.0
        "En production (VSR)" = 0.0

        [raf."Niveau 2"]
        "Recette interne" = 3.0

        [raf."Niveau 3"]
        "Terminé (VSR signée)" = -1.0

        [workload]
        daily_rate = 650.0

        [workload.phase_progress]
        "Développement" = 0.5
        "Recette interne" = 0.8
        "Terminé (VSR signée)" = 1.0
        "En production (VSR)" = 1.0

        [workload.connection_factor]
        "Niveau 2" = 1.5
        "#,
    )
    .unwrap()
}

// =============================================================================
// Charge JH
// =============================================================================

#[test]
fn charge_is_hours_over_eight() {
    let table = calculate_charge_jh(&consumption());
    let charges: Vec<_> = table
        .column(columns::CHARGE_JH)
        .unwrap()
        .map(Value::as_f64)
        .collect();
    assert_eq!(
        charges,
        vec![Some(1.0), Some(2.0), Some(0.5), Some(3.0), None, Some(1.0)]
    );
}

// =============================================================================
// Resource summary
// =============================================================================

#[test]
fn summary_with_all_phases() {
    let job = ResourceSummaryJob::new(
        rules().workload,
        SummaryOptions {
            phases: PhaseSelection::All,
            ..SummaryOptions::default()
        },
    );
    let summary = job.run(&consumption(), &deployments()).unwrap();

    let outline: Vec<String> = summary
        .rows
        .iter()
        .map(|row| match row {
            SummaryRow::Resource(r) => format!("{} = {}", r.resource, r.aggregate),
            SummaryRow::Project(p) => format!("    {}", p.project),
        })
        .collect();
    assert_eq!(
        outline,
        vec![
            "Alice = 4.5",
            "    Migration ERP",
            "    Portail RH",
            "Bob = 2",
            "    Intranet",
            "    Migration ERP",
            "Carol = 1",
            "    Archivage",
        ]
    );

    let portail = summary
        .projects()
        .find(|p| p.project == "Portail RH")
        .unwrap();
    assert_eq!(portail.workload, Some(1.5));
    // 6500 / 650 * 0.5
    assert_eq!(portail.theoretical, Some(5.0));
    assert_eq!(portail.ecart, Some(-3.5));
    // CA is summed over duplicate deployment rows
    assert_eq!(portail.ca, Some(1500.0));

    let bob_erp = summary
        .projects()
        .find(|p| p.resource == "Bob" && p.project == "Migration ERP")
        .unwrap();
    assert_eq!(bob_erp.workload, None);
    assert_eq!(bob_erp.ecart, None);
}

#[test]
fn default_phase_selection_filters_closed_projects() {
    let job = ResourceSummaryJob::new(rules().workload, SummaryOptions::default());
    let summary = job.run(&consumption(), &deployments()).unwrap();

    let projects: Vec<_> = summary
        .projects()
        .map(|p| (p.resource.as_str(), p.project.as_str()))
        .collect();
    assert_eq!(projects, vec![("Alice", "Portail RH"), ("Bob", "Intranet")]);

    // Carol's only project is "En production (VSR)" but her total was non-zero
    let aggregates: Vec<_> = summary
        .resources()
        .map(|r| (r.resource.as_str(), r.aggregate))
        .collect();
    assert_eq!(aggregates, vec![("Alice", 1.5), ("Bob", 2.0), ("Carol", 0.0)]);

    let expected_total: f64 = summary.projects().filter_map(|p| p.ecart).sum();
    assert_eq!(summary.total_ecart, expected_total);
    assert_eq!(summary.cell(0, SummaryColumn::TotalEcart), Value::from(expected_total));
}

#[test]
fn high_ca_keeps_large_contracts() {
    let job = ResourceSummaryJob::new(
        rules().workload,
        SummaryOptions {
            phases: PhaseSelection::All,
            ..SummaryOptions::default()
        },
    );
    let summary = job.run(&consumption(), &deployments()).unwrap();
    let high = summary.high_ca(rules().high_ca_threshold);

    let projects: Vec<_> = high
        .projects()
        .map(|p| (p.resource.as_str(), p.project.as_str()))
        .collect();
    assert_eq!(
        projects,
        vec![
            ("Alice", "Migration ERP"),
            ("Alice", "Portail RH"),
            ("Bob", "Migration ERP"),
        ]
    );
    assert_eq!(high.resources().count(), 2);
}

// =============================================================================
// RAF
// =============================================================================

#[test]
fn raf_column_follows_rules() {
    let table = calculate_raf(&deployments(), &rules().raf);
    let raf: Vec<_> = table
        .column(columns::RAF)
        .unwrap()
        .map(Value::as_f64)
        .collect();
    assert_eq!(raf, vec![Some(5.0), Some(3.0), Some(-1.0), Some(0.0), Some(5.0)]);
}

#[test]
fn raf_job_builds_calendar() {
    let report = RafJob::new(rules().raf).run(&deployments()).unwrap();

    let monthly: Vec<_> = report
        .monthly
        .iter()
        .map(|m| (m.year, m.month, m.month_name.as_str(), m.total_raf))
        .collect();
    // The fifth row has no MEP date; February's zero-RAF week is hidden
    assert_eq!(
        monthly,
        vec![(2023, 1, "January", 8.0), (2023, 2, "February", -1.0)]
    );

    let february = &report.calendar.years[0].months[1];
    let labels: Vec<_> = february.weeks.iter().map(|w| w.label()).collect();
    assert_eq!(labels, vec!["Week 7 (15)"]);

    let january = &report.calendar.years[0].months[0];
    assert_eq!(january.weeks[0].label(), "Week 3 (16 to 18)");
}

#[test]
fn monthly_raf_round_trip() {
    let table = calculate_raf(&deployments(), &rules().raf);
    let monthly_total: f64 = calculate_monthly_raf(&table)
        .iter()
        .map(|m| m.total_raf)
        .sum();
    let dated_total: f64 = (0..table.len())
        .filter(|&row| table.get(row, columns::DATE_MEP).as_date().is_some())
        .filter_map(|row| table.get(row, columns::RAF).as_f64())
        .sum();
    assert_eq!(monthly_total, dated_total);
}
