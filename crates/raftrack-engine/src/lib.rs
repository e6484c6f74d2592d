//! # raftrack-engine
//!
//! Workload and RAF computations over exported tables.
//!
//! This crate provides:
//! - Column validation and project lookups
//! - Charge JH (hours / 8) and the (resource, project) pivot
//! - The resource summary with theoretical workload, Ecart and phase filter
//! - RAF per deployment and its monthly/weekly breakdown
//! - `ResourceSummaryJob` and `RafJob`, which chain the steps above
//!
//! ## Example
//!
//! ```rust
//! use raftrack_core::{columns, RafRules, Table, Value};
//! use raftrack_engine::RafJob;
//!
//! let mut rules = RafRules::default();
//! rules.insert("Niveau 1", "Développement", 5.0);
//!
//! let deployments = Table::from_columns(vec![
//!     (columns::NIVEAU_CONNEXION, vec![Value::from("Niveau 1")]),
//!     (columns::PHASE_PROJET, vec![Value::from("Développement")]),
//!     (columns::DATE_MEP, vec![Value::from("2023-01-01")]),
//! ]);
//!
//! let report = RafJob::new(rules).run(&deployments)?;
//! assert_eq!(report.raf_values(), vec![Some(5.0)]);
//! assert_eq!(report.monthly[0].month_name, "January");
//! # Ok::<(), raftrack_engine::JobError>(())
//! ```

pub mod charge;
pub mod job;
pub mod lookup;
pub mod periods;
pub mod pivot;
pub mod raf;
pub mod summary;
pub mod validate;

pub use charge::{calculate_charge_jh, charge_jh};
pub use job::{JobError, RafJob, RafReport, ResourceSummaryJob};
pub use lookup::{build_lookup, build_sum_lookup, SummaryLookups};
pub use periods::{calculate_monthly_raf, raf_calendar};
pub use pivot::{pivot_workload, PivotEntry};
pub use raf::{calculate_raf, raf_for};
pub use summary::{format_resource_summary, SummaryOptions};
pub use validate::{validate_columns, Validation};
