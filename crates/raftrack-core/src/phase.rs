//! Project phases and phase selection

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Every phase the deployments export uses
pub const KNOWN_PHASES: [&str; 11] = [
    "Cadrage / spécification",
    "Développement",
    "En production (VSR)",
    "Non démarré (autre lot)",
    "Non démarré (nouveau projet)",
    "Pré-production",
    "Projet arrêté définitivement",
    "Projet en pause",
    "Recette interne",
    "Recette utilisateur",
    "Terminé (VSR signée)",
];

/// Phases counted unless the caller says otherwise.
///
/// Delivered, stopped and signed-off projects are left out.
pub const DEFAULT_SELECTED_PHASES: [&str; 8] = [
    "Cadrage / spécification",
    "Développement",
    "Non démarré (autre lot)",
    "Non démarré (nouveau projet)",
    "Pré-production",
    "Projet en pause",
    "Recette interne",
    "Recette utilisateur",
];

/// Which project phases survive the resource-summary filter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseSelection {
    /// No filtering
    All,
    /// Only projects whose phase is in the set; projects without a phase are dropped
    Only(BTreeSet<String>),
}

impl PhaseSelection {
    pub fn only<S: Into<String>>(phases: impl IntoIterator<Item = S>) -> Self {
        PhaseSelection::Only(phases.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, phase: Option<&str>) -> bool {
        match self {
            PhaseSelection::All => true,
            PhaseSelection::Only(set) => phase.is_some_and(|p| set.contains(p)),
        }
    }
}

impl Default for PhaseSelection {
    fn default() -> Self {
        PhaseSelection::only(DEFAULT_SELECTED_PHASES)
    }
}
