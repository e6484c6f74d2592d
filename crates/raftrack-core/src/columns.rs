//! Header names of the consumption and deployment exports.
//!
//! Headers are matched by exact string.

/// Consultant name in the consumption export
pub const RESSOURCE: &str = "Ressource";
/// English spelling sometimes found in older exports, renamed to [`RESSOURCE`]
pub const RESOURCE_FALLBACK: &str = "Resource";
/// Project name in the consumption export
pub const PROJET: &str = "Projet";
/// Submitted hours
pub const SOUMISE_H: &str = "Soumise (h)";
/// Derived workload in person-days
pub const CHARGE_JH: &str = "Charge JH";

/// Project name in the deployments export (lookup key)
pub const NOM: &str = "Nom";
pub const NIVEAU_CONNEXION: &str = "Niveau de connexion";
pub const PHASE_PROJET: &str = "Phase du projet";
pub const DATE_MEP: &str = "Date de MEP";
pub const MONTANT: &str = "Montant total (Contrat) (Commande)";
pub const CA: &str = "CA";
pub const DERNIERE_NOTE: &str = "Dernière Note";
pub const DATE_AFFECTATION: &str = "Date d'affectation";
/// Derived remaining-work value
pub const RAF: &str = "RAF";

/// Columns the consumption export must carry
pub const CONSUMPTION_REQUIRED: [&str; 3] = [RESSOURCE, PROJET, SOUMISE_H];

/// Columns the deployments export must carry for the RAF report
pub const RAF_REQUIRED: [&str; 3] = [NIVEAU_CONNEXION, PHASE_PROJET, DATE_MEP];
