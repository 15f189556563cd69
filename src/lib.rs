#![forbid(unsafe_code)]
//! Duty roster — énumération de tableaux de garde mensuels (un établissement par jour).
//!
//! - Modèle de contraintes immuable : couverture, jours exclus, charge exacte, espacement.
//! - Recherche en profondeur paresseuse, plafond de solutions et échéance.
//! - Encodage daté des rosters ; export CSV/JSON en dehors du cœur.

#[cfg(feature = "serde")]
pub mod config;
pub mod encode;
#[cfg(feature = "serde")]
pub mod io;
pub mod model;
pub mod scheduler;

#[cfg(feature = "serde")]
pub use config::{export_config_json, load_config_from_file, FacilitySpec, RosterConfig};
pub use encode::{
    encode_assignment, encode_solutions, mark_holidays, NamedRoster, RosterBundle, RosterEntry,
};
pub use model::{Assignment, Facility, RosterModel, DEFAULT_SPACING};
pub use scheduler::{
    detect_violations, enumerate, is_valid, solutions, ConfigError, SearchOptions, SolutionSet,
    Solutions, Termination, Violation, ViolationKind,
};
