mod search;
mod types;
pub mod util;
mod violations;

pub use search::Solutions;
pub use types::{
    ConfigError, SearchOptions, SolutionSet, Termination, Violation, ViolationKind,
};

use crate::model::{Assignment, RosterModel};
use std::time::Instant;

/// Itérateur paresseux sur les rosters valides, sans échéance ni plafond.
pub fn solutions(model: &RosterModel) -> Solutions<'_> {
    Solutions::new(model)
}

/// Énumère jusqu'à `max_patterns` rosters distincts dans le budget de temps.
///
/// Un ensemble vide n'est pas une erreur : `SolutionSet::termination` indique si l'espace
/// a été épuisé (infaisable prouvé) ou si l'échéance a coupé la recherche.
pub fn enumerate(model: &RosterModel, opts: &SearchOptions) -> Result<SolutionSet, ConfigError> {
    opts.validate()?;
    let started = Instant::now();

    let mut search = Solutions::new(model);
    // budget trop grand pour être représenté : pas d'échéance
    if let Some(deadline) = started.checked_add(opts.time_budget) {
        search = search.with_deadline(deadline);
    }
    if let Some(flag) = &opts.cancel {
        search = search.with_cancel(flag.clone());
    }

    #[cfg(feature = "logging")]
    tracing::debug!(
        days = model.days(),
        facilities = model.facility_count(),
        spacing = model.spacing(),
        max_patterns = opts.max_patterns,
        "starting roster enumeration"
    );

    let mut found: Vec<Assignment> = Vec::new();
    while found.len() < opts.max_patterns {
        let Some(assignment) = search.next() else {
            break;
        };
        #[cfg(feature = "logging")]
        tracing::debug!(pattern = found.len() + 1, nodes = search.nodes(), "roster found");
        found.push(assignment);
    }

    let termination = search.termination().unwrap_or(Termination::CapReached);
    let set = SolutionSet {
        solutions: found,
        termination,
        nodes: search.nodes(),
        elapsed: started.elapsed(),
    };

    #[cfg(feature = "logging")]
    tracing::info!(
        found = set.len(),
        termination = termination.as_str(),
        nodes = set.nodes,
        elapsed_ms = set.elapsed.as_millis() as u64,
        "roster enumeration finished"
    );

    Ok(set)
}

/// Liste les contraintes violées par `assignment` (vide si le roster est valide).
pub fn detect_violations(model: &RosterModel, assignment: &Assignment) -> Vec<Violation> {
    violations::detect_violations(model, assignment)
}

pub fn is_valid(model: &RosterModel, assignment: &Assignment) -> bool {
    detect_violations(model, assignment).is_empty()
}
