use crate::model::{Assignment, RosterModel};
use crate::scheduler::SolutionSet;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;
#[cfg(feature = "serde")]
use serde::Serialize;

/// Une ligne du roster publié : date civile → établissement de garde.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RosterEntry {
    pub date: NaiveDate,
    pub facility: String,
    /// Jour férié fourni par l'appelant (voir [`mark_holidays`]).
    pub holiday: bool,
}

impl RosterEntry {
    /// Libellé `YYYY-MM-DD`.
    pub fn label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Libellé d'affichage `MM/DD(Wed)`, ou `MM/DD(Hol)` un jour férié.
    pub fn display_label(&self) -> String {
        if self.holiday {
            self.date.format("%m/%d(Hol)").to_string()
        } else {
            self.date.format("%m/%d(%a)").to_string()
        }
    }
}

/// Roster nommé, prêt à être sérialisé par l'appelant.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NamedRoster {
    pub name: String,
    pub pattern: usize,
    pub entries: Vec<RosterEntry>,
}

/// Ensemble des rosters d'une même invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RosterBundle {
    pub name: String,
    pub termination: String,
    pub rosters: Vec<NamedRoster>,
}

impl RosterBundle {
    pub fn len(&self) -> usize {
        self.rosters.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rosters.is_empty()
    }
}

/// `roster_YYYY_MM_patternN` (N à partir de 1).
pub fn artifact_name(model: &RosterModel, pattern: usize) -> String {
    let start = model.start();
    format!(
        "roster_{}_{:02}_pattern{}",
        start.year(),
        start.month(),
        pattern
    )
}

pub fn bundle_name(model: &RosterModel) -> String {
    let start = model.start();
    format!("rosters_{}_{:02}", start.year(), start.month())
}

/// Convertit une affectation en roster daté, dans l'ordre calendaire.
///
/// Les jours hors période ou les index inconnus sont ignorés ; une affectation issue
/// de la recherche n'en contient jamais.
pub fn encode_assignment(model: &RosterModel, assignment: &Assignment, pattern: usize) -> NamedRoster {
    let entries = assignment
        .iter()
        .filter_map(|(day, facility)| {
            Some(RosterEntry {
                date: model.date_of(day)?,
                facility: model.facility_name(facility)?.to_string(),
                holiday: false,
            })
        })
        .collect();
    NamedRoster {
        name: artifact_name(model, pattern),
        pattern,
        entries,
    }
}

pub fn encode_solutions(model: &RosterModel, set: &SolutionSet) -> RosterBundle {
    RosterBundle {
        name: bundle_name(model),
        termination: set.termination.as_str().to_string(),
        rosters: set
            .solutions
            .iter()
            .enumerate()
            .map(|(idx, assignment)| encode_assignment(model, assignment, idx + 1))
            .collect(),
    }
}

/// Marque les jours fériés de `holidays` dans chaque roster du bundle.
///
/// Aucun calendrier n'est embarqué : la liste vient de la configuration.
pub fn mark_holidays(bundle: &mut RosterBundle, holidays: &BTreeSet<NaiveDate>) {
    for entry in bundle.rosters.iter_mut().flat_map(|r| r.entries.iter_mut()) {
        entry.holiday = holidays.contains(&entry.date);
    }
}
