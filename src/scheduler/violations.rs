use super::{Violation, ViolationKind};
use crate::model::{Assignment, RosterModel};

/// Revérifie un roster complet contre toutes les familles de contraintes, sans raccourci.
pub(super) fn detect_violations(model: &RosterModel, assignment: &Assignment) -> Vec<Violation> {
    let mut out = Vec::new();
    let facilities = model.facility_count();

    // couverture : chaque jour du modèle porte exactement un établissement connu
    for day in 0..model.days().max(assignment.len()) {
        let known = day < model.days()
            && assignment
                .facility_on(day)
                .is_some_and(|facility| facility < facilities);
        if !known {
            out.push(Violation {
                kind: ViolationKind::Coverage,
                facility: assignment.facility_on(day).filter(|&f| f < facilities),
                day: Some(day),
                other_day: None,
            });
        }
    }

    for facility in 0..facilities {
        let days: Vec<usize> = assignment
            .iter()
            .filter(|&(day, f)| f == facility && day < model.days())
            .map(|(day, _)| day)
            .collect();

        for &day in &days {
            if !model.is_allowed(day, facility) {
                out.push(Violation {
                    kind: ViolationKind::Excluded,
                    facility: Some(facility),
                    day: Some(day),
                    other_day: None,
                });
            }
        }

        if days.len() as u32 != model.required(facility) {
            out.push(Violation {
                kind: ViolationKind::Load,
                facility: Some(facility),
                day: None,
                other_day: None,
            });
        }

        for pair in days.windows(2) {
            if let [a, b] = pair {
                if b - a < model.spacing() {
                    out.push(Violation {
                        kind: ViolationKind::Spacing,
                        facility: Some(facility),
                        day: Some(*a),
                        other_day: Some(*b),
                    });
                }
            }
        }
    }

    out
}
