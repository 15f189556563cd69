#![forbid(unsafe_code)]
use chrono::NaiveDate;
use duty_roster::{
    detect_violations, enumerate, Assignment, Facility, RosterModel, SearchOptions, Termination,
};
use proptest::prelude::*;
use std::collections::HashSet;

/// Configurations aléatoires dont la somme des charges vaut toujours D : les charges
/// sont comptées sur un tirage jour → établissement.
fn arb_model() -> impl Strategy<Value = RosterModel> {
    (4usize..=12, 2usize..=4, 1usize..=4).prop_flat_map(|(days, facilities, spacing)| {
        (
            prop::collection::vec(0..facilities, days),
            prop::collection::vec(prop::collection::vec(prop::bool::weighted(0.15), days), facilities),
        )
            .prop_map(move |(draw, excluded)| {
                let list = (0..facilities)
                    .map(|f| {
                        let required = draw.iter().filter(|&&d| d == f).count() as u32;
                        let off = excluded[f]
                            .iter()
                            .enumerate()
                            .filter(|&(_, &x)| x)
                            .map(|(day, _)| day);
                        Facility::new(format!("F{f}"), required).excluding(off)
                    })
                    .collect();
                let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
                RosterModel::new(start, days, list, spacing).unwrap()
            })
    })
}

/// Énumération exhaustive naïve, pour comparaison sur de petits modèles.
fn brute_force(model: &RosterModel) -> Vec<Assignment> {
    let days = model.days();
    let facilities = model.facility_count();
    let mut out = Vec::new();
    let mut picks = vec![0usize; days];
    loop {
        let candidate = Assignment::from_indices(picks.clone());
        if detect_violations(model, &candidate).is_empty() {
            out.push(candidate);
        }
        let mut pos = days;
        loop {
            if pos == 0 {
                return out;
            }
            pos -= 1;
            picks[pos] += 1;
            if picks[pos] < facilities {
                break;
            }
            picks[pos] = 0;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_result_satisfies_all_constraints(model in arb_model(), cap in 1usize..30) {
        let set = enumerate(&model, &SearchOptions { max_patterns: cap, ..SearchOptions::default() }).unwrap();
        prop_assert!(set.len() <= cap);
        let distinct: HashSet<&Assignment> = set.solutions.iter().collect();
        prop_assert_eq!(distinct.len(), set.len());
        for a in &set.solutions {
            prop_assert_eq!(a.len(), model.days());
            prop_assert!(detect_violations(&model, a).is_empty());
        }
    }

    #[test]
    fn exhaustive_search_matches_brute_force(model in arb_model()) {
        prop_assume!(model.facility_count().pow(model.days() as u32) <= 50_000);
        let set = enumerate(&model, &SearchOptions { max_patterns: usize::MAX, ..SearchOptions::default() }).unwrap();
        prop_assert_eq!(set.termination, Termination::Exhausted);
        // ordre lexicographique dans les deux cas (ordre d'entrée des établissements)
        prop_assert_eq!(set.solutions, brute_force(&model));
    }

    #[test]
    fn larger_cap_is_a_superset(model in arb_model(), cap in 1usize..8) {
        let small = enumerate(&model, &SearchOptions { max_patterns: cap, ..SearchOptions::default() }).unwrap();
        let large = enumerate(&model, &SearchOptions { max_patterns: cap * 3, ..SearchOptions::default() }).unwrap();
        prop_assert!(large.len() >= small.len());
        prop_assert_eq!(&large.solutions[..small.len()], &small.solutions[..]);
    }
}
