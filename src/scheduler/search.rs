use super::Termination;
use crate::model::{Assignment, RosterModel};
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Parcours en profondeur jour par jour, exposé comme un itérateur paresseux.
///
/// Chaque appel à `next` reprend la recherche là où la solution précédente a été émise ;
/// une seule solution est ouverte à la fois. L'échéance et l'annulation sont vérifiées à
/// chaque nœud développé.
#[derive(Debug)]
pub struct Solutions<'m> {
    model: &'m RosterModel,
    deadline: Option<Instant>,
    cancel: Option<Arc<AtomicBool>>,
    // picks[d] : établissement choisi le jour d
    picks: Vec<usize>,
    // cursors[d] : prochain candidat à essayer le jour d
    cursors: Vec<usize>,
    // dernier jour affecté de l'établissement avant picks[d], restauré au retour arrière
    saved_last: Vec<Option<usize>>,
    counts: Vec<u32>,
    last: Vec<Option<usize>>,
    nodes: u64,
    finished: Option<Termination>,
}

impl<'m> Solutions<'m> {
    pub fn new(model: &'m RosterModel) -> Self {
        let facilities = model.facility_count();
        Self {
            model,
            deadline: None,
            cancel: None,
            picks: Vec::with_capacity(model.days()),
            cursors: vec![0],
            saved_last: Vec::with_capacity(model.days()),
            counts: vec![0; facilities],
            last: vec![None; facilities],
            nodes: 0,
            finished: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// `None` tant que la recherche peut encore produire des solutions.
    pub fn termination(&self) -> Option<Termination> {
        self.finished
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn interrupted(&self) -> Option<Termination> {
        if self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return Some(Termination::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Termination::DeadlineExceeded),
            _ => None,
        }
    }

    fn admissible(&self, day: usize, facility: usize) -> bool {
        if self.counts[facility] >= self.model.required(facility) {
            return false;
        }
        self.last[facility].map_or(true, |prev| day - prev >= self.model.spacing())
    }

    fn push(&mut self, day: usize, facility: usize) {
        self.saved_last.push(self.last[facility]);
        self.picks.push(facility);
        self.counts[facility] += 1;
        self.last[facility] = Some(day);
    }

    fn pop(&mut self) -> Option<usize> {
        let facility = self.picks.pop()?;
        self.counts[facility] -= 1;
        self.last[facility] = self.saved_last.pop().flatten();
        Some(facility)
    }

    /// Chaque établissement peut-il encore atteindre sa charge à partir de `next_day`,
    /// compte tenu de ses jours exclus et de l'espacement ?
    fn can_finish(&self, next_day: usize) -> bool {
        let days = self.model.days();
        let spacing = self.model.spacing();
        (0..self.model.facility_count()).all(|f| {
            let need = (self.model.required(f) - self.counts[f]) as usize;
            if need == 0 {
                return true;
            }
            if (self.model.open_days_from(f, next_day) as usize) < need {
                return false;
            }
            let earliest = match self.last[f] {
                None => Some(next_day),
                Some(prev) => prev.checked_add(spacing).map(|d| d.max(next_day)),
            };
            // dépassement : le dernier jour requis tombe forcément hors période
            earliest
                .and_then(|e| e.checked_add((need - 1).checked_mul(spacing)?))
                .is_some_and(|last_needed| last_needed < days)
        })
    }
}

impl Iterator for Solutions<'_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Assignment> {
        if self.finished.is_some() {
            return None;
        }
        let model = self.model;
        let days = model.days();

        loop {
            if let Some(reason) = self.interrupted() {
                self.finished = Some(reason);
                return None;
            }
            self.nodes += 1;

            let day = self.picks.len();
            let candidates = model.candidates(day);
            let mut cursor = self.cursors[day];
            let mut extended = false;
            while cursor < candidates.len() {
                let facility = candidates[cursor];
                cursor += 1;
                if !self.admissible(day, facility) {
                    continue;
                }
                self.push(day, facility);
                if self.can_finish(day + 1) {
                    extended = true;
                    break;
                }
                self.pop();
            }
            self.cursors[day] = cursor;

            if !extended {
                self.cursors.pop();
                if self.pop().is_none() {
                    self.finished = Some(Termination::Exhausted);
                    return None;
                }
                continue;
            }

            if day + 1 == days {
                debug_assert!((0..model.facility_count()).all(|f| self.counts[f] == model.required(f)));
                let found = Assignment::from_indices(self.picks.clone());
                self.pop();
                return Some(found);
            }
            self.cursors.push(0);
        }
    }
}

impl FusedIterator for Solutions<'_> {}
