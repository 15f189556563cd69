use crate::scheduler::{util, ConfigError};
use chrono::NaiveDate;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Fenêtre d'espacement par défaut : au plus une garde par établissement sur 4 jours consécutifs.
pub const DEFAULT_SPACING: usize = 4;

/// Établissement tel que consommé par le modèle (jours exclus indexés à 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facility {
    pub name: String,
    pub required: u32,
    pub excluded: BTreeSet<usize>,
}

impl Facility {
    pub fn new<N: Into<String>>(name: N, required: u32) -> Self {
        Self {
            name: name.into(),
            required,
            excluded: BTreeSet::new(),
        }
    }

    pub fn excluding<I: IntoIterator<Item = usize>>(mut self, days: I) -> Self {
        self.excluded.extend(days);
        self
    }
}

/// Modèle de contraintes immuable, construit une fois par invocation.
///
/// - couverture : un établissement par jour ;
/// - exclusion : jamais sur un jour exclu ;
/// - charge exacte : `required` jours par établissement ;
/// - espacement : au plus une garde par établissement dans toute fenêtre de `spacing` jours.
#[derive(Debug, Clone)]
pub struct RosterModel {
    start: NaiveDate,
    days: usize,
    spacing: usize,
    facilities: Vec<Facility>,
    // par jour : établissements autorisés, dans l'ordre d'entrée
    candidates: Vec<Vec<usize>>,
    // par établissement : nombre de jours non exclus dans `d..days`
    open_suffix: Vec<Vec<u32>>,
}

impl RosterModel {
    /// Modèle couvrant le mois civil `year`-`month`.
    pub fn for_month(
        year: i32,
        month: u32,
        facilities: Vec<Facility>,
        spacing: usize,
    ) -> Result<Self, ConfigError> {
        let start = util::month_start(year, month).ok_or(ConfigError::InvalidMonth { year, month })?;
        let days = util::days_in_month(year, month).ok_or(ConfigError::InvalidMonth { year, month })?;
        Self::new(start, days as usize, facilities, spacing)
    }

    /// Valide la configuration et construit le modèle. Échoue avant toute recherche.
    pub fn new(
        start: NaiveDate,
        days: usize,
        facilities: Vec<Facility>,
        spacing: usize,
    ) -> Result<Self, ConfigError> {
        if days == 0 {
            return Err(ConfigError::NoDays);
        }
        if util::nth_day(start, days - 1).is_none() {
            return Err(ConfigError::PeriodOverflow(start));
        }
        if spacing == 0 {
            return Err(ConfigError::InvalidSpacing);
        }
        if facilities.is_empty() {
            return Err(ConfigError::NoFacilities);
        }

        let mut seen = HashSet::new();
        for (idx, facility) in facilities.iter().enumerate() {
            if facility.name.trim().is_empty() {
                return Err(ConfigError::EmptyFacilityName(idx));
            }
            if !seen.insert(facility.name.as_str()) {
                return Err(ConfigError::DuplicateFacility(facility.name.clone()));
            }
            if facility.required as usize > days {
                return Err(ConfigError::RequiredExceedsDays {
                    facility: facility.name.clone(),
                    required: facility.required,
                    days,
                });
            }
            if let Some(&day) = facility.excluded.iter().find(|&&d| d >= days) {
                return Err(ConfigError::ExcludedDayOutOfRange {
                    facility: facility.name.clone(),
                    day: day + 1,
                    days,
                });
            }
        }

        let sum: u64 = facilities.iter().map(|f| u64::from(f.required)).sum();
        if sum != days as u64 {
            return Err(ConfigError::RequiredSumMismatch { sum, days });
        }

        let candidates = (0..days)
            .map(|day| {
                facilities
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| !f.excluded.contains(&day))
                    .map(|(idx, _)| idx)
                    .collect()
            })
            .collect();

        let open_suffix = facilities
            .iter()
            .map(|f| {
                let mut suffix = vec![0u32; days + 1];
                for day in (0..days).rev() {
                    suffix[day] = suffix[day + 1] + u32::from(!f.excluded.contains(&day));
                }
                suffix
            })
            .collect();

        Ok(Self {
            start,
            days,
            spacing,
            facilities,
            candidates,
            open_suffix,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }
    pub fn days(&self) -> usize {
        self.days
    }
    pub fn spacing(&self) -> usize {
        self.spacing
    }
    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }
    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }
    pub fn facility_name(&self, idx: usize) -> Option<&str> {
        self.facilities.get(idx).map(|f| f.name.as_str())
    }
    pub fn facility_index(&self, name: &str) -> Option<usize> {
        self.facilities.iter().position(|f| f.name == name)
    }
    pub fn required(&self, idx: usize) -> u32 {
        self.facilities[idx].required
    }

    /// Établissements autorisés le jour `day`, dans l'ordre d'entrée.
    pub fn candidates(&self, day: usize) -> &[usize] {
        &self.candidates[day]
    }

    pub fn is_allowed(&self, day: usize, idx: usize) -> bool {
        day < self.days
            && self
                .facilities
                .get(idx)
                .is_some_and(|f| !f.excluded.contains(&day))
    }

    /// Jours non exclus pour `idx` à partir de `day` inclus.
    pub fn open_days_from(&self, idx: usize, day: usize) -> u32 {
        self.open_suffix[idx][day.min(self.days)]
    }

    pub fn date_of(&self, day: usize) -> Option<NaiveDate> {
        if day >= self.days {
            return None;
        }
        util::nth_day(self.start, day)
    }
}

/// Roster complet : jour (index) → établissement (index dans le modèle).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Assignment(Vec<usize>);

impl Assignment {
    pub fn from_indices(picks: Vec<usize>) -> Self {
        Self(picks)
    }
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn facility_on(&self, day: usize) -> Option<usize> {
        self.0.get(day).copied()
    }
    /// Paires `(jour, établissement)` dans l'ordre calendaire.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().copied().enumerate()
    }
    pub fn load(&self, idx: usize) -> u32 {
        self.0.iter().filter(|&&f| f == idx).count() as u32
    }
}
