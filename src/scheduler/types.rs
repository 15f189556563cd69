use crate::model::Assignment;
use chrono::NaiveDate;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Options d'énumération
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub max_patterns: usize,
    pub time_budget: Duration,
    /// Arrêt demandé par l'appelant, traité comme une échéance dépassée.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_patterns: 10,
            time_budget: Duration::from_secs(20),
            cancel: None,
        }
    }
}

impl SearchOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_patterns == 0 {
            return Err(ConfigError::ZeroSolutionCap);
        }
        if self.time_budget.is_zero() {
            return Err(ConfigError::ZeroTimeBudget);
        }
        Ok(())
    }
}

/// Raison de l'arrêt de la recherche.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Espace de recherche épuisé : l'ensemble renvoyé est complet.
    Exhausted,
    /// Plafond `max_patterns` atteint (incomplétude voulue).
    CapReached,
    /// Budget de temps écoulé : d'autres solutions peuvent exister.
    DeadlineExceeded,
    Cancelled,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Exhausted => "exhausted",
            Termination::CapReached => "cap-reached",
            Termination::DeadlineExceeded => "deadline-exceeded",
            Termination::Cancelled => "cancelled",
        }
    }
}

/// Résultat d'une énumération, dans l'ordre de découverte.
#[derive(Debug, Clone)]
pub struct SolutionSet {
    pub solutions: Vec<Assignment>,
    pub termination: Termination,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl SolutionSet {
    pub fn len(&self) -> usize {
        self.solutions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
    /// Aucun roster possible, prouvé par épuisement.
    pub fn is_infeasible(&self) -> bool {
        self.solutions.is_empty() && self.termination == Termination::Exhausted
    }
    pub fn is_complete(&self) -> bool {
        matches!(
            self.termination,
            Termination::Exhausted | Termination::CapReached
        )
    }
    pub fn is_possibly_incomplete(&self) -> bool {
        !self.is_complete()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    Coverage,
    Excluded,
    Load,
    Spacing,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Coverage => "coverage",
            ViolationKind::Excluded => "excluded",
            ViolationKind::Load => "load",
            ViolationKind::Spacing => "spacing",
        }
    }
}

/// Contrainte violée par un roster complet. Jours indexés à 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub facility: Option<usize>,
    pub day: Option<usize>,
    pub other_day: Option<usize>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid period: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("roster period must contain at least one day")]
    NoDays,
    #[error("period starting {0} overflows the calendar")]
    PeriodOverflow(NaiveDate),
    #[error("spacing window must be at least 1 day")]
    InvalidSpacing,
    #[error("at least one facility is required")]
    NoFacilities,
    #[error("facility #{0} has an empty name")]
    EmptyFacilityName(usize),
    #[error("duplicate facility name: {0}")]
    DuplicateFacility(String),
    #[error("facility {facility} requires {required} days but the period only has {days}")]
    RequiredExceedsDays {
        facility: String,
        required: u32,
        days: usize,
    },
    #[error("required counts sum to {sum} but the period has {days} days")]
    RequiredSumMismatch { sum: u64, days: usize },
    #[error("facility {facility}: excluded day {day} is outside 1..={days}")]
    ExcludedDayOutOfRange {
        facility: String,
        day: usize,
        days: usize,
    },
    #[error("max_patterns must be > 0")]
    ZeroSolutionCap,
    #[error("time budget must be > 0")]
    ZeroTimeBudget,
}
