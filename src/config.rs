use crate::model::{Facility, RosterModel, DEFAULT_SPACING};
use crate::scheduler::{util, ConfigError, SearchOptions};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Configuration externe d'une invocation (jours exclus indexés à 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    pub year: i32,
    pub month: u32,
    pub facilities: Vec<FacilitySpec>,
    #[serde(default = "default_max_patterns")]
    pub max_patterns: usize,
    #[serde(default = "default_time_budget_secs")]
    pub time_budget_secs: u64,
    #[serde(default = "default_spacing")]
    pub spacing: usize,
    /// Jours fériés (`YYYY-MM-DD`), affichés comme tels dans les libellés.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub holidays: BTreeSet<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilitySpec {
    pub name: String,
    pub required: u32,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub excluded_days: BTreeSet<u32>,
}

fn default_max_patterns() -> usize {
    10
}

fn default_time_budget_secs() -> u64 {
    20
}

fn default_spacing() -> usize {
    DEFAULT_SPACING
}

impl RosterConfig {
    /// Configuration de départ : `D / F` jours chacun, le reste aux premiers établissements.
    pub fn even_split<S: AsRef<str>>(year: i32, month: u32, names: &[S]) -> Result<Self, ConfigError> {
        let days = util::days_in_month(year, month).ok_or(ConfigError::InvalidMonth { year, month })?;
        if names.is_empty() {
            return Err(ConfigError::NoFacilities);
        }
        let count = names.len() as u32;
        let base = days / count;
        let extra = days % count;
        let facilities = names
            .iter()
            .enumerate()
            .map(|(idx, name)| FacilitySpec {
                name: name.as_ref().trim().to_string(),
                required: base + u32::from((idx as u32) < extra),
                excluded_days: BTreeSet::new(),
            })
            .collect();
        let config = Self {
            year,
            month,
            facilities,
            max_patterns: default_max_patterns(),
            time_budget_secs: default_time_budget_secs(),
            spacing: default_spacing(),
            holidays: BTreeSet::new(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn days(&self) -> Result<usize, ConfigError> {
        util::days_in_month(self.year, self.month)
            .map(|d| d as usize)
            .ok_or(ConfigError::InvalidMonth {
                year: self.year,
                month: self.month,
            })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search_options().validate()?;
        self.build_model().map(|_| ())
    }

    /// Convertit les jours exclus (1..=D) en index internes et construit le modèle.
    pub fn build_model(&self) -> Result<RosterModel, ConfigError> {
        let days = self.days()?;
        let facilities = self
            .facilities
            .iter()
            .map(|spec| {
                if let Some(&day) = spec.excluded_days.iter().find(|&&d| d == 0) {
                    return Err(ConfigError::ExcludedDayOutOfRange {
                        facility: spec.name.clone(),
                        day: day as usize,
                        days,
                    });
                }
                Ok(Facility::new(spec.name.trim(), spec.required)
                    .excluding(spec.excluded_days.iter().map(|&d| d as usize - 1)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        RosterModel::for_month(self.year, self.month, facilities, self.spacing)
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            max_patterns: self.max_patterns,
            time_budget: Duration::from_secs(self.time_budget_secs),
            cancel: None,
        }
    }
}

pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> Result<RosterConfig> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    let config: RosterConfig = serde_json::from_slice(&data)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

pub fn export_config_json<P: AsRef<Path>>(path: P, config: &RosterConfig) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json).with_context(|| format!("writing config {}", path.display()))?;
    Ok(())
}
