//! Configuration for the stratified odds-ratio analysis.
//!
//! The default configuration reproduces the birth-record study: two maternal
//! age exposures compared against fourteen demographic and clinical groups,
//! stratified by year. Every definition can be replaced from a JSON file.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OddsError, Result};
use crate::filter::{NamedPredicate, eq_filter, in_filter};

/// Birth weight code
pub const BIRTH_WEIGHT: &str = "PESO_NAC";
/// Gestation weeks code
pub const GESTATION_WEEKS: &str = "T_GES";
/// Birth multiplicity code
pub const MULTIPLICITY: &str = "MUL_PARTO";
/// Maternal marital status code
pub const MARITAL_STATUS: &str = "EST_CIVM";
/// Health insurance scheme code
pub const INSURANCE: &str = "SEG_SOCIAL";
/// Birth area code
pub const AREA: &str = "AREANAC";
/// Newborn sex code
pub const SEX: &str = "SEXO";
/// Maternal age group code
pub const MATERNAL_AGE: &str = "EDAD_MADRE";
/// Year of birth
pub const YEAR: &str = "ANO";

/// Default significance level
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Configuration for a stratified odds-ratio run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Significance level for confidence intervals, in (0, 1)
    pub alpha: f64,
    /// Column whose distinct values define the strata
    pub year_column: String,
    /// Exposure definitions, compared in this order within each year
    pub exposures: Vec<NamedPredicate>,
    /// Outcome groups, compared in this order for each exposure
    pub groups: Vec<NamedPredicate>,
    /// Whether to draw a progress bar while computing
    pub show_progress: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            year_column: YEAR.to_string(),
            exposures: default_exposures(),
            groups: default_groups(),
            show_progress: true,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from JSON; omitted fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Set the significance level
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Replace the outcome groups
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<NamedPredicate>) -> Self {
        self.groups = groups;
        self
    }

    /// Replace the exposure definitions
    #[must_use]
    pub fn with_exposures(mut self, exposures: Vec<NamedPredicate>) -> Self {
        self.exposures = exposures;
        self
    }

    /// Enable or disable the progress bar
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(OddsError::config(format!(
                "alpha must lie strictly between 0 and 1, got {}",
                self.alpha
            )));
        }
        if self.year_column.is_empty() {
            return Err(OddsError::config("year column must be named"));
        }
        if self.exposures.is_empty() {
            return Err(OddsError::config("at least one exposure is required"));
        }
        if self.groups.is_empty() {
            return Err(OddsError::config("at least one comparison group is required"));
        }
        Ok(())
    }

    /// Every column referenced by the year column, exposures and groups
    #[must_use]
    pub fn required_columns(&self) -> BTreeSet<String> {
        let mut columns = BTreeSet::new();
        columns.insert(self.year_column.clone());
        for predicate in self.exposures.iter().chain(&self.groups) {
            columns.extend(predicate.expr.required_columns());
        }
        columns
    }

    /// Number of comparisons produced per year
    #[must_use]
    pub fn comparisons_per_year(&self) -> usize {
        self.exposures.len() * self.groups.len()
    }
}

impl fmt::Display for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Configuration:")?;
        writeln!(f, "  Alpha: {}", self.alpha)?;
        writeln!(f, "  Year Column: {}", self.year_column)?;
        writeln!(f, "  Exposures:")?;
        for exposure in &self.exposures {
            writeln!(f, "    - {}", exposure.name)?;
        }
        writeln!(f, "  Comparison Groups: {}", self.groups.len())?;
        for group in &self.groups {
            writeln!(f, "    - {}", group.name)?;
        }
        Ok(())
    }
}

/// Maternal age exposures: under 30, then 30 and over
#[must_use]
pub fn default_exposures() -> Vec<NamedPredicate> {
    vec![
        NamedPredicate::new("Madres menores de 30", in_filter(MATERNAL_AGE, 1..=4)),
        NamedPredicate::new("Madres mayores de 30", in_filter(MATERNAL_AGE, 5..=9)),
    ]
}

/// The fourteen comparison groups, in output order
#[must_use]
pub fn default_groups() -> Vec<NamedPredicate> {
    vec![
        NamedPredicate::new("Bebés <= 2500g", in_filter(BIRTH_WEIGHT, 1..=4)),
        NamedPredicate::new("Bebés > 2500g", in_filter(BIRTH_WEIGHT, 5..=9)),
        NamedPredicate::new("Embarazos < 38 semanas", in_filter(GESTATION_WEEKS, 1..=3)),
        NamedPredicate::new("Embarazos >= 38 semanas", in_filter(GESTATION_WEEKS, 4..=5)),
        NamedPredicate::new("Embarazos simples", eq_filter(MULTIPLICITY, 1)),
        NamedPredicate::new("Embarazos múltiples", in_filter(MULTIPLICITY, 2..=4)),
        NamedPredicate::new("Madres solteras", eq_filter(MARITAL_STATUS, 5)),
        NamedPredicate::new("Madres comprometidas", in_filter(MARITAL_STATUS, [1, 2])),
        NamedPredicate::new("Madres con seguro contributivo", eq_filter(INSURANCE, 1)),
        NamedPredicate::new("Madres con seguro subsidiado", eq_filter(INSURANCE, 2)),
        NamedPredicate::new("Nacimientos urbanos", eq_filter(AREA, 1)),
        NamedPredicate::new("Nacimientos rurales", in_filter(AREA, [2, 3])),
        NamedPredicate::new("Bebés masculinos", eq_filter(SEX, 1)),
        NamedPredicate::new("Bebés femeninos", eq_filter(SEX, 2)),
    ]
}
