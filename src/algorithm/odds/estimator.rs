//! Odds ratio estimation for a single 2×2 table
//!
//! The point estimate is `(a/b) / (c/d)`, the interval is the Wald interval
//! on the log scale and the p-value comes from the two-sided Fisher exact
//! test. Tables with an empty cell have no defined odds ratio and produce
//! the [`Estimate::ZeroCell`] outcome instead of a number.

use serde::Serialize;

use super::contingency::ContingencyTable;
use super::distribution::{fisher_exact_two_sided, two_sided_critical_value};
use crate::config::DEFAULT_ALPHA;
use crate::error::{OddsError, Result};

/// Numeric result of an odds-ratio estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OddsRatioEstimate {
    /// Point estimate
    pub odds_ratio: f64,
    /// Standard error of ln(odds ratio)
    pub log_std_error: f64,
    /// Lower confidence bound
    pub ci_lower: f64,
    /// Upper confidence bound
    pub ci_upper: f64,
    /// Two-sided Fisher exact p-value
    pub p_value: f64,
}

/// Outcome of estimating one comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimate {
    /// All cells populated; estimate computed
    Computed(OddsRatioEstimate),
    /// At least one cell is zero
    ZeroCell,
    /// The odds in the unexposed or exposed row had a zero denominator
    DivisionByZero,
}

impl Estimate {
    /// The numeric estimate, if one was computed
    #[must_use]
    pub const fn computed(&self) -> Option<&OddsRatioEstimate> {
        match self {
            Self::Computed(estimate) => Some(estimate),
            Self::ZeroCell | Self::DivisionByZero => None,
        }
    }

    /// Whether this outcome is a sentinel rather than a number
    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        !matches!(self, Self::Computed(_))
    }

    /// Short machine-readable status
    #[must_use]
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Computed(_) => "computed",
            Self::ZeroCell => "zero_cell",
            Self::DivisionByZero => "division_by_zero",
        }
    }
}

/// Ratio of the exposed odds `a/b` to the unexposed odds `c/d`
///
/// Returns `None` when `b`, `d` or the unexposed odds are zero.
#[must_use]
pub fn ratio_of_odds(table: &ContingencyTable) -> Option<f64> {
    if table.b == 0 || table.d == 0 {
        return None;
    }
    let exposed_odds = table.a as f64 / table.b as f64;
    let unexposed_odds = table.c as f64 / table.d as f64;
    if unexposed_odds == 0.0 {
        return None;
    }
    Some(exposed_odds / unexposed_odds)
}

/// Stateless odds-ratio estimator at a fixed significance level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OddsRatioEstimator {
    alpha: f64,
    z: f64,
}

impl Default for OddsRatioEstimator {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            z: two_sided_critical_value(DEFAULT_ALPHA),
        }
    }
}

impl OddsRatioEstimator {
    /// Create an estimator for significance level `alpha`
    ///
    /// # Errors
    /// Returns an error unless `alpha` lies strictly between 0 and 1
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(OddsError::config(format!(
                "alpha must lie strictly between 0 and 1, got {alpha}"
            )));
        }
        Ok(Self {
            alpha,
            z: two_sided_critical_value(alpha),
        })
    }

    /// Significance level
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Two-sided critical value used for the interval
    #[must_use]
    pub const fn critical_value(&self) -> f64 {
        self.z
    }

    /// Estimate the odds ratio, interval and p-value for `table`
    #[must_use]
    pub fn estimate(&self, table: &ContingencyTable) -> Estimate {
        if table.has_zero_cell() {
            return Estimate::ZeroCell;
        }
        let Some(odds_ratio) = ratio_of_odds(table) else {
            return Estimate::DivisionByZero;
        };

        let log_std_error = (1.0 / table.a as f64
            + 1.0 / table.b as f64
            + 1.0 / table.c as f64
            + 1.0 / table.d as f64)
            .sqrt();
        let log_or = odds_ratio.ln();
        let margin = self.z * log_std_error;

        Estimate::Computed(OddsRatioEstimate {
            odds_ratio,
            log_std_error,
            ci_lower: (log_or - margin).exp(),
            ci_upper: (log_or + margin).exp(),
            p_value: fisher_exact_two_sided(table),
        })
    }
}

/// Estimate `table` at significance level `alpha`
pub fn estimate(table: &ContingencyTable, alpha: f64) -> Result<Estimate> {
    Ok(OddsRatioEstimator::new(alpha)?.estimate(table))
}
