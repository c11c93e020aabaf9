//! Comparison results and the table they are collected into

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::contingency::ContingencyTable;
use super::estimator::Estimate;

/// Column headers of the exported result table, in order
pub const RESULT_COLUMNS: [&str; 7] = [
    "Año",
    "Grupo 1",
    "Grupo 2",
    "Odds Ratio",
    "P-value",
    "CI Lower",
    "CI Upper",
];

/// One (year, exposure, outcome) comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Stratum year
    pub year: i64,
    /// Exposure label
    pub exposure: String,
    /// Outcome group label
    pub outcome: String,
    /// Cell counts the estimate was computed from
    pub table: ContingencyTable,
    /// Estimate or sentinel
    pub estimate: Estimate,
}

impl ComparisonResult {
    /// Odds ratio, if computed
    #[must_use]
    pub fn odds_ratio(&self) -> Option<f64> {
        self.estimate.computed().map(|e| e.odds_ratio)
    }

    /// Fisher exact p-value, if computed
    #[must_use]
    pub fn p_value(&self) -> Option<f64> {
        self.estimate.computed().map(|e| e.p_value)
    }

    /// Lower confidence bound, if computed
    #[must_use]
    pub fn ci_lower(&self) -> Option<f64> {
        self.estimate.computed().map(|e| e.ci_lower)
    }

    /// Upper confidence bound, if computed
    #[must_use]
    pub fn ci_upper(&self) -> Option<f64> {
        self.estimate.computed().map(|e| e.ci_upper)
    }

    /// Whether the p-value is below `alpha`
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value().is_some_and(|p| p < alpha)
    }
}

/// Append-only accumulator of comparison results
#[derive(Debug, Default)]
pub struct ResultCollector {
    rows: Vec<ComparisonResult>,
}

impl ResultCollector {
    /// Create an empty collector
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector sized for `capacity` comparisons
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Append a result; sentinel results are kept like any other
    pub fn push(&mut self, result: ComparisonResult) {
        self.rows.push(result);
    }

    /// Number of results collected so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing has been collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Materialise the collected results
    #[must_use]
    pub fn finish(self, alpha: f64) -> ResultTable {
        ResultTable {
            alpha,
            rows: self.rows,
        }
    }
}

/// Ordered table of comparison results, ready for export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    alpha: f64,
    rows: Vec<ComparisonResult>,
}

impl ResultTable {
    /// Rows in production order
    #[must_use]
    pub fn rows(&self) -> &[ComparisonResult] {
        &self.rows
    }

    /// Significance level the intervals were computed at
    #[must_use]
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct years present, ascending
    #[must_use]
    pub fn years(&self) -> Vec<i64> {
        self.rows
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of rows with a numeric estimate
    #[must_use]
    pub fn computed_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.estimate.is_sentinel()).count()
    }

    /// Number of rows holding a sentinel
    #[must_use]
    pub fn sentinel_count(&self) -> usize {
        self.len() - self.computed_count()
    }

    /// Rows whose p-value is below the table's significance level
    pub fn significant(&self) -> impl Iterator<Item = &ComparisonResult> {
        let alpha = self.alpha;
        self.rows.iter().filter(move |r| r.is_significant(alpha))
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ComparisonResult;
    type IntoIter = std::slice::Iter<'a, ComparisonResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl fmt::Display for ResultTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = self.years();
        writeln!(f, "Odds Ratio Summary:")?;
        writeln!(f, "  Years: {}", years.len())?;
        writeln!(f, "  Comparisons: {}", self.len())?;
        writeln!(f, "  Computed: {}", self.computed_count())?;
        writeln!(f, "  Insufficient data: {}", self.sentinel_count())?;

        let significant: Vec<_> = self.significant().collect();
        writeln!(
            f,
            "  Significant at alpha = {}: {}",
            self.alpha,
            significant.len()
        )?;
        for row in significant {
            if let Some(estimate) = row.estimate.computed() {
                writeln!(
                    f,
                    "    {} | {} vs {} | OR {:.3} [{:.3}, {:.3}] p = {:.3e}",
                    row.year,
                    row.exposure,
                    row.outcome,
                    estimate.odds_ratio,
                    estimate.ci_lower,
                    estimate.ci_upper,
                    estimate.p_value
                )?;
            }
        }
        Ok(())
    }
}
