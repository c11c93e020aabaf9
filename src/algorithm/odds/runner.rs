//! Year-stratified comparison of exposures against outcome groups
//!
//! For each year, in ascending order, every exposure is compared with every
//! outcome group in declaration order (exposure-major). Masks are evaluated
//! on the year's stratum, so a group's membership never leaks across years.

use itertools::Itertools;
use log::{debug, info, warn};

use super::contingency::ContingencyTable;
use super::estimator::{Estimate, OddsRatioEstimator};
use super::results::{ComparisonResult, ResultCollector, ResultTable};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::filter::NamedPredicate;
use crate::records::{Mask, RecordSet};
use crate::utils::logging::{create_comparison_progress_bar, finish_progress_bar};

/// Runs every (year, exposure, group) comparison over a record set
#[derive(Debug, Clone)]
pub struct StratifiedRunner {
    config: AnalysisConfig,
    estimator: OddsRatioEstimator,
}

impl StratifiedRunner {
    /// Create a runner for a validated configuration
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let estimator = OddsRatioEstimator::new(config.alpha)?;
        Ok(Self { config, estimator })
    }

    /// The configuration this runner applies
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Compute all comparisons
    ///
    /// Every column the configuration references is checked before the first
    /// comparison, so a structural problem yields an error and no results.
    pub fn run(&self, records: &RecordSet) -> Result<ResultTable> {
        records.require_columns(self.config.required_columns())?;

        let years = records.years(&self.config.year_column)?;
        let total = years.len() * self.config.comparisons_per_year();
        info!(
            "Comparing {} exposures against {} groups across {} years ({} comparisons)",
            self.config.exposures.len(),
            self.config.groups.len(),
            years.len(),
            total
        );

        let pb = create_comparison_progress_bar(total as u64, self.config.show_progress);
        let mut collector = ResultCollector::with_capacity(total);

        for year in years {
            let stratum = records.stratum(&self.config.year_column, year)?;
            debug!("Year {year}: {} records", stratum.num_rows());

            let exposures = evaluate_all(&stratum, &self.config.exposures)?;
            let groups = evaluate_all(&stratum, &self.config.groups)?;

            for ((exposure, exposure_mask), (group, group_mask)) in
                exposures.iter().cartesian_product(groups.iter())
            {
                let table = ContingencyTable::from_masks(exposure_mask, group_mask)?;
                let estimate = self.estimator.estimate(&table);
                // Log lines and the bar share stderr
                pb.suspend(|| self.report(year, exposure, group, &table, &estimate));

                collector.push(ComparisonResult {
                    year,
                    exposure: (*exposure).to_string(),
                    outcome: (*group).to_string(),
                    table,
                    estimate,
                });
                pb.inc(1);
            }
        }

        finish_progress_bar(&pb, Some("Odds ratios computed"));
        Ok(collector.finish(self.config.alpha))
    }

    fn report(
        &self,
        year: i64,
        exposure: &str,
        group: &str,
        table: &ContingencyTable,
        estimate: &Estimate,
    ) {
        match estimate {
            Estimate::Computed(e) => info!(
                "Year {year} - '{exposure}' vs '{group}': OR = {:.4}, p = {:.4e}, {:.0}% CI [{:.4}, {:.4}]",
                e.odds_ratio,
                e.p_value,
                (1.0 - self.estimator.alpha()) * 100.0,
                e.ci_lower,
                e.ci_upper
            ),
            Estimate::ZeroCell => warn!(
                "Year {year} - contingency table for '{exposure}' vs '{group}' has zero cells {table}; odds ratio not computed"
            ),
            Estimate::DivisionByZero => warn!(
                "Year {year} - division by zero computing odds ratio for '{exposure}' vs '{group}' {table}"
            ),
        }
    }
}

/// Evaluate each named predicate on `records`, keeping declaration order
fn evaluate_all<'a>(
    records: &RecordSet,
    predicates: &'a [NamedPredicate],
) -> Result<Vec<(&'a str, Mask)>> {
    predicates
        .iter()
        .map(|p| Ok((p.name.as_str(), records.evaluate(&p.expr)?)))
        .collect()
}

/// Run the stratified analysis with `config` over `records`
pub fn run_stratified(records: &RecordSet, config: &AnalysisConfig) -> Result<ResultTable> {
    StratifiedRunner::new(config.clone())?.run(records)
}
