//! Stratified odds-ratio analysis
//!
//! This module cross-tabulates exposure and outcome masks into 2×2 tables,
//! estimates odds ratios with Wald intervals and Fisher exact p-values, and
//! runs every comparison per year into an exportable result table.

pub mod contingency;
pub mod distribution;
pub mod estimator;
pub mod results;
pub mod runner;

// Re-export commonly used items
pub use contingency::ContingencyTable;
pub use distribution::{fisher_exact_two_sided, normal_quantile, two_sided_critical_value};
pub use estimator::{Estimate, OddsRatioEstimate, OddsRatioEstimator, estimate, ratio_of_odds};
pub use results::{ComparisonResult, RESULT_COLUMNS, ResultCollector, ResultTable};
pub use runner::{StratifiedRunner, run_stratified};
