//! Stratified odds-ratio analysis of birth-record data.
//!
//! Records are loaded into an in-memory [`RecordSet`], split into yearly
//! strata, and each maternal age exposure is compared against a fixed list
//! of demographic and clinical groups. Every comparison yields an odds
//! ratio, a Wald confidence interval and a Fisher exact p-value, or a
//! sentinel when the 2×2 table has an empty cell.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod records;
pub mod utils;

// Re-export the most common types for easier use
pub use config::AnalysisConfig;
pub use error::{OddsError, Result};
pub use filter::{Expr, NamedPredicate};
pub use records::{Mask, RecordSet};

// Analysis
pub use algorithm::odds::{
    ComparisonResult, ContingencyTable, Estimate, OddsRatioEstimate, OddsRatioEstimator,
    ResultCollector, ResultTable, StratifiedRunner, run_stratified,
};

// Input and output
pub use export::{to_record_batch, write_results};
pub use records::load_records;
