//! Expression-based membership predicates
//!
//! Group and exposure definitions are expressed as `Expr` trees over the
//! integer-coded columns of a record set. Evaluating an expression yields a
//! [`Mask`] with one entry per record.

use std::collections::HashSet;

use arrow::array::{Array, Int64Array};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::records::{Mask, RecordSet};

/// A membership predicate over integer-coded columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Expr {
    /// Column equals a code
    Eq(String, i64),

    /// Column is one of a set of codes
    In(String, Vec<i64>),

    /// Column is none of a set of codes (null codes never match)
    NotIn(String, Vec<i64>),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Logical OR of expressions
    Or(Vec<Expr>),

    /// Logical NOT of an expression
    Not(Box<Expr>),

    /// Always evaluates to true
    AlwaysTrue,

    /// Always evaluates to false
    AlwaysFalse,
}

impl Expr {
    /// Returns a set of all column names required by this expression
    #[must_use]
    pub fn required_columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        self.collect_required_columns(&mut columns);
        columns
    }

    fn collect_required_columns(&self, columns: &mut HashSet<String>) {
        match self {
            Self::Eq(col, _) | Self::In(col, _) | Self::NotIn(col, _) => {
                columns.insert(col.clone());
            }
            Self::And(exprs) | Self::Or(exprs) => {
                for expr in exprs {
                    expr.collect_required_columns(columns);
                }
            }
            Self::Not(expr) => expr.collect_required_columns(columns),
            Self::AlwaysTrue | Self::AlwaysFalse => {}
        }
    }

    /// Evaluate the expression against every record
    ///
    /// # Errors
    /// Returns an error if a referenced column is missing or not integer-coded
    pub fn evaluate(&self, records: &RecordSet) -> Result<Mask> {
        let rows = records.num_rows();
        match self {
            Self::AlwaysTrue => Ok(Mask::filled(rows, true)),
            Self::AlwaysFalse => Ok(Mask::filled(rows, false)),
            Self::Eq(col, code) => {
                let column = records.int_column(col)?;
                Ok(match_codes(column, |v| v == *code))
            }
            Self::In(col, codes) => {
                let column = records.int_column(col)?;
                let codes: HashSet<i64> = codes.iter().copied().collect();
                Ok(match_codes(column, |v| codes.contains(&v)))
            }
            Self::NotIn(col, codes) => {
                let column = records.int_column(col)?;
                let codes: HashSet<i64> = codes.iter().copied().collect();
                Ok(match_codes(column, |v| !codes.contains(&v)))
            }
            Self::And(exprs) => {
                let mut result = Mask::filled(rows, true);
                for expr in exprs {
                    result = result.and(&expr.evaluate(records)?)?;
                }
                Ok(result)
            }
            Self::Or(exprs) => {
                let mut result = Mask::filled(rows, false);
                for expr in exprs {
                    result = result.or(&expr.evaluate(records)?)?;
                }
                Ok(result)
            }
            Self::Not(expr) => expr.evaluate(records)?.not(),
        }
    }
}

/// Apply `pred` to each non-null code; null codes are never members
fn match_codes(column: &Int64Array, pred: impl Fn(i64) -> bool) -> Mask {
    let mut members = Vec::with_capacity(column.len());
    for i in 0..column.len() {
        members.push(!column.is_null(i) && pred(column.value(i)));
    }
    Mask::from_bools(members)
}

/// Create an equality predicate
#[must_use]
pub fn eq_filter(column: &str, code: i64) -> Expr {
    Expr::Eq(column.to_string(), code)
}

/// Create a set-membership predicate
#[must_use]
pub fn in_filter(column: &str, codes: impl IntoIterator<Item = i64>) -> Expr {
    Expr::In(column.to_string(), codes.into_iter().collect())
}
