//! Membership predicates for exposure and outcome groups
//!
//! This module provides the expression language used to define groups over
//! birth records, and the named predicate type that the analysis iterates.

pub mod expr;

use serde::{Deserialize, Serialize};

pub use expr::{Expr, eq_filter, in_filter};

/// A labelled predicate; the label is what appears in the result table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedPredicate {
    /// Label used in diagnostics and output
    pub name: String,
    /// Membership expression
    pub expr: Expr,
}

impl NamedPredicate {
    /// Create a named predicate
    #[must_use]
    pub fn new(name: impl Into<String>, expr: Expr) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }
}
