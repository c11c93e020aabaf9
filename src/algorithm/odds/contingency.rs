//! 2×2 contingency tables built from exposure and outcome masks

use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::records::Mask;

/// Cell counts of a 2×2 table
///
/// ```text
///                outcome   no outcome
/// exposed           a          b
/// not exposed       c          d
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ContingencyTable {
    /// Exposed with the outcome
    pub a: u64,
    /// Exposed without the outcome
    pub b: u64,
    /// Not exposed with the outcome
    pub c: u64,
    /// Not exposed without the outcome
    pub d: u64,
}

impl ContingencyTable {
    /// Create a table from its four cells
    #[must_use]
    pub const fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        Self { a, b, c, d }
    }

    /// Cross-tabulate two membership masks over the same records
    ///
    /// # Errors
    /// Returns an error if the masks differ in length
    pub fn from_masks(exposure: &Mask, outcome: &Mask) -> Result<Self> {
        exposure.check_len(outcome.len())?;

        let exposed = exposure.count();
        let unexposed = exposure.len() - exposed;
        let a = exposure.and(outcome)?.count();
        let c = exposure.not()?.and(outcome)?.count();

        Ok(Self::new(
            a as u64,
            (exposed - a) as u64,
            c as u64,
            (unexposed - c) as u64,
        ))
    }

    /// Number of records tabulated
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.a + self.b + self.c + self.d
    }

    /// Whether any cell is empty, leaving the odds ratio undefined
    #[must_use]
    pub const fn has_zero_cell(&self) -> bool {
        self.a == 0 || self.b == 0 || self.c == 0 || self.d == 0
    }

    /// Swap the roles of exposure and outcome
    #[must_use]
    pub const fn transpose(&self) -> Self {
        Self::new(self.a, self.c, self.b, self.d)
    }

    /// Swap exposed and unexposed rows
    #[must_use]
    pub const fn swap_rows(&self) -> Self {
        Self::new(self.c, self.d, self.a, self.b)
    }

    /// Swap outcome and no-outcome columns
    #[must_use]
    pub const fn swap_columns(&self) -> Self {
        Self::new(self.b, self.a, self.d, self.c)
    }
}

impl fmt::Display for ContingencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[{}, {}], [{}, {}]]", self.a, self.b, self.c, self.d)
    }
}
