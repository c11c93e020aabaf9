//! Boolean membership vectors over a record set

use arrow::array::{Array, BooleanArray};
use arrow::compute::{and, not, or};

use crate::error::{OddsError, Result};

/// A null-free boolean membership vector, one entry per record
///
/// Nulls never survive construction: a record whose membership is unknown
/// is treated as a non-member.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    values: BooleanArray,
}

impl Mask {
    /// Wrap an Arrow boolean array, mapping nulls to `false`
    #[must_use]
    pub fn new(values: BooleanArray) -> Self {
        if values.null_count() == 0 {
            return Self { values };
        }
        let values = values.iter().map(|v| Some(v.unwrap_or(false))).collect();
        Self { values }
    }

    /// Build a mask from plain booleans
    #[must_use]
    pub fn from_bools(values: Vec<bool>) -> Self {
        Self {
            values: BooleanArray::from(values),
        }
    }

    /// A mask of `len` entries all set to `value`
    #[must_use]
    pub fn filled(len: usize, value: bool) -> Self {
        Self::from_bools(vec![value; len])
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the mask has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of members (entries set to `true`)
    #[must_use]
    pub fn count(&self) -> usize {
        self.values.true_count()
    }

    /// Element-wise AND with another mask of equal length
    pub fn and(&self, other: &Self) -> Result<Self> {
        self.check_len(other.len())?;
        Ok(Self {
            values: and(&self.values, &other.values)?,
        })
    }

    /// Element-wise OR with another mask of equal length
    pub fn or(&self, other: &Self) -> Result<Self> {
        self.check_len(other.len())?;
        Ok(Self {
            values: or(&self.values, &other.values)?,
        })
    }

    /// Element-wise negation
    pub fn not(&self) -> Result<Self> {
        Ok(Self {
            values: not(&self.values)?,
        })
    }

    /// Fails unless the mask has exactly `rows` entries
    pub fn check_len(&self, rows: usize) -> Result<()> {
        if self.len() != rows {
            return Err(OddsError::MaskLength {
                mask: self.len(),
                rows,
            });
        }
        Ok(())
    }

    /// Borrow the underlying Arrow array
    #[must_use]
    pub fn as_boolean_array(&self) -> &BooleanArray {
        &self.values
    }

    /// Iterate over the membership flags
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.values.iter().map(|v| v.unwrap_or(false))
    }
}
