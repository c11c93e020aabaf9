//! In-memory birth records
//!
//! A [`RecordSet`] is an ordered collection of rows held as a single Arrow
//! record batch. Categorical code columns are normalised to `Int64` on
//! construction so that predicates evaluate uniformly regardless of how the
//! source stored them.

pub mod loader;
pub mod mask;

use std::collections::BTreeSet;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array};
use arrow::compute::{cast, concat_batches, filter_record_batch};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use log::warn;

use crate::error::{OddsError, Result};
use crate::filter::Expr;

pub use loader::{load_csv, load_parquet, load_records};
pub use mask::Mask;

/// Ordered, in-memory set of records with integer-coded columns
#[derive(Debug, Clone)]
pub struct RecordSet {
    batch: RecordBatch,
}

impl RecordSet {
    /// Wrap a record batch, normalising integer-coded columns to `Int64`
    ///
    /// Float columns whose non-null values are all integral are treated as
    /// codes as well; other columns are kept unchanged.
    pub fn new(batch: RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut columns = Vec::with_capacity(batch.num_columns());

        for (field, column) in schema.fields().iter().zip(batch.columns()) {
            match normalize_column(column)? {
                Some(normalized) => {
                    fields.push(field.as_ref().clone().with_data_type(DataType::Int64));
                    columns.push(normalized);
                }
                None => {
                    fields.push(field.as_ref().clone());
                    columns.push(Arc::clone(column));
                }
            }
        }

        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        Ok(Self { batch })
    }

    /// Concatenate batches that share a schema into one record set
    pub fn from_batches(schema: SchemaRef, batches: &[RecordBatch]) -> Result<Self> {
        let batch = concat_batches(&schema, batches)?;
        Self::new(batch)
    }

    /// Number of records
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    /// Whether the set holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    /// Borrow the underlying record batch
    #[must_use]
    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    /// Fail unless every named column is present and integer-coded
    pub fn require_columns<I, S>(&self, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for column in columns {
            self.int_column(column.as_ref())?;
        }
        Ok(())
    }

    /// Borrow an integer-coded column by name
    pub fn int_column(&self, name: &str) -> Result<&Int64Array> {
        let column = self
            .batch
            .column_by_name(name)
            .ok_or_else(|| OddsError::MissingColumn(name.to_string()))?;

        column
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| OddsError::ColumnType {
                column: name.to_string(),
                data_type: column.data_type().clone(),
            })
    }

    /// Evaluate a predicate into a membership mask
    pub fn evaluate(&self, expr: &Expr) -> Result<Mask> {
        expr.evaluate(self)
    }

    /// Keep the records selected by `mask`, preserving order
    pub fn select(&self, mask: &Mask) -> Result<Self> {
        mask.check_len(self.num_rows())?;
        let batch = filter_record_batch(&self.batch, mask.as_boolean_array())?;
        Ok(Self { batch })
    }

    /// Distinct non-null values of `column`, ascending
    pub fn years(&self, column: &str) -> Result<Vec<i64>> {
        let years = self.int_column(column)?;
        let nulls = years.null_count();
        if nulls > 0 {
            warn!("{nulls} records have no value in '{column}' and are excluded from every stratum");
        }
        let distinct: BTreeSet<i64> = years.iter().flatten().collect();
        Ok(distinct.into_iter().collect())
    }

    /// The stratum of records whose `column` equals `year`
    pub fn stratum(&self, column: &str, year: i64) -> Result<Self> {
        let mask = self.evaluate(&Expr::Eq(column.to_string(), year))?;
        self.select(&mask)
    }
}

/// Cast a code column to `Int64`, or `None` if the column does not hold codes
fn normalize_column(column: &ArrayRef) -> Result<Option<ArrayRef>> {
    match column.data_type() {
        DataType::Int64 => Ok(Some(Arc::clone(column))),
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => Ok(Some(cast(column, &DataType::Int64)?)),
        DataType::Float32 | DataType::Float64 => {
            let floats = cast(column, &DataType::Float64)?;
            let integral = floats
                .as_any()
                .downcast_ref::<Float64Array>()
                .is_some_and(|values| values.iter().flatten().all(|v| v.fract() == 0.0));
            if integral {
                Ok(Some(cast(&floats, &DataType::Int64)?))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}

/// Schema with every named column declared as nullable `Int64`
#[must_use]
pub fn code_schema<S: AsRef<str>>(columns: &[S]) -> Schema {
    Schema::new(
        columns
            .iter()
            .map(|name| Field::new(name.as_ref(), DataType::Int64, true))
            .collect::<Vec<_>>(),
    )
}
