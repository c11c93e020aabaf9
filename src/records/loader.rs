//! Loading birth records from disk
//!
//! CSV and Parquet inputs are read fully into memory and concatenated into
//! a single [`RecordSet`]. Any failure here is fatal to a run.

use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use regex::Regex;

use crate::error::{OddsError, Result};
use crate::records::RecordSet;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Default batch size for reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// CSV fields read as missing: the empty field plus the usual spreadsheet and
/// dataframe NA spellings
pub const CSV_NULL_PATTERN: &str = r"^(|#N/A|#N/A N/A|#NA|-1\.#IND|-1\.#QNAN|-NaN|-nan|1\.#IND|1\.#QNAN|<NA>|N/A|NA|NULL|NaN|None|n/a|nan|null)$";

/// Load records, choosing the reader from the file extension
///
/// `.csv` files are read as comma-separated text with a header row;
/// `.parquet` / `.pq` files are read as Parquet.
pub fn load_records(path: &Path) -> Result<RecordSet> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => load_csv(path),
        Some("parquet" | "pq") => load_parquet(path),
        _ => Err(OddsError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Load a CSV file with a header row, inferring column types
///
/// Fields matching [`CSV_NULL_PATTERN`] are nulls, so a column of codes with
/// a stray `NA` still loads as integers.
pub fn load_csv(path: &Path) -> Result<RecordSet> {
    log_operation_start("Reading CSV records from", path);
    let start = Instant::now();

    let mut file = File::open(path)?;
    let format = Format::default()
        .with_header(true)
        .with_null_regex(Regex::new(CSV_NULL_PATTERN)?);
    let (schema, _) = format.infer_schema(&mut file, None)?;
    file.rewind()?;

    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_format(format)
        .with_batch_size(DEFAULT_BATCH_SIZE)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<RecordBatch>, _>>()?;

    let records = RecordSet::from_batches(schema, &batches)?;
    log_operation_complete("read", path, records.num_rows(), Some(start.elapsed()));
    Ok(records)
}

/// Load a Parquet file
pub fn load_parquet(path: &Path) -> Result<RecordSet> {
    log_operation_start("Reading Parquet records from", path);
    let start = Instant::now();

    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = Arc::clone(builder.schema());
    let reader = builder.with_batch_size(DEFAULT_BATCH_SIZE).build()?;
    let batches = reader.collect::<std::result::Result<Vec<RecordBatch>, _>>()?;

    let records = RecordSet::from_batches(schema, &batches)?;
    log_operation_complete("read", path, records.num_rows(), Some(start.elapsed()));
    Ok(records)
}
