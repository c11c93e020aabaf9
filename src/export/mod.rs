//! Export of result tables
//!
//! Results can be written as an Excel workbook, CSV, Parquet or JSON. The
//! format is chosen from the output file extension. Text formats render
//! sentinels with their labels; columnar formats use nulls and a status column.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::algorithm::odds::{ComparisonResult, Estimate, RESULT_COLUMNS, ResultTable};
use crate::error::{OddsError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Odds Ratio cell text for a table with an empty cell
pub const ZERO_CELL_LABEL: &str = "Valores cero";
/// Odds Ratio cell text when the ratio hit a zero denominator
pub const DIVISION_BY_ZERO_LABEL: &str = "División por cero";
/// Text for statistics that were not computed
pub const NOT_AVAILABLE_LABEL: &str = "N/A";
/// Trailing status column in columnar exports
pub const STATUS_COLUMN: &str = "Estado";

/// Write `table` to `path`, choosing the format from the extension
///
/// `.xlsx` → Excel workbook, `.csv` → CSV, `.parquet` / `.pq` → Parquet,
/// `.json` → JSON.
pub fn write_results(table: &ResultTable, path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("xlsx") => write_xlsx(table, path),
        Some("csv") => write_csv(table, path),
        Some("parquet" | "pq") => write_parquet(table, path),
        Some("json") => write_json(table, path),
        _ => Err(OddsError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Render the Odds Ratio cell of a row as text
#[must_use]
pub fn odds_ratio_cell(row: &ComparisonResult) -> String {
    match &row.estimate {
        Estimate::Computed(e) => e.odds_ratio.to_string(),
        Estimate::ZeroCell => ZERO_CELL_LABEL.to_string(),
        Estimate::DivisionByZero => DIVISION_BY_ZERO_LABEL.to_string(),
    }
}

fn stat_cell(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE_LABEL.to_string(), |v| v.to_string())
}

/// Write the table to the first sheet of an Excel workbook
///
/// The year and every computed statistic are numeric cells. Sentinels are
/// written as their text labels in the same columns.
pub fn write_xlsx(table: &ResultTable, path: &Path) -> Result<()> {
    log_operation_start("Writing Excel results to", path);
    let start = Instant::now();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = Format::new().set_bold();
    for (col, name) in (0u16..).zip(RESULT_COLUMNS) {
        worksheet.write_string_with_format(0, col, name, &header)?;
    }

    for (row_num, row) in (1u32..).zip(table) {
        worksheet.write_number(row_num, 0, row.year as f64)?;
        worksheet.write_string(row_num, 1, &row.exposure)?;
        worksheet.write_string(row_num, 2, &row.outcome)?;
        match &row.estimate {
            Estimate::Computed(e) => {
                worksheet.write_number(row_num, 3, e.odds_ratio)?;
                worksheet.write_number(row_num, 4, e.p_value)?;
                worksheet.write_number(row_num, 5, e.ci_lower)?;
                worksheet.write_number(row_num, 6, e.ci_upper)?;
            }
            Estimate::ZeroCell | Estimate::DivisionByZero => {
                worksheet.write_string(row_num, 3, odds_ratio_cell(row))?;
                write_not_available(worksheet, row_num, 4..=6)?;
            }
        }
    }
    workbook.save(path)?;

    log_operation_complete("wrote", path, table.len(), Some(start.elapsed()));
    Ok(())
}

fn write_not_available(
    worksheet: &mut Worksheet,
    row_num: u32,
    cols: std::ops::RangeInclusive<u16>,
) -> Result<()> {
    for col in cols {
        worksheet.write_string(row_num, col, NOT_AVAILABLE_LABEL)?;
    }
    Ok(())
}

/// Write the table as CSV with a header row
pub fn write_csv(table: &ResultTable, path: &Path) -> Result<()> {
    log_operation_start("Writing CSV results to", path);
    let start = Instant::now();

    let mut file = BufWriter::new(File::create(path)?);
    writeln!(
        file,
        "{}",
        RESULT_COLUMNS
            .iter()
            .map(|c| escape_csv(c))
            .collect::<Vec<_>>()
            .join(",")
    )?;

    for row in table {
        writeln!(
            file,
            "{},{},{},{},{},{},{}",
            row.year,
            escape_csv(&row.exposure),
            escape_csv(&row.outcome),
            escape_csv(&odds_ratio_cell(row)),
            stat_cell(row.p_value()),
            stat_cell(row.ci_lower()),
            stat_cell(row.ci_upper())
        )?;
    }
    file.flush()?;

    log_operation_complete("wrote", path, table.len(), Some(start.elapsed()));
    Ok(())
}

/// Convert the table to an Arrow record batch
///
/// Statistics are `Float64`, null where a sentinel was recorded; the
/// trailing status column tells the sentinels apart.
pub fn to_record_batch(table: &ResultTable) -> Result<RecordBatch> {
    let mut fields: Vec<Field> = Vec::with_capacity(RESULT_COLUMNS.len() + 1);
    fields.push(Field::new(RESULT_COLUMNS[0], DataType::Int64, false));
    fields.push(Field::new(RESULT_COLUMNS[1], DataType::Utf8, false));
    fields.push(Field::new(RESULT_COLUMNS[2], DataType::Utf8, false));
    for name in &RESULT_COLUMNS[3..] {
        fields.push(Field::new(*name, DataType::Float64, true));
    }
    fields.push(Field::new(STATUS_COLUMN, DataType::Utf8, false));

    let rows = table.rows();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.exposure))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.outcome))),
        Arc::new(Float64Array::from_iter(rows.iter().map(ComparisonResult::odds_ratio))),
        Arc::new(Float64Array::from_iter(rows.iter().map(ComparisonResult::p_value))),
        Arc::new(Float64Array::from_iter(rows.iter().map(ComparisonResult::ci_lower))),
        Arc::new(Float64Array::from_iter(rows.iter().map(ComparisonResult::ci_upper))),
        Arc::new(StringArray::from_iter_values(
            rows.iter().map(|r| r.estimate.status()),
        )),
    ];

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Write the table as a single-row-group Parquet file
pub fn write_parquet(table: &ResultTable, path: &Path) -> Result<()> {
    log_operation_start("Writing Parquet results to", path);
    let start = Instant::now();

    let batch = to_record_batch(table)?;
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    log_operation_complete("wrote", path, table.len(), Some(start.elapsed()));
    Ok(())
}

/// Write the rows as a JSON array
pub fn write_json(table: &ResultTable, path: &Path) -> Result<()> {
    log_operation_start("Writing JSON results to", path);
    let start = Instant::now();

    let mut file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut file, table.rows())?;
    file.flush()?;

    log_operation_complete("wrote", path, table.len(), Some(start.elapsed()));
    Ok(())
}

/// Quote a CSV field when it contains a separator, quote or newline
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
