//! Tests for result table export

use std::fs;
use std::fs::File;

use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use calamine::{Data, Reader, Xlsx, open_workbook};
use birth_odds::algorithm::odds::RESULT_COLUMNS;
use birth_odds::export::{
    DIVISION_BY_ZERO_LABEL, NOT_AVAILABLE_LABEL, STATUS_COLUMN, ZERO_CELL_LABEL, to_record_batch,
    write_results,
};
use birth_odds::{
    ComparisonResult, ContingencyTable, Estimate, OddsError, OddsRatioEstimator, ResultCollector,
    ResultTable,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

fn sample_table() -> ResultTable {
    let estimator = OddsRatioEstimator::default();
    let mut collector = ResultCollector::new();
    for (outcome, table) in [
        ("Bebés <= 2500g", ContingencyTable::new(10, 40, 5, 45)),
        ("Embarazos múltiples", ContingencyTable::new(0, 10, 5, 20)),
    ] {
        collector.push(ComparisonResult {
            year: 2020,
            exposure: "Madres menores de 30".to_string(),
            outcome: outcome.to_string(),
            table,
            estimate: estimator.estimate(&table),
        });
    }
    collector.push(ComparisonResult {
        year: 2021,
        exposure: "Madres mayores de 30".to_string(),
        outcome: "Bebés femeninos".to_string(),
        table: ContingencyTable::new(1, 0, 1, 0),
        estimate: Estimate::DivisionByZero,
    });
    collector.finish(0.05)
}

#[test]
fn xlsx_has_fixed_header_numbers_and_sentinel_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resultados.xlsx");
    write_results(&sample_table(), &path).unwrap();

    let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
    let sheet = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range(&sheet).unwrap();
    let rows: Vec<&[Data]> = range.rows().collect();
    assert_eq!(rows.len(), 4);

    let header: Vec<String> = rows[0].iter().map(ToString::to_string).collect();
    assert_eq!(header, RESULT_COLUMNS);

    assert_eq!(rows[1][0], Data::Float(2020.0));
    assert_eq!(rows[1][2], Data::String("Bebés <= 2500g".to_string()));
    assert!(matches!(rows[1][3], Data::Float(v) if (v - 2.25).abs() < 1e-12));
    assert!(matches!(rows[1][4], Data::Float(p) if (0.0..=1.0).contains(&p)));

    assert_eq!(rows[2][3], Data::String(ZERO_CELL_LABEL.to_string()));
    for cell in &rows[2][4..] {
        assert_eq!(*cell, Data::String(NOT_AVAILABLE_LABEL.to_string()));
    }
    assert_eq!(rows[3][3], Data::String(DIVISION_BY_ZERO_LABEL.to_string()));
}

#[test]
fn csv_has_fixed_header_and_sentinel_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resultados.csv");
    write_results(&sample_table(), &path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], RESULT_COLUMNS.join(","));
    assert!(lines[1].starts_with("2020,Madres menores de 30,Bebés <= 2500g,2.25,"));
    assert_eq!(
        lines[2],
        format!(
            "2020,Madres menores de 30,Embarazos múltiples,{ZERO_CELL_LABEL},{NOT_AVAILABLE_LABEL},{NOT_AVAILABLE_LABEL},{NOT_AVAILABLE_LABEL}"
        )
    );
    assert!(lines[3].contains(DIVISION_BY_ZERO_LABEL));
}

#[test]
fn record_batch_uses_nulls_and_status_for_sentinels() {
    let batch = to_record_batch(&sample_table()).unwrap();
    assert_eq!(batch.num_rows(), 3);
    assert_eq!(batch.num_columns(), RESULT_COLUMNS.len() + 1);

    let years = batch
        .column_by_name("Año")
        .unwrap()
        .as_any()
        .downcast_ref::<Int64Array>()
        .unwrap();
    assert_eq!(years.value(2), 2021);

    let odds = batch
        .column_by_name("Odds Ratio")
        .unwrap()
        .as_any()
        .downcast_ref::<Float64Array>()
        .unwrap();
    assert!((odds.value(0) - 2.25).abs() < 1e-12);
    assert!(odds.is_null(1));
    assert!(odds.is_null(2));

    let status = batch
        .column_by_name(STATUS_COLUMN)
        .unwrap()
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(status.value(0), "computed");
    assert_eq!(status.value(1), "zero_cell");
    assert_eq!(status.value(2), "division_by_zero");
}

#[test]
fn parquet_round_trips_row_count_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resultados.parquet");
    write_results(&sample_table(), &path).unwrap();

    let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap()).unwrap();
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    assert_eq!(&names[..RESULT_COLUMNS.len()], RESULT_COLUMNS.map(String::from).as_slice());

    let rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
    assert_eq!(rows, 3);
}

#[test]
fn json_export_tags_each_estimate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resultados.json");
    write_results(&sample_table(), &path).unwrap();

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["estimate"]["status"], "computed");
    assert_eq!(rows[0]["table"]["a"], 10);
    assert_eq!(rows[1]["estimate"]["status"], "zero_cell");
}

#[test]
fn unknown_output_format_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resultados.ods");
    assert!(matches!(
        write_results(&sample_table(), &path),
        Err(OddsError::UnsupportedFormat(_))
    ));
}
