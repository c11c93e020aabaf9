//! Load → analyse → export, through files on disk

use std::fs;
use std::io::Write;

use birth_odds::{AnalysisConfig, OddsError, StratifiedRunner, load_records, write_results};

use birth_odds::config::MATERNAL_AGE;

use crate::utils::{COLUMNS, synthetic_births};

#[test]
fn csv_input_to_csv_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("datos.csv");
    let output = dir.path().join("resultados.csv");

    let mut file = fs::File::create(&input).unwrap();
    writeln!(file, "{}", COLUMNS.join(",")).unwrap();
    for birth in synthetic_births(99, &[2022, 2021], 300) {
        let codes: Vec<String> = birth.codes().iter().map(ToString::to_string).collect();
        writeln!(file, "{}", codes.join(",")).unwrap();
    }
    drop(file);

    let records = load_records(&input).unwrap();
    assert_eq!(records.num_rows(), 600);

    let config = AnalysisConfig::default().with_progress(false);
    let per_year = config.comparisons_per_year();
    let results = StratifiedRunner::new(config).unwrap().run(&records).unwrap();
    write_results(&results, &output).unwrap();

    let contents = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1 + 2 * per_year);
    assert!(lines[1].starts_with("2021,"));
    assert!(lines[per_year + 1].starts_with("2022,"));
}

#[test]
fn na_maternal_age_in_csv_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("datos.csv");
    let age_index = COLUMNS.iter().position(|c| *c == MATERNAL_AGE).unwrap();

    let mut file = fs::File::create(&input).unwrap();
    writeln!(file, "{}", COLUMNS.join(",")).unwrap();
    for (i, birth) in synthetic_births(17, &[2020], 40).into_iter().enumerate() {
        let mut codes: Vec<String> = birth.codes().iter().map(ToString::to_string).collect();
        if i == 0 {
            codes[age_index] = "NA".to_string();
        }
        writeln!(file, "{}", codes.join(",")).unwrap();
    }
    drop(file);

    let records = load_records(&input).unwrap();
    let config = AnalysisConfig::default().with_progress(false);
    let per_year = config.comparisons_per_year();
    let results = StratifiedRunner::new(config).unwrap().run(&records).unwrap();
    assert_eq!(results.len(), per_year);
    for row in &results {
        assert_eq!(row.table.total(), 40);
    }
}

#[test]
fn input_without_year_column_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("datos.csv");
    fs::write(&input, "PESO_NAC,EDAD_MADRE\n3,2\n6,7\n").unwrap();

    let records = load_records(&input).unwrap();
    let runner = StratifiedRunner::new(AnalysisConfig::default().with_progress(false)).unwrap();
    assert!(matches!(runner.run(&records), Err(OddsError::MissingColumn(_))));
}
