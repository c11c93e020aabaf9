//! Tests for the year-stratified runner

use birth_odds::config::{MATERNAL_AGE, default_exposures, default_groups};
use birth_odds::filter::in_filter;
use birth_odds::{
    AnalysisConfig, ContingencyTable, Estimate, NamedPredicate, OddsError, StratifiedRunner,
    run_stratified,
};

use crate::utils::{Birth, births, births_missing_age, synthetic_births};

fn quiet_config() -> AnalysisConfig {
    AnalysisConfig::default().with_progress(false)
}

#[test]
fn two_years_produce_every_comparison_grouped_by_year() {
    let records = births(&synthetic_births(7, &[2021, 2020], 400));
    let table = run_stratified(&records, &quiet_config()).unwrap();

    let groups = default_groups();
    let exposures = default_exposures();
    assert_eq!(table.len(), 2 * exposures.len() * groups.len());
    assert_eq!(table.years(), vec![2020, 2021]);

    let per_year = exposures.len() * groups.len();
    for (i, row) in table.rows().iter().enumerate() {
        let year_index = i / per_year;
        let within_year = i % per_year;
        assert_eq!(row.year, [2020, 2021][year_index]);
        assert_eq!(row.exposure, exposures[within_year / groups.len()].name);
        assert_eq!(row.outcome, groups[within_year % groups.len()].name);
    }
}

#[test]
fn tables_cover_the_whole_stratum() {
    let records = births(&synthetic_births(11, &[2019, 2020], 250));
    let table = run_stratified(&records, &quiet_config()).unwrap();
    for row in &table {
        assert_eq!(row.table.total(), 250);
    }
}

#[test]
fn running_twice_gives_identical_tables() {
    let records = births(&synthetic_births(42, &[2018, 2019, 2020], 300));
    let runner = StratifiedRunner::new(quiet_config()).unwrap();
    let first = runner.run(&records).unwrap();
    let second = runner.run(&records).unwrap();
    assert_eq!(first, second);
}

#[test]
fn exposure_against_itself_is_a_zero_cell() {
    let mut rows = Vec::new();
    for age in [1, 2, 6, 7, 3] {
        rows.push(Birth::typical(2020, age));
    }
    let younger = in_filter(MATERNAL_AGE, 1..=4);
    let config = quiet_config()
        .with_exposures(vec![NamedPredicate::new("Madres menores de 30", younger.clone())])
        .with_groups(vec![NamedPredicate::new("Madres menores de 30", younger)]);

    let table = run_stratified(&births(&rows), &config).unwrap();
    assert_eq!(table.len(), 1);
    let row = &table.rows()[0];
    assert_eq!(row.table, ContingencyTable::new(3, 0, 0, 2));
    assert_eq!(row.estimate, Estimate::ZeroCell);
}

#[test]
fn group_membership_is_evaluated_per_year() {
    let mut rows = Vec::new();
    // 2020: low weight only among younger mothers
    for _ in 0..4 {
        rows.push(Birth { weight: 2, ..Birth::typical(2020, 2) });
        rows.push(Birth::typical(2020, 2));
        rows.push(Birth::typical(2020, 7));
    }
    rows.push(Birth { weight: 3, ..Birth::typical(2020, 6) });
    // 2021: every cell populated
    for _ in 0..3 {
        rows.push(Birth { weight: 1, ..Birth::typical(2021, 1) });
        rows.push(Birth::typical(2021, 1));
        rows.push(Birth { weight: 4, ..Birth::typical(2021, 8) });
        rows.push(Birth::typical(2021, 8));
        rows.push(Birth::typical(2021, 8));
    }
    let config = quiet_config().with_groups(vec![default_groups().remove(0)]);
    let table = run_stratified(&births(&rows), &config).unwrap();

    assert_eq!(table.len(), 4);
    let younger_2020 = &table.rows()[0];
    assert_eq!(younger_2020.table, ContingencyTable::new(4, 4, 1, 4));
    let older_2020 = &table.rows()[1];
    assert_eq!(older_2020.table, ContingencyTable::new(1, 4, 4, 4));

    let younger_2021 = &table.rows()[2];
    assert_eq!(younger_2021.year, 2021);
    assert_eq!(younger_2021.table, ContingencyTable::new(3, 3, 3, 6));
    let odds_ratio = younger_2021.odds_ratio().unwrap();
    assert!((odds_ratio - 2.0).abs() < 1e-12);
}

#[test]
fn missing_age_code_counts_as_unexposed() {
    let low = |age| Birth { weight: 2, ..Birth::typical(2020, age) };
    let rows = vec![
        low(2),
        low(2),
        Birth::typical(2020, 2),
        low(7),
        Birth::typical(2020, 7),
        Birth::typical(2020, 7),
        low(3),
        Birth::typical(2020, 8),
    ];
    // The last two births have no recorded maternal age
    let records = births_missing_age(&rows, &[6, 7]);
    let config = quiet_config().with_groups(vec![default_groups().remove(0)]);
    let table = run_stratified(&records, &config).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.rows()[0].table, ContingencyTable::new(2, 1, 2, 3));
    assert_eq!(table.rows()[1].table, ContingencyTable::new(1, 2, 3, 2));
    for row in &table {
        assert_eq!(row.table.total(), 8);
    }
}

#[test]
fn progress_bar_does_not_change_results() {
    let records = births(&synthetic_births(5, &[2020, 2021], 200));
    let with_bar = run_stratified(&records, &AnalysisConfig::default().with_progress(true)).unwrap();
    let without_bar = run_stratified(&records, &quiet_config()).unwrap();
    assert_eq!(with_bar, without_bar);
}

#[test]
fn missing_column_aborts_before_any_comparison() {
    let records = births(&synthetic_births(3, &[2020], 50));
    let config = quiet_config().with_groups(vec![NamedPredicate::new(
        "Partos por cesárea",
        in_filter("TIPO_PARTO", [2]),
    )]);
    let err = run_stratified(&records, &config).unwrap_err();
    assert!(matches!(err, OddsError::MissingColumn(column) if column == "TIPO_PARTO"));
}

#[test]
fn invalid_alpha_is_rejected_by_the_runner() {
    assert!(matches!(
        StratifiedRunner::new(quiet_config().with_alpha(2.0)),
        Err(OddsError::ConfigError(_))
    ));
}

#[test]
fn empty_input_yields_empty_table() {
    let table = run_stratified(&births(&[]), &quiet_config()).unwrap();
    assert!(table.is_empty());
}
