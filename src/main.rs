use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use birth_odds::{AnalysisConfig, StratifiedRunner, load_records, write_results};
use log::info;

/// Input used when no path is given
const DEFAULT_INPUT: &str = "datos_procesados3.csv";
/// Output used when no path is given
const DEFAULT_OUTPUT: &str = "resultados_odds_ratios_ci_por_ano.xlsx";
/// Environment variable naming an optional JSON configuration file
const CONFIG_ENV: &str = "BIRTH_ODDS_CONFIG";

fn load_config() -> anyhow::Result<AnalysisConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            info!("Loading analysis configuration from {}", path.display());
            AnalysisConfig::from_json_file(&path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))
        }
        None => Ok(AnalysisConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1);
    let input = args.next().map_or_else(|| PathBuf::from(DEFAULT_INPUT), PathBuf::from);
    let output = args.next().map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), PathBuf::from);

    let config = load_config()?;
    info!("{config}");

    let start = Instant::now();
    let records = load_records(&input)
        .with_context(|| format!("Failed to load records from {}", input.display()))?;

    let runner = StratifiedRunner::new(config).context("Invalid analysis configuration")?;
    let results = runner
        .run(&records)
        .with_context(|| format!("Analysis of {} failed", input.display()))?;
    info!("{results}");

    write_results(&results, &output)
        .with_context(|| format!("Failed to write results to {}", output.display()))?;

    info!(
        "Results saved to '{}' in {:?}",
        output.display(),
        start.elapsed()
    );
    Ok(())
}
