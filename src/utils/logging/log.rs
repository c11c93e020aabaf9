//! Uniform log lines for reading inputs and writing results

use std::path::Path;

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `path` - Path of the file being operated on
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Past-tense verb for the operation ("read", "wrote")
/// * `path` - Path of the file that was operated on
/// * `rows` - Number of rows processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    path: &Path,
    rows: usize,
    elapsed: Option<std::time::Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!(
            "Successfully {} {} rows at {} in {:?}",
            operation,
            rows,
            path.display(),
            duration
        );
    } else {
        log::info!("Successfully {} {} rows at {}", operation, rows, path.display());
    }
}
