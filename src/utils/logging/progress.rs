//! Progress reporting for the comparison loop, using the indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};

/// Default style for the comparison progress bar
pub const DEFAULT_COMPARISON_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}) {msg}";

/// Create the progress bar that tracks comparisons
///
/// # Arguments
/// * `length` - Total number of comparisons
/// * `enabled` - When false a hidden bar is returned
///
/// # Returns
/// A configured `ProgressBar`
#[must_use]
pub fn create_comparison_progress_bar(length: u64, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(length);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(DEFAULT_COMPARISON_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message("Computing odds ratios");
    pb
}

/// Finish a progress bar with a completion message
///
/// # Arguments
/// * `pb` - The `ProgressBar` to finish
/// * `message` - Optional completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        pb.finish_with_message(msg.to_string());
    } else {
        pb.finish();
    }
}
