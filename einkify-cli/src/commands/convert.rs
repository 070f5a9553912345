//! Convert command implementation

use super::conversion_options;
use anyhow::{Context, Result};
use einkify_core::extract::get_title;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Convert one comic archive into an e-book
pub fn convert(
    input: &Path,
    output: Option<PathBuf>,
    profile: Option<&Path>,
    manga: bool,
    format: &str,
) -> Result<()> {
    let mut options = conversion_options(profile, manga, format)?;
    options.output = output;

    let title = get_title(input);
    tracing::debug!(?options, "Resolved conversion options");

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!(
        "Converting '{}' to {}...",
        title,
        options.flavor.format_name()
    ));

    let result = einkify_core::convert(input, &options)
        .with_context(|| format!("Failed to convert {}", input.display()));

    match result {
        Ok(written) => {
            pb.finish_and_clear();
            tracing::info!("Converted '{}' -> {:?}", title, written);
            println!("{}", written.display());
            Ok(())
        }
        Err(e) => {
            pb.abandon();
            Err(e)
        }
    }
}
