//! Batch conversion command implementation

use super::conversion_options;
use anyhow::{bail, Context, Result};
use einkify_core::extract::{get_title, ARCHIVE_EXTENSIONS};
use einkify_core::{ConvertOptions, OutputFlavor};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Batch convert every comic archive in `input_dir`
pub fn batch(
    input_dir: &Path,
    output_dir: &Path,
    profile: Option<&Path>,
    manga: bool,
    format: &str,
    jobs: usize,
) -> Result<()> {
    let options = conversion_options(profile, manga, format)?;

    // Ensure output directory exists
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    // Find all supported archives
    let mut files: Vec<PathBuf> = fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read {}", input_dir.display()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_archive(p))
        .collect();
    files.sort();

    if files.is_empty() {
        println!("No comic archives found in {}", input_dir.display());
        return Ok(());
    }

    let planned = plan_outputs(&files, output_dir, options.flavor)?;

    println!("Found {} archives to convert", files.len());

    let multi_progress = MultiProgress::new();
    let overall_pb = multi_progress.add(ProgressBar::new(files.len() as u64));
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );

    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build worker pool")?;

    pool.install(|| {
        planned.par_iter().for_each(|(file_path, output_file)| {
            match process_file(file_path, output_file, &options) {
                Ok(written) => {
                    success_count.fetch_add(1, Ordering::Relaxed);
                    tracing::info!("Converted {:?} -> {:?}", file_path, written);
                }
                Err(e) => {
                    error_count.fetch_add(1, Ordering::Relaxed);
                    tracing::error!("Failed to convert {:?}: {:#}", file_path, e);
                }
            }

            overall_pb.inc(1);
        })
    });

    overall_pb.finish();

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    println!("\nBatch conversion complete:");
    println!("  Success: {}", success);
    println!("  Errors:  {}", errors);

    if errors > 0 {
        bail!("Batch conversion completed with {} errors", errors);
    }

    Ok(())
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ARCHIVE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Pair every archive with its output file
///
/// Fails before any conversion starts when two archives share a stem
/// (`vol1.cbz`, `vol1.cbr`) and would write the same file concurrently.
fn plan_outputs(
    files: &[PathBuf],
    output_dir: &Path,
    flavor: OutputFlavor,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut claimed: HashMap<PathBuf, &Path> = HashMap::new();
    let mut plan = Vec::with_capacity(files.len());

    for file in files {
        let output_file = output_dir.join(flavor.default_file_name(&get_title(file)));
        if let Some(other) = claimed.insert(output_file.clone(), file) {
            bail!(
                "{} and {} would both write {}; rename one of them",
                other.display(),
                file.display(),
                output_file.display()
            );
        }
        plan.push((file.clone(), output_file));
    }

    Ok(plan)
}

fn process_file(input_path: &Path, output_file: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    let options = ConvertOptions {
        output: Some(output_file.to_path_buf()),
        ..options.clone()
    };

    einkify_core::convert(input_path, &options)
        .with_context(|| format!("Failed to convert {}", input_path.display()))
}
