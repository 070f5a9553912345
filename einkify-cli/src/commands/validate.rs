//! Validate command implementation

use anyhow::{bail, Context, Result};
use einkify_core::PackageSummary;
use std::path::Path;

/// Check the structure of a packaged e-book
pub fn validate(input: &Path) -> Result<()> {
    let summary = PackageSummary::read(input)
        .with_context(|| format!("Failed to read package {}", input.display()))?;

    let issues = summary.validate();
    if issues.is_empty() {
        println!("Valid package");
        println!("  Title: {}", summary.title);
        println!("  Pages: {}", summary.pages().len());
        return Ok(());
    }

    eprintln!("Invalid package {}:", input.display());
    for issue in &issues {
        eprintln!("  - {}", issue);
    }
    bail!("Validation failed with {} issue(s)", issues.len());
}
