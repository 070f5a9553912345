//! Info command implementation

use anyhow::{Context, Result};
use einkify_core::PackageSummary;
use serde::Serialize;
use std::path::Path;

/// Package info output
#[derive(Serialize)]
struct PackageInfo {
    title: String,
    identifier: String,
    reading_direction: String,
    pages: usize,
    images: usize,
    cover: Option<String>,
    entries: usize,
}

/// Display information about a packaged e-book
pub fn info(input: &Path, json: bool) -> Result<()> {
    let summary = PackageSummary::read(input)
        .with_context(|| format!("Failed to read package {}", input.display()))?;

    let info = PackageInfo {
        title: summary.title.clone(),
        identifier: summary.identifier.clone(),
        reading_direction: summary
            .reading_direction()
            .unwrap_or_default()
            .page_progression()
            .to_string(),
        pages: summary.pages().len(),
        images: summary.images().count(),
        cover: summary.cover().map(|item| item.href.clone()),
        entries: summary.entries.len(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Title:       {}", info.title);
        println!("Identifier:  {}", info.identifier);
        println!("Direction:   {}", info.reading_direction);
        println!("Pages:       {}", info.pages);
        println!("Images:      {}", info.images);
        if let Some(cover) = &info.cover {
            println!("Cover:       {}", cover);
        }
        println!("Entries:     {}", info.entries);
    }

    Ok(())
}
