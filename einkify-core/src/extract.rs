//! Comic archive extraction
//!
//! `.cbz` and `.cbr` files are accepted by extension, but the container is
//! identified by its magic bytes: plenty of `.cbr` files in the wild are zip
//! archives. RAR containers are unpacked with `unrar` when the `rar` feature
//! is enabled (the default) and reported as unsupported otherwise.

use crate::error::ExtractError;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Extensions accepted as comic archives
pub const ARCHIVE_EXTENSIONS: &[&str] = &["cbz", "zip", "cbr", "rar"];

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const ZIP_EMPTY_MAGIC: &[u8] = b"PK\x05\x06";
const RAR_MAGIC: &[u8] = b"Rar!\x1a\x07";

/// Container format detected from the file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Zip,
    Rar,
    Unknown,
}

impl Container {
    /// Identify a container from its first bytes
    pub fn sniff(header: &[u8]) -> Self {
        if header.starts_with(ZIP_MAGIC) || header.starts_with(ZIP_EMPTY_MAGIC) {
            Container::Zip
        } else if header.starts_with(RAR_MAGIC) {
            Container::Rar
        } else {
            Container::Unknown
        }
    }
}

/// Title of a book: the input file name without its last extension
pub fn get_title(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Check the input file exists and carries a comic archive extension
pub fn verify_archive(input: &Path) -> Result<(), ExtractError> {
    if !input.is_file() {
        return Err(ExtractError::NotFound(input.to_path_buf()));
    }

    let supported = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| ARCHIVE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false);

    if supported {
        Ok(())
    } else {
        Err(ExtractError::UnsupportedExtension(input.to_path_buf()))
    }
}

/// Extract `input` into `<scratch>/<file stem>` and return that directory
pub fn extract_comic(input: &Path, scratch: &Path) -> Result<PathBuf, ExtractError> {
    verify_archive(input)?;

    let mut header = [0u8; 8];
    let read = File::open(input)?.read(&mut header)?;

    let target = scratch.join(get_title(input));
    match Container::sniff(&header[..read]) {
        Container::Zip => {
            let file = BufReader::new(File::open(input)?);
            let mut archive = zip::ZipArchive::new(file)?;
            std::fs::create_dir_all(&target)?;
            archive.extract(&target)?;
            tracing::info!(
                input = %input.display(),
                entries = archive.len(),
                "Extracted archive"
            );
        }
        Container::Rar => {
            std::fs::create_dir_all(&target)?;
            let entries = extract_rar(input, &target)?;
            tracing::info!(input = %input.display(), entries, "Extracted archive");
        }
        Container::Unknown => {
            return Err(ExtractError::UnsupportedContainer(format!(
                "{} is neither a zip nor a rar archive",
                input.display()
            )));
        }
    }

    Ok(target)
}

#[cfg(feature = "rar")]
fn extract_rar(input: &Path, target: &Path) -> Result<usize, ExtractError> {
    let mut archive = unrar::Archive::new(input)
        .open_for_processing()
        .map_err(rar_error)?;
    let mut entries = 0;
    while let Some(header) = archive.read_header().map_err(rar_error)? {
        let name = header.entry().filename.clone();
        let is_file = header.entry().is_file();

        archive = if is_file && is_contained(&name) {
            entries += 1;
            header.extract_with_base(target).map_err(rar_error)?
        } else {
            if is_file {
                tracing::warn!(entry = %name.display(), "Skipping entry outside the archive root");
            }
            header.skip().map_err(rar_error)?
        };
    }
    Ok(entries)
}

#[cfg(feature = "rar")]
fn rar_error(e: impl std::fmt::Display) -> ExtractError {
    ExtractError::Rar(e.to_string())
}

#[cfg(not(feature = "rar"))]
fn extract_rar(_input: &Path, _target: &Path) -> Result<usize, ExtractError> {
    Err(ExtractError::UnsupportedContainer(
        "RAR support is disabled, rebuild with the `rar` feature or repack as .cbz".to_string(),
    ))
}

// Entry names must stay below the extraction root.
#[cfg_attr(not(feature = "rar"), allow(dead_code))]
fn is_contained(name: &Path) -> bool {
    name.components()
        .all(|c| matches!(c, std::path::Component::Normal(_) | std::path::Component::CurDir))
}
