//! Zip serialization of an assembled package

use super::mimetype_href;
use crate::error::PackageError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Zip every file under `root` into `output`
///
/// The `mimetype` entry is written first and stored uncompressed, as the
/// container format requires; everything else is deflated. Entry names are
/// `/`-separated paths relative to `root`. An existing `output` is replaced.
pub fn archive(root: &Path, output: &Path) -> Result<PathBuf, PackageError> {
    let mimetype = mimetype_href();
    let mimetype_path = mimetype.to_path(root);
    if !mimetype_path.is_file() {
        return Err(PackageError::Malformed(format!(
            "{} has no mimetype entry",
            root.display()
        )));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| PackageError::Io(e.into()))?;
        if !entry.file_type().is_file() || entry.path() == mimetype_path {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            entries.push((entry_name(relative), entry.path().to_path_buf()));
        }
    }

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut zip = ZipWriter::new(BufWriter::new(File::create(output)?));

    zip.start_file(mimetype.as_str(), stored)?;
    zip.write_all(&std::fs::read(&mimetype_path)?)?;

    for (name, path) in &entries {
        zip.start_file(name.as_str(), deflated)?;
        let mut file = File::open(path)?;
        std::io::copy(&mut file, &mut zip)?;
    }

    let mut writer = zip.finish()?;
    writer.flush()?;

    tracing::info!(
        output = %output.display(),
        entries = entries.len() + 1,
        "Wrote package"
    );
    Ok(output.to_path_buf())
}

fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
