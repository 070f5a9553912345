//! Page images and their in-package names

use crate::sanitize::sanitize;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A page image found in the processed-images directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageAsset {
    /// Path relative to the image directory, as discovered
    pub source: PathBuf,

    /// Sanitized flat file name used inside the package
    pub flat_name: String,
}

impl ImageAsset {
    /// Create an asset from a path relative to the image directory
    pub fn new(source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let relative = source
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let flat_name = sanitize(&relative);
        Self { source, flat_name }
    }

    /// Flat name without its extension
    pub fn flat_stem(&self) -> &str {
        match self.flat_name.rfind('.') {
            Some(idx) if idx > 0 => &self.flat_name[..idx],
            _ => &self.flat_name,
        }
    }

    /// Extension of the flat name including the dot, or an empty string
    pub fn extension(&self) -> &str {
        &self.flat_name[self.flat_stem().len()..]
    }

    /// File name of the page document wrapping this image
    pub fn page_file_name(&self) -> String {
        format!("{}.xhtml", self.flat_stem())
    }

    /// Absolute location of the source image
    pub fn source_in(&self, image_dir: &Path) -> PathBuf {
        image_dir.join(&self.source)
    }
}

/// Map discovered relative paths to assets, keeping their order
pub fn map_paths<I, P>(paths: I) -> Vec<ImageAsset>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    paths.into_iter().map(ImageAsset::new).collect()
}
