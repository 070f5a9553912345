//! Build orchestration: images directory in, packaged book out

use super::{archive, OutputFlavor, Skeleton};
use crate::error::{PackageError, Result};
use crate::imaging::discover_images;
use crate::types::{map_paths, PackageMetadata, ReadingDirection};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Builds one package from a directory of page images
#[derive(Debug, Clone)]
pub struct EbookBuilder {
    title: String,
    reading_direction: ReadingDirection,
    flavor: OutputFlavor,
    identifier: Option<Uuid>,
    scratch_parent: Option<PathBuf>,
}

impl EbookBuilder {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reading_direction: ReadingDirection::default(),
            flavor: OutputFlavor::default(),
            identifier: None,
            scratch_parent: None,
        }
    }

    /// Set the page progression of the spine
    pub fn reading_direction(mut self, direction: ReadingDirection) -> Self {
        self.reading_direction = direction;
        self
    }

    /// Set the flavor used to name the default output file
    pub fn flavor(mut self, flavor: OutputFlavor) -> Self {
        self.flavor = flavor;
        self
    }

    /// Use a fixed package identifier instead of a fresh one
    pub fn identifier(mut self, identifier: Uuid) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// Create the scratch directory under `dir` instead of the system temp dir
    pub fn scratch_in(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_parent = Some(dir.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Output path used when none is given: `<title>.<ext>` in the working directory
    pub fn default_output(&self) -> PathBuf {
        PathBuf::from(self.flavor.default_file_name(&self.title))
    }

    /// Package the images under `image_dir` and write the book to `output`
    ///
    /// Fails with [`PackageError::NoImages`] before anything is written when
    /// the directory holds no images. The scratch directory is removed
    /// whether or not the build succeeds.
    pub fn build(&self, image_dir: &Path, output: Option<&Path>) -> Result<PathBuf> {
        let assets = map_paths(discover_images(image_dir)?);
        if assets.is_empty() {
            return Err(PackageError::NoImages(image_dir.to_path_buf()).into());
        }

        let scratch = scratch_dir(self.scratch_parent.as_deref())?;
        let skeleton = Skeleton::create(scratch.path().join("ebook"))?;

        let mut metadata =
            PackageMetadata::new(&self.title).with_reading_direction(self.reading_direction);
        if let Some(identifier) = self.identifier {
            metadata = metadata.with_identifier(identifier);
        }

        tracing::info!(
            title = %self.title,
            pages = assets.len(),
            identifier = %metadata.identifier,
            "Assembling package"
        );

        skeleton.populate(image_dir, &assets, &metadata)?;

        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_output());
        let written = archive(skeleton.root(), &output)?;

        scratch.close()?;
        Ok(written)
    }
}

/// Fresh scratch directory, removed when the handle drops
pub(crate) fn scratch_dir(parent: Option<&Path>) -> std::io::Result<TempDir> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("einkify-");
    match parent {
        Some(dir) => builder.tempdir_in(dir),
        None => builder.tempdir(),
    }
}
