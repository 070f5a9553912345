//! Comic archive to e-book conversion

use crate::error::Result;
use crate::extract::{extract_comic, get_title, verify_archive};
use crate::imaging::process_images;
use crate::package::{scratch_dir, EbookBuilder, OutputFlavor};
use crate::profile::Profile;
use crate::types::ReadingDirection;
use std::path::{Path, PathBuf};

/// Options for one conversion
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Image-processing profile
    pub profile: Profile,

    /// Page progression of the resulting book
    pub reading_direction: ReadingDirection,

    /// Naming variant of the default output file
    pub flavor: OutputFlavor,

    /// Output file; defaults to `<title>.<flavor extension>` in the working directory
    pub output: Option<PathBuf>,

    /// Parent of the scratch directory; defaults to the system temp dir
    pub scratch_dir: Option<PathBuf>,
}

/// Convert a `.cbz`/`.cbr` file into a packaged e-book
///
/// Extraction and image processing happen in a scratch directory that is
/// removed when this returns, whether or not the conversion succeeded.
pub fn convert(input: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    verify_archive(input)?;

    let scratch = scratch_dir(options.scratch_dir.as_deref())?;
    let title = get_title(input);

    let extracted = extract_comic(input, &scratch.path().join("extract"))?;
    let processed = process_images(&options.profile, &extracted, &scratch.path().join("convert"))?;

    let mut builder = EbookBuilder::new(title)
        .reading_direction(options.reading_direction)
        .flavor(options.flavor);
    if let Some(dir) = &options.scratch_dir {
        builder = builder.scratch_in(dir);
    }
    let written = builder.build(&processed, options.output.as_deref())?;

    scratch.close()?;
    Ok(written)
}
