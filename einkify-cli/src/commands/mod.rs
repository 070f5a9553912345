//! CLI command implementations

mod batch;
mod convert;
mod info;
mod validate;

pub use batch::batch;
pub use convert::convert;
pub use info::info;
pub use validate::validate;

use anyhow::{Context, Result};
use einkify_core::{ConvertOptions, OutputFlavor, Profile, ReadingDirection};
use std::path::Path;

/// Options shared by `convert` and `batch`
fn conversion_options(profile: Option<&Path>, manga: bool, format: &str) -> Result<ConvertOptions> {
    let flavor = OutputFlavor::from_name(format)
        .with_context(|| format!("Unknown output format '{}' (expected epub or kepub)", format))?;

    let profile = Profile::load_or_default(profile).context("Failed to load profile")?;

    let reading_direction = if manga {
        ReadingDirection::RightToLeft
    } else {
        ReadingDirection::LeftToRight
    };

    Ok(ConvertOptions {
        profile,
        reading_direction,
        flavor,
        output: None,
        scratch_dir: None,
    })
}
