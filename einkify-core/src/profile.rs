//! Image-processing profiles
//!
//! A profile file is a flat YAML mapping. Any subset of the recognised keys
//! may be given; the rest fall back to [`Profile::default`]. Unknown keys are
//! rejected when the file is loaded.
//!
//! ```yaml
//! mono: true
//! type: png
//! max_width: 1264
//! max_height: 1680
//! zoom_factor: 1
//! ```

use crate::error::ProfileError;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default bounding box width in pixels
pub const DEFAULT_MAX_WIDTH: u32 = 1072;

/// Default bounding box height in pixels
pub const DEFAULT_MAX_HEIGHT: u32 = 1448;

/// Default zoom factor applied to the bounding box
pub const DEFAULT_ZOOM_FACTOR: u32 = 1;

/// Output encoding for processed page images
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    #[serde(alias = "jpeg")]
    Jpg,
    Png,
    Gif,
    Bmp,
    #[serde(alias = "tif")]
    Tiff,
    Webp,
}

impl ImageType {
    /// Encoder format used by the `image` crate
    pub fn format(self) -> ImageFormat {
        match self {
            ImageType::Jpg => ImageFormat::Jpeg,
            ImageType::Png => ImageFormat::Png,
            ImageType::Gif => ImageFormat::Gif,
            ImageType::Bmp => ImageFormat::Bmp,
            ImageType::Tiff => ImageFormat::Tiff,
            ImageType::Webp => ImageFormat::WebP,
        }
    }

    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ImageType::Jpg => "jpg",
            ImageType::Png => "png",
            ImageType::Gif => "gif",
            ImageType::Bmp => "bmp",
            ImageType::Tiff => "tiff",
            ImageType::Webp => "webp",
        }
    }
}

/// Fully populated image-processing configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Convert pages to grayscale
    pub mono: bool,

    /// Output image encoding
    #[serde(rename = "type")]
    pub image_type: ImageType,

    /// Bounding box width before zoom
    pub max_width: u32,

    /// Bounding box height before zoom
    pub max_height: u32,

    /// Multiplier applied to the bounding box
    pub zoom_factor: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            mono: false,
            image_type: ImageType::Jpg,
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
        }
    }
}

impl Profile {
    /// Load a profile file and merge it over the defaults
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        if !path.is_file() {
            return Err(ProfileError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        let overrides = ProfileOverrides::parse(&text)?;
        let profile = overrides.merge(Profile::default());
        profile.validate()?;

        tracing::debug!(?path, ?profile, "Loaded profile");
        Ok(profile)
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ProfileError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Bounding box after applying the zoom factor
    pub fn bounds(&self) -> (u32, u32) {
        (
            self.max_width.saturating_mul(self.zoom_factor),
            self.max_height.saturating_mul(self.zoom_factor),
        )
    }

    fn validate(&self) -> Result<(), ProfileError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(ProfileError::Invalid(
                "max_width and max_height must be positive".to_string(),
            ));
        }
        if self.zoom_factor == 0 {
            return Err(ProfileError::Invalid(
                "zoom_factor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partially populated profile as read from a file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProfileOverrides {
    pub mono: Option<bool>,
    #[serde(rename = "type")]
    pub image_type: Option<ImageType>,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
    pub zoom_factor: Option<u32>,
}

impl ProfileOverrides {
    /// Parse YAML text; an empty document yields no overrides
    pub fn parse(text: &str) -> Result<Self, ProfileError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_saphyr::from_str(text).map_err(|e| ProfileError::Parse(e.to_string()))
    }

    /// Apply the overrides on top of `base`
    pub fn merge(self, base: Profile) -> Profile {
        Profile {
            mono: self.mono.unwrap_or(base.mono),
            image_type: self.image_type.unwrap_or(base.image_type),
            max_width: self.max_width.unwrap_or(base.max_width),
            max_height: self.max_height.unwrap_or(base.max_height),
            zoom_factor: self.zoom_factor.unwrap_or(base.zoom_factor),
        }
    }
}
