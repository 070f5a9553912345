//! Page image discovery, conversion and probing

use crate::error::ImageError;
use crate::profile::Profile;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File extensions recognised as page images
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "tiff", "webp"];

/// Pixel size and decoded format of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

impl ImageInfo {
    /// Media type derived from the decoded format, not the file name
    pub fn media_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Check whether a path has one of the recognised image extensions
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// List image files under `dir`, relative to it, sorted by their `/`-joined path
///
/// The sort defines reading order, so it must not depend on the filesystem.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>, ImageError> {
    if !dir.is_dir() {
        return Err(ImageError::MissingDirectory(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() || !has_image_extension(entry.path()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(dir) {
            paths.push(relative.to_path_buf());
        }
    }

    paths.sort_by_cached_key(|p| sort_key(p));
    tracing::debug!(dir = %dir.display(), count = paths.len(), "Discovered images");
    Ok(paths)
}

fn sort_key(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read dimensions and format from encoded image bytes
pub fn probe(bytes: &[u8], path: &Path) -> Result<ImageInfo, ImageError> {
    let decode_err = |message: String| ImageError::Decode {
        path: path.to_path_buf(),
        message,
    };

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?;
    let format = reader
        .format()
        .ok_or_else(|| decode_err("unrecognised image format".to_string()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| decode_err(e.to_string()))?;

    Ok(ImageInfo {
        width,
        height,
        format,
    })
}

/// Apply the profile to one decoded image
pub fn convert_image(image: DynamicImage, profile: &Profile) -> DynamicImage {
    let image = if profile.mono {
        DynamicImage::ImageLuma8(image.to_luma8())
    } else {
        image
    };

    let (max_width, max_height) = profile.bounds();
    if image.width() <= max_width && image.height() <= max_height {
        return image;
    }
    image.resize(max_width, max_height, FilterType::Lanczos3)
}

// Not every encoder accepts every colour type; JPEG has no alpha and WebP
// and GIF want RGB(A).
fn encodable(image: DynamicImage, format: ImageFormat) -> DynamicImage {
    match (format, &image) {
        (ImageFormat::Jpeg, DynamicImage::ImageLuma8(_)) => image,
        (ImageFormat::Jpeg, _) => DynamicImage::ImageRgb8(image.to_rgb8()),
        (ImageFormat::Png, _) => image,
        (_, DynamicImage::ImageLuma8(_)) => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => DynamicImage::ImageRgba8(image.to_rgba8()),
    }
}

/// Convert every image under `src` into `dst`, keeping relative paths
///
/// Output files take the profile's extension. Returns `dst`.
pub fn process_images(profile: &Profile, src: &Path, dst: &Path) -> Result<PathBuf, ImageError> {
    let paths = discover_images(src)?;
    std::fs::create_dir_all(dst)?;

    let format = profile.image_type.format();
    let mut written: HashSet<PathBuf> = HashSet::new();
    for relative in &paths {
        let input = src.join(relative);
        let image = ImageReader::open(&input)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| ImageError::Decode {
                path: input.clone(),
                message: e.to_string(),
            })?;

        let converted = encodable(convert_image(image, profile), format);

        let output = dst
            .join(relative)
            .with_extension(profile.image_type.extension());
        if !written.insert(output.clone()) {
            tracing::warn!(
                source = %input.display(),
                output = %output.display(),
                "Converted name collision, overwriting earlier image"
            );
        }
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        converted
            .save_with_format(&output, format)
            .map_err(|e| ImageError::Encode {
                path: output.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!(input = %input.display(), output = %output.display(), "Converted image");
    }

    tracing::info!(count = paths.len(), "Processed images");
    Ok(dst.to_path_buf())
}
