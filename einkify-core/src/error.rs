//! Error types for einkify core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using EinkifyError
pub type Result<T> = std::result::Result<T, EinkifyError>;

/// Top-level error type for all einkify operations
#[derive(Debug, Error)]
pub enum EinkifyError {
    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Package error: {0}")]
    Package(#[from] PackageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while unpacking a comic archive
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("The file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("File is not a cbz or cbr file: {}", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("Unsupported archive container: {0}")]
    UnsupportedContainer(String),

    #[error("Invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid rar archive: {0}")]
    Rar(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while discovering, converting or probing page images
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Failed to decode {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Failed to encode {}: {message}", .path.display())]
    Encode { path: PathBuf, message: String },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while loading a profile file
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Given file is not a valid profile file: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to parse profile: {0}")]
    Parse(String),

    #[error("Invalid profile value: {0}")]
    Invalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur while assembling, archiving or reading a package
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("No images found in {}", .0.display())]
    NoImages(PathBuf),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed package: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
