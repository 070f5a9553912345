//! einkify core library
//!
//! Converts comic-book archives into fixed-layout, image-only EPUB packages
//! for e-readers. The packaging half ([`package`]) takes a directory of page
//! images and produces the book; [`extract`], [`imaging`] and [`profile`]
//! get a comic archive into that shape.

pub mod error;
pub mod extract;
pub mod imaging;
pub mod package;
pub mod pipeline;
pub mod profile;
pub mod sanitize;
pub mod types;

pub use error::{EinkifyError, ExtractError, ImageError, PackageError, ProfileError, Result};
pub use package::{EbookBuilder, OutputFlavor, PackageSummary, ValidationIssue};
pub use pipeline::{convert, ConvertOptions};
pub use profile::{ImageType, Profile};
pub use sanitize::sanitize;
pub use types::{ImageAsset, PackageHref, PackageMetadata, ReadingDirection};
