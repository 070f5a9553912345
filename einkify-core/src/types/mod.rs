//! Core types shared by the packaging pipeline

mod asset;
mod href;
mod metadata;

pub use asset::{map_paths, ImageAsset};
pub use href::PackageHref;
pub use metadata::{PackageMetadata, ReadingDirection};
