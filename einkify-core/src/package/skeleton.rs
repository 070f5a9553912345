//! On-disk package skeleton

use super::{
    container_xml, content_opf, content_root_href, images_href, meta_inf_href, mimetype_href,
    nav_xhtml, opf_href, text_href, toc_ncx, write_page, PackageContents, PageEntry, MIMETYPE,
};
use crate::error::{PackageError, Result};
use crate::imaging;
use crate::types::{ImageAsset, PackageMetadata};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// The single stylesheet shared by every page
pub const STYLESHEET: &str = "@page {
margin: 0;
}
body {
display: block;
margin: 0;
padding: 0;
overflow: hidden;
}
";

/// A package being assembled under a scratch directory
#[derive(Debug, Clone)]
pub struct Skeleton {
    root: PathBuf,
}

impl Skeleton {
    /// Create the folder structure under `root`
    ///
    /// Folders that already exist are left alone.
    pub fn create(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let skeleton = Self { root: root.into() };
        for href in [text_href(), images_href(), meta_inf_href()] {
            fs::create_dir_all(href.to_path(&skeleton.root))?;
        }
        Ok(skeleton)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn text_dir(&self) -> PathBuf {
        text_href().to_path(&self.root)
    }

    pub fn images_dir(&self) -> PathBuf {
        images_href().to_path(&self.root)
    }

    /// Copy images, write page documents and all descriptors
    ///
    /// `assets` are relative to `image_dir` and in reading order; the first
    /// one becomes the cover. Assets whose flat names collide overwrite the
    /// earlier file and keep the earlier position in the reading order.
    /// Page documents and the cover copy get names no other file uses.
    pub fn populate(
        &self,
        image_dir: &Path,
        assets: &[ImageAsset],
        metadata: &PackageMetadata,
    ) -> Result<PackageContents> {
        let first = assets
            .first()
            .ok_or_else(|| PackageError::NoImages(image_dir.to_path_buf()))?;

        let text_dir = self.text_dir();
        let images_dir = self.images_dir();

        let mut names = PackageNames::new(assets);
        let cover = images_href().join(names.cover_name(first.extension()));
        let mut cover_media_type = "";

        let mut pages: Vec<PageEntry> = Vec::with_capacity(assets.len());
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for (index, asset) in assets.iter().enumerate() {
            let source = asset.source_in(image_dir);
            let bytes = fs::read(&source)?;
            let info = imaging::probe(&bytes, &source)?;

            if index == 0 {
                fs::write(cover.to_path(&self.root), &bytes)?;
                cover_media_type = info.media_type();
            }

            let page_name = names.page_name(asset);
            fs::write(images_dir.join(&asset.flat_name), &bytes)?;
            write_page(asset, &info, &text_dir, &page_name)?;

            let entry = PageEntry {
                document: text_href().join(&page_name),
                image: images_href().join(&asset.flat_name),
                info,
            };

            match positions.get(asset.flat_name.as_str()) {
                Some(&pos) => {
                    tracing::warn!(
                        source = %asset.source.display(),
                        name = %asset.flat_name,
                        "Sanitized name collision, overwriting earlier page"
                    );
                    pages[pos] = entry;
                }
                None => {
                    positions.insert(asset.flat_name.as_str(), pages.len());
                    pages.push(entry);
                }
            }
        }

        let contents = PackageContents {
            metadata: metadata.clone(),
            pages,
            cover,
            cover_media_type,
        };
        self.write_descriptors(&contents)?;

        tracing::debug!(
            root = %self.root.display(),
            pages = contents.pages.len(),
            "Populated package skeleton"
        );
        Ok(contents)
    }

    fn write_descriptors(&self, contents: &PackageContents) -> std::io::Result<()> {
        let root = &self.root;
        let content_root = content_root_href();

        fs::write(text_href().join("style.css").to_path(root), STYLESHEET)?;

        if let Some(first_page) = contents.first_page() {
            fs::write(
                content_root.join("toc.ncx").to_path(root),
                toc_ncx(&contents.metadata, first_page),
            )?;
            fs::write(
                content_root.join("nav.xhtml").to_path(root),
                nav_xhtml(&contents.metadata, first_page),
            )?;
        }

        fs::write(opf_href().to_path(root), content_opf(contents))?;
        fs::write(
            meta_inf_href().join("container.xml").to_path(root),
            container_xml(&opf_href()),
        )?;
        fs::write(mimetype_href().to_path(root), MIMETYPE)?;
        Ok(())
    }
}

/// In-package file names handed out during one build
///
/// Every distinct image name gets one page document. Page documents whose
/// stems clash (`a.jpg`, `a.png`) are numbered `a-2.xhtml`, `a-3.xhtml`, and
/// the cover copy never reuses an image name.
struct PackageNames<'a> {
    images: HashSet<&'a str>,
    pages: HashMap<&'a str, String>,
    taken_pages: HashSet<String>,
}

impl<'a> PackageNames<'a> {
    fn new(assets: &'a [ImageAsset]) -> Self {
        Self {
            images: assets.iter().map(|a| a.flat_name.as_str()).collect(),
            pages: HashMap::new(),
            taken_pages: HashSet::new(),
        }
    }

    fn cover_name(&self, extension: &str) -> String {
        let mut name = format!("cover{}", extension);
        let mut n = 2;
        while self.images.contains(name.as_str()) {
            name = format!("cover-{}{}", n, extension);
            n += 1;
        }
        name
    }

    fn page_name(&mut self, asset: &'a ImageAsset) -> String {
        if let Some(name) = self.pages.get(asset.flat_name.as_str()) {
            return name.clone();
        }

        let mut name = asset.page_file_name();
        let mut n = 2;
        while self.taken_pages.contains(&name) {
            name = format!("{}-{}.xhtml", asset.flat_stem(), n);
            n += 1;
        }
        if n > 2 {
            tracing::debug!(image = %asset.flat_name, page = %name, "Renamed clashing page document");
        }

        self.taken_pages.insert(name.clone());
        self.pages.insert(asset.flat_name.as_str(), name.clone());
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EinkifyError;
    use crate::types::map_paths;
    use image::{ImageFormat, Rgb, RgbImage};

    #[test]
    fn test_create_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("OEBPS").join("Text")).unwrap();

        let skeleton = Skeleton::create(dir.path()).unwrap();
        Skeleton::create(dir.path()).unwrap();

        assert!(skeleton.text_dir().is_dir());
        assert!(skeleton.images_dir().is_dir());
        assert!(dir.path().join("META-INF").is_dir());
    }

    #[test]
    fn test_populate_requires_images() {
        let dir = tempfile::tempdir().unwrap();
        let skeleton = Skeleton::create(dir.path().join("book")).unwrap();
        let err = skeleton
            .populate(dir.path(), &[], &PackageMetadata::new("Empty"))
            .unwrap_err();
        assert!(matches!(err, EinkifyError::Package(PackageError::NoImages(_))));
    }

    #[test]
    fn test_populate_writes_layout() {
        let dir = tempfile::tempdir().unwrap();
        let images = dir.path().join("images");
        fs::create_dir_all(&images).unwrap();
        RgbImage::from_pixel(6, 9, Rgb([0, 0, 0]))
            .save_with_format(images.join("01.png"), ImageFormat::Png)
            .unwrap();

        let skeleton = Skeleton::create(dir.path().join("book")).unwrap();
        let contents = skeleton
            .populate(&images, &[ImageAsset::new("01.png")], &PackageMetadata::new("One"))
            .unwrap();

        let root = skeleton.root();
        for file in [
            "mimetype",
            "META-INF/container.xml",
            "OEBPS/content.opf",
            "OEBPS/toc.ncx",
            "OEBPS/nav.xhtml",
            "OEBPS/Text/style.css",
            "OEBPS/Text/01.xhtml",
            "OEBPS/Images/01.png",
            "OEBPS/Images/cover.png",
        ] {
            assert!(root.join(file).is_file(), "missing {file}");
        }
        assert_eq!(fs::read_to_string(root.join("mimetype")).unwrap(), MIMETYPE);
        assert_eq!(contents.cover_media_type, "image/png");
        assert_eq!((contents.pages[0].info.width, contents.pages[0].info.height), (6, 9));
    }

    #[test]
    fn test_page_names_for_clashing_stems() {
        let assets = map_paths(["a.jpg", "a.png", "a-2.jpg", "a.jpg"]);
        let mut names = PackageNames::new(&assets);

        assert_eq!(names.page_name(&assets[0]), "a.xhtml");
        assert_eq!(names.page_name(&assets[1]), "a-2.xhtml");
        assert_eq!(names.page_name(&assets[2]), "a-2-2.xhtml");
        // Same image name, same page document
        assert_eq!(names.page_name(&assets[3]), "a.xhtml");
    }

    #[test]
    fn test_cover_name_avoids_images() {
        let assets = map_paths(["a.jpg", "cover.jpg", "cover-2.jpg"]);
        let names = PackageNames::new(&assets);
        assert_eq!(names.cover_name(".jpg"), "cover-3.jpg");
        assert_eq!(names.cover_name(".png"), "cover.png");
    }
}
