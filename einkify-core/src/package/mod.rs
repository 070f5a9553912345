//! EPUB packaging for image-only, fixed-layout books
//!
//! The package layout is fixed:
//!
//! ```text
//! mimetype
//! META-INF/container.xml
//! OEBPS/content.opf
//! OEBPS/toc.ncx
//! OEBPS/nav.xhtml
//! OEBPS/Text/style.css
//! OEBPS/Text/<page>.xhtml
//! OEBPS/Images/cover.<ext>
//! OEBPS/Images/<page image>
//! ```

mod archive;
mod builder;
mod container;
pub mod inspect;
mod navigation;
mod opf;
mod page;
mod skeleton;

pub use archive::archive;
pub use builder::EbookBuilder;
pub(crate) use builder::scratch_dir;
pub use container::container_xml;
pub use inspect::{PackageSummary, ValidationIssue};
pub use navigation::{nav_xhtml, toc_ncx};
pub use opf::content_opf;
pub use page::{page_document, write_page};
pub use skeleton::{Skeleton, STYLESHEET};

use crate::imaging::ImageInfo;
use crate::types::{PackageHref, PackageMetadata};

/// Content of the `mimetype` entry
pub const MIMETYPE: &str = "application/epub+zip";

/// Media type of XHTML documents
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// `mimetype` marker entry
pub fn mimetype_href() -> PackageHref {
    PackageHref::new("mimetype")
}

/// `META-INF` folder
pub fn meta_inf_href() -> PackageHref {
    PackageHref::new("META-INF")
}

/// Folder holding the OPF and navigation documents
pub fn content_root_href() -> PackageHref {
    PackageHref::new("OEBPS")
}

/// Folder holding the stylesheet and page documents
pub fn text_href() -> PackageHref {
    content_root_href().join("Text")
}

/// Folder holding the cover and page images
pub fn images_href() -> PackageHref {
    content_root_href().join("Images")
}

/// Location of the content manifest
pub fn opf_href() -> PackageHref {
    content_root_href().join("content.opf")
}

/// Output naming variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFlavor {
    /// Plain EPUB 3
    Epub,
    /// EPUB named for Kobo readers
    #[default]
    Kepub,
}

impl OutputFlavor {
    /// Look up a flavor by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "epub" => Some(OutputFlavor::Epub),
            "kepub" | "kepub.epub" | "kobo" => Some(OutputFlavor::Kepub),
            _ => None,
        }
    }

    /// Format name (e.g., "EPUB")
    pub fn format_name(&self) -> &str {
        match self {
            OutputFlavor::Epub => "EPUB",
            OutputFlavor::Kepub => "KEPUB",
        }
    }

    /// File extension for this flavor
    pub fn file_extension(&self) -> &str {
        match self {
            OutputFlavor::Epub => "epub",
            OutputFlavor::Kepub => "kepub.epub",
        }
    }

    /// Default output file name for a title
    pub fn default_file_name(&self, title: &str) -> String {
        format!("{}.{}", title, self.file_extension())
    }
}

/// One page of the assembled package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// Page document, e.g. `OEBPS/Text/001.xhtml`
    pub document: PackageHref,

    /// Page image, e.g. `OEBPS/Images/001.jpg`
    pub image: PackageHref,

    /// Probed size and format of the image
    pub info: ImageInfo,
}

impl PageEntry {
    /// Manifest id of the page document
    pub fn page_id(&self) -> String {
        format!("page_{}", self.document.file_name())
    }

    /// Manifest id of the page image
    pub fn image_id(&self) -> String {
        format!("img_{}", self.image.file_name())
    }
}

/// Everything the descriptors need to know about one build
#[derive(Debug, Clone)]
pub struct PackageContents {
    pub metadata: PackageMetadata,

    /// Pages in reading order
    pub pages: Vec<PageEntry>,

    /// Cover image copy
    pub cover: PackageHref,

    /// Media type of the cover image
    pub cover_media_type: &'static str,
}

impl PackageContents {
    /// First page in reading order, the single navigation target
    pub fn first_page(&self) -> Option<&PageEntry> {
        self.pages.first()
    }
}

/// Escape XML special characters
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavor_lookup() {
        assert_eq!(OutputFlavor::from_name("EPUB"), Some(OutputFlavor::Epub));
        assert_eq!(OutputFlavor::from_name("kepub.epub"), Some(OutputFlavor::Kepub));
        assert_eq!(OutputFlavor::from_name("pdf"), None);
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(OutputFlavor::Kepub.default_file_name("Vol 1"), "Vol 1.kepub.epub");
        assert_eq!(OutputFlavor::Epub.default_file_name("Vol 1"), "Vol 1.epub");
    }

    #[test]
    fn test_layout_hrefs() {
        assert_eq!(text_href().as_str(), "OEBPS/Text");
        assert_eq!(images_href().as_str(), "OEBPS/Images");
        assert_eq!(opf_href().as_str(), "OEBPS/content.opf");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"Tom & "Jerry" <1>"#), "Tom &amp; &quot;Jerry&quot; &lt;1&gt;");
    }
}
