//! `OEBPS/content.opf`: metadata, manifest and spine

use super::{content_root_href, escape_xml, text_href, PackageContents, XHTML_MEDIA_TYPE};

/// Build the package document
///
/// Every href is written relative to the folder holding the OPF.
pub fn content_opf(contents: &PackageContents) -> String {
    let metadata = &contents.metadata;
    let base = content_root_href();

    let mut opf = String::new();
    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="3.0" unique-identifier="BookID" xmlns="http://www.idpf.org/2007/opf">
<metadata xmlns:opf="http://www.idpf.org/2007/opf" xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
    );
    opf.push_str(&format!("<dc:title>{}</dc:title>\n", escape_xml(&metadata.title)));
    opf.push_str(&format!(
        "<dc:language>{}</dc:language>\n",
        escape_xml(&metadata.language)
    ));
    opf.push_str(&format!(
        "<dc:identifier id=\"BookID\">{}</dc:identifier>\n",
        metadata.identifier_urn()
    ));
    opf.push_str(&format!(
        "<dc:creator>{}</dc:creator>\n",
        escape_xml(&metadata.creator)
    ));
    opf.push_str(&format!(
        "<meta property=\"dcterms:modified\">{}</meta>\n",
        metadata.modified_timestamp()
    ));
    opf.push_str(
        r#"<meta name="cover" content="cover"/>
<meta property="rendition:orientation">portrait</meta>
<meta property="rendition:spread">portrait</meta>
<meta property="rendition:layout">pre-paginated</meta>
</metadata>
"#,
    );

    // Manifest
    opf.push_str("<manifest>\n");
    opf.push_str(
        r#"<item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
<item id="nav" href="nav.xhtml" properties="nav" media-type="application/xhtml+xml"/>
"#,
    );
    opf.push_str(&format!(
        "<item id=\"cover\" href=\"{}\" media-type=\"{}\" properties=\"cover-image\"/>\n",
        escape_xml(&contents.cover.relative_to(&base)),
        contents.cover_media_type
    ));
    opf.push_str(&format!(
        "<item id=\"css\" href=\"{}\" media-type=\"text/css\"/>\n",
        text_href().join("style.css").relative_to(&base)
    ));
    for page in &contents.pages {
        opf.push_str(&format!(
            "<item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
            escape_xml(&page.page_id()),
            escape_xml(&page.document.relative_to(&base)),
            XHTML_MEDIA_TYPE
        ));
    }
    for page in &contents.pages {
        opf.push_str(&format!(
            "<item id=\"{}\" href=\"{}\" media-type=\"{}\"/>\n",
            escape_xml(&page.image_id()),
            escape_xml(&page.image.relative_to(&base)),
            page.info.media_type()
        ));
    }
    opf.push_str("</manifest>\n");

    // Spine
    opf.push_str(&format!(
        "<spine page-progression-direction=\"{}\" toc=\"ncx\">\n",
        metadata.reading_direction.page_progression()
    ));
    for page in &contents.pages {
        opf.push_str(&format!(
            "<itemref idref=\"{}\"/>\n",
            escape_xml(&page.page_id())
        ));
    }
    opf.push_str("</spine>\n</package>\n");

    opf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::ImageInfo;
    use crate::package::{images_href, PageEntry};
    use crate::types::{PackageMetadata, ReadingDirection};
    use image::ImageFormat;

    fn page(stem: &str, format: ImageFormat, ext: &str) -> PageEntry {
        PageEntry {
            document: text_href().join(format!("{stem}.xhtml")),
            image: images_href().join(format!("{stem}.{ext}")),
            info: ImageInfo {
                width: 10,
                height: 20,
                format,
            },
        }
    }

    fn contents(direction: ReadingDirection) -> PackageContents {
        PackageContents {
            metadata: PackageMetadata::new("Tom & Jerry").with_reading_direction(direction),
            pages: vec![
                page("p1", ImageFormat::Jpeg, "jpg"),
                page("p2", ImageFormat::Png, "png"),
            ],
            cover: images_href().join("cover.jpg"),
            cover_media_type: "image/jpeg",
        }
    }

    #[test]
    fn test_manifest_entries() {
        let opf = content_opf(&contents(ReadingDirection::LeftToRight));
        assert_eq!(opf.matches("<item ").count(), 2 + 2 + 4);
        assert!(opf.contains(
            r#"<item id="cover" href="Images/cover.jpg" media-type="image/jpeg" properties="cover-image"/>"#
        ));
        assert!(opf.contains(r#"<item id="css" href="Text/style.css" media-type="text/css"/>"#));
        assert!(opf.contains(
            r#"<item id="page_p1.xhtml" href="Text/p1.xhtml" media-type="application/xhtml+xml"/>"#
        ));
        assert!(opf.contains(r#"<item id="img_p2.png" href="Images/p2.png" media-type="image/png"/>"#));
    }

    #[test]
    fn test_spine_order_and_direction() {
        let opf = content_opf(&contents(ReadingDirection::RightToLeft));
        assert!(opf.contains(r#"<spine page-progression-direction="rtl" toc="ncx">"#));
        let first = opf.find(r#"<itemref idref="page_p1.xhtml"/>"#).unwrap();
        let second = opf.find(r#"<itemref idref="page_p2.xhtml"/>"#).unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_metadata_escaped() {
        let opf = content_opf(&contents(ReadingDirection::LeftToRight));
        assert!(opf.contains("<dc:title>Tom &amp; Jerry</dc:title>"));
        assert!(opf.contains(r#"<meta property="rendition:layout">pre-paginated</meta>"#));
    }
}
