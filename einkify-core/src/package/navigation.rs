//! Navigation documents: the legacy NCX table and the EPUB 3 nav document
//!
//! Both carry a single entry, labelled with the book title, that points at
//! the first page. Image-only books have no chapters to list.

use super::{content_root_href, escape_xml, PageEntry};
use crate::types::PackageMetadata;

/// Build `toc.ncx`
pub fn toc_ncx(metadata: &PackageMetadata, first_page: &PageEntry) -> String {
    let title = escape_xml(&metadata.title);
    let src = escape_xml(&first_page.document.relative_to(&content_root_href()));
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx version="2005-1" xml:lang="en-US" xmlns="http://www.daisy.org/z3986/2005/ncx/">
<head>
<meta name="dtb:uid" content="{uid}"/>
<meta name="dtb:totalPageCount" content="0"/>
<meta name="dtb:maxPageNumber" content="0"/>
<meta name="generated" content="true"/>
</head>
<docTitle><text>{title}</text></docTitle>
<navMap>
<navPoint id="Text"><navLabel><text>{title}</text></navLabel><content src="{src}"/></navPoint>
</navMap>
</ncx>
"#,
        uid = metadata.identifier_urn(),
    )
}

/// Build `nav.xhtml` with a table of contents and a page list
pub fn nav_xhtml(metadata: &PackageMetadata, first_page: &PageEntry) -> String {
    let title = escape_xml(&metadata.title);
    let href = escape_xml(&first_page.document.relative_to(&content_root_href()));
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head>
<title>{title}</title>
<meta charset="utf-8"/>
</head>
<body>
<nav xmlns:epub="http://www.idpf.org/2007/ops" epub:type="toc" id="toc">
<ol>
<li><a href="{href}">{title}</a></li>
</ol>
</nav>
<nav epub:type="page-list">
<ol>
<li><a href="{href}">{title}</a></li>
</ol>
</nav>
</body>
</html>
"#
    )
}
