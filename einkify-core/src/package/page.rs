//! Per-image page documents

use super::{escape_xml, images_href, text_href};
use crate::imaging::ImageInfo;
use crate::types::ImageAsset;
use std::path::{Path, PathBuf};

/// Markup for a page that shows one image at 1:1 scale
///
/// `image_src` is relative to the page document.
pub fn page_document(title: &str, image_src: &str, width: u32, height: u32) -> String {
    let title = escape_xml(title);
    let src = escape_xml(image_src);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head>
<title>{title}</title>
<link href="style.css" type="text/css" rel="stylesheet"/>
<meta name="viewport" content="width={width}, height={height}"/>
</head>
<body>
<div style="text-align:center;top:0.0%;">
<img width="{width}" height="{height}" src="{src}" alt="{title}"/>
</div>
</body>
</html>
"#
    )
}

/// Write the page document for `asset` into `text_dir` as `file_name`
///
/// The folder must already exist. Returns the written path.
pub fn write_page(
    asset: &ImageAsset,
    info: &ImageInfo,
    text_dir: &Path,
    file_name: &str,
) -> std::io::Result<PathBuf> {
    let image = images_href().join(&asset.flat_name);
    let src = image.relative_to(&text_href());
    let xhtml = page_document(asset.flat_stem(), &src, info.width, info.height);

    let path = text_dir.join(file_name);
    std::fs::write(&path, xhtml)?;
    Ok(path)
}
