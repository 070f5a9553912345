//! `META-INF/container.xml`

use super::escape_xml;
use crate::types::PackageHref;

/// Container document pointing reading systems at the OPF
pub fn container_xml(opf: &PackageHref) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
<rootfiles>
<rootfile full-path="{}" media-type="application/oebps-package+xml"/>
</rootfiles>
</container>
"#,
        escape_xml(opf.as_str())
    )
}
