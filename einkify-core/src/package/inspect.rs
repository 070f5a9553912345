//! Reading packages back and checking their structure

use super::{MIMETYPE, XHTML_MEDIA_TYPE};
use crate::error::PackageError;
use crate::types::{PackageHref, ReadingDirection};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::{CompressionMethod, ZipArchive};

const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";

/// One `<item>` of the OPF manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
    pub properties: Option<String>,
}

/// What a package declares about itself
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackageSummary {
    /// Archive entry names in archive order
    pub entries: Vec<String>,

    /// Whether the first entry is stored without compression
    pub first_entry_stored: bool,

    /// Content of the `mimetype` entry, if present
    pub mimetype: Option<String>,

    /// OPF location declared by `META-INF/container.xml`
    pub opf_path: String,

    pub title: String,

    /// `dc:identifier` of the OPF
    pub identifier: String,

    /// `dtb:uid` of the NCX
    pub ncx_uid: Option<String>,

    /// `page-progression-direction` of the spine
    pub page_progression: Option<String>,

    pub manifest: Vec<ManifestItem>,

    /// Spine idrefs in reading order
    pub spine: Vec<String>,
}

impl PackageSummary {
    /// Open a package file and parse its descriptors
    pub fn read(path: &Path) -> Result<Self, PackageError> {
        let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;
        let mut summary = PackageSummary::default();

        for i in 0..archive.len() {
            let file = archive.by_index(i)?;
            if i == 0 {
                summary.first_entry_stored = file.compression() == CompressionMethod::Stored;
            }
            summary.entries.push(file.name().to_string());
        }

        if summary.entries.iter().any(|e| e == "mimetype") {
            summary.mimetype = Some(read_entry(&mut archive, "mimetype")?);
        }

        let container = read_entry(&mut archive, "META-INF/container.xml")?;
        summary.opf_path = parse_container(&container)?;

        let opf = read_entry(&mut archive, &summary.opf_path)?;
        parse_opf(&opf, &mut summary)?;

        let ncx_path = summary
            .manifest
            .iter()
            .find(|item| item.media_type == NCX_MEDIA_TYPE)
            .map(|item| summary.resolve(&item.href));
        if let Some(ncx_path) = ncx_path {
            let ncx = read_entry(&mut archive, ncx_path.as_str())?;
            summary.ncx_uid = parse_ncx_uid(&ncx)?;
        }

        tracing::debug!(path = %path.display(), pages = summary.spine.len(), "Read package");
        Ok(summary)
    }

    /// Resolve a manifest href against the OPF folder
    pub fn resolve(&self, href: &str) -> PackageHref {
        PackageHref::new(&self.opf_path).parent().join(href)
    }

    /// Reading direction declared by the spine
    pub fn reading_direction(&self) -> Option<ReadingDirection> {
        self.page_progression
            .as_deref()
            .and_then(ReadingDirection::from_page_progression)
    }

    /// Manifest items whose media type is an image
    pub fn images(&self) -> impl Iterator<Item = &ManifestItem> {
        self.manifest
            .iter()
            .filter(|item| item.media_type.starts_with("image/"))
    }

    /// Manifest item carrying the `cover-image` property
    pub fn cover(&self) -> Option<&ManifestItem> {
        self.manifest.iter().find(|item| {
            item.properties
                .as_deref()
                .map(|p| p.split_whitespace().any(|p| p == "cover-image"))
                .unwrap_or(false)
        })
    }

    /// Manifest items referenced by the spine, in reading order
    pub fn pages(&self) -> Vec<&ManifestItem> {
        self.spine
            .iter()
            .filter_map(|idref| self.manifest.iter().find(|item| &item.id == idref))
            .collect()
    }

    /// Check the structural invariants of an image-only package
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.entries.first().map(String::as_str) != Some("mimetype") {
            issues.push(ValidationIssue::MimetypeNotFirst);
        } else if !self.first_entry_stored {
            issues.push(ValidationIssue::MimetypeCompressed);
        }
        match &self.mimetype {
            Some(content) if content == MIMETYPE => {}
            other => issues.push(ValidationIssue::MimetypeContent(
                other.clone().unwrap_or_default(),
            )),
        }

        match &self.ncx_uid {
            Some(uid) if *uid == self.identifier => {}
            other => issues.push(ValidationIssue::IdentifierMismatch {
                opf: self.identifier.clone(),
                ncx: other.clone().unwrap_or_default(),
            }),
        }

        let entries: HashSet<&str> = self.entries.iter().map(String::as_str).collect();
        let mut ids = HashSet::new();
        for item in &self.manifest {
            if !ids.insert(item.id.as_str()) {
                issues.push(ValidationIssue::DuplicateId(item.id.clone()));
            }
            let resolved = self.resolve(&item.href);
            if !entries.contains(resolved.as_str()) {
                issues.push(ValidationIssue::MissingEntry(resolved.to_string()));
            }
        }

        let mut spine_seen = HashSet::new();
        for idref in &self.spine {
            match self.manifest.iter().find(|item| &item.id == idref) {
                None => issues.push(ValidationIssue::DanglingIdref(idref.clone())),
                Some(item) if !is_page_document(item) => {
                    issues.push(ValidationIssue::SpineNotPage(idref.clone()))
                }
                Some(_) => {}
            }
            if !spine_seen.insert(idref.as_str()) {
                issues.push(ValidationIssue::RepeatedSpineItem(idref.clone()));
            }
        }

        if self.spine.is_empty() {
            issues.push(ValidationIssue::EmptySpine);
        }
        if self.cover().is_none() {
            issues.push(ValidationIssue::NoCover);
        }

        let expected = self.spine.len() * 2 + 4;
        if self.manifest.len() != expected {
            issues.push(ValidationIssue::ManifestCount {
                expected,
                actual: self.manifest.len(),
            });
        }

        issues
    }
}

/// A broken structural invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationIssue {
    MimetypeNotFirst,
    MimetypeCompressed,
    MimetypeContent(String),
    IdentifierMismatch { opf: String, ncx: String },
    DuplicateId(String),
    MissingEntry(String),
    DanglingIdref(String),
    SpineNotPage(String),
    RepeatedSpineItem(String),
    EmptySpine,
    NoCover,
    ManifestCount { expected: usize, actual: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MimetypeNotFirst => write!(f, "mimetype is not the first entry"),
            ValidationIssue::MimetypeCompressed => write!(f, "mimetype entry is compressed"),
            ValidationIssue::MimetypeContent(content) => {
                write!(f, "mimetype content is {:?}, expected {:?}", content, MIMETYPE)
            }
            ValidationIssue::IdentifierMismatch { opf, ncx } => {
                write!(f, "OPF identifier {} does not match NCX uid {}", opf, ncx)
            }
            ValidationIssue::DuplicateId(id) => write!(f, "duplicate manifest id {}", id),
            ValidationIssue::MissingEntry(href) => write!(f, "manifest references missing {}", href),
            ValidationIssue::DanglingIdref(idref) => {
                write!(f, "spine references unknown item {}", idref)
            }
            ValidationIssue::SpineNotPage(idref) => {
                write!(f, "spine item {} is not a page document", idref)
            }
            ValidationIssue::RepeatedSpineItem(idref) => {
                write!(f, "spine lists {} more than once", idref)
            }
            ValidationIssue::EmptySpine => write!(f, "spine is empty"),
            ValidationIssue::NoCover => write!(f, "no cover-image item"),
            ValidationIssue::ManifestCount { expected, actual } => {
                write!(f, "manifest has {} items, expected {}", actual, expected)
            }
        }
    }
}

fn malformed(e: impl fmt::Display) -> PackageError {
    PackageError::Malformed(e.to_string())
}

fn read_entry<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, PackageError> {
    let mut file = archive
        .by_name(name)
        .map_err(|_| PackageError::Malformed(format!("missing entry {}", name)))?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(content)
}

fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>, PackageError> {
    for attr in e.attributes() {
        let attr = attr.map_err(malformed)?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value().map_err(malformed)?.into_owned()));
        }
    }
    Ok(None)
}

fn parse_container(xml: &str) -> Result<String, PackageError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"rootfile" => {
                if let Some(path) = attribute(&e, b"full-path")? {
                    return Ok(path);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Err(PackageError::Malformed("container.xml has no rootfile".to_string()))
}

#[derive(Clone, Copy)]
enum TextField {
    Title,
    Identifier,
}

fn parse_opf(xml: &str, summary: &mut PackageSummary) -> Result<(), PackageError> {
    let mut reader = Reader::from_str(xml);
    let mut field: Option<TextField> = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                field = match e.local_name().as_ref() {
                    b"title" => Some(TextField::Title),
                    b"identifier" => Some(TextField::Identifier),
                    _ => None,
                };
                opf_element(&e, summary)?;
            }
            Event::Empty(e) => opf_element(&e, summary)?,
            Event::Text(t) => {
                if let Some(field) = field {
                    let text = t.unescape().map_err(malformed)?;
                    match field {
                        TextField::Title => summary.title.push_str(text.trim()),
                        TextField::Identifier => summary.identifier.push_str(text.trim()),
                    }
                }
            }
            Event::End(_) => field = None,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}

fn opf_element(e: &BytesStart, summary: &mut PackageSummary) -> Result<(), PackageError> {
    match e.local_name().as_ref() {
        b"item" => summary.manifest.push(ManifestItem {
            id: attribute(e, b"id")?.unwrap_or_default(),
            href: attribute(e, b"href")?.unwrap_or_default(),
            media_type: attribute(e, b"media-type")?.unwrap_or_default(),
            properties: attribute(e, b"properties")?,
        }),
        b"itemref" => {
            if let Some(idref) = attribute(e, b"idref")? {
                summary.spine.push(idref);
            }
        }
        b"spine" => summary.page_progression = attribute(e, b"page-progression-direction")?,
        _ => {}
    }
    Ok(())
}

fn parse_ncx_uid(xml: &str) -> Result<Option<String>, PackageError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"meta" => {
                if attribute(&e, b"name")?.as_deref() == Some("dtb:uid") {
                    return attribute(&e, b"content");
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Whether a manifest item is a page document
pub fn is_page_document(item: &ManifestItem) -> bool {
    item.media_type == XHTML_MEDIA_TYPE
        && !item
            .properties
            .as_deref()
            .map(|p| p.split_whitespace().any(|p| p == "nav"))
            .unwrap_or(false)
}
