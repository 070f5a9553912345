//! Package metadata types (Dublin Core subset written into the OPF)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata shared by every descriptor in one package build
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageMetadata {
    /// Book title, taken from the source file name
    pub title: String,

    /// Language code written as `dc:language`
    pub language: String,

    /// Creator written as `dc:creator`
    pub creator: String,

    /// Package identifier, shared by the OPF and the NCX
    pub identifier: Uuid,

    /// Value of `dcterms:modified`
    pub modified: DateTime<Utc>,

    /// Page progression of the spine
    pub reading_direction: ReadingDirection,
}

impl PackageMetadata {
    /// Create metadata for a fresh build with a new identifier
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            language: "en-US".to_string(),
            creator: "Unknown".to_string(),
            identifier: Uuid::new_v4(),
            modified: Utc::now(),
            reading_direction: ReadingDirection::LeftToRight,
        }
    }

    /// Set the reading direction
    pub fn with_reading_direction(mut self, direction: ReadingDirection) -> Self {
        self.reading_direction = direction;
        self
    }

    /// Set the package identifier
    pub fn with_identifier(mut self, identifier: Uuid) -> Self {
        self.identifier = identifier;
        self
    }

    /// Identifier in the `urn:uuid:` form used by both OPF and NCX
    pub fn identifier_urn(&self) -> String {
        format!("urn:uuid:{}", self.identifier)
    }

    /// `dcterms:modified` value, second precision
    pub fn modified_timestamp(&self) -> String {
        self.modified.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

/// Reading direction for the book
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ReadingDirection {
    /// Left to right (western comics)
    #[default]
    LeftToRight,

    /// Right to left (manga)
    RightToLeft,
}

impl ReadingDirection {
    /// Value for the spine's `page-progression-direction` attribute
    pub fn page_progression(self) -> &'static str {
        match self {
            ReadingDirection::LeftToRight => "ltr",
            ReadingDirection::RightToLeft => "rtl",
        }
    }

    /// Parse a `page-progression-direction` value
    pub fn from_page_progression(value: &str) -> Option<Self> {
        match value {
            "ltr" => Some(ReadingDirection::LeftToRight),
            "rtl" => Some(ReadingDirection::RightToLeft),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_identifier_urn() {
        let id = Uuid::parse_str("12345678-1234-1234-1234-123456789abc").unwrap();
        let metadata = PackageMetadata::new("Test").with_identifier(id);
        assert_eq!(
            metadata.identifier_urn(),
            "urn:uuid:12345678-1234-1234-1234-123456789abc"
        );
    }

    #[test]
    fn test_modified_timestamp_format() {
        let mut metadata = PackageMetadata::new("Test");
        metadata.modified = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(metadata.modified_timestamp(), "2024-03-09T07:05:01Z");
    }

    #[test]
    fn test_page_progression_roundtrip() {
        for direction in [ReadingDirection::LeftToRight, ReadingDirection::RightToLeft] {
            assert_eq!(
                ReadingDirection::from_page_progression(direction.page_progression()),
                Some(direction)
            );
        }
        assert_eq!(ReadingDirection::from_page_progression("ttb"), None);
    }
}
