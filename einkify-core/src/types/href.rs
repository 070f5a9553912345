//! Paths relative to the package root
//!
//! Every reference written into a generated document (manifest hrefs, page
//! image links, navigation targets) goes through [`PackageHref`] so that the
//! separator is always `/` regardless of the host platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A `/`-separated path relative to the root of the package
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageHref(String);

impl PackageHref {
    /// The package root itself
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Build an href from a `/`-separated string, dropping empty and `.` segments
    pub fn new(path: impl AsRef<str>) -> Self {
        let segments: Vec<&str> = path
            .as_ref()
            .split(['/', '\\'])
            .filter(|s| !s.is_empty() && *s != ".")
            .collect();
        Self(segments.join("/"))
    }

    /// Append one or more segments
    pub fn join(&self, segment: impl AsRef<str>) -> Self {
        let tail = Self::new(segment);
        match (self.0.is_empty(), tail.0.is_empty()) {
            (true, _) => tail,
            (_, true) => self.clone(),
            _ => Self(format!("{}/{}", self.0, tail.0)),
        }
    }

    /// The containing folder (the root for top-level entries)
    pub fn parent(&self) -> Self {
        match self.0.rfind('/') {
            Some(idx) => Self(self.0[..idx].to_string()),
            None => Self::root(),
        }
    }

    /// Last segment
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Express this href relative to the folder `base`
    ///
    /// `OEBPS/Images/a.jpg` relative to `OEBPS/Text` is `../Images/a.jpg`.
    pub fn relative_to(&self, base: &PackageHref) -> String {
        let target: Vec<&str> = self.segments().collect();
        let from: Vec<&str> = base.segments().collect();

        let common = target
            .iter()
            .zip(from.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = Vec::with_capacity(from.len() - common + target.len());
        parts.extend(std::iter::repeat("..").take(from.len() - common));
        parts.extend(&target[common..]);
        parts.join("/")
    }

    /// Resolve against an on-disk package root
    pub fn to_path(&self, root: &Path) -> PathBuf {
        self.segments().fold(root.to_path_buf(), |acc, s| acc.join(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for PackageHref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
