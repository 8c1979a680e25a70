//! HTTP version marker.

use std::borrow::Cow;
use std::fmt;

/// An HTTP version in `<major>.<minor>` form.
///
/// The version is held verbatim as supplied at construction and is never
/// prefixed by a protocol scheme token: `HTTP/1.1` on a wire is version
/// `1.1` here. Rendering the prefix is the serialization collaborator's
/// concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version(Cow<'static, str>);

impl Version {
    /// HTTP/1.0
    pub const HTTP_10: Version = Version(Cow::Borrowed("1.0"));

    /// HTTP/1.1
    pub const HTTP_11: Version = Version(Cow::Borrowed("1.1"));

    /// Creates a version from its `<major>.<minor>` string.
    pub fn new(version: impl Into<String>) -> Self {
        Self(Cow::Owned(version.into()))
    }

    /// Returns exactly the string supplied at construction.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::HTTP_11
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Version {
    fn from(version: &str) -> Self {
        Self::new(version)
    }
}

impl From<String> for Version {
    fn from(version: String) -> Self {
        Self::new(version)
    }
}
