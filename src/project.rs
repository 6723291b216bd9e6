//!
//! Project identifiers used to address a project in the API.
//!
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// RFC3986 unreserved characters are the only ones left as-is, so a
// `namespace/project` path ends up as a single `namespace%2Fproject` segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A project reference, either the numeric ID or the `namespace/project` path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectId {
    /// Numeric project ID
    Id(u64),
    /// Full path with namespace, e.g. `gitlab-org/gitlab`
    Path(String),
}

impl ProjectId {
    /// Returns the canonical, unencoded identifier.
    pub fn canonical(&self) -> crate::Result<String> {
        match self {
            Self::Id(id) => Ok(id.to_string()),
            Self::Path(path) => {
                let path = path.trim();
                match path {
                    "" => Err(crate::Error::InvalidIdentifier(
                        "project path is empty".to_string(),
                    )),
                    // URL resolution would collapse these into a parent path
                    "." | ".." => Err(crate::Error::InvalidIdentifier(format!(
                        "project path '{path}' is a dot segment"
                    ))),
                    _ => Ok(path.to_string()),
                }
            }
        }
    }

    /// Returns the identifier encoded as a single URL path segment.
    pub fn encoded(&self) -> crate::Result<String> {
        let canonical = self.canonical()?;
        Ok(utf8_percent_encode(&canonical, PATH_SEGMENT_ENCODE_SET).to_string())
    }
}

impl From<u64> for ProjectId {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ProjectId {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&String> for ProjectId {
    fn from(path: &String) -> Self {
        Self::Path(path.clone())
    }
}
