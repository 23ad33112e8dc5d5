//! Validated key paths into the JSON tree.

use crate::DbError;
use std::fmt;
use std::str::FromStr;

/// Characters a path segment may not contain.
pub const FORBIDDEN_CHARS: [char; 5] = ['.', '#', '$', '[', ']'];

/// A `/`-separated path such as `products/-Nabc123`.
///
/// Leading and trailing slashes are ignored; `""` and `"/"` name the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DbPath {
    segments: Vec<String>,
}

impl DbPath {
    /// The root of the tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse and validate a path.
    pub fn parse(path: &str) -> Result<Self, DbError> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let segments = trimmed
            .split('/')
            .map(|segment| validate_segment(path, segment).map(|_| segment.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// Append one validated segment.
    pub fn child(&self, segment: &str) -> Result<Self, DbError> {
        validate_segment(segment, segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    /// Append a relative path, which may have several segments.
    pub fn join(&self, relative: &str) -> Result<Self, DbError> {
        let relative = DbPath::parse(relative)?;
        let mut segments = self.segments.clone();
        segments.extend(relative.segments);
        Ok(Self { segments })
    }

    /// The parent path; `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.segments.split_last()?;
        Some(Self {
            segments: parent.to_vec(),
        })
    }

    /// Last segment; `None` for the root.
    pub fn key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

fn validate_segment(path: &str, segment: &str) -> Result<(), DbError> {
    let invalid = |reason: String| DbError::InvalidPath {
        path: path.to_string(),
        reason,
    };
    if segment.is_empty() {
        return Err(invalid("empty segment".to_string()));
    }
    if let Some(c) = segment.chars().find(|c| FORBIDDEN_CHARS.contains(c) || *c == '/') {
        return Err(invalid(format!("forbidden character {c:?}")));
    }
    Ok(())
}

impl fmt::Display for DbPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

impl FromStr for DbPath {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DbPath::parse(s)
    }
}
