//! Hierarchical content addresses (`content://<authority>/<segments…>`).

use crate::contract::{CONTENT_AUTHORITY, CONTENT_SCHEME, PATH_PETS};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*)://([^/?#\s]+)(/[^?#\s]*)?$").expect("valid uri regex")
});

/// Error returned when a string is not a well-formed content address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriParseError(String);

impl Display for UriParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed content uri: `{}`", self.0)
    }
}

impl Error for UriParseError {}

/// Parsed content address.
///
/// Empty path segments are dropped, so `…/pets/` and `…/pets` are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentUri {
    scheme: String,
    authority: String,
    segments: Vec<String>,
}

impl ContentUri {
    /// Builds a `content://` address from an authority and path segments.
    pub fn new<I, S>(authority: impl Into<String>, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scheme: CONTENT_SCHEME.to_string(),
            authority: authority.into(),
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|segment: &String| !segment.is_empty())
                .collect(),
        }
    }

    /// Collection address of the pets table under the default authority.
    pub fn pets() -> Self {
        Self::new(CONTENT_AUTHORITY, [PATH_PETS])
    }

    pub fn parse(value: &str) -> Result<Self, UriParseError> {
        let captures = URI_RE
            .captures(value.trim())
            .ok_or_else(|| UriParseError(value.to_string()))?;
        let path = captures.get(3).map_or("", |m| m.as_str());

        Ok(Self {
            scheme: captures[1].to_ascii_lowercase(),
            authority: captures[2].to_string(),
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path_segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns this address with `id` appended as a new trailing segment.
    pub fn with_appended_id(&self, id: i64) -> Self {
        let mut uri = self.clone();
        uri.segments.push(id.to_string());
        uri
    }

    /// Parses the trailing segment as a row id.
    pub fn parse_id(&self) -> Option<i64> {
        self.segments.last()?.parse().ok()
    }

    /// Whether `other` lies strictly beneath this address.
    pub fn is_ancestor_of(&self, other: &ContentUri) -> bool {
        self.scheme == other.scheme
            && self.authority == other.authority
            && other.segments.len() > self.segments.len()
            && other.segments.starts_with(&self.segments)
    }
}

impl Display for ContentUri {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for ContentUri {
    type Err = UriParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}
