//! Immutable address-shape matcher.
//!
//! Patterns are `/`-separated path templates where `#` matches one
//! non-negative integer segment and `*` matches any single segment. The
//! table is built once with [`UriMatcherBuilder`] and never mutated.

use super::uri::ContentUri;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    Literal(String),
    Number,
    Text,
}

impl PatternSegment {
    fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Literal(expected) => expected == segment,
            Self::Number => {
                !segment.is_empty()
                    && segment.bytes().all(|b| b.is_ascii_digit())
                    && segment.parse::<i64>().is_ok()
            }
            Self::Text => true,
        }
    }
}

#[derive(Debug, Clone)]
struct Route<C> {
    authority: String,
    pattern: Vec<PatternSegment>,
    code: C,
}

impl<C> Route<C> {
    fn matches(&self, uri: &ContentUri) -> bool {
        let segments = uri.path_segments();
        self.authority == uri.authority()
            && self.pattern.len() == segments.len()
            && self
                .pattern
                .iter()
                .zip(segments)
                .all(|(pattern, segment)| pattern.matches(segment))
    }
}

/// Collects routes before freezing them into a [`UriMatcher`].
#[derive(Debug, Clone)]
pub struct UriMatcherBuilder<C> {
    routes: Vec<Route<C>>,
}

impl<C> Default for UriMatcherBuilder<C> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<C: Copy> UriMatcherBuilder<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route. Earlier routes win when several match.
    pub fn add_uri(mut self, authority: &str, path: &str, code: C) -> Self {
        let pattern = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment {
                "#" => PatternSegment::Number,
                "*" => PatternSegment::Text,
                literal => PatternSegment::Literal(literal.to_string()),
            })
            .collect();
        self.routes.push(Route {
            authority: authority.to_string(),
            pattern,
            code,
        });
        self
    }

    pub fn build(self) -> UriMatcher<C> {
        UriMatcher {
            routes: self.routes,
        }
    }
}

/// Frozen route table mapping address shapes to caller-defined codes.
#[derive(Debug, Clone)]
pub struct UriMatcher<C> {
    routes: Vec<Route<C>>,
}

impl<C: Copy> UriMatcher<C> {
    pub fn builder() -> UriMatcherBuilder<C> {
        UriMatcherBuilder::new()
    }

    /// Returns the code of the first route matching `uri`.
    pub fn match_uri(&self, uri: &ContentUri) -> Option<C> {
        self.routes
            .iter()
            .find(|route| route.matches(uri))
            .map(|route| route.code)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
