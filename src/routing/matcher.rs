//! Route matching logic.
//!
//! # Responsibilities
//! - Match the request method against a rule's method set
//! - Match the request path against a segment pattern with `{name}` placeholders
//! - Combine conditions with AND semantics (see `RouteRule`)
//!
//! # Design Decisions
//! - Path matching is case-sensitive and segment-count exact
//! - A placeholder matches exactly one non-empty segment
//! - Empty method set = always matches (wildcard)
//! - No regex to guarantee O(n) matching

use axum::http::Method;
use thiserror::Error;

/// Trait for matching a request against a condition.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, method: &Method, path: &str) -> bool;
}

/// Errors raised while compiling a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern `{0}` must start with '/'")]
    NotAbsolute(String),

    #[error("pattern `{pattern}` has unbalanced braces in segment `{segment}`")]
    UnbalancedBraces { pattern: String, segment: String },

    #[error("pattern `{pattern}` has an empty placeholder name")]
    EmptyPlaceholder { pattern: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A compiled path pattern such as `/api/items/ver/{id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern, rejecting malformed placeholders.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute(pattern.to_string()));
        }

        let segments = pattern
            .split('/')
            .map(|segment| Self::parse_segment(pattern, segment))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    fn parse_segment(pattern: &str, segment: &str) -> Result<Segment, PatternError> {
        let opens = segment.matches('{').count();
        let closes = segment.matches('}').count();

        if opens == 0 && closes == 0 {
            return Ok(Segment::Literal(segment.to_string()));
        }

        // Only a whole-segment `{name}` is a placeholder.
        let well_formed = opens == 1
            && closes == 1
            && segment.starts_with('{')
            && segment.ends_with('}');
        if !well_formed {
            return Err(PatternError::UnbalancedBraces {
                pattern: pattern.to_string(),
                segment: segment.to_string(),
            });
        }

        let name = &segment[1..segment.len() - 1];
        if name.trim().is_empty() {
            return Err(PatternError::EmptyPlaceholder {
                pattern: pattern.to_string(),
            });
        }
        Ok(Segment::Placeholder(name.to_string()))
    }

    /// The pattern text as configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of the placeholders, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Segment-wise comparison against a request path.
    pub fn matches_path(&self, path: &str) -> bool {
        let mut requested = path.split('/');
        for segment in &self.segments {
            let Some(actual) = requested.next() else {
                return false;
            };
            let ok = match segment {
                Segment::Literal(expected) => expected == actual,
                Segment::Placeholder(_) => !actual.is_empty(),
            };
            if !ok {
                return false;
            }
        }
        requested.next().is_none()
    }
}

impl std::fmt::Display for PathPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl Matcher for PathPattern {
    fn matches(&self, _method: &Method, path: &str) -> bool {
        self.matches_path(path)
    }
}

/// Set of methods a rule applies to. Empty means every method.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSet {
    methods: Vec<Method>,
}

impl MethodSet {
    /// Matches every method.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(methods: impl IntoIterator<Item = Method>) -> Self {
        let mut set = Self::default();
        for method in methods {
            if !set.methods.contains(&method) {
                set.methods.push(method);
            }
        }
        set
    }

    pub fn is_any(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn contains(&self, method: &Method) -> bool {
        self.is_any() || self.methods.contains(method)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }
}

impl Matcher for MethodSet {
    fn matches(&self, method: &Method, _path: &str) -> bool {
        self.contains(method)
    }
}
