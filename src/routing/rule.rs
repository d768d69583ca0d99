//! Access rules binding a method set and path pattern to a requirement.

use std::fmt;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::routing::matcher::{Matcher, MethodSet, PathPattern};

/// What a caller must satisfy once a rule matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// No authentication needed.
    Public,
    /// Caller must hold at least one of the listed roles.
    AnyOf(Vec<String>),
    /// Any authenticated caller.
    #[serde(alias = "all")]
    Authenticated,
}

impl Requirement {
    /// Shorthand for a single required role.
    pub fn role(role: impl Into<String>) -> Self {
        Requirement::AnyOf(vec![role.into()])
    }

    pub fn any_of<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Requirement::AnyOf(roles.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Public => write!(f, "public"),
            Requirement::AnyOf(roles) => write!(f, "any_of({})", roles.join(", ")),
            Requirement::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// One access-control clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: PathPattern,
    pub methods: MethodSet,
    pub requirement: Requirement,
}

impl RouteRule {
    pub fn new(pattern: PathPattern, methods: MethodSet, requirement: Requirement) -> Self {
        Self {
            pattern,
            methods,
            requirement,
        }
    }
}

impl Matcher for RouteRule {
    fn matches(&self, method: &Method, path: &str) -> bool {
        self.methods.matches(method, path) && self.pattern.matches(method, path)
    }
}

impl fmt::Display for RouteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.methods.is_any() {
            write!(f, "*")?;
        } else {
            let methods: Vec<&str> = self.methods.iter().map(Method::as_str).collect();
            write!(f, "{}", methods.join("|"))?;
        }
        write!(f, " {} -> {}", self.pattern, self.requirement)
    }
}
