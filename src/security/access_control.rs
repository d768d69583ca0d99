//! Access policy evaluation.
//!
//! The policy is an ordered list of `RouteRule`s built once at startup. The
//! first rule whose method set and path pattern match decides; requests that
//! match no rule fall through to "authenticated callers only".

use std::collections::HashSet;
use std::fmt;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::RuleConfig;
use crate::config::validation::parse_method;
use crate::routing::{Matcher, MethodSet, PathPattern, PatternError, Requirement, RouteRule};

/// Outcome of evaluating a request against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    Allow,
    Deny,
    RequiresAuth,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
            Decision::RequiresAuth => "requires_auth",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors building a policy from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("invalid HTTP method `{0}`")]
    Method(String),
}

/// Immutable, ordered rule table.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<RouteRule>,
}

impl AccessPolicy {
    pub fn from_rules(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// Compile config clauses, one rule per path, preserving declaration order.
    pub fn from_config(clauses: &[RuleConfig]) -> Result<Self, PolicyError> {
        let mut rules = Vec::new();
        for clause in clauses {
            let methods = clause
                .methods
                .iter()
                .map(|m| parse_method(m).ok_or_else(|| PolicyError::Method(m.clone())))
                .collect::<Result<Vec<_>, _>>()?;
            let methods = MethodSet::new(methods);

            for path in &clause.paths {
                rules.push(RouteRule::new(
                    PathPattern::parse(path)?,
                    methods.clone(),
                    clause.requirement.clone(),
                ));
            }
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// The first rule matching the request, with its position.
    pub fn matching_rule(&self, method: &Method, path: &str) -> Option<(usize, &RouteRule)> {
        self.rules
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(method, path))
    }

    /// Decide whether the request may proceed.
    pub fn evaluate(
        &self,
        method: &Method,
        path: &str,
        caller_roles: &HashSet<String>,
        is_authenticated: bool,
    ) -> Decision {
        let Some((_, rule)) = self.matching_rule(method, path) else {
            return authenticated_only(is_authenticated);
        };

        match &rule.requirement {
            Requirement::Public => Decision::Allow,
            Requirement::Authenticated => authenticated_only(is_authenticated),
            Requirement::AnyOf(_) if !is_authenticated => Decision::RequiresAuth,
            Requirement::AnyOf(roles) => {
                if roles.iter().any(|role| caller_roles.contains(role)) {
                    Decision::Allow
                } else {
                    Decision::Deny
                }
            }
        }
    }
}

fn authenticated_only(is_authenticated: bool) -> Decision {
    if is_authenticated {
        Decision::Allow
    } else {
        Decision::RequiresAuth
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::default_rules;

    fn roles(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn default_policy() -> AccessPolicy {
        AccessPolicy::from_config(&default_rules()).unwrap()
    }

    fn rule(method: Option<Method>, pattern: &str, requirement: Requirement) -> RouteRule {
        RouteRule::new(
            PathPattern::parse(pattern).unwrap(),
            MethodSet::new(method),
            requirement,
        )
    }

    #[test]
    fn test_public_rules_allow_everyone() {
        let policy = default_policy();
        for (method, path) in [
            (Method::POST, "/api/security/oauth/token"),
            (Method::GET, "/api/security/oauth/token"),
            (Method::GET, "/api/productos/listar"),
            (Method::GET, "/api/items/listar"),
            (Method::GET, "/api/usuarios/usuarios"),
        ] {
            assert_eq!(policy.evaluate(&method, path, &roles(&[]), false), Decision::Allow);
            assert_eq!(policy.evaluate(&method, path, &roles(&["USER"]), true), Decision::Allow);
            assert_eq!(policy.evaluate(&method, path, &roles(&[]), true), Decision::Allow);
        }
    }

    #[test]
    fn test_any_of_semantics() {
        let policy = default_policy();
        let path = "/api/productos/ver/10";

        assert_eq!(policy.evaluate(&Method::GET, path, &roles(&["USER"]), true), Decision::Allow);
        assert_eq!(policy.evaluate(&Method::GET, path, &roles(&["ADMIN"]), true), Decision::Allow);
        assert_eq!(policy.evaluate(&Method::GET, path, &roles(&["GUEST"]), true), Decision::Deny);
        assert_eq!(policy.evaluate(&Method::GET, path, &roles(&[]), true), Decision::Deny);
        assert_eq!(
            policy.evaluate(&Method::GET, path, &roles(&["ADMIN"]), false),
            Decision::RequiresAuth
        );
    }

    #[test]
    fn test_admin_only_writes() {
        let policy = default_policy();
        let user = roles(&["USER"]);
        let admin = roles(&["ADMIN"]);

        for (method, path) in [
            (Method::POST, "/api/items/crear"),
            (Method::PUT, "/api/items/editar/4"),
            (Method::DELETE, "/api/usuarios/usuarios/4"),
        ] {
            assert_eq!(policy.evaluate(&method, path, &user, true), Decision::Deny);
            assert_eq!(policy.evaluate(&method, path, &admin, true), Decision::Allow);
            assert_eq!(policy.evaluate(&method, path, &admin, false), Decision::RequiresAuth);
        }
    }

    #[test]
    fn test_method_distinguishes_same_path() {
        let policy = default_policy();
        // GET is public, POST needs ADMIN.
        let path = "/api/usuarios/usuarios";
        assert_eq!(policy.evaluate(&Method::GET, path, &roles(&[]), false), Decision::Allow);
        assert_eq!(
            policy.evaluate(&Method::POST, path, &roles(&[]), false),
            Decision::RequiresAuth
        );
    }

    #[test]
    fn test_first_match_wins() {
        let policy = AccessPolicy::from_rules(vec![
            rule(
                Some(Method::GET),
                "/api/productos/ver/{id}",
                Requirement::any_of(["ADMIN", "USER"]),
            ),
            rule(Some(Method::GET), "/api/productos/ver/{id}", Requirement::role("ROOT")),
        ]);

        assert_eq!(
            policy.evaluate(&Method::GET, "/api/productos/ver/1", &roles(&["USER"]), true),
            Decision::Allow
        );
        let (index, _) = policy.matching_rule(&Method::GET, "/api/productos/ver/1").unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn test_earlier_public_rule_shadows_later_restriction() {
        let policy = AccessPolicy::from_rules(vec![
            rule(None, "/api/items/{action}", Requirement::Public),
            rule(Some(Method::POST), "/api/items/crear", Requirement::role("ADMIN")),
        ]);
        assert_eq!(
            policy.evaluate(&Method::POST, "/api/items/crear", &roles(&[]), false),
            Decision::Allow
        );
    }

    #[test]
    fn test_segment_count_exact() {
        let policy = default_policy();
        assert!(policy
            .matching_rule(&Method::GET, "/api/items/ver/5/cantidad/3")
            .is_some());
        assert!(policy.matching_rule(&Method::GET, "/api/items/ver/5").is_none());
    }

    #[test]
    fn test_default_fallthrough() {
        let policy = default_policy();
        assert_eq!(
            policy.evaluate(&Method::GET, "/api/unknown", &roles(&[]), true),
            Decision::Allow
        );
        assert_eq!(
            policy.evaluate(&Method::GET, "/api/unknown", &roles(&[]), false),
            Decision::RequiresAuth
        );
        // Empty policy behaves the same way.
        let empty = AccessPolicy::default();
        assert_eq!(empty.evaluate(&Method::PATCH, "/", &roles(&[]), false), Decision::RequiresAuth);
    }

    #[test]
    fn test_authenticated_requirement() {
        let policy = AccessPolicy::from_rules(vec![rule(
            None,
            "/api/perfil",
            Requirement::Authenticated,
        )]);
        assert_eq!(policy.evaluate(&Method::GET, "/api/perfil", &roles(&[]), true), Decision::Allow);
        assert_eq!(
            policy.evaluate(&Method::GET, "/api/perfil", &roles(&[]), false),
            Decision::RequiresAuth
        );
    }

    #[test]
    fn test_from_config_expands_paths_in_order() {
        let policy = default_policy();
        let patterns: Vec<&str> = policy.rules().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns.len(), 16);
        assert_eq!(patterns[0], "/api/security/oauth/token");
        assert_eq!(patterns[1], "/api/productos/listar");
        assert_eq!(patterns[15], "/api/usuarios/usuarios/{id}");
    }

    #[test]
    fn test_from_config_rejects_malformed_pattern() {
        let clauses = vec![RuleConfig {
            methods: vec![],
            paths: vec!["/api/{id".into()],
            requirement: Requirement::Public,
        }];
        assert!(matches!(
            AccessPolicy::from_config(&clauses),
            Err(PolicyError::Pattern(PatternError::UnbalancedBraces { .. }))
        ));
    }
}
