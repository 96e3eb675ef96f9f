//! Declarative access policy: which paths require which role.
//!
//! The table is evaluated once per request, first match wins, and anything
//! not listed requires authentication.

use axum::http::Method;

use crate::models::user::Role;

/// What a route requires from the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Public,
    Authenticated,
    Role(Role),
}

struct Rule {
    /// Exact path, or a prefix when the pattern ends with `/*`
    pattern: &'static str,
    /// Restrict the rule to these methods; `None` matches all
    methods: Option<&'static [Method]>,
    requirement: Requirement,
}

static RULES: &[Rule] = &[
    // Login and registration issue the tokens everything else consumes
    Rule {
        pattern: "/api/users/login",
        methods: None,
        requirement: Requirement::Public,
    },
    Rule {
        pattern: "/api/users/register",
        methods: None,
        requirement: Requirement::Public,
    },
    // API documentation
    Rule {
        pattern: "/swagger-ui/*",
        methods: None,
        requirement: Requirement::Public,
    },
    Rule {
        pattern: "/api-docs/*",
        methods: None,
        requirement: Requirement::Public,
    },
    Rule {
        pattern: "/health",
        methods: None,
        requirement: Requirement::Public,
    },
    // Own-profile lookup is open to any authenticated caller; the broader
    // user management surface below is admin only
    Rule {
        pattern: "/api/users/me",
        methods: None,
        requirement: Requirement::Authenticated,
    },
    Rule {
        pattern: "/api/admin/*",
        methods: None,
        requirement: Requirement::Role(Role::Admin),
    },
    Rule {
        pattern: "/api/users/*",
        methods: None,
        requirement: Requirement::Role(Role::Admin),
    },
    // The catalog is publicly readable; mutations require authentication
    Rule {
        pattern: "/api/books/*",
        methods: Some(&[Method::GET]),
        requirement: Requirement::Public,
    },
    Rule {
        pattern: "/api/books/*",
        methods: None,
        requirement: Requirement::Authenticated,
    },
    Rule {
        pattern: "/api/authors/*",
        methods: None,
        requirement: Requirement::Authenticated,
    },
    Rule {
        pattern: "/api/loans/*",
        methods: None,
        requirement: Requirement::Authenticated,
    },
];

/// Look up the requirement for a request. Unlisted paths require
/// authentication.
pub fn requirement_for(method: &Method, path: &str) -> Requirement {
    RULES
        .iter()
        .find(|rule| {
            path_matches(rule.pattern, path)
                && rule.methods.map_or(true, |methods| methods.contains(method))
        })
        .map(|rule| rule.requirement)
        .unwrap_or(Requirement::Authenticated)
}

fn path_matches(pattern: &str, path: &str) -> bool {
    if let Some(base) = pattern.strip_suffix("/*") {
        path == base
            || path
                .strip_prefix(base)
                .map_or(false, |rest| rest.starts_with('/'))
    } else {
        path == pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_and_register_are_public() {
        assert_eq!(
            requirement_for(&Method::POST, "/api/users/login"),
            Requirement::Public
        );
        assert_eq!(
            requirement_for(&Method::POST, "/api/users/register"),
            Requirement::Public
        );
    }

    #[test]
    fn api_docs_are_public() {
        assert_eq!(
            requirement_for(&Method::GET, "/swagger-ui/index.html"),
            Requirement::Public
        );
        assert_eq!(
            requirement_for(&Method::GET, "/api-docs/openapi.json"),
            Requirement::Public
        );
    }

    #[test]
    fn user_management_requires_admin() {
        assert_eq!(
            requirement_for(&Method::GET, "/api/users"),
            Requirement::Role(Role::Admin)
        );
        assert_eq!(
            requirement_for(&Method::DELETE, "/api/users/12"),
            Requirement::Role(Role::Admin)
        );
    }

    #[test]
    fn own_profile_needs_only_authentication() {
        assert_eq!(
            requirement_for(&Method::GET, "/api/users/me"),
            Requirement::Authenticated
        );
    }

    #[test]
    fn book_reads_are_public_but_writes_are_not() {
        assert_eq!(
            requirement_for(&Method::GET, "/api/books"),
            Requirement::Public
        );
        assert_eq!(
            requirement_for(&Method::GET, "/api/books/42"),
            Requirement::Public
        );
        assert_eq!(
            requirement_for(&Method::POST, "/api/books"),
            Requirement::Authenticated
        );
        assert_eq!(
            requirement_for(&Method::DELETE, "/api/books/42"),
            Requirement::Authenticated
        );
    }

    #[test]
    fn unlisted_paths_default_to_authenticated() {
        assert_eq!(
            requirement_for(&Method::GET, "/api/anything-else"),
            Requirement::Authenticated
        );
    }

    #[test]
    fn prefix_patterns_do_not_match_lookalike_paths() {
        // "/api/booksmith" must not fall under "/api/books/*"
        assert_eq!(
            requirement_for(&Method::GET, "/api/booksmith"),
            Requirement::Authenticated
        );
    }
}
