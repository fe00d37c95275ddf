//! Route matching logic.
//!
//! # Responsibilities
//! - Compile project patterns once, at table construction
//! - Evaluate the three matching tiers in order
//!
//! # Tiers
//! 1. Exact: the key equals one of a route's patterns (case-sensitive)
//! 2. Pattern: a glob pattern matches the whole key (case-insensitive)
//! 3. Catch-all: the dedicated fallback route, if enabled
//!
//! # Design Decisions
//! - Disabled routes are skipped by every tier
//! - First match wins within a tier; iteration order is the table's order
//! - A plain `*` pattern on an ordinary route matches everything in tier 2,
//!   which makes that route a secondary catch-all above the real one

use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::routing::router::Route;

/// A project pattern that could not be compiled.
#[derive(Debug, Error)]
#[error("invalid project pattern '{pattern}': {source}")]
pub struct PatternError {
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// A project pattern compiled to an anchored, case-insensitive regex.
///
/// `*` matches zero or more characters, `?` exactly one; every other
/// character is literal.
#[derive(Debug, Clone)]
pub struct ProjectPattern {
    raw: String,
    regex: Regex,
}

impl ProjectPattern {
    pub fn compile(raw: &str) -> Result<Self, PatternError> {
        let mut expr = String::with_capacity(raw.len() + 8);
        expr.push('^');
        let mut literal = String::new();
        for c in raw.chars() {
            match c {
                '*' | '?' => {
                    expr.push_str(&regex::escape(&literal));
                    literal.clear();
                    expr.push_str(if c == '*' { ".*" } else { "." });
                }
                _ => literal.push(c),
            }
        }
        expr.push_str(&regex::escape(&literal));
        expr.push('$');

        let regex = RegexBuilder::new(&expr)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError {
                pattern: raw.to_string(),
                source,
            })?;
        Ok(Self {
            raw: raw.to_string(),
            regex,
        })
    }

    /// The pattern as written in the configuration.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns true if the pattern matches the whole key.
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }
}

/// Which tier produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier<'a> {
    Exact,
    Pattern(&'a str),
    CatchAll,
}

/// A successful lookup: the route and how it was found.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub tier: MatchTier<'a>,
}

/// Tier 1: first enabled route listing the key verbatim.
pub fn match_exact<'a, I>(routes: I, key: &str) -> Option<&'a Route>
where
    I: IntoIterator<Item = &'a Route>,
{
    routes
        .into_iter()
        .filter(|r| r.enabled)
        .find(|r| r.project_patterns.iter().any(|p| p == key))
}

/// Tier 2: first enabled route with any pattern matching the key.
pub fn match_pattern<'a, I>(routes: I, key: &str) -> Option<(&'a Route, &'a str)>
where
    I: IntoIterator<Item = &'a Route>,
{
    routes.into_iter().filter(|r| r.enabled).find_map(|r| {
        r.matchers()
            .iter()
            .find(|p| p.matches(key))
            .map(|p| (r, p.as_str()))
    })
}

/// Run all three tiers. `routes` must be re-iterable in a stable order.
pub fn resolve<'a, I>(routes: I, catch_all: Option<&'a Route>, key: &str) -> Option<RouteMatch<'a>>
where
    I: IntoIterator<Item = &'a Route> + Clone,
{
    if let Some(route) = match_exact(routes.clone(), key) {
        return Some(RouteMatch {
            route,
            tier: MatchTier::Exact,
        });
    }

    if let Some((route, pattern)) = match_pattern(routes, key) {
        return Some(RouteMatch {
            route,
            tier: MatchTier::Pattern(pattern),
        });
    }

    catch_all.filter(|r| r.enabled).map(|route| RouteMatch {
        route,
        tier: MatchTier::CatchAll,
    })
}
