//! Pattern-matcher plug-in seam for non-exact exclusion rules.
//!
//! The engine never inspects a plug-in matcher's logic: a rule declared with
//! a non-exact matcher is carried through resolution as an opaque leaf, and
//! only consulted here when a coordinate is actually tested against it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::coordinate::is_wildcard;
use crate::errors::ModexError;

/// The built-in exact matcher identifier. Rules with this matcher are
/// decomposed structurally by the engine instead of dispatching here.
pub const EXACT: &str = "exact";

/// The glob matcher identifier, registered by default.
pub const GLOB: &str = "glob";

/// An externally defined pattern-matching strategy.
pub trait PatternMatcher: Send + Sync {
    /// Whether `candidate` matches `pattern` under this strategy.
    fn matches(&self, pattern: &str, candidate: &str) -> bool;
}

/// Registry of named pattern matchers, shared across a resolution session.
///
/// `exact` is built in: it compares for equality, with the wildcard marker
/// accepting any candidate. Plug-in matchers are looked up by the identifier
/// carried on the rule that declared them.
#[derive(Clone, Default)]
pub struct MatcherRegistry {
    matchers: HashMap<String, Arc<dyn PatternMatcher>>,
}

impl MatcherRegistry {
    /// An empty registry: only `exact` matching is available.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard registry, with the `glob` matcher pre-registered.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(GLOB, GlobPatternMatcher::default());
        registry
    }

    /// Register a matcher under a name, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, matcher: impl PatternMatcher + 'static) {
        self.matchers.insert(name.into(), Arc::new(matcher));
    }

    /// Whether a matcher identifier is usable with this registry.
    pub fn knows(&self, name: &str) -> bool {
        name == EXACT || self.matchers.contains_key(name)
    }

    /// Look up a matcher, reporting unregistered identifiers as errors.
    pub fn resolve(&self, name: &str) -> Result<&dyn PatternMatcher, ModexError> {
        self.matchers
            .get(name)
            .map(|m| m.as_ref())
            .ok_or_else(|| ModexError::UnknownMatcher {
                name: name.to_string(),
            })
    }

    /// Test one rule field against one coordinate field.
    ///
    /// A wildcard field accepts anything; `exact` compares for equality; any
    /// other identifier dispatches to the registered plug-in. Unregistered
    /// identifiers match nothing (upstream validation is the supported path).
    pub fn field_matches(&self, matcher: &str, pattern: &str, candidate: &str) -> bool {
        if is_wildcard(pattern) {
            return true;
        }
        if matcher == EXACT {
            return pattern == candidate;
        }
        match self.resolve(matcher) {
            Ok(m) => m.matches(pattern, candidate),
            Err(_) => {
                tracing::warn!("Unknown pattern matcher {matcher:?}; rule matches nothing");
                false
            }
        }
    }
}

impl fmt::Debug for MatcherRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.matchers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("MatcherRegistry")
            .field("matchers", &names)
            .finish()
    }
}

/// Glob-style matching backed by `globset`, with compiled patterns memoized.
#[derive(Debug, Default)]
pub struct GlobPatternMatcher {
    compiled: DashMap<String, Option<globset::GlobMatcher>>,
}

impl PatternMatcher for GlobPatternMatcher {
    fn matches(&self, pattern: &str, candidate: &str) -> bool {
        if let Some(glob) = self.compiled.get(pattern) {
            return glob
                .as_ref()
                .is_some_and(|g| g.is_match(candidate));
        }
        let glob = match globset::Glob::new(pattern) {
            Ok(g) => Some(g.compile_matcher()),
            Err(e) => {
                tracing::warn!("Invalid glob pattern {pattern:?}: {e}");
                None
            }
        };
        let hit = glob.as_ref().is_some_and(|g| g.is_match(candidate));
        self.compiled.insert(pattern.to_string(), glob);
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_field_matching() {
        let registry = MatcherRegistry::new();
        assert!(registry.field_matches(EXACT, "org.slf4j", "org.slf4j"));
        assert!(!registry.field_matches(EXACT, "org.slf4j", "org.apache"));
    }

    #[test]
    fn wildcard_accepts_anything() {
        let registry = MatcherRegistry::new();
        assert!(registry.field_matches(EXACT, "*", "org.slf4j"));
        assert!(registry.field_matches("glob", "*", "org.slf4j"));
    }

    #[test]
    fn glob_matching() {
        let registry = MatcherRegistry::standard();
        assert!(registry.field_matches(GLOB, "slf4j-*", "slf4j-api"));
        assert!(!registry.field_matches(GLOB, "slf4j-*", "logback-core"));
    }

    #[test]
    fn glob_memoizes_compiled_patterns() {
        let matcher = GlobPatternMatcher::default();
        assert!(matcher.matches("lib?", "lib1"));
        assert!(matcher.matches("lib?", "lib2"));
        assert_eq!(matcher.compiled.len(), 1);
    }

    #[test]
    fn unknown_matcher_matches_nothing() {
        let registry = MatcherRegistry::new();
        assert!(!registry.field_matches("regexp", "slf4j-.*", "slf4j-api"));
    }

    #[test]
    fn resolve_reports_unknown() {
        let registry = MatcherRegistry::new();
        assert!(registry.resolve("regexp").is_err());
        assert!(registry.knows(EXACT));
        assert!(!registry.knows("regexp"));
    }
}
