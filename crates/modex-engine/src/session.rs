//! Resolution-facing entry point for the exclusion algebra.
//!
//! One session lives for one resolution (per build or process-wide, the
//! caller's choice) and is shared by reference across resolver worker
//! threads. All state is insert-only: the rule cache and the combinator
//! caches grow with the distinct rules and operand sets a build declares and
//! are discarded with the session.

use std::sync::Arc;

use dashmap::DashMap;

use modex_core::coordinate::{is_wildcard, ModuleId};
use modex_core::errors::{ModexError, ModexResult};
use modex_core::matcher::MatcherRegistry;
use modex_core::rule::ExcludeRule;

use crate::cache::CachingFactory;
use crate::factory::{DefaultFactory, ExcludeFactory};
use crate::normalize::NormalizingFactory;
use crate::optimize::OptimizingFactory;
use crate::spec::{ExcludeSpec, PatternExclude, SpecRef};

/// The fixed construction pipeline, outermost stage first.
pub type FactoryPipeline =
    OptimizingFactory<CachingFactory<NormalizingFactory<DefaultFactory>>>;

/// Session state for turning declared exclusion rules into canonical
/// predicates and combining them during graph traversal.
pub struct ExclusionSession {
    factory: FactoryPipeline,
    rules: DashMap<ExcludeRule, SpecRef>,
    matchers: Arc<MatcherRegistry>,
    nothing: SpecRef,
}

impl ExclusionSession {
    /// A session with the standard matcher registry (`glob` pre-registered).
    pub fn new() -> Self {
        Self::with_matchers(MatcherRegistry::standard())
    }

    pub fn with_matchers(matchers: MatcherRegistry) -> Self {
        let factory = OptimizingFactory::new(CachingFactory::new(NormalizingFactory::new(
            DefaultFactory::new(),
        )));
        let nothing = factory.nothing();
        Self {
            factory,
            rules: DashMap::new(),
            matchers: Arc::new(matchers),
            nothing,
        }
    }

    /// The "never excludes" value.
    pub fn nothing(&self) -> SpecRef {
        Arc::clone(&self.nothing)
    }

    /// The canonical predicate for one declared rule, memoized by rule value:
    /// repeated lookups for the same declaration return the same instance.
    pub fn for_rule(&self, rule: &ExcludeRule) -> SpecRef {
        if let Some(hit) = self.rules.get(rule) {
            return hit.clone();
        }
        let spec = self.build_rule(rule);
        self.rules.entry(rule.clone()).or_insert(spec).clone()
    }

    fn build_rule(&self, rule: &ExcludeRule) -> SpecRef {
        // Plug-in matchers are never inspected more deeply, and an
        // artifact-qualified rule must stay an exact-match leaf even under
        // the exact matcher: decomposing either would let later merging
        // change what the rule matches.
        if !rule.is_exact() || rule.artifact.is_some() {
            return self.factory.pattern(PatternExclude {
                module_id: rule.module_coordinate(),
                artifact: rule.artifact.clone(),
                matcher: rule.matcher.clone(),
            });
        }
        match (is_wildcard(&rule.group), is_wildcard(&rule.module)) {
            (true, true) => self.factory.everything(),
            (false, true) => self.factory.group(&rule.group),
            (true, false) => self.factory.module(&rule.module),
            (false, false) => self.factory.module_id(rule.module_coordinate()),
        }
    }

    /// The union over a declared rule list; sibling rules combine as
    /// "match any rule". An empty list excludes nothing.
    pub fn exclude_any(&self, rules: &[ExcludeRule]) -> SpecRef {
        if rules.is_empty() {
            return self.nothing();
        }
        let specs = rules.iter().map(|rule| self.for_rule(rule)).collect();
        self.factory.any_of(specs)
    }

    /// Pairwise union of already-built predicates, for merging a node's own
    /// excludes with excludes declared on the incoming edge.
    pub fn any_of(&self, one: Option<&SpecRef>, two: Option<&SpecRef>) -> SpecRef {
        self.factory.any_of_pair(one.cloned(), two.cloned())
    }

    /// Pairwise intersection, for merging exclusions inherited along
    /// converging paths: a module is excluded only if every path excludes it.
    pub fn all_of(&self, one: Option<&SpecRef>, two: Option<&SpecRef>) -> SpecRef {
        self.factory.all_of_pair(one.cloned(), two.cloned())
    }

    /// The matcher registry this session evaluates pattern leaves with.
    pub fn matchers(&self) -> &MatcherRegistry {
        &self.matchers
    }

    /// Evaluate a predicate against a module coordinate.
    pub fn is_excluded(&self, spec: &ExcludeSpec, id: &ModuleId) -> bool {
        spec.excludes(id, &self.matchers)
    }

    /// Evaluate a predicate against a single artifact of a module.
    pub fn is_artifact_excluded(&self, spec: &ExcludeSpec, id: &ModuleId, artifact: &str) -> bool {
        spec.excludes_artifact(id, artifact, &self.matchers)
    }

    /// Check that every plug-in matcher named by `rules` is registered, so
    /// the rule-declaration model can reject bad rules before resolution.
    pub fn verify_rules(&self, rules: &[ExcludeRule]) -> ModexResult<()> {
        for rule in rules {
            if !self.matchers.knows(&rule.matcher) {
                return Err(ModexError::UnknownMatcher {
                    name: rule.matcher.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl Default for ExclusionSession {
    fn default() -> Self {
        Self::new()
    }
}
