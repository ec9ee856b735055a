//! The exclusion predicate value model.
//!
//! Predicates are immutable and value-comparable; two value-equal predicates
//! are always interchangeable, and the caching stages share instances
//! opportunistically on top of that. Combinators hold their operands in a
//! `BTreeSet`, so equality, ordering, and hashing are order-insensitive and
//! deterministic by construction.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use modex_core::coordinate::ModuleId;
use modex_core::matcher::MatcherRegistry;

/// Shared handle to a predicate value.
pub type SpecRef = Arc<ExcludeSpec>;

/// An exclusion predicate over module coordinates.
///
/// Instances are created by the factory pipeline, never mutated; "merging"
/// always produces a new (or cache-shared) value. After normalization,
/// `AnyOf`/`AllOf` have arity >= 2, never nest their own kind directly, and
/// never directly contain `Nothing` or `Everything`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExcludeSpec {
    /// Matches no coordinate. Identity for union, absorbing for intersection.
    Nothing,
    /// Matches every coordinate. Absorbing for union, identity for intersection.
    Everything,
    /// Matches any module of this group.
    Group(String),
    /// Matches this module name in any group.
    Module(String),
    /// Matches exactly this group and module.
    ModuleId(ModuleId),
    /// Matches whatever the named external matcher matches. Never decomposed
    /// or merged structurally; compared only by full field equality.
    Pattern(PatternExclude),
    /// Matches if any operand matches.
    AnyOf(BTreeSet<SpecRef>),
    /// Matches if all operands match.
    AllOf(BTreeSet<SpecRef>),
}

/// The opaque leaf for rules the engine must not inspect: plug-in matchers
/// and artifact-qualified exclusions. Group and module fields may carry the
/// wildcard marker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternExclude {
    pub module_id: ModuleId,
    pub artifact: Option<String>,
    pub matcher: String,
}

impl PatternExclude {
    fn matches_module(&self, id: &ModuleId, matchers: &MatcherRegistry) -> bool {
        matchers.field_matches(&self.matcher, &self.module_id.group, &id.group)
            && matchers.field_matches(&self.matcher, &self.module_id.module, &id.module)
    }
}

impl ExcludeSpec {
    /// Whether this predicate excludes a module outright.
    ///
    /// An artifact-qualified pattern never excludes a whole module; it only
    /// filters artifacts, which is what [`excludes_artifact`] tests.
    ///
    /// [`excludes_artifact`]: ExcludeSpec::excludes_artifact
    pub fn excludes(&self, id: &ModuleId, matchers: &MatcherRegistry) -> bool {
        match self {
            ExcludeSpec::Nothing => false,
            ExcludeSpec::Everything => true,
            ExcludeSpec::Group(group) => group == &id.group,
            ExcludeSpec::Module(module) => module == &id.module,
            ExcludeSpec::ModuleId(module_id) => module_id == id,
            ExcludeSpec::Pattern(pattern) => {
                pattern.artifact.is_none() && pattern.matches_module(id, matchers)
            }
            ExcludeSpec::AnyOf(specs) => specs.iter().any(|s| s.excludes(id, matchers)),
            ExcludeSpec::AllOf(specs) => specs.iter().all(|s| s.excludes(id, matchers)),
        }
    }

    /// Whether this predicate excludes a single artifact of a module.
    pub fn excludes_artifact(
        &self,
        id: &ModuleId,
        artifact: &str,
        matchers: &MatcherRegistry,
    ) -> bool {
        match self {
            ExcludeSpec::Pattern(pattern) => match pattern.artifact {
                Some(ref name) => {
                    pattern.matches_module(id, matchers)
                        && matchers.field_matches(&pattern.matcher, name, artifact)
                }
                None => false,
            },
            ExcludeSpec::AnyOf(specs) => {
                specs.iter().any(|s| s.excludes_artifact(id, artifact, matchers))
            }
            ExcludeSpec::AllOf(specs) => {
                specs.iter().all(|s| s.excludes_artifact(id, artifact, matchers))
            }
            _ => false,
        }
    }

    /// Fast pre-test: can this predicate exclude individual artifacts at all?
    /// Walkers skip per-artifact checks when this is `false`.
    pub fn may_exclude_artifacts(&self) -> bool {
        match self {
            ExcludeSpec::Pattern(pattern) => pattern.artifact.is_some(),
            ExcludeSpec::AnyOf(specs) | ExcludeSpec::AllOf(specs) => {
                specs.iter().any(|s| s.may_exclude_artifacts())
            }
            _ => false,
        }
    }
}

impl fmt::Display for ExcludeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExcludeSpec::Nothing => write!(f, "excludes nothing"),
            ExcludeSpec::Everything => write!(f, "excludes everything"),
            ExcludeSpec::Group(group) => write!(f, "exclude {group}:*"),
            ExcludeSpec::Module(module) => write!(f, "exclude *:{module}"),
            ExcludeSpec::ModuleId(id) => write!(f, "exclude {id}"),
            ExcludeSpec::Pattern(pattern) => write!(f, "exclude {pattern}"),
            ExcludeSpec::AnyOf(specs) => write_operands(f, "any of", specs),
            ExcludeSpec::AllOf(specs) => write_operands(f, "all of", specs),
        }
    }
}

impl fmt::Display for PatternExclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.module_id)?;
        if let Some(ref artifact) = self.artifact {
            write!(f, "@{artifact}")?;
        }
        write!(f, " ({})", self.matcher)
    }
}

fn write_operands(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    specs: &BTreeSet<SpecRef>,
) -> fmt::Result {
    write!(f, "{label} [")?;
    for (i, spec) in specs.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{spec}")?;
    }
    write!(f, "]")
}
