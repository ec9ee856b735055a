//! Algebraic normalization of combinator construction requests.
//!
//! This is the only stage that rewrites; every other stage must be
//! semantically transparent. Requests are rewritten into minimal form before
//! reaching the base factory: flatten same-kind nesting, absorb identity and
//! absorbing elements, deduplicate, drop subsumed operands, then collapse
//! degenerate arity.

use std::collections::BTreeSet;

use modex_core::coordinate::ModuleId;

use crate::factory::ExcludeFactory;
use crate::spec::{ExcludeSpec, PatternExclude, SpecRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Any,
    All,
}

pub struct NormalizingFactory<F> {
    inner: F,
}

impl<F> NormalizingFactory<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: ExcludeFactory> NormalizingFactory<F> {
    fn combine(&self, kind: Kind, specs: Vec<SpecRef>) -> SpecRef {
        // Flatten: operands of the same combinator kind dissolve into their
        // own operands (associativity).
        let mut pending = specs;
        let mut flat: Vec<SpecRef> = Vec::with_capacity(pending.len());
        while let Some(spec) = pending.pop() {
            match (kind, spec.as_ref()) {
                (Kind::Any, ExcludeSpec::AnyOf(children))
                | (Kind::All, ExcludeSpec::AllOf(children)) => {
                    pending.extend(children.iter().cloned());
                }
                _ => flat.push(spec),
            }
        }

        // Absorb: the absorbing element decides the result outright, the
        // identity element drops out. Deduplication falls out of the set.
        let mut retained: BTreeSet<SpecRef> = BTreeSet::new();
        for spec in flat {
            match (kind, spec.as_ref()) {
                (Kind::Any, ExcludeSpec::Everything) => return self.inner.everything(),
                (Kind::All, ExcludeSpec::Nothing) => return self.inner.nothing(),
                (Kind::Any, ExcludeSpec::Nothing) | (Kind::All, ExcludeSpec::Everything) => {}
                _ => {
                    retained.insert(spec);
                }
            }
        }

        // Subsume: drop an operand made redundant by another retained one.
        let survivors: Vec<SpecRef> = retained
            .iter()
            .filter(|a| {
                !retained
                    .iter()
                    .any(|b| b != *a && redundant(kind, a.as_ref(), b.as_ref()))
            })
            .cloned()
            .collect();

        // Collapse arity: empty unions exclude nothing, empty intersections
        // exclude everything, and a single survivor needs no wrapper.
        match survivors.len() {
            0 => match kind {
                Kind::Any => self.inner.nothing(),
                Kind::All => self.inner.everything(),
            },
            1 => survivors.into_iter().next().unwrap(),
            _ => match kind {
                Kind::Any => self.inner.any_of(survivors),
                Kind::All => self.inner.all_of(survivors),
            },
        }
    }
}

/// Whether `b`'s match set contains `a`'s.
///
/// Decided only among structural leaves; pattern leaves never subsume and are
/// never subsumed, and the singletons are handled by the absorb step before
/// this runs. Equal operands are already collapsed by deduplication.
fn covers(b: &ExcludeSpec, a: &ExcludeSpec) -> bool {
    match (b, a) {
        (ExcludeSpec::Group(group), ExcludeSpec::ModuleId(id)) => *group == id.group,
        (ExcludeSpec::Module(module), ExcludeSpec::ModuleId(id)) => *module == id.module,
        _ => false,
    }
}

/// Whether `a` is redundant next to `b` under the combinator's semantics:
/// in a union the broader operand wins, in an intersection the narrower one.
fn redundant(kind: Kind, a: &ExcludeSpec, b: &ExcludeSpec) -> bool {
    match kind {
        Kind::Any => covers(b, a),
        Kind::All => covers(a, b),
    }
}

impl<F: ExcludeFactory> ExcludeFactory for NormalizingFactory<F> {
    fn nothing(&self) -> SpecRef {
        self.inner.nothing()
    }

    fn everything(&self) -> SpecRef {
        self.inner.everything()
    }

    fn group(&self, group: &str) -> SpecRef {
        self.inner.group(group)
    }

    fn module(&self, module: &str) -> SpecRef {
        self.inner.module(module)
    }

    fn module_id(&self, id: ModuleId) -> SpecRef {
        self.inner.module_id(id)
    }

    fn pattern(&self, pattern: PatternExclude) -> SpecRef {
        self.inner.pattern(pattern)
    }

    fn any_of(&self, specs: Vec<SpecRef>) -> SpecRef {
        self.combine(Kind::Any, specs)
    }

    fn all_of(&self, specs: Vec<SpecRef>) -> SpecRef {
        self.combine(Kind::All, specs)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::factory::DefaultFactory;

    fn factory() -> NormalizingFactory<DefaultFactory> {
        NormalizingFactory::new(DefaultFactory::new())
    }

    fn operands(spec: &SpecRef) -> &BTreeSet<SpecRef> {
        match spec.as_ref() {
            ExcludeSpec::AnyOf(specs) | ExcludeSpec::AllOf(specs) => specs,
            other => panic!("expected combinator, got {other:?}"),
        }
    }

    #[test]
    fn flattens_same_kind_nesting() {
        let f = factory();
        let a = f.group("org.a");
        let b = f.group("org.b");
        let c = f.group("org.c");

        let inner = f.any_of(vec![a, b]);
        let outer = f.any_of(vec![inner, c]);

        let specs = operands(&outer);
        assert_eq!(specs.len(), 3);
        assert!(specs
            .iter()
            .all(|s| !matches!(s.as_ref(), ExcludeSpec::AnyOf(_))));
    }

    #[test]
    fn other_kind_nesting_is_kept() {
        let f = factory();
        let a = f.group("org.a");
        let b = f.module("lib");
        let c = f.group("org.c");

        let intersection = f.all_of(vec![a, b]);
        let union = f.any_of(vec![intersection.clone(), c]);

        assert!(operands(&union).contains(&intersection));
    }

    #[test]
    fn union_absorbs_everything_and_drops_nothing() {
        let f = factory();
        let a = f.group("org.a");

        assert_eq!(
            *f.any_of(vec![a.clone(), f.everything()]),
            ExcludeSpec::Everything
        );
        // Nothing is the union identity: dropping it leaves a single operand.
        assert!(Arc::ptr_eq(&f.any_of(vec![a.clone(), f.nothing()]), &a));
    }

    #[test]
    fn intersection_absorbs_nothing_and_drops_everything() {
        let f = factory();
        let a = f.group("org.a");

        assert_eq!(
            *f.all_of(vec![a.clone(), f.nothing()]),
            ExcludeSpec::Nothing
        );
        assert!(Arc::ptr_eq(&f.all_of(vec![a.clone(), f.everything()]), &a));
    }

    #[test]
    fn deduplicates_value_equal_operands() {
        let f = factory();
        let a = f.group("org.a");
        let a_again = f.group("org.a");
        let b = f.group("org.b");

        let union = f.any_of(vec![a, a_again, b]);
        assert_eq!(operands(&union).len(), 2);
    }

    #[test]
    fn union_drops_subsumed_module_id() {
        let f = factory();
        let group = f.group("org.a");
        let exact = f.module_id(ModuleId::new("org.a", "lib"));

        // The group-wide exclusion already covers the exact one.
        let union = f.any_of(vec![group.clone(), exact]);
        assert!(Arc::ptr_eq(&union, &group));
    }

    #[test]
    fn union_keeps_module_id_of_other_group() {
        let f = factory();
        let group = f.group("org.a");
        let other = f.module_id(ModuleId::new("org.b", "lib"));

        let union = f.any_of(vec![group, other]);
        assert_eq!(operands(&union).len(), 2);
    }

    #[test]
    fn module_name_subsumes_exact_only_with_same_module() {
        let f = factory();
        let module = f.module("lib");
        let same = f.module_id(ModuleId::new("org.a", "lib"));
        let different = f.module_id(ModuleId::new("org.a", "other"));

        let union = f.any_of(vec![module.clone(), same]);
        assert!(Arc::ptr_eq(&union, &module));

        let union = f.any_of(vec![module, different]);
        assert_eq!(operands(&union).len(), 2);
    }

    #[test]
    fn intersection_drops_broader_operand() {
        let f = factory();
        let group = f.group("org.a");
        let exact = f.module_id(ModuleId::new("org.a", "lib"));

        // The narrower condition already implies the broader one.
        let intersection = f.all_of(vec![group, exact.clone()]);
        assert!(Arc::ptr_eq(&intersection, &exact));
    }

    #[test]
    fn patterns_are_never_subsumed() {
        let f = factory();
        let group = f.group("org.a");
        let pattern = f.pattern(PatternExclude {
            module_id: ModuleId::new("org.a", "lib"),
            artifact: None,
            matcher: "glob".into(),
        });

        let union = f.any_of(vec![group, pattern]);
        assert_eq!(operands(&union).len(), 2);
    }

    #[test]
    fn collapses_empty_and_singleton_requests() {
        let f = factory();
        let a = f.group("org.a");

        assert_eq!(*f.any_of(vec![]), ExcludeSpec::Nothing);
        assert_eq!(*f.all_of(vec![]), ExcludeSpec::Everything);
        assert!(Arc::ptr_eq(&f.any_of(vec![a.clone()]), &a));
        assert!(Arc::ptr_eq(&f.all_of(vec![a.clone()]), &a));
    }
}
