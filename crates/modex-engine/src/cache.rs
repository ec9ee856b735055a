//! Combinator memoization.
//!
//! Structurally-equal combination requests resolve to the same shared value
//! instead of re-running normalization. Keys are the operand set per
//! combinator kind; both combinators are commutative, and the set collapses
//! operand order (and duplicates) onto one entry. Entries are never evicted:
//! the key space is bounded by the distinct operand-set shapes a build
//! declares, not by the number of graph edges processed.

use std::collections::BTreeSet;

use dashmap::DashMap;

use modex_core::coordinate::ModuleId;

use crate::factory::ExcludeFactory;
use crate::spec::{PatternExclude, SpecRef};

pub struct CachingFactory<F> {
    inner: F,
    unions: DashMap<BTreeSet<SpecRef>, SpecRef>,
    intersections: DashMap<BTreeSet<SpecRef>, SpecRef>,
}

impl<F> CachingFactory<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            unions: DashMap::new(),
            intersections: DashMap::new(),
        }
    }
}

impl<F: ExcludeFactory> CachingFactory<F> {
    /// Look up or build one combination. Concurrent misses for the same key
    /// may both build, but only one insert wins and both callers get the
    /// winning value; any two correctly-built results are value-equal anyway.
    fn cached(
        map: &DashMap<BTreeSet<SpecRef>, SpecRef>,
        specs: Vec<SpecRef>,
        build: impl FnOnce(Vec<SpecRef>) -> SpecRef,
    ) -> SpecRef {
        let key: BTreeSet<SpecRef> = specs.iter().cloned().collect();
        if let Some(hit) = map.get(&key) {
            return hit.clone();
        }
        tracing::trace!("combinator cache miss ({} operands)", key.len());
        let built = build(specs);
        map.entry(key).or_insert(built).clone()
    }
}

impl<F: ExcludeFactory> ExcludeFactory for CachingFactory<F> {
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
        Self::cached(&self.unions, specs, |specs| self.inner.any_of(specs))
    }

    fn all_of(&self, specs: Vec<SpecRef>) -> SpecRef {
        Self::cached(&self.intersections, specs, |specs| self.inner.all_of(specs))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::factory::DefaultFactory;
    use crate::normalize::NormalizingFactory;

    fn factory() -> CachingFactory<NormalizingFactory<DefaultFactory>> {
        CachingFactory::new(NormalizingFactory::new(DefaultFactory::new()))
    }

    #[test]
    fn repeated_requests_share_one_instance() {
        let f = factory();
        let a = f.group("org.a");
        let b = f.group("org.b");

        let first = f.any_of(vec![a.clone(), b.clone()]);
        let second = f.any_of(vec![a, b]);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn operand_order_does_not_split_entries() {
        let f = factory();
        let a = f.group("org.a");
        let b = f.group("org.b");

        let forward = f.any_of(vec![a.clone(), b.clone()]);
        let reversed = f.any_of(vec![b, a]);
        assert!(Arc::ptr_eq(&forward, &reversed));
    }

    #[test]
    fn union_and_intersection_caches_are_separate() {
        let f = factory();
        let a = f.group("org.a");
        let b = f.module("lib");

        let union = f.any_of(vec![a.clone(), b.clone()]);
        let intersection = f.all_of(vec![a, b]);
        assert_ne!(union, intersection);
    }

    #[test]
    fn leaves_are_not_cached_here() {
        let f = factory();
        // Leaf construction passes through; each call builds a fresh value.
        assert!(!Arc::ptr_eq(&f.group("org.a"), &f.group("org.a")));
        assert_eq!(f.group("org.a"), f.group("org.a"));
    }
}
