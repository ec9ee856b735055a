//! Fast paths for the degenerate call shapes that dominate real call volume.
//!
//! Most exclude lists carry zero, one, or two entries, and most pairwise
//! merges during traversal involve an absent or repeated operand. Those
//! shapes are answered here without touching the cache or the normalizer.

use std::sync::Arc;

use modex_core::coordinate::ModuleId;

use crate::factory::ExcludeFactory;
use crate::spec::{PatternExclude, SpecRef};

pub struct OptimizingFactory<F> {
    inner: F,
}

impl<F> OptimizingFactory<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }

    fn same(a: &SpecRef, b: &SpecRef) -> bool {
        Arc::ptr_eq(a, b) || a == b
    }
}

impl<F: ExcludeFactory> OptimizingFactory<F> {
    /// Pairwise union where either operand may be absent; an absent operand
    /// is the union identity and costs nothing.
    pub fn any_of_pair(&self, one: Option<SpecRef>, two: Option<SpecRef>) -> SpecRef {
        match (one, two) {
            (None, None) => self.nothing(),
            (Some(spec), None) | (None, Some(spec)) => spec,
            (Some(one), Some(two)) => self.any_of(vec![one, two]),
        }
    }

    /// Pairwise intersection where either operand may be absent.
    pub fn all_of_pair(&self, one: Option<SpecRef>, two: Option<SpecRef>) -> SpecRef {
        match (one, two) {
            (None, None) => self.everything(),
            (Some(spec), None) | (None, Some(spec)) => spec,
            (Some(one), Some(two)) => self.all_of(vec![one, two]),
        }
    }
}

impl<F: ExcludeFactory> ExcludeFactory for OptimizingFactory<F> {
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

    fn any_of(&self, mut specs: Vec<SpecRef>) -> SpecRef {
        match specs.len() {
            0 => self.inner.nothing(),
            1 => specs.pop().unwrap(),
            2 if Self::same(&specs[0], &specs[1]) => specs.pop().unwrap(),
            _ => self.inner.any_of(specs),
        }
    }

    fn all_of(&self, mut specs: Vec<SpecRef>) -> SpecRef {
        match specs.len() {
            0 => self.inner.everything(),
            1 => specs.pop().unwrap(),
            2 if Self::same(&specs[0], &specs[1]) => specs.pop().unwrap(),
            _ => self.inner.all_of(specs),
        }
    }
}
