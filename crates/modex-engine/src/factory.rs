//! Factory seam for predicate construction.
//!
//! Every construction request flows through a fixed pipeline of stages that
//! all implement [`ExcludeFactory`]; each stage either handles the request or
//! delegates to the stage below, so a non-triggered stage is semantically
//! transparent. [`DefaultFactory`] is the mandatory end of the chain.

use std::sync::Arc;

use modex_core::coordinate::{is_wildcard, ModuleId};

use crate::spec::{ExcludeSpec, PatternExclude, SpecRef};

/// One construction capability per predicate shape.
pub trait ExcludeFactory {
    fn nothing(&self) -> SpecRef;
    fn everything(&self) -> SpecRef;
    fn group(&self, group: &str) -> SpecRef;
    fn module(&self, module: &str) -> SpecRef;
    fn module_id(&self, id: ModuleId) -> SpecRef;
    fn pattern(&self, pattern: PatternExclude) -> SpecRef;
    fn any_of(&self, specs: Vec<SpecRef>) -> SpecRef;
    fn all_of(&self, specs: Vec<SpecRef>) -> SpecRef;
}

/// Plain value assembly, no algebra.
///
/// The two singletons are built eagerly and shared for the life of the
/// factory. Structural constructors must not receive the wildcard marker;
/// callers resolve wildcards into the everything/group/module/module-id
/// shapes first.
pub struct DefaultFactory {
    nothing: SpecRef,
    everything: SpecRef,
}

impl DefaultFactory {
    pub fn new() -> Self {
        Self {
            nothing: Arc::new(ExcludeSpec::Nothing),
            everything: Arc::new(ExcludeSpec::Everything),
        }
    }
}

impl Default for DefaultFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ExcludeFactory for DefaultFactory {
    fn nothing(&self) -> SpecRef {
        Arc::clone(&self.nothing)
    }

    fn everything(&self) -> SpecRef {
        Arc::clone(&self.everything)
    }

    fn group(&self, group: &str) -> SpecRef {
        debug_assert!(!is_wildcard(group), "unresolved wildcard group");
        Arc::new(ExcludeSpec::Group(group.to_string()))
    }

    fn module(&self, module: &str) -> SpecRef {
        debug_assert!(!is_wildcard(module), "unresolved wildcard module");
        Arc::new(ExcludeSpec::Module(module.to_string()))
    }

    fn module_id(&self, id: ModuleId) -> SpecRef {
        debug_assert!(!id.has_wildcard(), "unresolved wildcard in module id");
        Arc::new(ExcludeSpec::ModuleId(id))
    }

    fn pattern(&self, pattern: PatternExclude) -> SpecRef {
        Arc::new(ExcludeSpec::Pattern(pattern))
    }

    fn any_of(&self, specs: Vec<SpecRef>) -> SpecRef {
        Arc::new(ExcludeSpec::AnyOf(specs.into_iter().collect()))
    }

    fn all_of(&self, specs: Vec<SpecRef>) -> SpecRef {
        Arc::new(ExcludeSpec::AllOf(specs.into_iter().collect()))
    }
}
