//! Exclusion-rule algebra for dependency graph resolution.
//!
//! Declared exclusion rules are turned into canonical, memory-shared
//! predicate values that can be combined once per graph edge without growing
//! a naive boolean tree: rules on sibling declarations combine as a union,
//! rules inherited along converging paths combine as an intersection, and
//! every combination is simplified and memoized on the way through.
//!
//! Construction flows through a fixed pipeline of factory stages, outermost
//! first: degenerate-shape fast paths, combinator memoization, algebraic
//! normalization, and finally plain value assembly. [`ExclusionSession`] is
//! the entry point the graph walker talks to.

pub mod cache;
pub mod factory;
pub mod normalize;
pub mod optimize;
pub mod session;
pub mod spec;

pub use factory::{DefaultFactory, ExcludeFactory};
pub use session::ExclusionSession;
pub use spec::{ExcludeSpec, PatternExclude, SpecRef};
