use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for modex operations.
///
/// The exclusion algebra itself is total over well-formed inputs; errors only
/// arise at the boundary, when raw rule declarations are parsed or validated.
#[derive(Debug, Error, Diagnostic)]
pub enum ModexError {
    /// A shorthand rule string could not be parsed.
    #[error("Malformed exclusion rule: {input:?}")]
    #[diagnostic(help("Expected \"group:module\"; either component may be \"*\""))]
    MalformedRule { input: String },

    /// A rule names a matcher that is not registered.
    #[error("Unknown pattern matcher: {name:?}")]
    #[diagnostic(help("Register the matcher before resolving, or use \"exact\""))]
    UnknownMatcher { name: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type ModexResult<T> = miette::Result<T>;
