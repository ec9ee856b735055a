//! Raw exclusion rules as declared on dependency edges.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::{ModuleId, ANY};
use crate::errors::ModexError;
use crate::matcher::EXACT;

fn any() -> String {
    ANY.to_string()
}

fn exact() -> String {
    EXACT.to_string()
}

/// A transitive-dependency exclusion as declared in a manifest.
///
/// `group` and `module` default to the wildcard marker, so a declaration like
/// `{ group = "org.slf4j" }` excludes every module of that group. `artifact`
/// optionally narrows the rule to a single artifact name pattern, and
/// `matcher` names the pattern-matching strategy (`"exact"` unless the rule
/// opted into a plug-in matcher such as `"glob"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExcludeRule {
    #[serde(default = "any")]
    pub group: String,
    #[serde(default = "any")]
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<String>,
    #[serde(default = "exact")]
    pub matcher: String,
}

impl ExcludeRule {
    /// Exclude exactly one `group:module`.
    pub fn module_id(group: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            module: module.into(),
            artifact: None,
            matcher: exact(),
        }
    }

    /// Exclude every module of a group.
    pub fn group(group: impl Into<String>) -> Self {
        Self::module_id(group, ANY)
    }

    /// Exclude a module name in any group.
    pub fn module(module: impl Into<String>) -> Self {
        Self::module_id(ANY, module)
    }

    /// Narrow this rule to a single artifact name pattern.
    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    /// Use a plug-in matcher instead of exact matching.
    pub fn with_matcher(mut self, matcher: impl Into<String>) -> Self {
        self.matcher = matcher.into();
        self
    }

    /// Parse shorthand `"group:module"`, where either component may be `"*"`.
    pub fn parse(s: &str) -> Result<Self, ModexError> {
        match ModuleId::parse(s) {
            Some(id) => Ok(Self::module_id(id.group, id.module)),
            None => Err(ModexError::MalformedRule {
                input: s.to_string(),
            }),
        }
    }

    /// Whether this rule uses the exact matcher.
    pub fn is_exact(&self) -> bool {
        self.matcher == EXACT
    }

    /// The rule's group/module pair, wildcards included.
    pub fn module_coordinate(&self) -> ModuleId {
        ModuleId::new(self.group.clone(), self.module.clone())
    }
}

impl fmt::Display for ExcludeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.module)?;
        if let Some(ref artifact) = self.artifact {
            write!(f, "@{artifact}")?;
        }
        if !self.is_exact() {
            write!(f, " ({})", self.matcher)?;
        }
        Ok(())
    }
}
