//! Module coordinates as seen by the exclusion engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The wildcard marker accepted in rule fields, meaning "any value".
pub const ANY: &str = "*";

/// Whether a rule field is the wildcard marker.
pub fn is_wildcard(value: &str) -> bool {
    value == ANY
}

/// A `group:module` pair identifying a module, without version.
///
/// The engine never constructs one itself except by copying fields out of a
/// declared rule; coordinates under test are supplied by the graph walker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId {
    pub group: String,
    pub module: String,
}

impl ModuleId {
    pub fn new(group: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            module: module.into(),
        }
    }

    /// Parse `"group:module"` into a coordinate.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() == 2 && !parts[0].is_empty() && !parts[1].is_empty() {
            Some(Self::new(parts[0], parts[1]))
        } else {
            None
        }
    }

    /// Whether either field is the wildcard marker.
    pub fn has_wildcard(&self) -> bool {
        is_wildcard(&self.group) || is_wildcard(&self.module)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.module)
    }
}
