//! Resolution engine configuration
//!
//! The defaults describe Java source trees. Every field can be overridden from a
//! JSON document; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

/// Constants used by name resolution and the aggregation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Separator between package segments of a qualified name
    pub qualifier_separator: char,
    /// Type keywords that never need resolution
    pub primitives: Vec<String>,
    /// Packages visible without an import, probed before the context package
    pub implicit_packages: Vec<String>,
    /// List-like containers whose single type argument is the aggregated type
    pub list_containers: Vec<String>,
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration document
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn is_primitive(&self, name: &str) -> bool {
        self.primitives.iter().any(|p| p == name)
    }

    pub fn is_qualified(&self, name: &str) -> bool {
        name.contains(self.qualifier_separator)
    }

    /// Join a package and a simple name; an empty package yields the bare name
    pub fn qualify(&self, package: &str, simple_name: &str) -> String {
        if package.is_empty() {
            simple_name.to_string()
        } else {
            format!("{}{}{}", package, self.qualifier_separator, simple_name)
        }
    }

    /// Wildcard suffix of an on-demand import, e.g. `.*`
    pub fn wildcard_suffix(&self) -> String {
        format!("{}*", self.qualifier_separator)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            qualifier_separator: '.',
            primitives: ["int", "long", "double", "float", "char", "boolean", "byte", "short"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            implicit_packages: vec!["java.lang".to_string()],
            list_containers: vec!["List".to_string(), "java.util.List".to_string()],
        }
    }
}
