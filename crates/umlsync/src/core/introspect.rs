//! Type-introspection provider interface
//!
//! The engine never reads source code itself. A provider (a compiler frontend, a
//! source index, or the in-memory index used by the CLI) hands out type handles
//! that expose raw structural facts. Any call may fail with an
//! [`IntrospectionError`](super::IntrospectionError); a type that does not exist is
//! `Ok(None)`, never an error.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::Introspected;
use super::types::EntityKind;

/// Raw modifier flags of a field or method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub public: bool,
    pub private: bool,
    pub protected: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
}

impl Modifiers {
    pub fn public() -> Self {
        Self {
            public: true,
            ..Self::default()
        }
    }

    pub fn private() -> Self {
        Self {
            private: true,
            ..Self::default()
        }
    }

    pub fn protected() -> Self {
        Self {
            protected: true,
            ..Self::default()
        }
    }

    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn with_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }
}

/// A field as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    pub name: String,
    /// Declared type as source text
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub enum_constant: bool,
}

impl RawField {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            modifiers,
            enum_constant: false,
        }
    }

    pub fn enum_constant(name: impl Into<String>, enum_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: enum_type.into(),
            modifiers: Modifiers::public().with_static().with_final(),
            enum_constant: true,
        }
    }
}

/// A method as reported by the provider
///
/// Parameter names and types are reported as two parallel lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMethod {
    pub name: String,
    /// Return type as source text
    #[serde(default = "void_type")]
    pub return_type: String,
    #[serde(default)]
    pub modifiers: Modifiers,
    #[serde(default)]
    pub parameter_names: Vec<String>,
    #[serde(default)]
    pub parameter_types: Vec<String>,
}

fn void_type() -> String {
    "void".to_string()
}

impl RawMethod {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            modifiers,
            parameter_names: Vec::new(),
            parameter_types: Vec::new(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        self.parameter_names.push(name.into());
        self.parameter_types.push(type_ref.into());
        self
    }
}

/// Handle to one type known to a provider
pub trait TypeHandle: fmt::Debug {
    /// Canonical qualified name, possibly carrying type parameters
    fn qualified_name(&self) -> &str;

    /// Package or namespace the type lives in; empty for the default package
    fn package_name(&self) -> &str;

    fn kind(&self) -> EntityKind;

    /// Path of the source the type was read from, `/<project>/<path>`
    fn origin_path(&self) -> Option<&str>;

    fn superclass_name(&self) -> Introspected<Option<String>>;

    fn super_interface_names(&self) -> Introspected<Vec<String>>;

    /// Import declarations of the enclosing source unit, wildcards included
    fn imports(&self) -> Introspected<Vec<String>>;

    fn fields(&self) -> Introspected<Vec<RawField>>;

    fn methods(&self) -> Introspected<Vec<RawMethod>>;

    /// Member types declared directly inside this type
    fn nested_types(&self) -> Introspected<Vec<Rc<dyn TypeHandle>>>;
}

/// Type lookup over one project's lookup chain
pub trait TypeIndex {
    fn find_type(&self, qualified_name: &str) -> Introspected<Option<Rc<dyn TypeHandle>>>;
}

/// The host's set of projects
pub trait Workspace {
    /// An open project by name; unknown and closed projects yield `None`
    fn project(&self, name: &str) -> Option<Rc<dyn TypeIndex>>;

    /// Project owning the diagram currently being edited
    fn active_project(&self) -> Option<Rc<dyn TypeIndex>>;
}

/// A type followed by its directly nested types, without repeats
pub fn collect_types(handle: Rc<dyn TypeHandle>) -> Vec<Rc<dyn TypeHandle>> {
    let nested = match handle.nested_types() {
        Ok(nested) => nested,
        Err(err) => {
            debug!(type_name = handle.qualified_name(), error = %err, "Nested types unavailable");
            Vec::new()
        }
    };

    let mut types = vec![handle];
    for candidate in nested {
        if !types
            .iter()
            .any(|t| t.qualified_name() == candidate.qualified_name())
        {
            types.push(candidate);
        }
    }
    types
}
