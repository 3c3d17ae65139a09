//! Shared value types for the diagram graph
//!
//! Entities and connections live in the diagram arena and are referred to
//! everywhere else by their stable ids.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier of an entity inside one diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Stable identifier of a connection inside one diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Kind of a type entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Class,
    Interface,
    Enum,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Class => "class",
            EntityKind::Interface => "interface",
            EntityKind::Enum => "enum",
        };
        f.write_str(name)
    }
}

/// Kind of a connection between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// Subtype extends supertype (class or interface inheritance)
    Generalization,
    /// Class or enum implements interface
    Realization,
    /// Contained type is held by a field of the containing type
    Aggregation,
}

impl ConnectionKind {
    /// Arrow used in textual listings
    pub fn arrow(self) -> &'static str {
        match self {
            ConnectionKind::Generalization => "--|>",
            ConnectionKind::Realization => "..|>",
            ConnectionKind::Aggregation => "--o",
        }
    }
}

impl fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionKind::Generalization => "generalization",
            ConnectionKind::Realization => "realization",
            ConnectionKind::Aggregation => "aggregation",
        };
        f.write_str(name)
    }
}

/// Visibility modifier for entity members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,    // +
    Private,   // -
    Protected, // #
    Package,   // ~
}

impl Visibility {
    pub fn to_char(self) -> char {
        match self {
            Visibility::Public => '+',
            Visibility::Private => '-',
            Visibility::Protected => '#',
            Visibility::Package => '~',
        }
    }
}

/// A method parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_ref: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
        }
    }
}

/// A field of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub type_ref: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub is_enum_constant: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            visibility: Visibility::Package,
            is_static: false,
            is_final: false,
            is_enum_constant: false,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }
}

/// A method of an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    pub return_type: String,
    pub visibility: Visibility,
    pub is_abstract: bool,
    pub is_static: bool,
    pub is_final: bool,
    pub params: Vec<Parameter>,
}

impl Operation {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            visibility: Visibility::Package,
            is_abstract: false,
            is_static: false,
            is_final: false,
            params: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_param(mut self, param: Parameter) -> Self {
        self.params.push(param);
        self
    }
}

/// A member snapshot owned by exactly one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "lowercase")]
pub enum Member {
    Attribute(Attribute),
    Operation(Operation),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Attribute(attr) => &attr.name,
            Member::Operation(op) => &op.name,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            Member::Attribute(attr) => attr.visibility,
            Member::Operation(op) => op.visibility,
        }
    }
}

/// Visual position of an entity on the diagram canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Which diagram entities a builder pass may connect to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Every entity of the diagram is a candidate
    #[default]
    All,
    /// Only edges touching this one entity are created
    Only(EntityId),
}

impl Scope {
    /// Whether `candidate` may be the far end of a new edge
    pub fn admits(self, candidate: EntityId) -> bool {
        match self {
            Scope::All => true,
            Scope::Only(id) => id == candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_markers() {
        assert_eq!(Visibility::Public.to_char(), '+');
        assert_eq!(Visibility::Private.to_char(), '-');
        assert_eq!(Visibility::Protected.to_char(), '#');
        assert_eq!(Visibility::Package.to_char(), '~');
    }

    #[test]
    fn test_scope_admits() {
        assert!(Scope::All.admits(EntityId(4)));
        assert!(Scope::Only(EntityId(4)).admits(EntityId(4)));
        assert!(!Scope::Only(EntityId(4)).admits(EntityId(5)));
    }

    #[test]
    fn test_member_accessors() {
        let attr = Member::Attribute(
            Attribute::new("items", "List<Product>").with_visibility(Visibility::Private),
        );
        assert_eq!(attr.name(), "items");
        assert_eq!(attr.visibility(), Visibility::Private);

        let op = Member::Operation(
            Operation::new("total", "long")
                .with_visibility(Visibility::Public)
                .with_param(Parameter::new("discount", "int")),
        );
        assert_eq!(op.name(), "total");
        assert_eq!(op.visibility(), Visibility::Public);
    }

    #[test]
    fn test_display() {
        assert_eq!(EntityId(3).to_string(), "e3");
        assert_eq!(ConnectionId(9).to_string(), "c9");
        assert_eq!(EntityKind::Interface.to_string(), "interface");
        assert_eq!(ConnectionKind::Realization.to_string(), "realization");
        assert_eq!(ConnectionKind::Aggregation.arrow(), "--o");
    }
}
