//! umlsync - Keep class diagrams in step with source types
//!
//! A library that reverse-engineers inheritance, interface realization and
//! field aggregation between source types into a diagram graph, and replaces
//! single entities from current source facts as one undoable step.
//!
//! # Quick Start
//!
//! ```rust
//! use umlsync::prelude::*;
//!
//! let index = MemoryIndex::from_types(vec![
//!     TypeFacts::interface("geo.Shape"),
//!     TypeFacts::class("geo.Circle").implements("Shape"),
//! ]);
//!
//! let diagram = import(&index, &["geo.Shape", "geo.Circle"]).unwrap();
//! assert_eq!(diagram.entity_count(), 2);
//! assert_eq!(diagram.connection_count(), 1);
//! ```
//!
//! # Synchronizing
//!
//! ```rust
//! use std::rc::Rc;
//! use umlsync::prelude::*;
//!
//! let workspace = MemoryWorkspace::new().with_project(
//!     "geo",
//!     MemoryIndex::from_types(vec![TypeFacts::class("geo.Circle")]),
//! );
//! let mut diagram = Diagram::new();
//! let circle = diagram.add_entity(
//!     Entity::class("geo.Circle").with_origin_path("/geo/src/geo/Circle.java"),
//! );
//!
//! let sync = Synchronizer::new(&workspace, Rc::new(ResolverConfig::default()));
//! let mut stack = CommandStack::new();
//! let before = diagram.clone();
//! assert_eq!(sync.synchronize(&mut stack, &mut diagram, &[circle]).unwrap(), 1);
//!
//! stack.undo(&mut diagram).unwrap();
//! assert_eq!(diagram, before);
//! ```

pub mod core;
pub mod plugins;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        Command, CommandChain, CommandStack, ConnectionKind, Diagram, DiagramGraph, Entity,
        EntityId, EntityKind, Position, ResolverConfig, Scope, TypeHandle, TypeIndex, Workspace,
    };
    pub use crate::import;
    pub use crate::plugins::java::{
        ConnectionBuilder, MemberExtractor, MemoryIndex, MemoryWorkspace, TypeFacts,
        TypeNameResolver,
    };
    pub use crate::plugins::synchronizer::Synchronizer;
}

/// Import the named types into a fresh diagram
///
/// Uses the default resolver configuration. Every name must be known to
/// `index`.
///
/// # Example
/// ```rust
/// use umlsync::import;
/// use umlsync::plugins::java::{MemoryIndex, TypeFacts};
///
/// let index = MemoryIndex::from_types(vec![TypeFacts::class("shop.Order")]);
/// assert!(import(&index, &["shop.Order"]).is_ok());
/// assert!(import(&index, &["shop.Missing"]).is_err());
/// ```
pub fn import(index: &dyn TypeIndex, names: &[&str]) -> anyhow::Result<Diagram> {
    import_with_config(index, names, &ResolverConfig::default())
}

/// Import the named types into a fresh diagram using `config`
pub fn import_with_config(
    index: &dyn TypeIndex,
    names: &[&str],
    config: &ResolverConfig,
) -> anyhow::Result<Diagram> {
    let mut types = Vec::with_capacity(names.len());
    for name in names {
        let handle = index
            .find_type(name)?
            .ok_or_else(|| anyhow::anyhow!("Type not found: {}", name))?;
        types.extend(collect_types(handle));
    }

    let mut diagram = Diagram::new();
    plugins::java::import_types(&mut diagram, index, config, &types, Position::default());
    Ok(diagram)
}
