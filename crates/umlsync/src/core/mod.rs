//! Core abstractions for diagram synchronization
//!
//! The data model (entities, members, connections), the diagram arena, the
//! provider and command interfaces the engine is written against, and the
//! ambient pieces (errors, configuration, logging).

mod command;
mod config;
mod diagram;
mod error;
mod graph;
mod introspect;
pub mod logging;
pub mod type_ref;
mod types;

pub use command::*;
pub use config::*;
pub use diagram::*;
pub use error::*;
pub use graph::*;
pub use introspect::*;
pub use logging::*;
pub use type_ref::{erase_generics, TypeRef};
pub use types::*;
