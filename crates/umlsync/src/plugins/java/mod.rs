//! Java type plugin
//!
//! Resolves Java-style type names, extracts members and builds the
//! generalization, realization and aggregation edges between imported types.

mod connections;
mod extractor;
mod import;
mod memory;
mod resolver;

pub use connections::ConnectionBuilder;
pub use extractor::{visibility, MemberExtractor};
pub use import::{import_types, DeleteEntity, ImportTypes};
pub use memory::{MemoryIndex, MemoryWorkspace, ProjectFacts, TypeFacts, WorkspaceFacts};
pub use resolver::TypeNameResolver;
