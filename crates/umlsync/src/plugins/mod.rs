//! Plugin implementations
//!
//! The Java type plugin resolves names and builds edges; the synchronizer
//! drives it to replace entities from current source facts.

pub mod java;
pub mod synchronizer;

pub use java::*;
pub use synchronizer::*;
