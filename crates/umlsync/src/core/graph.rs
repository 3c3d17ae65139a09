//! Core trait for the diagram graph
//!
//! This trait is the surface the resolution engine mutates. Connection
//! attachment and detachment must update the back-references of both
//! endpoints together.

use super::error::DiagramError;
use super::types::{ConnectionId, ConnectionKind, EntityId};

/// Core trait for diagram graphs
///
/// The associated types let a host keep its own entity and connection records
/// while the engine talks in stable ids.
pub trait DiagramGraph {
    /// The entity record stored by this graph
    type Entity;

    /// The connection record stored by this graph
    type Connection;

    /// What removing an entity hands back for a later restore
    type Removed;

    /// Entity ids in diagram order
    fn children(&self) -> Vec<EntityId>;

    /// Get an entity by id
    fn entity(&self, id: EntityId) -> Option<&Self::Entity>;

    /// Append an entity
    fn add_entity(&mut self, entity: Self::Entity) -> EntityId;

    /// Remove an entity and every connection touching it
    fn remove_entity(&mut self, id: EntityId) -> Result<Self::Removed, DiagramError>;

    /// Put a removed entity and its connections back
    fn restore_entity(&mut self, removed: Self::Removed) -> Result<(), DiagramError>;

    /// Create a connection attached to both ends
    fn add_connection(
        &mut self,
        kind: ConnectionKind,
        source: EntityId,
        target: EntityId,
    ) -> Result<ConnectionId, DiagramError>;

    /// Detach a connection from both ends
    fn remove_connection(&mut self, id: ConnectionId) -> Result<Self::Connection, DiagramError>;

    /// Get the number of entities
    fn entity_count(&self) -> usize;

    /// Get the number of connections
    fn connection_count(&self) -> usize;
}
