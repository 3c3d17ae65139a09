//! Diagram graph storage
//!
//! The diagram owns every entity and connection in an arena keyed by stable ids.
//! Entities keep back-references to the connections touching them; both ends are
//! updated together whenever a connection is attached or detached.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::error::DiagramError;
use super::graph::DiagramGraph;
use super::type_ref::erase_generics;
use super::types::{
    Attribute, ConnectionId, ConnectionKind, EntityId, EntityKind, Member, Position,
};

/// A class, interface or enum on the diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Qualified or simple name, possibly with type parameters
    pub name: String,
    pub members: Vec<Member>,
    /// Source path the entity was imported from, `/<project>/<path>`
    pub origin_path: Option<String>,
    pub position: Position,
    source_connections: Vec<ConnectionId>,
    target_connections: Vec<ConnectionId>,
}

impl Entity {
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            members: Vec::new(),
            origin_path: None,
            position: Position::default(),
            source_connections: Vec::new(),
            target_connections: Vec::new(),
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Class, name)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Interface, name)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(EntityKind::Enum, name)
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = Member>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn with_origin_path(mut self, path: impl Into<String>) -> Self {
        self.origin_path = Some(path.into());
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Name used for matching: the name with generic parameters erased
    pub fn identity(&self) -> String {
        erase_generics(&self.name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.members.iter().filter_map(|m| match m {
            Member::Attribute(attr) => Some(attr),
            Member::Operation(_) => None,
        })
    }

    /// Connections this entity is the source of
    pub fn source_connections(&self) -> &[ConnectionId] {
        &self.source_connections
    }

    /// Connections this entity is the target of
    pub fn target_connections(&self) -> &[ConnectionId] {
        &self.target_connections
    }

    fn detached(mut self) -> Self {
        self.source_connections.clear();
        self.target_connections.clear();
        self
    }
}

/// A typed edge between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Connection {
    pub kind: ConnectionKind,
    pub source: EntityId,
    pub target: EntityId,
}

impl Connection {
    pub fn new(kind: ConnectionKind, source: EntityId, target: EntityId) -> Self {
        Self {
            kind,
            source,
            target,
        }
    }

    pub fn touches(&self, id: EntityId) -> bool {
        self.source == id || self.target == id
    }
}

/// Everything `remove_entity` took out of the diagram
///
/// Feeding it back to `restore_entity` puts the entity at its old place in the
/// child order and reattaches every connection under its old id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedEntity {
    pub id: EntityId,
    pub index: usize,
    pub entity: Entity,
    pub connections: Vec<(ConnectionId, Connection)>,
}

/// The diagram root: ordered entities plus the connections between them
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    entities: HashMap<EntityId, Entity>,
    order: Vec<EntityId>,
    connections: BTreeMap<ConnectionId, Connection>,
    next_entity: u64,
    next_connection: u64,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity ids in diagram order
    pub fn children(&self) -> Vec<EntityId> {
        self.order.clone()
    }

    /// Entities in diagram order
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.order
            .iter()
            .filter_map(move |id| self.entities.get(id).map(|e| (*id, e)))
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// First entity, in diagram order, whose identity equals `name`
    pub fn entity_by_identity(&self, name: &str) -> Option<EntityId> {
        self.entities()
            .find(|(_, e)| e.identity() == name)
            .map(|(id, _)| id)
    }

    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    /// Append an entity; any back-references it carries are dropped
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.insert(id, entity.detached());
        self.order.push(id);
        id
    }

    /// Remove an entity together with every connection touching it
    pub fn remove_entity(&mut self, id: EntityId) -> Result<RemovedEntity, DiagramError> {
        let index = self
            .order
            .iter()
            .position(|e| *e == id)
            .ok_or_else(|| DiagramError::unknown_entity(id))?;

        let touching: Vec<ConnectionId> = self
            .connections
            .iter()
            .filter(|(_, c)| c.touches(id))
            .map(|(cid, _)| *cid)
            .collect();

        let mut connections = Vec::with_capacity(touching.len());
        for cid in touching {
            let connection = self.remove_connection(cid)?;
            connections.push((cid, connection));
        }

        self.order.remove(index);
        let entity = self
            .entities
            .remove(&id)
            .ok_or_else(|| DiagramError::unknown_entity(id))?;

        Ok(RemovedEntity {
            id,
            index,
            entity: entity.detached(),
            connections,
        })
    }

    /// Undo a `remove_entity`
    pub fn restore_entity(&mut self, removed: RemovedEntity) -> Result<(), DiagramError> {
        let RemovedEntity {
            id,
            index,
            entity,
            connections,
        } = removed;

        if self.entities.contains_key(&id) {
            return Err(DiagramError::duplicate_entity(id));
        }
        for (cid, connection) in &connections {
            if self.connections.contains_key(cid) {
                return Err(DiagramError::DuplicateConnection { id: *cid });
            }
            for end in [connection.source, connection.target] {
                if end != id && !self.entities.contains_key(&end) {
                    return Err(DiagramError::unknown_entity(end));
                }
            }
        }

        self.entities.insert(id, entity.detached());
        self.order.insert(index.min(self.order.len()), id);
        self.next_entity = self.next_entity.max(id.0 + 1);

        for (cid, connection) in connections {
            self.attach(cid, connection)?;
        }
        Ok(())
    }

    /// Create a connection and attach it to both ends
    ///
    /// Value-equal duplicates are accepted; see `duplicate_connections`.
    pub fn add_connection(
        &mut self,
        kind: ConnectionKind,
        source: EntityId,
        target: EntityId,
    ) -> Result<ConnectionId, DiagramError> {
        for end in [source, target] {
            if !self.entities.contains_key(&end) {
                return Err(DiagramError::unknown_entity(end));
            }
        }
        let id = ConnectionId(self.next_connection);
        self.next_connection += 1;
        self.attach(id, Connection::new(kind, source, target))?;
        Ok(id)
    }

    /// Detach a connection from both ends and drop it
    pub fn remove_connection(&mut self, id: ConnectionId) -> Result<Connection, DiagramError> {
        let connection = self
            .connections
            .remove(&id)
            .ok_or_else(|| DiagramError::unknown_connection(id))?;
        if let Some(source) = self.entities.get_mut(&connection.source) {
            source.source_connections.retain(|c| *c != id);
        }
        if let Some(target) = self.entities.get_mut(&connection.target) {
            target.target_connections.retain(|c| *c != id);
        }
        Ok(connection)
    }

    fn attach(&mut self, id: ConnectionId, connection: Connection) -> Result<(), DiagramError> {
        let source = self
            .entities
            .get_mut(&connection.source)
            .ok_or_else(|| DiagramError::unknown_entity(connection.source))?;
        insert_sorted(&mut source.source_connections, id);

        let target = self
            .entities
            .get_mut(&connection.target)
            .ok_or_else(|| DiagramError::unknown_entity(connection.target))?;
        insert_sorted(&mut target.target_connections, id);

        self.connections.insert(id, connection);
        self.next_connection = self.next_connection.max(id.0 + 1);
        Ok(())
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    /// All connections in creation order
    pub fn connections(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> {
        self.connections.iter().map(|(id, c)| (*id, c))
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Connections with `id` at either end
    pub fn connections_of(&self, id: EntityId) -> Vec<ConnectionId> {
        self.connections
            .iter()
            .filter(|(_, c)| c.touches(id))
            .map(|(cid, _)| *cid)
            .collect()
    }

    /// Connections equal by value to (`kind`, `source`, `target`)
    pub fn connections_between(
        &self,
        kind: ConnectionKind,
        source: EntityId,
        target: EntityId,
    ) -> Vec<ConnectionId> {
        let wanted = Connection::new(kind, source, target);
        self.connections
            .iter()
            .filter(|(_, c)| **c == wanted)
            .map(|(cid, _)| *cid)
            .collect()
    }

    /// Connections that occur more than once by value, with their multiplicity
    pub fn duplicate_connections(&self) -> Vec<(Connection, usize)> {
        let mut counts: Vec<(Connection, usize)> = Vec::new();
        for connection in self.connections.values() {
            match counts.iter_mut().find(|(c, _)| c == connection) {
                Some((_, n)) => *n += 1,
                None => counts.push((*connection, 1)),
            }
        }
        counts.retain(|(_, n)| *n > 1);
        counts
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.order.clear();
        self.connections.clear();
    }
}

/// Diagrams are equal when their entities (in order) and connections match;
/// id counters are not compared.
impl PartialEq for Diagram {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
            && self.entities == other.entities
            && self.connections == other.connections
    }
}

impl Eq for Diagram {}

fn insert_sorted(ids: &mut Vec<ConnectionId>, id: ConnectionId) {
    if let Err(pos) = ids.binary_search(&id) {
        ids.insert(pos, id);
    }
}

impl DiagramGraph for Diagram {
    type Entity = Entity;
    type Connection = Connection;
    type Removed = RemovedEntity;

    fn children(&self) -> Vec<EntityId> {
        Diagram::children(self)
    }

    fn entity(&self, id: EntityId) -> Option<&Self::Entity> {
        Diagram::entity(self, id)
    }

    fn add_entity(&mut self, entity: Self::Entity) -> EntityId {
        Diagram::add_entity(self, entity)
    }

    fn remove_entity(&mut self, id: EntityId) -> Result<Self::Removed, DiagramError> {
        Diagram::remove_entity(self, id)
    }

    fn restore_entity(&mut self, removed: Self::Removed) -> Result<(), DiagramError> {
        Diagram::restore_entity(self, removed)
    }

    fn add_connection(
        &mut self,
        kind: ConnectionKind,
        source: EntityId,
        target: EntityId,
    ) -> Result<ConnectionId, DiagramError> {
        Diagram::add_connection(self, kind, source, target)
    }

    fn remove_connection(&mut self, id: ConnectionId) -> Result<Self::Connection, DiagramError> {
        Diagram::remove_connection(self, id)
    }

    fn entity_count(&self) -> usize {
        Diagram::entity_count(self)
    }

    fn connection_count(&self) -> usize {
        Diagram::connection_count(self)
    }
}
