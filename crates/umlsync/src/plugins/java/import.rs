//! Import and delete primitives
//!
//! Importing is done in three steps so every edge touching a new entity is
//! created exactly once:
//! 1. every new entity is added with its extracted members
//! 2. each new entity runs its own passes against the whole diagram
//! 3. each entity that was already on the diagram runs its passes restricted to
//!    one new entity at a time
//!
//! Edges between two entities that were already present are never touched.

use std::rc::Rc;

use anyhow::{Context, Result};
use tracing::{debug, info, span, warn, Level};

use super::connections::ConnectionBuilder;
use super::extractor::MemberExtractor;
use crate::core::{
    Command, Diagram, DiagramError, Entity, EntityId, EntityKind, Position, RemovedEntity,
    ResolverConfig, Scope, TypeHandle, TypeIndex,
};

/// Add `types` to the diagram at `position` and connect them
///
/// Returns the new entity ids in the order of `types`.
pub fn import_types(
    diagram: &mut Diagram,
    index: &dyn TypeIndex,
    config: &ResolverConfig,
    types: &[Rc<dyn TypeHandle>],
    position: Position,
) -> Vec<EntityId> {
    let import_span = span!(Level::INFO, "import", count = types.len());
    let _enter = import_span.enter();

    let existing = diagram.children();
    let extractor = MemberExtractor::new();

    let mut imported = Vec::with_capacity(types.len());
    for handle in types {
        let mut entity = Entity::new(handle.kind(), handle.qualified_name())
            .with_members(extractor.members(handle.as_ref()))
            .at(position);
        if let Some(path) = handle.origin_path() {
            entity = entity.with_origin_path(path);
        }
        let id = diagram.add_entity(entity);
        debug!(entity = %id, type_name = handle.qualified_name(), "Added entity");
        imported.push(id);
    }

    let builder = ConnectionBuilder::new(index, config);
    for (handle, id) in types.iter().zip(&imported) {
        builder.append_all(diagram, handle.as_ref(), *id, Scope::All);
    }

    for child in existing {
        let Some(entity) = diagram.entity(child) else {
            continue;
        };
        let (kind, identity) = (entity.kind, entity.identity());
        let handle = match index.find_type(&identity) {
            Ok(Some(handle)) => handle,
            Ok(None) => continue,
            Err(err) => {
                debug!(entity = %child, error = %err, "Source lookup failed, skipping");
                continue;
            }
        };
        for new_id in &imported {
            append_sub_connections(&builder, diagram, kind, handle.as_ref(), child, *new_id);
        }
    }

    info!(
        imported = imported.len(),
        entities = diagram.entity_count(),
        connections = diagram.connection_count(),
        "Import finished"
    );
    imported
}

/// Passes an existing entity reruns towards one new entity
///
/// Interfaces only extend other interfaces and enums have no superclass.
fn append_sub_connections(
    builder: &ConnectionBuilder<'_>,
    diagram: &mut Diagram,
    kind: EntityKind,
    handle: &dyn TypeHandle,
    subject: EntityId,
    new_id: EntityId,
) {
    let scope = Scope::Only(new_id);
    match kind {
        EntityKind::Class => {
            builder.append_all(diagram, handle, subject, scope);
        }
        EntityKind::Interface => {
            builder.append_interfaces(diagram, handle, subject, scope);
        }
        EntityKind::Enum => {
            builder.append_interfaces(diagram, handle, subject, scope);
            builder.append_aggregations(diagram, handle, subject, scope);
        }
    }
}

/// Reversible import of a batch of types
pub struct ImportTypes {
    label: String,
    index: Rc<dyn TypeIndex>,
    config: Rc<ResolverConfig>,
    types: Vec<Rc<dyn TypeHandle>>,
    position: Position,
    imported: Vec<EntityId>,
    reverted: Vec<RemovedEntity>,
}

impl ImportTypes {
    pub fn new(
        index: Rc<dyn TypeIndex>,
        config: Rc<ResolverConfig>,
        types: Vec<Rc<dyn TypeHandle>>,
    ) -> Self {
        let label = match types.as_slice() {
            [single] => format!("Import {}", single.qualified_name()),
            _ => format!("Import {} types", types.len()),
        };
        Self {
            label,
            index,
            config,
            types,
            position: Position::default(),
            imported: Vec::new(),
            reverted: Vec::new(),
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Entities created by the last apply
    pub fn imported(&self) -> &[EntityId] {
        &self.imported
    }
}

impl Command for ImportTypes {
    fn label(&self) -> &str {
        &self.label
    }

    fn apply(&mut self, diagram: &mut Diagram) -> Result<()> {
        if self.reverted.is_empty() {
            self.imported = import_types(
                diagram,
                self.index.as_ref(),
                &self.config,
                &self.types,
                self.position,
            );
            return Ok(());
        }

        // Replaying a revert: the earliest import was removed last.
        while let Some(removed) = self.reverted.pop() {
            let id = removed.id;
            diagram
                .restore_entity(removed)
                .with_context(|| format!("Failed to restore imported entity {}", id))?;
        }
        Ok(())
    }

    fn revert(&mut self, diagram: &mut Diagram) -> Result<()> {
        self.reverted.clear();
        for id in self.imported.iter().rev() {
            let removed = diagram
                .remove_entity(*id)
                .with_context(|| format!("Failed to remove imported entity {}", id))?;
            self.reverted.push(removed);
        }
        Ok(())
    }
}

/// Reversible removal of one entity and every edge touching it
pub struct DeleteEntity {
    label: String,
    target: EntityId,
    removed: Option<RemovedEntity>,
}

impl DeleteEntity {
    pub fn new(target: EntityId) -> Self {
        Self {
            label: format!("Delete {}", target),
            target,
            removed: None,
        }
    }

    pub fn target(&self) -> EntityId {
        self.target
    }
}

impl Command for DeleteEntity {
    fn label(&self) -> &str {
        &self.label
    }

    fn apply(&mut self, diagram: &mut Diagram) -> Result<()> {
        let removed = diagram.remove_entity(self.target)?;
        debug!(
            entity = %self.target,
            connections = removed.connections.len(),
            "Deleted entity"
        );
        self.removed = Some(removed);
        Ok(())
    }

    fn revert(&mut self, diagram: &mut Diagram) -> Result<()> {
        let removed = self.removed.take().ok_or_else(|| {
            DiagramError::command_error(format!("{} was never applied", self.label))
        })?;
        if let Err(err) = diagram.restore_entity(removed.clone()) {
            warn!(entity = %self.target, error = %err, "Restore failed");
            self.removed = Some(removed);
            return Err(err.into());
        }
        Ok(())
    }
}
