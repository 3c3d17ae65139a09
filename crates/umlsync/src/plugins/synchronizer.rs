//! Entity synchronization
//!
//! Replaces one diagram entity with a fresh import of its source type. The
//! replacement is a single undoable unit: delete the entity with its edges,
//! then import the type again at the old position.

use std::rc::Rc;

use anyhow::Result;
use tracing::{debug, info, span, warn, Level};

use crate::core::{
    CommandChain, CommandStack, Diagram, Entity, EntityId, ResolverConfig, TypeIndex, Workspace,
};
use crate::plugins::java::{DeleteEntity, ImportTypes};

/// Builds resync commands for entities of one diagram
pub struct Synchronizer<'w> {
    workspace: &'w dyn Workspace,
    config: Rc<ResolverConfig>,
}

impl<'w> Synchronizer<'w> {
    pub fn new(workspace: &'w dyn Workspace, config: Rc<ResolverConfig>) -> Self {
        Self { workspace, config }
    }

    /// Project whose index holds the source of `entity`
    ///
    /// An origin path names the project in its first segment; an unknown or
    /// closed project gives `None` without falling back. Entities without a
    /// path use the active project.
    pub fn project_for(&self, entity: &Entity) -> Option<Rc<dyn TypeIndex>> {
        match entity.origin_path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => {
                let name = project_name(path)?;
                let project = self.workspace.project(name);
                if project.is_none() {
                    debug!(project = name, path, "Project unknown or closed");
                }
                project
            }
            None => self.workspace.active_project(),
        }
    }

    /// Delete-then-reimport command for one entity
    ///
    /// `None` when the entity is not on the diagram or its source type cannot
    /// be found; the diagram is left alone in that case.
    pub fn resync(&self, diagram: &Diagram, id: EntityId) -> Option<CommandChain> {
        let entity = diagram.entity(id)?;
        let identity = entity.identity();

        let resync_span = span!(Level::INFO, "resync", entity = %id, name = %identity);
        let _enter = resync_span.enter();

        let Some(index) = self.project_for(entity) else {
            info!("No project for entity, skipping");
            return None;
        };
        let handle = match index.find_type(&identity) {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                info!("Source type not found, skipping");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "Source lookup failed, skipping");
                return None;
            }
        };

        let import = ImportTypes::new(index, Rc::clone(&self.config), vec![handle])
            .at(entity.position);
        let chain = CommandChain::new(format!("Synchronize {}", identity))
            .with(Box::new(DeleteEntity::new(id)))
            .with(Box::new(import));
        debug!(steps = chain.len(), "Prepared resync");
        Some(chain)
    }

    /// Resync each target through `stack`, one undoable unit per entity
    ///
    /// Returns how many entities were replaced.
    pub fn synchronize(
        &self,
        stack: &mut CommandStack,
        diagram: &mut Diagram,
        targets: &[EntityId],
    ) -> Result<usize> {
        let mut replaced = 0;
        for target in targets {
            if let Some(chain) = self.resync(diagram, *target) {
                stack.execute(Box::new(chain), diagram)?;
                replaced += 1;
            }
        }
        info!(requested = targets.len(), replaced, "Synchronization finished");
        Ok(replaced)
    }
}

/// Project segment of `/<project>/<path>`
fn project_name(path: &str) -> Option<&str> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
