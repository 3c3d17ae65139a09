//! Connection building
//!
//! Derives the generalization, realization and aggregation edges one entity
//! takes part in, matching resolved type names against the entities already on
//! the diagram.
//!
//! The passes never look at existing edges. Running a pass twice for the same
//! entity creates every edge twice; callers remove an entity's edges before
//! recomputing them.

use tracing::{debug, span, trace, warn, Level};

use super::resolver::TypeNameResolver;
use crate::core::type_ref::element_type_name;
use crate::core::{
    ConnectionId, ConnectionKind, DiagramGraph, Entity, EntityId, EntityKind, ResolverConfig,
    Scope, TypeHandle, TypeIndex,
};

/// Builds typed edges for one entity at a time
pub struct ConnectionBuilder<'a> {
    resolver: TypeNameResolver<'a>,
}

impl<'a> ConnectionBuilder<'a> {
    pub fn new(index: &'a dyn TypeIndex, config: &'a ResolverConfig) -> Self {
        Self {
            resolver: TypeNameResolver::new(index, config),
        }
    }

    pub fn resolver(&self) -> &TypeNameResolver<'a> {
        &self.resolver
    }

    /// Run all three passes for `subject`
    pub fn append_all<G>(
        &self,
        diagram: &mut G,
        handle: &dyn TypeHandle,
        subject: EntityId,
        scope: Scope,
    ) -> Vec<ConnectionId>
    where
        G: DiagramGraph<Entity = Entity> + ?Sized,
    {
        let mut created = self.append_generalization(diagram, handle, subject, scope);
        created.extend(self.append_interfaces(diagram, handle, subject, scope));
        created.extend(self.append_aggregations(diagram, handle, subject, scope));
        created
    }

    /// Generalization from `subject` to the entity named by its superclass
    pub fn append_generalization<G>(
        &self,
        diagram: &mut G,
        handle: &dyn TypeHandle,
        subject: EntityId,
        scope: Scope,
    ) -> Vec<ConnectionId>
    where
        G: DiagramGraph<Entity = Entity> + ?Sized,
    {
        let pass_span = span!(Level::DEBUG, "generalization_pass", subject = %subject);
        let _enter = pass_span.enter();

        let superclass = match handle.superclass_name() {
            Ok(Some(name)) => name,
            Ok(None) => return Vec::new(),
            Err(err) => {
                debug!(error = %err, "Superclass unavailable");
                return Vec::new();
            }
        };
        let resolved = self.resolver.resolve(handle, &superclass);
        trace!(superclass = %superclass, resolved = %resolved, "Resolved superclass");

        let found = find_entity(diagram, scope, |entity| entity.identity() == resolved);
        match found {
            Some(target) => connect(diagram, ConnectionKind::Generalization, subject, target)
                .into_iter()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Realization (or interface generalization) towards each superinterface
    pub fn append_interfaces<G>(
        &self,
        diagram: &mut G,
        handle: &dyn TypeHandle,
        subject: EntityId,
        scope: Scope,
    ) -> Vec<ConnectionId>
    where
        G: DiagramGraph<Entity = Entity> + ?Sized,
    {
        let pass_span = span!(Level::DEBUG, "interface_pass", subject = %subject);
        let _enter = pass_span.enter();

        let subject_kind = match diagram.entity(subject) {
            Some(entity) => entity.kind,
            None => {
                warn!(subject = %subject, "Subject entity is not on the diagram");
                return Vec::new();
            }
        };
        let kind = match subject_kind {
            EntityKind::Class | EntityKind::Enum => ConnectionKind::Realization,
            EntityKind::Interface => ConnectionKind::Generalization,
        };

        let interfaces = match handle.super_interface_names() {
            Ok(names) => names,
            Err(err) => {
                debug!(error = %err, "Superinterfaces unavailable");
                return Vec::new();
            }
        };

        let mut created = Vec::new();
        for interface in interfaces {
            let resolved = self.resolver.resolve(handle, &interface);
            trace!(interface = %interface, resolved = %resolved, "Resolved superinterface");

            let found = find_entity(diagram, scope, |entity| {
                entity.kind == EntityKind::Interface && entity.identity() == resolved
            });
            if let Some(target) = found {
                created.extend(connect(diagram, kind, subject, target));
            }
        }
        created
    }

    /// Aggregation from each non-static attribute's type to `subject`
    pub fn append_aggregations<G>(
        &self,
        diagram: &mut G,
        handle: &dyn TypeHandle,
        subject: EntityId,
        scope: Scope,
    ) -> Vec<ConnectionId>
    where
        G: DiagramGraph<Entity = Entity> + ?Sized,
    {
        let pass_span = span!(Level::DEBUG, "aggregation_pass", subject = %subject);
        let _enter = pass_span.enter();

        let (subject_name, attributes) = match diagram.entity(subject) {
            Some(entity) => (
                entity.name.clone(),
                entity
                    .attributes()
                    .filter(|attr| !attr.is_static)
                    .cloned()
                    .collect::<Vec<_>>(),
            ),
            None => {
                warn!(subject = %subject, "Subject entity is not on the diagram");
                return Vec::new();
            }
        };
        let declared_in_enum = handle.kind() == EntityKind::Enum;
        let containers = &self.resolver.config().list_containers;

        let mut created = Vec::new();
        for attr in attributes {
            let element = element_type_name(&attr.type_ref, containers);
            let resolved = self.resolver.resolve(handle, &element);
            trace!(attribute = %attr.name, element = %element, resolved = %resolved, "Resolved attribute type");

            let found = find_entity(diagram, scope, |entity| match entity.kind {
                EntityKind::Class | EntityKind::Interface => entity.identity() == resolved,
                EntityKind::Enum => {
                    let own_enum = declared_in_enum && entity.name == subject_name;
                    !own_enum && entity.identity() == resolved
                }
            });
            if let Some(source) = found {
                created.extend(connect(diagram, ConnectionKind::Aggregation, source, subject));
            }
        }
        created
    }
}

/// First admitted entity, in diagram order, accepted by `matches`
fn find_entity<G, F>(diagram: &G, scope: Scope, matches: F) -> Option<EntityId>
where
    G: DiagramGraph<Entity = Entity> + ?Sized,
    F: Fn(&Entity) -> bool,
{
    diagram
        .children()
        .into_iter()
        .filter(|id| scope.admits(*id))
        .find(|id| diagram.entity(*id).is_some_and(&matches))
}

fn connect<G>(
    diagram: &mut G,
    kind: ConnectionKind,
    source: EntityId,
    target: EntityId,
) -> Option<ConnectionId>
where
    G: DiagramGraph<Entity = Entity> + ?Sized,
{
    match diagram.add_connection(kind, source, target) {
        Ok(id) => {
            debug!(connection = %id, kind = %kind, source = %source, target = %target, "Created connection");
            Some(id)
        }
        Err(err) => {
            warn!(kind = %kind, error = %err, "Could not create connection");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Attribute, Diagram, Member, Modifiers, RawField};
    use crate::plugins::java::{MemberExtractor, MemoryIndex, TypeFacts};

    fn place(diagram: &mut Diagram, facts: &TypeFacts) -> EntityId {
        let entity = Entity::new(facts.kind, facts.name.clone())
            .with_members(MemberExtractor::new().members(facts));
        diagram.add_entity(entity)
    }

    #[test]
    fn test_superclass_edge() {
        let animal = TypeFacts::class("zoo.Animal");
        let dog = TypeFacts::class("zoo.Dog").extends("Animal");
        let index = MemoryIndex::from_types(vec![animal.clone(), dog.clone()]);
        let config = ResolverConfig::default();
        let builder = ConnectionBuilder::new(&index, &config);

        let mut diagram = Diagram::new();
        let animal_id = place(&mut diagram, &animal);
        let dog_id = place(&mut diagram, &dog);

        let created = builder.append_generalization(&mut diagram, &dog, dog_id, Scope::All);
        assert_eq!(created.len(), 1);
        let edge = diagram.connection(created[0]).unwrap();
        assert_eq!(edge.kind, ConnectionKind::Generalization);
        assert_eq!(edge.source, dog_id);
        assert_eq!(edge.target, animal_id);
    }

    #[test]
    fn test_interface_extends_interface_is_generalization() {
        let shape = TypeFacts::interface("geo.Shape");
        let solid = TypeFacts::interface("geo.Solid").implements("Shape");
        let index = MemoryIndex::from_types(vec![shape.clone(), solid.clone()]);
        let config = ResolverConfig::default();
        let builder = ConnectionBuilder::new(&index, &config);

        let mut diagram = Diagram::new();
        let shape_id = place(&mut diagram, &shape);
        let solid_id = place(&mut diagram, &solid);

        let created = builder.append_interfaces(&mut diagram, &solid, solid_id, Scope::All);
        assert_eq!(created.len(), 1);
        assert_eq!(
            diagram
                .connections_between(ConnectionKind::Generalization, solid_id, shape_id)
                .len(),
            1
        );
    }

    #[test]
    fn test_realization_ignores_classes_with_interface_name() {
        let fake = TypeFacts::class("geo.Shape");
        let circle = TypeFacts::class("geo.Circle").implements("Shape");
        let index = MemoryIndex::from_types(vec![fake.clone(), circle.clone()]);
        let config = ResolverConfig::default();
        let builder = ConnectionBuilder::new(&index, &config);

        let mut diagram = Diagram::new();
        place(&mut diagram, &fake);
        let circle_id = place(&mut diagram, &circle);

        assert!(builder
            .append_interfaces(&mut diagram, &circle, circle_id, Scope::All)
            .is_empty());
    }

    #[test]
    fn test_scope_only_skips_other_entities() {
        let animal = TypeFacts::class("zoo.Animal");
        let dog = TypeFacts::class("zoo.Dog").extends("Animal");
        let index = MemoryIndex::from_types(vec![animal.clone(), dog.clone()]);
        let config = ResolverConfig::default();
        let builder = ConnectionBuilder::new(&index, &config);

        let mut diagram = Diagram::new();
        place(&mut diagram, &animal);
        let dog_id = place(&mut diagram, &dog);
        let unrelated = diagram.add_entity(Entity::class("zoo.Keeper"));

        let created =
            builder.append_generalization(&mut diagram, &dog, dog_id, Scope::Only(unrelated));
        assert!(created.is_empty());
    }

    #[test]
    fn test_array_attribute_aggregates_element() {
        let product = TypeFacts::class("shop.Product");
        let shelf = TypeFacts::class("shop.Shelf").field(RawField::new(
            "products",
            "Product[]",
            Modifiers::private(),
        ));
        let index = MemoryIndex::from_types(vec![product.clone(), shelf.clone()]);
        let config = ResolverConfig::default();
        let builder = ConnectionBuilder::new(&index, &config);

        let mut diagram = Diagram::new();
        let product_id = place(&mut diagram, &product);
        let shelf_id = place(&mut diagram, &shelf);

        let created = builder.append_aggregations(&mut diagram, &shelf, shelf_id, Scope::All);
        assert_eq!(created.len(), 1);
        let edge = diagram.connection(created[0]).unwrap();
        assert_eq!((edge.source, edge.target), (product_id, shelf_id));
    }

    #[test]
    fn test_static_attribute_ignored() {
        let product = TypeFacts::class("shop.Product");
        let registry = TypeFacts::class("shop.Registry");
        let index = MemoryIndex::from_types(vec![product.clone(), registry.clone()]);
        let config = ResolverConfig::default();
        let builder = ConnectionBuilder::new(&index, &config);

        let mut diagram = Diagram::new();
        place(&mut diagram, &product);
        let registry_id = diagram.add_entity(
            Entity::class("shop.Registry").with_member(Member::Attribute(
                Attribute::new("DEFAULT", "Product").with_static(true),
            )),
        );

        assert!(builder
            .append_aggregations(&mut diagram, &registry, registry_id, Scope::All)
            .is_empty());
    }
}
