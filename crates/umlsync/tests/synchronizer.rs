//! Tests for entity synchronization

use std::rc::Rc;

use umlsync::core::{
    collect_types, Command, CommandStack, ConnectionKind, Diagram, EntityId, Modifiers, Position,
    RawField, ResolverConfig, TypeHandle, TypeIndex,
};
use umlsync::plugins::java::{import_types, MemoryIndex, MemoryWorkspace, TypeFacts};
use umlsync::plugins::synchronizer::Synchronizer;

const TYPES: [&str; 6] = [
    "shop.Priced",
    "shop.Product",
    "shop.Order",
    "shop.Rush",
    "shop.Customer",
    "shop.Address",
];

fn source(name: &str) -> String {
    format!("/shop/src/{}.java", name.replace('.', "/"))
}

fn before_index() -> MemoryIndex {
    MemoryIndex::from_types(vec![
        TypeFacts::interface("shop.Priced").from_path(source("shop.Priced")),
        TypeFacts::class("shop.Product").from_path(source("shop.Product")),
        TypeFacts::class("shop.Order")
            .field(RawField::new("items", "List<Product>", Modifiers::private()))
            .from_path(source("shop.Order")),
        TypeFacts::class("shop.Rush")
            .extends("Order")
            .from_path(source("shop.Rush")),
        TypeFacts::class("shop.Customer")
            .field(RawField::new("orders", "List<Order>", Modifiers::private()))
            .field(RawField::new("address", "Address", Modifiers::private()))
            .from_path(source("shop.Customer")),
        TypeFacts::class("shop.Address").from_path(source("shop.Address")),
    ])
}

fn after_workspace() -> MemoryWorkspace {
    let mut after = before_index();
    after.insert(
        TypeFacts::class("shop.Order")
            .implements("Priced")
            .field(RawField::new("customer", "Customer", Modifiers::private()))
            .from_path(source("shop.Order")),
    );
    MemoryWorkspace::new().with_project("shop", after)
}

fn imported_diagram() -> (Diagram, Vec<EntityId>) {
    let index = before_index();
    let config = ResolverConfig::default();
    let types: Vec<Rc<dyn TypeHandle>> = TYPES
        .iter()
        .flat_map(|name| collect_types(index.find_type(name).unwrap().unwrap()))
        .collect();
    let mut diagram = Diagram::new();
    let ids = import_types(&mut diagram, &index, &config, &types, Position::new(10, 20));
    (diagram, ids)
}

fn id_of(diagram: &Diagram, name: &str) -> EntityId {
    diagram.entity_by_identity(name).unwrap()
}

#[test]
fn test_initial_import_edges() {
    let (diagram, ids) = imported_diagram();
    assert_eq!(ids.len(), 6);
    assert_eq!(diagram.connection_count(), 4);
    assert!(diagram.duplicate_connections().is_empty());
}

#[test]
fn test_resync_rebuilds_edges_of_one_entity() {
    let (mut diagram, _) = imported_diagram();
    let workspace = after_workspace();
    let sync = Synchronizer::new(&workspace, Rc::new(ResolverConfig::default()));

    let address = id_of(&diagram, "shop.Address");
    let customer = id_of(&diagram, "shop.Customer");
    let untouched: Vec<_> = diagram
        .connections()
        .filter(|(_, c)| c.source == address && c.target == customer)
        .map(|(id, c)| (id, *c))
        .collect();
    assert_eq!(untouched.len(), 1);

    let old_order = id_of(&diagram, "shop.Order");
    let mut stack = CommandStack::new();
    assert_eq!(sync.synchronize(&mut stack, &mut diagram, &[old_order]).unwrap(), 1);

    let order = id_of(&diagram, "shop.Order");
    assert_ne!(order, old_order);
    assert_eq!(diagram.entity(order).unwrap().position, Position::new(10, 20));

    let product = id_of(&diagram, "shop.Product");
    let rush = id_of(&diagram, "shop.Rush");
    let priced = id_of(&diagram, "shop.Priced");
    let expect = |kind: ConnectionKind, source: EntityId, target: EntityId| {
        assert_eq!(
            diagram.connections_between(kind, source, target).len(),
            1,
            "{:?} {} -> {}",
            kind,
            source,
            target
        );
    };
    expect(ConnectionKind::Aggregation, customer, order);
    expect(ConnectionKind::Aggregation, order, customer);
    expect(ConnectionKind::Generalization, rush, order);
    expect(ConnectionKind::Realization, order, priced);
    assert!(diagram
        .connections_between(ConnectionKind::Aggregation, product, order)
        .is_empty());
    assert_eq!(diagram.connection_count(), 5);

    for (id, connection) in untouched {
        assert_eq!(diagram.connection(id), Some(&connection));
    }
}

#[test]
fn test_resync_undo_round_trip() {
    let (mut diagram, _) = imported_diagram();
    let before = diagram.clone();
    let workspace = after_workspace();
    let sync = Synchronizer::new(&workspace, Rc::new(ResolverConfig::default()));

    let order = id_of(&diagram, "shop.Order");
    let mut stack = CommandStack::new();
    sync.synchronize(&mut stack, &mut diagram, &[order]).unwrap();
    let synced = diagram.clone();
    assert_ne!(synced, before);
    assert_eq!(stack.undo_label(), Some("Synchronize shop.Order"));

    stack.undo(&mut diagram).unwrap();
    assert_eq!(diagram, before);

    stack.redo(&mut diagram).unwrap();
    assert_eq!(diagram, synced);

    stack.undo(&mut diagram).unwrap();
    assert_eq!(diagram, before);
}

#[test]
fn test_unchanged_source_round_trips_edge_count() {
    let (mut diagram, _) = imported_diagram();
    let workspace = MemoryWorkspace::new().with_project("shop", before_index());
    let sync = Synchronizer::new(&workspace, Rc::new(ResolverConfig::default()));

    let ids = diagram.children();
    let mut stack = CommandStack::new();
    assert_eq!(sync.synchronize(&mut stack, &mut diagram, &ids).unwrap(), 6);
    assert_eq!(diagram.entity_count(), 6);
    assert_eq!(diagram.connection_count(), 4);
    assert!(diagram.duplicate_connections().is_empty());
}

#[test]
fn test_vanished_source_is_no_op() {
    let (mut diagram, _) = imported_diagram();
    let mut index = before_index();
    index.remove("shop.Order");
    let workspace = MemoryWorkspace::new().with_project("shop", index);
    let sync = Synchronizer::new(&workspace, Rc::new(ResolverConfig::default()));

    let before = diagram.clone();
    let order = id_of(&diagram, "shop.Order");
    assert!(sync.resync(&diagram, order).is_none());

    let mut stack = CommandStack::new();
    assert_eq!(sync.synchronize(&mut stack, &mut diagram, &[order]).unwrap(), 0);
    assert_eq!(diagram, before);
}

#[test]
fn test_closed_project_is_no_op() {
    let (mut diagram, _) = imported_diagram();
    let mut workspace = after_workspace();
    workspace.close("shop");
    let sync = Synchronizer::new(&workspace, Rc::new(ResolverConfig::default()));

    let before = diagram.clone();
    let order = id_of(&diagram, "shop.Order");
    let mut stack = CommandStack::new();
    assert_eq!(sync.synchronize(&mut stack, &mut diagram, &[order]).unwrap(), 0);
    assert_eq!(diagram, before);
}

#[test]
fn test_resync_chain_steps() {
    let (diagram, _) = imported_diagram();
    let workspace = after_workspace();
    let sync = Synchronizer::new(&workspace, Rc::new(ResolverConfig::default()));

    let order = id_of(&diagram, "shop.Order");
    let chain = sync.resync(&diagram, order).unwrap();
    assert_eq!(chain.label(), "Synchronize shop.Order");
    assert_eq!(
        chain.step_labels(),
        vec![format!("Delete {}", order).as_str(), "Import shop.Order"]
    );
}
