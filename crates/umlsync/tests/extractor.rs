//! Tests for member extraction

use std::cell::Cell;
use std::rc::Rc;

use umlsync::core::{
    EntityKind, Introspected, IntrospectionError, Member, Modifiers, RawField, RawMethod,
    TypeHandle, Visibility,
};
use umlsync::plugins::java::{MemberExtractor, TypeFacts};

/// Serves facts from an inner handle but fails the listed calls
#[derive(Debug)]
struct Flaky {
    inner: TypeFacts,
    fail_fields: bool,
    fail_methods: bool,
    calls: Cell<usize>,
}

impl Flaky {
    fn new(inner: TypeFacts) -> Self {
        Self {
            inner,
            fail_fields: false,
            fail_methods: false,
            calls: Cell::new(0),
        }
    }
}

impl TypeHandle for Flaky {
    fn qualified_name(&self) -> &str {
        self.inner.qualified_name()
    }

    fn package_name(&self) -> &str {
        self.inner.package_name()
    }

    fn kind(&self) -> EntityKind {
        self.inner.kind()
    }

    fn origin_path(&self) -> Option<&str> {
        self.inner.origin_path()
    }

    fn superclass_name(&self) -> Introspected<Option<String>> {
        self.inner.superclass_name()
    }

    fn super_interface_names(&self) -> Introspected<Vec<String>> {
        self.inner.super_interface_names()
    }

    fn imports(&self) -> Introspected<Vec<String>> {
        self.inner.imports()
    }

    fn fields(&self) -> Introspected<Vec<RawField>> {
        self.calls.set(self.calls.get() + 1);
        if self.fail_fields {
            return Err(IntrospectionError::provider("field table locked"));
        }
        self.inner.fields()
    }

    fn methods(&self) -> Introspected<Vec<RawMethod>> {
        self.calls.set(self.calls.get() + 1);
        if self.fail_methods {
            return Err(IntrospectionError::provider("method table locked"));
        }
        self.inner.methods()
    }

    fn nested_types(&self) -> Introspected<Vec<Rc<dyn TypeHandle>>> {
        self.inner.nested_types()
    }
}

fn order() -> TypeFacts {
    TypeFacts::class("shop.Order")
        .field(RawField::new("id", "long", Modifiers::private()))
        .field(RawField::new("items", "List<Product>", Modifiers::protected()))
        .method(RawMethod::new("total", "long", Modifiers::public()))
}

#[test]
fn test_field_failure_keeps_operations() {
    let mut flaky = Flaky::new(order());
    flaky.fail_fields = true;

    let members = MemberExtractor::new().members(&flaky);
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name(), "total");
    assert_eq!(flaky.calls.get(), 2);
}

#[test]
fn test_total_failure_is_empty() {
    let mut flaky = Flaky::new(order());
    flaky.fail_fields = true;
    flaky.fail_methods = true;

    assert!(MemberExtractor::new().members(&flaky).is_empty());
}

#[test]
fn test_malformed_field_keeps_prefix() {
    let facts = TypeFacts::class("shop.Order")
        .field(RawField::new("id", "long", Modifiers::private()))
        .field(RawField::new("ghost", "", Modifiers::private()))
        .field(RawField::new("never", "int", Modifiers::private()));

    let attrs = MemberExtractor::new().attributes(&facts);
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs[0].name, "id");
}

#[test]
fn test_package_visibility_for_classes() {
    let facts = TypeFacts::class("shop.Order")
        .field(RawField::new("note", "String", Modifiers::default()))
        .method(RawMethod::new("touch", "void", Modifiers::default()));

    let members = MemberExtractor::new().members(&facts);
    assert!(members.iter().all(|m| m.visibility() == Visibility::Package));
}

#[test]
fn test_interface_members_forced_public() {
    let facts = TypeFacts::interface("shop.Priced")
        .field(RawField::new(
            "CURRENCY",
            "String",
            Modifiers::private().with_static().with_final(),
        ))
        .method(RawMethod::new("price", "long", Modifiers::protected().with_abstract()));

    let members = MemberExtractor::new().members(&facts);
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|m| m.visibility() == Visibility::Public));
}

#[test]
fn test_enum_constants_flagged() {
    let facts = TypeFacts::enumeration("paint.Color")
        .field(RawField::enum_constant("RED", "Color"))
        .field(RawField::new("hex", "String", Modifiers::private()));

    let attrs = MemberExtractor::new().attributes(&facts);
    assert!(attrs[0].is_enum_constant);
    assert!(attrs[0].is_static);
    assert_eq!(attrs[0].visibility, Visibility::Public);
    assert!(!attrs[1].is_enum_constant);
}

#[test]
fn test_members_are_snapshots() {
    let mut facts = order();
    let members = MemberExtractor::new().members(&facts);
    facts.fields.clear();

    assert!(matches!(&members[0], Member::Attribute(a) if a.name == "id"));
    assert_eq!(members.len(), 3);
}
