//! Member extraction
//!
//! Turns a type's raw fields and methods into attribute and operation snapshots.
//! Extraction is best effort: the first field or method that cannot be read
//! ends the scan and whatever was extracted before it is kept.

use tracing::{debug, warn};

use crate::core::{
    Attribute, EntityKind, IntrospectionError, Introspected, Member, Modifiers, Operation,
    Parameter, RawField, RawMethod, TypeHandle, Visibility,
};

/// Extracts member snapshots from type handles
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberExtractor;

impl MemberExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Attributes followed by operations
    pub fn members(&self, handle: &dyn TypeHandle) -> Vec<Member> {
        self.attributes(handle)
            .into_iter()
            .map(Member::Attribute)
            .chain(self.operations(handle).into_iter().map(Member::Operation))
            .collect()
    }

    pub fn attributes(&self, handle: &dyn TypeHandle) -> Vec<Attribute> {
        let fields = match handle.fields() {
            Ok(fields) => fields,
            Err(err) => {
                warn!(type_name = handle.qualified_name(), error = %err, "Fields unavailable");
                return Vec::new();
            }
        };

        let mut attributes = Vec::with_capacity(fields.len());
        for field in &fields {
            match attribute(handle.kind(), field) {
                Ok(attr) => attributes.push(attr),
                Err(err) => {
                    warn!(
                        type_name = handle.qualified_name(),
                        error = %err,
                        kept = attributes.len(),
                        "Stopping field extraction"
                    );
                    break;
                }
            }
        }
        debug!(
            type_name = handle.qualified_name(),
            count = attributes.len(),
            "Extracted attributes"
        );
        attributes
    }

    pub fn operations(&self, handle: &dyn TypeHandle) -> Vec<Operation> {
        let methods = match handle.methods() {
            Ok(methods) => methods,
            Err(err) => {
                warn!(type_name = handle.qualified_name(), error = %err, "Methods unavailable");
                return Vec::new();
            }
        };

        let mut operations = Vec::with_capacity(methods.len());
        for method in &methods {
            match operation(handle.kind(), method) {
                Ok(op) => operations.push(op),
                Err(err) => {
                    warn!(
                        type_name = handle.qualified_name(),
                        error = %err,
                        kept = operations.len(),
                        "Stopping method extraction"
                    );
                    break;
                }
            }
        }
        debug!(
            type_name = handle.qualified_name(),
            count = operations.len(),
            "Extracted operations"
        );
        operations
    }
}

/// Interface members are always public; otherwise the explicit flag wins and
/// no flag at all means package visibility.
pub fn visibility(kind: EntityKind, modifiers: &Modifiers) -> Visibility {
    match kind {
        EntityKind::Interface => Visibility::Public,
        EntityKind::Class | EntityKind::Enum => {
            if modifiers.public {
                Visibility::Public
            } else if modifiers.private {
                Visibility::Private
            } else if modifiers.protected {
                Visibility::Protected
            } else {
                Visibility::Package
            }
        }
    }
}

fn attribute(kind: EntityKind, field: &RawField) -> Introspected<Attribute> {
    if field.name.trim().is_empty() {
        return Err(IntrospectionError::malformed("field", "missing name"));
    }
    if field.type_ref.trim().is_empty() {
        return Err(IntrospectionError::malformed(
            format!("field {}", field.name),
            "missing type",
        ));
    }
    Ok(Attribute {
        name: field.name.clone(),
        type_ref: field.type_ref.trim().to_string(),
        visibility: visibility(kind, &field.modifiers),
        is_static: field.modifiers.is_static,
        is_final: field.modifiers.is_final,
        is_enum_constant: field.enum_constant,
    })
}

fn operation(kind: EntityKind, method: &RawMethod) -> Introspected<Operation> {
    if method.name.trim().is_empty() {
        return Err(IntrospectionError::malformed("method", "missing name"));
    }
    if method.parameter_names.len() != method.parameter_types.len() {
        return Err(IntrospectionError::malformed(
            format!("method {}", method.name),
            format!(
                "{} parameter names for {} parameter types",
                method.parameter_names.len(),
                method.parameter_types.len()
            ),
        ));
    }
    let params = method
        .parameter_names
        .iter()
        .zip(&method.parameter_types)
        .map(|(name, type_ref)| Parameter::new(name.clone(), type_ref.clone()))
        .collect();

    Ok(Operation {
        name: method.name.clone(),
        return_type: method.return_type.clone(),
        visibility: visibility(kind, &method.modifiers),
        is_abstract: method.modifiers.is_abstract,
        is_static: method.modifiers.is_static,
        is_final: method.modifiers.is_final,
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::java::TypeFacts;

    #[test]
    fn test_visibility_mapping() {
        assert_eq!(
            visibility(EntityKind::Class, &Modifiers::private()),
            Visibility::Private
        );
        assert_eq!(
            visibility(EntityKind::Class, &Modifiers::protected()),
            Visibility::Protected
        );
        assert_eq!(
            visibility(EntityKind::Enum, &Modifiers::default()),
            Visibility::Package
        );
        assert_eq!(
            visibility(EntityKind::Interface, &Modifiers::private()),
            Visibility::Public
        );
        assert_eq!(
            visibility(EntityKind::Interface, &Modifiers::default()),
            Visibility::Public
        );
    }

    #[test]
    fn test_attributes_keep_flags() {
        let facts = TypeFacts::class("shop.Order")
            .field(RawField::new("items", "List<Product>", Modifiers::private()))
            .field(RawField::new(
                "COUNT",
                "int",
                Modifiers::public().with_static().with_final(),
            ));

        let attrs = MemberExtractor::new().attributes(&facts);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name, "items");
        assert_eq!(attrs[0].type_ref, "List<Product>");
        assert_eq!(attrs[0].visibility, Visibility::Private);
        assert!(attrs[1].is_static);
        assert!(attrs[1].is_final);
    }

    #[test]
    fn test_operations_with_params() {
        let facts = TypeFacts::interface("shop.Pricing").method(
            RawMethod::new("price", "long", Modifiers::default().with_abstract())
                .with_param("product", "Product")
                .with_param("quantity", "int"),
        );

        let ops = MemberExtractor::new().operations(&facts);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].visibility, Visibility::Public);
        assert!(ops[0].is_abstract);
        assert_eq!(ops[0].params[1], Parameter::new("quantity", "int"));
    }

    #[test]
    fn test_malformed_method_keeps_earlier_ones() {
        let mut broken = RawMethod::new("broken", "void", Modifiers::public());
        broken.parameter_names.push("orphan".to_string());

        let facts = TypeFacts::class("shop.Cart")
            .method(RawMethod::new("first", "void", Modifiers::public()))
            .method(broken)
            .method(RawMethod::new("never", "void", Modifiers::public()));

        let ops = MemberExtractor::new().operations(&facts);
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].name, "first");
    }

    #[test]
    fn test_members_order() {
        let facts = TypeFacts::class("shop.Order")
            .method(RawMethod::new("total", "long", Modifiers::public()))
            .field(RawField::new("id", "long", Modifiers::private()));

        let members = MemberExtractor::new().members(&facts);
        assert!(matches!(members[0], Member::Attribute(_)));
        assert!(matches!(members[1], Member::Operation(_)));
    }
}
