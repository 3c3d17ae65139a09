//! Core error types for diagram synchronization
//!
//! Two families of errors exist. `DiagramError` reports structural misuse of the
//! diagram arena (unknown ids, double insertion). `IntrospectionError` is what a
//! type-introspection provider raises; the engine catches it at the smallest scope,
//! logs it and carries on with whatever data it already has.

use thiserror::Error;

use super::types::{ConnectionId, EntityId};

/// Errors raised by diagram graph mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagramError {
    #[error("Unknown entity: {id}")]
    UnknownEntity { id: EntityId },

    #[error("Unknown connection: {id}")]
    UnknownConnection { id: ConnectionId },

    #[error("Entity {id} is already part of the diagram")]
    DuplicateEntity { id: EntityId },

    #[error("Connection {id} is already part of the diagram")]
    DuplicateConnection { id: ConnectionId },

    #[error("Command error: {message}")]
    CommandError { message: String },
}

impl DiagramError {
    /// Create a new unknown entity error
    pub fn unknown_entity(id: EntityId) -> Self {
        Self::UnknownEntity { id }
    }

    /// Create a new unknown connection error
    pub fn unknown_connection(id: ConnectionId) -> Self {
        Self::UnknownConnection { id }
    }

    /// Create a new duplicate entity error
    pub fn duplicate_entity(id: EntityId) -> Self {
        Self::DuplicateEntity { id }
    }

    /// Create a new command error
    pub fn command_error(message: String) -> Self {
        Self::CommandError { message }
    }
}

/// Errors raised by a type-introspection provider
///
/// "Type not found" is not an error: lookups return `Ok(None)` for that.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    #[error("Type information unavailable for {element}")]
    Unavailable { element: String },

    #[error("Malformed {element}: {message}")]
    Malformed { element: String, message: String },

    #[error("Provider error: {message}")]
    Provider { message: String },
}

impl IntrospectionError {
    /// Create a new unavailable error
    pub fn unavailable(element: impl Into<String>) -> Self {
        Self::Unavailable {
            element: element.into(),
        }
    }

    /// Create a new malformed element error
    pub fn malformed(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            element: element.into(),
            message: message.into(),
        }
    }

    /// Create a new generic provider error
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }
}

/// Result of a single introspection call
pub type Introspected<T> = Result<T, IntrospectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_entity() {
        let error = DiagramError::unknown_entity(EntityId(7));
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Unknown entity"));
        assert!(error_msg.contains("e7"));
    }

    #[test]
    fn test_duplicate_entity() {
        let error = DiagramError::duplicate_entity(EntityId(3));
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("already part of the diagram"));
    }

    #[test]
    fn test_command_error() {
        let error = DiagramError::command_error("nothing to revert".to_string());
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Command error"));
        assert!(error_msg.contains("nothing to revert"));
    }

    #[test]
    fn test_introspection_malformed() {
        let error = IntrospectionError::malformed("field items", "bad signature");
        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Malformed field items"));
        assert!(error_msg.contains("bad signature"));
    }

    #[test]
    fn test_introspection_unavailable() {
        let error = IntrospectionError::unavailable("shop.Order");
        assert_eq!(
            format!("{}", error),
            "Type information unavailable for shop.Order"
        );
    }
}
