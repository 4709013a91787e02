//! Error types at the host boundary.
//!
//! The interaction engine never fails; these errors come from hosts applying
//! intents and from configuration loading.

use crate::graph::ValidationError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorError {
    /// No node with this id exists in the host model
    NodeNotFound(String),

    /// No edge with this id exists in the host model
    EdgeNotFound(String),

    /// The host refused an intent (self-link, duplicate, ...)
    Rejected(ValidationError),

    /// Configuration could not be parsed or is out of range
    Config(String),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::NodeNotFound(id) => write!(f, "Node not found: {}", id),
            EditorError::EdgeNotFound(id) => write!(f, "Edge not found: {}", id),
            EditorError::Rejected(reason) => write!(f, "Rejected: {}", reason),
            EditorError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Rejected(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<ValidationError> for EditorError {
    fn from(err: ValidationError) -> Self {
        EditorError::Rejected(err)
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        EditorError::Config(err.to_string())
    }
}
