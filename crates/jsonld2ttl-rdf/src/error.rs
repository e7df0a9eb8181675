use std::fmt;

/// Errors that can occur during RDF processing.
#[derive(Debug, thiserror::Error)]
pub enum RdfError {
    #[error("JSON parse error: {0}")]
    JsonError(String),

    #[error("JSON-LD expansion error: {0}")]
    JsonLdExpansionError(String),

    #[error("Context error: {0}")]
    ContextError(String),

    #[error("To-RDF conversion error: {0}")]
    ToRdfError(String),

    #[error("Turtle serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

/// Result type alias for RDF operations.
pub type Result<T> = std::result::Result<T, RdfError>;

impl RdfError {
    pub fn json(msg: impl fmt::Display) -> Self {
        Self::JsonError(msg.to_string())
    }

    pub fn expansion(msg: impl fmt::Display) -> Self {
        Self::JsonLdExpansionError(msg.to_string())
    }

    pub fn context(msg: impl fmt::Display) -> Self {
        Self::ContextError(msg.to_string())
    }

    pub fn to_rdf(msg: impl fmt::Display) -> Self {
        Self::ToRdfError(msg.to_string())
    }

    pub fn serialization(msg: impl fmt::Display) -> Self {
        Self::SerializationError(msg.to_string())
    }
}

impl From<serde_json::Error> for RdfError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err)
    }
}
