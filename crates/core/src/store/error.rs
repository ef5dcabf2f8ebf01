use thiserror::Error;

/// Errors that can occur during entity store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store '{store_id}' is not initialized")]
    Uninitialized { store_id: String },
    #[error("Entity is missing an id for {operation}")]
    MissingId { operation: &'static str },
    #[error("Document not found: {path}")]
    NotFound { path: String },
    #[error("Field '{field}' appears in both the brief and detail key sets")]
    SchemaOverlap { field: String },
    #[error("Duplicate id: {path}")]
    AlreadyExists { path: String },
    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
