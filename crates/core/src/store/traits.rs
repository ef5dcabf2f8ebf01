use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::entity::{FieldValue, Projection};

use super::{CollectionPath, DocumentPath, Result};

/// A partial-update instruction for a single document field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Sets the field to the given value.
    Set(FieldValue),
    /// Removes the field from the document. This is an explicit delete
    /// marker, distinct from setting the field to an empty value.
    Delete,
}

/// A single write operation, as staged into an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Replaces or merges a document's content.
    Write {
        path: DocumentPath,
        fields: Projection,
        merge: bool,
    },
    /// Partially updates a document's fields. The target document must
    /// exist.
    Update {
        path: DocumentPath,
        updates: BTreeMap<String, FieldUpdate>,
    },
    /// Removes a whole document. Deleting a missing document is a no-op.
    Delete { path: DocumentPath },
}

/// Remote document-store primitives required by the entity store.
///
/// Implementations provide the transport; the entity store never retries or
/// wraps failures, so errors surface to the caller unchanged.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a document's fields, or `None` when it does not exist.
    async fn read_document(&self, path: &DocumentPath) -> Result<Option<Projection>>;

    /// Reserves a new document id in the collection. No content is written;
    /// the id is ready for a subsequent write.
    async fn create_document(&self, collection: &CollectionPath) -> Result<String>;

    /// Replaces a document's content, or merges the given fields into it
    /// when `merge` is true.
    async fn write_document(&self, path: &DocumentPath, fields: Projection, merge: bool)
        -> Result<()>;

    /// Partially updates a document's fields; a [`FieldUpdate::Delete`]
    /// marker removes that field. Fails with `NotFound` when the document
    /// does not exist.
    async fn update_fields(
        &self,
        path: &DocumentPath,
        updates: BTreeMap<String, FieldUpdate>,
    ) -> Result<()>;

    /// Removes a whole document. Idempotent.
    async fn delete_document(&self, path: &DocumentPath) -> Result<()>;

    /// Applies an ordered list of write operations atomically: either every
    /// operation takes effect or none do.
    async fn commit_batch(&self, operations: Vec<WriteOp>) -> Result<()>;
}
