//! In-memory document store implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use lifelog_core::entity::Projection;
use lifelog_core::store::{
    CollectionPath, DocumentPath, DocumentStore, FieldUpdate, Result, StoreError, WriteOp,
};

/// In-memory document store backend.
///
/// Uses a HashMap wrapped in `Arc<RwLock<_>>` for thread-safe access. Data
/// is not persisted and will be lost when the store is dropped. Batches are
/// applied to a working copy under a single write lock, so a failed batch
/// leaves no partial state behind.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<HashMap<DocumentPath, Projection>>>,
}

impl InMemoryDocumentStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents, for tests and diagnostics.
    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }
}

fn apply_write(
    documents: &mut HashMap<DocumentPath, Projection>,
    path: &DocumentPath,
    fields: Projection,
    merge: bool,
) {
    if merge {
        let doc = documents.entry(path.clone()).or_default();
        doc.extend(fields);
    } else {
        documents.insert(path.clone(), fields);
    }
}

fn apply_update(
    documents: &mut HashMap<DocumentPath, Projection>,
    path: &DocumentPath,
    updates: &BTreeMap<String, FieldUpdate>,
) -> Result<()> {
    let doc = documents.get_mut(path).ok_or_else(|| StoreError::NotFound {
        path: path.to_string(),
    })?;
    for (field, update) in updates {
        match update {
            FieldUpdate::Set(value) => {
                doc.insert(field.clone(), value.clone());
            }
            FieldUpdate::Delete => {
                // Removing a field that is already absent is a no-op.
                doc.remove(field);
            }
        }
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn read_document(&self, path: &DocumentPath) -> Result<Option<Projection>> {
        let documents = self.documents.read().await;
        Ok(documents.get(path).cloned())
    }

    async fn create_document(&self, _collection: &CollectionPath) -> Result<String> {
        Ok(Uuid::new_v4().to_string())
    }

    async fn write_document(
        &self,
        path: &DocumentPath,
        fields: Projection,
        merge: bool,
    ) -> Result<()> {
        let mut documents = self.documents.write().await;
        apply_write(&mut documents, path, fields, merge);
        Ok(())
    }

    async fn update_fields(
        &self,
        path: &DocumentPath,
        updates: BTreeMap<String, FieldUpdate>,
    ) -> Result<()> {
        let mut documents = self.documents.write().await;
        apply_update(&mut documents, path, &updates)
    }

    async fn delete_document(&self, path: &DocumentPath) -> Result<()> {
        let mut documents = self.documents.write().await;
        documents.remove(path);
        Ok(())
    }

    async fn commit_batch(&self, operations: Vec<WriteOp>) -> Result<()> {
        let mut documents = self.documents.write().await;

        // Apply to a working copy so a mid-batch failure leaves the store
        // untouched.
        let mut working = documents.clone();
        for op in &operations {
            match op {
                WriteOp::Write {
                    path,
                    fields,
                    merge,
                } => apply_write(&mut working, path, fields.clone(), *merge),
                WriteOp::Update { path, updates } => apply_update(&mut working, path, updates)?,
                WriteOp::Delete { path } => {
                    working.remove(path);
                }
            }
        }

        *documents = working;
        Ok(())
    }
}
