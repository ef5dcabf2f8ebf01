//! Document and collection path derivation.
//!
//! A store's documents all live inside one collection named after the store
//! id. The brief summary document occupies a reserved document id inside
//! that collection; entity ids are adapter-generated uuids, so they cannot
//! collide with it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved document id of the per-store brief summary document.
pub const BRIEF_DOCUMENT_ID: &str = "brief";

/// Path of a collection in the remote document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// Creates a collection path from a store id.
    pub fn new(store_id: impl Into<String>) -> Self {
        Self(store_id.into())
    }

    /// Returns the path of a document inside this collection.
    pub fn document(&self, doc_id: impl Into<String>) -> DocumentPath {
        DocumentPath {
            collection: self.clone(),
            doc_id: doc_id.into(),
        }
    }

    /// Returns the path of this collection's brief summary document.
    pub fn brief_document(&self) -> DocumentPath {
        self.document(BRIEF_DOCUMENT_ID)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of a single document in the remote document store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentPath {
    collection: CollectionPath,
    doc_id: String,
}

impl DocumentPath {
    /// Returns the collection this document belongs to.
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// Returns the document id within its collection.
    pub fn doc_id(&self) -> &str {
        &self.doc_id
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.doc_id)
    }
}
