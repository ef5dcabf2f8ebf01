use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use lifelog_core::entity::EntityRecord;
use lifelog_core::store::{Result, StoreError};

use super::EntityStore;

/// Registry of entity stores, owned by the application's composition root.
///
/// Collaborators receive store handles from here by store id instead of
/// looking them up from ambient module-level state. Each store id maps to
/// exactly one store; retrieval is typed by the entity type the store was
/// registered with.
#[derive(Default)]
pub struct StoreRegistry {
    stores: RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl StoreRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a store under its configured store id.
    ///
    /// Registering a second store under the same id is an error.
    pub async fn register<E: EntityRecord>(&self, store: Arc<EntityStore<E>>) -> Result<()> {
        let store_id = store.config().store_id().to_string();
        let mut stores = self.stores.write().await;
        if stores.contains_key(&store_id) {
            return Err(StoreError::AlreadyExists { path: store_id });
        }
        tracing::debug!(%store_id, "Store registered");
        stores.insert(store_id, store);
        Ok(())
    }

    /// Returns the store registered under `store_id`, when its entity type
    /// matches the requested one.
    pub async fn get<E: EntityRecord>(&self, store_id: &str) -> Option<Arc<EntityStore<E>>> {
        let stores = self.stores.read().await;
        stores
            .get(store_id)
            .cloned()?
            .downcast::<EntityStore<E>>()
            .ok()
    }

    /// Number of registered stores.
    pub async fn len(&self) -> usize {
        self.stores.read().await.len()
    }

    /// Returns true when no stores are registered.
    pub async fn is_empty(&self) -> bool {
        self.stores.read().await.is_empty()
    }
}
