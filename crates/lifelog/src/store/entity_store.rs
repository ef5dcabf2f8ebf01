//! Generic brief/detail entity store.
//!
//! Keeps a typed collection of records synchronized between an in-memory
//! cache and a remote document store. Mutating calls stage work into a
//! pending batch without performing I/O; [`EntityStore::commit`] applies
//! the whole batch atomically and only then updates the cache's staged
//! projection state.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::try_join_all;
use tokio::sync::{broadcast, RwLock};

use lifelog_core::entity::{
    apply_fields, entity_to_brief, entity_to_detail, EntityRecord, Projection,
};
use lifelog_core::store::{
    CollectionPath, DocumentPath, DocumentStore, Result, StoreConfig, StoreError,
};

use super::batch::{PendingBatch, StagedCacheUpdate};
use super::events::StoreEvent;

const EVENT_CHANNEL_CAPACITY: usize = 128;

/// A cached entity, which may be brief-only until its detail document has
/// been fetched or written.
#[derive(Debug, Clone)]
struct CachedEntity<E> {
    entity: E,
    detail_loaded: bool,
}

/// Document paths bound by `init()`.
#[derive(Debug, Clone)]
struct Handles {
    collection: CollectionPath,
    brief_doc: DocumentPath,
}

struct StoreState<E> {
    handles: Option<Handles>,
    cache: BTreeMap<String, CachedEntity<E>>,
    pending: PendingBatch,
}

/// Entity store for one remote collection.
///
/// There is a single logical writer per store instance; all concurrency is
/// caller-driven async I/O. The store performs no retries and propagates
/// transport failures unchanged. The brief summary document is shared
/// read/write state for the whole collection with no optimistic-concurrency
/// check: across separate commits the last committed writer for an id wins.
/// Callers that need multi-writer guarantees must layer versioning above
/// this store.
pub struct EntityStore<E: EntityRecord> {
    config: StoreConfig,
    adapter: Arc<dyn DocumentStore>,
    state: RwLock<StoreState<E>>,
    events: broadcast::Sender<StoreEvent>,
}

impl<E: EntityRecord> EntityStore<E> {
    /// Creates a store for the given schema and remote adapter. The store
    /// is unusable until [`EntityStore::init`] has run.
    pub fn new(config: StoreConfig, adapter: Arc<dyn DocumentStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            adapter,
            state: RwLock::new(StoreState {
                handles: None,
                cache: BTreeMap::new(),
                pending: PendingBatch::default(),
            }),
            events,
        }
    }

    /// Returns the store's schema configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Subscribes to change notifications for this store.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn ensure_initialized<'a>(&self, state: &'a StoreState<E>) -> Result<&'a Handles> {
        state.handles.as_ref().ok_or_else(|| StoreError::Uninitialized {
            store_id: self.config.store_id().to_string(),
        })
    }

    fn emit(&self, event: StoreEvent) {
        // Send only fails when nobody is subscribed.
        let _ = self.events.send(event);
    }

    /// Binds the store to its remote collection and cold-loads the brief
    /// summary document.
    ///
    /// When the summary document does not exist yet, an empty one is
    /// written (collection bootstrap) and the cache stays empty. Otherwise
    /// the cache is replaced with one brief-only entity per summary entry.
    /// Any prior unsynced local state is discarded; this is a reload, not a
    /// merge.
    pub async fn init(&self) -> Result<()> {
        let collection = self.config.collection();
        let brief_doc = collection.brief_document();

        let brief = match self.adapter.read_document(&brief_doc).await? {
            Some(fields) => fields,
            None => {
                self.adapter
                    .write_document(&brief_doc, Projection::new(), false)
                    .await?;
                tracing::debug!(
                    store_id = self.config.store_id(),
                    "Bootstrapped empty brief document"
                );
                Projection::new()
            }
        };

        let mut state = self.state.write().await;
        state.cache.clear();
        state.pending.clear();
        for (id, value) in &brief {
            let Some(brief_fields) = value.as_map() else {
                tracing::warn!(
                    store_id = self.config.store_id(),
                    entity_id = %id,
                    "Skipping non-map brief entry"
                );
                continue;
            };
            let mut entity = E::default();
            entity.assign_id(id.clone());
            apply_fields(brief_fields, &mut entity, self.config.brief_keys());
            state.cache.insert(
                id.clone(),
                CachedEntity {
                    entity,
                    detail_loaded: false,
                },
            );
        }
        state.handles = Some(Handles {
            collection,
            brief_doc,
        });
        let count = state.cache.len();
        drop(state);

        tracing::debug!(
            store_id = self.config.store_id(),
            entities = count,
            "Store initialized"
        );
        self.emit(StoreEvent::reloaded(self.config.store_id()));
        Ok(())
    }

    /// Adds a new entity: the adapter reserves a detail document id, the id
    /// is assigned onto the entity, the entity enters the cache, and the
    /// detail write plus brief update are staged into the pending batch.
    ///
    /// The cache insert happens synchronously since the id and field values
    /// are already known; the remote store only changes on
    /// [`EntityStore::commit`].
    pub async fn add_entity(&self, entity: &mut E) -> Result<String> {
        let collection = {
            let state = self.state.read().await;
            self.ensure_initialized(&state)?.collection.clone()
        };

        let id = self.adapter.create_document(&collection).await?;
        entity.assign_id(id.clone());

        let mut state = self.state.write().await;
        self.ensure_initialized(&state)?;
        state
            .pending
            .stage_detail_write(&id, entity_to_detail(entity, self.config.detail_keys()));
        state
            .pending
            .stage_brief_set(&id, entity_to_brief(entity, self.config.brief_keys()));
        state.cache.insert(
            id.clone(),
            CachedEntity {
                entity: entity.clone(),
                detail_loaded: true,
            },
        );
        drop(state);

        tracing::debug!(
            store_id = self.config.store_id(),
            entity_id = %id,
            "Entity staged for add"
        );
        self.emit(StoreEvent::added(self.config.store_id(), &id));
        Ok(id)
    }

    /// Adds several entities. Completion requires all to succeed.
    pub async fn add_entities(&self, entities: &mut [E]) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(entities.len());
        for entity in entities {
            ids.push(self.add_entity(entity).await?);
        }
        Ok(ids)
    }

    /// Stages an update of both projections for an entity that already has
    /// an id.
    pub async fn set_entity(&self, entity: &E) -> Result<()> {
        self.stage_set(entity, "set_entity", true, true).await
    }

    /// Stages updates of both projections for several entities.
    pub async fn set_entities(&self, entities: &[E]) -> Result<()> {
        for entity in entities {
            self.set_entity(entity).await?;
        }
        Ok(())
    }

    /// Stages an update of the brief projection only.
    pub async fn set_brief(&self, entity: &E) -> Result<()> {
        self.stage_set(entity, "set_brief", true, false).await
    }

    /// Stages brief updates for several entities.
    pub async fn set_briefs(&self, entities: &[E]) -> Result<()> {
        for entity in entities {
            self.set_brief(entity).await?;
        }
        Ok(())
    }

    /// Stages an update of the detail projection only.
    pub async fn set_detail(&self, entity: &E) -> Result<()> {
        self.stage_set(entity, "set_detail", false, true).await
    }

    /// Stages detail updates for several entities.
    pub async fn set_details(&self, entities: &[E]) -> Result<()> {
        for entity in entities {
            self.set_detail(entity).await?;
        }
        Ok(())
    }

    async fn stage_set(
        &self,
        entity: &E,
        operation: &'static str,
        include_brief: bool,
        include_detail: bool,
    ) -> Result<()> {
        let id = entity
            .id()
            .ok_or(StoreError::MissingId { operation })?
            .to_string();

        let mut state = self.state.write().await;
        self.ensure_initialized(&state)?;

        let mut staged_fields = Projection::new();
        if include_detail {
            let detail = entity_to_detail(entity, self.config.detail_keys());
            staged_fields.extend(detail.clone());
            state.pending.stage_detail_write(&id, detail);
        }
        if include_brief {
            let brief = entity_to_brief(entity, self.config.brief_keys());
            staged_fields.extend(brief.clone());
            state.pending.stage_brief_set(&id, brief);
        }
        state.pending.stage_cache_update(StagedCacheUpdate {
            id,
            fields: staged_fields,
            marks_detail_loaded: include_detail,
        });
        Ok(())
    }

    /// Deletes an entity: stages the detail document delete and the brief
    /// delete marker, and evicts the id from the cache.
    pub async fn delete_entity(&self, id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        self.ensure_initialized(&state)?;
        state.pending.stage_detail_delete(id);
        state.pending.stage_brief_delete(id);
        let removed = state.cache.remove(id).is_some();
        drop(state);

        tracing::debug!(
            store_id = self.config.store_id(),
            entity_id = %id,
            "Entity staged for delete"
        );
        if removed {
            self.emit(StoreEvent::deleted(self.config.store_id(), id));
        }
        Ok(())
    }

    /// Deletes several entities. Completion requires all to succeed.
    pub async fn delete_entities(&self, ids: &[&str]) -> Result<()> {
        for id in ids {
            self.delete_entity(id).await?;
        }
        Ok(())
    }

    /// Applies the pending batch to the remote store as one atomic unit,
    /// then applies the staged `set_*` effects to the cache and clears the
    /// batch.
    ///
    /// On failure the cache equals its pre-commit state and the batch is
    /// retained, so the caller may retry the same logical action or discard
    /// it with [`EntityStore::reset`].
    pub async fn commit(&self) -> Result<()> {
        let mut state = self.state.write().await;
        let handles = self.ensure_initialized(&state)?;
        if state.pending.is_empty() {
            tracing::trace!(store_id = self.config.store_id(), "Commit with empty batch");
            return Ok(());
        }

        let ops = state.pending.build_ops(&handles.collection);
        let op_count = ops.len();
        self.adapter.commit_batch(ops).await?;

        let combined: Vec<&str> = self
            .config
            .brief_keys()
            .iter()
            .chain(self.config.detail_keys())
            .copied()
            .collect();
        let mut events = Vec::new();
        for update in state.pending.take_staged_cache() {
            // A staged update for an id deleted later in the same batch has
            // no cache entry left to touch.
            if let Some(cached) = state.cache.get_mut(&update.id) {
                apply_fields(&update.fields, &mut cached.entity, &combined);
                cached.detail_loaded |= update.marks_detail_loaded;
                events.push(StoreEvent::updated(self.config.store_id(), &update.id));
            }
        }
        state.pending.clear();
        drop(state);

        tracing::debug!(
            store_id = self.config.store_id(),
            operations = op_count,
            "Batch committed"
        );
        for event in events {
            self.emit(event);
        }
        Ok(())
    }

    /// Discards the pending batch without committing it.
    ///
    /// Cache effects already applied eagerly (adds, deletes) are not undone;
    /// use [`EntityStore::init`] for a cold reload from the remote store.
    pub async fn reset(&self) {
        self.state.write().await.pending.clear();
    }

    /// Returns the entity with its detail fields populated, fetching the
    /// detail document on first access.
    ///
    /// A missing detail document is a normal outcome: the entity is
    /// returned brief-only. An id that is not live in the cache is
    /// `NotFound`.
    pub async fn get_detail(&self, id: &str) -> Result<E> {
        let (detail_path, entity) = {
            let state = self.state.read().await;
            let handles = self.ensure_initialized(&state)?;
            let cached = state.cache.get(id).ok_or_else(|| StoreError::NotFound {
                path: handles.collection.document(id).to_string(),
            })?;
            if cached.detail_loaded {
                return Ok(cached.entity.clone());
            }
            (handles.collection.document(id), cached.entity.clone())
        };

        tracing::trace!(
            store_id = self.config.store_id(),
            entity_id = %id,
            "Fetching detail document"
        );
        let Some(raw) = self.adapter.read_document(&detail_path).await? else {
            tracing::trace!(
                store_id = self.config.store_id(),
                entity_id = %id,
                "No detail document; entity stays brief-only"
            );
            return Ok(entity);
        };

        let mut state = self.state.write().await;
        let Some(cached) = state.cache.get_mut(id) else {
            // Deleted while the fetch was in flight.
            return Err(StoreError::NotFound {
                path: detail_path.to_string(),
            });
        };
        apply_fields(&raw, &mut cached.entity, self.config.detail_keys());
        cached.detail_loaded = true;
        Ok(cached.entity.clone())
    }

    /// Fetches details for several ids concurrently. Completion requires
    /// all to succeed.
    pub async fn get_details(&self, ids: &[&str]) -> Result<Vec<E>> {
        try_join_all(ids.iter().map(|id| self.get_detail(id))).await
    }

    /// Returns the cached entity for an id, if it is live.
    pub async fn get(&self, id: &str) -> Option<E> {
        let state = self.state.read().await;
        state.cache.get(id).map(|cached| cached.entity.clone())
    }

    /// Returns true when the id is live in the cache.
    pub async fn contains(&self, id: &str) -> bool {
        self.state.read().await.cache.contains_key(id)
    }

    /// Number of live entities.
    pub async fn len(&self) -> usize {
        self.state.read().await.cache.len()
    }

    /// Returns true when no entities are live.
    pub async fn is_empty(&self) -> bool {
        self.state.read().await.cache.is_empty()
    }

    /// Derived view: all live entities ordered ascending by id.
    ///
    /// The id ordering is the stable base order; domain-specific sorts
    /// (usage counters, recency) layer on top of it.
    pub async fn entities(&self) -> Vec<E> {
        let state = self.state.read().await;
        state
            .cache
            .values()
            .map(|cached| cached.entity.clone())
            .collect()
    }
}
