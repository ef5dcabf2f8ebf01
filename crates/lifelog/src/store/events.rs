use serde::{Deserialize, Serialize};

/// The kind of change a [`StoreEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEventKind {
    /// An entity was added to the cache.
    Added,
    /// An entity's cached fields changed after a confirmed commit.
    Updated,
    /// An entity was removed from the cache.
    Deleted,
    /// The whole cache was replaced by a cold reload.
    Reloaded,
}

/// A change notification emitted by an entity store.
///
/// Derived-view consumers subscribe to these to know when to recompute,
/// instead of relying on framework-level reactivity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEvent {
    pub store_id: String,
    /// The affected entity id; `None` for store-wide events.
    pub entity_id: Option<String>,
    pub kind: StoreEventKind,
}

impl StoreEvent {
    /// Creates an entity-added event.
    pub fn added(store_id: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            entity_id: Some(entity_id.into()),
            kind: StoreEventKind::Added,
        }
    }

    /// Creates an entity-updated event.
    pub fn updated(store_id: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            entity_id: Some(entity_id.into()),
            kind: StoreEventKind::Updated,
        }
    }

    /// Creates an entity-deleted event.
    pub fn deleted(store_id: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            entity_id: Some(entity_id.into()),
            kind: StoreEventKind::Deleted,
        }
    }

    /// Creates a store-reloaded event.
    pub fn reloaded(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            entity_id: None,
            kind: StoreEventKind::Reloaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_constructors() {
        let event = StoreEvent::added("labels", "abc");
        assert_eq!(event.kind, StoreEventKind::Added);
        assert_eq!(event.entity_id.as_deref(), Some("abc"));

        let event = StoreEvent::reloaded("labels");
        assert_eq!(event.kind, StoreEventKind::Reloaded);
        assert_eq!(event.entity_id, None);
    }
}
