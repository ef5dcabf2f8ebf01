mod batch;
mod entity_store;
mod events;
mod registry;

pub use entity_store::EntityStore;
pub use events::{StoreEvent, StoreEventKind};
pub use registry::StoreRegistry;
