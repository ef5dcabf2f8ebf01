//! Brief/detail entity store over a remote document database.
//!
//! Each entity is split into a compact **brief** projection, co-located
//! with every other entity's brief in one summary document for cheap
//! listing, and a larger **detail** projection stored as one document per
//! entity and fetched lazily. The store keeps an in-memory cache in sync
//! with the remote collection and applies all mutations of one logical
//! action as a single atomic batch.
//!
//! - [`store`] - the [`store::EntityStore`] engine, pending-batch
//!   coordinator, change events, and the store registry.
//! - [`storage`] - document store backends implementing
//!   `lifelog_core::store::DocumentStore`.

pub mod storage;
pub mod store;
