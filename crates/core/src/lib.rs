//! Core types and contracts for the lifelog entity store.
//!
//! This crate holds the pure, I/O-free building blocks shared by every
//! store backend:
//!
//! - [`entity`] - field values, projections, and the [`entity::EntityRecord`]
//!   trait that binds a caller's record type to the store.
//! - [`store`] - the [`store::DocumentStore`] adapter contract, write
//!   operation types, path derivation, and store configuration.
//!
//! Concrete backends and the store engine itself live in the `lifelog`
//! crate.

pub mod entity;
pub mod store;
