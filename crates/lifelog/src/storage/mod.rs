//! Document store backends.
//!
//! Implementations of the `lifelog_core::store::DocumentStore` contract.
//! The in-memory backend is the reference implementation and the test
//! double; remote backends plug in behind the same trait.

pub mod inmemory;

pub use inmemory::InMemoryDocumentStore;
