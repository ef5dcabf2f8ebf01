mod store;

pub use store::InMemoryDocumentStore;
