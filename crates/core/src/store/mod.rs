mod config;
mod error;
mod paths;
mod traits;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use paths::{CollectionPath, DocumentPath, BRIEF_DOCUMENT_ID};
pub use traits::{DocumentStore, FieldUpdate, WriteOp};
