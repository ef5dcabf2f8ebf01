mod projection;
mod record;
mod value;

pub use projection::{apply_fields, entity_to_brief, entity_to_detail};
pub use record::{EntityRecord, Projection};
pub use value::FieldValue;
