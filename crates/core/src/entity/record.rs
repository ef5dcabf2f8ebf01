use std::collections::BTreeMap;

use super::FieldValue;

/// A named-field snapshot of an entity, as stored in a remote document.
///
/// `BTreeMap` keeps field order deterministic across projections and
/// document writes.
pub type Projection = BTreeMap<String, FieldValue>;

/// A record type that can be managed by an entity store.
///
/// Implementors declare which named fields they expose; the store's
/// configuration decides which of those belong to the brief projection and
/// which to the detail projection. Fields outside both lists are inert -
/// the store never reads or writes them.
///
/// The id is assigned by the store when the entity is first added and is
/// immutable afterwards.
pub trait EntityRecord: Clone + Default + Send + Sync + 'static {
    /// Returns the entity id, if one has been assigned.
    fn id(&self) -> Option<&str>;

    /// Assigns the store-generated id onto the entity.
    fn assign_id(&mut self, id: String);

    /// Returns the value of a named field, or `None` when the field is
    /// unset on this entity.
    fn field(&self, key: &str) -> Option<FieldValue>;

    /// Sets a named field from a projection value. Implementors convert
    /// timestamp-typed values into their native date representation (see
    /// [`FieldValue::as_timestamp`]) and ignore keys they do not declare.
    fn set_field(&mut self, key: &str, value: FieldValue);
}
