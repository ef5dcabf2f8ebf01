//! Pending-batch accumulation for one logical store action.
//!
//! The brief summary document is a single write-contention point for the
//! whole collection, so every mutation of one caller-initiated action is
//! staged here and applied as one atomic commit. Cache effects of staged
//! `set_*` calls are held back until that commit confirms.

use std::collections::BTreeMap;

use lifelog_core::entity::{FieldValue, Projection};
use lifelog_core::store::{CollectionPath, FieldUpdate, WriteOp};

/// A staged write or delete of one entity's detail document.
#[derive(Debug, Clone, PartialEq)]
enum DetailOp {
    Write { id: String, fields: Projection },
    Delete { id: String },
}

/// A cache mutation to apply once the batch's commit is confirmed.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StagedCacheUpdate {
    pub id: String,
    pub fields: Projection,
    /// True when the staged write included the full detail projection, so
    /// the cache entry counts as detail-loaded afterwards.
    pub marks_detail_loaded: bool,
}

/// Not-yet-committed mutations scoped to one caller-initiated action.
///
/// Detail operations keep their staging order; brief-field updates collapse
/// into a single map, so a later delete marker for an id overwrites an
/// earlier set for the same id.
#[derive(Debug, Default)]
pub(crate) struct PendingBatch {
    detail_ops: Vec<DetailOp>,
    brief_updates: BTreeMap<String, FieldUpdate>,
    staged_cache: Vec<StagedCacheUpdate>,
}

impl PendingBatch {
    pub fn is_empty(&self) -> bool {
        self.detail_ops.is_empty() && self.brief_updates.is_empty()
    }

    pub fn stage_detail_write(&mut self, id: impl Into<String>, fields: Projection) {
        self.detail_ops.push(DetailOp::Write {
            id: id.into(),
            fields,
        });
    }

    pub fn stage_detail_delete(&mut self, id: impl Into<String>) {
        self.detail_ops.push(DetailOp::Delete { id: id.into() });
    }

    pub fn stage_brief_set(&mut self, id: impl Into<String>, brief: Projection) {
        self.brief_updates
            .insert(id.into(), FieldUpdate::Set(FieldValue::Map(brief)));
    }

    pub fn stage_brief_delete(&mut self, id: impl Into<String>) {
        self.brief_updates.insert(id.into(), FieldUpdate::Delete);
    }

    pub fn stage_cache_update(&mut self, update: StagedCacheUpdate) {
        self.staged_cache.push(update);
    }

    /// Builds the ordered operation list for [`DocumentStore::commit_batch`]:
    /// detail writes/deletes in staging order, then the single brief
    /// field-update map.
    ///
    /// [`DocumentStore::commit_batch`]: lifelog_core::store::DocumentStore::commit_batch
    pub fn build_ops(&self, collection: &CollectionPath) -> Vec<WriteOp> {
        let mut ops: Vec<WriteOp> = self
            .detail_ops
            .iter()
            .map(|op| match op {
                DetailOp::Write { id, fields } => WriteOp::Write {
                    path: collection.document(id.clone()),
                    fields: fields.clone(),
                    merge: false,
                },
                DetailOp::Delete { id } => WriteOp::Delete {
                    path: collection.document(id.clone()),
                },
            })
            .collect();

        if !self.brief_updates.is_empty() {
            ops.push(WriteOp::Update {
                path: collection.brief_document(),
                updates: self.brief_updates.clone(),
            });
        }

        ops
    }

    /// Drains the staged cache updates after a confirmed commit.
    pub fn take_staged_cache(&mut self) -> Vec<StagedCacheUpdate> {
        std::mem::take(&mut self.staged_cache)
    }

    pub fn clear(&mut self) {
        self.detail_ops.clear();
        self.brief_updates.clear();
        self.staged_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief(name: &str) -> Projection {
        let mut fields = Projection::new();
        fields.insert("name".into(), FieldValue::Str(name.into()));
        fields
    }

    #[test]
    fn test_empty_batch_builds_no_ops() {
        let batch = PendingBatch::default();
        assert!(batch.is_empty());
        assert!(batch.build_ops(&CollectionPath::new("labels")).is_empty());
    }

    #[test]
    fn test_detail_ops_precede_single_brief_update() {
        let mut batch = PendingBatch::default();
        batch.stage_detail_write("a", Projection::new());
        batch.stage_brief_set("a", brief("Alpha"));
        batch.stage_detail_delete("b");
        batch.stage_brief_delete("b");

        let ops = batch.build_ops(&CollectionPath::new("labels"));

        assert_eq!(ops.len(), 3);
        assert!(matches!(&ops[0], WriteOp::Write { path, merge: false, .. }
            if path.to_string() == "labels/a"));
        assert!(matches!(&ops[1], WriteOp::Delete { path }
            if path.to_string() == "labels/b"));
        match &ops[2] {
            WriteOp::Update { path, updates } => {
                assert_eq!(path.to_string(), "labels/brief");
                assert_eq!(updates.len(), 2);
                assert_eq!(updates.get("b"), Some(&FieldUpdate::Delete));
            }
            other => panic!("expected brief update, got {other:?}"),
        }
    }

    #[test]
    fn test_later_brief_delete_overwrites_earlier_set() {
        let mut batch = PendingBatch::default();
        batch.stage_brief_set("a", brief("Alpha"));
        batch.stage_brief_delete("a");

        let ops = batch.build_ops(&CollectionPath::new("labels"));

        match &ops[0] {
            WriteOp::Update { updates, .. } => {
                assert_eq!(updates.get("a"), Some(&FieldUpdate::Delete));
            }
            other => panic!("expected brief update, got {other:?}"),
        }
    }

    #[test]
    fn test_build_ops_does_not_consume_the_batch() {
        let mut batch = PendingBatch::default();
        batch.stage_brief_set("a", brief("Alpha"));

        let first = batch.build_ops(&CollectionPath::new("labels"));
        let second = batch.build_ops(&CollectionPath::new("labels"));

        assert_eq!(first, second);
        assert!(!batch.is_empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut batch = PendingBatch::default();
        batch.stage_detail_write("a", Projection::new());
        batch.stage_brief_set("a", brief("Alpha"));
        batch.stage_cache_update(StagedCacheUpdate {
            id: "a".into(),
            fields: brief("Alpha"),
            marks_detail_loaded: false,
        });

        batch.clear();

        assert!(batch.is_empty());
        assert!(batch.take_staged_cache().is_empty());
    }
}
