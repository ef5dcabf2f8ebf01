//! Pure field-projection functions.
//!
//! These map an entity to and from its brief or detail field subset. They
//! perform no I/O and never mutate their inputs, other than the explicit
//! `entity` target of [`apply_fields`].

use super::{EntityRecord, Projection};

/// Projects an entity onto its brief field subset.
///
/// A field is included only when the entity defines it; absent fields are
/// omitted rather than written as nulls.
pub fn entity_to_brief<E: EntityRecord>(entity: &E, brief_keys: &[&str]) -> Projection {
    project(entity, brief_keys)
}

/// Projects an entity onto its detail field subset.
pub fn entity_to_detail<E: EntityRecord>(entity: &E, detail_keys: &[&str]) -> Projection {
    project(entity, detail_keys)
}

fn project<E: EntityRecord>(entity: &E, keys: &[&str]) -> Projection {
    keys.iter()
        .filter_map(|key| entity.field(key).map(|value| (key.to_string(), value)))
        .collect()
}

/// Assigns fields from a raw document record onto an entity.
///
/// Only keys that are both present in `raw` and named by `keys` are
/// assigned; unrecognized keys in the raw record are ignored for forward
/// compatibility. Timestamp-typed values are converted by the entity's
/// [`EntityRecord::set_field`] implementation.
pub fn apply_fields<E: EntityRecord>(raw: &Projection, entity: &mut E, keys: &[&str]) {
    for key in keys {
        if let Some(value) = raw.get(*key) {
            entity.set_field(key, value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FieldValue;
    use chrono::{DateTime, TimeZone, Utc};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Activity {
        id: Option<String>,
        name: Option<String>,
        uses: Option<i64>,
        remark: Option<String>,
        last_used: Option<DateTime<Utc>>,
    }

    impl EntityRecord for Activity {
        fn id(&self) -> Option<&str> {
            self.id.as_deref()
        }

        fn assign_id(&mut self, id: String) {
            self.id = Some(id);
        }

        fn field(&self, key: &str) -> Option<FieldValue> {
            match key {
                "name" => self.name.clone().map(FieldValue::from),
                "uses" => self.uses.map(FieldValue::from),
                "remark" => self.remark.clone().map(FieldValue::from),
                "last_used" => self.last_used.map(FieldValue::from),
                _ => None,
            }
        }

        fn set_field(&mut self, key: &str, value: FieldValue) {
            match key {
                "name" => self.name = value.as_str().map(String::from),
                "uses" => self.uses = value.as_int(),
                "remark" => self.remark = value.as_str().map(String::from),
                "last_used" => self.last_used = value.as_timestamp(),
                _ => {}
            }
        }
    }

    const BRIEF: &[&str] = &["name", "uses"];
    const DETAIL: &[&str] = &["remark", "last_used"];

    #[test]
    fn test_brief_projection_omits_unset_fields() {
        let activity = Activity {
            name: Some("Reading".into()),
            ..Default::default()
        };

        let brief = entity_to_brief(&activity, BRIEF);

        assert_eq!(brief.get("name"), Some(&FieldValue::Str("Reading".into())));
        assert!(!brief.contains_key("uses"));
        assert!(!brief.contains_key("remark"));
    }

    #[test]
    fn test_detail_projection_excludes_brief_fields() {
        let activity = Activity {
            name: Some("Reading".into()),
            uses: Some(4),
            remark: Some("evenings".into()),
            ..Default::default()
        };

        let detail = entity_to_detail(&activity, DETAIL);

        assert_eq!(detail.len(), 1);
        assert_eq!(
            detail.get("remark"),
            Some(&FieldValue::Str("evenings".into()))
        );
    }

    #[test]
    fn test_round_trip_reproduces_brief_fields_only() {
        let activity = Activity {
            name: Some("Running".into()),
            uses: Some(12),
            remark: Some("mornings".into()),
            ..Default::default()
        };

        let brief = entity_to_brief(&activity, BRIEF);
        let mut rebuilt = Activity::default();
        apply_fields(&brief, &mut rebuilt, BRIEF);

        assert_eq!(rebuilt.name, activity.name);
        assert_eq!(rebuilt.uses, activity.uses);
        assert_eq!(rebuilt.remark, None);
        assert_eq!(rebuilt.last_used, None);
    }

    #[test]
    fn test_apply_fields_ignores_unrecognized_keys() {
        let mut raw = Projection::new();
        raw.insert("name".into(), FieldValue::Str("Running".into()));
        raw.insert("unknown_field".into(), FieldValue::Int(7));

        let mut activity = Activity::default();
        apply_fields(&raw, &mut activity, BRIEF);

        assert_eq!(activity.name, Some("Running".into()));
        assert_eq!(activity.uses, None);
    }

    #[test]
    fn test_apply_fields_converts_timestamps() {
        let ts = Utc.timestamp_millis_opt(1_700_000_000_000).single().unwrap();
        let mut raw = Projection::new();
        raw.insert("last_used".into(), FieldValue::Int(1_700_000_000_000));

        let mut activity = Activity::default();
        apply_fields(&raw, &mut activity, DETAIL);

        assert_eq!(activity.last_used, Some(ts));
    }

    #[test]
    fn test_apply_fields_only_touches_named_keys() {
        let mut raw = Projection::new();
        raw.insert("name".into(), FieldValue::Str("Running".into()));
        raw.insert("remark".into(), FieldValue::Str("hills".into()));

        let mut activity = Activity::default();
        apply_fields(&raw, &mut activity, BRIEF);

        assert_eq!(activity.remark, None);
    }
}
