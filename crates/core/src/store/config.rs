use super::{CollectionPath, Result, StoreError};

/// Construction-time schema for one entity store.
///
/// The brief and detail key lists declare which named entity fields belong
/// to which projection. The lists are ordered, disjoint, and fixed for the
/// lifetime of the store; any field outside both lists is never read or
/// written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    store_id: String,
    brief_keys: Vec<&'static str>,
    detail_keys: Vec<&'static str>,
}

impl StoreConfig {
    /// Creates a store configuration, validating that the brief and detail
    /// key sets are disjoint.
    pub fn new(
        store_id: impl Into<String>,
        brief_keys: Vec<&'static str>,
        detail_keys: Vec<&'static str>,
    ) -> Result<Self> {
        if let Some(field) = brief_keys.iter().find(|key| detail_keys.contains(key)) {
            return Err(StoreError::SchemaOverlap {
                field: field.to_string(),
            });
        }
        Ok(Self {
            store_id: store_id.into(),
            brief_keys,
            detail_keys,
        })
    }

    /// Returns the store id, used as the namespace for derived paths.
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// Returns the ordered brief field names.
    pub fn brief_keys(&self) -> &[&'static str] {
        &self.brief_keys
    }

    /// Returns the ordered detail field names (may be empty).
    pub fn detail_keys(&self) -> &[&'static str] {
        &self.detail_keys
    }

    /// Returns the collection path derived from the store id.
    pub fn collection(&self) -> CollectionPath {
        CollectionPath::new(&self.store_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_accepts_disjoint_key_sets() {
        let config = StoreConfig::new("labels", vec!["name", "uses"], vec!["remark"]).unwrap();
        assert_eq!(config.store_id(), "labels");
        assert_eq!(config.brief_keys(), &["name", "uses"]);
        assert_eq!(config.detail_keys(), &["remark"]);
    }

    #[test]
    fn test_config_rejects_overlapping_key_sets() {
        let result = StoreConfig::new("labels", vec!["name"], vec!["name", "remark"]);
        assert_eq!(
            result,
            Err(StoreError::SchemaOverlap {
                field: "name".to_string()
            })
        );
    }

    #[test]
    fn test_config_allows_empty_detail_keys() {
        let config = StoreConfig::new("labels", vec!["name"], vec![]).unwrap();
        assert!(config.detail_keys().is_empty());
    }

    #[test]
    fn test_collection_derives_from_store_id() {
        let config = StoreConfig::new("labels", vec!["name"], vec![]).unwrap();
        assert_eq!(config.collection().as_str(), "labels");
    }
}
