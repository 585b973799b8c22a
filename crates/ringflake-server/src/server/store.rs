use std::collections::HashMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// A short key and the URL it redirects to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    #[serde(rename = "url_id")]
    pub id: String,
    pub url: String,
}

/// Failure of the backing store itself, not a missing key.
#[derive(Debug, thiserror::Error)]
#[error("url store unavailable: {0}")]
pub struct StoreError(pub String);

/// Persistence for short-key records.
///
/// `put` replaces any record already stored under the same key.
pub trait UrlStore: Send + Sync {
    fn put(&self, record: UrlRecord) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Option<UrlRecord>, StoreError>;
}

/// Process-local [`UrlStore`]. Records do not survive a restart.
#[derive(Default)]
pub struct InMemoryUrlStore {
    records: RwLock<HashMap<String, String>>,
}

impl InMemoryUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }
}

impl UrlStore for InMemoryUrlStore {
    fn put(&self, record: UrlRecord) -> Result<(), StoreError> {
        self.records.write().insert(record.id, record.url);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<UrlRecord>, StoreError> {
        Ok(self.records.read().get(id).map(|url| UrlRecord {
            id: id.to_owned(),
            url: url.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, url: &str) -> UrlRecord {
        UrlRecord {
            id: id.to_owned(),
            url: url.to_owned(),
        }
    }

    #[test]
    fn stores_and_reads_back() {
        let store = InMemoryUrlStore::new();
        store.put(record("000000001", "https://a.example")).unwrap();
        assert_eq!(
            store.get("000000001").unwrap(),
            Some(record("000000001", "https://a.example"))
        );
        assert_eq!(store.get("000000002").unwrap(), None);
    }

    #[test]
    fn put_replaces_existing_key() {
        let store = InMemoryUrlStore::new();
        store.put(record("k", "https://old.example")).unwrap();
        store.put(record("k", "https://new.example")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("k").unwrap().unwrap().url, "https://new.example");
    }

    #[test]
    fn record_uses_table_field_names() {
        let json = serde_json::to_value(record("k", "https://a.example")).unwrap();
        assert_eq!(json, serde_json::json!({"url_id": "k", "url": "https://a.example"}));
    }
}
