//! Local key/value table of one node.
//!
//! Entries live for the process lifetime: no eviction, no TTL. Insertion
//! overwrites. Keys are opaque strings, unique within a node.

use dashmap::DashMap;

/// In-process key -> value table local to one node.
///
/// Safe to interleave with concurrent lookups and stores from other inbound
/// requests.
#[derive(Debug, Default)]
pub struct Storage {
    entries: DashMap<String, String>,
}

impl Storage {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry.
    pub fn put(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Read an entry. Pure read, no side effect.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    /// Whether the table holds `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Current entry count, used for status reporting.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_overwrites() {
        let storage = Storage::new();
        storage.put("x", "1");
        storage.put("x", "2");
        assert_eq!(storage.get("x").as_deref(), Some("2"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_get_missing() {
        let storage = Storage::new();
        assert_eq!(storage.get("x"), None);
        assert!(!storage.contains("x"));
        assert!(storage.is_empty());
    }
}
