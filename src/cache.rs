use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultCacheConfig {
    #[serde(default = "default_ttl_seconds")]
    pub ttl_seconds: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_ttl_seconds() -> u64 {
    300
}

fn default_max_entries() -> usize {
    40
}

impl Default for ResultCacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl_seconds(),
            max_entries: default_max_entries(),
        }
    }
}

#[derive(Clone, Debug)]
struct CacheEntry<T> {
    value: T,
    expires_at: u64,
}

/// TTL cache bounded by entry count. Eviction is oldest-by-insertion, not LRU:
/// reads do not reorder the queue. Stale entries are dropped when read, never
/// swept in the background.
#[derive(Debug)]
pub struct ResultCache<T> {
    config: ResultCacheConfig,
    entries: HashMap<String, CacheEntry<T>>,
    order: VecDeque<String>,
}

impl<T: Clone> ResultCache<T> {
    pub fn new(config: ResultCacheConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn get(&mut self, key: &str, now: u64) -> Option<T> {
        let expires_at = self.entries.get(key)?.expires_at;
        if now >= expires_at {
            self.entries.remove(key);
            self.order.retain(|candidate| candidate != key);
            return None;
        }
        Some(self.entries.get(key)?.value.clone())
    }

    pub fn insert(&mut self, key: String, value: T, now: u64) {
        if self.config.ttl_seconds == 0 || self.config.max_entries == 0 {
            return;
        }

        use std::collections::hash_map::Entry;

        let entry = CacheEntry {
            value,
            expires_at: now.saturating_add(self.config.ttl_seconds),
        };

        match self.entries.entry(key.clone()) {
            Entry::Occupied(mut occupied) => {
                occupied.insert(entry);
                self.order.retain(|candidate| candidate != &key);
                self.order.push_back(key);
                return;
            }
            Entry::Vacant(vacant) => {
                vacant.insert(entry);
            }
        }
        self.order.push_back(key);

        while self.entries.len() > self.config.max_entries {
            let Some(candidate) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&candidate);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_seconds: u64, max_entries: usize) -> ResultCache<&'static str> {
        ResultCache::new(ResultCacheConfig {
            ttl_seconds,
            max_entries,
        })
    }

    #[test]
    fn get_after_set_returns_the_value() {
        let mut cache = cache(60, 10);
        cache.insert("k".to_string(), "v", 100);
        assert_eq!(cache.get("k", 100), Some("v"));
    }

    #[test]
    fn entries_expire_after_ttl() {
        let mut cache = cache(5, 10);
        cache.insert("k".to_string(), "v", 100);
        assert_eq!(cache.get("k", 104), Some("v"));
        assert_eq!(cache.get("k", 105), None);
    }

    #[test]
    fn expired_entries_leave_the_order_queue() {
        let mut cache = cache(1, 10);
        cache.insert("k".to_string(), "v", 10);
        assert!(cache.get("k", 11).is_none());
        assert!(cache.order.is_empty());
    }

    #[test]
    fn eviction_is_oldest_by_insertion() {
        let mut cache = cache(60, 2);
        cache.insert("a".to_string(), "1", 0);
        cache.insert("b".to_string(), "2", 1);
        cache.insert("c".to_string(), "3", 2);
        assert!(cache.get("a", 2).is_none());
        assert!(cache.get("b", 2).is_some());
        assert!(cache.get("c", 2).is_some());
    }

    #[test]
    fn reads_do_not_refresh_eviction_order() {
        let mut cache = cache(60, 2);
        cache.insert("a".to_string(), "1", 0);
        cache.insert("b".to_string(), "2", 1);
        // Touch "a"; with LRU it would survive, but insertion order keeps it first out.
        assert!(cache.get("a", 1).is_some());
        cache.insert("c".to_string(), "3", 2);
        assert!(cache.get("a", 2).is_none());
        assert!(cache.get("b", 2).is_some());
    }

    #[test]
    fn overwrite_moves_entry_to_the_back() {
        let mut cache = cache(60, 2);
        cache.insert("a".to_string(), "1", 0);
        cache.insert("b".to_string(), "2", 1);
        cache.insert("a".to_string(), "1b", 2);
        cache.insert("c".to_string(), "3", 3);
        assert!(cache.get("b", 3).is_none());
        assert_eq!(cache.get("a", 3), Some("1b"));
    }

    #[test]
    fn zero_ttl_disables_caching() {
        let mut cache = cache(0, 10);
        cache.insert("k".to_string(), "v", 0);
        assert!(cache.get("k", 0).is_none());
        assert!(cache.is_empty());
    }
}
