//! 🔢 Surrogate ID allocation: first come, first numbered.
//!
//! Every dimension gets its own [`SurrogateIds`]. A value seen for the first time
//! gets the next integer (starting at 1). A value seen again gets the same integer
//! back. IDs are never reused and never reshuffled for the lifetime of a run.
//!
//! Backed by an `IndexMap`, so iteration is in first-seen order, which is also
//! id order. The writers lean on that to emit directory tables without sorting.

use std::hash::Hash;

use indexmap::IndexMap;

/// 🏷️ A dimension's value → id map plus its counter.
#[derive(Debug, Clone)]
pub struct SurrogateIds<K> {
    ids: IndexMap<K, u64>,
    next_id: u64,
}

impl<K> Default for SurrogateIds<K> {
    fn default() -> Self {
        Self {
            ids: IndexMap::new(),
            next_id: 1,
        }
    }
}

impl<K: Hash + Eq> SurrogateIds<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 🎯 The id for `value`, minting a fresh one if it has never been seen.
    pub fn get_or_create(&mut self, value: K) -> u64 {
        if let Some(id) = self.ids.get(&value) {
            return *id;
        }
        let id = self.next_id;
        self.ids.insert(value, id);
        self.next_id += 1;
        id
    }

    /// 🔍 The id for `value` if it has already been allocated. Never mints.
    pub fn get(&self, value: &K) -> Option<u64> {
        self.ids.get(value).copied()
    }

    pub fn contains(&self, value: &K) -> bool {
        self.ids.contains_key(value)
    }

    /// 📜 `(value, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.ids.iter().map(|(value, id)| (value, *id))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl SurrogateIds<String> {
    /// 🔤 Convenience for string dimensions: only allocates an owned key on a miss.
    pub fn get_or_create_str(&mut self, value: &str) -> u64 {
        match self.ids.get(value) {
            Some(id) => *id,
            None => self.get_or_create(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_the_same_value_always_gets_the_same_number() {
        let mut countries = SurrogateIds::new();
        let co = countries.get_or_create_str("CO");
        let ar = countries.get_or_create_str("AR");
        let co_again = countries.get_or_create_str("CO");

        assert_eq!(co, 1);
        assert_eq!(ar, 2);
        assert_eq!(co_again, co, "idempotent or bust");
        assert_ne!(co, ar, "different values, different ids");
        assert_eq!(countries.len(), 2);
    }

    #[test]
    fn the_one_where_iteration_order_is_id_order() {
        let mut envs = SurrogateIds::new();
        for env in ["master", "dev", "qa", "dev", "master"] {
            envs.get_or_create_str(env);
        }
        let seen: Vec<(&str, u64)> = envs.iter().map(|(v, id)| (v.as_str(), id)).collect();
        assert_eq!(seen, vec![("master", 1), ("dev", 2), ("qa", 3)]);
    }

    #[test]
    fn the_one_where_composite_keys_are_keys_too() {
        let mut app_dirs: SurrogateIds<(u64, String)> = SurrogateIds::new();
        let first = app_dirs.get_or_create((1, "http://x/svc1.git".to_string()));
        let other_repo = app_dirs.get_or_create((1, "http://y/svc1.git".to_string()));
        let again = app_dirs.get_or_create((1, "http://x/svc1.git".to_string()));

        assert_eq!(first, 1);
        assert_eq!(other_repo, 2, "same app, different repo, different entity");
        assert_eq!(again, first);
    }

    #[test]
    fn the_one_where_get_never_mints() {
        let mut labels = SurrogateIds::new();
        assert_eq!(labels.get(&"web".to_string()), None);
        assert!(labels.is_empty());
        labels.get_or_create_str("web");
        assert_eq!(labels.get(&"web".to_string()), Some(1));
        assert!(labels.contains(&"web".to_string()));
    }
}
