//! Reversible two-key map
//!
//! Several protocol tables address the same record by two independent keys
//! (a local wire id and a global id, for instance). `DoubleKeyMap` keeps both
//! indexes in lockstep so a record can be looked up or removed through
//! either one. The structure itself holds no lock; callers that share one
//! across threads wrap it the same way as any other map.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{GridlinkError, Result};

/// A value addressable by either of two keys
#[derive(Debug, Clone, Default)]
pub struct DoubleKeyMap<K1, K2, V>
where
    K1: Eq + Hash + Clone,
    K2: Eq + Hash + Clone,
{
    by_first: HashMap<K1, (K2, V)>,
    by_second: HashMap<K2, K1>,
}

impl<K1, K2, V> DoubleKeyMap<K1, K2, V>
where
    K1: Eq + Hash + Clone + std::fmt::Debug,
    K2: Eq + Hash + Clone + std::fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            by_first: HashMap::new(),
            by_second: HashMap::new(),
        }
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.by_first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_first.is_empty()
    }

    /// Insert a value under both keys
    ///
    /// Fails without modifying either index when either key is already
    /// present; a half-inserted pair would desynchronize the two indexes.
    pub fn insert(&mut self, key1: K1, key2: K2, value: V) -> Result<()> {
        if self.by_first.contains_key(&key1) {
            return Err(GridlinkError::duplicate_key(format!("{:?}", key1)));
        }
        if self.by_second.contains_key(&key2) {
            return Err(GridlinkError::duplicate_key(format!("{:?}", key2)));
        }

        self.by_second.insert(key2.clone(), key1.clone());
        self.by_first.insert(key1, (key2, value));
        Ok(())
    }

    /// Look up by the first key
    pub fn get1(&self, key1: &K1) -> Option<&V> {
        self.by_first.get(key1).map(|(_, value)| value)
    }

    /// Look up by the second key
    pub fn get2(&self, key2: &K2) -> Option<&V> {
        let key1 = self.by_second.get(key2)?;
        self.get1(key1)
    }

    /// Mutable lookup by the first key
    pub fn get1_mut(&mut self, key1: &K1) -> Option<&mut V> {
        self.by_first.get_mut(key1).map(|(_, value)| value)
    }

    /// Mutable lookup by the second key
    pub fn get2_mut(&mut self, key2: &K2) -> Option<&mut V> {
        let key1 = self.by_second.get(key2)?.clone();
        self.get1_mut(&key1)
    }

    pub fn contains_key1(&self, key1: &K1) -> bool {
        self.by_first.contains_key(key1)
    }

    pub fn contains_key2(&self, key2: &K2) -> bool {
        self.by_second.contains_key(key2)
    }

    /// Remove by the first key, dropping both index entries
    pub fn remove1(&mut self, key1: &K1) -> Option<V> {
        let (key2, value) = self.by_first.remove(key1)?;
        self.by_second.remove(&key2);
        Some(value)
    }

    /// Remove by the second key, dropping both index entries
    pub fn remove2(&mut self, key2: &K2) -> Option<V> {
        let key1 = self.by_second.remove(key2)?;
        self.by_first.remove(&key1).map(|(_, value)| value)
    }

    /// Iterate over values
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.by_first.values().map(|(_, value)| value)
    }

    /// Remove every value failing the predicate, keeping the indexes in sync
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&V) -> bool,
    {
        let by_second = &mut self.by_second;
        self.by_first.retain(|_, (key2, value)| {
            if keep(value) {
                true
            } else {
                by_second.remove(key2);
                false
            }
        });
    }
}
