// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod hash_set;
pub use hash_set::CidHashSet;

use ahash::{HashMap, HashMapExt as _};
use cid::Cid;
use std::collections::hash_map::Entry;

/// A `HashMap` keyed by [`Cid`], hashed with `ahash`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CidHashMap<V>(HashMap<Cid, V>);

impl<V> CidHashMap<V> {
    /// Creates an empty `HashMap` with CID type keys.
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, k: &Cid) -> bool {
        self.0.contains_key(k)
    }

    /// Inserts a key-value pair into the map. Returns the previous value, or [`None`] if
    /// the key was not present.
    pub fn insert(&mut self, k: Cid, v: V) -> Option<V> {
        self.0.insert(k, v)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    pub fn remove(&mut self, k: &Cid) -> Option<V> {
        self.0.remove(k)
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, k: &Cid) -> Option<&V> {
        self.0.get(k)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, k: &Cid) -> Option<&mut V> {
        self.0.get_mut(k)
    }

    /// Gets the given key's corresponding entry in the map for in-place manipulation.
    pub fn entry(&mut self, k: Cid) -> Entry<'_, Cid, V> {
        self.0.entry(k)
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Cid> {
        self.0.keys()
    }
}

impl<V> Extend<(Cid, V)> for CidHashMap<V> {
    fn extend<T: IntoIterator<Item = (Cid, V)>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl<V> FromIterator<(Cid, V)> for CidHashMap<V> {
    fn from_iter<T: IntoIterator<Item = (Cid, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::raw_cid;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn insert_new_key_is_none(payloads: Vec<Vec<u8>>, value: u64) {
        let mut map = CidHashMap::new();
        for payload in payloads {
            let cid = raw_cid(&payload);
            let fresh = !map.contains_key(&cid);
            assert_eq!(map.insert(cid, value).is_none(), fresh);
        }
    }

    #[quickcheck]
    fn collect_keeps_last_value_per_key(payloads: Vec<Vec<u8>>) {
        let map: CidHashMap<usize> = payloads
            .iter()
            .enumerate()
            .map(|(i, p)| (raw_cid(p), i))
            .collect();
        for payload in &payloads {
            let last = payloads.iter().rposition(|p| p == payload);
            assert_eq!(map.get(&raw_cid(payload)).copied(), last);
        }
    }

    #[test]
    fn entry_updates_in_place() {
        let cid = raw_cid(b"entry");
        let mut map = CidHashMap::new();
        *map.entry(cid).or_insert(0) += 1;
        *map.entry(cid).or_insert(0) += 1;
        assert_eq!(map.get(&cid), Some(&2));
        assert_eq!(map.remove(&cid), Some(2));
        assert!(map.is_empty());
    }
}
