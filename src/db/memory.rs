// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::cid_collections::CidHashMap;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use itertools::Itertools;
use parking_lot::RwLock;

/// A thread-safe, in-memory content addressed block store.
#[derive(Debug, Default)]
pub struct MemoryDB {
    blocks: RwLock<CidHashMap<Vec<u8>>>,
}

impl MemoryDB {
    /// Removes a block. Returns whether it was present.
    pub fn delete(&self, k: &Cid) -> bool {
        self.blocks.write().remove(k).is_some()
    }

    /// Returns the keys of all stored blocks, in no particular order.
    pub fn keys(&self) -> Vec<Cid> {
        self.blocks.read().keys().copied().collect_vec()
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }
}

impl Blockstore for MemoryDB {
    fn get(&self, k: &Cid) -> anyhow::Result<Option<Vec<u8>>> {
        Ok(self.blocks.read().get(k).cloned())
    }

    fn put_keyed(&self, k: &Cid, block: &[u8]) -> anyhow::Result<()> {
        self.blocks.write().insert(*k, block.to_vec());
        Ok(())
    }

    fn has(&self, k: &Cid) -> anyhow::Result<bool> {
        Ok(self.blocks.read().contains_key(k))
    }
}
