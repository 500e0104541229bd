// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::CidHashMap;
use cid::Cid;

/// CIDs already seen by a single writer, e.g. the blocks emitted into an archive.
#[derive(Default, Debug)]
pub struct CidHashSet(CidHashMap<()>);

impl CidHashSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `cid`, returning `false` if it was recorded before.
    pub fn insert(&mut self, cid: Cid) -> bool {
        self.0.insert(cid, ()).is_none()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
