// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! DAG fixtures shared by unit tests.

use crate::cid_collections::CidHashMap;
use crate::db::{Blockstore, MemoryDB};
use crate::utils::cid::CidCborExt as _;
use cid::Cid;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// CID of `data` as a raw blake2b-256 block.
pub fn raw_cid(data: &[u8]) -> Cid {
    Cid::from_raw_blake2b256(data)
}

/// Stores `data` as a raw leaf block.
pub fn put_leaf(db: &impl Blockstore, data: &[u8]) -> Cid {
    let cid = raw_cid(data);
    db.put_keyed(&cid, data).unwrap();
    cid
}

#[derive(Serialize, Deserialize)]
struct TestNode {
    name: String,
    links: Vec<Cid>,
}

/// Stores a DAG-CBOR interior node named `name` linking to `links`, in that order.
pub fn put_node(db: &impl Blockstore, name: &str, links: &[Cid]) -> Cid {
    let node = TestNode {
        name: name.into(),
        links: links.to_vec(),
    };
    let (cid, bytes) = Cid::from_cbor_blake2b256(&node).unwrap();
    db.put_keyed(&cid, &bytes).unwrap();
    cid
}

/// `root -> [a, b]`, `b -> [a]`.
pub struct Diamond {
    pub root: Cid,
    pub a: Cid,
    pub b: Cid,
}

pub fn diamond(db: &impl Blockstore) -> Diamond {
    let a = put_leaf(db, b"A");
    let b = put_node(db, "B", &[a]);
    let root = put_node(db, "R", &[a, b]);
    Diamond { root, a, b }
}

/// A tree of distinct nodes, `width` children per interior node. Returns the root and
/// every CID in pre-order.
pub fn tree(db: &impl Blockstore, depth: usize, width: usize) -> (Cid, Vec<Cid>) {
    fn build(
        db: &impl Blockstore,
        path: &str,
        depth: usize,
        width: usize,
        out: &mut Vec<Cid>,
    ) -> Cid {
        let slot = out.len();
        out.push(Cid::default());
        let cid = if depth == 0 {
            put_leaf(db, path.as_bytes())
        } else {
            let children: Vec<Cid> = (0..width)
                .map(|i| build(db, &format!("{path}/{i}"), depth - 1, width, out))
                .collect();
            put_node(db, path, &children)
        };
        out[slot] = cid;
        cid
    }
    let mut out = vec![];
    let root = build(db, "", depth, width, &mut out);
    (root, out)
}

/// A [`MemoryDB`] whose reads of selected blocks fail a configurable number of times.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryDB,
    failures: Mutex<CidHashMap<usize>>,
    reads: Mutex<CidHashMap<usize>>,
    total_reads: AtomicUsize,
}

impl FlakyStore {
    /// Fails the next `times` reads of `cid`.
    pub fn fail(&self, cid: Cid, times: usize) {
        self.failures.lock().insert(cid, times);
    }

    pub fn reads_of(&self, cid: &Cid) -> usize {
        self.reads.lock().get(cid).copied().unwrap_or_default()
    }

    pub fn total_reads(&self) -> usize {
        self.total_reads.load(Ordering::Relaxed)
    }
}

impl Blockstore for FlakyStore {
    fn get(&self, k: &Cid) -> anyhow::Result<Option<Vec<u8>>> {
        self.total_reads.fetch_add(1, Ordering::Relaxed);
        *self.reads.lock().entry(*k).or_insert(0) += 1;
        if let Some(left) = self.failures.lock().get_mut(k).filter(|left| **left > 0) {
            *left -= 1;
            anyhow::bail!("injected failure for {k}");
        }
        self.inner.get(k)
    }

    fn put_keyed(&self, k: &Cid, block: &[u8]) -> anyhow::Result<()> {
        self.inner.put_keyed(k, block)
    }
}
