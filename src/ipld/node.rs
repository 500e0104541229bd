// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::DecodeError;
use crate::utils::db::car_stream::CarBlock;
use bytes::Bytes;
use cid::Cid;
use fvm_ipld_encoding::{DAG_CBOR, IPLD_RAW};
use ipld_core::ipld::Ipld;
use ipld_dagpb::PbNode;
use itertools::Itertools as _;

/// Multicodec code of `dag-pb`.
pub const DAG_PB: u64 = 0x70;

/// An edge to a child node, with the size hint the parent recorded for it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub cid: Cid,
    pub size: Option<u64>,
}

impl From<Cid> for Link {
    fn from(cid: Cid) -> Self {
        Self { cid, size: None }
    }
}

/// A loaded block together with its outgoing links, in encoding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DagNode {
    block: CarBlock,
    links: Vec<Link>,
}

impl DagNode {
    /// Parses the links out of `data` according to the codec of `cid`.
    ///
    /// `dag-pb`, `dag-cbor` and `raw` blocks are understood; any other codec is a
    /// [`DecodeError`].
    pub fn decode(cid: Cid, data: Vec<u8>) -> Result<Self, DecodeError> {
        let links = match cid.codec() {
            DAG_PB => PbNode::from_bytes(Bytes::copy_from_slice(&data))
                .map_err(|e| DecodeError {
                    cid,
                    reason: e.to_string(),
                })?
                .links
                .iter()
                .map(|link| Link {
                    cid: link.cid,
                    size: link.size,
                })
                .collect(),
            DAG_CBOR => {
                let ipld: Ipld =
                    serde_ipld_dagcbor::from_slice(&data).map_err(|e| DecodeError {
                        cid,
                        reason: e.to_string(),
                    })?;
                let mut links = vec![];
                collect_links(&ipld, &mut links);
                links
            }
            IPLD_RAW => vec![],
            other => {
                return Err(DecodeError {
                    cid,
                    reason: format!("unsupported codec {other:#x}"),
                });
            }
        };
        Ok(Self {
            block: CarBlock { cid, data },
            links,
        })
    }

    pub fn cid(&self) -> &Cid {
        &self.block.cid
    }

    pub fn data(&self) -> &[u8] {
        &self.block.data
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn is_leaf(&self) -> bool {
        self.links.is_empty()
    }

    /// The node as an archive data record.
    pub fn block(&self) -> &CarBlock {
        &self.block
    }

    pub fn into_block(self) -> CarBlock {
        self.block
    }
}

// Depth-first, so links come out in the order they are encoded. `dag-cbor` sorts map
// keys by length first, then bytewise; the `BTreeMap` only gives the bytewise part.
fn collect_links(ipld: &Ipld, links: &mut Vec<Link>) {
    match ipld {
        Ipld::Link(cid) => links.push(Link::from(*cid)),
        Ipld::List(list) => list.iter().for_each(|v| collect_links(v, links)),
        Ipld::Map(map) => map
            .iter()
            .sorted_by_key(|(key, _)| key.len())
            .for_each(|(_, v)| collect_links(v, links)),
        _ => {}
    }
}
