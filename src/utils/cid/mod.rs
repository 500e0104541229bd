// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use fvm_ipld_encoding::{DAG_CBOR, Error, IPLD_RAW};
use multihash_codetable::{Code, MultihashDigest};

/// Extension methods for constructing [Cid]s from block contents
pub trait CidCborExt {
    /// CID of the `dag-cbor` encoding of `obj`, hashed with 256 bit BLAKE2b.
    ///
    /// Returns the encoded bytes alongside, as callers usually store them under the CID.
    fn from_cbor_blake2b256<S: serde::ser::Serialize>(obj: &S) -> Result<(Cid, Vec<u8>), Error> {
        let bytes = fvm_ipld_encoding::to_vec(obj)?;
        Ok((
            Cid::new_v1(DAG_CBOR, Code::Blake2b256.digest(&bytes)),
            bytes,
        ))
    }

    /// CID of a raw leaf block, hashed with 256 bit BLAKE2b.
    fn from_raw_blake2b256(data: &[u8]) -> Cid {
        Cid::new_v1(IPLD_RAW, Code::Blake2b256.digest(data))
    }
}

impl CidCborExt for Cid {}
