// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::Error;
use crate::utils::db::car_stream::{CarBlock, CarV1Header};
use cid::Cid;
use fvm_ipld_encoding::tuple::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Kind of record a [`RefEntry`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RefKind {
    Header,
    Data,
}

impl Serialize for RefKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let code: u8 = match self {
            RefKind::Header => 0,
            RefKind::Data => 1,
        };
        code.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RefKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            0 => Ok(RefKind::Header),
            1 => Ok(RefKind::Data),
            other => Err(de::Error::custom(format!("unknown record kind {other}"))),
        }
    }
}

/// Location of one record within an archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct RefEntry {
    /// Byte offset of the record's length prefix.
    pub offset: u64,
    /// Record size, length prefix included.
    pub size: u64,
    pub kind: RefKind,
    /// The roots for the header, the record's CID for data.
    pub blocks: Vec<Cid>,
}

/// Index of an archive that has not necessarily been written: where every record would
/// land, and the total size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize_tuple, Deserialize_tuple)]
pub struct CarRef {
    pub size: u64,
    pub entries: Vec<RefEntry>,
}

impl CarRef {
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        Ok(fvm_ipld_encoding::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        Ok(fvm_ipld_encoding::from_slice(bytes)?)
    }

    pub fn header(&self) -> Option<&RefEntry> {
        self.entries.iter().find(|e| e.kind == RefKind::Header)
    }

    /// The data record carrying `cid`, if any.
    pub fn find(&self, cid: &Cid) -> Option<&RefEntry> {
        self.entries
            .iter()
            .find(|e| e.kind == RefKind::Data && e.blocks.contains(cid))
    }

    pub fn data_offset(&self, cid: &Cid) -> Option<u64> {
        self.find(cid).map(|e| e.offset)
    }

    pub(super) fn push_header(&mut self, header: &CarV1Header) -> Result<(), Error> {
        let size = header.encoded_len()?;
        self.push(RefKind::Header, header.roots.iter().copied().collect(), size);
        Ok(())
    }

    pub(super) fn push_block(&mut self, block: &CarBlock) {
        self.push(RefKind::Data, vec![block.cid], block.encoded_len());
    }

    fn push(&mut self, kind: RefKind, blocks: Vec<Cid>, size: u64) {
        self.entries.push(RefEntry {
            offset: self.size,
            size,
            kind,
            blocks,
        });
        self.size += size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::raw_cid;
    use pretty_assertions::assert_eq;

    fn sample() -> CarRef {
        let mut car_ref = CarRef::default();
        car_ref
            .push_header(&CarV1Header::new(nunny::vec![raw_cid(b"a")]))
            .unwrap();
        for data in [b"a", b"b"] {
            car_ref.push_block(&CarBlock {
                cid: raw_cid(data),
                data: data.to_vec(),
            });
        }
        car_ref
    }

    #[test]
    fn offsets_are_cumulative() {
        let car_ref = sample();
        let mut offset = 0;
        for entry in &car_ref.entries {
            assert_eq!(entry.offset, offset);
            offset += entry.size;
        }
        assert_eq!(car_ref.size, offset);
        // 61 byte header, then two 40 byte records: 1 prefix + 38 CID + 1 payload.
        assert_eq!(car_ref.size, 61 + 40 + 40);
        let header = car_ref.header().unwrap();
        assert_eq!((header.offset, header.size), (0, 61));
        assert_eq!(header.blocks, vec![raw_cid(b"a")]);
        assert_eq!(car_ref.data_offset(&raw_cid(b"a")), Some(61));
        assert_eq!(car_ref.data_offset(&raw_cid(b"b")), Some(101));
        assert_eq!(car_ref.find(&raw_cid(b"b")).unwrap().size, 40);
        assert!(car_ref.data_offset(&raw_cid(b"c")).is_none());
    }

    #[test]
    fn encoding_roundtrip() {
        let car_ref = sample();
        let bytes = car_ref.encode().unwrap();
        assert_eq!(CarRef::decode(&bytes).unwrap(), car_ref);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let entry = (0u64, 1u64, 7u8, Vec::<Cid>::new());
        let bytes = fvm_ipld_encoding::to_vec(&(0u64, vec![entry])).unwrap();
        assert!(matches!(CarRef::decode(&bytes), Err(Error::Encoding(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(CarRef::decode(b"\xff\x00").is_err());
    }
}
