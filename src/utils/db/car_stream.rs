// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT
use bytes::{Buf, Bytes};
use cid::Cid;
use futures::{Stream, StreamExt};
use fvm_ipld_encoding::{from_slice, to_vec};
use integer_encoding::{VarInt, VarIntReader};
use multihash_codetable::{Code, MultihashDigest};
use nunny::Vec as NonEmpty;
use pin_project_lite::pin_project;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Read, Write};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;
use unsigned_varint::codec::UviBytes;

/// The only CAR version this crate reads or writes.
pub const CAR_V1: u64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarV1Header {
    // The roots array must contain one or more CIDs,
    // each of which should be present somewhere in the remainder of the CAR.
    // See <https://ipld.io/specs/transport/car/carv1/#constraints>
    pub roots: NonEmpty<Cid>,
    pub version: u64,
}

impl CarV1Header {
    pub fn new(roots: NonEmpty<Cid>) -> Self {
        Self {
            roots,
            version: CAR_V1,
        }
    }

    /// DAG-CBOR encoding of the header, without the length prefix.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        to_vec(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Size of the header record once written, length prefix included.
    pub fn encoded_len(&self) -> io::Result<u64> {
        Ok(ld_size(self.to_bytes()?.len()))
    }

    /// Writes the length-prefixed header record and returns its size.
    pub fn write(&self, writer: &mut impl Write) -> io::Result<u64> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes.len().encode_var_vec())?;
        writer.write_all(&bytes)?;
        Ok(ld_size(bytes.len()))
    }

    /// Reads and validates the header record at the start of `reader`, returning it
    /// together with its on-disk size.
    pub fn read(reader: &mut impl BufRead) -> io::Result<(Self, u64)> {
        let frame = ld_read(reader)?.ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "missing CAR header block")
        })?;
        Ok((Self::from_frame(&frame)?, ld_size(frame.len())))
    }

    /// Decodes and validates a header frame, length prefix excluded.
    pub fn from_frame(frame: &[u8]) -> io::Result<Self> {
        let header = from_slice::<CarV1Header>(frame).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("invalid header block: {e}"))
        })?;
        if header.version != CAR_V1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unsupported CAR version {}", header.version),
            ));
        }
        Ok(header)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarBlock {
    pub cid: Cid,
    pub data: Vec<u8>,
}

impl CarBlock {
    // Write a varint frame containing the cid and the data
    pub fn write(&self, mut writer: &mut impl Write) -> io::Result<()> {
        let frame_length = self.cid.encoded_len() + self.data.len();
        writer.write_all(&frame_length.encode_var_vec())?;
        #[allow(clippy::needless_borrows_for_generic_args)]
        self.cid
            .write_bytes(&mut writer)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    /// Size of the data record once written, length prefix included.
    pub fn encoded_len(&self) -> u64 {
        ld_size(self.cid.encoded_len() + self.data.len())
    }

    pub fn from_bytes(bytes: impl Into<Bytes>) -> io::Result<CarBlock> {
        let bytes: Bytes = bytes.into();
        let mut cursor = bytes.reader();
        let cid = Cid::read_bytes(&mut cursor)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let bytes = cursor.into_inner();
        Ok(CarBlock {
            cid,
            data: bytes.to_vec(),
        })
    }

    pub fn valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let code = Code::try_from(self.cid.hash().code())?;
        let actual = code.digest(&self.data);
        anyhow::ensure!(
            &actual == self.cid.hash(),
            "CID/Block mismatch for block {}",
            self.cid
        );
        Ok(())
    }
}

/// Total size of a length-prefixed record carrying `payload_len` bytes.
pub fn ld_size(payload_len: usize) -> u64 {
    (payload_len.required_space() + payload_len) as u64
}

/// Reads one length-prefixed frame.
///
/// Returns `None` on a clean end of input and on a zero-length frame, which is where
/// zero padding starts. A frame cut short by the end of input is an
/// [`io::ErrorKind::UnexpectedEof`] error.
pub fn ld_read(reader: &mut impl BufRead) -> io::Result<Option<Vec<u8>>> {
    if reader.fill_buf()?.is_empty() {
        return Ok(None);
    }
    let len: u64 = reader.read_varint()?;
    if len == 0 {
        return Ok(None);
    }
    // `take` keeps a bogus length from turning into a huge allocation.
    let mut buf = Vec::new();
    reader.by_ref().take(len).read_to_end(&mut buf)?;
    if buf.len() as u64 != len {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("frame truncated: expected {len} bytes, got {}", buf.len()),
        ));
    }
    Ok(Some(buf))
}

pin_project! {
    /// Stream of CAR blocks.
    pub struct CarStream<ReaderT> {
        #[pin]
        reader: FramedRead<ReaderT, UviBytes>,
        pub header: CarV1Header,
        first_block: Option<CarBlock>,
    }
}

impl<ReaderT: AsyncRead + Unpin> CarStream<ReaderT> {
    pub async fn new(reader: ReaderT) -> io::Result<Self> {
        let mut reader = FramedRead::new(reader, UviBytes::default());
        let header = read_v1_header(&mut reader).await?;

        // Read the first block and check if it is valid. This check helps to
        // catch invalid CAR files as soon as we open.
        let first_block = match reader.next().await.transpose()? {
            Some(first_entry) => {
                let block = CarBlock::from_bytes(first_entry)?;
                if !block.valid() {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        "invalid first block",
                    ));
                }
                Some(block)
            }
            None => None,
        };
        Ok(CarStream {
            reader,
            header,
            first_block,
        })
    }
}

impl<ReaderT: AsyncRead> Stream for CarStream<ReaderT> {
    type Item = io::Result<CarBlock>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if let Some(block) = this.first_block.take() {
            return Poll::Ready(Some(Ok(block)));
        }
        let item = futures::ready!(this.reader.poll_next(cx));
        Poll::Ready(item.map(|ret| ret.and_then(CarBlock::from_bytes)))
    }
}

async fn read_v1_header<ReaderT: AsyncRead + Unpin>(
    framed_reader: &mut FramedRead<ReaderT, UviBytes>,
) -> io::Result<CarV1Header> {
    let frame = framed_reader
        .next()
        .await
        .transpose()?
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "missing CAR header block"))?;
    CarV1Header::from_frame(&frame)
}
