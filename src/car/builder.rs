// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{CarRef, Error};
use crate::cid_collections::CidHashSet;
use crate::ipld::{BlockstoreFetcher, DagNode, DagWalker, NodeFetcher};
use crate::utils::db::car_stream::{CarBlock, CarV1Header};
use crate::utils::io::CountingWriter;
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

enum Record<'a> {
    Header(&'a CarV1Header),
    Block(&'a CarBlock),
}

/// Serializes the DAG under a root into a CARv1 archive, or computes the index of that
/// archive without writing it.
///
/// Both produce the same record sequence: the header, the root block, then every other
/// block in walk order, each CID at most once.
pub struct CarBuilder<F> {
    walker: DagWalker<F>,
}

impl<BS: Blockstore + Send + Sync + 'static> CarBuilder<BlockstoreFetcher<BS>> {
    pub fn from_store(store: Arc<BS>, fanout: usize) -> Self {
        Self::new(BlockstoreFetcher::new(store), fanout)
    }
}

impl<F: NodeFetcher> CarBuilder<F> {
    pub fn new(fetcher: F, fanout: usize) -> Self {
        Self {
            walker: DagWalker::new(fetcher, fanout),
        }
    }

    pub fn with_cancellation(self, cancel: CancellationToken) -> Self {
        Self {
            walker: self.walker.with_cancellation(cancel),
        }
    }

    /// Writes the archive to `sink` and returns its size.
    ///
    /// The size computed from the records is checked against the bytes the sink
    /// accepted; a disagreement is an [`Error::SizeMismatch`].
    #[tracing::instrument(skip_all, fields(%root))]
    pub async fn write(&self, root: Cid, sink: impl Write) -> Result<u64, Error> {
        let mut writer = CountingWriter::new(sink);
        let mut car_size = 0;
        self.walk_records(root, |record| {
            car_size += match record {
                Record::Header(header) => header.write(&mut writer)?,
                Record::Block(block) => {
                    block.write(&mut writer)?;
                    block.encoded_len()
                }
            };
            Ok(())
        })
        .await?;
        writer.flush()?;

        if car_size != writer.count() {
            return Err(Error::SizeMismatch {
                expected: car_size,
                actual: writer.count(),
            });
        }
        info!(%root, car_size, "wrote CAR");
        Ok(car_size)
    }

    /// Writes the archive to a new file at `path`.
    pub async fn write_to_file(&self, root: Cid, path: impl AsRef<Path>) -> Result<u64, Error> {
        let path = path.as_ref();
        debug!(path = %path.display(), "creating CAR file");
        let mut file = BufWriter::new(File::create(path)?);
        self.write(root, &mut file).await
    }

    /// Computes where every record of the archive would land, without writing it.
    #[tracing::instrument(skip_all, fields(%root))]
    pub async fn car_ref(&self, root: Cid) -> Result<CarRef, Error> {
        let mut car_ref = CarRef::default();
        self.walk_records(root, |record| {
            match record {
                Record::Header(header) => car_ref.push_header(header)?,
                Record::Block(block) => car_ref.push_block(block),
            }
            Ok(())
        })
        .await?;
        debug!(%root, size = car_ref.size, records = car_ref.entries.len(), "built CAR ref");
        Ok(car_ref)
    }

    async fn walk_records(
        &self,
        root: Cid,
        mut on_record: impl FnMut(Record<'_>) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let root_node = self.walker.fetch(root).await?;
        on_record(Record::Header(&CarV1Header::new(nunny::vec![root])))?;
        on_record(Record::Block(root_node.block()))?;

        let mut emitted = CidHashSet::new();
        emitted.insert(root);
        self.walker
            .walk(&root_node, |node: &DagNode| {
                if !emitted.insert(*node.cid()) {
                    trace!(cid = %node.cid(), "skipping duplicate block");
                    return Ok(());
                }
                trace!(cid = %node.cid(), len = node.data().len(), "emitting block");
                on_record(Record::Block(node.block()))
            })
            .await?;
        trace!(%root, blocks = emitted.len(), "walk emitted unique blocks");
        Ok(())
    }
}
