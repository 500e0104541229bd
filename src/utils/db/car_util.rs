// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use futures::TryStreamExt;
use fvm_ipld_blockstore::Blockstore;
use tokio::io::{AsyncRead, BufReader};
use tracing::debug;

use crate::utils::db::car_stream::{CarStream, CarV1Header};

/// Stream key-value pairs from a CAR archive into a block store.
/// The block store is not restored to its original state in case of errors.
pub async fn load_car<R>(db: &impl Blockstore, reader: R) -> anyhow::Result<CarV1Header>
where
    R: AsyncRead + Unpin,
{
    let mut stream = CarStream::new(BufReader::new(reader)).await?;
    let mut count = 0_usize;
    while let Some(block) = stream.try_next().await? {
        db.put_keyed(&block.cid, &block.data)?;
        count += 1;
    }
    debug!(blocks = count, "loaded CAR into block store");
    Ok(stream.header)
}
