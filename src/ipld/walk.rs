// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{DagNode, FetchError, WalkError};
use cid::Cid;
use fvm_ipld_blockstore::Blockstore;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

/// Loads and decodes a single DAG node.
pub trait NodeFetcher: Send + Sync + 'static {
    fn fetch(&self, cid: Cid) -> impl Future<Output = Result<DagNode, FetchError>> + Send;
}

/// Fetches nodes out of a local [`Blockstore`].
pub struct BlockstoreFetcher<BS> {
    store: Arc<BS>,
}

impl<BS> BlockstoreFetcher<BS> {
    pub fn new(store: Arc<BS>) -> Self {
        Self { store }
    }
}

impl<BS: Blockstore + Send + Sync + 'static> NodeFetcher for BlockstoreFetcher<BS> {
    async fn fetch(&self, cid: Cid) -> Result<DagNode, FetchError> {
        let data = self
            .store
            .get(&cid)
            .map_err(|e| FetchError::Store {
                cid,
                reason: e.to_string(),
            })?
            .ok_or(FetchError::NotFound(cid))?;
        Ok(DagNode::decode(cid, data)?)
    }
}

/// Depth-first, pre-order traversal of a DAG.
///
/// The children of a node are fetched concurrently, at most `fanout` fetches in flight
/// across the whole walk, and visited in link order once all of them have settled. A
/// fetch that fails is retried once. Nodes that still cannot be fetched are skipped
/// together with their subtree, and reported as a single [`WalkError::Fetch`] once the
/// rest of the DAG has been visited. A node reachable over several paths is visited
/// once per path.
pub struct DagWalker<F> {
    fetcher: Arc<F>,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl<F: NodeFetcher> DagWalker<F> {
    /// A `fanout` of zero is treated as one.
    pub fn new(fetcher: F, fanout: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            permits: Arc::new(Semaphore::new(fanout.max(1))),
            cancel: CancellationToken::new(),
        }
    }

    /// Stops the walk at the next fetch once `cancel` fires. Fetches already in flight
    /// run to completion.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches a single node, retrying once.
    pub async fn fetch(&self, cid: Cid) -> Result<DagNode, WalkError> {
        if self.cancel.is_cancelled() {
            return Err(WalkError::Cancelled);
        }
        Ok(fetch_with_retry(self.fetcher.as_ref(), cid).await?)
    }

    /// Calls `visit` for every descendant of `root`, `root` itself excluded.
    ///
    /// An error returned by `visit` stops the walk and is returned as is.
    pub async fn walk<E, V>(&self, root: &DagNode, mut visit: V) -> Result<(), E>
    where
        E: From<WalkError>,
        V: FnMut(&DagNode) -> Result<(), E>,
    {
        let mut failures = vec![];
        let mut stack = vec![self.fetch_children(root, &mut failures).await?.into_iter()];
        while let Some(level) = stack.last_mut() {
            match level.next() {
                Some(child) => {
                    visit(&child)?;
                    if !child.is_leaf() {
                        let grandchildren = self.fetch_children(&child, &mut failures).await?;
                        stack.push(grandchildren.into_iter());
                    }
                }
                None => {
                    stack.pop();
                }
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            debug!(root = %root.cid(), failed = failures.len(), "walk finished with missing nodes");
            Err(WalkError::Fetch(failures).into())
        }
    }

    /// Fetches all children of `node` and returns the ones that loaded, in link order.
    /// Fetch failures are appended to `failures`. A decode failure or cancellation
    /// fails the whole level.
    async fn fetch_children(
        &self,
        node: &DagNode,
        failures: &mut Vec<FetchError>,
    ) -> Result<Vec<DagNode>, WalkError> {
        if node.is_leaf() {
            return Ok(vec![]);
        }
        trace!(cid = %node.cid(), links = node.links().len(), "fetching children");
        let tasks = node.links().iter().map(|link| {
            let fetcher = self.fetcher.clone();
            let permits = self.permits.clone();
            let cancel = self.cancel.clone();
            let cid = link.cid;
            tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return None;
                };
                if cancel.is_cancelled() {
                    return None;
                }
                Some(fetch_with_retry(fetcher.as_ref(), cid).await)
            })
        });
        let settled = futures::future::join_all(tasks).await;
        if self.cancel.is_cancelled() {
            debug!(cid = %node.cid(), "walk cancelled");
            return Err(WalkError::Cancelled);
        }

        let mut children = Vec::with_capacity(settled.len());
        for (link, outcome) in node.links().iter().zip(settled) {
            match outcome {
                Ok(Some(Ok(child))) => children.push(child),
                Ok(Some(Err(FetchError::Decode(e)))) => return Err(WalkError::Decode(e)),
                Ok(Some(Err(e))) => failures.push(e),
                Ok(None) => return Err(WalkError::Cancelled),
                Err(e) => failures.push(FetchError::Store {
                    cid: link.cid,
                    reason: e.to_string(),
                }),
            }
        }
        Ok(children)
    }
}

async fn fetch_with_retry<F: NodeFetcher>(fetcher: &F, cid: Cid) -> Result<DagNode, FetchError> {
    match fetcher.fetch(cid).await {
        Err(e) if e.is_retryable() => {
            warn!(%cid, error = %e, "fetch failed, retrying");
            fetcher.fetch(cid).await
        }
        other => other,
    }
}
