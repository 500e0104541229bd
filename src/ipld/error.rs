// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use itertools::Itertools as _;
use thiserror::Error;

/// A block that was fetched but could not be parsed as a DAG node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to decode block {cid}: {reason}")]
pub struct DecodeError {
    pub cid: Cid,
    pub reason: String,
}

/// Failure to load a single node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("block {0} not found")]
    NotFound(Cid),
    #[error("failed to load block {cid}: {reason}")]
    Store { cid: Cid, reason: String },
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl FetchError {
    pub fn cid(&self) -> &Cid {
        match self {
            FetchError::NotFound(cid) => cid,
            FetchError::Store { cid, .. } => cid,
            FetchError::Decode(e) => &e.cid,
        }
    }

    /// Availability failures are worth a second attempt, malformed data is not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Decode(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    /// Every node that still could not be loaded after its retry.
    #[error("failed to fetch {} block(s):\n{}", .0.len(), .0.iter().join("\n"))]
    Fetch(Vec<FetchError>),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("walk cancelled")]
    Cancelled,
}

impl From<FetchError> for WalkError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Decode(e) => WalkError::Decode(e),
            other => WalkError::Fetch(vec![other]),
        }
    }
}
