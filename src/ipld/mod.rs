// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! DAG nodes and the bounded parallel walker that loads them.

mod error;
mod node;
mod walk;

pub use error::{DecodeError, FetchError, WalkError};
pub use node::{DAG_PB, DagNode, Link};
pub use walk::{BlockstoreFetcher, DagWalker, NodeFetcher};

#[cfg(test)]
mod tests;
