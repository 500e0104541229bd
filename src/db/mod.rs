// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Block store implementations.
//!
//! The archive engine consumes any [`Blockstore`]; [`MemoryDB`] is the store used by the
//! command line tool and by tests.

mod memory;

pub use fvm_ipld_blockstore::Blockstore;
pub use memory::MemoryDB;
