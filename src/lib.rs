// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Build, index and piece-align CAR v1 archives from content-addressed DAGs.
//!
//! The engine is split into four layers:
//! - [`ipld::DagWalker`] visits a DAG level by level with a bounded number of
//!   concurrent block fetches.
//! - [`car::CarBuilder::write`] serializes the unique blocks of a DAG into a CAR v1 archive.
//! - [`car::CarBuilder::car_ref`] computes the record layout of that archive without writing it.
//! - [`car::pad_car`] and [`car::unpad_car`] align a finished archive to a piece size and back.

pub mod car;
pub mod cid_collections;
mod cli_shared;
pub mod db;
pub mod ipld;
#[cfg(test)]
mod test_utils;
mod tool;
pub mod utils;

pub use cli_shared::cli::{Config, PieceConfig, WalkConfig};
pub use tool::main::main as dagcar_main;
