// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Building, indexing and piece-aligning CARv1 archives.
//!
//! [`CarBuilder`] walks a DAG and either writes it out as an archive or computes a
//! [`CarRef`], the record layout of that archive, without writing anything.
//! [`pad_car`] and [`unpad_car`] convert a written archive between its natural size and
//! a piece size chosen by a [`PaddedSize`] policy.

mod builder;
mod error;
mod pad;
mod piece;
mod refs;

pub use builder::CarBuilder;
pub use error::Error;
pub use pad::{Aligned, CAR_SUFFIX, pad_car, unpad_car};
pub use piece::{PaddedSize, PieceSizePolicy, fr32_unpadded_piece_size};
pub use refs::{CarRef, RefEntry, RefKind};

#[cfg(test)]
mod tests;
