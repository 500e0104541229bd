// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::ipld::WalkError;
use cid::Cid;
use itertools::Itertools as _;
use thiserror::Error;

/// CAR construction and alignment error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid CAR file: {0}")]
    InvalidFile(String),
    #[error("CAR is missing root block(s): {}", .0.iter().join(", "))]
    MissingBlocks(Vec<Cid>),
    #[error("Size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: u64, actual: u64 },
    #[error("Cbor encoding error: {0}")]
    Encoding(String),
}

impl From<fvm_ipld_encoding::Error> for Error {
    fn from(err: fvm_ipld_encoding::Error) -> Error {
        Error::Encoding(err.to_string())
    }
}

impl Error {
    /// Maps malformed-input I/O errors raised while parsing to [`Error::InvalidFile`].
    pub(crate) fn parsing(err: std::io::Error) -> Error {
        match err.kind() {
            std::io::ErrorKind::InvalidData | std::io::ErrorKind::UnexpectedEof => {
                Error::InvalidFile(err.to_string())
            }
            _ => Error::Io(err),
        }
    }
}
