// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use serde::{Deserialize, Serialize};

/// Maps a raw archive size to the size it must be padded to.
///
/// Implementations must return a value no smaller than their input. Plain functions and
/// closures qualify.
pub trait PaddedSize {
    fn padded_size(&self, raw: u64) -> u64;
}

impl<F: Fn(u64) -> u64> PaddedSize for F {
    fn padded_size(&self, raw: u64) -> u64 {
        self(raw)
    }
}

/// Built-in piece size policies.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PieceSizePolicy {
    /// Largest payload that fits a power-of-two piece after Fr32 expansion.
    #[default]
    Fr32,
    /// Next power of two.
    PowerOfTwo,
}

impl PaddedSize for PieceSizePolicy {
    fn padded_size(&self, raw: u64) -> u64 {
        match self {
            PieceSizePolicy::Fr32 => fr32_unpadded_piece_size(raw),
            PieceSizePolicy::PowerOfTwo => raw.max(1).next_power_of_two(),
        }
    }
}

/// Fr32 padding stores 254 payload bits in every 256 bit word, i.e. 127 bytes per 128.
/// Returns the payload capacity of the smallest power-of-two piece that holds `raw`
/// bytes.
pub fn fr32_unpadded_piece_size(raw: u64) -> u64 {
    if raw <= 127 {
        return 127;
    }
    let padded = (raw.div_ceil(127) * 128).next_power_of_two();
    padded - padded / 128
}
