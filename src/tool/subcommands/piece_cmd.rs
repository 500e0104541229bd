// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Subcommand;

use crate::car::{Aligned, PieceSizePolicy, pad_car, unpad_car};
use crate::cli_shared::cli::Config;

#[derive(Debug, Subcommand)]
pub enum PieceCommands {
    /// Zero-pad a CAR file to its piece size. A `.car` suffix is dropped from the name.
    Pad {
        path: PathBuf,
        /// Piece size policy, overrides `piece.policy`
        #[arg(long)]
        policy: Option<PieceSizePolicy>,
    },
    /// Strip zero padding from a CAR file. A `.car` suffix is added to the name.
    Unpad { path: PathBuf },
}

impl PieceCommands {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let aligned = match self {
            Self::Pad { path, policy } => {
                let policy = policy.unwrap_or(config.piece.policy);
                pad_car(&path, &policy).with_context(|| format!("padding {}", path.display()))?
            }
            Self::Unpad { path } => {
                unpad_car(&path).with_context(|| format!("unpadding {}", path.display()))?
            }
        };
        let Aligned {
            path,
            before,
            after,
        } = aligned;
        println!("{}\t{before}\t{after}", path.display());
        Ok(())
    }
}
