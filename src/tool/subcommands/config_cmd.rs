// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use clap::Subcommand;

use crate::cli_shared::cli::Config;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Dump,
}

impl ConfigCommands {
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Dump => print!("{}", toml::to_string(config)?),
        }
        Ok(())
    }
}
