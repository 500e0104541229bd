// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::ffi::OsString;

use super::subcommands::{Cli, Subcommand};
use crate::cli_shared::{logger::setup_logger, read_config};
use clap::Parser as _;
use tracing::debug;

pub fn main<ArgT>(args: impl IntoIterator<Item = ArgT>) -> anyhow::Result<()>
where
    ArgT: Into<OsString> + Clone,
{
    // Capture Cli inputs
    let Cli { config, color, cmd } = Cli::parse_from(args);
    let (config_path, config) = read_config(config.as_deref())?;
    setup_logger(&config.log, color)?;
    if let Some(path) = &config_path {
        debug!(path = %path.to_path_buf().display(), "loaded configuration");
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            // Run command
            match cmd {
                Subcommand::Car(cmd) => cmd.run(&config).await,
                Subcommand::Piece(cmd) => cmd.run(&config),
                Subcommand::Config(cmd) => cmd.run(&config),
            }
        })
}
