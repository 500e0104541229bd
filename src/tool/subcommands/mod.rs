// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod car_cmd;
pub mod config_cmd;
pub mod piece_cmd;

use crate::utils::misc::LoggingColor;
use crate::utils::version::DAGCAR_VERSION_STRING;
use clap::Parser;
use std::path::PathBuf;

/// Command-line options for the `dagcar` binary
#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"), author = env!("CARGO_PKG_AUTHORS"), version = DAGCAR_VERSION_STRING.as_str(), about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Configuration file, overrides `DAGCAR_CONFIG`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Colorize log output
    #[arg(long, global = true, default_value_t = LoggingColor::Auto)]
    pub color: LoggingColor,
    #[command(subcommand)]
    pub cmd: Subcommand,
}

/// dagcar sub-commands
#[derive(clap::Subcommand)]
pub enum Subcommand {
    /// Build and inspect CAR archives
    #[command(subcommand)]
    Car(car_cmd::CarCommands),

    /// Align CAR archives to piece sizes
    #[command(subcommand)]
    Piece(piece_cmd::PieceCommands),

    /// Inspect the effective configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}
