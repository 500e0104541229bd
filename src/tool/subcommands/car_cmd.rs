// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use cid::Cid;
use clap::Subcommand;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::car::{CarBuilder, CarRef};
use crate::cli_shared::cli::Config;
use crate::db::MemoryDB;
use crate::utils::db::car_util::load_car;

#[derive(Debug, Subcommand)]
pub enum CarCommands {
    /// Export the DAG under a root as a CAR archive
    Export {
        /// CAR files to read blocks from
        #[arg(required = true)]
        car_files: Vec<PathBuf>,
        /// Root CID of the DAG to export
        #[arg(long)]
        root: String,
        /// Output CAR file path
        #[arg(short, long)]
        output: PathBuf,
        /// Maximum concurrent block fetches, overrides `walk.fanout`
        #[arg(long)]
        fanout: Option<usize>,
    },
    /// Compute the record layout of the CAR a DAG would export to, without writing it
    Ref {
        /// CAR files to read blocks from
        #[arg(required = true)]
        car_files: Vec<PathBuf>,
        /// Root CID of the DAG
        #[arg(long)]
        root: String,
        /// Output file for the DAG-CBOR encoded layout
        #[arg(short, long)]
        output: PathBuf,
        /// Maximum concurrent block fetches, overrides `walk.fanout`
        #[arg(long)]
        fanout: Option<usize>,
    },
    /// Print a layout written by `car ref`
    ShowRef {
        /// DAG-CBOR encoded layout
        path: PathBuf,
    },
}

impl CarCommands {
    pub async fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Export {
                car_files,
                root,
                output,
                fanout,
            } => {
                let root = parse_root(&root)?;
                let builder = load_builder(&car_files, fanout.unwrap_or(config.walk.fanout)).await?;
                let size = builder
                    .write_to_file(root, &output)
                    .await
                    .with_context(|| format!("exporting {root} to {}", output.display()))?;
                println!("{size}");
            }
            Self::Ref {
                car_files,
                root,
                output,
                fanout,
            } => {
                let root = parse_root(&root)?;
                let builder = load_builder(&car_files, fanout.unwrap_or(config.walk.fanout)).await?;
                let car_ref = builder.car_ref(root).await?;
                tokio::fs::write(&output, car_ref.encode()?).await?;
                info!(path = %output.display(), records = car_ref.entries.len(), "wrote CAR ref");
                println!("{}", car_ref.size);
            }
            Self::ShowRef { path } => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?;
                let car_ref = CarRef::decode(&bytes)?;
                println!("size: {}", car_ref.size);
                for entry in &car_ref.entries {
                    let cid = entry
                        .blocks
                        .first()
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    println!("{}\t{}\t{}\t{cid}", entry.offset, entry.size, entry.kind);
                }
            }
        }
        Ok(())
    }
}

fn parse_root(root: &str) -> anyhow::Result<Cid> {
    Cid::try_from(root).with_context(|| format!("invalid root CID `{root}`"))
}

/// Loads every block of `car_files` into memory and wraps them in a builder that stops
/// on Ctrl-C.
async fn load_builder(
    car_files: &[PathBuf],
    fanout: usize,
) -> anyhow::Result<CarBuilder<crate::ipld::BlockstoreFetcher<MemoryDB>>> {
    let db = Arc::new(MemoryDB::default());
    for path in car_files {
        load_car_file(&db, path).await?;
    }
    info!(blocks = db.len(), "loaded blocks");

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, stopping");
                cancel.cancel();
            }
        }
    });
    Ok(CarBuilder::from_store(db, fanout).with_cancellation(cancel))
}

async fn load_car_file(db: &MemoryDB, path: &Path) -> anyhow::Result<()> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    load_car(db, file)
        .await
        .with_context(|| format!("loading {}", path.display()))?;
    Ok(())
}
