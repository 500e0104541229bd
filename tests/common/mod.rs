// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::path::{Path, PathBuf};

use assert_cmd::{Command, cargo::cargo_bin_cmd};
use cid::Cid;
use dagcar::utils::cid::CidCborExt as _;
use dagcar::utils::db::car_stream::{CarBlock, CarV1Header};
use serde::Serialize;
use tempfile::TempDir;

pub fn tool() -> Command {
    let mut cmd = cargo_bin_cmd!("dagcar");
    cmd.env_remove("DAGCAR_CONFIG").arg("--color").arg("never");
    cmd
}

#[derive(Serialize)]
struct Node {
    links: Vec<Cid>,
}

pub fn leaf(data: &[u8]) -> CarBlock {
    CarBlock {
        cid: Cid::from_raw_blake2b256(data),
        data: data.to_vec(),
    }
}

pub fn node(links: &[Cid]) -> CarBlock {
    let (cid, data) = Cid::from_cbor_blake2b256(&Node {
        links: links.to_vec(),
    })
    .unwrap();
    CarBlock { cid, data }
}

/// A CAR holding `root -> [a, b]`, `b -> [a]`, with the blocks stored out of walk order.
/// Returns the root.
pub fn write_diamond_car(path: &Path) -> Cid {
    let a = leaf(b"a");
    let b = node(&[a.cid]);
    let root = node(&[a.cid, b.cid]);
    let mut car = vec![];
    CarV1Header::new(nunny::vec![root.cid])
        .write(&mut car)
        .unwrap();
    for block in [&b, &a, &root] {
        block.write(&mut car).unwrap();
    }
    std::fs::write(path, car).unwrap();
    root.cid
}

pub fn create_tmp_config(contents: &str) -> (PathBuf, TempDir) {
    let temp_dir = tempfile::tempdir().expect("couldn't create temp dir");
    let config_file = temp_dir.path().join("config.toml");
    std::fs::write(&config_file, contents).expect("couldn't write config");
    (config_file, temp_dir)
}
