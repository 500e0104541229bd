// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub mod cli;
pub mod logger;

use crate::cli_shared::cli::{Config, ConfigPath, find_config_path};
use crate::utils::io::read_toml;
use anyhow::Context as _;
use std::path::Path;

pub fn read_config(config_path_opt: Option<&Path>) -> anyhow::Result<(Option<ConfigPath>, Config)> {
    match find_config_path(config_path_opt) {
        Some(path) => {
            // Read from config file
            let toml = std::fs::read_to_string(path.to_path_buf())
                .with_context(|| format!("reading {}", path.to_path_buf().display()))?;
            // Parse and return the configuration file
            let config = read_toml(&toml)
                .with_context(|| format!("parsing {}", path.to_path_buf().display()))?;
            Ok((Some(path), config))
        }
        None => Ok((None, Config::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::PieceSizePolicy;

    #[test]
    fn read_config_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut expected = Config::default();
        expected.walk.fanout = 3;
        expected.piece.policy = PieceSizePolicy::PowerOfTwo;
        std::fs::write(&path, toml::to_string(&expected).unwrap()).unwrap();

        let (config_path, config) = read_config(Some(&path)).unwrap();

        assert_eq!(config_path.unwrap(), ConfigPath::Cli(path));
        assert_eq!(config, expected);
    }

    #[test]
    fn read_config_reports_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[walk]\nfanout = \"many\"\n").unwrap();
        assert!(read_config(Some(&path)).is_err());
        assert!(read_config(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
