// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::car::PieceSizePolicy;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct LogLevelFilter(pub LevelFilter);

impl Serialize for LogLevelFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LogLevelFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Case insensitive.
        let s = String::deserialize(deserializer)?;
        LevelFilter::from_str(&s)
            .map(LogLevelFilter)
            .map_err(|_| D::Error::custom(format!("unknown log level filter `{s}`")))
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct LogConfig {
    pub filters: Vec<LogValue>,
}

impl LogConfig {
    pub(in crate::cli_shared) fn to_filter_string(&self) -> String {
        self.filters
            .iter()
            .map(|f| format!("{}={}", f.module, f.level.0))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filters: vec![LogValue::new("tokio_util", LogLevelFilter(LevelFilter::WARN))],
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct LogValue {
    pub module: String,
    pub level: LogLevelFilter,
}

impl LogValue {
    pub fn new(module: &str, level: LogLevelFilter) -> Self {
        Self {
            module: module.to_string(),
            level,
        }
    }
}

/// DAG traversal settings
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct WalkConfig {
    /// Maximum number of node fetches in flight.
    pub fanout: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self { fanout: 16 }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone, Default)]
#[serde(default)]
pub struct PieceConfig {
    pub policy: PieceSizePolicy,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Default, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub walk: WalkConfig,
    pub piece: PieceConfig,
    pub log: LogConfig,
}

#[cfg(test)]
mod test {
    use super::*;
    use quickcheck::Arbitrary;
    use quickcheck_macros::quickcheck;
    use tracing_subscriber::EnvFilter;

    #[derive(Clone, Debug)]
    struct ArbitraryConfig(Config);

    impl Arbitrary for ArbitraryConfig {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            let levels = [
                LevelFilter::OFF,
                LevelFilter::ERROR,
                LevelFilter::WARN,
                LevelFilter::INFO,
                LevelFilter::DEBUG,
                LevelFilter::TRACE,
            ];
            ArbitraryConfig(Config {
                walk: WalkConfig {
                    fanout: usize::arbitrary(g),
                },
                piece: PieceConfig {
                    policy: *g
                        .choose(&[PieceSizePolicy::Fr32, PieceSizePolicy::PowerOfTwo])
                        .unwrap(),
                },
                log: LogConfig {
                    filters: vec![LogValue::new(
                        "dagcar",
                        LogLevelFilter(*g.choose(&levels).unwrap()),
                    )],
                },
            })
        }
    }

    #[quickcheck]
    fn test_config_all_params_under_section(config: ArbitraryConfig) {
        let serialized_config =
            toml::to_string(&config.0).expect("could not serialize the configuration");
        assert_eq!(
            serialized_config
                .trim_start()
                .chars()
                .next()
                .expect("configuration empty"),
            '['
        );
        let parsed: Config = toml::from_str(&serialized_config).unwrap();
        assert_eq!(parsed, config.0);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[walk]\nfanout = 4\n").unwrap();
        assert_eq!(config.walk.fanout, 4);
        assert_eq!(config.piece.policy, PieceSizePolicy::Fr32);
        assert_eq!(config.log, LogConfig::default());

        let config: Config = toml::from_str("[piece]\npolicy = \"power-of-two\"\n").unwrap();
        assert_eq!(config.piece.policy, PieceSizePolicy::PowerOfTwo);
        assert_eq!(config.walk.fanout, 16);
    }

    #[test]
    fn test_log_levels_are_case_insensitive() {
        let config: LogConfig =
            toml::from_str("[[filters]]\nmodule = \"dagcar::car\"\nlevel = \"DEBUG\"\n").unwrap();
        assert_eq!(config.filters[0].level, LogLevelFilter(LevelFilter::DEBUG));
        let loud = "[[filters]]\nmodule = \"x\"\nlevel = \"loud\"\n";
        assert!(toml::from_str::<LogConfig>(loud).is_err());
    }

    #[test]
    fn test_default_log_filters() {
        let config = LogConfig::default();
        let filter = config.to_filter_string();
        assert_eq!(filter, format!("tokio_util={}", LevelFilter::WARN));
        EnvFilter::builder().parse(filter).unwrap();
    }
}
