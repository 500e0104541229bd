// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use is_terminal::IsTerminal;

#[derive(Debug, Default, Clone, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum LoggingColor {
    Always,
    #[default]
    Auto,
    Never,
}

impl LoggingColor {
    pub fn coloring_enabled(&self) -> bool {
        match self {
            LoggingColor::Auto => std::io::stderr().is_terminal(),
            LoggingColor::Always => true,
            LoggingColor::Never => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn parse_logging_color() {
        assert_eq!(LoggingColor::from_str("always").unwrap(), LoggingColor::Always);
        assert_eq!(LoggingColor::from_str("never").unwrap(), LoggingColor::Never);
        assert!(LoggingColor::from_str("sometimes").is_err());
        assert!(!LoggingColor::Never.coloring_enabled());
    }
}
