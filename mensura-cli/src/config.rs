//! Environment configuration, read once at startup

use std::env;
use mensura_units::{Formatter, UnitStyle};
use tracing::warn;

const PRECISION_VAR: &str = "MENSURA_PRECISION";
const UNIT_STYLE_VAR: &str = "MENSURA_UNIT_STYLE";

/// Upper bound on requested display precision
pub const MAX_PRECISION: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    /// Display precision, `None` for the trimmed default
    pub precision: Option<u32>,
    pub unit_style: UnitStyle,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; invalid values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(raw) = lookup(PRECISION_VAR) {
            match raw.trim().parse::<u32>() {
                Ok(places) if places <= MAX_PRECISION => config.precision = Some(places),
                _ => warn!(value = %raw, "ignoring invalid {}", PRECISION_VAR),
            }
        }

        if let Some(raw) = lookup(UNIT_STYLE_VAR) {
            match UnitStyle::from_name(&raw) {
                Some(style) => config.unit_style = style,
                None => warn!(value = %raw, "ignoring invalid {}, expected symbol or name", UNIT_STYLE_VAR),
            }
        }

        config
    }

    /// Formatter with the configured defaults
    pub fn formatter(&self) -> Formatter {
        Formatter::new()
            .with_optional_precision(self.precision)
            .with_style(self.unit_style)
    }
}
