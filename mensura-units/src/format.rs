//! Measurement formatting
//!
//! Magnitudes are rounded half away from zero, the same rule used by
//! conversion and comparison.

use serde::{Deserialize, Serialize};
use mensura_core::Number;
use crate::{Category, Measurement};

/// Fractional digits shown when no precision is requested
///
/// Trailing zeros are trimmed in that mode, so 5.5 reads "5.5", not "5.5000".
pub const DEFAULT_DISPLAY_PRECISION: u32 = 4;

/// How the unit is written after the magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitStyle {
    /// "5 kg"
    #[default]
    Symbol,
    /// "5 kilograms", singular when the shown magnitude is exactly 1
    Name,
}

impl UnitStyle {
    /// Parse "symbol" or "name", case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "symbol" => Some(UnitStyle::Symbol),
            "name" => Some(UnitStyle::Name),
            _ => None,
        }
    }
}

/// Renders measurements as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Formatter {
    /// Fixed fractional digits, or `None` for trimmed default precision
    pub precision: Option<u32>,
    pub style: UnitStyle,
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: show exactly `places` fractional digits
    pub fn with_precision(mut self, places: u32) -> Self {
        self.precision = Some(places);
        self
    }

    /// Builder: `None` restores the trimmed default precision
    pub fn with_optional_precision(mut self, places: Option<u32>) -> Self {
        self.precision = places;
        self
    }

    pub fn with_style(mut self, style: UnitStyle) -> Self {
        self.style = style;
        self
    }

    /// Render the magnitude alone
    pub fn format_magnitude(&self, magnitude: &Number) -> String {
        match self.precision {
            Some(places) => magnitude.to_fixed(places),
            None => magnitude.to_plain(DEFAULT_DISPLAY_PRECISION),
        }
    }

    pub fn format<C: Category>(&self, m: &Measurement<C>) -> String {
        let places = self.precision.unwrap_or(DEFAULT_DISPLAY_PRECISION);
        let unit = m.unit();
        let label = match self.style {
            UnitStyle::Symbol => unit.symbol(),
            UnitStyle::Name if m.magnitude().round_to(places) == Number::from_i64(1) => unit.singular(),
            UnitStyle::Name => unit.plural(),
        };
        format!("{} {}", self.format_magnitude(m.magnitude()), label)
    }
}

impl<C: Category> Measurement<C> {
    /// Render with `precision` fractional digits (`None` for the default)
    pub fn format(&self, precision: Option<u32>, style: UnitStyle) -> String {
        Formatter::new()
            .with_optional_precision(precision)
            .with_style(style)
            .format(self)
    }

    /// Default precision with the unit name, e.g. "5.5 kilograms"
    pub fn humanize(&self) -> String {
        self.format(None, UnitStyle::Name)
    }

    /// Default precision with the unit symbol, e.g. "5.5 kg"
    pub fn to_text(&self) -> String {
        self.format(None, UnitStyle::Symbol)
    }
}
