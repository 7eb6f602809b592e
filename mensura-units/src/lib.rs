//! Mensura Units - Category-safe measurements
//!
//! Measurements are magnitudes tagged with a unit, with exact decimal
//! conversion, arithmetic, comparison, parsing and formatting.
//!
//! Categories:
//! - Mass (mg, g, kg, t, oz, lb, st)
//! - Length (mm, cm, m, km, in, ft, yd, mi)
//! - Volume (ml, l, m3, tsp, tbsp, fl oz, cup, pt, qt, gal)
//!
//! ```ignore
//! use mensura_units::{parse, Mass};
//!
//! let a = parse::<Mass>("5 kg")?;
//! let b = parse::<Mass>("10 lbs")?;
//! assert_eq!((a + b).to_text(), "9.5359 kg");
//! ```

mod category;
mod unit;
mod units;
mod measurement;
mod convert;
mod parse;
mod format;
mod record;

pub use category::{Category, Length, Mass, Volume, CATEGORY_NAMES};
pub use unit::{ConversionError, System, Unit};
pub use units::{UnitRegistry, STANDARD};
pub use measurement::Measurement;
pub use convert::{rescale, Converter, COMPARISON_SCALE, CONVERSION_SCALE};
pub use parse::{parse, ParseError, Parser};
pub use format::{Formatter, UnitStyle, DEFAULT_DISPLAY_PRECISION};
pub use record::MeasurementRecord;

use mensura_core::MensuraError;

impl From<ConversionError> for MensuraError {
    fn from(err: ConversionError) -> Self {
        let fragment = match &err {
            ConversionError::CategoryMismatch { unit, .. } => unit.clone(),
            ConversionError::UnknownUnit { symbol, .. } => symbol.clone(),
        };
        MensuraError::conversion_error(err.to_string()).with_fragment(fragment)
    }
}

impl From<ParseError> for MensuraError {
    fn from(err: ParseError) -> Self {
        let fragment = err.fragment().to_string();
        MensuraError::parse_error(err.to_string()).with_fragment(fragment)
    }
}
