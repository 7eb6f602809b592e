//! Conversion engine
//!
//! Conversions go through the category's base unit:
//! `magnitude * factor(from) / factor(to)`, computed at the working
//! precision and then quantized to `CONVERSION_SCALE` fractional digits.

use mensura_core::Number;
use crate::units::STANDARD;
use crate::{Category, ConversionError, Measurement, Unit, UnitRegistry};

/// Fractional digits kept on converted magnitudes
pub const CONVERSION_SCALE: u32 = 30;

/// Fractional digits of the base-unit magnitude compared by `==` and `<`
pub const COMPARISON_SCALE: u32 = 20;

/// Express `magnitude` in `from` as a magnitude in `to`
///
/// Same-factor conversions return the magnitude untouched.
pub fn rescale(magnitude: &Number, from: &Unit, to: &Unit) -> Number {
    if from.factor() == to.factor() {
        return magnitude.clone();
    }
    to.from_base(&from.to_base(magnitude)).round_to(CONVERSION_SCALE)
}

/// Convert `m` into `to`, which must belong to the same category
pub(crate) fn convert<C: Category>(m: &Measurement<C>, to: &Unit) -> Result<Measurement<C>, ConversionError> {
    to.ensure_category::<C>()?;
    let magnitude = rescale(m.magnitude(), m.unit(), to);
    Ok(Measurement::from_parts(magnitude, to.clone()))
}

/// Conversion engine bound to one registry
#[derive(Debug, Clone, Copy)]
pub struct Converter<'r> {
    registry: &'r UnitRegistry,
}

impl<'r> Converter<'r> {
    pub fn new(registry: &'r UnitRegistry) -> Self {
        Converter { registry }
    }

    /// Converter over the standard units
    pub fn standard() -> Converter<'static> {
        Converter::new(&STANDARD)
    }

    pub fn registry(&self) -> &'r UnitRegistry {
        self.registry
    }

    /// Convert `m` into `to`
    ///
    /// Fails if `to` is of another category, or if either unit is not
    /// registered in this converter's registry.
    pub fn convert<C: Category>(&self, m: &Measurement<C>, to: &Unit) -> Result<Measurement<C>, ConversionError> {
        to.ensure_category::<C>()?;
        self.registry.factor_to_base(m.unit())?;
        self.registry.factor_to_base(to)?;
        convert(m, to)
    }

    /// Convert `m` into the unit named by `unit` (symbol, name or alias)
    pub fn convert_named<C: Category>(&self, m: &Measurement<C>, unit: &str) -> Result<Measurement<C>, ConversionError> {
        let to = self.registry.require::<C>(unit)?;
        self.convert(m, to)
    }

    /// Convert `m` into its category's base unit
    pub fn to_base<C: Category>(&self, m: &Measurement<C>) -> Result<Measurement<C>, ConversionError> {
        let base = self.registry.base_unit::<C>().ok_or_else(|| ConversionError::UnknownUnit {
            category: C::NAME.to_string(),
            symbol: "<base>".to_string(),
        })?;
        self.convert(m, base)
    }

    /// Re-express `m` in the unit of its measurement system that reads best
    ///
    /// Picks the unit giving the smallest magnitude that is still at least 1
    /// in absolute value. When every candidate is below 1, picks the one
    /// giving the largest magnitude. Zero keeps its unit.
    pub fn simplify<C: Category>(&self, m: &Measurement<C>) -> Measurement<C> {
        if m.is_zero() {
            return m.clone();
        }

        let one = Number::from_i64(1);
        let system = m.unit().system();
        let mut best: Option<(Number, Measurement<C>)> = None;
        let mut largest: Option<(Number, Measurement<C>)> = None;

        for unit in self.registry.units::<C>() {
            if unit.system() != system {
                continue;
            }
            let magnitude = rescale(m.magnitude(), m.unit(), unit);
            let size = magnitude.abs();
            let candidate = Measurement::from_parts(magnitude, unit.clone());

            if size >= one {
                if best.as_ref().map_or(true, |(b, _)| size < *b) {
                    best = Some((size, candidate));
                }
            } else if largest.as_ref().map_or(true, |(l, _)| size > *l) {
                largest = Some((size, candidate));
            }
        }

        best.or(largest).map_or_else(|| m.clone(), |(_, chosen)| chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Length, Mass, Volume};

    fn measure<C: Category>(value: &str, unit: &str) -> Measurement<C> {
        STANDARD.measurement::<C>(Number::from_str(value).unwrap(), unit).unwrap()
    }

    #[test]
    fn test_rescale_exact_factors() {
        let mi = STANDARD.lookup::<Length>("mi").unwrap();
        let km = STANDARD.lookup::<Length>("km").unwrap();
        assert_eq!(rescale(&Number::from_i64(1), mi, km), Number::from_str("1.609344").unwrap());
    }

    #[test]
    fn test_rescale_is_quantized() {
        let kg = STANDARD.lookup::<Mass>("kg").unwrap();
        let lb = STANDARD.lookup::<Mass>("lb").unwrap();
        let pounds = rescale(&Number::from_i64(1), kg, lb);
        assert_eq!(pounds, Number::from_str("2.204622621848775807229738013450").unwrap());
        assert_eq!(pounds.to_fixed(4), "2.2046");
    }

    #[test]
    fn test_rescale_same_unit_is_identity() {
        let g = STANDARD.lookup::<Mass>("g").unwrap();
        let third = Number::from_i64(1).checked_div(&Number::from_i64(3)).unwrap();
        assert_eq!(rescale(&third, g, g), third);
    }

    #[test]
    fn test_convert() {
        let converter = Converter::standard();
        let gal = measure::<Volume>("1", "gal");
        let liters = converter.convert_named(&gal, "l").unwrap();
        assert_eq!(liters.magnitude(), &Number::from_str("3.785411784").unwrap());
        assert_eq!(liters.unit().symbol(), "l");

        let cups = converter.convert_named(&measure::<Volume>("2", "cups"), "fl oz").unwrap();
        assert_eq!(cups.magnitude(), &Number::from_i64(16));
    }

    #[test]
    fn test_convert_rejects_other_category() {
        let converter = Converter::standard();
        let meter = STANDARD.lookup::<Length>("m").unwrap();
        let err = converter.convert(&measure::<Mass>("1", "kg"), meter).unwrap_err();
        assert!(matches!(err, ConversionError::CategoryMismatch { expected: "mass", found: "length", .. }));
    }

    #[test]
    fn test_convert_rejects_unregistered_unit() {
        let converter = Converter::standard();
        let furlong = Unit::new::<Length>("fur", "furlong", "furlongs", Number::from_scaled(201_168, 3));
        let err = converter.convert(&measure::<Length>("1", "mi"), &furlong).unwrap_err();
        assert!(matches!(err, ConversionError::UnknownUnit { .. }));

        // the free conversion only checks the category
        let furlongs = measure::<Length>("1", "mi").convert_to(&furlong).unwrap();
        assert_eq!(furlongs.magnitude(), &Number::from_i64(8));
    }

    #[test]
    fn test_convert_named_unknown() {
        let converter = Converter::standard();
        let err = converter.convert_named(&measure::<Mass>("1", "kg"), "furlongs").unwrap_err();
        assert_eq!(err, ConversionError::UnknownUnit { category: "mass".to_string(), symbol: "furlongs".to_string() });
    }

    #[test]
    fn test_round_trip_preserves_equality() {
        let converter = Converter::standard();
        let original = measure::<Mass>("1", "kg");
        let pounds = converter.convert_named(&original, "lb").unwrap();
        let back = converter.convert_named(&pounds, "kg").unwrap();
        assert_eq!(back, original);
        assert_eq!(back.to_text(), "1 kg");
    }

    fn assert_round_trips<C: Category>() {
        let units = STANDARD.units::<C>();
        for magnitude in ["1", "0.5", "2.75", "-3.125", "1234.5678", "1000000"] {
            for from in &units {
                let original = Measurement::<C>::new(Number::from_str(magnitude).unwrap(), (*from).clone()).unwrap();
                for to in &units {
                    let there = original.convert_to(to).unwrap();
                    let back = there.convert_to(from).unwrap();
                    assert_eq!(
                        back, original,
                        "{} {} -> {} -> {} came back as {}",
                        magnitude, from.symbol(), to.symbol(), from.symbol(), back.magnitude()
                    );
                }
            }
        }
    }

    #[test]
    fn test_round_trip_every_unit_pair() {
        assert_round_trips::<Mass>();
        assert_round_trips::<Length>();
        assert_round_trips::<Volume>();
    }

    #[test]
    fn test_to_base() {
        let converter = Converter::standard();
        let grams = converter.to_base(&measure::<Mass>("2", "lb")).unwrap();
        assert_eq!(grams.unit().symbol(), "g");
        assert_eq!(grams.magnitude(), &Number::from_str("907.18474").unwrap());
    }

    #[test]
    fn test_to_base_without_base_unit() {
        let mut reg = UnitRegistry::empty();
        reg.register(Unit::new::<Length>("km", "kilometer", "kilometers", Number::from_i64(1000)));
        let converter = Converter::new(&reg);
        let km = reg.measurement::<Length>(Number::from_i64(1), "km").unwrap();
        assert!(matches!(converter.to_base(&km), Err(ConversionError::UnknownUnit { .. })));
    }

    #[test]
    fn test_simplify_metric() {
        let converter = Converter::standard();
        let km = converter.simplify(&measure::<Length>("5000", "m"));
        assert_eq!(km.unit().symbol(), "km");
        assert_eq!(km.magnitude(), &Number::from_i64(5));

        let g = converter.simplify(&measure::<Mass>("0.001", "kg"));
        assert_eq!(g.unit().symbol(), "g");
        assert_eq!(g.magnitude(), &Number::from_i64(1));
    }

    #[test]
    fn test_simplify_stays_in_system() {
        let converter = Converter::standard();
        let ft = converter.simplify(&measure::<Length>("18", "in"));
        assert_eq!(ft.unit().symbol(), "ft");
        assert_eq!(ft.magnitude(), &Number::from_str("1.5").unwrap());

        let tbsp = converter.simplify(&measure::<Volume>("3", "tsp"));
        assert_eq!(tbsp.unit().symbol(), "tbsp");
    }

    #[test]
    fn test_simplify_below_one_and_zero() {
        let converter = Converter::standard();
        let tiny = converter.simplify(&measure::<Mass>("0.0001", "g"));
        assert_eq!(tiny.unit().symbol(), "mg");
        assert_eq!(tiny.magnitude(), &Number::from_str("0.1").unwrap());

        let zero = converter.simplify(&measure::<Length>("0", "km"));
        assert_eq!(zero.unit().symbol(), "km");
    }

    #[test]
    fn test_simplify_negative() {
        let converter = Converter::standard();
        let m = converter.simplify(&measure::<Length>("-2500", "mm"));
        assert_eq!(m.unit().symbol(), "m");
        assert_eq!(m.magnitude(), &Number::from_str("-2.5").unwrap());
    }
}
