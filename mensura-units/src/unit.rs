//! Unit representation with conversion factors

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use serde::{Serialize, Serializer, Deserialize};
use thiserror::Error;
use mensura_core::Number;
use crate::Category;

/// Measurement system a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum System {
    Metric,
    /// US customary / imperial
    Customary,
}

#[derive(Debug, Clone)]
struct UnitData {
    symbol: String,
    singular: String,
    plural: String,
    aliases: Vec<String>,
    category: &'static str,
    /// `1 unit = factor * base unit`
    factor: Number,
    system: System,
}

/// A unit of one category with its factor to the category's base unit
///
/// Units are immutable once registered. Cloning is cheap: clones share the
/// same definition, so measurements hold units without owning them.
#[derive(Debug, Clone)]
pub struct Unit {
    data: Arc<UnitData>,
}

impl Unit {
    /// Create a metric unit of category `C`
    ///
    /// # Panics
    ///
    /// Panics if `factor` is not strictly positive. Units are static
    /// definitions, so a bad factor is a programming error.
    pub fn new<C: Category>(symbol: &str, singular: &str, plural: &str, factor: Number) -> Self {
        assert!(
            factor.is_positive(),
            "unit {} must have a positive factor, got {}",
            symbol,
            factor
        );
        Unit {
            data: Arc::new(UnitData {
                symbol: symbol.to_string(),
                singular: singular.to_string(),
                plural: plural.to_string(),
                aliases: Vec::new(),
                category: C::NAME,
                factor,
                system: System::Metric,
            }),
        }
    }

    /// Builder: extra parse aliases besides symbol and names
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        let data = Arc::make_mut(&mut self.data);
        data.aliases.extend(aliases.iter().map(|a| a.to_string()));
        self
    }

    /// Builder: mark as a US customary unit
    pub fn customary(mut self) -> Self {
        Arc::make_mut(&mut self.data).system = System::Customary;
        self
    }

    /// Canonical symbol, e.g. "kg"
    pub fn symbol(&self) -> &str {
        &self.data.symbol
    }

    /// Singular display name, e.g. "kilogram"
    pub fn singular(&self) -> &str {
        &self.data.singular
    }

    /// Plural display name, e.g. "kilograms"
    pub fn plural(&self) -> &str {
        &self.data.plural
    }

    /// Additional parse aliases
    pub fn aliases(&self) -> &[String] {
        &self.data.aliases
    }

    /// Every text form that resolves to this unit when parsing
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [self.symbol(), self.singular(), self.plural()]
            .into_iter()
            .chain(self.data.aliases.iter().map(String::as_str))
    }

    pub fn category(&self) -> &'static str {
        self.data.category
    }

    pub fn factor(&self) -> &Number {
        &self.data.factor
    }

    pub fn system(&self) -> System {
        self.data.system
    }

    /// Check if this is its category's base unit
    pub fn is_base(&self) -> bool {
        self.data.factor == Number::from_i64(1)
    }

    /// Check if this unit belongs to category `C`
    pub fn belongs_to<C: Category>(&self) -> bool {
        self.data.category == C::NAME
    }

    /// Fail unless this unit belongs to category `C`
    pub fn ensure_category<C: Category>(&self) -> Result<(), ConversionError> {
        if self.belongs_to::<C>() {
            Ok(())
        } else {
            Err(ConversionError::CategoryMismatch {
                expected: C::NAME,
                found: self.category(),
                unit: self.symbol().to_string(),
            })
        }
    }

    /// Convert a magnitude in this unit to the base unit
    pub fn to_base(&self, value: &Number) -> Number {
        value.mul(&self.data.factor)
    }

    /// Convert a magnitude in the base unit to this unit
    pub fn from_base(&self, value: &Number) -> Number {
        match value.checked_div(&self.data.factor) {
            Ok(v) => v,
            Err(_) => unreachable!("unit factors are positive"),
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.data.category == other.data.category && self.data.symbol == other.data.symbol
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.category.hash(state);
        self.data.symbol.hash(state);
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data.symbol)
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

/// Errors that can occur during unit conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// Unit belongs to a different category than the one required
    #[error("cannot use {found} unit {unit:?} as {expected}")]
    CategoryMismatch {
        expected: &'static str,
        found: &'static str,
        unit: String,
    },
    /// Unit is not registered for the category
    #[error("unknown {category} unit {symbol:?}")]
    UnknownUnit {
        category: String,
        symbol: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Length, Mass};

    fn meter() -> Unit {
        Unit::new::<Length>("m", "meter", "meters", Number::from_i64(1))
    }

    fn kilometer() -> Unit {
        Unit::new::<Length>("km", "kilometer", "kilometers", Number::from_i64(1000))
    }

    fn pound() -> Unit {
        Unit::new::<Mass>("lb", "pound", "pounds", Number::from_scaled(45_359_237, 5))
            .with_aliases(&["lbs"])
            .customary()
    }

    #[test]
    fn test_base_unit() {
        assert!(meter().is_base());
        assert!(!kilometer().is_base());
    }

    #[test]
    fn test_metadata() {
        let lb = pound();
        assert_eq!(lb.symbol(), "lb");
        assert_eq!(lb.singular(), "pound");
        assert_eq!(lb.plural(), "pounds");
        assert_eq!(lb.category(), "mass");
        assert_eq!(lb.system(), System::Customary);
        assert_eq!(lb.names().collect::<Vec<_>>(), vec!["lb", "pound", "pounds", "lbs"]);
    }

    #[test]
    fn test_category_membership() {
        assert!(meter().belongs_to::<Length>());
        assert!(!meter().belongs_to::<Mass>());
        assert!(meter().ensure_category::<Length>().is_ok());

        let err = meter().ensure_category::<Mass>().unwrap_err();
        assert_eq!(
            err,
            ConversionError::CategoryMismatch { expected: "mass", found: "length", unit: "m".to_string() }
        );
    }

    #[test]
    fn test_to_and_from_base() {
        let km = kilometer();
        assert_eq!(km.to_base(&Number::from_i64(5)), Number::from_i64(5000));
        assert_eq!(km.from_base(&Number::from_i64(5000)), Number::from_i64(5));
    }

    #[test]
    fn test_equality_by_category_and_symbol() {
        let a = meter();
        let b = Unit::new::<Length>("m", "metre", "metres", Number::from_i64(1));
        let c = Unit::new::<Mass>("m", "mystery", "mysteries", Number::from_i64(1));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    #[should_panic(expected = "positive factor")]
    fn test_zero_factor_rejected() {
        Unit::new::<Length>("z", "zero", "zeros", Number::from_i64(0));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", kilometer()), "km");
    }
}
