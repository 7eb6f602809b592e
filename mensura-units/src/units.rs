//! Unit registry - per-category unit tables with alias lookup
//!
//! Every factor is expressed against one base unit per category (gram,
//! meter, liter), so converting A -> B is always
//! `magnitude * factor(A) / factor(B)` and adding a unit is one registration.

use std::collections::HashMap;
use std::sync::LazyLock;
use mensura_core::Number;
use crate::{Category, ConversionError, Length, Mass, Measurement, Unit, Volume};

/// Process-wide read-only registry of the standard units
pub static STANDARD: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::standard);

/// Registry of known units
///
/// Built explicitly and then shared read-only. Parsers, formatters and
/// converters take a `&UnitRegistry`, so tests can use alternate tables.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: Vec<Unit>,
    /// category -> lowercased alias -> index into `units`
    aliases: HashMap<&'static str, HashMap<String, usize>>,
}

/// Normalize alias text for case-insensitive lookup
fn alias_key(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl UnitRegistry {
    /// A registry with no units
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard mass, length and volume units
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register_mass_units();
        registry.register_length_units();
        registry.register_volume_units();
        registry
    }

    /// Register a unit under its symbol, names and aliases
    ///
    /// A later unit whose alias collides with an earlier one in the same
    /// category takes over that alias.
    pub fn register(&mut self, unit: Unit) -> &mut Self {
        let index = self.units.len();
        let table = self.aliases.entry(unit.category()).or_default();
        for name in unit.names() {
            table.insert(alias_key(name), index);
        }
        self.units.push(unit);
        self
    }

    /// Look up a unit by symbol, name or alias (trimmed, case-insensitive)
    ///
    /// Returns `None` when nothing matches; callers decide if that is fatal.
    pub fn lookup_alias(&self, category: &str, text: &str) -> Option<&Unit> {
        self.aliases
            .get(category)
            .and_then(|table| table.get(&alias_key(text)))
            .map(|&index| &self.units[index])
    }

    /// Typed alias lookup for category `C`
    pub fn lookup<C: Category>(&self, text: &str) -> Option<&Unit> {
        self.lookup_alias(C::NAME, text)
    }

    /// Typed alias lookup that fails with `ConversionError::UnknownUnit`
    pub fn require<C: Category>(&self, text: &str) -> Result<&Unit, ConversionError> {
        self.lookup::<C>(text).ok_or_else(|| ConversionError::UnknownUnit {
            category: C::NAME.to_string(),
            symbol: text.trim().to_string(),
        })
    }

    /// Factor converting one `unit` into the base unit of its category
    ///
    /// Fails if the unit is not registered here.
    pub fn factor_to_base(&self, unit: &Unit) -> Result<&Number, ConversionError> {
        self.units
            .iter()
            .find(|u| *u == unit)
            .map(Unit::factor)
            .ok_or_else(|| ConversionError::UnknownUnit {
                category: unit.category().to_string(),
                symbol: unit.symbol().to_string(),
            })
    }

    /// Check that `unit` is registered here
    pub fn contains(&self, unit: &Unit) -> bool {
        self.units.iter().any(|u| u == unit)
    }

    /// The base unit of category `C`
    pub fn base_unit<C: Category>(&self) -> Option<&Unit> {
        self.units.iter().find(|u| u.belongs_to::<C>() && u.is_base())
    }

    /// All units of category `C`, in registration order
    pub fn units<C: Category>(&self) -> Vec<&Unit> {
        self.by_category(C::NAME)
    }

    /// All units of a category by runtime name, in registration order
    pub fn by_category(&self, category: &str) -> Vec<&Unit> {
        self.units.iter().filter(|u| u.category() == category).collect()
    }

    /// Build a measurement from a magnitude and unit text
    pub fn measurement<C: Category>(&self, magnitude: Number, unit: &str) -> Result<Measurement<C>, ConversionError> {
        let unit = self.require::<C>(unit)?;
        Measurement::new(magnitude, unit.clone())
    }

    fn register_mass_units(&mut self) {
        // Base: gram
        self.register(Unit::new::<Mass>("mg", "milligram", "milligrams", Number::from_scaled(1, 3)));
        self.register(Unit::new::<Mass>("g", "gram", "grams", Number::from_i64(1)).with_aliases(&["gm"]));
        self.register(Unit::new::<Mass>("kg", "kilogram", "kilograms", Number::from_i64(1000))
            .with_aliases(&["kilo", "kilos", "kilogramme", "kilogrammes"]));
        self.register(Unit::new::<Mass>("t", "tonne", "tonnes", Number::from_i64(1_000_000))
            .with_aliases(&["metric ton", "metric tons"]));

        // US customary / imperial, avoirdupois
        self.register(Unit::new::<Mass>("oz", "ounce", "ounces", Number::from_scaled(28_349_523_125, 9)).customary());
        self.register(Unit::new::<Mass>("lb", "pound", "pounds", Number::from_scaled(45_359_237, 5))
            .with_aliases(&["lbs", "#"])
            .customary());
        self.register(Unit::new::<Mass>("st", "stone", "stone", Number::from_scaled(635_029_318, 5))
            .with_aliases(&["stones"])
            .customary());
    }

    fn register_length_units(&mut self) {
        // Base: meter
        self.register(Unit::new::<Length>("mm", "millimeter", "millimeters", Number::from_scaled(1, 3))
            .with_aliases(&["millimetre", "millimetres"]));
        self.register(Unit::new::<Length>("cm", "centimeter", "centimeters", Number::from_scaled(1, 2))
            .with_aliases(&["centimetre", "centimetres"]));
        self.register(Unit::new::<Length>("m", "meter", "meters", Number::from_i64(1))
            .with_aliases(&["metre", "metres"]));
        self.register(Unit::new::<Length>("km", "kilometer", "kilometers", Number::from_i64(1000))
            .with_aliases(&["kilometre", "kilometres", "klick", "klicks"]));

        // US customary / imperial
        self.register(Unit::new::<Length>("in", "inch", "inches", Number::from_scaled(254, 4))
            .with_aliases(&["\""])
            .customary());
        self.register(Unit::new::<Length>("ft", "foot", "feet", Number::from_scaled(3048, 4))
            .with_aliases(&["'"])
            .customary());
        self.register(Unit::new::<Length>("yd", "yard", "yards", Number::from_scaled(9144, 4)).customary());
        self.register(Unit::new::<Length>("mi", "mile", "miles", Number::from_scaled(1_609_344, 3)).customary());
    }

    fn register_volume_units(&mut self) {
        // Base: liter
        self.register(Unit::new::<Volume>("ml", "milliliter", "milliliters", Number::from_scaled(1, 3))
            .with_aliases(&["millilitre", "millilitres", "cc"]));
        self.register(Unit::new::<Volume>("l", "liter", "liters", Number::from_i64(1))
            .with_aliases(&["litre", "litres"]));
        self.register(Unit::new::<Volume>("m3", "cubic meter", "cubic meters", Number::from_i64(1000))
            .with_aliases(&["m³", "cubic metre", "cubic metres"]));

        // US customary, all derived from the 231 in³ gallon
        self.register(Unit::new::<Volume>("tsp", "teaspoon", "teaspoons", Number::from_scaled(492_892_159_375, 14))
            .customary());
        self.register(Unit::new::<Volume>("tbsp", "tablespoon", "tablespoons", Number::from_scaled(1_478_676_478_125, 14))
            .with_aliases(&["tbs"])
            .customary());
        self.register(Unit::new::<Volume>("fl oz", "fluid ounce", "fluid ounces", Number::from_scaled(295_735_295_625, 13))
            .with_aliases(&["floz", "fl. oz."])
            .customary());
        self.register(Unit::new::<Volume>("cup", "cup", "cups", Number::from_scaled(2_365_882_365, 10))
            .with_aliases(&["c"])
            .customary());
        self.register(Unit::new::<Volume>("pt", "pint", "pints", Number::from_scaled(473_176_473, 9)).customary());
        self.register(Unit::new::<Volume>("qt", "quart", "quarts", Number::from_scaled(946_352_946, 9)).customary());
        self.register(Unit::new::<Volume>("gal", "gallon", "gallons", Number::from_scaled(3_785_411_784, 9)).customary());
    }
}
