//! Serialization boundary
//!
//! A measurement crosses serde as `{ "magnitude": "<decimal>", "unit": "<symbol>" }`.
//! The magnitude is a string so it round-trips without float loss.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use mensura_core::{MensuraError, Number};
use crate::units::STANDARD;
use crate::{Category, Measurement, UnitRegistry};

/// Flat record of a measurement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub magnitude: String,
    pub unit: String,
}

impl<C: Category> From<&Measurement<C>> for MeasurementRecord {
    fn from(m: &Measurement<C>) -> Self {
        MeasurementRecord {
            magnitude: m.magnitude().to_string(),
            unit: m.unit().symbol().to_string(),
        }
    }
}

impl MeasurementRecord {
    /// Rebuild a measurement, resolving the unit text in `registry`
    pub fn resolve<C: Category>(&self, registry: &UnitRegistry) -> Result<Measurement<C>, MensuraError> {
        let magnitude = Number::from_str(&self.magnitude)?;
        Ok(registry.measurement::<C>(magnitude, &self.unit)?)
    }
}

impl<C: Category> Serialize for Measurement<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MeasurementRecord::from(self).serialize(serializer)
    }
}

impl<'de, C: Category> Deserialize<'de> for Measurement<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = MeasurementRecord::deserialize(deserializer)?;
        record.resolve::<C>(&STANDARD).map_err(de::Error::custom)
    }
}
