//! Measurement type - a magnitude tagged with a unit of one category

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;
use mensura_core::{Number, NumberError};
use crate::convert::{self, COMPARISON_SCALE};
use crate::parse::{ParseError, Parser};
use crate::units::STANDARD;
use crate::{Category, ConversionError, Unit};

/// An immutable magnitude in a unit of category `C`
///
/// Measurements of different categories are different types, so adding a
/// mass to a length does not compile. Every operation returns a new value.
#[derive(Debug, Clone)]
pub struct Measurement<C: Category> {
    magnitude: Number,
    unit: Unit,
    category: PhantomData<C>,
}

impl<C: Category> Measurement<C> {
    /// Create a measurement, checking that `unit` belongs to `C`
    pub fn new(magnitude: Number, unit: Unit) -> Result<Self, ConversionError> {
        unit.ensure_category::<C>()?;
        Ok(Self::from_parts(magnitude, unit))
    }

    /// Caller guarantees `unit` belongs to `C`
    pub(crate) fn from_parts(magnitude: Number, unit: Unit) -> Self {
        Measurement { magnitude, unit, category: PhantomData }
    }

    pub fn magnitude(&self) -> &Number {
        &self.magnitude
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn into_parts(self) -> (Number, Unit) {
        (self.magnitude, self.unit)
    }

    /// Convert to another unit of the same category
    pub fn convert_to(&self, unit: &Unit) -> Result<Self, ConversionError> {
        convert::convert(self, unit)
    }

    /// Alias of [`Measurement::convert_to`]
    pub fn to(&self, unit: &Unit) -> Result<Self, ConversionError> {
        self.convert_to(unit)
    }

    /// Multiply by a dimensionless scalar
    pub fn scale(&self, k: &Number) -> Self {
        Self::from_parts(self.magnitude.mul(k), self.unit.clone())
    }

    /// Divide by a dimensionless scalar
    pub fn checked_div(&self, k: &Number) -> Result<Self, NumberError> {
        Ok(Self::from_parts(self.magnitude.checked_div(k)?, self.unit.clone()))
    }

    /// Raw product of the two magnitudes, units ignored
    ///
    /// Multiplying measurements changes dimension (length x length is an
    /// area), which no category covers, so only the scalar is exposed.
    pub fn magnitude_product<D: Category>(&self, other: &Measurement<D>) -> Number {
        self.magnitude.mul(&other.magnitude)
    }

    pub fn abs(&self) -> Self {
        Self::from_parts(self.magnitude.abs(), self.unit.clone())
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.magnitude.is_negative()
    }

    /// Magnitude in the base unit, rounded for comparison
    fn comparison_key(&self) -> Number {
        self.unit.to_base(&self.magnitude).round_to(COMPARISON_SCALE)
    }

    /// Magnitude of `other` expressed in this measurement's unit
    fn rescaled(&self, other: &Self) -> Number {
        convert::rescale(&other.magnitude, &other.unit, &self.unit)
    }
}

// ========== Arithmetic ==========

impl<C: Category> Add<&Measurement<C>> for &Measurement<C> {
    type Output = Measurement<C>;

    /// The left operand's unit is kept
    fn add(self, rhs: &Measurement<C>) -> Measurement<C> {
        let magnitude = self.magnitude.add(&self.rescaled(rhs));
        Measurement::from_parts(magnitude, self.unit.clone())
    }
}

impl<C: Category> Add for Measurement<C> {
    type Output = Measurement<C>;

    fn add(self, rhs: Measurement<C>) -> Measurement<C> {
        &self + &rhs
    }
}

impl<C: Category> Sub<&Measurement<C>> for &Measurement<C> {
    type Output = Measurement<C>;

    /// Not clamped: a negative result is a meaningful deficit
    fn sub(self, rhs: &Measurement<C>) -> Measurement<C> {
        let magnitude = self.magnitude.sub(&self.rescaled(rhs));
        Measurement::from_parts(magnitude, self.unit.clone())
    }
}

impl<C: Category> Sub for Measurement<C> {
    type Output = Measurement<C>;

    fn sub(self, rhs: Measurement<C>) -> Measurement<C> {
        &self - &rhs
    }
}

impl<C: Category> Mul<&Number> for &Measurement<C> {
    type Output = Measurement<C>;

    fn mul(self, k: &Number) -> Measurement<C> {
        self.scale(k)
    }
}

impl<C: Category> Mul<Number> for Measurement<C> {
    type Output = Measurement<C>;

    fn mul(self, k: Number) -> Measurement<C> {
        self.scale(&k)
    }
}

/// Scalar division is fallible, so `/` yields a `Result` and a zero divisor
/// comes back as [`NumberError::DivisionByZero`].
impl<C: Category> Div<&Number> for &Measurement<C> {
    type Output = Result<Measurement<C>, NumberError>;

    fn div(self, k: &Number) -> Self::Output {
        self.checked_div(k)
    }
}

impl<C: Category> Div<Number> for Measurement<C> {
    type Output = Result<Measurement<C>, NumberError>;

    fn div(self, k: Number) -> Self::Output {
        self.checked_div(&k)
    }
}

impl<C: Category> Neg for Measurement<C> {
    type Output = Measurement<C>;

    fn neg(self) -> Measurement<C> {
        Measurement::from_parts(self.magnitude.neg(), self.unit)
    }
}

// ========== Comparison ==========

/// Equal when both sides denote the same physical quantity, whatever the units
impl<C: Category> PartialEq for Measurement<C> {
    fn eq(&self, other: &Self) -> bool {
        self.comparison_key() == other.comparison_key()
    }
}

impl<C: Category> Eq for Measurement<C> {}

impl<C: Category> PartialOrd for Measurement<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders by physical quantity, not by the literal magnitude
impl<C: Category> Ord for Measurement<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.comparison_key().cmp(&other.comparison_key())
    }
}

// ========== Text ==========

impl<C: Category> fmt::Display for Measurement<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl<C: Category> FromStr for Measurement<C> {
    type Err = ParseError;

    /// Parse against the standard registry
    fn from_str(s: &str) -> Result<Self, ParseError> {
        Parser::new(&STANDARD).parse::<C>(s)
    }
}
