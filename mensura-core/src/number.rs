//! Arbitrary precision numbers using dashu
//!
//! Uses dashu-float (DBig) for decimal arithmetic. Decimal literals such as
//! conversion factors are held exactly, so repeated conversions never pick
//! up binary floating-point drift. Divisions are carried to a fixed working
//! precision of significant digits and rounded half away from zero.

use dashu_float::ops::Abs;
use dashu_float::DBig;
use dashu_int::IBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,
}

/// Working precision for calculations (significant decimal digits)
pub const WORK_PRECISION: usize = 50;

/// Largest decimal exponent a parsed literal may carry, after folding in
/// its fractional digits. Rendering needs `10^|exponent|`, so unbounded
/// exponents would let a short literal exhaust memory.
pub const MAX_EXPONENT: usize = WORK_PRECISION + 300;

/// Arbitrary precision decimal number
///
/// Built on dashu-float's DBig. Always finite: there is no NaN or infinity,
/// and every fallible operation returns a `Result` instead of panicking.
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    // ========== Construction ==========

    /// Ensure a DBig has adequate precision for calculations
    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(WORK_PRECISION).value()
    }

    /// Build from `significand * 10^exponent` without losing digits
    ///
    /// Precision is the larger of the significand's digit count and
    /// WORK_PRECISION, so long literals are kept exactly.
    fn from_parts(significand: IBig, exponent: isize) -> Self {
        let digits = significand.to_string().trim_start_matches('-').len();
        let inner = DBig::from_parts(significand, exponent)
            .with_precision(digits.max(WORK_PRECISION))
            .value();
        Self { inner }
    }

    /// Create from string representation
    /// Supports: "123", "3.14", ".5", "-42", "1.5e10", "1/3"
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();

        // Handle rational format "a/b"
        if let Some((num, den)) = s.split_once('/') {
            let num = Self::parse_decimal(num.trim())?;
            let den = Self::parse_decimal(den.trim())?;
            return num.checked_div(&den);
        }

        Self::parse_decimal(s)
    }

    /// Parse a plain or scientific decimal literal exactly
    fn parse_decimal(s: &str) -> Result<Self, NumberError> {
        let invalid = || NumberError::ParseError(s.to_string());

        let (negative, body) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };

        let (mantissa, exponent) = match body.split_once(|c| c == 'e' || c == 'E') {
            Some((m, e)) => (m, e.parse::<isize>().map_err(|_| invalid())?),
            None => (body, 0),
        };

        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(invalid());
        }

        let mut significand: IBig = format!("{}{}", int_part, frac_part)
            .parse()
            .map_err(|_| invalid())?;
        if negative {
            significand = -significand;
        }

        let exponent = isize::try_from(frac_part.len())
            .ok()
            .and_then(|frac_len| exponent.checked_sub(frac_len))
            .filter(|e| e.unsigned_abs() <= MAX_EXPONENT)
            .ok_or_else(invalid)?;
        Ok(Self::from_parts(significand, exponent))
    }

    /// Create from i64 with working precision
    pub fn from_i64(n: i64) -> Self {
        Self { inner: Self::with_work_precision(DBig::from(n)) }
    }

    /// Create `significand / 10^scale` exactly
    ///
    /// `Number::from_scaled(45_359_237, 5)` is 453.59237.
    pub fn from_scaled(significand: i64, scale: u32) -> Self {
        Self::from_parts(IBig::from(significand), -(scale as isize))
    }

    // ========== Predicates ==========

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    /// Check if negative
    pub fn is_negative(&self) -> bool {
        self.inner < DBig::ZERO
    }

    /// Check if strictly positive
    pub fn is_positive(&self) -> bool {
        self.inner > DBig::ZERO
    }

    /// Check if the value has no fractional part
    pub fn is_integer(&self) -> bool {
        let (_, exponent) = self.inner.clone().into_repr().into_parts();
        exponent >= 0 || self.round_to(0) == *self
    }

    // ========== Basic Arithmetic ==========

    /// Addition
    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    /// Subtraction
    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    /// Multiplication
    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(Self { inner: &self.inner / &other.inner })
        }
    }

    /// Negation
    pub fn neg(&self) -> Self {
        Self { inner: -&self.inner }
    }

    /// Absolute value
    pub fn abs(&self) -> Self {
        Self { inner: Abs::abs(self.inner.clone()) }
    }

    // ========== Rounding ==========

    /// Round to `places` fractional digits, ties away from zero
    ///
    /// Values that already fit are returned unchanged.
    pub fn round_to(&self, places: u32) -> Self {
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let target = -(places as isize);
        if exponent >= target {
            return self.clone();
        }

        let shift = (target - exponent) as usize;
        let divisor = IBig::from(10u8).pow(shift);
        let quotient = &significand / &divisor;
        let remainder = &significand % &divisor;
        let remainder = if remainder < IBig::ZERO { -remainder } else { remainder };

        let rounded = if remainder * IBig::from(2u8) >= divisor {
            if significand < IBig::ZERO {
                quotient - IBig::ONE
            } else {
                quotient + IBig::ONE
            }
        } else {
            quotient
        };

        Self::from_parts(rounded, target)
    }

    // ========== Display ==========

    /// Render with exactly `places` fractional digits
    pub fn to_fixed(&self, places: u32) -> String {
        let (significand, exponent) = self.round_to(places).inner.into_repr().into_parts();
        let target = -(places as isize);
        let scaled = significand * IBig::from(10u8).pow((exponent - target).max(0) as usize);

        let negative = scaled < IBig::ZERO;
        let mut digits = if negative { (-scaled).to_string() } else { scaled.to_string() };

        let places = places as usize;
        if digits.len() <= places {
            digits = format!("{}{}", "0".repeat(places + 1 - digits.len()), digits);
        }
        let (int_part, frac_part) = digits.split_at(digits.len() - places);

        let mut out = String::with_capacity(digits.len() + 2);
        if negative {
            out.push('-');
        }
        out.push_str(int_part);
        if places > 0 {
            out.push('.');
            out.push_str(frac_part);
        }
        out
    }

    /// Render rounded to at most `max_places` fractional digits, trailing zeros trimmed
    pub fn to_plain(&self, max_places: u32) -> String {
        let fixed = self.to_fixed(max_places);
        if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            fixed
        }
    }
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    /// Exact decimal rendering, never in exponent notation
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (_, exponent) = self.inner.clone().into_repr().into_parts();
        let places = if exponent < 0 {
            u32::try_from(exponent.unsigned_abs()).map_err(|_| std::fmt::Error)?
        } else {
            0
        };
        write!(f, "{}", self.to_plain(places))
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // DBig implements PartialOrd, use it and treat None as Equal
        self.inner.partial_cmp(&other.inner).unwrap_or(std::cmp::Ordering::Equal)
    }
}
