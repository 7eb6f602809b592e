//! Mensura Core - Fundamental types
//!
//! This crate provides the core types used throughout Mensura:
//! - `Number`: Arbitrary precision decimal numbers
//! - `MensuraError`: Structured errors for adapter boundaries
//! - `ValidationError`: Business-rule failures raised by adapters

mod number;
mod error;

pub use number::{Number, NumberError, MAX_EXPONENT, WORK_PRECISION};
pub use error::{MensuraError, ValidationError, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{MensuraError, Number, NumberError};
    pub use crate::error::codes;
}

#[cfg(test)]
mod tests {
    use super::*;

    mod number_tests {
        use super::*;

        #[test]
        fn test_from_i64() {
            let n = Number::from_i64(42);
            assert_eq!(n.to_string(), "42");
        }

        #[test]
        fn test_from_str_integer() {
            let n = Number::from_str("123").unwrap();
            assert_eq!(n, Number::from_i64(123));
        }

        #[test]
        fn test_from_str_decimal() {
            let n = Number::from_str("3.14").unwrap();
            assert_eq!(n, Number::from_scaled(314, 2));
        }

        #[test]
        fn test_from_str_leading_dot_and_sign() {
            assert_eq!(Number::from_str(".5").unwrap(), Number::from_scaled(5, 1));
            assert_eq!(Number::from_str("-2.5").unwrap(), Number::from_scaled(-25, 1));
            assert_eq!(Number::from_str("+7").unwrap(), Number::from_i64(7));
        }

        #[test]
        fn test_from_str_fraction() {
            let n = Number::from_str("3/4").unwrap();
            assert_eq!(n, Number::from_scaled(75, 2));
        }

        #[test]
        fn test_from_str_fraction_zero_denominator() {
            assert_eq!(Number::from_str("1/0"), Err(NumberError::DivisionByZero));
        }

        #[test]
        fn test_from_str_scientific() {
            assert_eq!(Number::from_str("1.5e2").unwrap(), Number::from_i64(150));
            assert_eq!(Number::from_str("25e-1").unwrap(), Number::from_scaled(25, 1));
        }

        #[test]
        fn test_from_str_rejects_garbage() {
            assert!(Number::from_str("abc").is_err());
            assert!(Number::from_str("").is_err());
            assert!(Number::from_str("1.2.3").is_err());
            assert!(Number::from_str("inf").is_err());
            assert!(Number::from_str("NaN").is_err());
        }

        #[test]
        fn test_from_str_rejects_huge_exponents() {
            assert!(matches!(Number::from_str("1e-4294967297"), Err(NumberError::ParseError(_))));
            assert!(matches!(Number::from_str("1e99999"), Err(NumberError::ParseError(_))));
            assert!(Number::from_str("1e99999999999999999999").is_err());
            assert!(Number::from_str("1/1e-4294967297").is_err());

            // The bound applies after fractional digits are folded in
            assert!(Number::from_str("1e350").is_ok());
            assert!(Number::from_str("1e-350").is_ok());
            assert!(Number::from_str("0.5e-350").is_err());
            assert_eq!(MAX_EXPONENT, 350);
        }

        #[test]
        fn test_long_literals_keep_every_digit() {
            let text = "1234567890123456789012345678901234567890.123456789012345";
            let n = Number::from_str(text).unwrap();
            assert_eq!(n.to_string(), text);
            assert_eq!(n.neg().to_string(), format!("-{}", text));
            assert_ne!(n, Number::from_str("1234567890123456789012345678901234567890.12345678901234").unwrap());
        }

        #[test]
        fn test_from_scaled() {
            let lb = Number::from_scaled(45_359_237, 5);
            assert_eq!(lb.to_string(), "453.59237");
        }

        #[test]
        fn test_arithmetic() {
            let a = Number::from_i64(10);
            let b = Number::from_i64(32);
            assert_eq!(a.add(&b), Number::from_i64(42));
            assert_eq!(b.sub(&a), Number::from_i64(22));
            assert_eq!(a.mul(&b), Number::from_i64(320));
            assert_eq!(b.checked_div(&a).unwrap(), Number::from_scaled(32, 1));
        }

        #[test]
        fn test_div_by_zero() {
            let a = Number::from_i64(42);
            assert_eq!(a.checked_div(&Number::from_i64(0)), Err(NumberError::DivisionByZero));
        }

        #[test]
        fn test_non_terminating_division_is_carried() {
            let third = Number::from_i64(1).checked_div(&Number::from_i64(3)).unwrap();
            assert_eq!(third.to_fixed(10), "0.3333333333");
            assert!(!third.mul(&Number::from_i64(3)).is_zero());
        }

        #[test]
        fn test_round_to_half_away_from_zero() {
            assert_eq!(Number::from_str("2.345").unwrap().round_to(2), Number::from_str("2.35").unwrap());
            assert_eq!(Number::from_str("-2.345").unwrap().round_to(2), Number::from_str("-2.35").unwrap());
            assert_eq!(Number::from_str("2.344").unwrap().round_to(2), Number::from_str("2.34").unwrap());
            assert_eq!(Number::from_str("0.5").unwrap().round_to(0), Number::from_i64(1));
            assert_eq!(Number::from_str("7").unwrap().round_to(3), Number::from_i64(7));
        }

        #[test]
        fn test_to_fixed() {
            assert_eq!(Number::from_str("5.5").unwrap().to_fixed(2), "5.50");
            assert_eq!(Number::from_i64(6).to_fixed(0), "6");
            assert_eq!(Number::from_str("0.004").unwrap().to_fixed(2), "0.00");
            assert_eq!(Number::from_str("-0.05").unwrap().to_fixed(1), "-0.1");
            assert_eq!(Number::from_str("0.0625").unwrap().to_fixed(3), "0.063");
            assert_eq!(Number::from_i64(1200).to_fixed(1), "1200.0");
        }

        #[test]
        fn test_to_plain() {
            assert_eq!(Number::from_str("5.50").unwrap().to_plain(4), "5.5");
            assert_eq!(Number::from_str("9.5359237").unwrap().to_plain(4), "9.5359");
            assert_eq!(Number::from_i64(10).to_plain(4), "10");
        }

        #[test]
        fn test_display_is_exact() {
            assert_eq!(Number::from_str("0.028349523125").unwrap().to_string(), "0.028349523125");
            assert_eq!(Number::from_str("1e3").unwrap().to_string(), "1000");
            assert_eq!(Number::from_str("-12.5").unwrap().to_string(), "-12.5");
        }

        #[test]
        fn test_predicates() {
            assert!(Number::from_i64(0).is_zero());
            assert!(Number::from_i64(-5).is_negative());
            assert!(Number::from_i64(5).is_positive());
            assert!(!Number::from_i64(0).is_positive());
            assert!(Number::from_str("2.000").unwrap().is_integer());
            assert!(!Number::from_str("2.5").unwrap().is_integer());
            assert_eq!(Number::from_i64(-42).abs(), Number::from_i64(42));
            assert_eq!(Number::from_i64(42).neg(), Number::from_i64(-42));
        }

        #[test]
        fn test_ordering() {
            let a = Number::from_str("0.1").unwrap();
            let b = Number::from_str("0.10").unwrap();
            let c = Number::from_str("0.2").unwrap();
            assert_eq!(a, b);
            assert!(a < c);
        }

        #[test]
        fn test_serde_round_trip_as_string() {
            let n = Number::from_str("453.59237").unwrap();
            let json = serde_json::to_string(&n).unwrap();
            assert_eq!(json, "\"453.59237\"");
            let back: Number = serde_json::from_str(&json).unwrap();
            assert_eq!(back, n);
        }
    }

    mod error_tests {
        use super::*;

        #[test]
        fn test_error_construction() {
            let err = MensuraError::div_zero();
            assert_eq!(err.code, codes::DIV_ZERO);

            let built = [
                MensuraError::parse_error("x").code,
                MensuraError::conversion_error("x").code,
                MensuraError::validation_error("x").code,
                MensuraError::div_zero().code,
                MensuraError::internal("x").code,
            ];
            assert_eq!(
                built,
                [codes::PARSE_ERROR, codes::CONVERSION_ERROR, codes::VALIDATION_ERROR, codes::DIV_ZERO, codes::INTERNAL]
            );
        }

        #[test]
        fn test_from_number_error() {
            let err: MensuraError = NumberError::ParseError("x1".to_string()).into();
            assert_eq!(err.code, codes::PARSE_ERROR);
            assert_eq!(err.fragment.as_deref(), Some("x1"));
        }

        #[test]
        fn test_from_validation_error() {
            let err: MensuraError = ValidationError::required("category").into();
            assert_eq!(err.code, codes::VALIDATION_ERROR);
            assert!(err.message.contains("category: is required"));
        }

        #[test]
        fn test_error_display() {
            let err = MensuraError::parse_error("unexpected token");
            let display = format!("{}", err);
            assert!(display.contains("PARSE_ERROR"));
        }
    }
}
