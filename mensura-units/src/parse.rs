//! Measurement parsing - text like "10.5 kg", "1 1/2 pounds" or "10 kg to lb"
//!
//! The grammar is a numeric literal followed by a unit:
//!
//! - Decimal: "10", "10.5", ".5", "-2"
//! - Mixed number: "1 1/2" (integer, space, `int/int`)
//! - Bare fraction: "1/2"
//! - Unit: any symbol, name or alias of the requested category, with or
//!   without whitespace before it ("10kg", "10   kg")
//!
//! Numbers and unit names are lexically disjoint since no unit starts with
//! a digit, so a token after the literal that starts with a digit and holds
//! a `/` is always read as a fraction.

use thiserror::Error;
use mensura_core::Number;
use crate::units::STANDARD;
use crate::{Category, Measurement, Unit, UnitRegistry};

/// Errors that can occur while parsing a measurement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Text does not start with a numeric literal
    #[error("expected a number, found {fragment:?}")]
    MissingNumber { fragment: String },

    #[error("malformed fraction {fragment:?}: {reason}")]
    MalformedFraction { fragment: String, reason: String },

    /// A number with nothing after it
    #[error("missing unit after {fragment:?}")]
    MissingUnit { fragment: String },

    #[error("unexpected text {fragment:?} after the unit")]
    TrailingText { fragment: String },

    #[error("unknown {category} unit {fragment:?}")]
    UnknownUnit { category: &'static str, fragment: String },

    /// Conversion expression without a recognizable target
    #[error("expected \"<measurement> to <unit>\", found {fragment:?}")]
    MalformedConversion { fragment: String },
}

impl ParseError {
    /// The offending part of the input
    pub fn fragment(&self) -> &str {
        match self {
            ParseError::MissingNumber { fragment }
            | ParseError::MalformedFraction { fragment, .. }
            | ParseError::MissingUnit { fragment }
            | ParseError::TrailingText { fragment }
            | ParseError::UnknownUnit { fragment, .. }
            | ParseError::MalformedConversion { fragment } => fragment,
        }
    }
}

/// Separators accepted between a measurement and its conversion target
const CONVERSION_SEPARATORS: [&str; 4] = ["->", "→", " to ", " in "];

/// Parser bound to one registry
#[derive(Debug, Clone, Copy)]
pub struct Parser<'r> {
    registry: &'r UnitRegistry,
}

/// Parse `text` as a measurement of category `C` against the standard units
pub fn parse<C: Category>(text: &str) -> Result<Measurement<C>, ParseError> {
    Parser::new(&STANDARD).parse(text)
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r UnitRegistry) -> Self {
        Parser { registry }
    }

    /// Parser over the standard units
    pub fn standard() -> Parser<'static> {
        Parser::new(&STANDARD)
    }

    /// Parse `text` as a measurement of category `C`
    pub fn parse<C: Category>(&self, text: &str) -> Result<Measurement<C>, ParseError> {
        let text = text.trim();
        let (magnitude, rest) = parse_magnitude(text)?;

        let unit_text = rest.trim();
        if unit_text.is_empty() {
            return Err(ParseError::MissingUnit { fragment: text.to_string() });
        }

        let unit = self.resolve_unit::<C>(unit_text)?;
        Ok(Measurement::from_parts(magnitude, unit.clone()))
    }

    /// Parse a conversion expression such as "10 kg to lb"
    ///
    /// Accepts `->`, `→`, ` to ` and ` in ` between the measurement and the
    /// target unit. Returns the measurement and the resolved target.
    pub fn parse_conversion<C: Category>(&self, text: &str) -> Result<(Measurement<C>, Unit), ParseError> {
        let malformed = || ParseError::MalformedConversion { fragment: text.trim().to_string() };

        // split at the last separator so "10 in to cm" keeps the inch
        let (source, target) = CONVERSION_SEPARATORS
            .iter()
            .find_map(|sep| text.rsplit_once(*sep))
            .ok_or_else(malformed)?;

        let target = target.trim();
        if target.is_empty() {
            return Err(malformed());
        }

        let measurement = self.parse::<C>(source)?;
        let unit = self.registry.lookup::<C>(target).ok_or_else(|| ParseError::UnknownUnit {
            category: C::NAME,
            fragment: target.to_string(),
        })?;

        Ok((measurement, unit.clone()))
    }

    /// Resolve unit text, preferring the longest run of leading words that
    /// names a unit ("fl oz" over "fl")
    fn resolve_unit<C: Category>(&self, unit_text: &str) -> Result<&'r Unit, ParseError> {
        let registry = self.registry;
        let words: Vec<&str> = unit_text.split_whitespace().collect();

        for take in (1..=words.len()).rev() {
            let candidate = words[..take].join(" ");
            if let Some(unit) = registry.lookup::<C>(&candidate) {
                if take == words.len() {
                    return Ok(unit);
                }
                return Err(ParseError::TrailingText { fragment: words[take..].join(" ") });
            }
        }

        Err(ParseError::UnknownUnit { category: C::NAME, fragment: unit_text.to_string() })
    }
}

/// Consume the numeric literal at the start of `text`
///
/// Returns the magnitude and the unconsumed remainder.
fn parse_magnitude(text: &str) -> Result<(Number, &str), ParseError> {
    let (literal, rest) = scan_literal(text);
    if !literal.bytes().any(|b| b.is_ascii_digit()) {
        return Err(ParseError::MissingNumber { fragment: first_word(text).to_string() });
    }

    // bare fraction, "1/2"
    if let Some(after_slash) = rest.strip_prefix('/') {
        let den_len = denominator_len(after_slash);
        let fragment = &text[..literal.len() + 1 + den_len];
        let value = fraction(literal, &after_slash[..den_len], fragment)?;
        return Ok((value, &after_slash[den_len..]));
    }

    let whole = Number::from_str(literal)
        .map_err(|_| ParseError::MissingNumber { fragment: first_word(text).to_string() })?;

    // mixed number, "1 1/2"
    let after_space = rest.trim_start();
    if after_space.len() < rest.len() {
        let token = first_word(after_space);
        let split = token.split_once('/').filter(|_| token.starts_with(|c: char| c.is_ascii_digit()));
        if let Some((numerator, after_slash)) = split {
            // the unit may follow the denominator directly, "1 1/2lb"
            let den_len = denominator_len(after_slash);
            let consumed = numerator.len() + 1 + den_len;
            let fragment = format!("{} {}", literal, &token[..consumed]);
            if literal.contains('.') {
                return Err(ParseError::MalformedFraction {
                    fragment,
                    reason: "whole part must be an integer".to_string(),
                });
            }
            let part = fraction(numerator, &after_slash[..den_len], &fragment)?;
            let value = if literal.starts_with('-') { whole.sub(&part) } else { whole.add(&part) };
            return Ok((value, &after_space[consumed..]));
        }
    }

    Ok((whole, rest))
}

/// Split off an optionally signed run of digits and dots
fn scan_literal(text: &str) -> (&str, &str) {
    let bytes = text.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    text.split_at(end)
}

/// Length of the denominator at the start of `after_slash`
///
/// That is its leading digits, or the whole word when it has none, so a
/// bad denominator is reported in full.
fn denominator_len(after_slash: &str) -> usize {
    let word_len = after_slash.find(char::is_whitespace).unwrap_or(after_slash.len());
    after_slash[..word_len]
        .find(|c: char| !c.is_ascii_digit())
        .filter(|&i| i > 0)
        .unwrap_or(word_len)
}

/// Evaluate `numerator/denominator`, both whole numbers
fn fraction(numerator: &str, denominator: &str, fragment: &str) -> Result<Number, ParseError> {
    let malformed = |reason: &str| ParseError::MalformedFraction {
        fragment: fragment.to_string(),
        reason: reason.to_string(),
    };
    let is_whole = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let unsigned = numerator
        .strip_prefix('-')
        .or_else(|| numerator.strip_prefix('+'))
        .unwrap_or(numerator);
    if !is_whole(unsigned) || !is_whole(denominator) {
        return Err(malformed("numerator and denominator must be whole numbers"));
    }

    let numerator = Number::from_str(numerator).map_err(|_| malformed("invalid numerator"))?;
    let denominator = Number::from_str(denominator).map_err(|_| malformed("invalid denominator"))?;
    numerator
        .checked_div(&denominator)
        .map_err(|_| malformed("zero denominator"))
}

fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}
