//! Request handling for the line protocol
//!
//! Each request names an `op` and, for measurement ops, a `category`.
//! Measurements travel as text ("1 1/2 lb") and come back as
//! `{ magnitude, unit, text }`.

use std::cmp::Ordering;
use mensura_core::{MensuraError, Number, ValidationError};
use mensura_units::{
    Category, Converter, Formatter, Length, Mass, Measurement, ParseError, Parser, UnitStyle, Volume,
    CATEGORY_NAMES, STANDARD,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use crate::config::{Config, MAX_PRECISION};

#[derive(Debug, Default, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub id: Option<JsonValue>,
    pub op: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Measurement text, or a conversion expression for `evaluate`
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    /// Target unit for `convert`
    #[serde(default)]
    pub to: Option<String>,
    /// Scalar for `scale` and `divide`, e.g. "2" or "1/3"
    #[serde(default)]
    pub factor: Option<String>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub style: Option<UnitStyle>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<MensuraError>,
}

impl Response {
    pub fn ok(id: Option<JsonValue>, result: JsonValue) -> Self {
        Response { id, result: Some(result), error: None }
    }

    pub fn err(id: Option<JsonValue>, error: MensuraError) -> Self {
        Response { id, result: None, error: Some(error) }
    }
}

/// Executes requests against the standard registry
#[derive(Debug, Clone)]
pub struct Handler {
    config: Config,
    parser: Parser<'static>,
    converter: Converter<'static>,
}

impl Handler {
    pub fn new(config: Config) -> Self {
        Handler {
            config,
            parser: Parser::new(&STANDARD),
            converter: Converter::new(&STANDARD),
        }
    }

    pub fn handle(&self, request: &Request) -> Response {
        match self.dispatch(request) {
            Ok(result) => Response::ok(request.id.clone(), result),
            Err(error) => Response::err(request.id.clone(), error),
        }
    }

    fn dispatch(&self, request: &Request) -> Result<JsonValue, MensuraError> {
        match request.op.as_str() {
            "ping" => Ok(json!({})),
            "units" => self.list_units(request),
            "evaluate" => {
                let text = required(&request.text, "text")?;
                Ok(json!({ "text": self.evaluate(text)? }))
            }
            _ => {
                let category = category_of(request)?;
                if category == Mass::NAME {
                    self.run::<Mass>(request)
                } else if category == Length::NAME {
                    self.run::<Length>(request)
                } else if category == Volume::NAME {
                    self.run::<Volume>(request)
                } else {
                    Err(ValidationError::new("category", format!("unsupported category {:?}", category)).into())
                }
            }
        }
    }

    /// Run a measurement op for category `C`
    fn run<C: Category>(&self, request: &Request) -> Result<JsonValue, MensuraError> {
        let formatter = self.formatter(request)?;
        let measure = |field: &Option<String>, name: &str| -> Result<Measurement<C>, MensuraError> {
            Ok(self.parser.parse::<C>(required(field, name)?)?)
        };

        match request.op.as_str() {
            "parse" => Ok(render(&measure(&request.text, "text")?, &formatter)),
            "convert" => {
                let m = measure(&request.text, "text")?;
                let converted = self.converter.convert_named(&m, required(&request.to, "to")?)?;
                Ok(render(&converted, &formatter))
            }
            "add" => {
                let sum = measure(&request.left, "left")? + measure(&request.right, "right")?;
                Ok(render(&sum, &formatter))
            }
            "subtract" => {
                let difference = measure(&request.left, "left")? - measure(&request.right, "right")?;
                Ok(render(&difference, &formatter))
            }
            "compare" => {
                let left = measure(&request.left, "left")?;
                let right = measure(&request.right, "right")?;
                let ordering = match left.cmp(&right) {
                    Ordering::Less => "less",
                    Ordering::Equal => "equal",
                    Ordering::Greater => "greater",
                };
                Ok(json!({ "ordering": ordering, "equal": left == right }))
            }
            "scale" => {
                let m = measure(&request.text, "text")?;
                Ok(render(&m.scale(&scalar(request)?), &formatter))
            }
            "divide" => {
                let m = measure(&request.text, "text")?;
                Ok(render(&m.checked_div(&scalar(request)?)?, &formatter))
            }
            "format" => Ok(json!({ "text": formatter.format(&measure(&request.text, "text")?) })),
            "humanize" => Ok(json!({ "text": measure(&request.text, "text")?.humanize() })),
            "simplify" => Ok(render(&self.converter.simplify(&measure(&request.text, "text")?), &formatter)),
            other => Err(ValidationError::new("op", format!("unknown operation {:?}", other)).into()),
        }
    }

    /// Evaluate "10 kg to lb" or "10 kg", trying each category in turn
    pub fn evaluate(&self, expression: &str) -> Result<String, MensuraError> {
        let attempts: [fn(&Self, &str) -> Result<String, ParseError>; 3] =
            [Self::evaluate_in::<Mass>, Self::evaluate_in::<Length>, Self::evaluate_in::<Volume>];

        let mut last_error = None;
        for attempt in attempts {
            match attempt(self, expression) {
                Ok(text) => return Ok(text),
                // another category may know the unit
                Err(e @ ParseError::UnknownUnit { .. }) => last_error = Some(e),
                Err(e) => return Err(e.into()),
            }
        }

        Err(match last_error {
            Some(e) => MensuraError::from(e)
                .with_suggestion(format!("Known categories: {}", CATEGORY_NAMES.join(", "))),
            None => MensuraError::internal("no category attempted"),
        })
    }

    fn evaluate_in<C: Category>(&self, expression: &str) -> Result<String, ParseError> {
        let formatter = self.config.formatter();
        match self.parser.parse_conversion::<C>(expression) {
            Ok((m, target)) => {
                let converted = m.convert_to(&target).map_err(|_| ParseError::UnknownUnit {
                    category: C::NAME,
                    fragment: target.symbol().to_string(),
                })?;
                Ok(formatter.format(&converted))
            }
            Err(ParseError::MalformedConversion { .. }) => {
                let m = self.parser.parse::<C>(expression)?;
                Ok(formatter.format(&m))
            }
            Err(e) => Err(e),
        }
    }

    fn list_units(&self, request: &Request) -> Result<JsonValue, MensuraError> {
        let categories: Vec<&str> = match request.category {
            Some(_) => vec![category_of(request)?],
            None => CATEGORY_NAMES.to_vec(),
        };

        let mut listing = serde_json::Map::new();
        for category in categories {
            let units: Vec<JsonValue> = STANDARD
                .by_category(category)
                .into_iter()
                .map(|u| {
                    json!({
                        "symbol": u.symbol(),
                        "singular": u.singular(),
                        "plural": u.plural(),
                        "aliases": u.aliases(),
                        "system": u.system(),
                        "factor": u.factor(),
                        "base": u.is_base(),
                    })
                })
                .collect();
            listing.insert(category.to_string(), JsonValue::Array(units));
        }
        Ok(JsonValue::Object(listing))
    }

    /// Configured formatter with per-request overrides
    fn formatter(&self, request: &Request) -> Result<Formatter, MensuraError> {
        let mut formatter = self.config.formatter();
        if let Some(places) = request.precision {
            if places > MAX_PRECISION {
                return Err(ValidationError::new("precision", format!("must be at most {}", MAX_PRECISION)).into());
            }
            formatter = formatter.with_precision(places);
        }
        if let Some(style) = request.style {
            formatter = formatter.with_style(style);
        }
        Ok(formatter)
    }
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, ValidationError> {
    field.as_deref().ok_or_else(|| ValidationError::required(name))
}

fn category_of(request: &Request) -> Result<&'static str, ValidationError> {
    let name = required(&request.category, "category")?;
    CATEGORY_NAMES
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| {
            ValidationError::new("category", format!("unknown category {:?}, expected one of {}", name, CATEGORY_NAMES.join(", ")))
        })
}

fn scalar(request: &Request) -> Result<Number, MensuraError> {
    Ok(Number::from_str(required(&request.factor, "factor")?)?)
}

fn render<C: Category>(m: &Measurement<C>, formatter: &Formatter) -> JsonValue {
    json!({
        "magnitude": m.magnitude(),
        "unit": m.unit(),
        "text": formatter.format(m),
    })
}
