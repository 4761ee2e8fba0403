//! Lenient number and text handling for request bodies and query strings.
//!
//! Browser forms send numbers either as JSON numbers or as numeric strings,
//! so body fields accept both and are normalised here before validation.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    pub fn decimal(&self, field: &str) -> Result<Decimal, DomainError> {
        match self {
            Numeric::Integer(n) => Ok(Decimal::from(*n)),
            Numeric::Float(f) => Decimal::try_from(*f).map_err(|_| not_a_number(field)),
            Numeric::Text(s) => parse_decimal(s, field),
        }
    }

    pub fn integer(&self, field: &str) -> Result<i32, DomainError> {
        match self {
            Numeric::Integer(n) => i32::try_from(*n).map_err(|_| not_an_integer(field)),
            Numeric::Float(f) if f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX) => {
                Ok(*f as i32)
            }
            Numeric::Float(_) => Err(not_an_integer(field)),
            Numeric::Text(s) => parse_integer(s, field),
        }
    }
}

pub fn decimal_opt(value: Option<&Numeric>, field: &str) -> Result<Option<Decimal>, DomainError> {
    value.map(|v| v.decimal(field)).transpose()
}

pub fn integer_opt(value: Option<&Numeric>, field: &str) -> Result<Option<i32>, DomainError> {
    value.map(|v| v.integer(field)).transpose()
}

pub fn parse_decimal(raw: &str, field: &str) -> Result<Decimal, DomainError> {
    Decimal::from_str(raw.trim()).map_err(|_| not_a_number(field))
}

pub fn parse_integer(raw: &str, field: &str) -> Result<i32, DomainError> {
    i32::from_str(raw.trim()).map_err(|_| not_an_integer(field))
}

/// Query-string variant: an empty parameter counts as absent.
pub fn query_decimal(raw: Option<&str>, field: &str) -> Result<Option<Decimal>, DomainError> {
    trimmed_str(raw).map(|s| parse_decimal(s, field)).transpose()
}

pub fn query_integer(raw: Option<&str>, field: &str) -> Result<Option<i32>, DomainError> {
    trimmed_str(raw).map(|s| parse_integer(s, field)).transpose()
}

pub fn trimmed(value: String) -> String {
    let t = value.trim();
    if t.len() == value.len() {
        value
    } else {
        t.to_owned()
    }
}

/// Trims and drops blank strings.
pub fn trimmed_opt(value: Option<String>) -> Option<String> {
    value.map(trimmed).filter(|v| !v.is_empty())
}

fn trimmed_str(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn not_a_number(field: &str) -> DomainError {
    DomainError::Validation(format!("{}: must be a number", field))
}

fn not_an_integer(field: &str) -> DomainError {
    DomainError::Validation(format!("{}: must be an integer", field))
}
