//! Serialization helpers for decimal values.
//!
//! Values are accumulated as [`BigDecimal`] and only converted to JSON numbers
//! when a payload is written. Use with `#[serde(serialize_with = "...")]`.

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::ser::{Error, SerializeSeq};
use serde::Serializer;

fn to_number(value: &BigDecimal) -> Option<f64> {
    value.to_f64().filter(|v| v.is_finite())
}

/// Serialize a single decimal as a JSON number.
pub fn as_f64<S>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match to_number(value) {
        Some(number) => serializer.serialize_f64(number),
        None => Err(S::Error::custom(format!(
            "decimal {} is not representable as a number",
            value
        ))),
    }
}

/// Serialize a list of decimals as a JSON array of numbers.
pub fn as_f64_seq<S>(values: &[BigDecimal], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        let number = to_number(value).ok_or_else(|| {
            S::Error::custom(format!("decimal {} is not representable as a number", value))
        })?;
        seq.serialize_element(&number)?;
    }
    seq.end()
}
