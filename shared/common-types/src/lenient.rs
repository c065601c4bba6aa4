//! Tolerant decoding of post display fields
//!
//! Stored posts are not validated on the way in, so a single item may carry `null`, a float
//! timestamp or a number where text is expected. These helpers map such values onto the field
//! type instead of failing the whole feed.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::UnicornColor;

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Integer(i64),
    Float(f64),
    Text(String),
    Flag(bool),
    Other(IgnoredAny),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Flag(value) => Some(value.to_string()),
            Self::Other(_) => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn into_integer(self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(value),
            Self::Float(value) if value.is_finite() => Some(value as i64),
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| text.trim().parse::<f64>().ok().map(|value| value as i64)),
            Self::Float(_) | Self::Flag(_) | Self::Other(_) => None,
        }
    }
}

fn scalar<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Scalar>, D::Error> {
    Option::<Scalar>::deserialize(deserializer)
}

/// Text field; numbers and booleans are stringified, anything else is empty
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar(deserializer)?
        .and_then(Scalar::into_text)
        .unwrap_or_default())
}

/// Unicorn colour; missing or non-text values become rainbow
pub fn color<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar(deserializer)?
        .and_then(Scalar::into_text)
        .unwrap_or_else(|| UnicornColor::Rainbow.to_string()))
}

/// Millisecond timestamp; floats are truncated, numeric strings parsed, anything else is `0`
pub fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(scalar(deserializer)?
        .and_then(Scalar::into_integer)
        .unwrap_or_default())
}

/// Non-negative counter; negative or unreadable values are `0`
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(scalar(deserializer)?
        .and_then(Scalar::into_integer)
        .and_then(|value| u64::try_from(value).ok())
        .unwrap_or_default())
}

/// Optional text; `null` and non-text values are `None`
pub fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar(deserializer)?.and_then(|value| match value {
        Scalar::Text(text) => Some(text),
        _ => None,
    }))
}
