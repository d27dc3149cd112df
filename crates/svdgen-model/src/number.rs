//! Numeric values that may arrive as JSON integers or quoted strings.
//!
//! Hjson sources routinely quote numbers (`"0x40000000"`, `"32"`), and the
//! quoting survives into the validated output. These helpers accept both
//! forms for use with `#[serde(deserialize_with = ...)]`.

use std::fmt::Display;

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Int(u64),
    Text(String),
}

/// Parse a decimal or `0x`-prefixed hexadecimal number. Underscores are
/// accepted as digit separators.
pub fn parse_number(text: &str) -> Option<u64> {
    let text = text.trim().replace('_', "");
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn convert<T, E>(value: u64) -> Result<T, E>
where
    T: TryFrom<u64>,
    E: de::Error,
{
    T::try_from(value).map_err(|_| E::custom(format!("number {value} is out of range")))
}

fn from_repr<T, E>(repr: NumberRepr) -> Result<T, E>
where
    T: TryFrom<u64>,
    E: de::Error,
{
    match repr {
        NumberRepr::Int(n) => convert(n),
        NumberRepr::Text(s) => {
            let n = parse_number(&s).ok_or_else(|| E::custom(invalid(&s)))?;
            convert(n)
        }
    }
}

fn invalid(text: impl Display) -> String {
    format!("invalid number `{text}`")
}

/// Deserialize a required number.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    from_repr(NumberRepr::deserialize(deserializer)?)
}

/// Deserialize an optional number. Use together with `#[serde(default)]`.
pub fn deserialize_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    Option::<NumberRepr>::deserialize(deserializer)?
        .map(from_repr::<T, D::Error>)
        .transpose()
}
