//! Serde helpers for request forms.
//!
//! Browsers submit empty inputs as `""`; for optional scalar fields that means
//! "no value". Update forms additionally need to tell an absent key (leave the
//! field alone) from an explicit `null` (clear it), which is why the `present_*`
//! helpers wrap the value in a second `Option`.

use serde::{de, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// `null`, missing and blank strings become `None`; anything else is parsed.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Like [`blank_as_none`], but a present key always yields `Some`.
/// Use with `#[serde(default)]` so an absent key stays `None`.
pub fn present_blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    blank_as_none(deserializer).map(Some)
}

/// A present key yields `Some`, including an explicit `null`.
pub fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
