// Copyright 2021 Contributors to the Confidential Packaging project.
// SPDX-License-Identifier: MIT

//! Lookup of top-level string fields in the decoded JWS and JWK documents.
//!
//! Documents are scanned with a streaming visitor rather than being parsed into a `serde_json::Value`, and
//! the value of the requested field is returned borrowed from the document whenever it contains no escape
//! sequences.

use super::error::{Error, JwsErrorKind};
use super::Result;
use log::error;
use serde::de::{DeserializeSeed, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde_json::value::RawValue;
use std::borrow::Cow;
use std::fmt;

/// Finds the value of the top-level field `key` in the JSON object `json`.
///
/// Fails with `MissingField` when the object has no such field, and with `WrongTokenType` when the field
/// does not hold a string. If the key occurs more than once, the first occurrence is used.
pub fn find_string<'a>(json: &'a [u8], key: &'static str) -> Result<Cow<'a, str>> {
    let mut deserializer = serde_json::Deserializer::from_slice(json);
    let raw = FieldSeek { key }.deserialize(&mut deserializer)?;
    deserializer.end()?;

    let raw = raw.ok_or_else(|| {
        error!("JSON document has no `{}` field", key);
        Error::from(JwsErrorKind::MissingField(key))
    })?;

    let text = raw.get();
    if !text.starts_with('"') {
        error!("JSON field `{}` is not a string", key);
        return Err(JwsErrorKind::WrongTokenType(key).into());
    }

    if text.contains('\\') {
        Ok(Cow::Owned(serde_json::from_str::<String>(text)?))
    } else {
        Ok(Cow::Borrowed(serde_json::from_str::<&'a str>(text)?))
    }
}

struct FieldSeek {
    key: &'static str,
}

impl<'de> DeserializeSeed<'de> for FieldSeek {
    type Value = Option<&'de RawValue>;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for FieldSeek {
    type Value = Option<&'de RawValue>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut found = None;
        while let Some(name) = map.next_key::<Cow<'de, str>>()? {
            if found.is_none() && name == self.key {
                found = Some(map.next_value::<&'de RawValue>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }

        Ok(found)
    }
}
