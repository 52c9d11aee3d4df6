//! Serde codecs for the integer-seconds scalars used on the wire.
//!
//! # Design
//! The API encodes durations and timestamps as plain integers (seconds and
//! Unix epoch seconds) instead of ISO-8601 strings. Both codecs are serde
//! `with`-modules so the domain types keep `std::time::Duration` and
//! `chrono::DateTime<Utc>` fields and the wire quirk stays in this file.
//!
//! Decoding accepts a bare integer or a quoted base-10 integer (`3600` and
//! `"3600"`). Anything else is a decode error.

use std::fmt;

use serde::de::{self, Visitor};
use serde::Deserializer;

/// Visitor yielding the signed integer behind a bare or quoted JSON number.
struct SecondsVisitor;

impl<'de> Visitor<'de> for SecondsVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer number of seconds, optionally quoted")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        v.parse::<i64>()
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

fn deserialize_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(SecondsVisitor)
}

/// `std::time::Duration` as whole seconds. Sub-second parts are truncated.
pub mod duration_secs {
    use std::time::Duration;

    use serde::{de, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = super::deserialize_seconds(deserializer)?;
        let secs = u64::try_from(secs).map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Signed(secs), &"a non-negative duration")
        })?;
        Ok(Duration::from_secs(secs))
    }

    /// Same encoding for `Option<Duration>`; `null` maps to `None`.
    pub mod option {
        use std::time::Duration;

        use serde::{Deserialize, Deserializer, Serializer};

        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super")] Duration);

        pub fn serialize<S: Serializer>(
            value: &Option<Duration>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(d) => super::serialize(d, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Duration>, D::Error> {
            Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(d)| d))
        }
    }
}

/// `chrono::DateTime<Utc>` as Unix epoch seconds.
pub mod timestamp_secs {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let secs = super::deserialize_seconds(deserializer)?;
        DateTime::from_timestamp(secs, 0).ok_or_else(|| {
            de::Error::invalid_value(de::Unexpected::Signed(secs), &"a representable timestamp")
        })
    }

    /// Same encoding for `Option<DateTime<Utc>>`; `null` maps to `None`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super")] DateTime<Utc>);

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(t) => super::serialize(t, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(t)| t))
        }
    }
}
