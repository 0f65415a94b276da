use std::fmt::{Display, Formatter};

use serde::de::{Error as DeError, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

use crate::error::ValidationError;

/// Instant normalized to UTC.
///
/// The wire decoder is lenient because the upstream resource is not: header
/// timestamps arrive as unix epoch seconds, series timestamps as RFC3339 or
/// `YYYY-MM-DD HH:MM:SS[±hh:mm]` strings depending on the requested range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Parse a strict RFC3339 instant, normalizing any offset to UTC.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        OffsetDateTime::parse(input, &Rfc3339)
            .map(|parsed| Self(parsed.to_offset(UtcOffset::UTC)))
            .map_err(|_| ValidationError::InvalidTimestamp {
                value: input.to_owned(),
            })
    }

    /// Parse an instant the way the upstream emits them: RFC3339, or a
    /// datetime with a space separator, with or without a zone offset.
    /// Zone-less values are taken as UTC.
    pub fn parse_lenient(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if let Ok(parsed) = Self::parse(trimmed) {
            return Ok(parsed);
        }

        let normalized = match trimmed.split_once(' ') {
            Some((date, rest)) => format!("{date}T{rest}"),
            None => trimmed.to_owned(),
        };
        if let Ok(parsed) = Self::parse(&normalized) {
            return Ok(parsed);
        }

        Self::parse(&format!("{normalized}Z")).map_err(|_| ValidationError::InvalidTimestamp {
            value: input.to_owned(),
        })
    }

    pub fn from_unix_seconds(seconds: i64) -> Result<Self, ValidationError> {
        OffsetDateTime::from_unix_timestamp(seconds)
            .map(Self)
            .map_err(|_| ValidationError::InvalidTimestamp {
                value: seconds.to_string(),
            })
    }

    pub fn unix_timestamp(self) -> i64 {
        self.0.unix_timestamp()
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .expect("UtcDateTime must be RFC3339 formattable")
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct InstantVisitor;

        impl<'de> Visitor<'de> for InstantVisitor {
            type Value = UtcDateTime;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("an RFC3339 datetime string or unix epoch seconds")
            }

            fn visit_str<E: DeError>(self, value: &str) -> Result<Self::Value, E> {
                UtcDateTime::parse_lenient(value).map_err(E::custom)
            }

            fn visit_i64<E: DeError>(self, value: i64) -> Result<Self::Value, E> {
                UtcDateTime::from_unix_seconds(value).map_err(E::custom)
            }

            fn visit_u64<E: DeError>(self, value: u64) -> Result<Self::Value, E> {
                let seconds = i64::try_from(value).map_err(E::custom)?;
                UtcDateTime::from_unix_seconds(seconds).map_err(E::custom)
            }

            fn visit_f64<E: DeError>(self, value: f64) -> Result<Self::Value, E> {
                UtcDateTime::from_unix_seconds(value as i64).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(InstantVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_and_normalizes_offset() {
        let parsed = UtcDateTime::parse("2024-01-02T10:30:00-05:00").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-02T15:30:00Z");
    }

    #[test]
    fn lenient_parse_accepts_space_separator() {
        let parsed = UtcDateTime::parse_lenient("2024-01-02 09:30:00-05:00").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-02T14:30:00Z");
    }

    #[test]
    fn lenient_parse_takes_zoneless_values_as_utc() {
        let parsed = UtcDateTime::parse_lenient("2024-01-02 00:00:00").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-02T00:00:00Z");
    }

    #[test]
    fn rejects_garbage() {
        let err = UtcDateTime::parse_lenient("not a date").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidTimestamp { .. }));
    }

    #[test]
    fn deserializes_epoch_seconds() {
        let parsed: UtcDateTime = serde_json::from_str("1704207600").expect("must decode");
        assert_eq!(parsed.unix_timestamp(), 1_704_207_600);
    }
}
