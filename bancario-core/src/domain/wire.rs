//! Serde helpers for the backend's JSON conventions
//!
//! Amounts travel as JSON numbers but some endpoints send them as strings,
//! and timestamps arrive with or without an offset (or as a bare date).

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value as JsonValue;

/// Parse a timestamp as sent by the backend
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn decimal_from_json<E: serde::de::Error>(value: JsonValue) -> Result<Decimal, E> {
    match value {
        JsonValue::Number(n) => {
            let s = n.to_string();
            s.parse::<Decimal>()
                .or_else(|_| {
                    n.as_f64()
                        .and_then(Decimal::from_f64)
                        .ok_or_else(|| format!("invalid decimal: {}", s))
                })
                .map_err(E::custom)
        }
        JsonValue::String(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|e| E::custom(format!("invalid decimal: {}", e))),
        _ => Err(E::custom("expected number or string for amount")),
    }
}

/// `Decimal` as a JSON number
pub mod amount {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let as_float = value
            .to_f64()
            .ok_or_else(|| serde::ser::Error::custom("amount out of range"))?;
        serializer.serialize_f64(as_float)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        decimal_from_json(value)
    }
}

/// `Option<Decimal>` as an optional JSON number
pub mod amount_option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => amount::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        match Option::<JsonValue>::deserialize(deserializer)? {
            None | Some(JsonValue::Null) => Ok(None),
            Some(value) => decimal_from_json(value).map(Some),
        }
    }
}

/// Lenient optional timestamp, serialized as ISO-8601 without offset
pub mod timestamp_option {
    use super::*;

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<JsonValue>::deserialize(deserializer)? {
            Some(JsonValue::String(s)) if !s.trim().is_empty() => parse_timestamp(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", s))),
            _ => Ok(None),
        }
    }
}

/// Id that may arrive as a JSON number or string
pub mod flexible_id {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match JsonValue::deserialize(deserializer)? {
            JsonValue::Number(n) => Ok(n.to_string()),
            JsonValue::String(s) => Ok(s),
            _ => Err(serde::de::Error::custom("expected number or string for id")),
        }
    }
}

/// Optional id that may arrive as a JSON number, string or null
pub mod flexible_id_option {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        match Option::<JsonValue>::deserialize(deserializer)? {
            Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
            Some(JsonValue::String(s)) if !s.trim().is_empty() => Ok(Some(s)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Holder {
        #[serde(with = "amount")]
        monto: Decimal,
        #[serde(default, with = "timestamp_option")]
        fecha: Option<NaiveDateTime>,
    }

    #[test]
    fn test_amount_accepts_number_and_string() {
        let h: Holder = serde_json::from_str(r#"{"monto": 12.5}"#).unwrap();
        assert_eq!(h.monto, Decimal::new(125, 1));

        let h: Holder = serde_json::from_str(r#"{"monto": "99.90"}"#).unwrap();
        assert_eq!(h.monto, Decimal::new(9990, 2));
    }

    #[test]
    fn test_amount_serializes_as_number() {
        let h = Holder { monto: Decimal::new(1005, 1), fecha: None };
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["monto"], serde_json::json!(100.5));
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2024-03-01T10:15:30Z").is_some());
        assert!(parse_timestamp("2024-03-01T10:15:30.123456").is_some());
        assert!(parse_timestamp("2024-03-01 10:15:30").is_some());
        assert_eq!(
            parse_timestamp("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_missing_timestamp_is_none() {
        let h: Holder = serde_json::from_str(r#"{"monto": 1, "fecha": null}"#).unwrap();
        assert!(h.fecha.is_none());
    }
}
