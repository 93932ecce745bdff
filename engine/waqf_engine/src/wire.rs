//! # Wire
//!
//! The single adapter between engine types and their JSON representations.
//!
//! ## Instrument tags
//!
//! | Canonical (written)   | Also accepted on read                              |
//! |-----------------------|----------------------------------------------------|
//! | `Permanent`           | `permanent`, `PERMANENT`                           |
//! | `TemporaryConsumable` | `temporary_consumable`, `TEMPORARY_CONSUMABLE`, `consumable` |
//! | `TemporaryRevolving`  | `temporary_revolving`, `TEMPORARY_REVOLVING`, `revolving`    |
//! | `Hybrid`              | `hybrid`, `HYBRID` (waqf type only)                |
//!
//! ## Dates
//!
//! Persisted dates are RFC 3339 strings. Older records carry nanosecond
//! timestamps (as a number or a numeric string); those are read too.
//! Anything else reads as an absent date.
//!
//! ## Drafts
//!
//! A [`Portfolio`] round-trips through [`Portfolio::to_draft_json`] /
//! [`Portfolio::from_draft_json`] unchanged.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, Result};
use crate::types::{Instrument, Portfolio, WaqfProfile, WaqfType};

const WAQF_TYPE_TAGS: &[(&str, WaqfType)] = &[
    ("Permanent", WaqfType::Permanent),
    ("TemporaryConsumable", WaqfType::TemporaryConsumable),
    ("TemporaryRevolving", WaqfType::TemporaryRevolving),
    ("Hybrid", WaqfType::Hybrid),
];

/// Reduce any accepted spelling to a lowercase key without separators.
fn tag_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl WaqfType {
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Permanent => "Permanent",
            Self::TemporaryConsumable => "TemporaryConsumable",
            Self::TemporaryRevolving => "TemporaryRevolving",
            Self::Hybrid => "Hybrid",
        }
    }

    pub fn from_wire(raw: &str) -> Result<Self> {
        let key = tag_key(raw);
        WAQF_TYPE_TAGS
            .iter()
            .find(|(tag, _)| tag_key(tag) == key)
            .map(|(_, ty)| *ty)
            .ok_or_else(|| EngineError::UnknownWaqfType(raw.to_string()))
    }
}

impl Instrument {
    pub fn as_wire(&self) -> &'static str {
        WaqfType::from(*self).as_wire()
    }

    pub fn from_wire(raw: &str) -> Result<Self> {
        match tag_key(raw).as_str() {
            "permanent" => Ok(Self::Permanent),
            "temporaryconsumable" | "consumable" => Ok(Self::TemporaryConsumable),
            "temporaryrevolving" | "revolving" => Ok(Self::TemporaryRevolving),
            _ => Err(EngineError::UnknownInstrument(raw.to_string())),
        }
    }
}

impl FromStr for WaqfType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_wire(s)
    }
}

impl FromStr for Instrument {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_wire(s)
    }
}

impl TryFrom<String> for WaqfType {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_wire(&value)
    }
}

impl TryFrom<String> for Instrument {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_wire(&value)
    }
}

/// Serde adapter for optional dates on persisted records.
pub mod lenient_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw.as_ref().and_then(parse_value))
    }

    pub(crate) fn parse_value(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::String(s) => parse_str(s),
            Value::Number(n) => n.as_i64().map(DateTime::<Utc>::from_timestamp_nanos),
            _ => None,
        }
    }

    pub fn parse_str(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        raw.parse::<i64>().ok().map(DateTime::<Utc>::from_timestamp_nanos)
    }
}

/// A saved wizard draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDraft {
    pub id: Uuid,
    pub portfolio: Portfolio,
    pub saved_at: DateTime<Utc>,
    pub user_id: String,
}

impl PortfolioDraft {
    /// Drafts share their portfolio's identity.
    pub fn new(portfolio: Portfolio, user_id: impl Into<String>, saved_at: DateTime<Utc>) -> Self {
        PortfolioDraft {
            id: portfolio.id,
            portfolio,
            saved_at,
            user_id: user_id.into(),
        }
    }
}

impl Portfolio {
    pub fn to_draft_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_draft_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl WaqfProfile {
    pub fn to_wire_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_wire_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
