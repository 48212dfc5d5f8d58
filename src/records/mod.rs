pub mod ndjson;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw logbook line for an operation. Records arrive pre-sorted by
/// `timestamp`; nested records point at their step's *start* record id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(rename = "type")]
    pub step_type: String,
    pub timestamp: DateTime<Utc>,
    pub outcome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    #[serde(default)]
    pub message: String,
}

impl LogRecord {
    pub fn outcome(&self) -> Outcome {
        Outcome::parse(&self.outcome)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Warning,
    Ko,
    Fatal,
    Started,
    Other,
}

impl Outcome {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "OK" => Outcome::Ok,
            "WARNING" => Outcome::Warning,
            "KO" => Outcome::Ko,
            "FATAL" => Outcome::Fatal,
            "STARTED" => Outcome::Started,
            _ => Outcome::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_parse_is_case_insensitive() {
        assert_eq!(Outcome::parse("warning"), Outcome::Warning);
        assert_eq!(Outcome::parse("Ko"), Outcome::Ko);
        assert_eq!(Outcome::parse("STARTED"), Outcome::Started);
        assert_eq!(Outcome::parse("SKIPPED"), Outcome::Other);
    }

    #[test]
    fn record_round_trips_with_camel_case_parent_id() {
        let raw = r#"{"id":"r1","parentId":"r0","type":"CHECK_MANIFEST","timestamp":"2026-03-01T10:00:00Z","outcome":"OK","message":"manifest ok"}"#;
        let record: LogRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.parent_id.as_deref(), Some("r0"));
        assert_eq!(record.step_type, "CHECK_MANIFEST");
        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["parentId"], "r0");
        assert_eq!(back["type"], "CHECK_MANIFEST");
    }
}
