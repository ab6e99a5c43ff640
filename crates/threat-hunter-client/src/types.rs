//! Wire types exchanged with the capture and prediction backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field the capture backend uses to flag packets it could not parse.
/// Kept in storage, never shown.
pub const BAD_PACKET_FIELD: &str = "bad_packet";

/// One captured packet as emitted on the push feed
///
/// An ordered field -> scalar mapping; order is the order the backend
/// serialized the fields in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Look up a field by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// All stored fields, including reserved ones
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fields suitable for display (`bad_packet` excluded)
    pub fn display_fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields().filter(|(k, _)| *k != BAD_PACKET_FIELD)
    }

    /// Whether the backend flagged this packet as unparseable
    pub fn is_bad_packet(&self) -> bool {
        match self.0.get(BAD_PACKET_FIELD) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Binary classification label (0 = safe, 1 = dangerous)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Label {
    Safe,
    Dangerous,
}

impl Label {
    pub fn is_dangerous(&self) -> bool {
        matches!(self, Label::Dangerous)
    }
}

impl TryFrom<i64> for Label {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Label::Safe),
            1 => Ok(Label::Dangerous),
            other => Err(format!("label must be 0 or 1, got {}", other)),
        }
    }
}

impl From<Label> for i64 {
    fn from(label: Label) -> Self {
        match label {
            Label::Safe => 0,
            Label::Dangerous => 1,
        }
    }
}

/// Response of the per-packet prediction endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PacketPredictions {
    pub predictions: Vec<Label>,
    #[serde(default)]
    pub file_key: Option<String>,
    /// Opaque model description, passed through for display
    #[serde(default)]
    pub model_info: Option<Value>,
}

/// Response of the malicious-subset prediction endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaliciousPredictions {
    pub predictions: Vec<Label>,
    #[serde(default)]
    pub file_key: Option<String>,
}

/// One entry of the ranked feature list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopFeature {
    pub feature: String,
}

/// Response of the per-file prediction endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileMetrics {
    pub total_packets: u64,
    pub anomalous_packets: u64,
    /// Fraction in 0..=1 as reported by the backend
    pub percent_anomalous: f64,
    pub top_features: Vec<TopFeature>,
    #[serde(default)]
    pub file_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_preserves_field_order() {
        let value = json!({
            "Time": 0.5,
            "Source": "aa:bb",
            "Destination": null,
            "Protocol": "TCP",
            "bad_packet": 0,
        });
        let record: Record = serde_json::from_value(value).unwrap();

        let names: Vec<&str> = record.fields().map(|(k, _)| k).collect();
        let expected = vec!["Time", "Source", "Destination", "Protocol", "bad_packet"];
        assert_eq!(names, expected);
    }

    #[test]
    fn test_display_fields_hide_bad_packet() {
        let value = json!({"Protocol": "UDP", "bad_packet": 1});
        let record: Record = serde_json::from_value(value).unwrap();

        let shown: Vec<&str> = record.display_fields().map(|(k, _)| k).collect();
        assert_eq!(shown, vec!["Protocol"]);
        // Still stored
        assert_eq!(record.get("bad_packet"), Some(&json!(1)));
        assert!(record.is_bad_packet());
    }

    #[test]
    fn test_label_parsing() {
        let labels: Vec<Label> = serde_json::from_value(json!([0, 1, 0])).unwrap();
        assert_eq!(labels, vec![Label::Safe, Label::Dangerous, Label::Safe]);

        assert!(serde_json::from_value::<Vec<Label>>(json!([2])).is_err());
    }

    #[test]
    fn test_packet_predictions_optional_fields() {
        let value = json!({"predictions": [1]});
        let parsed: PacketPredictions = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.file_key, None);
        assert_eq!(parsed.model_info, None);
    }

    #[test]
    fn test_file_metrics_requires_counts() {
        let result = serde_json::from_value::<FileMetrics>(json!({"error": "boom"}));
        assert!(result.is_err());
    }
}
