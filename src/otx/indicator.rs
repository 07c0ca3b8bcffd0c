//! OTX pulse payload types.

use serde::Deserialize;

/// A single indicator of compromise from a pulse.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Indicator {
    /// Indicator type as reported by OTX (e.g. `domain`, `IPv4`, `FileHash-SHA256`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Indicator value
    pub indicator: String,
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Indicator {
    pub fn new(kind: impl Into<String>, indicator: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            indicator: indicator.into(),
            id: None,
            title: None,
            description: None,
        }
    }
}

/// The parts of a pulse response that are used here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pulse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Indicators; absent in the response means none
    #[serde(default)]
    pub indicators: Vec<Indicator>,
}

impl Pulse {
    /// Decode a pulse from its JSON body.
    pub fn from_json(body: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_from_json() {
        let body = r#"{
            "id": "5f1a2b3c4d5e6f7a8b9c0d1e",
            "name": "Example campaign",
            "tags": ["apt"],
            "indicators": [
                {"id": 101, "type": "domain", "indicator": "evil.example", "title": "", "description": "C2", "created": "2024-01-01T00:00:00"},
                {"id": 102, "type": "IPv4", "indicator": "198.51.100.23"}
            ]
        }"#;
        let pulse = Pulse::from_json(body).unwrap();
        assert_eq!(pulse.name.as_deref(), Some("Example campaign"));
        assert_eq!(pulse.indicators.len(), 2);
        assert_eq!(pulse.indicators[0].kind, "domain");
        assert_eq!(pulse.indicators[0].description.as_deref(), Some("C2"));
        assert_eq!(pulse.indicators[1].indicator, "198.51.100.23");
        assert_eq!(pulse.indicators[1].id, Some(102));
    }

    #[test]
    fn test_pulse_without_indicators() {
        let pulse = Pulse::from_json(r#"{"id": "abc"}"#).unwrap();
        assert!(pulse.indicators.is_empty());
    }

    #[test]
    fn test_pulse_invalid_json() {
        assert!(matches!(
            Pulse::from_json("not json"),
            Err(crate::Error::Json(_))
        ));
    }
}
