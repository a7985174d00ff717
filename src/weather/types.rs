//! Core types for the weather subsystem.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Which strategy produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pathway {
    /// The primary endpoint answered and its payload was reshaped.
    #[serde(rename = "Custom API")]
    Primary,
    /// The primary endpoint failed; the forecast came from a search-grounded completion.
    #[serde(rename = "Google Search")]
    SearchFallback,
}

impl fmt::Display for Pathway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "Custom API"),
            Self::SearchFallback => write!(f, "Google Search"),
        }
    }
}

/// Current conditions. Every value is a display string ("24°C", "45%").
///
/// Models sometimes answer with bare numbers (`"temp": 5`); those are kept
/// as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    #[serde(deserialize_with = "display_string")]
    pub temp: String,
    #[serde(deserialize_with = "display_string")]
    pub condition: String,
    #[serde(deserialize_with = "display_string")]
    pub humidity: String,
    #[serde(default, deserialize_with = "display_string")]
    pub wind: String,
    #[serde(
        default,
        deserialize_with = "optional_display_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub feels_like: Option<String>,
    #[serde(default, deserialize_with = "display_string")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// "Tomorrow", "Monday", ...
    #[serde(deserialize_with = "display_string")]
    pub day: String,
    /// High/low range, e.g. "25°/18°"
    #[serde(deserialize_with = "display_string")]
    pub temp: String,
    #[serde(default, deserialize_with = "display_string")]
    pub condition: String,
}

/// The canonical current-conditions-plus-forecast record shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub current: CurrentConditions,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
}

fn display_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

fn optional_display_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = display_string(deserializer)?;
    Ok(if s.is_empty() { None } else { Some(s) })
}

/// A provenance link attached to an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub url: String,
    pub title: String,
}

/// What an outcome carries: a decoded snapshot, or the completion text when
/// it could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutcomeBody {
    #[serde(rename = "data")]
    Snapshot(WeatherSnapshot),
    RawText(String),
}

/// Result of one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherOutcome {
    #[serde(flatten)]
    pub body: OutcomeBody,
    pub sources: Vec<Citation>,
    #[serde(rename = "dataSource")]
    pub pathway: Pathway,
    /// Why the primary endpoint was abandoned, on the fallback pathway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

impl WeatherOutcome {
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match &self.body {
            OutcomeBody::Snapshot(s) => Some(s),
            OutcomeBody::RawText(_) => None,
        }
    }

    pub fn raw_text(&self) -> Option<&str> {
        match &self.body {
            OutcomeBody::Snapshot(_) => None,
            OutcomeBody::RawText(t) => Some(t),
        }
    }
}

/// Lookup failures that are not recovered by the orchestrator.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("No location specified")]
    EmptyLocation,

    #[error("API key not found (set {var})")]
    MissingCredential { var: String },

    #[error("Completion service error: {0}")]
    Completion(String),
}

impl LookupError {
    /// User-facing text for the browser page and the CLI.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyLocation => "Enter a city name or coordinates.".to_string(),
            Self::MissingCredential { .. } => {
                "API key not found. Configure it and try again.".to_string()
            }
            Self::Completion(_) => {
                "Unable to fetch weather data. Please check your API key or try again."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            location: "Paris, France".into(),
            current: CurrentConditions {
                temp: "18°C".into(),
                condition: "Cloudy".into(),
                humidity: "70%".into(),
                wind: "12 km/h".into(),
                feels_like: None,
                description: "A grey, mild afternoon.".into(),
            },
            forecast: vec![ForecastDay {
                day: "Tomorrow".into(),
                temp: "20°/12°".into(),
                condition: "Rain".into(),
            }],
        }
    }

    #[test]
    fn test_outcome_serializes_data_key() {
        let outcome = WeatherOutcome {
            body: OutcomeBody::Snapshot(sample_snapshot()),
            sources: vec![],
            pathway: Pathway::Primary,
            fallback_reason: None,
        };
        let v = serde_json::to_value(&outcome).unwrap();
        assert_eq!(v["data"]["location"], "Paris, France");
        assert_eq!(v["dataSource"], "Custom API");
        assert!(v.get("rawText").is_none());
        assert!(v.get("fallbackReason").is_none());
        assert!(v["data"]["current"].get("feelsLike").is_none());
    }

    #[test]
    fn test_outcome_serializes_raw_text_key() {
        let outcome = WeatherOutcome {
            body: OutcomeBody::RawText("sunny-ish".into()),
            sources: vec![Citation { url: "https://a.example".into(), title: "A".into() }],
            pathway: Pathway::SearchFallback,
            fallback_reason: Some("API Status: 500 Internal Server Error".into()),
        };
        let v = serde_json::to_value(&outcome).unwrap();
        assert_eq!(v["rawText"], "sunny-ish");
        assert!(v.get("data").is_none());
        assert_eq!(v["dataSource"], "Google Search");
        assert_eq!(v["fallbackReason"], "API Status: 500 Internal Server Error");
        assert_eq!(v["sources"][0]["url"], "https://a.example");
    }

    #[test]
    fn test_feels_like_camel_case() {
        let json = r#"{"temp":"5°C","condition":"Snow","humidity":"90%","wind":"3 km/h","feelsLike":"1°C","description":"Cold."}"#;
        let c: CurrentConditions = serde_json::from_str(json).unwrap();
        assert_eq!(c.feels_like.as_deref(), Some("1°C"));
    }

    #[test]
    fn test_numeric_values_become_text() {
        let json = r#"{"temp":5,"condition":"Fog","humidity":93.5,"wind":12,"feelsLike":2,"description":"Damp."}"#;
        let c: CurrentConditions = serde_json::from_str(json).unwrap();
        assert_eq!(c.temp, "5");
        assert_eq!(c.humidity, "93.5");
        assert_eq!(c.wind, "12");
        assert_eq!(c.feels_like.as_deref(), Some("2"));
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{"location":"Lima","current":{"temp":"19°C","condition":"Overcast","humidity":"80%","feelsLike":null}}"#;
        let s: WeatherSnapshot = serde_json::from_str(json).unwrap();
        assert!(s.current.wind.is_empty());
        assert!(s.current.description.is_empty());
        assert!(s.current.feels_like.is_none());
        assert!(s.forecast.is_empty());
    }

    #[test]
    fn test_nested_value_is_rejected() {
        let json = r#"{"temp":{"c":5},"condition":"Fog","humidity":"90%"}"#;
        assert!(serde_json::from_str::<CurrentConditions>(json).is_err());
    }

    #[test]
    fn test_accessors() {
        let outcome = WeatherOutcome {
            body: OutcomeBody::RawText("x".into()),
            sources: vec![],
            pathway: Pathway::Primary,
            fallback_reason: None,
        };
        assert!(outcome.snapshot().is_none());
        assert_eq!(outcome.raw_text(), Some("x"));
    }

    #[test]
    fn test_user_messages() {
        assert!(LookupError::Completion("quota".into())
            .user_message()
            .contains("Unable to fetch weather data"));
        let err = LookupError::MissingCredential { var: "API_KEY".into() };
        assert!(err.to_string().contains("API_KEY"));
    }
}
