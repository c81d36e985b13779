//! Assets returned by the search service.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One network-exposed resource from a search response.
///
/// Every field is optional on the wire; absent or `null` values become empty
/// strings. `port` and `status_code` arrive as numbers but are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Asset {
    #[serde(rename = "web_title", default, deserialize_with = "lenient_string")]
    pub title: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub domain: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub ip: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub port: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub status_code: String,

    #[serde(default, deserialize_with = "lenient_number")]
    pub response_time: Option<f64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
}

impl Asset {
    /// Title with line breaks removed and surrounding whitespace trimmed.
    pub fn cleaned_title(&self) -> String {
        self.title.trim().replace(['\n', '\r'], "")
    }

    /// Response time rendered as `<n>ms`, or empty when absent or zero.
    pub fn response_time_display(&self) -> String {
        match self.response_time {
            Some(ms) if ms != 0.0 => format!("{ms}ms"),
            _ => String::new(),
        }
    }
}

/// Parsed success payload of one search call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Total matches the service reports (may exceed `assets.len()`)
    pub total: u64,

    /// First page of matches
    pub assets: Vec<Asset>,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches("ms").parse().ok(),
        _ => None,
    })
}
