use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// JSON envelope every portal endpoint answers with
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub(crate) e: i64,
    #[serde(default)]
    pub(crate) m: Option<String>,
    pub(crate) d: Option<T>,
}

impl<T> Envelope<T> {
    pub(crate) fn message(&self) -> &str {
        self.m.as_deref().unwrap_or("")
    }
}

/// Daily window state from the index endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ReportStatus {
    #[serde(rename = "date", default)]
    pub(crate) date_label: String,
    #[serde(rename = "ontime", deserialize_with = "truthy", default)]
    pub(crate) window_open: bool,
    #[serde(rename = "realonly", deserialize_with = "truthy", default)]
    pub(crate) already_reported: bool,
}

/// Accepts booleans as well as the 0/1 and "0"/"1" some portal builds send.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false"),
        Value::Null => false,
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    })
}
