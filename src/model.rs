// Expense records as stored by the upstream service
//
// The gateway never owns an Expense: ids are assigned upstream, and create/update
// bodies are forwarded field-for-field.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// EXPENSE
// ============================================================================

/// The parts of an upstream record the aggregates read.
///
/// Upstream records are not validated: a field of the wrong JSON type reads as
/// absent instead of failing the whole collection, and every other key (`id`,
/// `title`, `type`, ...) is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Expense {
    /// Signed amount; only JSON numbers count
    #[serde(default, deserialize_with = "number_or_absent")]
    pub nominal: Option<f64>,

    /// Compared verbatim against the requested category
    #[serde(default, deserialize_with = "string_or_absent")]
    pub category: Option<String>,

    /// ISO-8601 date (or timestamp) string, only ever compared as a calendar date
    #[serde(default, deserialize_with = "string_or_absent")]
    pub date: Option<String>,
}

impl Expense {
    /// Amount added to a total; non-numeric amounts add nothing
    pub fn amount(&self) -> f64 {
        self.nominal.unwrap_or(0.0)
    }
}

fn number_or_absent<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| value.as_f64())
}

fn string_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| match value {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Body of a create or update request.
///
/// Only the five record fields are picked from the client body. Values are kept as raw
/// JSON so the upstream receives exactly what the client sent, including explicit nulls;
/// a field the client left out stays out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub nominal: Option<Value>,

    #[serde(
        rename = "type",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub category: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
}

impl ExpenseDraft {
    /// Read a create/update body the way a JSON body parser would.
    ///
    /// Without a JSON content type, or with an empty body, the draft is empty. A JSON
    /// value that is not an object also yields an empty draft. Only text that does not
    /// parse as JSON is an error.
    pub fn from_request_body(
        content_type: Option<&str>,
        body: &[u8],
    ) -> Result<Self, serde_json::Error> {
        if !content_type.map(is_json_content_type).unwrap_or(false) {
            return Ok(Self::default());
        }
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice::<Value>(body)? {
            value @ Value::Object(_) => serde_json::from_value(value),
            _ => Ok(Self::default()),
        }
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

// `null` must survive as Some(Value::Null); absence is handled by `default`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Aggregate endpoint response
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TotalResponse {
    pub total: f64,
}

// ============================================================================
// TESTS
// ============================================================================
