// Cerebro - core/query.rs
//
// Turns a raw search box string into a QueryDescriptor.
//
// A bare four-digit query is a year and never leaves the process. Anything
// else goes to the natural-language bridge; whatever goes wrong there, the
// caller still gets a descriptor (a lower-cased substring query).

use crate::core::model::QueryDescriptor;
use crate::util::error::BridgeError;
use regex::Regex;
use std::sync::OnceLock;

/// Capability that translates free text into a structured descriptor.
pub trait QueryBridge {
    /// Translate `text` into a descriptor, or report why it could not.
    fn translate(&self, text: &str) -> Result<QueryDescriptor, BridgeError>;
}

/// Bridge used when translation is disabled or unconfigured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBridge;

impl QueryBridge for DisabledBridge {
    fn translate(&self, _text: &str) -> Result<QueryDescriptor, BridgeError> {
        Err(BridgeError::Unconfigured)
    }
}

fn year_pattern() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"^\d{4}$").expect("year pattern is valid"))
}

/// Resolve a raw query into a descriptor.
///
/// - exactly four digits: `{year}`, bridge not consulted;
/// - otherwise: the bridge's translation, or `{text: raw.to_lowercase()}`
///   if the bridge fails for any reason.
pub fn resolve_query(raw: &str, bridge: &dyn QueryBridge) -> QueryDescriptor {
    if year_pattern().is_match(raw) {
        if let Ok(year) = raw.parse::<i32>() {
            tracing::debug!(year, "Query resolved as bare year");
            return QueryDescriptor::for_year(year);
        }
    }

    match bridge.translate(raw) {
        Ok(descriptor) => {
            tracing::debug!(query = raw, descriptor = %descriptor, "Query translated by bridge");
            descriptor
        }
        Err(BridgeError::Unconfigured) => {
            tracing::debug!("Query bridge not configured; using substring search");
            QueryDescriptor::for_text(raw.to_lowercase())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Query bridge failed; falling back to substring search");
            QueryDescriptor::for_text(raw.to_lowercase())
        }
    }
}

/// Parse the bridge's JSON answer into a descriptor.
///
/// The answer must be a JSON object. `year` must be an integral number,
/// `month` and `text` strings; `null`, empty strings, and a zero year count
/// as absent.
/// Unknown keys are ignored.
pub fn parse_descriptor_json(raw: &str) -> Result<QueryDescriptor, BridgeError> {
    let malformed = |reason: String| BridgeError::MalformedDescriptor {
        raw: raw.to_string(),
        reason,
    };

    let value: serde_json::Value =
        serde_json::from_str(raw.trim()).map_err(|e| malformed(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| malformed("expected a JSON object".to_string()))?;

    let year = match object.get("year") {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => {
            let n = integral_number(v)
                .ok_or_else(|| malformed(format!("year must be an integer, got {v}")))?;
            let year = i32::try_from(n).map_err(|_| malformed(format!("year {n} out of range")))?;
            (year != 0).then_some(year)
        }
    };

    let string_field = |key: &str| -> Result<Option<String>, BridgeError> {
        match object.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
            Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
            Some(v) => Err(malformed(format!("{key} must be a string, got {v}"))),
        }
    };

    Ok(QueryDescriptor {
        year,
        month: string_field("month")?,
        text: string_field("text")?,
    })
}

/// Integer value of a JSON number, accepting floats with no fractional part
/// (`1995.0`).
fn integral_number(v: &serde_json::Value) -> Option<i64> {
    if let Some(n) = v.as_i64() {
        return Some(n);
    }
    let f = v.as_f64()?;
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}
