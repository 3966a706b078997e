//! # Record Shapes and Load Normalization
//!
//! Persisted data is untrusted: it may be missing, truncated, hand-edited, or
//! written by an older build. Every record family therefore has two types:
//!
//! - The **record** itself (e.g. [`crate::model::TaskRecord`]): fully-formed, invariants hold.
//! - A loose **shape** (e.g. [`crate::model::task::TaskShape`]): every field optional.
//!   Every field is held as a raw JSON value, so decoding only requires the
//!   element to be an object. A field of the wrong type reads as absent.
//!
//! [`Record::normalize`] then narrows a shape into a record: elements missing a
//! discriminating field are dropped, optional fields are defaulted, numbers are
//! clamped, invariants are restored, and missing ids are derived.
//!
//! ## Load Rules
//!
//! [`normalize_loaded`] applies to the whole persisted value:
//!
//! 1. **Not an array**: Rejected (`None`), caller falls back to seed.
//! 2. **Per element**: Not an object, or a discriminating field missing or
//!    blank → element dropped. Any other bad field is defaulted.
//! 3. **Duplicates**: Later elements with an identity already seen are dropped.
//! 4. **Nothing survives**: Rejected (`None`). An empty persisted collection
//!    cannot be told apart from total corruption.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// A record family managed by a [`crate::store::Store`].
pub trait Record: Clone + Serialize + 'static {
    /// Loose, all-optional persisted form.
    type Shape: DeserializeOwned;

    /// Default durable storage key.
    const STORAGE_KEY: &'static str;

    /// Short name used in log events.
    const KIND: &'static str;

    /// Deterministic initial collection.
    fn seed() -> Vec<Self>;

    /// Narrow a decoded shape into a record, or reject it.
    fn normalize(shape: Self::Shape) -> Option<Self>;

    /// Whether the discriminating fields checked by [`Record::normalize`] are present.
    /// A record failing this would be dropped on the next load, so stores refuse it.
    fn is_loadable(&self) -> bool;

    /// Identity used to detect duplicates within one collection.
    fn identity(&self) -> String;
}

/// Validate and repair a decoded persisted value.
///
/// Returns `None` when the value must be rejected wholesale.
pub fn normalize_loaded<R: Record>(raw: Value) -> Option<Vec<R>> {
    let Value::Array(items) = raw else {
        return None;
    };

    let total = items.len();
    let mut seen = HashSet::new();
    let records: Vec<R> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<R::Shape>(item).ok())
        .filter_map(R::normalize)
        .filter(|record| seen.insert(record.identity()))
        .collect();

    if records.len() < total {
        log::debug!(
            "event=normalize_loaded kind={} status=dropped dropped={} kept={}",
            R::KIND,
            total - records.len(),
            records.len()
        );
    }

    if records.is_empty() {
        None
    } else {
        Some(records)
    }
}

/// Keep a string only if it has visible content.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// String content of a loose field. Any other JSON type reads as absent.
pub(crate) fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

/// Like [`text`], but a number is taken in its decimal form (`7` -> `"7"`).
pub(crate) fn text_or_number(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Finite numeric content of a loose field. Numeric strings are accepted.
pub(crate) fn number(value: Option<Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

pub(crate) fn flag(value: Option<Value>) -> Option<bool> {
    match value? {
        Value::Bool(b) => Some(b),
        _ => None,
    }
}

/// Elements of a loose array field. Anything else reads as empty.
pub(crate) fn items(value: Option<Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// Parse a persisted enum value from its serde string form.
pub(crate) fn parse_enum<T: DeserializeOwned>(value: Option<&str>) -> Option<T> {
    serde_json::from_value(Value::String(value?.trim().to_string())).ok()
}

/// Parse a calendar date written as `YYYY-MM-DD` (or the dotted `YYYY.MM.DD`).
pub(crate) fn parse_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y.%m.%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskStatus;
    use serde_json::json;

    #[test]
    fn test_parse_enum() {
        assert_eq!(parse_enum(Some("done")), Some(TaskStatus::Done));
        assert_eq!(parse_enum(Some(" in_progress ")), Some(TaskStatus::InProgress));
        assert_eq!(parse_enum::<TaskStatus>(Some("finished")), None);
        assert_eq!(parse_enum::<TaskStatus>(None), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14);
        assert_eq!(parse_date(Some("2025-03-14")), expected);
        assert_eq!(parse_date(Some("2025.03.14")), expected);
        assert_eq!(parse_date(Some("14/03/2025")), None);
    }

    #[test]
    fn test_loose_fields_ignore_wrong_types() {
        assert_eq!(text(Some(json!(7))), None);
        assert_eq!(text_or_number(Some(json!(7))), Some("7".to_string()));
        assert_eq!(number(Some(json!("50"))), Some(50.0));
        assert_eq!(number(Some(json!("fifty"))), None);
        assert_eq!(number(Some(json!(true))), None);
        assert_eq!(flag(Some(json!(1))), None);
        assert!(items(Some(json!({"a": 1}))).is_empty());
        assert_eq!(items(Some(json!([1, 2]))).len(), 2);
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  ".into())), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some(" a ".into())), Some(" a ".into()));
    }
}
