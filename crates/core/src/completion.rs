//! Completion percentage over nested form records.

use serde::Serialize;
use serde_json::{Map, Value};

/// How much of a record has been filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CompletionReport {
    pub filled_count: u32,
    pub total_count: u32,
    /// Rounded to the nearest integer, 0..=100.
    pub percentage: u8,
}

/// Count filled leaves in `record`.
///
/// Objects are descended into; every other value is a leaf. A leaf is
/// unfilled when it is `""`, `false`, `0`, `null` or an empty array. Anything
/// that is not an object, and an object with no leaves, reports 0%.
pub fn evaluate(record: &Value) -> CompletionReport {
    match record {
        Value::Object(map) => evaluate_map(map),
        _ => CompletionReport::default(),
    }
}

/// [`evaluate`] for a record already held as a map.
pub fn evaluate_map(record: &Map<String, Value>) -> CompletionReport {
    let mut filled = 0;
    let mut total = 0;
    count(record, &mut filled, &mut total);

    let percentage = if total == 0 {
        0
    } else {
        (f64::from(filled) * 100.0 / f64::from(total)).round() as u8
    };

    CompletionReport {
        filled_count: filled,
        total_count: total,
        percentage,
    }
}

fn count(map: &Map<String, Value>, filled: &mut u32, total: &mut u32) {
    for value in map.values() {
        match value {
            Value::Object(nested) => count(nested, filled, total),
            leaf => {
                *total += 1;
                if is_filled(leaf) {
                    *filled += 1;
                }
            }
        }
    }
}

/// Leaf rule shared with per-step validity checks. Numeric zero reads the
/// same as an unchecked box.
pub fn is_filled(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_record_is_zero_percent() {
        assert_eq!(evaluate(&json!({})), CompletionReport::default());
    }

    #[test]
    fn half_filled_flat_record() {
        let report = evaluate(&json!({ "a": "", "b": "x" }));
        assert_eq!(report.filled_count, 1);
        assert_eq!(report.total_count, 2);
        assert_eq!(report.percentage, 50);
    }

    #[test]
    fn unfilled_leaf_kinds() {
        let report = evaluate(&json!({
            "empty": "",
            "unchecked": false,
            "missing": null,
            "none_selected": [],
            "siblings": 0
        }));
        assert_eq!(report.filled_count, 0);
        assert_eq!(report.total_count, 5);
    }

    #[test]
    fn filled_leaf_kinds() {
        let report = evaluate(&json!({
            "name": "Ana",
            "checked": true,
            "average": 8.5,
            "subjects": ["Matemáticas"]
        }));
        assert_eq!(report.filled_count, 4);
        assert_eq!(report.percentage, 100);
    }

    #[test]
    fn nested_objects_are_descended_not_counted() {
        let report = evaluate(&json!({
            "housing": {
                "services": { "water": true, "internet": false },
                "kind": "Propia"
            },
            "notes": ""
        }));
        assert_eq!(report.total_count, 4);
        assert_eq!(report.filled_count, 2);
        assert_eq!(report.percentage, 50);
    }

    #[test]
    fn empty_nested_object_contributes_nothing() {
        let report = evaluate(&json!({ "section": {}, "field": "x" }));
        assert_eq!(report.total_count, 1);
        assert_eq!(report.percentage, 100);
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        // 1 of 3 -> 33.3, 2 of 3 -> 66.7
        assert_eq!(evaluate(&json!({ "a": "x", "b": "", "c": "" })).percentage, 33);
        assert_eq!(evaluate(&json!({ "a": "x", "b": "y", "c": "" })).percentage, 67);
    }

    #[test]
    fn key_order_does_not_matter() {
        let forward: Value =
            serde_json::from_str(r#"{"a":"","b":{"c":true,"d":[]},"e":"z"}"#).unwrap();
        let backward: Value =
            serde_json::from_str(r#"{"e":"z","b":{"d":[],"c":true},"a":""}"#).unwrap();
        assert_eq!(evaluate(&forward), evaluate(&backward));
    }

    #[test]
    fn non_object_record_is_zero() {
        assert_eq!(evaluate(&json!("text")).total_count, 0);
        assert_eq!(evaluate(&json!(null)).percentage, 0);
    }
}
