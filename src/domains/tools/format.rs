//! Response size governor.
//!
//! MCP clients reject messages above 25000 characters, so every tool result
//! is rendered here and kept within [`MAX_RESPONSE_CHARS`]:
//!
//! - [`format_value`]: pretty JSON, or a truncation envelope holding a
//!   prefix of the compact JSON.
//! - [`format_list`]: pretty JSON, or a summary of the first few items
//!   projected onto a handful of fields.
//!
//! Lengths are counted in characters of the pretty-printed (two-space
//! indented) output.

use serde_json::{Map, Value, json};
use tracing::warn;

/// Largest response a tool may return.
pub const MAX_RESPONSE_CHARS: usize = 24_000;

// Room left for the envelope around a truncated payload.
const ENVELOPE_RESERVE: usize = 500;

// Longest string kept verbatim in a summary item.
const MAX_FIELD_CHARS: usize = 500;

const TRUNCATION_WARNING: &str = "Response truncated due to size limits";
const TRUNCATION_MARKER: &str = "... (truncated)";

/// How to summarise an oversized list of one kind of entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarySpec {
    /// Plural entity name; also the summary's list key and `total_` suffix.
    pub entity: &'static str,
    /// Maximum number of items shown.
    pub limit: usize,
    /// Fields kept on each shown item.
    pub fields: &'static [&'static str],
    /// Advice appended to the summary message.
    pub hint: &'static str,
}

pub const COURSES: SummarySpec = SummarySpec {
    entity: "courses",
    limit: 20,
    fields: &["id", "name", "course_code", "workflow_state", "start_at", "end_at"],
    hint: "Use filters like 'enrollment_type' or 'enrollment_state' to narrow results.",
};

pub const ASSIGNMENTS: SummarySpec = SummarySpec {
    entity: "assignments",
    limit: 10,
    fields: &[
        "id",
        "name",
        "due_at",
        "points_possible",
        "submission_types",
        "has_submitted_submissions",
        "html_url",
    ],
    hint: "Use filters like 'bucket' or 'search_term' to narrow results.",
};

pub const EVENTS: SummarySpec = SummarySpec {
    entity: "events",
    limit: 20,
    fields: &[
        "id",
        "title",
        "start_at",
        "end_at",
        "type",
        "context_code",
        "workflow_state",
        "html_url",
    ],
    hint: "Use date filters or context_codes to narrow results.",
};

pub const USERS: SummarySpec = SummarySpec {
    entity: "users",
    limit: 20,
    fields: &["id", "name", "sortable_name", "email"],
    hint: "Use 'search_term' or 'enrollment_type' to narrow results.",
};

pub const MODULES: SummarySpec = SummarySpec {
    entity: "modules",
    limit: 20,
    fields: &["id", "name", "position", "workflow_state", "items_count"],
    hint: "Omit 'include' to leave out module items.",
};

pub const DASHBOARD_CARDS: SummarySpec = SummarySpec {
    entity: "dashboard_cards",
    limit: 20,
    fields: &["id", "shortName", "originalName", "courseCode", "href"],
    hint: "Use get_course for details on a single course.",
};

/// Pretty-print `value`, or wrap a truncated copy when it is too long.
pub fn format_value(value: &Value) -> String {
    let pretty = to_pretty(value);
    let original_length = char_len(&pretty);
    if original_length <= MAX_RESPONSE_CHARS {
        return pretty;
    }

    warn!(
        original_length,
        limit = MAX_RESPONSE_CHARS,
        "Response truncated due to size limits"
    );

    let compact = value.to_string();
    let mut keep = MAX_RESPONSE_CHARS - ENVELOPE_RESERVE;
    loop {
        let data = format!("{}{TRUNCATION_MARKER}", take_chars(&compact, keep));
        let envelope = json!({
            "warning": TRUNCATION_WARNING,
            "original_length": original_length,
            "truncated": true,
            "data": data,
        });
        let rendered = to_pretty(&envelope);
        let length = char_len(&rendered);
        if length <= MAX_RESPONSE_CHARS || keep == 0 {
            return rendered;
        }
        // Escaping grows the payload; shrink by the overshoot and retry.
        keep = keep.saturating_sub(length - MAX_RESPONSE_CHARS);
    }
}

/// Pretty-print `items`, or summarise them per `spec` when too long.
pub fn format_list(items: &[Value], spec: &SummarySpec) -> String {
    let pretty = serde_json::to_string_pretty(items).unwrap_or_default();
    if char_len(&pretty) <= MAX_RESPONSE_CHARS {
        return pretty;
    }

    let projected: Vec<Value> = items
        .iter()
        .take(spec.limit)
        .map(|item| project(item, spec.fields))
        .collect();

    let mut showing = projected.len();
    loop {
        let rendered = to_pretty(&summary(items.len(), &projected[..showing], spec));
        if char_len(&rendered) <= MAX_RESPONSE_CHARS || showing == 0 {
            warn!(
                entity = spec.entity,
                total = items.len(),
                showing,
                "List response summarised due to size limits"
            );
            return rendered;
        }
        showing /= 2;
    }
}

fn summary(total: usize, shown: &[Value], spec: &SummarySpec) -> Value {
    let mut summary = Map::new();
    summary.insert(format!("total_{}", spec.entity), json!(total));
    summary.insert("showing".to_string(), json!(shown.len()));
    summary.insert(
        "message".to_string(),
        json!(format!(
            "Response too large. Showing first {} of {} {}. {}",
            shown.len(),
            total,
            spec.entity,
            spec.hint
        )),
    );
    summary.insert(spec.entity.to_string(), Value::Array(shown.to_vec()));
    Value::Object(summary)
}

/// Keep only `fields` of an object item; absent fields stay absent.
fn project(item: &Value, fields: &[&str]) -> Value {
    let Some(object) = item.as_object() else {
        return clamp(item);
    };

    let projected = fields
        .iter()
        .filter_map(|field| {
            object
                .get(*field)
                .map(|value| (field.to_string(), clamp(value)))
        })
        .collect::<Map<_, _>>();

    Value::Object(projected)
}

fn clamp(value: &Value) -> Value {
    match value {
        Value::String(s) if char_len(s) > MAX_FIELD_CHARS => {
            Value::String(format!("{}...", take_chars(s, MAX_FIELD_CHARS)))
        }
        Value::Array(values) => Value::Array(values.iter().map(clamp).collect()),
        other => other.clone(),
    }
}

fn to_pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: usize) -> Value {
        json!({
            "id": id,
            "name": format!("Course number {id} with a reasonably descriptive title"),
            "course_code": format!("CRS-{id}"),
            "workflow_state": "available",
            "start_at": "2024-01-08T00:00:00Z",
            "end_at": "2024-05-10T00:00:00Z",
            "account_id": 1,
            "enrollment_term_id": 7,
            "public_description": "x".repeat(200),
            "enrollments": [{"type": "student", "role": "StudentEnrollment"}],
        })
    }

    #[test]
    fn test_small_value_is_pretty_json() {
        let value = json!({"id": 1, "name": "Biology"});
        let text = format_value(&value);
        assert_eq!(text, "{\n  \"id\": 1,\n  \"name\": \"Biology\"\n}");
    }

    #[test]
    fn test_small_list_is_pretty_json() {
        let items = vec![course(1), course(2)];
        let text = format_list(&items, &COURSES);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, Value::Array(items));
    }

    #[test]
    fn test_large_list_is_summarised() {
        let items: Vec<Value> = (1..=500).map(course).collect();
        let text = format_list(&items, &COURSES);
        assert!(char_len(&text) <= MAX_RESPONSE_CHARS);

        let summary: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(summary["total_courses"], 500);
        assert_eq!(summary["showing"], 20);
        assert_eq!(
            summary["message"],
            "Response too large. Showing first 20 of 500 courses. \
             Use filters like 'enrollment_type' or 'enrollment_state' to narrow results."
        );

        let shown = summary["courses"].as_array().unwrap();
        assert_eq!(shown.len(), 20);
        assert_eq!(shown[0]["id"], 1);
        assert_eq!(shown[19]["id"], 20);
        for item in shown {
            let keys: Vec<_> = item.as_object().unwrap().keys().cloned().collect();
            assert_eq!(keys.len(), 6);
            for field in COURSES.fields {
                assert!(keys.contains(&field.to_string()));
            }
        }
    }

    #[test]
    fn test_assignment_summary_limit() {
        let items: Vec<Value> = (1..=300)
            .map(|id| {
                json!({
                    "id": id,
                    "name": format!("Assignment {id}"),
                    "description": "d".repeat(400),
                    "due_at": null,
                    "points_possible": 10.0,
                    "submission_types": ["online_upload"],
                    "has_submitted_submissions": false,
                    "html_url": format!("https://canvas.example.com/courses/1/assignments/{id}"),
                })
            })
            .collect();

        let summary: Value = serde_json::from_str(&format_list(&items, &ASSIGNMENTS)).unwrap();
        assert_eq!(summary["total_assignments"], 300);
        assert_eq!(summary["showing"], 10);
        assert!(summary["assignments"][0].get("description").is_none());
        assert_eq!(summary["assignments"][0]["due_at"], Value::Null);
    }

    #[test]
    fn test_huge_items_still_fit() {
        // Items whose projected fields alone overflow the budget.
        let items: Vec<Value> = (1..=40)
            .map(|id| {
                json!({
                    "id": id,
                    "title": "t".repeat(5_000),
                    "html_url": "u".repeat(5_000),
                    "context_code": ["c".repeat(900), "d".repeat(900)],
                })
            })
            .collect();

        let text = format_list(&items, &EVENTS);
        assert!(char_len(&text) <= MAX_RESPONSE_CHARS);
        let summary: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(summary["total_events"], 40);
        assert!(summary["showing"].as_u64().unwrap() <= 20);
        assert!(summary["events"][0]["title"].as_str().unwrap().ends_with("..."));
    }

    #[test]
    fn test_large_value_is_truncated() {
        let value = json!({"syllabus_body": "<p>\"quoted\"</p>".repeat(5_000)});
        let text = format_value(&value);
        assert!(char_len(&text) <= MAX_RESPONSE_CHARS);

        let envelope: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(envelope["warning"], TRUNCATION_WARNING);
        assert_eq!(envelope["truncated"], true);
        assert_eq!(
            envelope["original_length"].as_u64().unwrap() as usize,
            char_len(&to_pretty(&value))
        );
        let data = envelope["data"].as_str().unwrap();
        assert!(data.starts_with("{\"syllabus_body\""));
        assert!(data.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_multibyte_text_is_cut_on_char_boundary() {
        let value = json!({"body": "é".repeat(30_000)});
        let text = format_value(&value);
        assert!(char_len(&text) <= MAX_RESPONSE_CHARS);
        assert_eq!(take_chars("héllo", 2), "hé");
        assert_eq!(take_chars("hi", 10), "hi");
    }

    #[test]
    fn test_value_at_exact_budget_is_untouched() {
        // `"` + n chars + `"` == MAX_RESPONSE_CHARS
        let value = Value::String("a".repeat(MAX_RESPONSE_CHARS - 2));
        let text = format_value(&value);
        assert_eq!(char_len(&text), MAX_RESPONSE_CHARS);
        assert!(!text.contains(TRUNCATION_WARNING));
    }
}
