//! Optional-path lookup over raw Notion records
//!
//! Upstream records arrive as deeply nested JSON. Every fetcher goes
//! through the helpers here instead of ad-hoc indexing, so a missing or
//! mismatched key always yields a default instead of a panic or an error.

use serde_json::Value;

/// Walk a path of object keys / array indices, returning `None` on any miss
///
/// Path segments that parse as an unsigned integer index into arrays;
/// everything else is treated as an object key.
///
/// # Examples
///
/// ```
/// use daybrief::notion::props::pluck;
/// use serde_json::json;
///
/// let page = json!({"properties": {"Name": {"title": [{"text": {"content": "Ship it"}}]}}});
/// let content = pluck(&page, &["properties", "Name", "title", "0", "text", "content"]);
/// assert_eq!(content.and_then(|v| v.as_str()), Some("Ship it"));
/// ```
pub fn pluck<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = match current {
            Value::Object(map) => map.get(*segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Path lookup returning a string slice, `None` on miss or non-string
pub fn pluck_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    pluck(value, path).and_then(Value::as_str)
}

/// Concatenate the text content of a title/rich_text fragment array
fn join_fragments(fragments: &Value) -> String {
    fragments
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| pluck_str(item, &["text", "content"]))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// Extract a page property's title text, empty on miss
pub fn title_text(page: &Value, property: &str) -> String {
    pluck(page, &["properties", property, "title"])
        .map(join_fragments)
        .unwrap_or_default()
}

/// Extract a page property's rich text, empty on miss
pub fn rich_text(page: &Value, property: &str) -> String {
    pluck(page, &["properties", property, "rich_text"])
        .map(join_fragments)
        .unwrap_or_default()
}

/// Extract a select property's option name
pub fn select_name(page: &Value, property: &str, default: &str) -> String {
    pluck_str(page, &["properties", property, "select", "name"])
        .unwrap_or(default)
        .to_string()
}

/// Extract a checkbox property, false on miss
pub fn checkbox(page: &Value, property: &str) -> bool {
    pluck(page, &["properties", property, "checkbox"])
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Extract the start/end of a date property as raw timestamp strings
pub fn date_range(page: &Value, property: &str) -> (Option<String>, Option<String>) {
    let start = pluck_str(page, &["properties", property, "date", "start"]).map(str::to_string);
    let end = pluck_str(page, &["properties", property, "date", "end"]).map(str::to_string);
    (start, end)
}

/// Extract the page-level last-edited timestamp string
pub fn last_edited_time(page: &Value) -> Option<String> {
    pluck_str(page, &["last_edited_time"]).map(str::to_string)
}
