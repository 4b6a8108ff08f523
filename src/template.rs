//! Template resolver: data-bound placeholder substitution.
//!
//! Templates contain `${path}` markers resolved against a [`RecordLookup`].
//! An optional formatter suffix (`${v:.2}`, `${v:%}`) is applied to the raw
//! value before substitution. Inline formatting tags (`[bold]`, `[#f00]`,
//! `[/]`) pass through verbatim; the resolver substitutes only and never
//! interprets style directives.

use crate::record::RecordLookup;
use serde_json::Value;

/// Resolve all placeholder markers in `template` against `record`.
///
/// Missing record or unresolvable paths substitute the empty string; this is
/// a normal condition for labels that render before data arrives. Markers
/// are resolved left to right, non-overlapping, first-match-wins. A `${`
/// with no closing `}` is left verbatim. Pure function of its inputs.
#[must_use]
pub fn resolve(template: &str, record: Option<&dyn RecordLookup>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            // Unterminated marker: emit verbatim and stop scanning.
            out.push_str(&rest[start..]);
            return out;
        };
        out.push_str(&resolve_marker(&after[..end], record));
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn resolve_marker(marker: &str, record: Option<&dyn RecordLookup>) -> String {
    let (path, directive) = match marker.find(':') {
        Some(idx) => (&marker[..idx], Some(&marker[idx + 1..])),
        None => (marker, None),
    };
    let Some(value) = record.and_then(|r| r.resolve(path)) else {
        return String::new();
    };
    match directive {
        Some(directive) => format_value(&value, directive),
        None => value_to_string(&value),
    }
}

/// Apply a formatter directive; any failure falls back to the raw string form.
fn format_value(value: &Value, directive: &str) -> String {
    if let Some(formatted) = try_format(value, directive) {
        formatted
    } else {
        value_to_string(value)
    }
}

fn try_format(value: &Value, directive: &str) -> Option<String> {
    let n = value.as_f64()?;
    if directive == "%" {
        return Some(format!("{:.0}%", n * 100.0));
    }
    if let Some(decimals) = directive.strip_prefix('.') {
        let decimals: usize = decimals.parse().ok()?;
        return Some(format!("{n:.decimals$}"));
    }
    None
}

/// Display form of a resolved value.
///
/// Strings are unquoted, null renders empty, structured values fall back to
/// their compact JSON form.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_record(template: &str, record: &Value) -> String {
        resolve(template, Some(record))
    }

    #[test]
    fn test_no_placeholders_round_trip() {
        let record = json!({});
        assert_eq!(with_record("plain text", &record), "plain text");
        assert_eq!(resolve("plain text", None), "plain text");
    }

    #[test]
    fn test_substitution() {
        let record = json!({"v": 42});
        assert_eq!(with_record("Value: ${v}", &record), "Value: 42");
    }

    #[test]
    fn test_missing_record_is_empty() {
        assert_eq!(resolve("Value: ${v}", None), "Value: ");
    }

    #[test]
    fn test_missing_path_is_empty() {
        let record = json!({"other": 1});
        assert_eq!(with_record("Value: ${v}!", &record), "Value: !");
    }

    #[test]
    fn test_multiple_markers_left_to_right() {
        let record = json!({"a": "x", "b": "y"});
        assert_eq!(with_record("${a}-${b}-${a}", &record), "x-y-x");
    }

    #[test]
    fn test_nested_path() {
        let record = json!({"point": {"value": 3.5}});
        assert_eq!(with_record("${point.value}", &record), "3.5");
    }

    #[test]
    fn test_formatter_decimals() {
        let record = json!({"v": 3.14159});
        assert_eq!(with_record("${v:.2}", &record), "3.14");
    }

    #[test]
    fn test_formatter_percent() {
        let record = json!({"v": 0.25});
        assert_eq!(with_record("${v:%}", &record), "25%");
    }

    #[test]
    fn test_formatter_failure_falls_back() {
        let record = json!({"v": "abc"});
        assert_eq!(with_record("${v:.2}", &record), "abc");

        let record = json!({"v": 5});
        assert_eq!(with_record("${v:bogus}", &record), "5");
    }

    #[test]
    fn test_unterminated_marker_verbatim() {
        let record = json!({"v": 1});
        assert_eq!(with_record("Value: ${v", &record), "Value: ${v");
    }

    #[test]
    fn test_style_tags_pass_through() {
        let record = json!({"v": 9});
        assert_eq!(
            with_record("[bold]${v}[/] units", &record),
            "[bold]9[/] units"
        );
    }

    #[test]
    fn test_null_renders_empty() {
        let record = json!({"v": null});
        assert_eq!(with_record("<${v}>", &record), "<>");
    }
}
