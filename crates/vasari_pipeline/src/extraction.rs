//! Best-effort recovery of a JSON value from free-form model output.
//!
//! The backend is instructed to emit bare JSON but may prepend or append
//! commentary, wrap the payload in code fences, or return a bare array when
//! an object was requested. The extractor tolerates all of these without
//! guessing semantic intent beyond "find the JSON".

use serde_json::Value;

/// Extract a JSON value from a response that may contain extra text.
///
/// Strategies, in order of preference:
/// 1. Parse the full text as JSON.
/// 2. Parse the substring from the first `{` to the last `}`.
/// 3. Parse the first balanced `{...}` or `[...]` found in the text.
///
/// Returns `None` when every strategy fails; the caller surfaces that as an
/// unparsable-output error.
///
/// # Examples
///
/// ```
/// use vasari_pipeline::extract_json;
///
/// let response = "Ecco i format:\n```json\n{\"id\": \"fmt-001\"}\n```";
/// let value = extract_json(response).unwrap();
/// assert_eq!(value["id"], "fmt-001");
///
/// assert!(extract_json("no json here").is_none());
/// ```
pub fn extract_json(text: &str) -> Option<Value> {
    // Strategy 1: the whole response is JSON
    if let Ok(value) = serde_json::from_str::<Value>(text.trim()) {
        return Some(value);
    }

    // Strategy 2: first '{' to last '}'
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}'))
        && start < end
        && let Ok(value) = serde_json::from_str::<Value>(&text[start..=end])
    {
        return Some(value);
    }

    // Strategy 3: first balanced object or array, whichever opens first
    let brace_pos = text.find('{');
    let bracket_pos = text.find('[');

    let candidates = match (brace_pos, bracket_pos) {
        (Some(b), Some(k)) if k < b => [('[', ']'), ('{', '}')],
        (None, Some(_)) => [('[', ']'), ('{', '}')],
        _ => [('{', '}'), ('[', ']')],
    };

    for (open, close) in candidates {
        if let Some(slice) = extract_balanced(text, open, close)
            && let Ok(value) = serde_json::from_str::<Value>(slice)
        {
            return Some(value);
        }
    }

    None
}

/// Extract the first span between balanced delimiters, handling nesting and
/// string literals (including escapes) correctly.
fn extract_balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_text_parse() {
        let value = extract_json(r#"{"id": 123, "name": "Test"}"#).unwrap();
        assert_eq!(value, json!({"id": 123, "name": "Test"}));
    }

    #[test]
    fn round_trip_any_valid_json() {
        let original = json!({"a": [1, 2, {"b": "c"}], "d": null});
        let value = extract_json(&original.to_string()).unwrap();
        assert_eq!(value, original);
    }

    #[test]
    fn prose_wrapped_object() {
        let response = "Certo! Ecco il JSON: {\"id\": 456, \"nested\": {\"value\": \"test\"}} spero aiuti";
        let value = extract_json(response).unwrap();
        assert_eq!(value["nested"]["value"], "test");
    }

    #[test]
    fn code_fenced_object() {
        let response = "```json\n{\"id\": \"fmt-001\"}\n```";
        let value = extract_json(response).unwrap();
        assert_eq!(value["id"], "fmt-001");
    }

    #[test]
    fn bare_array_with_prose() {
        let response = "Here are the items:\n[\n  {\"id\": 1},\n  {\"id\": 2}\n]";
        let value = extract_json(response).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn string_escapes_do_not_break_balance() {
        let response = r#"note: {"text": "She said \"hello\" {not a brace}"}"#;
        let value = extract_json(response).unwrap();
        assert_eq!(value["text"], "She said \"hello\" {not a brace}");
    }

    #[test]
    fn plain_prose_returns_none() {
        assert!(extract_json("This is just plain text with no JSON").is_none());
    }

    #[test]
    fn unbalanced_braces_return_none() {
        assert!(extract_json("broken { \"a\": ").is_none());
    }

    #[test]
    fn empty_input_returns_none() {
        assert!(extract_json("").is_none());
    }
}
