//! Decoding the comparator's completion into a [`ComparisonResult`].
//!
//! Decoding is two steps. First the JSON object is located: the completion
//! may be bare JSON, a markdown code block, or an object embedded in prose.
//! Then the object is checked against the exact three-key schema. Nothing is
//! defaulted; every deviation is a [`ValidationError`].

use crate::comparator::ComparisonResult;
use crate::error::ValidationError;
use serde_json::{Map, Value as JsonValue};

/// Key for facts present in both texts.
pub const FACTS_IN_BOTH: &str = "facts_in_both";
/// Key for facts present only in the answer.
pub const FACTS_ONLY_IN_ANSWER: &str = "facts_only_in_answer";
/// Key for facts present only in the context.
pub const FACTS_ONLY_IN_CONTEXT: &str = "facts_only_in_context";

const KEYS: [&str; 3] = [FACTS_IN_BOTH, FACTS_ONLY_IN_ANSWER, FACTS_ONLY_IN_CONTEXT];

/// Upper bound on `{` positions tried as the start of an embedded object.
/// Keeps the scan linear in the completion length.
const MAX_CANDIDATE_STARTS: usize = 64;

/// Decode a comparison completion.
///
/// # Example
///
/// ```rust
/// use factdiff_facts::decode_comparison;
///
/// let text = r#"Here you go:
/// {"facts_in_both": ["The Sun is a star."], "facts_only_in_answer": [], "facts_only_in_context": []}"#;
/// let result = decode_comparison(text).unwrap();
/// assert_eq!(result.counts(), (1, 0, 0));
/// ```
pub fn decode_comparison(text: &str) -> Result<ComparisonResult, ValidationError> {
    let json = locate_json_object(text)?;
    let value: JsonValue = serde_json::from_str(json).map_err(ValidationError::Malformed)?;
    let object = match value {
        JsonValue::Object(map) => map,
        other => {
            return Err(ValidationError::NotAnObject {
                found: json_type(&other),
            })
        }
    };
    validate_object(object)
}

fn validate_object(mut object: Map<String, JsonValue>) -> Result<ComparisonResult, ValidationError> {
    if let Some(extra) = object.keys().find(|k| !KEYS.contains(&k.as_str())) {
        return Err(ValidationError::UnexpectedKey(extra.clone()));
    }

    let facts_in_both = take_string_list(&mut object, FACTS_IN_BOTH)?;
    let facts_only_in_answer = take_string_list(&mut object, FACTS_ONLY_IN_ANSWER)?;
    let facts_only_in_context = take_string_list(&mut object, FACTS_ONLY_IN_CONTEXT)?;

    Ok(ComparisonResult {
        facts_in_both,
        facts_only_in_answer,
        facts_only_in_context,
    })
}

fn take_string_list(
    object: &mut Map<String, JsonValue>,
    key: &'static str,
) -> Result<Vec<String>, ValidationError> {
    let items = match object.remove(key) {
        None => return Err(ValidationError::MissingKey(key)),
        Some(JsonValue::Array(items)) => items,
        Some(other) => {
            return Err(ValidationError::WrongType {
                key,
                found: json_type(&other),
            })
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            JsonValue::String(s) => Ok(s),
            other => Err(ValidationError::NonStringElement {
                key,
                index,
                found: json_type(&other),
            }),
        })
        .collect()
}

fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Find the JSON value to decode inside `text`.
///
/// Tries, in order: a fenced code block (with or without a language tag), the
/// first balanced `{...}` that parses, then the whole trimmed text.
fn locate_json_object(text: &str) -> Result<&str, ValidationError> {
    let text = text.trim();

    if let Some(json) = fenced_block(text) {
        return Ok(json);
    }

    if let Some(json) = find_json_object(text) {
        return Ok(json);
    }

    if serde_json::from_str::<JsonValue>(text).is_ok() {
        return Ok(text);
    }

    // Something brace-like was there but never balanced into valid JSON:
    // surface the parser's complaint instead of "not found".
    match text.find('{') {
        Some(start) => match serde_json::from_str::<JsonValue>(&text[start..]) {
            Err(e) => Err(ValidationError::Malformed(e)),
            Ok(_) => Err(ValidationError::NoJsonFound),
        },
        None => Err(ValidationError::NoJsonFound),
    }
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    // Skip an optional language tag on the opening fence line.
    let body_start = after_fence.find('\n').map_or(0, |i| i + 1);
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    let content = body[..end].trim();
    serde_json::from_str::<JsonValue>(content)
        .is_ok()
        .then_some(content)
}

fn find_json_object(text: &str) -> Option<&str> {
    let mut search_from = 0;
    let mut attempts = 0;

    while let Some(offset) = text[search_from..].find('{') {
        if attempts == MAX_CANDIDATE_STARTS {
            break;
        }
        attempts += 1;
        let start = search_from + offset;
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, c) in text[start..].char_indices() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                '{' if !in_string => depth += 1,
                '}' if !in_string => {
                    depth -= 1;
                    if depth == 0 {
                        let candidate = &text[start..=start + i];
                        if serde_json::from_str::<JsonValue>(candidate).is_ok() {
                            return Some(candidate);
                        }
                        break;
                    }
                }
                _ => {}
            }
        }

        search_from = start + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const VALID: &str = r#"{
        "facts_in_both": ["The Sun is a star.", "The Sun is 4.6 billion years old."],
        "facts_only_in_answer": ["The Sun is at the center of the Solar System."],
        "facts_only_in_context": []
    }"#;

    #[test]
    fn test_decode_bare_json() {
        let result = decode_comparison(VALID).unwrap();
        assert_eq!(
            result.facts_in_both,
            vec!["The Sun is a star.", "The Sun is 4.6 billion years old."]
        );
        assert_eq!(
            result.facts_only_in_answer,
            vec!["The Sun is at the center of the Solar System."]
        );
        assert!(result.facts_only_in_context.is_empty());
    }

    #[test]
    fn test_decode_markdown_fence() {
        let text = format!("Here is the comparison:\n```json\n{VALID}\n```\nDone.");
        assert_eq!(decode_comparison(&text).unwrap().counts(), (2, 1, 0));
    }

    #[test]
    fn test_decode_embedded_in_prose() {
        let text = format!("Sure! {{not json}} then {VALID} hope that helps");
        assert_eq!(decode_comparison(&text).unwrap().counts(), (2, 1, 0));
    }

    #[test]
    fn test_decode_skips_several_rejected_candidates() {
        let text = format!("{}{VALID}", "{draft} ".repeat(10));
        assert_eq!(decode_comparison(&text).unwrap().counts(), (2, 1, 0));
    }

    #[test]
    fn test_decode_gives_up_on_brace_flood() {
        let text = format!("{}{VALID}", "{".repeat(20_000));
        assert!(decode_comparison(&text).is_err());
        assert_eq!(find_json_object(&"{".repeat(20_000)), None);
    }

    #[test]
    fn test_decode_braces_inside_strings() {
        let text = r#"{"facts_in_both": ["a {weird} fact"], "facts_only_in_answer": [], "facts_only_in_context": ["x \"}\" y"]}"#;
        let result = decode_comparison(text).unwrap();
        assert_eq!(result.facts_in_both, vec!["a {weird} fact"]);
        assert_eq!(result.facts_only_in_context, vec!["x \"}\" y"]);
    }

    #[rstest]
    #[case::no_json("I could not compare these facts.")]
    #[case::empty("")]
    fn test_decode_no_json(#[case] text: &str) {
        assert!(matches!(
            decode_comparison(text),
            Err(ValidationError::NoJsonFound)
        ));
    }

    #[test]
    fn test_decode_malformed() {
        let text = r#"{"facts_in_both": ["a", "facts_only_in_answer": []"#;
        assert!(matches!(
            decode_comparison(text),
            Err(ValidationError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_not_an_object() {
        assert!(matches!(
            decode_comparison(r#"["a", "b"]"#),
            Err(ValidationError::NotAnObject { found: "array" })
        ));
    }

    #[test]
    fn test_decode_missing_key() {
        let text = r#"{"facts_in_both": [], "facts_only_in_answer": []}"#;
        assert!(matches!(
            decode_comparison(text),
            Err(ValidationError::MissingKey("facts_only_in_context"))
        ));
    }

    #[rstest]
    #[case::null(r#"null"#, "null")]
    #[case::string(r#""a fact""#, "string")]
    #[case::object(r#"{"a": 1}"#, "object")]
    fn test_decode_wrong_type(#[case] value: &str, #[case] expected: &str) {
        let text = format!(
            r#"{{"facts_in_both": {value}, "facts_only_in_answer": [], "facts_only_in_context": []}}"#
        );
        match decode_comparison(&text) {
            Err(ValidationError::WrongType { key, found }) => {
                assert_eq!(key, "facts_in_both");
                assert_eq!(found, expected);
            }
            other => panic!("expected WrongType, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_non_string_element() {
        let text =
            r#"{"facts_in_both": [], "facts_only_in_answer": ["ok", 3], "facts_only_in_context": []}"#;
        assert!(matches!(
            decode_comparison(text),
            Err(ValidationError::NonStringElement {
                key: "facts_only_in_answer",
                index: 1,
                found: "number"
            })
        ));
    }

    #[test]
    fn test_decode_unexpected_key() {
        let text = r#"{"facts_in_both": [], "facts_only_in_answer": [], "facts_only_in_context": [], "notes": "x"}"#;
        assert!(matches!(
            decode_comparison(text),
            Err(ValidationError::UnexpectedKey(ref k)) if k == "notes"
        ));
    }
}
