// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recovery of structured content embedded in free-form model text.
//!
//! Models wrap JSON in prose, markdown fences or both. Every caller that needs
//! a JSON array out of model text goes through [`extract_json_array`].

use serde_json::Value;

use crate::error::FolioError;

/// Returns the body of the first fenced block tagged `tag`
/// (```` ```tag\n ... \n``` ````), or `None` if there is no such block.
pub fn fenced_block<'a>(text: &'a str, tag: &str) -> Option<&'a str> {
    let opener = format!("```{tag}");
    let start = text.find(&opener)? + opener.len();
    let rest = &text[start..];

    // The tag is followed by whitespace containing at least one newline. The
    // body starts after the latest such newline that still leaves a closing
    // "\n```" somewhere after it.
    let ws_len = rest.len() - rest.trim_start().len();
    rest[..ws_len]
        .char_indices()
        .rev()
        .filter(|(_, c)| *c == '\n')
        .find_map(|(nl, _)| {
            let body = &rest[nl + 1..];
            body.find("\n```").map(|end| &body[..end])
        })
}

/// Extracts the first balanced JSON array from `text` and parses it.
///
/// Content inside a markdown code fence is preferred when one is present.
/// Brackets inside JSON strings are ignored while scanning for the matching
/// close bracket.
pub fn extract_json_array(text: &str) -> Result<Vec<Value>, FolioError> {
    let source = fenced_content(text).unwrap_or(text);
    let slice = balanced_array(source)
        .or_else(|| balanced_array(text))
        .ok_or_else(|| FolioError::MalformedOutput("no JSON array found in model output".into()))?;

    serde_json::from_str::<Vec<Value>>(slice)
        .map_err(|e| FolioError::MalformedOutput(format!("invalid JSON array: {e}")))
}

/// Body of the first ``` fence regardless of its language tag.
fn fenced_content(text: &str) -> Option<&str> {
    let start = text.find("```")? + 3;
    let rest = &text[start..];
    let body_start = rest.find('\n')? + 1;
    let body = &rest[body_start..];
    let end = body.find("```")?;
    Some(&body[..end])
}

/// Slice of `text` spanning the first `[` and its matching `]`.
fn balanced_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
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

    #[test]
    fn fenced_block_finds_suggestions() {
        let text = "Answer.\n\n```suggestions\n[\"a\", \"b\"]\n```";
        assert_eq!(fenced_block(text, "suggestions"), Some("[\"a\", \"b\"]"));
    }

    #[test]
    fn fenced_block_allows_trailing_spaces_after_tag() {
        let text = "```suggestions  \n[1]\n```";
        assert_eq!(fenced_block(text, "suggestions"), Some("[1]"));
    }

    #[test]
    fn fenced_block_requires_newline_after_tag() {
        assert_eq!(fenced_block("```suggestions [1]\n```", "suggestions"), None);
    }

    #[test]
    fn fenced_block_can_be_empty() {
        assert_eq!(fenced_block("```suggestions\n\n```", "suggestions"), Some(""));
    }

    #[test]
    fn fenced_block_missing_close_is_none() {
        assert_eq!(fenced_block("```suggestions\n[1]", "suggestions"), None);
    }

    #[test]
    fn extracts_array_from_prose() {
        let text = "Here you go: [{\"front\": \"a\"}, {\"front\": \"b\"}] hope it helps";
        let arr = extract_json_array(text).unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["front"], "a");
    }

    #[test]
    fn prefers_fenced_json() {
        let text = "See [note]\n```json\n[1, 2, 3]\n```";
        let arr = extract_json_array(text).unwrap();
        assert_eq!(arr, vec![Value::from(1), Value::from(2), Value::from(3)]);
    }

    #[test]
    fn brackets_inside_strings_do_not_close_the_array() {
        let text = r#"[{"q": "what is a[0]?"}, {"q": "]"}] trailing ]"#;
        let arr = extract_json_array(text).unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[1]["q"], "]");
    }

    #[test]
    fn nested_arrays_are_balanced() {
        let arr = extract_json_array("x [[1, 2], [3]] y").unwrap();
        assert_eq!(arr.len(), 2);
    }

    #[test]
    fn missing_array_is_an_error() {
        let err = extract_json_array("no structured content here").unwrap_err();
        assert!(matches!(err, FolioError::MalformedOutput(_)));
    }

    #[test]
    fn unterminated_array_is_an_error() {
        assert!(extract_json_array("[1, 2").is_err());
    }

    #[test]
    fn invalid_json_inside_brackets_is_an_error() {
        assert!(extract_json_array("[not json]").is_err());
    }
}
