//! Template engine.
//!
//! Pure functions over `{{variable}}` placeholders: extracting variable names
//! from text or messages, substituting values, and checking message shape.

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

use super::error::PromptError;
use super::model::{ContentKind, Message};

/// Matches `{{name}}` and captures the inner token verbatim.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid"));

/// Extract placeholder names from `text` in order of first appearance.
///
/// The captured token is kept as written, so `{{ name }}` yields `" name "`.
/// Duplicates are removed by exact match.
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Extract placeholder names across the text of every text message, in message order.
pub fn extract_variables_from_messages(messages: &[Message]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for message in messages {
        let text = match (message.content.kind, &message.content.text) {
            (ContentKind::Text, Some(text)) => text,
            _ => continue,
        };
        for name in extract_variables(text) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Replace every `{{name}}` in `text` with its value.
///
/// Values are looked up by the trimmed name first, then by the name exactly as
/// written. Placeholders without a value stay in place. The scan is a single
/// left-to-right pass, so placeholders introduced by a value are not expanded.
pub fn substitute(text: &str, values: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            let raw = &caps[1];
            values
                .get(raw.trim())
                .or_else(|| values.get(raw))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Substitute values into the text of every text message. Image messages are copied as-is.
pub fn substitute_messages(messages: &[Message], values: &HashMap<String, String>) -> Vec<Message> {
    messages
        .iter()
        .map(|message| {
            let mut message = message.clone();
            if message.content.kind == ContentKind::Text {
                if let Some(text) = message.content.text.as_deref() {
                    message.content.text = Some(substitute(text, values));
                }
            }
            message
        })
        .collect()
}

/// True iff `messages` is non-empty and every message carries the field its kind requires.
///
/// Roles are checked when the messages are deserialized.
pub fn validate_message_shape(messages: &[Message]) -> bool {
    !messages.is_empty() && messages.iter().all(|m| m.content.is_well_formed())
}

/// Render a message list as a single JSON string.
pub fn render_messages(messages: &[Message]) -> Result<String, PromptError> {
    Ok(serde_json::to_string_pretty(messages)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::prompts::model::{MessageContent, Role};

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_in_first_occurrence_order() {
        let vars = extract_variables("{{b}} then {{a}} then {{b}} again {{c}}");
        assert_eq!(vars, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_extract_keeps_inner_whitespace() {
        let vars = extract_variables("{{ name }} and {{name}}");
        assert_eq!(vars, vec![" name ", "name"]);
    }

    #[test]
    fn test_extract_empty_text() {
        assert!(extract_variables("").is_empty());
        assert!(extract_variables("no placeholders {here}").is_empty());
    }

    #[test]
    fn test_extract_from_messages_skips_images() {
        let messages = vec![
            Message::assistant_text("Hi {{x}}"),
            Message::new(Role::User, MessageContent::image("{{ignored}}")),
            Message::user_text("Do {{y}} with {{x}}"),
        ];
        assert_eq!(extract_variables_from_messages(&messages), vec!["x", "y"]);
    }

    #[test]
    fn test_simple_substitution() {
        let result = substitute("Hello {{name}}!", &values(&[("name", "Ana")]));
        assert_eq!(result, "Hello Ana!");
    }

    #[test]
    fn test_missing_value_left_intact() {
        let result = substitute("{{a}} and {{b}}", &values(&[("a", "1")]));
        assert_eq!(result, "1 and {{b}}");
    }

    #[test]
    fn test_trimmed_lookup() {
        let result = substitute("Hi {{ name }}", &values(&[("name", "Bo")]));
        assert_eq!(result, "Hi Bo");
    }

    #[test]
    fn test_untrimmed_key_fills_placeholder() {
        let text = "Hi {{ name }}";
        let vars = extract_variables(text);
        let result = substitute(text, &values(&[(vars[0].as_str(), "Bo")]));
        assert_eq!(result, "Hi Bo");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let result = substitute("{{a}}", &values(&[("a", "{{b}}"), ("b", "nope")]));
        assert_eq!(result, "{{b}}");
    }

    #[test]
    fn test_full_values_leave_no_delimiters() {
        let text = "{{greeting}}, {{ who }}! {{greeting}} again.";
        let vars: HashMap<String, String> = extract_variables(text)
            .into_iter()
            .map(|v| (v, "x".to_string()))
            .collect();
        let result = substitute(text, &vars);
        assert!(!result.contains("{{"));
        assert!(!result.contains("}}"));
    }

    #[test]
    fn test_partial_values_keep_remaining_variables() {
        let text = "{{a}} {{b}} {{c}}";
        let result = substitute(text, &values(&[("b", "B")]));
        let remaining = extract_variables(&result);
        let original = extract_variables(text);
        assert!(remaining.iter().all(|v| original.contains(v)));
        assert_eq!(remaining, vec!["a", "c"]);
    }

    #[test]
    fn test_substitute_messages() {
        let messages = vec![
            Message::user_text("Do {{y}}"),
            Message::new(Role::Assistant, MessageContent::image("img://{{y}}")),
        ];
        let out = substitute_messages(&messages, &values(&[("y", "it")]));
        assert_eq!(out[0].content.text.as_deref(), Some("Do it"));
        assert_eq!(out[1].content.image.as_deref(), Some("img://{{y}}"));
    }

    #[test]
    fn test_validate_message_shape() {
        assert!(!validate_message_shape(&[]));
        assert!(validate_message_shape(&[Message::user_text("a")]));

        let broken = Message::new(
            Role::User,
            MessageContent {
                kind: ContentKind::Image,
                text: Some("not an image".to_string()),
                image: None,
            },
        );
        assert!(!validate_message_shape(&[Message::user_text("a"), broken]));
    }

    #[test]
    fn test_render_messages_is_json() {
        let messages = vec![Message::user_text("hello")];
        let rendered = render_messages(&messages).unwrap();
        let parsed: Vec<Message> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, messages);
    }
}
