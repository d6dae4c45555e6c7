//! Chat messages and the sanitizer that turns a raw request payload into
//! a bounded [`Conversation`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Only the most recent messages are forwarded to a provider.
pub const MAX_HISTORY: usize = 20;

/// Speaker of a message. Anything other than the three well-known roles is
/// carried verbatim in [`Role::Other`] and left for the provider to judge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    #[serde(untagged)]
    Other(Value),
}

impl From<&Value> for Role {
    fn from(raw: &Value) -> Self {
        match raw.as_str() {
            Some("user")      => Role::User,
            Some("assistant") => Role::Assistant,
            Some("system")    => Role::System,
            _                 => Role::Other(raw.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// `None` when the caller sent no `role` key; serialized without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role: Some(role), content: content.into() }
    }
}

/// Caller input that can never be served.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("messages is missing")]
    Missing,
    #[error("messages must be an array")]
    NotAnArray,
    #[error("messages must not be empty")]
    Empty,
}

/// A non-empty, ordered conversation of at most [`MAX_HISTORY`] messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Conversation(Vec<Message>);

impl Conversation {
    pub fn messages(&self) -> &[Message] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<Message>> for Conversation {
    type Error = InvalidInput;

    fn try_from(messages: Vec<Message>) -> Result<Self, Self::Error> {
        if messages.is_empty() {
            return Err(InvalidInput::Empty);
        }
        let skip = messages.len().saturating_sub(MAX_HISTORY);
        Ok(Self(messages.into_iter().skip(skip).collect()))
    }
}

/// Validate and normalise the `messages` field of an inbound request.
///
/// Keeps the last [`MAX_HISTORY`] entries in their original order and
/// coerces every `content` to text. Roles are passed through untouched;
/// only the shape of `messages` itself can be rejected.
pub fn sanitize_messages(raw: Option<&Value>) -> Result<Conversation, InvalidInput> {
    let items = match raw {
        None | Some(Value::Null) => return Err(InvalidInput::Missing),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(InvalidInput::NotAnArray),
    };
    if items.is_empty() {
        return Err(InvalidInput::Empty);
    }

    let start = items.len().saturating_sub(MAX_HISTORY);
    let messages: Vec<Message> = items[start..].iter().map(sanitize_one).collect();

    Conversation::try_from(messages)
}

fn sanitize_one(item: &Value) -> Message {
    Message {
        role: item.get("role").map(Role::from),
        content: content_to_text(&item["content"]),
    }
}

fn content_to_text(value: &Value) -> String {
    match value {
        Value::Null      => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b)   => b.to_string(),
        Value::Number(n) => n.to_string(),
        other            => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn numbered(n: usize) -> Value {
        Value::Array(
            (0..n)
                .map(|i| json!({"role": "user", "content": format!("m{i}")}))
                .collect(),
        )
    }

    #[test]
    fn test_single_message_passes_through() {
        let raw = json!([{"role": "user", "content": "hi"}]);
        let conv = sanitize_messages(Some(&raw)).unwrap();
        assert_eq!(conv.messages(), &[Message::new(Role::User, "hi")]);
    }

    #[test]
    fn test_truncates_to_last_twenty_in_order() {
        let raw = numbered(25);
        let conv = sanitize_messages(Some(&raw)).unwrap();
        assert_eq!(conv.len(), MAX_HISTORY);
        let contents: Vec<&str> = conv.messages().iter().map(|m| m.content.as_str()).collect();
        let expected: Vec<String> = (5..25).map(|i| format!("m{i}")).collect();
        assert_eq!(contents, expected);
    }

    #[test]
    fn test_exactly_twenty_is_untouched() {
        let conv = sanitize_messages(Some(&numbered(20))).unwrap();
        assert_eq!(conv.messages()[0].content, "m0");
        assert_eq!(conv.messages().last().map(|m| m.content.as_str()), Some("m19"));
    }

    #[test]
    fn test_missing_and_empty_are_rejected() {
        assert_eq!(sanitize_messages(None), Err(InvalidInput::Missing));
        assert_eq!(sanitize_messages(Some(&Value::Null)), Err(InvalidInput::Missing));
        assert_eq!(sanitize_messages(Some(&json!([]))), Err(InvalidInput::Empty));
        assert_eq!(
            sanitize_messages(Some(&json!({"role": "user"}))),
            Err(InvalidInput::NotAnArray)
        );
        assert_eq!(sanitize_messages(Some(&json!("hi"))), Err(InvalidInput::NotAnArray));
    }

    #[test]
    fn test_content_is_coerced_to_text() {
        let raw = json!([
            {"role": "user"},
            {"role": "assistant", "content": null},
            {"role": "user", "content": 42},
            {"role": "user", "content": true},
            {"role": "system", "content": {"a": 1}},
        ]);
        let conv = sanitize_messages(Some(&raw)).unwrap();
        let contents: Vec<&str> = conv.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["", "", "42", "true", r#"{"a":1}"#]);
        assert_eq!(conv.messages()[4].role, Some(Role::System));
    }

    #[test]
    fn test_unknown_roles_pass_through_unchanged() {
        let raw = json!([
            {"role": "tool", "content": "x"},
            {"role": 7, "content": "y"},
            {"content": "no role"},
            {"role": "user", "content": "hi"},
        ]);
        let conv = sanitize_messages(Some(&raw)).unwrap();
        assert_eq!(conv.len(), 4);
        assert_eq!(conv.messages()[0].role, Some(Role::Other(json!("tool"))));
        assert_eq!(conv.messages()[1].role, Some(Role::Other(json!(7))));
        assert_eq!(conv.messages()[2].role, None);
        assert_eq!(conv.messages()[3].role, Some(Role::User));

        let forwarded = serde_json::to_value(&conv).unwrap();
        assert_eq!(
            forwarded,
            json!([
                {"role": "tool", "content": "x"},
                {"role": 7, "content": "y"},
                {"content": "no role"},
                {"role": "user", "content": "hi"},
            ])
        );
    }

    #[test]
    fn test_non_object_entries_are_kept_as_empty_messages() {
        let conv = sanitize_messages(Some(&json!(["garbage", 3]))).unwrap();
        assert_eq!(conv.len(), 2);
        assert!(conv.messages().iter().all(|m| m.role.is_none() && m.content.is_empty()));
    }

    #[test]
    fn test_dropped_entries_are_not_forwarded() {
        let mut items = vec![json!("garbage")];
        items.extend((0..20).map(|i| json!({"role": "user", "content": i})));
        let conv = sanitize_messages(Some(&Value::Array(items))).unwrap();
        assert_eq!(conv.len(), 20);
        assert_eq!(conv.messages()[0].content, "0");
    }

    #[test]
    fn test_conversation_serializes_as_plain_array() {
        let conv = Conversation::try_from(vec![Message::new(Role::Assistant, "yo")]).unwrap();
        let json = serde_json::to_value(&conv).unwrap();
        assert_eq!(json, json!([{"role": "assistant", "content": "yo"}]));
    }
}
