// Telegram chat export data model
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{Result, StatsError};

/// Sender name used for messages without a `from` field (service messages).
pub const UNKNOWN_SENDER: &str = "<unknown>";

/// Root of a chat export ("Export chat history" JSON).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatExport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub messages: Vec<Message>,
}

/// A single chat entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: i64,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    /// Kept opaque: exports use both `"user123"` strings and bare integers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
    /// Absent or `null` reads as empty text.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: MessageText,
}

/// Message body: either a plain string or a list of rich-text fragments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageText {
    Plain(String),
    Fragments(Vec<TextFragment>),
}

/// One element of a rich-text message body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TextFragment {
    Plain(String),
    Span(TextSpan),
}

/// Formatted run (link, bold, mention, ...). Only `text` is used.
///
/// Decoded from a JSON object only, so a nested array is not mistaken for
/// a span.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "Map<String, Value>")]
pub struct TextSpan {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TryFrom<Map<String, Value>> for TextSpan {
    type Error = String;

    fn try_from(mut fields: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let mut take = |key: &str| match fields.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(format!("span `{key}` must be a string, got {other}")),
        };
        Ok(Self {
            kind: take("type")?,
            text: take("text")?,
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<MessageText, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<MessageText>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for MessageText {
    fn default() -> Self {
        MessageText::Plain(String::new())
    }
}

impl MessageText {
    /// Text pieces in order. Spans without `text` are skipped.
    pub fn fragments(&self) -> Vec<&str> {
        match self {
            MessageText::Plain(text) => vec![text.as_str()],
            MessageText::Fragments(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    TextFragment::Plain(text) => Some(text.as_str()),
                    TextFragment::Span(span) => span.text.as_deref(),
                })
                .collect(),
        }
    }

    /// All pieces joined by a single space, skipping blank ones.
    pub fn flatten(&self) -> String {
        self.fragments()
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.fragments().iter().all(|s| s.trim().is_empty())
    }
}

impl Message {
    /// Sender display name, or [`UNKNOWN_SENDER`] when the export has none.
    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(UNKNOWN_SENDER)
    }

    pub fn is_service(&self) -> bool {
        self.kind.as_deref() == Some("service")
    }
}

impl ChatExport {
    /// Decode an export from JSON text.
    ///
    /// Invalid JSON is a [`StatsError::Decode`]; valid JSON that is not an
    /// export (no `messages` array, a message without an integer `id`, a
    /// `text` of the wrong shape) is a [`StatsError::MalformedInput`].
    pub fn from_json(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    /// Read and decode an export file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| StatsError::io(path, e))?;
        Self::from_json(&content)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut root) = value else {
            return Err(StatsError::MalformedInput(
                "top-level value is not an object".to_string(),
            ));
        };

        let name = root.get("name").and_then(Value::as_str).map(str::to_string);

        let items = match root.remove("messages") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(StatsError::MalformedInput(
                    "`messages` is not an array".to_string(),
                ))
            }
            None => {
                return Err(StatsError::MalformedInput(
                    "missing `messages` field".to_string(),
                ))
            }
        };

        let messages = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<Message>(item)
                    .map_err(|e| StatsError::MalformedInput(format!("message #{}: {}", index, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { name, messages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_fragment_text() {
        let export = ChatExport::from_json(
            r#"{"messages": [
                {"id": 1, "from": "A", "text": "hello world"},
                {"id": 2, "from": "B", "text": ["see ", {"type": "link", "text": "example.org"}, {"type": "bold"}]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(export.messages.len(), 2);
        assert_eq!(export.messages[0].text.fragments(), vec!["hello world"]);
        assert_eq!(
            export.messages[1].text.fragments(),
            vec!["see ", "example.org"]
        );
        assert_eq!(export.messages[1].text.flatten(), "see  example.org");
    }

    #[test]
    fn test_missing_from_and_text() {
        let export = ChatExport::from_json(
            r#"{"messages": [{"id": 7, "type": "service", "from": null}]}"#,
        )
        .unwrap();
        let msg = &export.messages[0];
        assert_eq!(msg.sender(), UNKNOWN_SENDER);
        assert!(msg.is_service());
        assert!(msg.text.is_empty());
        assert!(msg.text.fragments().iter().all(|s| s.is_empty()));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let export = ChatExport::from_json(
            r#"{"name": "Group", "type": "private_group", "id": 99,
                "messages": [{"id": 1, "date": "2023-01-01T10:00:00", "from_id": "user1", "from": "A", "text": "hi", "edited": "x"}]}"#,
        )
        .unwrap();
        assert_eq!(export.name.as_deref(), Some("Group"));
        assert_eq!(export.messages[0].date.as_deref(), Some("2023-01-01T10:00:00"));
    }

    #[test]
    fn test_invalid_json_is_decode_error() {
        let err = ChatExport::from_json("{\"messages\": [").unwrap_err();
        assert!(matches!(err, StatsError::Decode(_)));
    }

    #[test]
    fn test_missing_messages_is_malformed() {
        let err = ChatExport::from_json(r#"{"chats": []}"#).unwrap_err();
        assert!(matches!(err, StatsError::MalformedInput(_)));

        let err = ChatExport::from_json(r#"{"messages": {}}"#).unwrap_err();
        assert!(matches!(err, StatsError::MalformedInput(_)));

        let err = ChatExport::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, StatsError::MalformedInput(_)));
    }

    #[test]
    fn test_message_without_id_is_malformed() {
        let err = ChatExport::from_json(r#"{"messages": [{"from": "A", "text": "x"}]}"#).unwrap_err();
        match err {
            StatsError::MalformedInput(msg) => assert!(msg.starts_with("message #0")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_wrong_text_shape_is_malformed() {
        let err = ChatExport::from_json(r#"{"messages": [{"id": 1, "text": 42}]}"#).unwrap_err();
        assert!(matches!(err, StatsError::MalformedInput(_)));
    }

    #[test]
    fn test_null_text_is_empty() {
        let export = ChatExport::from_json(
            r#"{"messages": [{"id": 1, "from": "A", "text": null}, {"id": 2, "from": "B", "text": "hi"}]}"#,
        )
        .unwrap();
        assert!(export.messages[0].text.is_empty());
        assert_eq!(export.messages[0].text, MessageText::default());
        assert_eq!(export.messages[1].text.flatten(), "hi");
    }

    #[test]
    fn test_nested_array_is_not_a_span() {
        let err = ChatExport::from_json(
            r#"{"messages": [{"id": 1, "text": ["see ", ["bold", "nested"]]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, StatsError::MalformedInput(_)));

        let err = ChatExport::from_json(r#"{"messages": [{"id": 1, "text": [{"type": "bold", "text": 5}]}]}"#)
            .unwrap_err();
        assert!(matches!(err, StatsError::MalformedInput(_)));
    }

    #[test]
    fn test_span_keeps_known_fields_and_ignores_others() {
        let export = ChatExport::from_json(
            r#"{"messages": [{"id": 1, "text": [{"type": "text_link", "text": "docs", "href": "https://example.org"}, {"type": "bold", "text": null}]}]}"#,
        )
        .unwrap();
        let MessageText::Fragments(parts) = &export.messages[0].text else {
            panic!("expected fragments");
        };
        assert_eq!(
            parts[0],
            TextFragment::Span(TextSpan {
                kind: Some("text_link".to_string()),
                text: Some("docs".to_string()),
            })
        );
        assert_eq!(export.messages[0].text.fragments(), vec!["docs"]);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        std::fs::write(&path, r#"{"messages": [{"id": 1, "from": "A", "text": "x"}]}"#).unwrap();
        let export = ChatExport::from_file(&path).unwrap();
        assert_eq!(export.messages[0].sender(), "A");

        let err = ChatExport::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StatsError::Io { .. }));
    }
}
