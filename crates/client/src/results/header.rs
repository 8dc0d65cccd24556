//! Result header types: messages, field descriptors and the header itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity of a server message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "FATAL")]
    Fatal,
    #[serde(rename = "ERROR")]
    Error,
    #[serde(rename = "WARN")]
    Warn,
    #[serde(rename = "INFO")]
    Info,
    #[serde(rename = "DEBUG")]
    Debug,
    #[default]
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageType::Fatal => "FATAL",
            MessageType::Error => "ERROR",
            MessageType::Warn => "WARN",
            MessageType::Info => "INFO",
            MessageType::Debug => "DEBUG",
            MessageType::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// A typed message from the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type", default)]
    pub message_type: MessageType,
    #[serde(default)]
    pub text: String,
}

impl Message {
    pub fn is_fatal(&self) -> bool {
        self.message_type == MessageType::Fatal
    }
}

/// A result field descriptor.
///
/// Row-oriented output lists bare names; object-oriented output lists
/// `{"name": ..., "type": ...}` objects. Both deserialize to this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FieldRepr")]
pub struct Field {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldRepr {
    Name(String),
    Described {
        name: String,
        #[serde(rename = "type", default)]
        field_type: Option<String>,
    },
}

impl From<FieldRepr> for Field {
    fn from(repr: FieldRepr) -> Self {
        match repr {
            FieldRepr::Name(name) => Field {
                name,
                field_type: None,
            },
            FieldRepr::Described { name, field_type } => Field { name, field_type },
        }
    }
}

/// Metadata that precedes the rows of every result payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchHeader {
    pub preview: bool,
    pub init_offset: u64,
    pub messages: Vec<Message>,
    pub fields: Vec<Field>,
}

impl SearchHeader {
    /// First `FATAL` message, if any.
    pub fn fatal_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_fatal())
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_deserialization() {
        assert_eq!(
            serde_json::from_str::<MessageType>("\"FATAL\"").unwrap(),
            MessageType::Fatal
        );
        assert_eq!(
            serde_json::from_str::<MessageType>("\"WARN\"").unwrap(),
            MessageType::Warn
        );
        assert_eq!(
            serde_json::from_str::<MessageType>("\"whatever\"").unwrap(),
            MessageType::Unknown
        );
    }

    #[test]
    fn test_message_type_display() {
        assert_eq!(MessageType::Fatal.to_string(), "FATAL");
        assert_eq!(MessageType::Unknown.to_string(), "UNKNOWN");
    }

    #[test]
    fn test_message_missing_fields_default() {
        let msg: Message = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(msg.message_type, MessageType::Unknown);
        assert!(!msg.is_fatal());
    }

    #[test]
    fn test_field_from_name_or_object() {
        let fields: Vec<Field> =
            serde_json::from_str(r#"["host", {"name": "count", "type": "num"}, {"name": "_raw"}]"#)
                .unwrap();
        assert_eq!(fields[0].name, "host");
        assert_eq!(fields[0].field_type, None);
        assert_eq!(fields[1].field_type.as_deref(), Some("num"));
        assert_eq!(fields[2].name, "_raw");
    }

    #[test]
    fn test_fatal_message_lookup() {
        let header = SearchHeader {
            messages: vec![
                Message {
                    message_type: MessageType::Info,
                    text: "fine".into(),
                },
                Message {
                    message_type: MessageType::Fatal,
                    text: "bad query".into(),
                },
            ],
            ..Default::default()
        };
        assert_eq!(header.fatal_message().unwrap().text, "bad query");
    }
}
