//! Types for decoded transcript records.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    #[serde(other)]
    Other,
}

/// One typed fragment of multi-part content
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(rename = "tool_use", alias = "tool_invocation")]
    ToolUse {
        #[serde(default = "unknown_tool")]
        name: String,
        /// Usually an object, but any JSON value is kept as-is
        #[serde(default = "empty_input")]
        input: Value,
    },
}

fn unknown_tool() -> String {
    "unknown".to_string()
}

fn empty_input() -> Value {
    Value::Object(Map::new())
}

/// Message content: a plain string or an ordered list of parts.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    /// Parts of unknown kind are dropped while decoding.
    Parts(Vec<ContentPart>),
}

impl<'de> Deserialize<'de> for Content {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Parts(Vec<Value>),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Content::Text(text),
            Raw::Parts(items) => Content::Parts(
                items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value::<ContentPart>(item).ok())
                    .collect(),
            ),
        })
    }
}

/// A role/content pair, the unit the renderer works on
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogRecord {
    pub role: Role,
    pub content: Content,
}

/// Accepted line shapes: Claude Code nests the pair under `message`,
/// simpler logs put it at the top level.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum RecordLine {
    Nested { message: LogRecord },
    Flat(LogRecord),
}

impl From<RecordLine> for LogRecord {
    fn from(line: RecordLine) -> Self {
        match line {
            RecordLine::Nested { message } => message,
            RecordLine::Flat(record) => record,
        }
    }
}
