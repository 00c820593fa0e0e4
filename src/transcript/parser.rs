//! Transcript decoding: one JSONL line into a `LogRecord`.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::{LogRecord, RecordLine};

/// Decode one transcript line. Blank lines, invalid JSON and JSON that
/// matches neither accepted shape all yield `None`.
pub fn decode_record(line: &str) -> Option<LogRecord> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str::<RecordLine>(trimmed)
        .ok()
        .map(LogRecord::from)
}

/// Read a transcript into raw lines. Invalid UTF-8 is replaced rather than
/// rejected so one bad byte only spoils its own line.
pub fn read_transcript_lines(path: &Path) -> Result<Vec<String>> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read transcript {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(|line| line.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Content, ContentPart, Role};
    use tempfile::TempDir;

    #[test]
    fn decodes_flat_string_content() {
        let record = decode_record(r#"{"role":"user","content":"hi"}"#).unwrap();
        assert_eq!(record.role, Role::User);
        assert_eq!(record.content, Content::Text("hi".to_string()));
    }

    #[test]
    fn decodes_claude_nested_message() {
        let line = r#"{"type":"assistant","sessionId":"abc","message":{"role":"assistant","content":[{"type":"text","text":"Hello"}]}}"#;
        let record = decode_record(line).unwrap();
        assert_eq!(record.role, Role::Assistant);
        assert_eq!(
            record.content,
            Content::Parts(vec![ContentPart::Text {
                text: "Hello".to_string()
            }])
        );
    }

    #[test]
    fn unknown_role_is_other() {
        let record = decode_record(r#"{"role":"system","content":"setup"}"#).unwrap();
        assert_eq!(record.role, Role::Other);
    }

    #[test]
    fn tool_use_defaults_and_alias() {
        let line = r#"{"role":"assistant","content":[{"type":"tool_use"},{"type":"tool_invocation","name":"Bash","input":{"command":"ls"}}]}"#;
        let record = decode_record(line).unwrap();
        let Content::Parts(parts) = record.content else {
            panic!("expected parts");
        };
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], ContentPart::ToolUse { name, input } if name == "unknown" && input.as_object().is_some_and(|m| m.is_empty())));
        assert!(matches!(&parts[1], ContentPart::ToolUse { name, input } if name == "Bash" && input["command"] == "ls"));
    }

    #[test]
    fn tool_use_keeps_non_object_input() {
        let line = r#"{"role":"assistant","content":[{"type":"tool_use","name":"Ping","input":null},{"type":"tool_use","name":"Echo","input":[1,2]}]}"#;
        let record = decode_record(line).unwrap();
        let Content::Parts(parts) = record.content else {
            panic!("expected parts");
        };
        assert_eq!(parts.len(), 2);
        assert!(matches!(&parts[0], ContentPart::ToolUse { name, input } if name == "Ping" && input.is_null()));
        assert!(matches!(&parts[1], ContentPart::ToolUse { input, .. } if input.is_array()));
    }

    #[test]
    fn unknown_part_kinds_are_dropped_not_fatal() {
        let line = r#"{"role":"user","content":[{"type":"tool_result","tool_use_id":"x","content":"ok"},{"type":"text","text":"next"},"stray"]}"#;
        let record = decode_record(line).unwrap();
        assert_eq!(
            record.content,
            Content::Parts(vec![ContentPart::Text {
                text: "next".to_string()
            }])
        );
    }

    #[test]
    fn malformed_lines_yield_none() {
        assert!(decode_record("").is_none());
        assert!(decode_record("   ").is_none());
        assert!(decode_record("not json").is_none());
        assert!(decode_record(r#"{"type":"summary","summary":"x"}"#).is_none());
        assert!(decode_record(r#"{"role":"user","content":42}"#).is_none());
        assert!(decode_record(r#"{"role":"user"}"#).is_none());
        assert!(decode_record("[1,2,3]").is_none());
    }

    #[test]
    fn read_transcript_lines_missing_file_errors() {
        let tmp = TempDir::new().unwrap();
        let err = read_transcript_lines(&tmp.path().join("missing.jsonl")).unwrap_err();
        assert!(err.to_string().contains("failed to read transcript"));
    }

    #[test]
    fn read_transcript_lines_tolerates_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("t.jsonl");
        fs::write(&path, b"{\"role\":\"user\",\"content\":\"a\"}\n\xff\xfe\n").unwrap();
        let lines = read_transcript_lines(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(decode_record(&lines[0]).is_some());
        assert!(decode_record(&lines[1]).is_none());
    }
}
