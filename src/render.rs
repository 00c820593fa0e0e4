//! Markdown rendering: turn transcript lines into a shareable document.

use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use time::{OffsetDateTime, format_description};

use crate::filter::{is_assistant_noise, is_user_noise};
use crate::transcript::{Content, ContentPart, LogRecord, Role, decode_record, read_transcript_lines};

pub const TITLE: &str = "# Claude Code Session";
const USER_HEADER: &str = "## 👤 User";
const ASSISTANT_HEADER: &str = "## 🤖 Assistant";

/// Local wall-clock time, UTC when the local offset is unavailable
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn format_date(now: OffsetDateTime) -> String {
    let fmt = format_description::parse("[year]-[month]-[day] [hour]:[minute]:[second]").ok();
    if let Some(fmt) = fmt {
        if let Ok(text) = now.format(&fmt) {
            return text;
        }
    }
    now.unix_timestamp().to_string()
}

/// Format one tool invocation as a collapsed `<details>` block
pub fn format_tool_call(name: &str, input: &Value) -> String {
    let input_str = serde_json::to_string_pretty(input).unwrap_or_else(|_| "{}".to_string());
    format!(
        "<details>\n<summary>🔧 Tool: {name}</summary>\n\n```json\n{input_str}\n```\n</details>"
    )
}

fn push_section(lines: &mut Vec<String>, header: &str, text: &str) {
    lines.push(header.to_string());
    lines.push(String::new());
    lines.push(text.to_string());
    lines.push(String::new());
}

fn render_user(lines: &mut Vec<String>, content: &Content) {
    match content {
        Content::Text(text) => {
            if is_user_noise(text) {
                tracing::debug!("skipping self-referential user turn");
                return;
            }
            push_section(lines, USER_HEADER, text);
        }
        Content::Parts(parts) => {
            let mut has_header = false;
            for part in parts {
                let ContentPart::Text { text } = part else {
                    continue;
                };
                if !has_header {
                    lines.push(USER_HEADER.to_string());
                    lines.push(String::new());
                    has_header = true;
                }
                lines.push(text.clone());
                lines.push(String::new());
            }
        }
    }
}

fn render_assistant(lines: &mut Vec<String>, content: &Content) {
    match content {
        Content::Text(text) => {
            if is_assistant_noise(text) {
                tracing::debug!("skipping self-referential assistant turn");
                return;
            }
            push_section(lines, ASSISTANT_HEADER, text);
        }
        Content::Parts(parts) => {
            let mut has_text = false;
            let mut tool_calls = Vec::new();
            for part in parts {
                match part {
                    ContentPart::Text { text } => {
                        if !has_text {
                            lines.push(ASSISTANT_HEADER.to_string());
                            lines.push(String::new());
                            has_text = true;
                        }
                        lines.push(text.clone());
                        lines.push(String::new());
                    }
                    ContentPart::ToolUse { name, input } => tool_calls.push((name, input)),
                }
            }
            for (name, input) in tool_calls {
                lines.push(format_tool_call(name, input));
                lines.push(String::new());
            }
        }
    }
}

fn render_record(lines: &mut Vec<String>, record: &LogRecord) {
    match record.role {
        Role::User => render_user(lines, &record.content),
        Role::Assistant => render_assistant(lines, &record.content),
        Role::Other => {}
    }
}

/// Render transcript lines with an explicit header timestamp
pub fn render_at<I, S>(lines: I, now: OffsetDateTime) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = vec![
        TITLE.to_string(),
        String::new(),
        format!("**Date:** {}", format_date(now)),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    let mut skipped = 0usize;
    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }
        match decode_record(line) {
            Some(record) => render_record(&mut out, &record),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(skipped, "skipped undecodable transcript lines");
    }

    out.join("\n")
}

/// Render transcript lines, stamped with the current local time
pub fn render<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    render_at(lines, now_local())
}

/// Read and render a transcript file. Fails only if the file cannot be read.
pub fn render_file(path: &Path) -> Result<String> {
    let lines = read_transcript_lines(path)?;
    tracing::debug!(path = %path.display(), lines = lines.len(), "rendering transcript");
    Ok(render(lines))
}
