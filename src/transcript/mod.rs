//! Transcript handling: discovery, decoding, and types.

mod discovery;
mod parser;
mod types;

pub use discovery::{
    TRANSCRIPT_ENV, claude_projects_dir, cwd_to_project_folder, find_latest_session_log,
    resolve_transcript,
};
pub use parser::{decode_record, read_transcript_lines};
pub use types::{Content, ContentPart, LogRecord, Role};
