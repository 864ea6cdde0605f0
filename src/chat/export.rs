//! Plain-text transcript export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{Message, Role};

/// Default file name for exported transcripts.
pub const EXPORT_FILE_NAME: &str = "chat_log.txt";

/// MIME type a front-end should serve exports with.
pub const EXPORT_MIME_TYPE: &str = "text/plain";

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "USER",
        Role::Assistant => "AI",
    }
}

/// Formats messages as plain text, one line per message.
///
/// Each line is `"{ROLE} ({timestamp}): {content}"` and the output is
/// newline-terminated. Messages without a timestamp render empty
/// parentheses.
pub fn export_plain_text(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        let timestamp = message.timestamp.as_deref().unwrap_or("");
        out.push_str(&format!(
            "{} ({}): {}\n",
            role_label(message.role),
            timestamp,
            message.content
        ));
    }
    out
}

/// Writes a transcript export to disk.
pub fn write_export<P: AsRef<Path>>(messages: &[Message], path: P) -> Result<()> {
    let file = File::create(path.as_ref())
        .map_err(|err| Error::io("failed to create export file", err))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(export_plain_text(messages).as_bytes())
        .map_err(|err| Error::io("failed to write export file", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_format_is_exact() {
        let messages = vec![
            Message::user("hi").with_timestamp("T1"),
            Message::assistant("hey").with_timestamp("T2"),
        ];
        assert_eq!(export_plain_text(&messages), "USER (T1): hi\nAI (T2): hey\n");
    }

    #[test]
    fn export_without_timestamp_leaves_parens_empty() {
        let messages = vec![Message::user("hi")];
        assert_eq!(export_plain_text(&messages), "USER (): hi\n");
    }

    #[test]
    fn export_of_empty_history_is_empty() {
        assert_eq!(export_plain_text(&[]), "");
    }

    #[test]
    fn write_export_round_trips() {
        let messages = vec![Message::assistant("hello").with_timestamp("T")];
        let dir = std::env::temp_dir();
        let path = dir.join("banter_export_test.txt");
        write_export(&messages, &path).unwrap();
        let read = std::fs::read_to_string(&path).unwrap();
        assert_eq!(read, "AI (T): hello\n");
        let _ = std::fs::remove_file(&path);
    }
}
