use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::ApplicationStatus;

/// One entry in an application's append-only note log.
///
/// `status` is set when the note was attached to a status change and absent
/// for free-standing notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub at: DateTime<Utc>,
    pub status: Option<ApplicationStatus>,
    pub body: String,
}

const NOTE_TIMESTAMP: &str = "%Y-%m-%d %H:%M";

/// Render the note log as the legacy single-blob format.
///
/// The first entry appears bare; each later entry is appended as
/// `"\n\n<timestamp> - <status>:\n<body>"` (or `"\n\n<timestamp>:\n<body>"`
/// without a status). The log itself stays a list so append-only ordering is
/// testable independently of this rendering.
pub fn render_notes(entries: &[NoteEntry]) -> String {
    let mut rendered = String::new();
    for (index, entry) in entries.iter().enumerate() {
        if index == 0 {
            rendered.push_str(&entry.body);
            continue;
        }
        let stamp = entry.at.format(NOTE_TIMESTAMP);
        match entry.status {
            Some(status) => {
                rendered.push_str(&format!("\n\n{stamp} - {}:\n{}", status.label(), entry.body));
            }
            None => {
                rendered.push_str(&format!("\n\n{stamp}:\n{}", entry.body));
            }
        }
    }
    rendered
}
