//! Chat transcript — the append-only conversation log shown to the user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field::Submission;
use super::model::FileReference;

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    User,
    System,
}

/// What a transcript entry carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EntryContent {
    Text(String),
    File(FileReference),
}

impl EntryContent {
    /// Text shown in a plain-text transcript.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Text(s) => s,
            Self::File(f) => f.display_name(),
        }
    }
}

impl From<Submission> for EntryContent {
    fn from(submission: Submission) -> Self {
        match submission {
            Submission::Text(s) => Self::Text(s),
            Submission::File(f) => Self::File(f),
        }
    }
}

/// One line of the conversation. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub id: Uuid,
    pub origin: Origin,
    pub content: EntryContent,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(origin: Origin, content: EntryContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            origin,
            content,
            timestamp: Utc::now(),
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Origin::System, EntryContent::Text(text.into()))
    }

    pub fn user(content: EntryContent) -> Self {
        Self::new(Origin::User, content)
    }

    pub fn text(&self) -> &str {
        self.content.display_text()
    }
}

/// Ordered, append-only sequence of entries.
///
/// The only way to shrink it is [`Transcript::clear`], used by a flow reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_system(&mut self, text: impl Into<String>) {
        self.entries.push(TranscriptEntry::system(text));
    }

    pub fn push_user(&mut self, content: EntryContent) {
        self.entries.push(TranscriptEntry::user(content));
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Entries appended after the first `offset` entries.
    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
