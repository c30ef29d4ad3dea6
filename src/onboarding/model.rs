//! Form data — the collected answers and file handles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field::{FieldKey, Submission};

/// Opaque handle to a user-selected file, produced by the file picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReference {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
}

impl FileReference {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: None,
            mime: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// The picker-supplied name, or the last segment of the URI.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self
                .uri
                .rsplit('/')
                .find(|s| !s.is_empty())
                .unwrap_or(&self.uri),
        }
    }

    /// Lower-cased extension of the display name, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.display_name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

/// One accepted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    File(FileReference),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileReference> {
        match self {
            Self::File(f) => Some(f),
            Self::Text(_) => None,
        }
    }
}

impl From<Submission> for FieldValue {
    fn from(submission: Submission) -> Self {
        match submission {
            Submission::Text(s) => Self::Text(s),
            Submission::File(f) => Self::File(f),
        }
    }
}

/// Accumulated answers keyed by field. A missing entry means the field is
/// still empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormRecord {
    values: BTreeMap<FieldKey, FieldValue>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: FieldKey) -> Option<&FieldValue> {
        self.values.get(&key)
    }

    pub fn text(&self, key: FieldKey) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_text)
    }

    pub fn file(&self, key: FieldKey) -> Option<&FileReference> {
        self.get(key).and_then(FieldValue::as_file)
    }

    pub fn is_filled(&self, key: FieldKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// First key in collection order that has no value yet.
    pub fn first_missing(&self) -> Option<FieldKey> {
        FieldKey::ALL.into_iter().find(|k| !self.is_filled(*k))
    }

    pub(crate) fn set(&mut self, key: FieldKey, value: FieldValue) {
        self.values.insert(key, value);
    }

    pub(crate) fn clear(&mut self) {
        self.values.clear();
    }

    /// Render the review screen summary.
    ///
    /// Text fields are always listed; file fields only once uploaded.
    pub fn to_review_summary(&self) -> String {
        let mut lines = Vec::new();
        for key in FieldKey::ALL {
            match self.get(key) {
                Some(FieldValue::Text(value)) => {
                    lines.push(format!("{}: {}", review_label(key), value))
                }
                Some(FieldValue::File(file)) => match key {
                    FieldKey::Document => lines.push("Document: Uploaded".to_string()),
                    _ => lines.push(format!("{}: {}", review_label(key), file.display_name())),
                },
                None if !matches!(key, FieldKey::ProfilePhoto | FieldKey::Document) => {
                    lines.push(format!("{}: ", review_label(key)))
                }
                None => {}
            }
        }
        lines.join("\n")
    }
}

fn review_label(key: FieldKey) -> &'static str {
    match key {
        FieldKey::Phone => "Phone",
        other => other.label(),
    }
}
