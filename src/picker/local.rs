//! Local filesystem picker — resolves a path typed by the user.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{FilePicker, PickOutcome};
use crate::error::PickerError;
use crate::onboarding::field::FileFilter;
use crate::onboarding::model::FileReference;

/// Picks the file at a path entered on the terminal.
///
/// An empty path (or `cancel`) counts as the user dismissing the picker.
/// The filter is not enforced here: a mismatched file is handed back and the
/// flow answers it with a corrective message.
pub struct LocalFilePicker {
    input: String,
}

impl LocalFilePicker {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    fn expand(&self) -> PathBuf {
        let trimmed = self.input.trim().trim_matches(|c| c == '"' || c == '\'');
        match trimmed.strip_prefix("~/") {
            Some(rest) => match std::env::var("HOME") {
                Ok(home) => Path::new(&home).join(rest),
                Err(_) => PathBuf::from(trimmed),
            },
            None => PathBuf::from(trimmed),
        }
    }
}

#[async_trait]
impl FilePicker for LocalFilePicker {
    fn name(&self) -> &str {
        "local"
    }

    async fn pick(&self, filter: FileFilter) -> Result<PickOutcome, PickerError> {
        let trimmed = self.input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("cancel") {
            debug!(%filter, "Local pick cancelled");
            return Ok(PickOutcome::Cancelled);
        }

        let path = self.expand();
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PickerError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(PickerError::Io(e)),
        };
        if !metadata.is_file() {
            return Err(PickerError::NotAFile(path.display().to_string()));
        }

        let path = tokio::fs::canonicalize(&path).await?;
        let mut file = FileReference::new(format!("file://{}", path.display()));
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            file = file.with_name(name);
        }
        if let Some(mime) = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(FileFilter::mime_for_extension)
        {
            file = file.with_mime(mime);
        }

        debug!(%filter, uri = %file.uri, "Local file picked");
        Ok(PickOutcome::Picked(file))
    }
}
