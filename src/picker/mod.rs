//! File-selection capability.
//!
//! A picker is asked for one file matching a filter and eventually reports a
//! file, a cancellation, or a failure. The onboarding manager turns the
//! first into a completed upload step and leaves the flow alone otherwise.

pub mod local;

use async_trait::async_trait;

use crate::error::PickerError;
use crate::onboarding::field::FileFilter;
use crate::onboarding::model::FileReference;

pub use local::LocalFilePicker;

/// How a pick ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(FileReference),
    Cancelled,
}

/// Asynchronous, single-shot file selection.
#[async_trait]
pub trait FilePicker: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Select one file matching `filter`.
    async fn pick(&self, filter: FileFilter) -> Result<PickOutcome, PickerError>;
}
