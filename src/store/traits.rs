//! `ProfileStore` trait — the "Save Information" capability.
//!
//! The onboarding flow only hands over a snapshot of the collected answers;
//! what happens to it is up to the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::onboarding::model::FormRecord;

/// A saved copy of the onboarding answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProfile {
    pub id: Uuid,
    pub record: FormRecord,
    pub saved_at: DateTime<Utc>,
}

impl SavedProfile {
    pub fn new(record: FormRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            record,
            saved_at: Utc::now(),
        }
    }
}

/// Receives the form when the user confirms "Save Information".
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Accept a snapshot of the answers. Returns the saved copy.
    async fn save(&self, record: &FormRecord) -> Result<SavedProfile, StoreError>;

    /// The most recently saved profile, if any.
    async fn latest(&self) -> Result<Option<SavedProfile>, StoreError>;
}
